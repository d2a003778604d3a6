//! The entity graph: module registry, archive-to-module mapping, node storage and module
//! closure.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nova_classfile::MODULE_INFO;
use nova_modules::{derive_automatic_module_name, ModuleInfo, ModuleKind, ModuleName, Requires};
use parking_lot::RwLock;

use crate::archive::{Archive, ModuleResolver};
use crate::arena::{Arena, ClassId, ExecutableId, ModuleId, PackageId, TypeParamId, VariableId};
use crate::element::{
    ClassData, Element, ElementId, ExecutableData, ExecutableElement, ModuleData, ModuleElement,
    PackageData, PackageElement, TypeElement, TypeParamData, TypeParameterElement, VariableData,
    VariableElement,
};
use crate::elements::Elements;
use crate::error::{ArchiveError, ModelError, Result};
use crate::lookup::{LookupCaches, TypeLookup};
use crate::types::Types;
use crate::ModelConfig;

#[derive(Default)]
struct Registry {
    by_name: HashMap<ModuleName, ModuleId>,
    order: Vec<ModuleId>,
}

/// Owner of every element node and of the resolution caches.
///
/// Registration ([`Universe::register_archive`], [`Universe::compute_modules_closure`]) is
/// meant to run once, single-threaded, before queries start. Queries may then run from any
/// number of threads.
pub struct Universe {
    config: ModelConfig,
    modules: Arena<ModuleData>,
    packages: Arena<PackageData>,
    classes: Arena<ClassData>,
    executables: Arena<ExecutableData>,
    variables: Arena<VariableData>,
    type_params: Arena<TypeParamData>,
    registry: RwLock<Registry>,
    resolver: Option<Arc<dyn ModuleResolver>>,
    pub(crate) caches: LookupCaches,
    captures: AtomicUsize,
    unnamed: ModuleId,
}

impl Universe {
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;

        let modules = Arena::new();
        let unnamed = ModuleId::from_index(modules.alloc(ModuleData::new(ModuleInfo::unnamed())));
        let mut registry = Registry::default();
        registry.by_name.insert(ModuleName::unnamed(), unnamed);
        registry.order.push(unnamed);

        Ok(Self {
            config,
            modules,
            packages: Arena::new(),
            classes: Arena::new(),
            executables: Arena::new(),
            variables: Arena::new(),
            type_params: Arena::new(),
            registry: RwLock::new(registry),
            resolver: None,
            caches: LookupCaches::default(),
            captures: AtomicUsize::new(0),
            unnamed,
        })
    }

    /// Resolver consulted by [`Universe::compute_modules_closure`] for modules that are
    /// required but not registered.
    pub fn with_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Attach `archive` to the module it declares: its `module-info` descriptor, else the
    /// automatic-module manifest attribute, else (when enabled) a name derived from the file
    /// name, else the unnamed module.
    pub fn register_archive(&self, archive: Arc<dyn Archive>) -> Result<ModuleId> {
        let info = self.module_info_of(archive.as_ref())?;
        let name = info.name.clone();

        let mut registry = self.registry.write();
        let id = match registry.by_name.get(&name) {
            Some(&id) => id,
            None => {
                let id = ModuleId::from_index(self.modules.alloc(ModuleData::new(info)));
                registry.by_name.insert(name.clone(), id);
                registry.order.push(id);
                tracing::debug!(target: "nova.lang_model", module = %name, "created module");
                id
            }
        };
        drop(registry);

        let data = self.modules.get(id.index());
        if data.is_gathered() {
            tracing::warn!(
                target: "nova.lang_model",
                module = %name,
                archive = %archive.name(),
                "module packages were already gathered; archive contents stay invisible"
            );
        }
        data.archives.write().push(Arc::clone(&archive));
        tracing::debug!(
            target: "nova.lang_model",
            module = %name,
            archive = %archive.name(),
            "registered archive"
        );
        Ok(id)
    }

    fn module_info_of(&self, archive: &dyn Archive) -> Result<ModuleInfo> {
        let entries = archive.entries()?;
        if entries.iter().any(|entry| entry == MODULE_INFO) {
            let stub = archive.read_class(MODULE_INFO)?;
            return stub.module.ok_or_else(|| {
                ModelError::Archive(ArchiveError::Malformed {
                    archive: archive.name().to_string(),
                    message: "`module-info` carries no module record".to_string(),
                })
            });
        }

        if let Some(name) = archive.manifest_attribute(&self.config.automatic_module_attribute) {
            let name = name.trim();
            if !name.is_empty() {
                return Ok(ModuleInfo::automatic(name));
            }
        }

        if self.config.derive_automatic_module_names {
            if let Some(name) = archive.file_name().and_then(derive_automatic_module_name) {
                return Ok(ModuleInfo::automatic(name.as_str()));
            }
        }

        Ok(ModuleInfo::unnamed())
    }

    /// Load the dependencies of every registered module through the resolver, expanding
    /// newly loaded modules only along `requires transitive` edges.
    ///
    /// Returns the names that could not be resolved; the closure itself never fails.
    pub fn compute_modules_closure(&self) -> Vec<ModuleName> {
        let mut todo: VecDeque<ModuleName> = self.module_names().into_iter().collect();
        let mut expanded = HashSet::new();
        let mut unresolved: Vec<ModuleName> = Vec::new();

        while let Some(name) = todo.pop_front() {
            if !expanded.insert(name.clone()) {
                continue;
            }
            let Some(id) = self.module_id(&name) else {
                continue;
            };
            for dependency in self.declared_dependencies(id) {
                if unresolved.contains(&dependency.module) {
                    continue;
                }
                if self.module_id(&dependency.module).is_none()
                    && !self.load_module(&dependency.module, &name)
                {
                    unresolved.push(dependency.module.clone());
                    continue;
                }
                if dependency.is_transitive {
                    todo.push_back(dependency.module);
                }
            }
        }

        tracing::debug!(
            target: "nova.lang_model",
            modules = self.registry.read().order.len(),
            unresolved = unresolved.len(),
            "computed module closure"
        );
        unresolved
    }

    fn declared_dependencies(&self, id: ModuleId) -> Vec<Requires> {
        let data = self.modules.get(id.index());
        let info = &data.info;
        if info.kind != ModuleKind::Explicit {
            return Vec::new();
        }
        let mut requires = info.requires.clone();
        let base = ModuleName::new(self.config.base_module.clone());
        if self.config.implicit_base_readability && info.name != base && !info.requires_module(&base) {
            requires.push(Requires {
                module: base,
                is_transitive: false,
                is_static: false,
            });
        }
        requires
    }

    fn load_module(&self, name: &ModuleName, required_by: &ModuleName) -> bool {
        let Some(archive) = self.resolver.as_ref().and_then(|r| r.resolve(name)) else {
            tracing::warn!(
                target: "nova.lang_model",
                module = %name,
                required_by = %required_by,
                "required module could not be resolved"
            );
            return false;
        };
        match self.register_archive(archive) {
            Ok(id) if self.modules.get(id.index()).info.name == *name => true,
            Ok(id) => {
                tracing::warn!(
                    target: "nova.lang_model",
                    module = %name,
                    registered_as = %self.modules.get(id.index()).info.name,
                    "resolver returned an archive for a different module"
                );
                false
            }
            Err(err) => {
                tracing::warn!(
                    target: "nova.lang_model",
                    module = %name,
                    error = %err,
                    "failed to register resolved module"
                );
                false
            }
        }
    }

    pub(crate) fn module_names(&self) -> Vec<ModuleName> {
        let registry = self.registry.read();
        registry
            .order
            .iter()
            .map(|id| self.modules.get(id.index()).info.name.clone())
            .collect()
    }

    pub(crate) fn module_id(&self, name: &ModuleName) -> Option<ModuleId> {
        self.registry.read().by_name.get(name).copied()
    }

    /// Registered modules in registration order, the unnamed module first.
    pub fn modules(&self) -> Vec<ModuleElement<'_>> {
        let order = self.registry.read().order.clone();
        order.into_iter().map(|id| self.module(id)).collect()
    }

    pub fn module_by_name(&self, name: &str) -> Option<ModuleElement<'_>> {
        self.module_id(&ModuleName::new(name)).map(|id| self.module(id))
    }

    pub fn unnamed_module(&self) -> ModuleElement<'_> {
        self.module(self.unnamed)
    }

    pub(crate) fn unnamed_id(&self) -> ModuleId {
        self.unnamed
    }

    /// The configured base module, or the unnamed module when it is not registered.
    pub fn base_module(&self) -> ModuleElement<'_> {
        self.module(self.base_module_id())
    }

    pub(crate) fn base_module_id(&self) -> ModuleId {
        self.module_id(&ModuleName::new(self.config.base_module.clone()))
            .unwrap_or(self.unnamed)
    }

    pub(crate) fn next_capture_index(&self) -> usize {
        self.captures.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn module(&self, id: ModuleId) -> ModuleElement<'_> {
        ModuleElement::new(self, id, self.modules.get(id.index()))
    }

    pub fn package(&self, id: PackageId) -> PackageElement<'_> {
        PackageElement::new(self, id, self.packages.get(id.index()))
    }

    pub fn class(&self, id: ClassId) -> TypeElement<'_> {
        TypeElement::new(self, id, self.classes.get(id.index()))
    }

    pub fn executable(&self, id: ExecutableId) -> ExecutableElement<'_> {
        ExecutableElement::new(self, id, self.executables.get(id.index()))
    }

    pub fn variable(&self, id: VariableId) -> VariableElement<'_> {
        VariableElement::new(self, id, self.variables.get(id.index()))
    }

    pub fn type_parameter(&self, id: TypeParamId) -> TypeParameterElement<'_> {
        TypeParameterElement::new(self, id, self.type_params.get(id.index()))
    }

    pub fn element(&self, id: ElementId) -> Element<'_> {
        Element::new(self, id)
    }

    pub(crate) fn alloc_package(&self, data: PackageData) -> PackageId {
        PackageId::from_index(self.packages.alloc(data))
    }

    pub(crate) fn alloc_class(&self, data: ClassData) -> ClassId {
        ClassId::from_index(self.classes.alloc(data))
    }

    pub(crate) fn alloc_executable(&self, data: ExecutableData) -> ExecutableId {
        ExecutableId::from_index(self.executables.alloc(data))
    }

    pub(crate) fn alloc_variable(&self, data: VariableData) -> VariableId {
        VariableId::from_index(self.variables.alloc(data))
    }

    pub(crate) fn alloc_type_param(&self, data: TypeParamData) -> TypeParamId {
        TypeParamId::from_index(self.type_params.alloc(data))
    }

    /// Type parameters allocated so far, capture and fresh method variables included.
    pub fn type_parameter_count(&self) -> usize {
        self.type_params.len()
    }

    pub(crate) fn type_param_module(&self, id: TypeParamId) -> ModuleId {
        self.type_params.get(id.index()).module
    }

    pub(crate) fn missing_parameter(&self, executable: ExecutableId, index: usize) -> VariableElement<'_> {
        let id = self
            .caches
            .missing_parameters
            .get_or_insert_with((executable, index), || {
                self.alloc_variable(VariableData::missing(executable, index))
            });
        self.variable(id)
    }

    pub fn lookup(&self) -> TypeLookup<'_> {
        TypeLookup::new(self)
    }

    pub fn types(&self) -> Types<'_> {
        Types::new(self)
    }

    pub fn elements(&self) -> Elements<'_> {
        Elements::new(self)
    }
}

impl fmt::Debug for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Universe")
            .field("modules", &self.modules)
            .field("classes", &self.classes)
            .field("type_params", &self.type_params)
            .finish_non_exhaustive()
    }
}
