//! `TypeLookup`: the single internal-name resolution service.

use crate::arena::{ClassId, ExecutableId, ModuleId, TypeParamId, VariableId};
use crate::element::{ClassData, ModuleElement, PackageElement, TypeElement};
use crate::memo::{KeyedMemo, KeyedMemo2};
use crate::mirror::{PrimitiveType, TypeMirror};
use crate::Universe;

pub(crate) const OBJECT: &str = "java/lang/Object";
pub(crate) const CLONEABLE: &str = "java/lang/Cloneable";
pub(crate) const SERIALIZABLE: &str = "java/io/Serializable";
pub(crate) const INHERITED: &str = "java/lang/annotation/Inherited";

/// Per-universe resolution caches.
#[derive(Debug, Default)]
pub(crate) struct LookupCaches {
    /// `(internal name, requesting module)` to the resolved (or missing) type.
    resolved: KeyedMemo2<String, ModuleId, ClassId>,
    /// Missing placeholders, one per `(internal name, requesting module)`.
    missing: KeyedMemo2<String, ModuleId, ClassId>,
    pub(crate) missing_parameters: KeyedMemo<(ExecutableId, usize), VariableId>,
    /// Captures made on behalf of subtyping, one per distinct wildcard-parameterized type.
    pub(crate) captures: KeyedMemo<TypeMirror, TypeMirror>,
    /// Fresh method type variables, keyed by `(declared variables, from, to)`.
    pub(crate) fresh_type_vars: KeyedMemo<FreshKey, Vec<TypeParamId>>,
}

pub(crate) type FreshKey = (Vec<TypeParamId>, Vec<TypeParamId>, Vec<TypeMirror>);

fn package_of(internal_name: &str) -> String {
    internal_name
        .rsplit_once('/')
        .map_or(String::new(), |(package, _)| package.replace('/', "."))
}

impl Universe {
    /// The type `internal_name` as seen from `module` (the unnamed module when `None`).
    ///
    /// Searches `module` and then the modules it reads, breadth first; falls back to a
    /// missing type scoped to `module`. Memoized per `(name, module)`.
    pub(crate) fn resolve_id(&self, internal_name: &str, module: Option<ModuleId>) -> ClassId {
        let module = module.unwrap_or_else(|| self.unnamed_id());
        let key = (internal_name.to_string(), module);
        if let Some(hit) = self.caches.resolved.get(&key) {
            return hit;
        }
        self.caches.resolved.get_or_insert_with(key, || {
            for candidate in self.module(module).readable_ids() {
                if let Some(found) = self.find_in_module(candidate, internal_name) {
                    return found;
                }
            }
            self.missing_class(internal_name, module)
        })
    }

    pub(crate) fn find_in_module(&self, module: ModuleId, internal_name: &str) -> Option<ClassId> {
        let module = self.module(module);
        let package = match module.package(&package_of(internal_name)) {
            Ok(package) => package?,
            Err(err) => {
                tracing::debug!(
                    target: "nova.lang_model",
                    module = %module.name(),
                    error = %err,
                    "module packages unavailable"
                );
                return None;
            }
        };
        package.type_map().get(internal_name).copied()
    }

    pub(crate) fn missing_class(&self, internal_name: &str, module: ModuleId) -> ClassId {
        self.caches
            .missing
            .get_or_insert_with((internal_name.to_string(), module), || {
                tracing::trace!(
                    target: "nova.lang_model",
                    internal_name,
                    module = %self.module(module).name(),
                    "synthesized missing type"
                );
                self.alloc_class(ClassData::missing(internal_name.to_string(), module))
            })
    }

    /// A well-known type, looked up from the base module.
    pub(crate) fn well_known(&self, internal_name: &str) -> ClassId {
        self.resolve_id(internal_name, Some(self.base_module_id()))
    }
}

/// Resolution entry points.
#[derive(Debug, Clone, Copy)]
pub struct TypeLookup<'u> {
    universe: &'u Universe,
}

impl<'u> TypeLookup<'u> {
    pub(crate) fn new(universe: &'u Universe) -> Self {
        Self { universe }
    }

    /// Always returns a type; unknown names yield a missing type.
    pub fn resolve(&self, internal_name: &str, module: Option<ModuleId>) -> TypeElement<'u> {
        self.universe
            .class(self.universe.resolve_id(internal_name, module))
    }

    /// The type if `module` itself (not the modules it reads) contains it.
    pub fn find_in_module(&self, module: ModuleId, internal_name: &str) -> Option<TypeElement<'u>> {
        self.universe
            .find_in_module(module, internal_name)
            .map(|id| self.universe.class(id))
    }

    pub fn package(&self, module: ModuleId, dotted_name: &str) -> Option<PackageElement<'u>> {
        self.universe.module(module).package(dotted_name).ok().flatten()
    }

    pub fn base_module(&self) -> ModuleElement<'u> {
        self.universe.base_module()
    }

    pub fn object(&self) -> TypeElement<'u> {
        self.universe.class(self.universe.well_known(OBJECT))
    }

    pub fn cloneable(&self) -> TypeElement<'u> {
        self.universe.class(self.universe.well_known(CLONEABLE))
    }

    pub fn serializable(&self) -> TypeElement<'u> {
        self.universe.class(self.universe.well_known(SERIALIZABLE))
    }

    pub fn boxed_class(&self, primitive: PrimitiveType) -> TypeElement<'u> {
        self.universe
            .class(self.universe.well_known(primitive.box_internal_name()))
    }
}
