use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use nova_classfile::{MODULE_INFO, PACKAGE_INFO};
use nova_modules::{ModuleInfo, ModuleKind, ModuleName, Requires};
use parking_lot::RwLock;

use crate::archive::Archive;
use crate::arena::{ModuleId, PackageId};
use crate::element::package::PackageData;
use crate::element::PackageElement;
use crate::error::Result;
use crate::memo::Memo;
use crate::Universe;

/// A readability edge out of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReachableModule {
    pub name: ModuleName,
    pub is_transitive: bool,
}

pub(crate) struct ModuleData {
    pub(crate) info: ModuleInfo,
    pub(crate) archives: RwLock<Vec<Arc<dyn Archive>>>,
    packages: Memo<Result<Arc<BTreeMap<String, PackageId>>>>,
    reachable: Memo<Vec<ReachableModule>>,
    readable: Memo<Vec<ModuleId>>,
}

impl ModuleData {
    pub(crate) fn new(info: ModuleInfo) -> Self {
        Self {
            info,
            archives: RwLock::new(Vec::new()),
            packages: Memo::new(),
            reachable: Memo::new(),
            readable: Memo::new(),
        }
    }

    /// Whether the package map was already built; archives added afterwards stay invisible.
    pub(crate) fn is_gathered(&self) -> bool {
        self.packages.is_initialized()
    }
}

#[derive(Default)]
struct PackageEntries {
    types: Vec<(String, Arc<dyn Archive>)>,
    package_info: Option<Arc<dyn Archive>>,
}

fn gather_packages(
    universe: &Universe,
    id: ModuleId,
    data: &ModuleData,
) -> Result<Arc<BTreeMap<String, PackageId>>> {
    let archives = data.archives.read().clone();

    let mut grouped: BTreeMap<String, PackageEntries> = BTreeMap::new();
    for archive in &archives {
        for entry in archive.entries()? {
            if entry == MODULE_INFO {
                continue;
            }
            let (package, simple) = entry.rsplit_once('/').unwrap_or(("", entry.as_str()));
            let slot = grouped.entry(package.replace('/', ".")).or_default();
            if simple == PACKAGE_INFO {
                slot.package_info.get_or_insert_with(|| Arc::clone(archive));
            } else {
                slot.types.push((entry.clone(), Arc::clone(archive)));
            }
        }
    }

    let packages = grouped
        .into_iter()
        .map(|(name, entries)| {
            let package = PackageData::new(id, name.clone(), entries.types, entries.package_info);
            (name, universe.alloc_package(package))
        })
        .collect::<BTreeMap<_, _>>();

    tracing::debug!(
        target: "nova.lang_model",
        module = %data.info.name,
        archives = archives.len(),
        packages = packages.len(),
        "gathered module packages"
    );
    Ok(Arc::new(packages))
}

fn reachable_edges(universe: &Universe, data: &ModuleData) -> Vec<ReachableModule> {
    let info = &data.info;
    match info.kind {
        ModuleKind::Unnamed | ModuleKind::Automatic => universe
            .module_names()
            .into_iter()
            .filter(|name| name != &info.name)
            .map(|name| ReachableModule {
                name,
                is_transitive: false,
            })
            .collect(),
        ModuleKind::Explicit => {
            let mut edges: Vec<ReachableModule> = info
                .requires
                .iter()
                .map(|req| ReachableModule {
                    name: req.module.clone(),
                    is_transitive: req.is_transitive,
                })
                .collect();
            let base = ModuleName::new(universe.config().base_module.clone());
            if universe.config().implicit_base_readability
                && info.name != base
                && !info.requires_module(&base)
            {
                edges.push(ReachableModule {
                    name: base,
                    is_transitive: false,
                });
            }
            edges
        }
    }
}

/// Breadth-first readability walk: every edge of the root, then only transitive edges.
fn readable_modules(universe: &Universe, root: ModuleId) -> Vec<ModuleId> {
    let mut order = vec![root];
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::new();

    for edge in universe.module(root).reachable_modules() {
        if let Some(id) = universe.module_id(&edge.name) {
            if visited.insert(id) {
                order.push(id);
                queue.push_back(id);
            }
        }
    }
    while let Some(current) = queue.pop_front() {
        for edge in universe.module(current).reachable_modules() {
            if !edge.is_transitive {
                continue;
            }
            if let Some(id) = universe.module_id(&edge.name) {
                if visited.insert(id) {
                    order.push(id);
                    queue.push_back(id);
                }
            }
        }
    }
    order
}

#[derive(Clone)]
pub struct ModuleElement<'u> {
    universe: &'u Universe,
    id: ModuleId,
    data: Arc<ModuleData>,
}

impl<'u> ModuleElement<'u> {
    pub(crate) fn new(universe: &'u Universe, id: ModuleId, data: Arc<ModuleData>) -> Self {
        Self { universe, id, data }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &ModuleName {
        &self.data.info.name
    }

    pub fn kind(&self) -> ModuleKind {
        self.data.info.kind
    }

    pub fn is_unnamed(&self) -> bool {
        self.data.info.kind == ModuleKind::Unnamed
    }

    pub fn is_open(&self) -> bool {
        self.data.info.is_open
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.data.info
    }

    pub fn requires(&self) -> &[Requires] {
        &self.data.info.requires
    }

    pub fn archives(&self) -> Vec<Arc<dyn Archive>> {
        self.data.archives.read().clone()
    }

    pub(crate) fn package_map(&self) -> Result<Arc<BTreeMap<String, PackageId>>> {
        self.data
            .packages
            .get_or_try_init(|| gather_packages(self.universe, self.id, &self.data))
            .map(Arc::clone)
    }

    /// Packages with at least one entry in this module's archives.
    pub fn packages(&self) -> Result<Vec<PackageElement<'u>>> {
        Ok(self
            .package_map()?
            .values()
            .map(|&id| self.universe.package(id))
            .collect())
    }

    pub fn package(&self, dotted_name: &str) -> Result<Option<PackageElement<'u>>> {
        Ok(self
            .package_map()?
            .get(dotted_name)
            .map(|&id| self.universe.package(id)))
    }

    /// Direct readability edges. The unnamed module and automatic modules read every other
    /// registered module.
    pub fn reachable_modules(&self) -> Vec<ReachableModule> {
        self.data
            .reachable
            .get_or_init(|| reachable_edges(self.universe, &self.data))
            .clone()
    }

    /// Modules whose types resolve from here, in lookup order (this module first).
    pub fn readable_modules(&self) -> Vec<ModuleElement<'u>> {
        self.readable_ids()
            .into_iter()
            .map(|id| self.universe.module(id))
            .collect()
    }

    pub(crate) fn readable_ids(&self) -> Vec<ModuleId> {
        self.data
            .readable
            .get_or_init(|| readable_modules(self.universe, self.id))
            .clone()
    }

    pub fn reads(&self, other: &ModuleName) -> bool {
        self.readable_modules().iter().any(|m| m.name() == other)
    }

    /// Whether `package` (dotted) is exported to `to`. Automatic and unnamed modules export
    /// everything.
    pub fn exports_to(&self, package: &str, to: &ModuleName) -> bool {
        self.data.info.exports_package_to(package, to)
    }
}

impl fmt::Debug for ModuleElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleElement")
            .field("id", &self.id)
            .field("name", self.name())
            .finish()
    }
}

impl PartialEq for ModuleElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.universe, other.universe) && self.id == other.id
    }
}

impl Eq for ModuleElement<'_> {}
