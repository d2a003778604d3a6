use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use nova_classfile::PACKAGE_INFO;

use crate::annotation::{self, AnnotationMirror};
use crate::archive::Archive;
use crate::arena::{ClassId, ModuleId, PackageId};
use crate::element::class::ClassData;
use crate::element::{ModuleElement, NestingKind, TypeElement};
use crate::error::Result;
use crate::memo::Memo;
use crate::Universe;

pub(crate) struct PackageData {
    pub(crate) module: ModuleId,
    pub(crate) name: String,
    entries: Vec<(String, Arc<dyn Archive>)>,
    package_info: Option<Arc<dyn Archive>>,
    types: Memo<BTreeMap<String, ClassId>>,
    annotations: Memo<Result<Vec<AnnotationMirror>>>,
}

impl PackageData {
    pub(crate) fn new(
        module: ModuleId,
        name: String,
        entries: Vec<(String, Arc<dyn Archive>)>,
        package_info: Option<Arc<dyn Archive>>,
    ) -> Self {
        Self {
            module,
            name,
            entries,
            package_info,
            types: Memo::new(),
            annotations: Memo::new(),
        }
    }

    fn internal_name(&self) -> String {
        self.name.replace('.', "/")
    }
}

#[derive(Clone)]
pub struct PackageElement<'u> {
    universe: &'u Universe,
    id: PackageId,
    data: Arc<PackageData>,
}

impl<'u> PackageElement<'u> {
    pub(crate) fn new(universe: &'u Universe, id: PackageId, data: Arc<PackageData>) -> Self {
        Self { universe, id, data }
    }

    pub fn id(&self) -> PackageId {
        self.id
    }

    /// Dotted name; empty for the unnamed package.
    pub fn qualified_name(&self) -> &str {
        &self.data.name
    }

    pub fn simple_name(&self) -> &str {
        self.data
            .name
            .rsplit_once('.')
            .map_or(self.data.name.as_str(), |(_, simple)| simple)
    }

    pub fn is_unnamed(&self) -> bool {
        self.data.name.is_empty()
    }

    pub fn module(&self) -> ModuleElement<'u> {
        self.universe.module(self.data.module)
    }

    /// Whether the package was declared through a `package-info` entry.
    pub fn has_package_info(&self) -> bool {
        self.data.package_info.is_some()
    }

    pub(crate) fn type_map(&self) -> &BTreeMap<String, ClassId> {
        self.data.types.get_or_init(|| {
            let mut types = BTreeMap::new();
            for (internal_name, archive) in &self.data.entries {
                if types.contains_key(internal_name) {
                    continue;
                }
                let class = ClassData::resolved(
                    internal_name.clone(),
                    self.data.module,
                    self.id,
                    Arc::clone(archive),
                );
                types.insert(internal_name.clone(), self.universe.alloc_class(class));
            }
            types
        })
    }

    /// The type named `internal_name` if this package holds it.
    pub fn type_by_internal_name(&self, internal_name: &str) -> Option<TypeElement<'u>> {
        self.type_map()
            .get(internal_name)
            .map(|&id| self.universe.class(id))
    }

    /// Every type in this package, nested ones included.
    pub fn all_types(&self) -> Vec<TypeElement<'u>> {
        self.type_map()
            .values()
            .map(|&id| self.universe.class(id))
            .collect()
    }

    /// Top-level types only.
    pub fn enclosed_elements(&self) -> Vec<TypeElement<'u>> {
        self.all_types()
            .into_iter()
            .filter(|ty| ty.nesting_kind() == NestingKind::TopLevel)
            .collect()
    }

    pub fn annotation_mirrors(&self) -> Result<Vec<AnnotationMirror>> {
        self.data
            .annotations
            .get_or_init(|| {
                let Some(archive) = &self.data.package_info else {
                    return Ok(Vec::new());
                };
                let internal = if self.is_unnamed() {
                    PACKAGE_INFO.to_string()
                } else {
                    format!("{}/{PACKAGE_INFO}", self.data.internal_name())
                };
                let stub = archive.read_class(&internal)?;
                stub.annotations
                    .iter()
                    .map(|a| annotation::mirror_of(self.universe, self.data.module, a))
                    .collect()
            })
            .clone()
    }
}

impl fmt::Debug for PackageElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageElement")
            .field("id", &self.id)
            .field("name", &self.data.name)
            .field("module", &self.data.module)
            .finish()
    }
}

impl PartialEq for PackageElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.universe, other.universe) && self.id == other.id
    }
}

impl Eq for PackageElement<'_> {}
