//! Element nodes (identity semantics) and the views that query them.
//!
//! Nodes live in the [`Universe`] arenas and are addressed by handle. A view (e.g.
//! [`TypeElement`]) pairs a handle with the universe that issued it and derives everything
//! else lazily from the backing class stub.

mod class;
mod executable;
mod module;
mod package;
mod type_param;
mod variable;

use std::collections::BTreeSet;

use nova_classfile::access::{self, has};

pub use self::class::{NestingKind, TypeElement};
pub use self::executable::ExecutableElement;
pub use self::module::{ModuleElement, ReachableModule};
pub use self::package::PackageElement;
pub use self::type_param::TypeParameterElement;
pub use self::variable::VariableElement;

pub(crate) use self::class::{ClassData, Members};
pub(crate) use self::executable::ExecutableData;
pub(crate) use self::module::ModuleData;
pub(crate) use self::package::PackageData;
pub(crate) use self::type_param::{TypeParamData, TypeParamOrigin};
pub(crate) use self::variable::VariableData;

use crate::annotation::AnnotationMirror;
use crate::arena::{ClassId, ExecutableId, ModuleId, PackageId, TypeParamId, VariableId};
use crate::error::Result;
use crate::Universe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Module,
    Package,
    Class,
    Interface,
    Enum,
    Record,
    AnnotationType,
    Method,
    Constructor,
    StaticInit,
    InstanceInit,
    Field,
    EnumConstant,
    Parameter,
    TypeParameter,
}

impl ElementKind {
    pub fn is_type(self) -> bool {
        matches!(
            self,
            ElementKind::Class
                | ElementKind::Interface
                | ElementKind::Enum
                | ElementKind::Record
                | ElementKind::AnnotationType
        )
    }

    pub fn is_interface(self) -> bool {
        matches!(self, ElementKind::Interface | ElementKind::AnnotationType)
    }

    pub fn is_executable(self) -> bool {
        matches!(
            self,
            ElementKind::Method
                | ElementKind::Constructor
                | ElementKind::StaticInit
                | ElementKind::InstanceInit
        )
    }

    pub fn is_field(self) -> bool {
        matches!(self, ElementKind::Field | ElementKind::EnumConstant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

pub type Modifiers = BTreeSet<Modifier>;

/// Which declarations an access-flag word belongs to; the same bit means different things
/// on different declarations (`0x40` is `volatile` on a field, `bridge` on a method).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlagSite {
    Type,
    Field,
    Method,
}

pub(crate) fn modifiers_from_flags(flags: u16, site: FlagSite) -> Modifiers {
    let mut out = Modifiers::new();
    if has(flags, access::ACC_PUBLIC) {
        out.insert(Modifier::Public);
    }
    if has(flags, access::ACC_PROTECTED) {
        out.insert(Modifier::Protected);
    }
    if has(flags, access::ACC_PRIVATE) {
        out.insert(Modifier::Private);
    }
    if has(flags, access::ACC_ABSTRACT) {
        out.insert(Modifier::Abstract);
    }
    if has(flags, access::ACC_STATIC) {
        out.insert(Modifier::Static);
    }
    if has(flags, access::ACC_FINAL) && !has(flags, access::ACC_INTERFACE) {
        out.insert(Modifier::Final);
    }
    match site {
        FlagSite::Type => {}
        FlagSite::Field => {
            if has(flags, access::ACC_TRANSIENT) {
                out.insert(Modifier::Transient);
            }
            if has(flags, access::ACC_VOLATILE) {
                out.insert(Modifier::Volatile);
            }
        }
        FlagSite::Method => {
            if has(flags, access::ACC_SYNCHRONIZED) {
                out.insert(Modifier::Synchronized);
            }
            if has(flags, access::ACC_NATIVE) {
                out.insert(Modifier::Native);
            }
            if has(flags, access::ACC_STRICT) {
                out.insert(Modifier::Strictfp);
            }
        }
    }
    out
}

/// Identity of any element node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    Module(ModuleId),
    Package(PackageId),
    Type(ClassId),
    Executable(ExecutableId),
    Variable(VariableId),
    TypeParameter(TypeParamId),
}

impl From<ModuleId> for ElementId {
    fn from(id: ModuleId) -> Self {
        ElementId::Module(id)
    }
}

impl From<PackageId> for ElementId {
    fn from(id: PackageId) -> Self {
        ElementId::Package(id)
    }
}

impl From<ClassId> for ElementId {
    fn from(id: ClassId) -> Self {
        ElementId::Type(id)
    }
}

impl From<ExecutableId> for ElementId {
    fn from(id: ExecutableId) -> Self {
        ElementId::Executable(id)
    }
}

impl From<VariableId> for ElementId {
    fn from(id: VariableId) -> Self {
        ElementId::Variable(id)
    }
}

impl From<TypeParamId> for ElementId {
    fn from(id: TypeParamId) -> Self {
        ElementId::TypeParameter(id)
    }
}

/// A view over any element node.
#[derive(Debug, Clone)]
pub enum Element<'u> {
    Module(ModuleElement<'u>),
    Package(PackageElement<'u>),
    Type(TypeElement<'u>),
    Executable(ExecutableElement<'u>),
    Variable(VariableElement<'u>),
    TypeParameter(TypeParameterElement<'u>),
}

impl<'u> Element<'u> {
    pub(crate) fn new(universe: &'u Universe, id: ElementId) -> Self {
        match id {
            ElementId::Module(id) => Element::Module(universe.module(id)),
            ElementId::Package(id) => Element::Package(universe.package(id)),
            ElementId::Type(id) => Element::Type(universe.class(id)),
            ElementId::Executable(id) => Element::Executable(universe.executable(id)),
            ElementId::Variable(id) => Element::Variable(universe.variable(id)),
            ElementId::TypeParameter(id) => Element::TypeParameter(universe.type_parameter(id)),
        }
    }

    pub fn id(&self) -> ElementId {
        match self {
            Element::Module(e) => e.id().into(),
            Element::Package(e) => e.id().into(),
            Element::Type(e) => e.id().into(),
            Element::Executable(e) => e.id().into(),
            Element::Variable(e) => e.id().into(),
            Element::TypeParameter(e) => e.id().into(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Module(_) => ElementKind::Module,
            Element::Package(_) => ElementKind::Package,
            Element::Type(e) => e.kind(),
            Element::Executable(e) => e.kind(),
            Element::Variable(e) => e.kind(),
            Element::TypeParameter(_) => ElementKind::TypeParameter,
        }
    }

    pub fn simple_name(&self) -> String {
        match self {
            Element::Module(e) => e.name().as_str().to_string(),
            Element::Package(e) => e.simple_name().to_string(),
            Element::Type(e) => e.simple_name(),
            Element::Executable(e) => e.simple_name().to_string(),
            Element::Variable(e) => e.name().to_string(),
            Element::TypeParameter(e) => e.name().to_string(),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Element::Type(e) => e.modifiers(),
            Element::Executable(e) => e.modifiers(),
            Element::Variable(e) => e.modifiers(),
            Element::Module(_) | Element::Package(_) | Element::TypeParameter(_) => {
                Modifiers::new()
            }
        }
    }

    pub fn enclosing_element(&self) -> Option<ElementId> {
        match self {
            Element::Module(_) => None,
            Element::Package(e) => Some(e.module().id().into()),
            Element::Type(e) => e.enclosing_element(),
            Element::Executable(e) => Some(e.owner().id().into()),
            Element::Variable(e) => e.enclosing_element(),
            Element::TypeParameter(e) => e.generic_element(),
        }
    }

    pub fn annotation_mirrors(&self) -> Result<Vec<AnnotationMirror>> {
        match self {
            Element::Module(_) | Element::TypeParameter(_) => Ok(Vec::new()),
            Element::Package(e) => e.annotation_mirrors(),
            Element::Type(e) => e.annotation_mirrors(),
            Element::Executable(e) => e.annotation_mirrors(),
            Element::Variable(e) => e.annotation_mirrors(),
        }
    }

    /// The nearest type element enclosing this element (the element itself for types).
    pub fn nearest_type(&self) -> Option<ClassId> {
        match self {
            Element::Module(_) | Element::Package(_) => None,
            Element::Type(e) => Some(e.id()),
            Element::Executable(e) => Some(e.owner().id()),
            Element::Variable(e) => e.owner_type(),
            Element::TypeParameter(e) => {
                let owner = e.generic_element()?;
                Element::new(e.universe(), owner).nearest_type()
            }
        }
    }
}
