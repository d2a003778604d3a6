use std::fmt;
use std::sync::Arc;

use nova_classfile::access::{self, has};
use nova_classfile::{parse_field_descriptor, parse_field_signature, ConstValue, FieldStub};

use crate::annotation::{self, AnnotationMirror};
use crate::arena::{ClassId, ExecutableId, VariableId};
use crate::element::{modifiers_from_flags, ElementId, ElementKind, FlagSite, Modifier, Modifiers};
use crate::error::{ModelError, Result};
use crate::memo::Memo;
use crate::mirror::{NoTypeKind, TypeMirror};
use crate::scope::Scope;
use crate::Universe;

pub(crate) enum VariableData {
    Field {
        owner: ClassId,
        stub: FieldStub,
        ty: Memo<Result<TypeMirror>>,
        annotations: Memo<Result<Vec<AnnotationMirror>>>,
    },
    Parameter {
        executable: ExecutableId,
        index: usize,
        name: String,
        flags: u16,
    },
    /// Stand-in for a parameter index past the end of the parameter list.
    Missing {
        executable: ExecutableId,
        name: String,
    },
}

impl VariableData {
    pub(crate) fn field(owner: ClassId, stub: FieldStub) -> Self {
        VariableData::Field {
            owner,
            stub,
            ty: Memo::new(),
            annotations: Memo::new(),
        }
    }

    pub(crate) fn parameter(executable: ExecutableId, index: usize, name: String, flags: u16) -> Self {
        VariableData::Parameter {
            executable,
            index,
            name,
            flags,
        }
    }

    pub(crate) fn missing(executable: ExecutableId, index: usize) -> Self {
        VariableData::Missing {
            executable,
            name: format!("arg{index}"),
        }
    }
}

/// A field, a formal parameter, or a missing parameter placeholder.
#[derive(Clone)]
pub struct VariableElement<'u> {
    universe: &'u Universe,
    id: VariableId,
    data: Arc<VariableData>,
}

impl<'u> VariableElement<'u> {
    pub(crate) fn new(universe: &'u Universe, id: VariableId, data: Arc<VariableData>) -> Self {
        Self { universe, id, data }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn name(&self) -> &str {
        match &*self.data {
            VariableData::Field { stub, .. } => &stub.name,
            VariableData::Parameter { name, .. } | VariableData::Missing { name, .. } => name,
        }
    }

    fn flags(&self) -> u16 {
        match &*self.data {
            VariableData::Field { stub, .. } => stub.access_flags,
            VariableData::Parameter { flags, .. } => *flags,
            VariableData::Missing { .. } => 0,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match &*self.data {
            VariableData::Field { stub, .. } if has(stub.access_flags, access::ACC_ENUM) => {
                ElementKind::EnumConstant
            }
            VariableData::Field { .. } => ElementKind::Field,
            VariableData::Parameter { .. } | VariableData::Missing { .. } => ElementKind::Parameter,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(&*self.data, VariableData::Missing { .. })
    }

    pub fn is_synthetic(&self) -> bool {
        has(self.flags(), access::ACC_SYNTHETIC)
    }

    pub fn is_static(&self) -> bool {
        has(self.flags(), access::ACC_STATIC)
    }

    pub fn modifiers(&self) -> Modifiers {
        match &*self.data {
            VariableData::Field { .. } => modifiers_from_flags(self.flags(), FlagSite::Field),
            VariableData::Parameter { flags, .. } if has(*flags, access::ACC_FINAL) => {
                Modifiers::from([Modifier::Final])
            }
            _ => Modifiers::new(),
        }
    }

    /// Owning class for fields, owning executable for parameters.
    pub fn enclosing_element(&self) -> Option<ElementId> {
        Some(match &*self.data {
            VariableData::Field { owner, .. } => ElementId::Type(*owner),
            VariableData::Parameter { executable, .. }
            | VariableData::Missing { executable, .. } => ElementId::Executable(*executable),
        })
    }

    pub(crate) fn owner_type(&self) -> Option<ClassId> {
        match &*self.data {
            VariableData::Field { owner, .. } => Some(*owner),
            VariableData::Parameter { executable, .. }
            | VariableData::Missing { executable, .. } => {
                Some(self.universe.executable(*executable).owner().id())
            }
        }
    }

    /// Compile-time constant of a `static final` field.
    pub fn constant_value(&self) -> Option<&ConstValue> {
        match &*self.data {
            VariableData::Field { stub, .. } => stub.constant_value.as_ref(),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Result<TypeMirror> {
        match &*self.data {
            VariableData::Field { owner, stub, ty, .. } => ty
                .get_or_try_init(|| {
                    let class = self.universe.class(*owner);
                    let scope = Scope::new(self.universe, ElementId::Type(*owner), class.module().id());
                    let decode = |err: nova_classfile::Error| {
                        tracing::debug!(
                            target: "nova.lang_model",
                            internal_name = %class.internal_name(),
                            field = %stub.name,
                            error = %err,
                            "failed to decode field type"
                        );
                        ModelError::decode(format!("{}.{}", class.binary_name(), stub.name), err)
                    };
                    match &stub.signature {
                        Some(raw) => parse_field_signature(raw)
                            .map(|sig| scope.mirror(&sig))
                            .map_err(decode),
                        None => parse_field_descriptor(&stub.descriptor)
                            .map(|ty| scope.field_type(&ty))
                            .map_err(decode),
                    }
                })
                .cloned(),
            VariableData::Parameter { executable, index, .. } => {
                let exec = self.universe.executable(*executable).executable_type()?;
                Ok(exec
                    .params
                    .get(*index)
                    .cloned()
                    .unwrap_or(TypeMirror::NoType(NoTypeKind::None)))
            }
            VariableData::Missing { .. } => Ok(TypeMirror::NoType(NoTypeKind::None)),
        }
    }

    pub fn annotation_mirrors(&self) -> Result<Vec<AnnotationMirror>> {
        match &*self.data {
            VariableData::Field {
                owner,
                stub,
                annotations,
                ..
            } => annotations
                .get_or_init(|| {
                    let module = self.universe.class(*owner).module().id();
                    stub.annotations
                        .iter()
                        .map(|a| annotation::mirror_of(self.universe, module, a))
                        .collect()
                })
                .clone(),
            _ => Ok(Vec::new()),
        }
    }
}

impl fmt::Debug for VariableElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableElement")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

impl PartialEq for VariableElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.universe, other.universe) && self.id == other.id
    }
}

impl Eq for VariableElement<'_> {}
