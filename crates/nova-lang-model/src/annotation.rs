//! Annotation mirrors resolved against the annotated element's module.

use nova_classfile::{
    descriptor_to_internal_name, parse_field_descriptor, Annotation, ConstValue, ElementValue,
    FieldType,
};

use crate::arena::{ClassId, ModuleId};
use crate::error::{ModelError, Result};
use crate::mirror::{NoTypeKind, TypeMirror};
use crate::scope::Scope;
use crate::Universe;

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMirror {
    pub annotation_type: TypeMirror,
    /// Explicitly given values, in class-file order.
    pub values: Vec<(String, AnnotationValue)>,
}

impl AnnotationMirror {
    pub fn annotation_type_element(&self) -> Option<ClassId> {
        self.annotation_type.element()
    }

    pub fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Const(ConstValue),
    Enum { ty: TypeMirror, constant: String },
    Class(TypeMirror),
    Annotation(Box<AnnotationMirror>),
    Array(Vec<AnnotationValue>),
}

fn malformed(descriptor: &str) -> ModelError {
    ModelError::decode(
        format!("annotation type `{descriptor}`"),
        nova_classfile::Error::InvalidDescriptor(descriptor.to_string()),
    )
}

fn named_type(universe: &Universe, module: ModuleId, descriptor: &str) -> Result<TypeMirror> {
    let internal_name = descriptor_to_internal_name(descriptor).ok_or_else(|| malformed(descriptor))?;
    let scope = Scope::module_only(universe, module);
    Ok(scope.field_type(&FieldType::Object(internal_name)))
}

pub(crate) fn mirror_of(
    universe: &Universe,
    module: ModuleId,
    annotation: &Annotation,
) -> Result<AnnotationMirror> {
    let annotation_type = named_type(universe, module, &annotation.type_descriptor)?;
    let values = annotation
        .elements
        .iter()
        .map(|(name, value)| Ok((name.clone(), value_of(universe, module, value)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(AnnotationMirror {
        annotation_type,
        values,
    })
}

pub(crate) fn value_of(
    universe: &Universe,
    module: ModuleId,
    value: &ElementValue,
) -> Result<AnnotationValue> {
    Ok(match value {
        ElementValue::Const(value) => AnnotationValue::Const(value.clone()),
        ElementValue::Enum {
            type_descriptor,
            const_name,
        } => AnnotationValue::Enum {
            ty: named_type(universe, module, type_descriptor)?,
            constant: const_name.clone(),
        },
        ElementValue::Class(descriptor) if descriptor == "V" => {
            AnnotationValue::Class(TypeMirror::NoType(NoTypeKind::Void))
        }
        ElementValue::Class(descriptor) => {
            let ty = parse_field_descriptor(descriptor)
                .map_err(|err| ModelError::decode(format!("class literal `{descriptor}`"), err))?;
            AnnotationValue::Class(Scope::module_only(universe, module).field_type(&ty))
        }
        ElementValue::Annotation(nested) => {
            AnnotationValue::Annotation(Box::new(mirror_of(universe, module, nested)?))
        }
        ElementValue::Array(values) => AnnotationValue::Array(
            values
                .iter()
                .map(|v| value_of(universe, module, v))
                .collect::<Result<_>>()?,
        ),
    })
}
