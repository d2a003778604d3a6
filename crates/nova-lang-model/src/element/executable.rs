use std::fmt;
use std::sync::Arc;

use nova_classfile::access::{self, has};
use nova_classfile::{
    parse_method_descriptor, parse_method_signature, ClassTypeSignature, FieldType, MethodSignature,
    MethodStub, ReturnType, TypeSignature,
};

use crate::annotation::{self, AnnotationMirror, AnnotationValue};
use crate::arena::{ClassId, ExecutableId, ModuleId, TypeParamId, VariableId};
use crate::element::type_param::TypeParamData;
use crate::element::variable::VariableData;
use crate::element::{
    modifiers_from_flags, ElementId, ElementKind, FlagSite, Modifier, Modifiers,
    TypeElement, TypeParameterElement, VariableElement,
};
use crate::error::{ModelError, Result};
use crate::memo::Memo;
use crate::mirror::{ExecutableType, NoTypeKind, TypeMirror};
use crate::scope::Scope;
use crate::Universe;

const CONSTRUCTOR: &str = "<init>";
const STATIC_INIT: &str = "<clinit>";

pub(crate) struct ExecutableData {
    pub(crate) owner: ClassId,
    pub(crate) kind: ElementKind,
    /// `None` for the synthesized instance initializer.
    stub: Option<MethodStub>,
    signature: Memo<Result<Arc<MethodSignature>>>,
    type_params: Memo<Result<Vec<TypeParamId>>>,
    parameters: Memo<Result<Vec<VariableId>>>,
    ty: Memo<Result<ExecutableType>>,
    annotations: Memo<Result<Vec<AnnotationMirror>>>,
}

impl ExecutableData {
    pub(crate) fn from_stub(owner: ClassId, stub: MethodStub) -> Self {
        let kind = match stub.name.as_str() {
            CONSTRUCTOR => ElementKind::Constructor,
            STATIC_INIT => ElementKind::StaticInit,
            _ => ElementKind::Method,
        };
        Self::new(owner, kind, Some(stub))
    }

    pub(crate) fn instance_initializer(owner: ClassId) -> Self {
        Self::new(owner, ElementKind::InstanceInit, None)
    }

    fn new(owner: ClassId, kind: ElementKind, stub: Option<MethodStub>) -> Self {
        Self {
            owner,
            kind,
            stub,
            signature: Memo::new(),
            type_params: Memo::new(),
            parameters: Memo::new(),
            ty: Memo::new(),
            annotations: Memo::new(),
        }
    }
}

fn descriptor_signature(ty: &FieldType) -> TypeSignature {
    match ty {
        FieldType::Base(base) => TypeSignature::Base(*base),
        FieldType::Object(name) => TypeSignature::Class(ClassTypeSignature::simple(name)),
        FieldType::Array(component) => {
            TypeSignature::Array(Box::new(descriptor_signature(component)))
        }
    }
}

fn is_implicit(flags: u16) -> bool {
    has(flags, access::ACC_SYNTHETIC) || has(flags, access::ACC_MANDATED)
}

/// A method, constructor or initializer.
#[derive(Clone)]
pub struct ExecutableElement<'u> {
    universe: &'u Universe,
    id: ExecutableId,
    data: Arc<ExecutableData>,
}

impl<'u> ExecutableElement<'u> {
    pub(crate) fn new(universe: &'u Universe, id: ExecutableId, data: Arc<ExecutableData>) -> Self {
        Self { universe, id, data }
    }

    pub fn id(&self) -> ExecutableId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind
    }

    /// `<init>` for constructors, `<clinit>` for the static initializer, empty for the
    /// instance initializer.
    pub fn simple_name(&self) -> &str {
        self.data.stub.as_ref().map_or("", |stub| stub.name.as_str())
    }

    pub fn descriptor(&self) -> &str {
        self.data
            .stub
            .as_ref()
            .map_or("()V", |stub| stub.descriptor.as_str())
    }

    pub fn owner(&self) -> TypeElement<'u> {
        self.universe.class(self.data.owner)
    }

    fn flags(&self) -> u16 {
        self.data.stub.as_ref().map_or(0, |stub| stub.access_flags)
    }

    pub fn modifiers(&self) -> Modifiers {
        let mut modifiers = modifiers_from_flags(self.flags(), FlagSite::Method);
        if self.is_default() {
            modifiers.insert(Modifier::Default);
        }
        modifiers
    }

    pub fn is_static(&self) -> bool {
        has(self.flags(), access::ACC_STATIC)
    }

    pub fn is_abstract(&self) -> bool {
        has(self.flags(), access::ACC_ABSTRACT)
    }

    pub fn is_private(&self) -> bool {
        has(self.flags(), access::ACC_PRIVATE)
    }

    pub fn is_varargs(&self) -> bool {
        has(self.flags(), access::ACC_VARARGS)
    }

    pub fn is_bridge(&self) -> bool {
        has(self.flags(), access::ACC_BRIDGE)
    }

    pub fn is_synthetic(&self) -> bool {
        has(self.flags(), access::ACC_SYNTHETIC)
    }

    /// A non-abstract instance method declared in an interface.
    pub fn is_default(&self) -> bool {
        self.data.kind == ElementKind::Method
            && !self.is_abstract()
            && !self.is_static()
            && !self.is_private()
            && self.owner().is_interface()
    }

    fn module(&self) -> ModuleId {
        self.owner().module().id()
    }

    fn decode_error(&self, err: nova_classfile::Error) -> ModelError {
        let owner = self.owner();
        tracing::debug!(
            target: "nova.lang_model",
            internal_name = %owner.internal_name(),
            method = %self.simple_name(),
            error = %err,
            "failed to decode method signature"
        );
        ModelError::decode(
            format!("{}.{}{}", owner.binary_name(), self.simple_name(), self.descriptor()),
            err,
        )
    }

    /// The generic signature, or one synthesized from the descriptor and `Exceptions`
    /// attribute. Implicit constructor parameters (outer instance, enum name/ordinal) are not
    /// part of the result.
    fn signature(&self) -> Result<Arc<MethodSignature>> {
        self.data
            .signature
            .get_or_try_init(|| {
                let Some(stub) = &self.data.stub else {
                    return Ok(Arc::new(MethodSignature {
                        type_parameters: Vec::new(),
                        parameters: Vec::new(),
                        return_type: None,
                        throws: Vec::new(),
                    }));
                };
                if let Some(raw) = &stub.signature {
                    let mut signature =
                        parse_method_signature(raw).map_err(|err| self.decode_error(err))?;
                    // A signature only lists thrown types when one of them is generic.
                    if signature.throws.is_empty() {
                        signature.throws = stub
                            .exceptions
                            .iter()
                            .map(|name| TypeSignature::Class(ClassTypeSignature::simple(name)))
                            .collect();
                    }
                    return Ok(Arc::new(signature));
                }

                let descriptor =
                    parse_method_descriptor(&stub.descriptor).map_err(|err| self.decode_error(err))?;
                let mut parameters: Vec<TypeSignature> =
                    descriptor.params.iter().map(descriptor_signature).collect();
                if self.data.kind == ElementKind::Constructor {
                    parameters = self.drop_implicit_parameters(stub, parameters);
                }
                let return_type = match &descriptor.return_type {
                    ReturnType::Void => None,
                    ReturnType::Type(ty) => Some(descriptor_signature(ty)),
                };
                let throws = stub
                    .exceptions
                    .iter()
                    .map(|name| TypeSignature::Class(ClassTypeSignature::simple(name)))
                    .collect();
                Ok(Arc::new(MethodSignature {
                    type_parameters: Vec::new(),
                    parameters,
                    return_type,
                    throws,
                }))
            })
            .map(Arc::clone)
    }

    fn drop_implicit_parameters(
        &self,
        stub: &MethodStub,
        parameters: Vec<TypeSignature>,
    ) -> Vec<TypeSignature> {
        if !stub.parameters.is_empty() && stub.parameters.len() == parameters.len() {
            return parameters
                .into_iter()
                .zip(&stub.parameters)
                .filter(|(_, info)| !is_implicit(info.access_flags))
                .map(|(param, _)| param)
                .collect();
        }
        let owner = self.owner();
        let implicit = if owner.kind() == ElementKind::Enum {
            2
        } else if owner.has_enclosing_instance() {
            1
        } else {
            0
        };
        parameters.into_iter().skip(implicit).collect()
    }

    pub(crate) fn try_type_param_ids(&self) -> Result<Vec<TypeParamId>> {
        self.data
            .type_params
            .get_or_try_init(|| {
                let sig = self.signature()?;
                Ok(sig
                    .type_parameters
                    .iter()
                    .enumerate()
                    .map(|(index, param)| {
                        self.universe.alloc_type_param(TypeParamData::declared(
                            ElementId::Executable(self.id),
                            index,
                            self.module(),
                            param.clone(),
                        ))
                    })
                    .collect())
            })
            .cloned()
    }

    pub(crate) fn type_param_ids(&self) -> Vec<TypeParamId> {
        self.try_type_param_ids().unwrap_or_default()
    }

    pub fn type_parameters(&self) -> Result<Vec<TypeParameterElement<'u>>> {
        Ok(self
            .try_type_param_ids()?
            .into_iter()
            .map(|id| self.universe.type_parameter(id))
            .collect())
    }

    /// Formal parameters, named from `MethodParameters` when present and `argN` otherwise.
    pub fn parameters(&self) -> Result<Vec<VariableElement<'u>>> {
        let ids = self.data.parameters.get_or_try_init(|| {
            let count = self.signature()?.parameters.len();
            let infos = match &self.data.stub {
                Some(stub) if stub.parameters.len() == count => stub.parameters.clone(),
                Some(stub) => stub
                    .parameters
                    .iter()
                    .filter(|info| !is_implicit(info.access_flags))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            Ok((0..count)
                .map(|index| {
                    let info = (infos.len() == count).then(|| &infos[index]);
                    let name = info
                        .and_then(|info| info.name.clone())
                        .unwrap_or_else(|| format!("arg{index}"));
                    let flags = info.map_or(0, |info| info.access_flags);
                    self.universe
                        .alloc_variable(VariableData::parameter(self.id, index, name, flags))
                })
                .collect::<Vec<_>>())
        })?;
        Ok(ids.iter().map(|&id| self.universe.variable(id)).collect())
    }

    /// The parameter at `index`, or a missing placeholder when out of range.
    pub fn parameter(&self, index: usize) -> VariableElement<'u> {
        match self.parameters() {
            Ok(params) if index < params.len() => params[index].clone(),
            _ => self.universe.missing_parameter(self.id, index),
        }
    }

    pub fn executable_type(&self) -> Result<ExecutableType> {
        self.data
            .ty
            .get_or_try_init(|| {
                let sig = self.signature()?;
                let scope = Scope::new(self.universe, ElementId::Executable(self.id), self.module());
                let type_vars = self.try_type_param_ids()?;
                let return_type = match &sig.return_type {
                    Some(ty) => scope.mirror(ty),
                    None => TypeMirror::NoType(NoTypeKind::Void),
                };
                let params = sig.parameters.iter().map(|p| scope.mirror(p)).collect();
                let thrown = sig.throws.iter().map(|t| scope.mirror(t)).collect();
                Ok(ExecutableType {
                    type_vars,
                    return_type,
                    params,
                    receiver: self.receiver(),
                    thrown,
                })
            })
            .cloned()
    }

    fn receiver(&self) -> TypeMirror {
        let owner = self.owner();
        match self.data.kind {
            ElementKind::Method if !self.is_static() => owner.as_type(),
            ElementKind::Constructor if owner.has_enclosing_instance() => owner
                .enclosing_type()
                .map(|outer| self.universe.class(outer).as_type())
                .unwrap_or(TypeMirror::NoType(NoTypeKind::None)),
            _ => TypeMirror::NoType(NoTypeKind::None),
        }
    }

    pub fn return_type(&self) -> Result<TypeMirror> {
        Ok(self.executable_type()?.return_type)
    }

    pub fn thrown_types(&self) -> Result<Vec<TypeMirror>> {
        Ok(self.executable_type()?.thrown)
    }

    pub fn receiver_type(&self) -> Result<TypeMirror> {
        Ok(self.executable_type()?.receiver)
    }

    /// Default of an annotation type element.
    pub fn default_value(&self) -> Result<Option<AnnotationValue>> {
        let Some(value) = self.data.stub.as_ref().and_then(|s| s.annotation_default.as_ref())
        else {
            return Ok(None);
        };
        annotation::value_of(self.universe, self.module(), value).map(Some)
    }

    pub fn annotation_mirrors(&self) -> Result<Vec<AnnotationMirror>> {
        self.data
            .annotations
            .get_or_init(|| {
                let Some(stub) = &self.data.stub else {
                    return Ok(Vec::new());
                };
                stub.annotations
                    .iter()
                    .map(|a| annotation::mirror_of(self.universe, self.module(), a))
                    .collect()
            })
            .clone()
    }
}

impl fmt::Debug for ExecutableElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableElement")
            .field("id", &self.id)
            .field("owner", &self.data.owner)
            .field("name", &self.simple_name())
            .field("descriptor", &self.descriptor())
            .finish()
    }
}

impl PartialEq for ExecutableElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.universe, other.universe) && self.id == other.id
    }
}

impl Eq for ExecutableElement<'_> {}
