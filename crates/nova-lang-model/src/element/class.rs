use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use nova_classfile::access::{self, has};
use nova_classfile::{parse_class_signature, ClassSignature, ClassStub, ClassTypeSignature};

use crate::annotation::{self, AnnotationMirror};
use crate::archive::Archive;
use crate::arena::{ClassId, ExecutableId, ModuleId, PackageId, TypeParamId, VariableId};
use crate::element::executable::ExecutableData;
use crate::element::type_param::TypeParamData;
use crate::element::variable::VariableData;
use crate::element::{
    modifiers_from_flags, ElementId, ElementKind, ExecutableElement, FlagSite, Modifier,
    Modifiers, ModuleElement, PackageElement, TypeParameterElement, VariableElement,
};
use crate::error::{ModelError, Result};
use crate::memo::Memo;
use crate::mirror::{DeclaredType, NoTypeKind, TypeMirror};
use crate::names::{self, Names};
use crate::scope::Scope;
use crate::Universe;

const RECORD: &str = "java/lang/Record";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestingKind {
    TopLevel,
    Member,
    Local,
    Anonymous,
}

pub(crate) enum ClassSource {
    Archive(Arc<dyn Archive>),
    Missing,
}

pub(crate) struct ClassData {
    pub(crate) internal_name: String,
    pub(crate) module: ModuleId,
    pub(crate) package: Option<PackageId>,
    source: ClassSource,
    stub: Memo<Result<Arc<ClassStub>>>,
    names: Memo<Names>,
    signature: Memo<Result<Option<Arc<ClassSignature>>>>,
    type_params: Memo<Result<Vec<TypeParamId>>>,
    supertypes: Memo<Result<Supertypes>>,
    members: Memo<Result<Arc<Members>>>,
    annotations: Memo<Result<Vec<AnnotationMirror>>>,
}

#[derive(Debug, Clone)]
struct Supertypes {
    superclass: TypeMirror,
    interfaces: Vec<TypeMirror>,
}

pub(crate) struct Members {
    pub(crate) executables: Vec<ExecutableId>,
    by_signature: HashMap<(String, String), ExecutableId>,
    pub(crate) fields: Vec<VariableId>,
    fields_by_name: HashMap<String, VariableId>,
    pub(crate) static_init: Option<ExecutableId>,
    pub(crate) instance_init: ExecutableId,
}

impl ClassData {
    pub(crate) fn resolved(
        internal_name: String,
        module: ModuleId,
        package: PackageId,
        archive: Arc<dyn Archive>,
    ) -> Self {
        Self::with_source(internal_name, module, Some(package), ClassSource::Archive(archive))
    }

    pub(crate) fn missing(internal_name: String, module: ModuleId) -> Self {
        Self::with_source(internal_name, module, None, ClassSource::Missing)
    }

    fn with_source(
        internal_name: String,
        module: ModuleId,
        package: Option<PackageId>,
        source: ClassSource,
    ) -> Self {
        Self {
            internal_name,
            module,
            package,
            source,
            stub: Memo::new(),
            names: Memo::new(),
            signature: Memo::new(),
            type_params: Memo::new(),
            supertypes: Memo::new(),
            members: Memo::new(),
            annotations: Memo::new(),
        }
    }
}

/// A class, interface, enum, record or annotation type; or the placeholder standing in for an
/// internal name that resolved nowhere.
#[derive(Clone)]
pub struct TypeElement<'u> {
    universe: &'u Universe,
    id: ClassId,
    data: Arc<ClassData>,
}

impl<'u> TypeElement<'u> {
    pub(crate) fn new(universe: &'u Universe, id: ClassId, data: Arc<ClassData>) -> Self {
        Self { universe, id, data }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.data.source, ClassSource::Missing)
    }

    pub fn internal_name(&self) -> &str {
        &self.data.internal_name
    }

    /// `java.util.Map$Entry` for `java/util/Map$Entry`.
    pub fn binary_name(&self) -> String {
        self.data.internal_name.replace('/', ".")
    }

    /// For a missing type, the module it was requested from.
    pub fn module(&self) -> ModuleElement<'u> {
        self.universe.module(self.data.module)
    }

    pub fn package(&self) -> Option<PackageElement<'u>> {
        self.data.package.map(|id| self.universe.package(id))
    }

    /// The backing stub; `None` for missing types. A failed read is memoized and replayed.
    pub(crate) fn stub(&self) -> Result<Option<Arc<ClassStub>>> {
        let ClassSource::Archive(archive) = &self.data.source else {
            return Ok(None);
        };
        self.data
            .stub
            .get_or_try_init(|| {
                archive
                    .read_class(&self.data.internal_name)
                    .map(Arc::new)
                    .map_err(|err| {
                        tracing::debug!(
                            target: "nova.lang_model",
                            internal_name = %self.data.internal_name,
                            error = %err,
                            "failed to read class"
                        );
                        ModelError::from(err)
                    })
            })
            .map(|stub| Some(Arc::clone(stub)))
    }

    fn names(&self) -> &Names {
        self.data.names.get_or_init(|| match self.stub() {
            Ok(Some(stub)) => names::derive(&self.data.internal_name, &stub.inner_classes),
            _ => Names::top_level(&self.data.internal_name),
        })
    }

    pub fn nesting_kind(&self) -> NestingKind {
        self.names().nesting
    }

    pub fn simple_name(&self) -> String {
        self.names().simple.clone()
    }

    /// Canonical name; empty for local and anonymous classes.
    pub fn qualified_name(&self) -> String {
        self.names().qualified.clone()
    }

    pub(crate) fn access_flags(&self) -> u16 {
        let class_flags = self
            .stub()
            .ok()
            .flatten()
            .map_or(access::ACC_PUBLIC, |stub| stub.access_flags);
        let type_bits = access::ACC_INTERFACE | access::ACC_ANNOTATION | access::ACC_ENUM;
        match self.names().inner_flags {
            Some(inner) => inner | (class_flags & type_bits),
            None => class_flags,
        }
    }

    pub fn kind(&self) -> ElementKind {
        if self.is_missing() || self.nesting_kind() == NestingKind::Anonymous {
            return ElementKind::Class;
        }
        let flags = self.access_flags();
        if has(flags, access::ACC_ANNOTATION) {
            ElementKind::AnnotationType
        } else if has(flags, access::ACC_INTERFACE) {
            ElementKind::Interface
        } else if has(flags, access::ACC_ENUM) {
            ElementKind::Enum
        } else if self.super_class_name().as_deref() == Some(RECORD) {
            ElementKind::Record
        } else {
            ElementKind::Class
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind().is_interface()
    }

    pub fn modifiers(&self) -> Modifiers {
        let mut modifiers = modifiers_from_flags(self.access_flags(), FlagSite::Type);
        if self.nesting_kind() != NestingKind::Member {
            modifiers.remove(&Modifier::Static);
        } else if matches!(
            self.kind(),
            ElementKind::Interface
                | ElementKind::AnnotationType
                | ElementKind::Enum
                | ElementKind::Record
        ) {
            modifiers.insert(Modifier::Static);
        }
        modifiers
    }

    pub fn is_static(&self) -> bool {
        self.modifiers().contains(&Modifier::Static)
    }

    /// Whether instances carry an enclosing instance of the outer class.
    pub fn has_enclosing_instance(&self) -> bool {
        self.nesting_kind() == NestingKind::Member && !self.is_static()
    }

    pub(crate) fn super_class_name(&self) -> Option<String> {
        self.stub().ok().flatten()?.super_class.clone()
    }

    /// Superclass element straight from the stub, bypassing generic signatures.
    pub(crate) fn superclass_id(&self) -> Option<ClassId> {
        if self.is_interface() {
            return None;
        }
        let name = self.super_class_name()?;
        Some(self.universe.resolve_id(&name, Some(self.data.module)))
    }

    pub(crate) fn interface_ids(&self) -> Vec<ClassId> {
        let Ok(Some(stub)) = self.stub() else {
            return Vec::new();
        };
        stub.interfaces
            .iter()
            .map(|name| self.universe.resolve_id(name, Some(self.data.module)))
            .collect()
    }

    fn signature(&self) -> Result<Option<Arc<ClassSignature>>> {
        self.data
            .signature
            .get_or_try_init(|| {
                let Some(stub) = self.stub()? else {
                    return Ok(None);
                };
                let Some(raw) = stub.signature.as_deref() else {
                    return Ok(None);
                };
                parse_class_signature(raw).map(|sig| Some(Arc::new(sig))).map_err(|err| {
                    tracing::debug!(
                        target: "nova.lang_model",
                        internal_name = %self.data.internal_name,
                        error = %err,
                        "failed to decode class signature"
                    );
                    ModelError::decode(self.binary_name(), err)
                })
            })
            .cloned()
    }

    fn scope(&self) -> Scope<'u> {
        Scope::new(self.universe, ElementId::Type(self.id), self.data.module)
    }

    pub fn type_parameters(&self) -> Result<Vec<TypeParameterElement<'u>>> {
        Ok(self
            .try_type_param_ids()?
            .into_iter()
            .map(|id| self.universe.type_parameter(id))
            .collect())
    }

    pub(crate) fn try_type_param_ids(&self) -> Result<Vec<TypeParamId>> {
        self.data
            .type_params
            .get_or_try_init(|| {
                let Some(sig) = self.signature()? else {
                    return Ok(Vec::new());
                };
                Ok(sig
                    .type_parameters
                    .iter()
                    .enumerate()
                    .map(|(index, param)| {
                        self.universe.alloc_type_param(TypeParamData::declared(
                            ElementId::Type(self.id),
                            index,
                            self.data.module,
                            param.clone(),
                        ))
                    })
                    .collect())
            })
            .cloned()
    }

    /// Declared type parameters; a class whose signature fails to decode is treated as
    /// non-generic.
    pub(crate) fn type_param_ids(&self) -> Vec<TypeParamId> {
        self.try_type_param_ids().unwrap_or_default()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_param_ids().is_empty()
    }

    fn supertypes(&self) -> Result<&Supertypes> {
        self.data.supertypes.get_or_try_init(|| {
            let none = TypeMirror::NoType(NoTypeKind::None);
            let Some(stub) = self.stub()? else {
                return Ok(Supertypes {
                    superclass: none,
                    interfaces: Vec::new(),
                });
            };
            let scope = self.scope();
            let signature = self.signature()?;

            let superclass = match (&stub.super_class, &signature) {
                _ if self.is_interface() => none,
                (None, _) => none,
                (Some(_), Some(sig)) => scope.class_mirror(&sig.super_class),
                (Some(name), None) => scope.class_mirror(&ClassTypeSignature::simple(name)),
            };
            let interfaces = match &signature {
                Some(sig) => sig.interfaces.iter().map(|i| scope.class_mirror(i)).collect(),
                None => stub
                    .interfaces
                    .iter()
                    .map(|name| scope.class_mirror(&ClassTypeSignature::simple(name)))
                    .collect(),
            };
            Ok(Supertypes {
                superclass,
                interfaces,
            })
        })
    }

    /// Direct superclass as written in the declaration (`NoType` for interfaces and the root
    /// class).
    pub fn superclass(&self) -> Result<TypeMirror> {
        Ok(self.supertypes()?.superclass.clone())
    }

    pub fn interfaces(&self) -> Result<Vec<TypeMirror>> {
        Ok(self.supertypes()?.interfaces.clone())
    }

    /// The generic type `C<T1..Tn>`, with its parameterized enclosing instance type when there
    /// is one. Missing types yield an error type.
    pub fn as_type(&self) -> TypeMirror {
        if self.is_missing() {
            return TypeMirror::Error(DeclaredType::new(self.id, Vec::new()));
        }

        let mut chain = vec![self.clone()];
        let mut visited = HashSet::from([self.id]);
        while let Some(last) = chain.last() {
            if !last.has_enclosing_instance() {
                break;
            }
            let Some(outer) = last.enclosing_type() else {
                break;
            };
            if !visited.insert(outer) {
                break;
            }
            chain.push(self.universe.class(outer));
        }

        let mut mirror: Option<TypeMirror> = None;
        for class in chain.iter().rev() {
            let args = class
                .type_param_ids()
                .into_iter()
                .map(TypeMirror::TypeVar)
                .collect();
            let next = TypeMirror::declared(class.id, args);
            mirror = Some(next.with_enclosing(mirror));
        }
        mirror.unwrap_or_else(|| TypeMirror::declared(self.id, Vec::new()))
    }

    fn outer_by_name(&self) -> Option<ClassId> {
        let names = self.names();
        let outer = match names.nesting {
            NestingKind::TopLevel => return None,
            NestingKind::Member | NestingKind::Anonymous => names.outer.clone(),
            NestingKind::Local => self
                .data
                .internal_name
                .rsplit_once('$')
                .map(|(outer, _)| outer.to_string()),
        }?;
        Some(self.universe.resolve_id(&outer, Some(self.data.module)))
    }

    /// The innermost type lexically enclosing this one.
    pub fn enclosing_type(&self) -> Option<ClassId> {
        match self.enclosing_element()? {
            ElementId::Type(id) => Some(id),
            ElementId::Executable(id) => Some(self.universe.executable(id).owner().id()),
            _ => None,
        }
    }

    /// Package for top-level types, outer type for members, enclosing method or initializer
    /// for local and anonymous classes.
    pub fn enclosing_element(&self) -> Option<ElementId> {
        if self.is_missing() {
            return None;
        }
        let nesting = self.nesting_kind();
        if nesting == NestingKind::TopLevel {
            return self.data.package.map(ElementId::Package);
        }

        let stub = self.stub().ok().flatten();
        if nesting != NestingKind::Member {
            if let Some(enclosing) = stub.as_ref().and_then(|s| s.enclosing_method.clone()) {
                let owner = self
                    .universe
                    .class(self.universe.resolve_id(&enclosing.class, Some(self.data.module)));
                return Some(match enclosing.method {
                    Some((name, descriptor)) => match owner.method(&name, &descriptor) {
                        Ok(Some(method)) => ElementId::Executable(method.id()),
                        _ => ElementId::Type(owner.id()),
                    },
                    None => self.initializer_of(&owner),
                });
            }
        }

        let outer = self.universe.class(self.outer_by_name()?);
        Some(match nesting {
            NestingKind::Local => self.initializer_of(&outer),
            _ => ElementId::Type(outer.id()),
        })
    }

    /// Initializer that declares this local/anonymous class: the instance initializer when the
    /// class captures an outer instance (`this$N`), the static initializer otherwise.
    fn initializer_of(&self, owner: &TypeElement<'u>) -> ElementId {
        let captures_outer = self
            .stub()
            .ok()
            .flatten()
            .is_some_and(|stub| stub.fields.iter().any(|f| f.name.starts_with("this$")));
        match owner.members() {
            Ok(members) => match (captures_outer, members.static_init) {
                (false, Some(static_init)) => ElementId::Executable(static_init),
                _ => ElementId::Executable(members.instance_init),
            },
            Err(_) => ElementId::Type(owner.id()),
        }
    }

    pub(crate) fn members(&self) -> Result<Arc<Members>> {
        self.data
            .members
            .get_or_try_init(|| {
                let stub = self.stub()?;
                let mut executables = Vec::new();
                let mut by_signature = HashMap::new();
                let mut static_init = None;
                let mut fields = Vec::new();
                let mut fields_by_name = HashMap::new();

                if let Some(stub) = &stub {
                    for method in &stub.methods {
                        let data = ExecutableData::from_stub(self.id, method.clone());
                        let is_static_init = data.kind == ElementKind::StaticInit;
                        let id = self.universe.alloc_executable(data);
                        if is_static_init {
                            static_init = Some(id);
                        }
                        by_signature.insert((method.name.clone(), method.descriptor.clone()), id);
                        executables.push(id);
                    }
                    for field in &stub.fields {
                        let id = self
                            .universe
                            .alloc_variable(VariableData::field(self.id, field.clone()));
                        fields_by_name.entry(field.name.clone()).or_insert(id);
                        fields.push(id);
                    }
                }
                let instance_init = self
                    .universe
                    .alloc_executable(ExecutableData::instance_initializer(self.id));

                Ok(Arc::new(Members {
                    executables,
                    by_signature,
                    fields,
                    fields_by_name,
                    static_init,
                    instance_init,
                }))
            })
            .map(Arc::clone)
    }

    /// Every method record of the class, synthetic and bridge methods and initializers included.
    pub fn all_executables(&self) -> Result<Vec<ExecutableElement<'u>>> {
        Ok(self
            .members()?
            .executables
            .iter()
            .map(|&id| self.universe.executable(id))
            .collect())
    }

    /// Declared methods, synthetic ones excluded.
    pub fn methods(&self) -> Result<Vec<ExecutableElement<'u>>> {
        Ok(self
            .all_executables()?
            .into_iter()
            .filter(|e| e.kind() == ElementKind::Method && !e.is_synthetic())
            .collect())
    }

    pub fn constructors(&self) -> Result<Vec<ExecutableElement<'u>>> {
        Ok(self
            .all_executables()?
            .into_iter()
            .filter(|e| e.kind() == ElementKind::Constructor && !e.is_synthetic())
            .collect())
    }

    pub fn fields(&self) -> Result<Vec<VariableElement<'u>>> {
        Ok(self
            .members()?
            .fields
            .iter()
            .map(|&id| self.universe.variable(id))
            .filter(|f| !f.is_synthetic())
            .collect())
    }

    /// Member types declared through this class's inner-class records.
    pub fn member_types(&self) -> Result<Vec<TypeElement<'u>>> {
        let Some(stub) = self.stub()? else {
            return Ok(Vec::new());
        };
        Ok(stub
            .inner_classes
            .iter()
            .filter(|record| {
                record.outer_class.as_deref() == Some(self.data.internal_name.as_str())
                    && record.inner_name.is_some()
                    && !has(record.access_flags, access::ACC_SYNTHETIC)
            })
            .map(|record| {
                self.universe
                    .class(self.universe.resolve_id(&record.inner_class, Some(self.data.module)))
            })
            .collect())
    }

    /// Fields, constructors, methods and member types.
    pub fn enclosed_elements(&self) -> Result<Vec<ElementId>> {
        let mut out: Vec<ElementId> = self.fields()?.iter().map(|f| f.id().into()).collect();
        out.extend(
            self.all_executables()?
                .iter()
                .filter(|e| {
                    matches!(e.kind(), ElementKind::Method | ElementKind::Constructor)
                        && !e.is_synthetic()
                        && !e.is_bridge()
                })
                .map(|e| ElementId::from(e.id())),
        );
        out.extend(self.member_types()?.iter().map(|t| ElementId::from(t.id())));
        Ok(out)
    }

    /// Lookup by name and erased descriptor.
    pub fn method(&self, name: &str, descriptor: &str) -> Result<Option<ExecutableElement<'u>>> {
        Ok(self
            .members()?
            .by_signature
            .get(&(name.to_string(), descriptor.to_string()))
            .map(|&id| self.universe.executable(id)))
    }

    pub fn methods_named(&self, name: &str) -> Result<Vec<ExecutableElement<'u>>> {
        Ok(self
            .methods()?
            .into_iter()
            .filter(|m| m.simple_name() == name)
            .collect())
    }

    pub fn field(&self, name: &str) -> Result<Option<VariableElement<'u>>> {
        Ok(self
            .members()?
            .fields_by_name
            .get(name)
            .map(|&id| self.universe.variable(id)))
    }

    pub fn annotation_mirrors(&self) -> Result<Vec<AnnotationMirror>> {
        self.data
            .annotations
            .get_or_init(|| {
                let Some(stub) = self.stub()? else {
                    return Ok(Vec::new());
                };
                stub.annotations
                    .iter()
                    .map(|a| annotation::mirror_of(self.universe, self.data.module, a))
                    .collect()
            })
            .clone()
    }

    pub(crate) fn universe(&self) -> &'u Universe {
        self.universe
    }
}

impl fmt::Debug for TypeElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeElement")
            .field("id", &self.id)
            .field("internal_name", &self.data.internal_name)
            .field("missing", &self.is_missing())
            .finish()
    }
}

impl PartialEq for TypeElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.universe, other.universe) && self.id == other.id
    }
}

impl Eq for TypeElement<'_> {}
