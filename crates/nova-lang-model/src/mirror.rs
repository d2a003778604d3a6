//! Type mirrors: freely constructed values, compared structurally, referencing elements by
//! handle.

use nova_classfile::BaseType;

use crate::arena::{ClassId, TypeParamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Char,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean)
    }

    /// Widening primitive conversion (JLS 5.1.2), identity included.
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        use PrimitiveType::*;
        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Double | Boolean => false,
        }
    }

    /// Internal name of the wrapper class.
    pub fn box_internal_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java/lang/Boolean",
            PrimitiveType::Byte => "java/lang/Byte",
            PrimitiveType::Short => "java/lang/Short",
            PrimitiveType::Int => "java/lang/Integer",
            PrimitiveType::Long => "java/lang/Long",
            PrimitiveType::Char => "java/lang/Character",
            PrimitiveType::Float => "java/lang/Float",
            PrimitiveType::Double => "java/lang/Double",
        }
    }

    pub fn from_box_internal_name(internal_name: &str) -> Option<Self> {
        PrimitiveType::ALL
            .into_iter()
            .find(|p| p.box_internal_name() == internal_name)
    }
}

impl From<BaseType> for PrimitiveType {
    fn from(base: BaseType) -> Self {
        match base {
            BaseType::Boolean => PrimitiveType::Boolean,
            BaseType::Byte => PrimitiveType::Byte,
            BaseType::Short => PrimitiveType::Short,
            BaseType::Int => PrimitiveType::Int,
            BaseType::Long => PrimitiveType::Long,
            BaseType::Char => PrimitiveType::Char,
            BaseType::Float => PrimitiveType::Float,
            BaseType::Double => PrimitiveType::Double,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoTypeKind {
    None,
    Void,
    Package,
    Module,
}

/// A class or interface type: the element plus its type arguments.
///
/// `enclosing` is only recorded when the enclosing type is itself parameterized
/// (`Outer<String>.Inner`); a raw or non-generic enclosing type is left out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    pub element: ClassId,
    pub enclosing: Option<Box<TypeMirror>>,
    pub args: Vec<TypeMirror>,
}

impl DeclaredType {
    pub fn new(element: ClassId, args: Vec<TypeMirror>) -> Self {
        Self {
            element,
            enclosing: None,
            args,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty() || self.enclosing.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<TypeMirror>),
    Super(Box<TypeMirror>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutableType {
    pub type_vars: Vec<TypeParamId>,
    pub return_type: TypeMirror,
    pub params: Vec<TypeMirror>,
    /// `NoType(None)` for static methods, initializers and top-level constructors.
    pub receiver: TypeMirror,
    pub thrown: Vec<TypeMirror>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeMirror {
    Primitive(PrimitiveType),
    Declared(DeclaredType),
    /// A reference to a type that could not be resolved.
    Error(DeclaredType),
    Array(Box<TypeMirror>),
    TypeVar(TypeParamId),
    Wildcard(WildcardBound),
    Intersection(Vec<TypeMirror>),
    Executable(Box<ExecutableType>),
    NoType(NoTypeKind),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
    None,
    Null,
    Array,
    Declared,
    Error,
    TypeVar,
    Wildcard,
    Package,
    Executable,
    Module,
    Intersection,
}

impl TypeMirror {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeMirror::Primitive(p) => match p {
                PrimitiveType::Boolean => TypeKind::Boolean,
                PrimitiveType::Byte => TypeKind::Byte,
                PrimitiveType::Short => TypeKind::Short,
                PrimitiveType::Int => TypeKind::Int,
                PrimitiveType::Long => TypeKind::Long,
                PrimitiveType::Char => TypeKind::Char,
                PrimitiveType::Float => TypeKind::Float,
                PrimitiveType::Double => TypeKind::Double,
            },
            TypeMirror::Declared(_) => TypeKind::Declared,
            TypeMirror::Error(_) => TypeKind::Error,
            TypeMirror::Array(_) => TypeKind::Array,
            TypeMirror::TypeVar(_) => TypeKind::TypeVar,
            TypeMirror::Wildcard(_) => TypeKind::Wildcard,
            TypeMirror::Intersection(_) => TypeKind::Intersection,
            TypeMirror::Executable(_) => TypeKind::Executable,
            TypeMirror::NoType(NoTypeKind::None) => TypeKind::None,
            TypeMirror::NoType(NoTypeKind::Void) => TypeKind::Void,
            TypeMirror::NoType(NoTypeKind::Package) => TypeKind::Package,
            TypeMirror::NoType(NoTypeKind::Module) => TypeKind::Module,
            TypeMirror::Null => TypeKind::Null,
        }
    }

    pub fn declared(element: ClassId, args: Vec<TypeMirror>) -> Self {
        TypeMirror::Declared(DeclaredType::new(element, args))
    }

    pub fn array(component: TypeMirror) -> Self {
        TypeMirror::Array(Box::new(component))
    }

    pub fn extends_wildcard(bound: TypeMirror) -> Self {
        TypeMirror::Wildcard(WildcardBound::Extends(Box::new(bound)))
    }

    pub fn super_wildcard(bound: TypeMirror) -> Self {
        TypeMirror::Wildcard(WildcardBound::Super(Box::new(bound)))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeMirror::Primitive(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeMirror::Error(_))
    }

    /// Declared, error, array, type-variable, intersection and null types.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            TypeMirror::Declared(_)
                | TypeMirror::Error(_)
                | TypeMirror::Array(_)
                | TypeMirror::TypeVar(_)
                | TypeMirror::Intersection(_)
                | TypeMirror::Null
        )
    }

    /// The class element of a declared or error type.
    pub fn element(&self) -> Option<ClassId> {
        self.as_declared().map(|d| d.element)
    }

    pub fn as_declared(&self) -> Option<&DeclaredType> {
        match self {
            TypeMirror::Declared(d) | TypeMirror::Error(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_executable(&self) -> Option<&ExecutableType> {
        match self {
            TypeMirror::Executable(exec) => Some(exec),
            _ => None,
        }
    }

    /// Same element, new type arguments.
    pub fn with_args(&self, args: Vec<TypeMirror>) -> Self {
        match self {
            TypeMirror::Declared(d) => TypeMirror::Declared(DeclaredType {
                args,
                ..d.clone()
            }),
            TypeMirror::Error(d) => TypeMirror::Error(DeclaredType {
                args,
                ..d.clone()
            }),
            other => other.clone(),
        }
    }

    /// Same element, new enclosing type. A non-parameterized enclosing type is dropped.
    pub fn with_enclosing(&self, enclosing: Option<TypeMirror>) -> Self {
        let enclosing = enclosing
            .filter(|e| matches!(e, TypeMirror::Declared(d) if d.is_parameterized()))
            .map(Box::new);
        match self {
            TypeMirror::Declared(d) => TypeMirror::Declared(DeclaredType {
                enclosing,
                ..d.clone()
            }),
            other => other.clone(),
        }
    }
}
