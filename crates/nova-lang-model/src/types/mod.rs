//! Type algebra over mirrors.
//!
//! Error types propagate without failing: subtyping treats them as compatible with every type,
//! and erasure and substitution pass them through.

mod capture;
mod inherit;
mod same;
mod subst;
mod subtype;
mod supertype;

use crate::arena::{ClassId, TypeParamId};
use crate::element::TypeElement;
use crate::error::{ModelError, Result};
use crate::lookup::OBJECT;
use crate::mirror::{DeclaredType, NoTypeKind, PrimitiveType, TypeMirror, WildcardBound};
use crate::Universe;

#[derive(Debug, Clone, Copy)]
pub struct Types<'u> {
    universe: &'u Universe,
}

impl<'u> Types<'u> {
    pub(crate) fn new(universe: &'u Universe) -> Self {
        Self { universe }
    }

    pub fn universe(&self) -> &'u Universe {
        self.universe
    }

    /// Declared mirror of `element`, or an error mirror when the element is missing.
    pub(crate) fn class_type(&self, element: ClassId, args: Vec<TypeMirror>) -> TypeMirror {
        let declared = DeclaredType::new(element, args);
        if self.universe.class(element).is_missing() {
            TypeMirror::Error(declared)
        } else {
            TypeMirror::Declared(declared)
        }
    }

    pub(crate) fn well_known_type(&self, internal_name: &str) -> TypeMirror {
        self.class_type(self.universe.well_known(internal_name), Vec::new())
    }

    pub fn object_type(&self) -> TypeMirror {
        self.well_known_type(OBJECT)
    }

    pub(crate) fn is_object(&self, ty: &TypeMirror) -> bool {
        ty.element() == Some(self.universe.well_known(OBJECT))
    }

    pub fn primitive(&self, kind: PrimitiveType) -> TypeMirror {
        TypeMirror::Primitive(kind)
    }

    pub fn null_type(&self) -> TypeMirror {
        TypeMirror::Null
    }

    /// `NONE` or `VOID`.
    pub fn no_type(&self, kind: NoTypeKind) -> Result<TypeMirror> {
        match kind {
            NoTypeKind::None | NoTypeKind::Void => Ok(TypeMirror::NoType(kind)),
            other => Err(ModelError::IllegalArgument(format!(
                "no pseudo-type of kind {other:?}"
            ))),
        }
    }

    pub fn array_of(&self, component: TypeMirror) -> Result<TypeMirror> {
        match component {
            TypeMirror::Primitive(_)
            | TypeMirror::Declared(_)
            | TypeMirror::Error(_)
            | TypeMirror::Array(_)
            | TypeMirror::TypeVar(_) => Ok(TypeMirror::array(component)),
            other => Err(ModelError::IllegalArgument(format!(
                "{:?} is not a valid array component",
                other.kind()
            ))),
        }
    }

    /// `element<args>`. `args` must be empty (raw or non-generic) or match the element's type
    /// parameter count, and contain only reference types and wildcards.
    pub fn declared_type(&self, element: ClassId, args: Vec<TypeMirror>) -> Result<TypeMirror> {
        let class = self.universe.class(element);
        let expected = class.type_param_ids().len();
        if !args.is_empty() && args.len() != expected {
            return Err(ModelError::InvalidTypeArguments {
                element: class.binary_name(),
                expected,
                found: args.len(),
            });
        }
        if let Some(bad) = args
            .iter()
            .find(|arg| !arg.is_reference() || matches!(arg, TypeMirror::Null))
            .filter(|arg| !matches!(arg, TypeMirror::Wildcard(_)))
        {
            return Err(ModelError::IllegalArgument(format!(
                "{:?} is not a valid type argument",
                bad.kind()
            )));
        }
        Ok(self.class_type(element, args))
    }

    /// Like [`Types::declared_type`], as a member of the parameterized `enclosing` type.
    pub fn declared_type_in(
        &self,
        enclosing: &TypeMirror,
        element: ClassId,
        args: Vec<TypeMirror>,
    ) -> Result<TypeMirror> {
        let ty = self.declared_type(element, args)?;
        Ok(ty.with_enclosing(Some(enclosing.clone())))
    }

    pub fn wildcard(
        &self,
        extends: Option<TypeMirror>,
        super_bound: Option<TypeMirror>,
    ) -> Result<TypeMirror> {
        let bound = match (extends, super_bound) {
            (None, None) => WildcardBound::Unbounded,
            (Some(upper), None) => WildcardBound::Extends(Box::new(upper)),
            (None, Some(lower)) => WildcardBound::Super(Box::new(lower)),
            (Some(_), Some(_)) => {
                return Err(ModelError::IllegalArgument(
                    "a wildcard takes at most one bound".to_string(),
                ))
            }
        };
        Ok(TypeMirror::Wildcard(bound))
    }

    /// The class wrapping `primitive` (`int` -> `java.lang.Integer`).
    pub fn boxed_class(&self, primitive: PrimitiveType) -> TypeElement<'u> {
        self.universe.lookup().boxed_class(primitive)
    }

    /// The primitive that `ty` unboxes to.
    pub fn unboxed_type(&self, ty: &TypeMirror) -> Result<TypeMirror> {
        let unboxed = match ty {
            TypeMirror::Declared(d) => {
                let class = self.universe.class(d.element);
                PrimitiveType::from_box_internal_name(class.internal_name())
            }
            TypeMirror::TypeVar(id) => {
                return self.unboxed_type(&self.upper_bound(*id));
            }
            _ => None,
        };
        unboxed.map(TypeMirror::Primitive).ok_or_else(|| {
            ModelError::IllegalArgument(format!("{:?} has no unboxing conversion", ty.kind()))
        })
    }

    /// Declared bounds of a type variable; an empty list stands for `java.lang.Object`.
    pub(crate) fn bounds(&self, id: TypeParamId) -> Vec<TypeMirror> {
        self.universe.type_parameter(id).bounds()
    }

    /// Bounds with the implicit `java.lang.Object` made explicit.
    pub(crate) fn bound_list(&self, id: TypeParamId) -> Vec<TypeMirror> {
        let bounds = self.bounds(id);
        if bounds.is_empty() {
            vec![self.object_type()]
        } else {
            bounds
        }
    }

    /// The single bound, or the intersection of all of them.
    pub fn upper_bound(&self, id: TypeParamId) -> TypeMirror {
        let mut bounds = self.bound_list(id);
        if bounds.len() == 1 {
            bounds.remove(0)
        } else {
            TypeMirror::Intersection(bounds)
        }
    }

    /// The null type unless the variable is the capture of a `? super` wildcard.
    pub fn lower_bound(&self, id: TypeParamId) -> TypeMirror {
        self.universe
            .type_parameter(id)
            .lower_bound()
            .unwrap_or(TypeMirror::Null)
    }
}
