use std::fmt;
use std::sync::Arc;

use nova_classfile::TypeParameter;

use crate::arena::{ModuleId, TypeParamId};
use crate::element::ElementId;
use crate::memo::Deferred;
use crate::mirror::TypeMirror;
use crate::scope::Scope;
use crate::Universe;

pub(crate) enum TypeParamOrigin {
    /// Declared in a class or method signature; bounds are resolved on first use.
    Declared(TypeParameter),
    /// Introduced by substitution; bounds are swapped in by the creator.
    Fresh,
    /// Introduced by capture conversion of a wildcard.
    Captured,
}

pub(crate) struct TypeParamData {
    pub(crate) name: String,
    pub(crate) owner: Option<ElementId>,
    pub(crate) index: usize,
    pub(crate) module: ModuleId,
    pub(crate) origin: TypeParamOrigin,
    /// Empty until resolved; an empty list reads as `java.lang.Object`.
    pub(crate) bounds: Deferred<Vec<TypeMirror>>,
    pub(crate) lower: Deferred<Option<TypeMirror>>,
}

impl TypeParamData {
    pub(crate) fn declared(
        owner: ElementId,
        index: usize,
        module: ModuleId,
        param: TypeParameter,
    ) -> Self {
        Self {
            name: param.name.clone(),
            owner: Some(owner),
            index,
            module,
            origin: TypeParamOrigin::Declared(param),
            bounds: Deferred::new(Vec::new()),
            lower: Deferred::new(None),
        }
    }

    pub(crate) fn fresh(name: String, owner: Option<ElementId>, index: usize, module: ModuleId) -> Self {
        Self {
            name,
            owner,
            index,
            module,
            origin: TypeParamOrigin::Fresh,
            bounds: Deferred::new(Vec::new()),
            lower: Deferred::new(None),
        }
    }

    pub(crate) fn captured(name: String, index: usize, module: ModuleId) -> Self {
        Self {
            origin: TypeParamOrigin::Captured,
            ..Self::fresh(name, None, index, module)
        }
    }
}

#[derive(Clone)]
pub struct TypeParameterElement<'u> {
    universe: &'u Universe,
    id: TypeParamId,
    data: Arc<TypeParamData>,
}

impl<'u> TypeParameterElement<'u> {
    pub(crate) fn new(universe: &'u Universe, id: TypeParamId, data: Arc<TypeParamData>) -> Self {
        Self { universe, id, data }
    }

    pub fn id(&self) -> TypeParamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn index(&self) -> usize {
        self.data.index
    }

    /// The declaring class or executable; `None` for capture variables.
    pub fn generic_element(&self) -> Option<ElementId> {
        self.data.owner
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.data.origin, TypeParamOrigin::Captured)
    }

    pub fn as_type(&self) -> TypeMirror {
        TypeMirror::TypeVar(self.id)
    }

    /// Bounds in declaration order. Declared bounds are resolved here, after the parameter
    /// itself is published, so `T extends Comparable<T>` refers back to this very node.
    pub fn bounds(&self) -> Vec<TypeMirror> {
        match &self.data.origin {
            TypeParamOrigin::Declared(param) => self
                .data
                .bounds
                .get_or_swap(|| {
                    let Some(owner) = self.data.owner else {
                        return Vec::new();
                    };
                    let scope = Scope::new(self.universe, owner, self.data.module);
                    param
                        .class_bound
                        .iter()
                        .chain(&param.interface_bounds)
                        .map(|bound| scope.mirror(bound))
                        .collect()
                })
                .clone(),
            TypeParamOrigin::Fresh | TypeParamOrigin::Captured => self.data.bounds.get().clone(),
        }
    }

    /// Lower bound of a capture of `? super L`.
    pub fn lower_bound(&self) -> Option<TypeMirror> {
        self.data.lower.get().clone()
    }

    /// Install the bounds of a fresh or captured variable. Later calls are ignored.
    pub(crate) fn set_bounds(&self, bounds: Vec<TypeMirror>, lower: Option<TypeMirror>) {
        if self.data.bounds.swap(bounds).is_err() {
            tracing::trace!(target: "nova.lang_model", name = %self.data.name, "bounds already set");
        }
        let _ = self.data.lower.swap(lower);
    }

    pub(crate) fn universe(&self) -> &'u Universe {
        self.universe
    }
}

impl fmt::Debug for TypeParameterElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeParameterElement")
            .field("id", &self.id)
            .field("name", &self.data.name)
            .field("owner", &self.data.owner)
            .finish()
    }
}

impl PartialEq for TypeParameterElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.universe, other.universe) && self.id == other.id
    }
}

impl Eq for TypeParameterElement<'_> {}
