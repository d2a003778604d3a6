use crate::element::TypeParamData;
use crate::mirror::{DeclaredType, TypeMirror, WildcardBound};

use super::Types;

impl<'u> Types<'u> {
    /// Capture conversion whose variables are shared by every caller passing an equal type.
    /// Capture variables only ever relate to themselves, so a query answered against a
    /// shared capture gives the same result as one against a fresh capture.
    pub(crate) fn shared_capture(&self, ty: &TypeMirror) -> TypeMirror {
        if !has_wildcard_arguments(ty) {
            return ty.clone();
        }
        self.universe
            .caches
            .captures
            .get_or_insert_with(ty.clone(), || self.capture(ty))
    }

    /// Capture conversion: each wildcard argument of a declared type becomes a fresh type
    /// variable. Every call produces new variables; types without wildcards come back as is.
    ///
    /// Subtyping and assignability use [`Types::shared_capture`] instead, which does not
    /// allocate again for a type it has already captured.
    pub fn capture(&self, ty: &TypeMirror) -> TypeMirror {
        let TypeMirror::Declared(d) = ty else {
            return ty.clone();
        };
        let enclosing = d
            .enclosing
            .as_ref()
            .map(|outer| Box::new(self.capture(outer)));
        if !d.args.iter().any(|arg| matches!(arg, TypeMirror::Wildcard(_))) {
            return TypeMirror::Declared(DeclaredType {
                element: d.element,
                enclosing,
                args: d.args.clone(),
            });
        }

        let class = self.universe.class(d.element);
        let formals = class.type_param_ids();
        if formals.len() != d.args.len() {
            return ty.clone();
        }
        let module = class.module().id();

        let mut args = d.args.clone();
        let mut pending = Vec::new();
        for (index, arg) in d.args.iter().enumerate() {
            let TypeMirror::Wildcard(bound) = arg else {
                continue;
            };
            let name = format!("capture#{}", self.universe.next_capture_index());
            let var = self
                .universe
                .alloc_type_param(TypeParamData::captured(name, index, module));
            args[index] = TypeMirror::TypeVar(var);
            pending.push((var, formals[index], bound));
        }

        for (var, formal, bound) in pending {
            let declared = self.substitute_all(&self.bounds(formal), &formals, &args);
            let (bounds, lower) = match bound {
                WildcardBound::Unbounded => (declared, None),
                WildcardBound::Extends(upper) => {
                    let mut bounds = vec![upper.as_ref().clone()];
                    bounds.extend(declared.into_iter().filter(|formal_bound| {
                        !self.is_object(formal_bound)
                            && !self.is_subtype_with(upper, formal_bound, false)
                    }));
                    (bounds, None)
                }
                WildcardBound::Super(lower) => (declared, Some(lower.as_ref().clone())),
            };
            self.universe.type_parameter(var).set_bounds(bounds, lower);
        }

        TypeMirror::Declared(DeclaredType {
            element: d.element,
            enclosing,
            args,
        })
    }
}

fn has_wildcard_arguments(ty: &TypeMirror) -> bool {
    let TypeMirror::Declared(d) = ty else {
        return false;
    };
    d.args.iter().any(|arg| matches!(arg, TypeMirror::Wildcard(_)))
        || d.enclosing.as_deref().is_some_and(has_wildcard_arguments)
}
