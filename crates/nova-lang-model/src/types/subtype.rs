use std::collections::{HashSet, VecDeque};

use crate::arena::TypeParamId;
use crate::lookup::{CLONEABLE, OBJECT, SERIALIZABLE};
use crate::mirror::{DeclaredType, TypeMirror, WildcardBound};

use super::Types;

impl<'u> Types<'u> {
    /// `sub <: sup`, capturing `sub` first.
    pub fn is_subtype(&self, sub: &TypeMirror, sup: &TypeMirror) -> bool {
        self.is_subtype_with(sub, sup, true)
    }

    /// `sub <: sup`. Error types are compatible with everything in either position.
    pub fn is_subtype_with(&self, sub: &TypeMirror, sup: &TypeMirror, capture: bool) -> bool {
        if capture {
            let captured = self.shared_capture(sub);
            self.subtype(&captured, sup, &mut HashSet::new())
        } else {
            self.subtype(sub, sup, &mut HashSet::new())
        }
    }

    fn subtype(&self, sub: &TypeMirror, sup: &TypeMirror, seen: &mut HashSet<TypeParamId>) -> bool {
        if sub.is_error() || sup.is_error() {
            return true;
        }
        if matches!(sub, TypeMirror::Wildcard(_)) || matches!(sup, TypeMirror::Wildcard(_)) {
            return false;
        }
        if let TypeMirror::Intersection(parts) = sup {
            return parts.iter().all(|part| self.subtype(sub, part, seen));
        }
        if let TypeMirror::Intersection(parts) = sub {
            return parts.iter().any(|part| self.subtype(part, sup, seen));
        }

        match (sub, sup) {
            (TypeMirror::Primitive(a), TypeMirror::Primitive(b)) => return a.widens_to(*b),
            (TypeMirror::Primitive(_), _) | (_, TypeMirror::Primitive(_)) => return false,
            (TypeMirror::Null, _) => return sup.is_reference(),
            (TypeMirror::TypeVar(a), TypeMirror::TypeVar(b)) if a == b => return true,
            _ => {}
        }

        if let TypeMirror::TypeVar(var) = sup {
            if let Some(lower) = self.universe.type_parameter(*var).lower_bound() {
                if self.subtype(sub, &lower, seen) {
                    return true;
                }
            }
        }

        match (sub, sup) {
            (TypeMirror::TypeVar(var), _) => {
                if !seen.insert(*var) {
                    return false;
                }
                let result = self.subtype(&self.upper_bound(*var), sup, seen);
                seen.remove(var);
                result
            }
            (TypeMirror::Array(a), TypeMirror::Array(b)) => match (a.as_ref(), b.as_ref()) {
                (TypeMirror::Primitive(x), TypeMirror::Primitive(y)) => x == y,
                (TypeMirror::Primitive(_), _) | (_, TypeMirror::Primitive(_)) => false,
                _ => self.subtype(a, b, seen),
            },
            (TypeMirror::Array(_), TypeMirror::Declared(d)) => [OBJECT, CLONEABLE, SERIALIZABLE]
                .iter()
                .any(|name| self.universe.well_known(name) == d.element),
            (TypeMirror::Declared(_), TypeMirror::Declared(d)) => {
                self.declared_subtype(sub, d, seen)
            }
            _ => false,
        }
    }

    fn declared_subtype(
        &self,
        sub: &TypeMirror,
        sup: &DeclaredType,
        seen: &mut HashSet<TypeParamId>,
    ) -> bool {
        let Some(view) = self.as_super_type_of(sub, sup.element) else {
            return self.has_missing_ancestor(sub);
        };
        let Some(view) = view.as_declared() else {
            return false;
        };
        if !sup.args.is_empty() {
            if view.args.len() != sup.args.len() {
                return false;
            }
            if !sup
                .args
                .iter()
                .zip(&view.args)
                .all(|(container, arg)| self.contained_by(arg, container, seen))
            {
                return false;
            }
        }
        match (&view.enclosing, &sup.enclosing) {
            (Some(inner), Some(outer)) => self.subtype(inner, outer, seen),
            _ => true,
        }
    }

    /// Whether some supertype of `ty` could not be resolved; the missing type may be the
    /// link to any target.
    fn has_missing_ancestor(&self, ty: &TypeMirror) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            if current.is_error() {
                return true;
            }
            let Some(element) = current.element() else {
                continue;
            };
            if visited.insert(element) {
                queue.extend(self.direct_supertypes(&current));
            }
        }
        false
    }

    /// Type-argument containment: whether argument `t` contains argument `s`.
    pub fn contains(&self, t: &TypeMirror, s: &TypeMirror) -> bool {
        self.contained_by(s, t, &mut HashSet::new())
    }

    fn contained_by(
        &self,
        s: &TypeMirror,
        t: &TypeMirror,
        seen: &mut HashSet<TypeParamId>,
    ) -> bool {
        if s.is_error() || t.is_error() {
            return true;
        }
        match t {
            TypeMirror::Wildcard(WildcardBound::Unbounded) => true,
            TypeMirror::Wildcard(WildcardBound::Extends(upper)) => {
                let s_upper = match s {
                    TypeMirror::Wildcard(WildcardBound::Extends(bound)) => bound.as_ref().clone(),
                    TypeMirror::Wildcard(_) => self.object_type(),
                    other => other.clone(),
                };
                self.subtype(&s_upper, upper, seen)
            }
            TypeMirror::Wildcard(WildcardBound::Super(lower)) => match s {
                TypeMirror::Wildcard(WildcardBound::Super(bound)) => {
                    self.subtype(lower, bound, seen)
                }
                TypeMirror::Wildcard(_) => false,
                other => self.subtype(lower, other, seen),
            },
            _ => !matches!(s, TypeMirror::Wildcard(_)) && self.is_same_type(s, t),
        }
    }

    /// Assignment compatibility: subtyping after capture, boxing and unboxing followed by
    /// widening, and unchecked conversion from a raw type.
    pub fn is_assignable(&self, t: &TypeMirror, s: &TypeMirror) -> bool {
        if self.is_subtype(t, s) {
            return true;
        }
        match (t, s) {
            (TypeMirror::Primitive(p), _) if s.is_reference() => {
                let boxed = self.boxed_class(*p).as_type();
                return self.is_subtype(&boxed, s);
            }
            (_, TypeMirror::Primitive(target)) if t.is_reference() => {
                return matches!(self.unboxed_type(t), Ok(TypeMirror::Primitive(p)) if p.widens_to(*target));
            }
            _ => {}
        }
        // Unchecked conversion: a raw view of `s`'s generic class.
        let Some(target) = s.as_declared() else {
            return false;
        };
        if target.args.is_empty() {
            return false;
        }
        self.as_super_type_of(t, target.element)
            .is_some_and(|view| self.is_raw(&view))
    }
}
