use crate::arena::TypeParamId;
use crate::mirror::{DeclaredType, ExecutableType, TypeMirror, WildcardBound};

use super::Types;

/// Type-variable pairs currently being compared; a pair met again is assumed equal.
type InProgress = Vec<(TypeParamId, TypeParamId)>;

impl<'u> Types<'u> {
    /// Whether `a` and `b` denote the same type. Wildcards are never the same type as
    /// anything, themselves included.
    pub fn is_same_type(&self, a: &TypeMirror, b: &TypeMirror) -> bool {
        self.same(a, b, &mut Vec::new())
    }

    fn same(&self, a: &TypeMirror, b: &TypeMirror, seen: &mut InProgress) -> bool {
        match (a, b) {
            (TypeMirror::Wildcard(_), _) | (_, TypeMirror::Wildcard(_)) => false,
            (TypeMirror::Primitive(x), TypeMirror::Primitive(y)) => x == y,
            (TypeMirror::NoType(x), TypeMirror::NoType(y)) => x == y,
            (TypeMirror::Null, TypeMirror::Null) => true,
            (TypeMirror::Array(x), TypeMirror::Array(y)) => self.same(x, y, seen),
            (TypeMirror::Declared(x), TypeMirror::Declared(y))
            | (TypeMirror::Error(x), TypeMirror::Error(y)) => self.same_declared(x, y, seen),
            (TypeMirror::TypeVar(x), TypeMirror::TypeVar(y)) => self.same_type_var(*x, *y, seen),
            (TypeMirror::Intersection(xs), TypeMirror::Intersection(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().all(|x| ys.iter().any(|y| self.same(x, y, seen)))
                    && ys.iter().all(|y| xs.iter().any(|x| self.same(x, y, seen)))
            }
            (TypeMirror::Executable(x), TypeMirror::Executable(y)) => {
                self.same_executable(x, y, seen)
            }
            _ => false,
        }
    }

    fn same_declared(&self, x: &DeclaredType, y: &DeclaredType, seen: &mut InProgress) -> bool {
        if x.element != y.element || x.args.len() != y.args.len() {
            return false;
        }
        if !x
            .args
            .iter()
            .zip(&y.args)
            .all(|(a, b)| self.same_argument(a, b, seen))
        {
            return false;
        }
        match (&x.enclosing, &y.enclosing) {
            (Some(a), Some(b)) => self.same(a, b, seen),
            _ => true,
        }
    }

    /// Type arguments additionally compare wildcards structurally.
    fn same_argument(&self, a: &TypeMirror, b: &TypeMirror, seen: &mut InProgress) -> bool {
        match (a, b) {
            (TypeMirror::Wildcard(x), TypeMirror::Wildcard(y)) => match (x, y) {
                (WildcardBound::Unbounded, WildcardBound::Unbounded) => true,
                (WildcardBound::Extends(x), WildcardBound::Extends(y))
                | (WildcardBound::Super(x), WildcardBound::Super(y)) => self.same(x, y, seen),
                (WildcardBound::Unbounded, WildcardBound::Extends(bound))
                | (WildcardBound::Extends(bound), WildcardBound::Unbounded) => {
                    self.is_object(bound)
                }
                _ => false,
            },
            _ => self.same(a, b, seen),
        }
    }

    fn same_type_var(&self, x: TypeParamId, y: TypeParamId, seen: &mut InProgress) -> bool {
        if x == y {
            return true;
        }
        let (vx, vy) = (self.universe.type_parameter(x), self.universe.type_parameter(y));
        if vx.is_captured() || vy.is_captured() {
            return false;
        }
        if seen.contains(&(x, y)) {
            return true;
        }
        seen.push((x, y));
        let bx = self.bound_list(x);
        let by = self.bound_list(y);
        let same = bx.len() == by.len()
            && bx.iter().zip(&by).all(|(a, b)| self.same(a, b, seen))
            && match (vx.lower_bound(), vy.lower_bound()) {
                (None, None) => true,
                (Some(a), Some(b)) => self.same(&a, &b, seen),
                _ => false,
            };
        seen.pop();
        same
    }

    /// Same arity, same return, receiver and parameter types once `y`'s type variables are
    /// renamed to `x`'s. Thrown types do not take part.
    fn same_executable(&self, x: &ExecutableType, y: &ExecutableType, seen: &mut InProgress) -> bool {
        if x.type_vars.len() != y.type_vars.len() || x.params.len() != y.params.len() {
            return false;
        }
        let renamed: Vec<TypeMirror> = x.type_vars.iter().copied().map(TypeMirror::TypeVar).collect();
        let rename = |ty: &TypeMirror| self.substitute(ty, &y.type_vars, &renamed);

        self.same(&x.return_type, &rename(&y.return_type), seen)
            && self.same(&x.receiver, &rename(&y.receiver), seen)
            && x
                .params
                .iter()
                .zip(&y.params)
                .all(|(a, b)| self.same(a, &rename(b), seen))
    }
}
