use crate::arena::TypeParamId;
use crate::element::TypeParamData;
use crate::mirror::{DeclaredType, ExecutableType, TypeMirror, WildcardBound};

use super::Types;

impl<'u> Types<'u> {
    /// Replace every occurrence of `from[i]` in `ty` with `to[i]`.
    ///
    /// Generic method types whose type-variable bounds mention a replaced variable get fresh
    /// type variables carrying the substituted bounds.
    pub fn substitute(&self, ty: &TypeMirror, from: &[TypeParamId], to: &[TypeMirror]) -> TypeMirror {
        if from.is_empty() {
            return ty.clone();
        }
        match ty {
            TypeMirror::TypeVar(id) => from
                .iter()
                .position(|candidate| candidate == id)
                .and_then(|index| to.get(index))
                .cloned()
                .unwrap_or_else(|| ty.clone()),
            TypeMirror::Declared(d) => TypeMirror::Declared(self.substitute_declared(d, from, to)),
            TypeMirror::Error(d) => TypeMirror::Error(self.substitute_declared(d, from, to)),
            TypeMirror::Array(component) => {
                TypeMirror::array(self.substitute(component, from, to))
            }
            TypeMirror::Wildcard(bound) => TypeMirror::Wildcard(match bound {
                WildcardBound::Unbounded => WildcardBound::Unbounded,
                WildcardBound::Extends(upper) => {
                    WildcardBound::Extends(Box::new(self.substitute(upper, from, to)))
                }
                WildcardBound::Super(lower) => {
                    WildcardBound::Super(Box::new(self.substitute(lower, from, to)))
                }
            }),
            TypeMirror::Intersection(parts) => TypeMirror::Intersection(
                parts.iter().map(|part| self.substitute(part, from, to)).collect(),
            ),
            TypeMirror::Executable(exec) => {
                TypeMirror::Executable(Box::new(self.substitute_executable(exec, from, to)))
            }
            TypeMirror::Primitive(_) | TypeMirror::NoType(_) | TypeMirror::Null => ty.clone(),
        }
    }

    fn substitute_declared(
        &self,
        d: &DeclaredType,
        from: &[TypeParamId],
        to: &[TypeMirror],
    ) -> DeclaredType {
        DeclaredType {
            element: d.element,
            enclosing: d
                .enclosing
                .as_ref()
                .map(|outer| Box::new(self.substitute(outer, from, to))),
            args: self.substitute_all(&d.args, from, to),
        }
    }

    pub(crate) fn substitute_all(
        &self,
        types: &[TypeMirror],
        from: &[TypeParamId],
        to: &[TypeMirror],
    ) -> Vec<TypeMirror> {
        types.iter().map(|ty| self.substitute(ty, from, to)).collect()
    }

    fn substitute_executable(
        &self,
        exec: &ExecutableType,
        from: &[TypeParamId],
        to: &[TypeMirror],
    ) -> ExecutableType {
        let bounds_change = exec.type_vars.iter().any(|var| {
            self.bounds(*var)
                .iter()
                .any(|bound| self.substitute(bound, from, to) != *bound)
        });
        if !bounds_change {
            return self.map_executable(exec, exec.type_vars.clone(), from, to);
        }

        let mut from = from.to_vec();
        let mut to = to.to_vec();
        let key = (exec.type_vars.clone(), from.clone(), to.clone());
        let fresh = self
            .universe
            .caches
            .fresh_type_vars
            .get_or_insert_with(key, || self.fresh_type_vars(&exec.type_vars, &from, &to));

        from.extend(exec.type_vars.iter().copied());
        to.extend(fresh.iter().copied().map(TypeMirror::TypeVar));
        self.map_executable(exec, fresh, &from, &to)
    }

    /// Copies of `vars` whose bounds have `from` replaced by `to`. Bounds referring to
    /// `vars` themselves are redirected to the copies.
    fn fresh_type_vars(
        &self,
        vars: &[TypeParamId],
        from: &[TypeParamId],
        to: &[TypeMirror],
    ) -> Vec<TypeParamId> {
        let fresh: Vec<TypeParamId> = vars
            .iter()
            .map(|var| {
                let old = self.universe.type_parameter(*var);
                self.universe.alloc_type_param(TypeParamData::fresh(
                    old.name().to_string(),
                    old.generic_element(),
                    old.index(),
                    self.universe.type_param_module(*var),
                ))
            })
            .collect();

        let mut from = from.to_vec();
        let mut to = to.to_vec();
        from.extend(vars.iter().copied());
        to.extend(fresh.iter().copied().map(TypeMirror::TypeVar));
        for (old, new) in vars.iter().zip(&fresh) {
            let bounds = self.substitute_all(&self.bounds(*old), &from, &to);
            self.universe.type_parameter(*new).set_bounds(bounds, None);
        }
        fresh
    }

    fn map_executable(
        &self,
        exec: &ExecutableType,
        type_vars: Vec<TypeParamId>,
        from: &[TypeParamId],
        to: &[TypeMirror],
    ) -> ExecutableType {
        ExecutableType {
            type_vars,
            return_type: self.substitute(&exec.return_type, from, to),
            params: self.substitute_all(&exec.params, from, to),
            receiver: self.substitute(&exec.receiver, from, to),
            thrown: self.substitute_all(&exec.thrown, from, to),
        }
    }

    /// Type erasure: drop type arguments, replace type variables by the erasure of their
    /// leftmost bound, intersections by their first component.
    pub fn erasure(&self, ty: &TypeMirror) -> TypeMirror {
        self.erase(ty, &mut Vec::new())
    }

    fn erase(&self, ty: &TypeMirror, seen: &mut Vec<TypeParamId>) -> TypeMirror {
        match ty {
            TypeMirror::Declared(d) => TypeMirror::Declared(DeclaredType::new(d.element, Vec::new())),
            TypeMirror::Error(d) => TypeMirror::Error(DeclaredType::new(d.element, Vec::new())),
            TypeMirror::Array(component) => TypeMirror::array(self.erase(component, seen)),
            TypeMirror::TypeVar(id) => {
                if seen.contains(id) {
                    return self.object_type();
                }
                seen.push(*id);
                let leftmost = self
                    .bounds(*id)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| self.object_type());
                let erased = self.erase(&leftmost, seen);
                seen.pop();
                erased
            }
            TypeMirror::Wildcard(WildcardBound::Extends(upper)) => self.erase(upper, seen),
            TypeMirror::Wildcard(_) => self.object_type(),
            TypeMirror::Intersection(parts) => match parts.first() {
                Some(first) => self.erase(first, seen),
                None => self.object_type(),
            },
            TypeMirror::Executable(exec) => TypeMirror::Executable(Box::new(ExecutableType {
                type_vars: Vec::new(),
                return_type: self.erase(&exec.return_type, seen),
                params: exec.params.iter().map(|p| self.erase(p, seen)).collect(),
                receiver: self.erase(&exec.receiver, seen),
                thrown: exec.thrown.iter().map(|t| self.erase(t, seen)).collect(),
            })),
            TypeMirror::Primitive(_) | TypeMirror::NoType(_) | TypeMirror::Null => ty.clone(),
        }
    }
}
