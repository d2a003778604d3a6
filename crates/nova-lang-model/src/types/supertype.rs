use std::collections::HashSet;

use crate::arena::{ClassId, TypeParamId};
use crate::element::{Element, ElementId, ElementKind, NestingKind};
use crate::error::{ModelError, Result};
use crate::lookup::{CLONEABLE, OBJECT, SERIALIZABLE};
use crate::mirror::{DeclaredType, TypeMirror};

use super::Types;

#[derive(Default)]
struct Visited {
    classes: HashSet<ClassId>,
    vars: HashSet<TypeParamId>,
}

impl<'u> Types<'u> {
    /// Whether `ty` names a generic class without type arguments.
    pub fn is_raw(&self, ty: &TypeMirror) -> bool {
        let TypeMirror::Declared(d) = ty else {
            return false;
        };
        if d.is_parameterized() {
            return false;
        }
        matches!(self.universe.class(d.element).as_type(), TypeMirror::Declared(g) if g.is_parameterized())
    }

    /// Type variables bound by `d` (its own and those of its enclosing instance types) and
    /// the arguments they are bound to.
    pub(crate) fn formals_and_actuals(&self, d: &DeclaredType) -> (Vec<TypeParamId>, Vec<TypeMirror>) {
        let mut from = Vec::new();
        let mut to = Vec::new();
        let mut level = Some(d);
        while let Some(current) = level {
            let formals = self.universe.class(current.element).type_param_ids();
            if !current.args.is_empty() && formals.len() == current.args.len() {
                from.extend(formals);
                to.extend(current.args.iter().cloned());
            }
            level = current.enclosing.as_deref().and_then(TypeMirror::as_declared);
        }
        (from, to)
    }

    /// A supertype as written in the declaration of `of`'s class, seen through `of`.
    fn instantiate(&self, of: &TypeMirror, declared: &TypeMirror) -> TypeMirror {
        if self.is_raw(of) {
            return self.erasure(declared);
        }
        match of.as_declared() {
            Some(d) => {
                let (from, to) = self.formals_and_actuals(d);
                self.substitute(declared, &from, &to)
            }
            None => declared.clone(),
        }
    }

    pub(crate) fn superclass_of(&self, ty: &TypeMirror) -> Option<TypeMirror> {
        let TypeMirror::Declared(d) = ty else {
            return None;
        };
        let class = self.universe.class(d.element);
        let declared = match class.superclass() {
            Ok(TypeMirror::NoType(_)) => return None,
            Ok(declared) => declared,
            Err(err) => {
                tracing::debug!(
                    target: "nova.lang_model",
                    class = %class.binary_name(),
                    error = %err,
                    "superclass unavailable"
                );
                return None;
            }
        };
        Some(self.instantiate(ty, &declared))
    }

    pub(crate) fn interfaces_of(&self, ty: &TypeMirror) -> Vec<TypeMirror> {
        let TypeMirror::Declared(d) = ty else {
            return Vec::new();
        };
        let class = self.universe.class(d.element);
        match class.interfaces() {
            Ok(interfaces) => interfaces
                .iter()
                .map(|interface| self.instantiate(ty, interface))
                .collect(),
            Err(err) => {
                tracing::debug!(
                    target: "nova.lang_model",
                    class = %class.binary_name(),
                    error = %err,
                    "superinterfaces unavailable"
                );
                Vec::new()
            }
        }
    }

    /// The direct supertypes of `ty`, superclass first. Interfaces list `java.lang.Object`
    /// ahead of their superinterfaces.
    pub fn direct_supertypes(&self, ty: &TypeMirror) -> Vec<TypeMirror> {
        match ty {
            TypeMirror::Declared(d) => {
                let mut supertypes = Vec::new();
                if let Some(superclass) = self.superclass_of(ty) {
                    supertypes.push(superclass);
                } else if self.universe.class(d.element).is_interface() {
                    supertypes.push(self.object_type());
                }
                supertypes.extend(self.interfaces_of(ty));
                supertypes
            }
            TypeMirror::TypeVar(id) => self.bound_list(*id),
            TypeMirror::Intersection(parts) => parts.clone(),
            TypeMirror::Array(component) => {
                if component.is_primitive() || self.is_object(component) {
                    [OBJECT, CLONEABLE, SERIALIZABLE]
                        .iter()
                        .map(|name| self.well_known_type(name))
                        .collect()
                } else {
                    self.direct_supertypes(component)
                        .into_iter()
                        .map(TypeMirror::array)
                        .collect()
                }
            }
            _ => Vec::new(),
        }
    }

    /// The supertype of `ty` whose element is `target`, with type arguments substituted
    /// along the way (`ArrayList<String>` as `List` gives `List<String>`).
    pub fn as_super_type_of(&self, ty: &TypeMirror, target: ClassId) -> Option<TypeMirror> {
        self.super_view(ty, target, &mut Visited::default())
    }

    fn super_view(&self, ty: &TypeMirror, target: ClassId, visited: &mut Visited) -> Option<TypeMirror> {
        match ty {
            TypeMirror::Declared(d) | TypeMirror::Error(d) if d.element == target => Some(ty.clone()),
            TypeMirror::Declared(d) => {
                if !visited.classes.insert(d.element) {
                    return None;
                }
                if let Some(superclass) = self.superclass_of(ty) {
                    if let Some(view) = self.super_view(&superclass, target, visited) {
                        return Some(view);
                    }
                }
                let object = self.universe.well_known(OBJECT);
                if target == object || self.universe.class(target).is_interface() {
                    for interface in self.interfaces_of(ty) {
                        if let Some(view) = self.super_view(&interface, target, visited) {
                            return Some(view);
                        }
                    }
                }
                if target == object && self.universe.class(d.element).is_interface() {
                    return Some(self.object_type());
                }
                None
            }
            TypeMirror::Array(_) => [OBJECT, CLONEABLE, SERIALIZABLE]
                .iter()
                .find(|name| self.universe.well_known(name) == target)
                .map(|name| self.well_known_type(name)),
            TypeMirror::TypeVar(id) => {
                if !visited.vars.insert(*id) {
                    return None;
                }
                self.super_view(&self.upper_bound(*id), target, visited)
            }
            TypeMirror::Intersection(parts) => parts
                .iter()
                .find_map(|part| self.super_view(part, target, visited)),
            _ => None,
        }
    }

    /// The type of `element` when viewed as a member of `containing`: type variables of the
    /// declaring class replaced by the arguments `containing` supplies for it.
    pub fn as_member_of(&self, containing: &TypeMirror, element: ElementId) -> Result<TypeMirror> {
        let el = self.universe.element(element);
        let (declared, is_static) = match &el {
            Element::Executable(e) => (
                TypeMirror::Executable(Box::new(e.executable_type()?)),
                e.is_static() || e.kind() == ElementKind::StaticInit,
            ),
            Element::Variable(v) => (v.as_type()?, v.is_static()),
            Element::Type(c) => (
                c.as_type(),
                c.is_static() || c.nesting_kind() == NestingKind::TopLevel,
            ),
            Element::TypeParameter(p) => (p.as_type(), false),
            Element::Module(_) | Element::Package(_) => {
                return Err(ModelError::IllegalArgument(format!(
                    "{:?} is not a member of a type",
                    el.kind()
                )))
            }
        };
        if is_static {
            return Ok(declared);
        }
        let owner = match &el {
            Element::Type(c) => c.enclosing_type(),
            other => other.nearest_type(),
        }
        .ok_or_else(|| ModelError::IllegalArgument(format!("{element:?} has no enclosing type")))?;

        if containing.is_error() {
            return Ok(declared);
        }
        let view = self.as_super_type_of(containing, owner).ok_or_else(|| {
            ModelError::IllegalArgument(format!(
                "{} is not a member of the given type",
                el.simple_name()
            ))
        })?;
        match &view {
            TypeMirror::Declared(_) if self.is_raw(&view) => Ok(self.erasure(&declared)),
            TypeMirror::Declared(d) => {
                let (from, to) = self.formals_and_actuals(d);
                Ok(self.substitute(&declared, &from, &to))
            }
            _ => Ok(declared),
        }
    }
}
