//! Member inheritance: sub-signatures, hiding and overriding.

use std::collections::{HashSet, VecDeque};

use crate::arena::{ClassId, ExecutableId};
use crate::element::{Element, ElementId, ElementKind, Modifier};
use crate::mirror::{ExecutableType, TypeMirror};

use super::Types;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Namespace {
    Field,
    Method,
    Type,
}

fn namespace(kind: ElementKind) -> Option<Namespace> {
    match kind {
        ElementKind::Field | ElementKind::EnumConstant => Some(Namespace::Field),
        ElementKind::Method => Some(Namespace::Method),
        kind if kind.is_type() => Some(Namespace::Type),
        _ => None,
    }
}

impl<'u> Types<'u> {
    /// `m1` is a sub-signature of `m2`: the same signature after renaming type variables, or
    /// the same parameters as the erasure of `m2` when `m1` is not generic.
    pub fn is_sub_signature(&self, m1: &ExecutableType, m2: &ExecutableType) -> bool {
        if self.same_signature(m1, m2) {
            return true;
        }
        if !m1.type_vars.is_empty() || m1.params.len() != m2.params.len() {
            return false;
        }
        m1.params
            .iter()
            .zip(&m2.params)
            .all(|(a, b)| self.is_same_type(a, &self.erasure(b)))
    }

    fn same_signature(&self, m1: &ExecutableType, m2: &ExecutableType) -> bool {
        if m1.type_vars.len() != m2.type_vars.len() || m1.params.len() != m2.params.len() {
            return false;
        }
        let renamed: Vec<TypeMirror> = m1.type_vars.iter().copied().map(TypeMirror::TypeVar).collect();
        let rename = |ty: &TypeMirror| self.substitute(ty, &m2.type_vars, &renamed);

        let bounds_match = m1.type_vars.iter().zip(&m2.type_vars).all(|(a, b)| {
            let ours = self.bound_list(*a);
            let theirs = self.bound_list(*b);
            ours.len() == theirs.len()
                && ours
                    .iter()
                    .zip(&theirs)
                    .all(|(x, y)| self.is_same_type(x, &rename(y)))
        });
        bounds_match
            && m1
                .params
                .iter()
                .zip(&m2.params)
                .all(|(a, b)| self.is_same_type(a, &rename(b)))
    }

    /// Whether `sub` is `sup` or extends it through the superclass chain.
    fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(sub);
        while let Some(id) = current {
            if id == sup {
                return true;
            }
            if !visited.insert(id) {
                return false;
            }
            current = self.universe.class(id).superclass_id();
        }
        false
    }

    /// Whether `sub` is `sup` or inherits from it through classes or interfaces.
    pub(crate) fn inherits_from(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([sub]);
        while let Some(id) = queue.pop_front() {
            if id == sup {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            let class = self.universe.class(id);
            queue.extend(class.superclass_id());
            queue.extend(class.interface_ids());
        }
        false
    }

    /// Whether `member` is accessible from code in `from`.
    pub(crate) fn is_accessible(&self, member: &Element<'u>, from: ClassId) -> bool {
        let Some(owner) = member.nearest_type() else {
            return true;
        };
        let modifiers = member.modifiers();
        if modifiers.contains(&Modifier::Public) {
            return true;
        }
        let owner = self.universe.class(owner);
        if modifiers.contains(&Modifier::Protected) {
            return !owner.is_interface();
        }
        if modifiers.contains(&Modifier::Private) {
            return owner.id() == from;
        }
        // Interface members are implicitly public.
        if owner.is_interface() && matches!(member, Element::Executable(_) | Element::Variable(_)) {
            return true;
        }
        let from = self.universe.class(from);
        owner.package().map(|p| p.id()) == from.package().map(|p| p.id())
    }

    fn declaring_type(element: &Element<'u>) -> Option<ClassId> {
        match element {
            Element::Type(class) => class.enclosing_type(),
            other => other.nearest_type(),
        }
    }

    /// Whether `hider` hides `hidden`: same kind of member, same name, declared in a subclass,
    /// with `hidden` accessible there. Methods must additionally be static and sub-signatures.
    pub fn hides(&self, hider: ElementId, hidden: ElementId) -> bool {
        if hider == hidden {
            return false;
        }
        let a = self.universe.element(hider);
        let b = self.universe.element(hidden);
        let Some(space) = namespace(a.kind()) else {
            return false;
        };
        if namespace(b.kind()) != Some(space) || a.simple_name() != b.simple_name() {
            return false;
        }
        if let (Element::Executable(ea), Element::Executable(eb)) = (&a, &b) {
            if !ea.is_static() {
                return false;
            }
            let (Ok(ta), Ok(tb)) = (ea.executable_type(), eb.executable_type()) else {
                return false;
            };
            if !self.is_sub_signature(&ta, &tb) {
                return false;
            }
        }
        let (Some(hider_type), Some(hidden_type)) = (Self::declaring_type(&a), Self::declaring_type(&b)) else {
            return false;
        };
        self.is_subclass(hider_type, hidden_type) && self.is_accessible(&b, hider_type)
    }

    /// Whether `overrider` overrides `overridden` when both are viewed as members of `viewing`.
    pub fn overrides(&self, overrider: ExecutableId, overridden: ExecutableId, viewing: ClassId) -> bool {
        let a = self.universe.executable(overrider);
        let b = self.universe.executable(overridden);
        if a.kind() != ElementKind::Method || b.kind() != ElementKind::Method {
            return false;
        }
        if a.is_static() || b.is_static() {
            return false;
        }
        if overrider == overridden {
            return true;
        }
        if a.simple_name() != b.simple_name() || b.is_private() {
            return false;
        }
        let (owner_a, owner_b) = (a.owner(), b.owner());
        if owner_a.id() == owner_b.id() {
            return false;
        }
        if !self.inherits_from(viewing, owner_a.id())
            || !self.inherits_from(viewing, owner_b.id())
            || !self.is_accessible(&Element::Executable(b.clone()), viewing)
        {
            return false;
        }
        if !self.inherits_from(owner_a.id(), owner_b.id()) {
            // Only a concrete class method can implement an unrelated interface method.
            if owner_a.is_interface() || a.is_abstract() || !owner_b.is_interface() {
                return false;
            }
        } else if !self.is_accessible(&Element::Executable(b.clone()), owner_a.id()) {
            return false;
        }

        let site = self.universe.class(viewing).as_type();
        let (Ok(ta), Ok(tb)) = (
            self.as_member_of(&site, overrider.into()),
            self.as_member_of(&site, overridden.into()),
        ) else {
            return false;
        };
        match (ta.as_executable(), tb.as_executable()) {
            (Some(ta), Some(tb)) => self.is_sub_signature(ta, tb),
            _ => false,
        }
    }
}
