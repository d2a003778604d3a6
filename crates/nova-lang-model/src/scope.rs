//! Resolution context: turns signature ASTs and descriptors into mirrors.

use std::collections::HashSet;

use nova_classfile::{ClassTypeSignature, FieldType, TypeArgument, TypeSignature};

use crate::arena::{ModuleId, TypeParamId};
use crate::element::{ElementId, NestingKind};
use crate::mirror::{DeclaredType, TypeMirror, WildcardBound};
use crate::Universe;

/// A type-variable scope (the element whose declarations are visible) plus the module that
/// seeds internal-name lookups.
///
/// Conversion never fails: unknown classes and unknown type variables become error types.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'u> {
    universe: &'u Universe,
    element: Option<ElementId>,
    module: ModuleId,
}

impl<'u> Scope<'u> {
    pub(crate) fn new(universe: &'u Universe, element: ElementId, module: ModuleId) -> Self {
        Self {
            universe,
            element: Some(element),
            module,
        }
    }

    /// Lookups only; every type variable reference is an error.
    pub(crate) fn module_only(universe: &'u Universe, module: ModuleId) -> Self {
        Self {
            universe,
            element: None,
            module,
        }
    }

    /// Innermost declaration of `name`, walking from executable to class and outwards through
    /// classes that carry an enclosing instance.
    pub(crate) fn type_var(&self, name: &str) -> Option<TypeParamId> {
        let u = self.universe;
        let mut visited = HashSet::new();
        let mut current = self.element;

        while let Some(element) = current {
            if !visited.insert(element) {
                break;
            }
            current = match element {
                ElementId::Executable(id) => {
                    let exec = u.executable(id);
                    if let Some(found) = find_named(u, &exec.type_param_ids(), name) {
                        return Some(found);
                    }
                    Some(ElementId::Type(exec.owner().id()))
                }
                ElementId::Type(id) => {
                    let class = u.class(id);
                    if let Some(found) = find_named(u, &class.type_param_ids(), name) {
                        return Some(found);
                    }
                    match class.nesting_kind() {
                        NestingKind::TopLevel => None,
                        NestingKind::Member if class.is_static() => None,
                        _ => class.enclosing_element(),
                    }
                }
                ElementId::TypeParameter(id) => u.type_parameter(id).generic_element(),
                ElementId::Variable(id) => u.variable(id).enclosing_element(),
                ElementId::Module(_) | ElementId::Package(_) => None,
            };
        }
        None
    }

    fn error_type(&self, internal_name: &str) -> TypeMirror {
        let id = self.universe.missing_class(internal_name, self.module);
        TypeMirror::Error(DeclaredType::new(id, Vec::new()))
    }

    pub(crate) fn mirror(&self, sig: &TypeSignature) -> TypeMirror {
        match sig {
            TypeSignature::Base(base) => TypeMirror::Primitive((*base).into()),
            TypeSignature::Array(component) => TypeMirror::array(self.mirror(component)),
            TypeSignature::Class(class) => self.class_mirror(class),
            TypeSignature::TypeVariable(name) => match self.type_var(name) {
                Some(id) => TypeMirror::TypeVar(id),
                None => self.error_type(name),
            },
        }
    }

    pub(crate) fn class_mirror(&self, sig: &ClassTypeSignature) -> TypeMirror {
        let mut current: Option<TypeMirror> = None;
        for (idx, segment) in sig.segments.iter().enumerate() {
            let internal_name = sig.internal_name_of_prefix(idx + 1);
            let element = self.universe.resolve_id(&internal_name, Some(self.module));
            let args = segment
                .type_arguments
                .iter()
                .map(|arg| self.argument(arg))
                .collect();
            let enclosing = current
                .take()
                .filter(|outer| matches!(outer, TypeMirror::Declared(d) if d.is_parameterized()))
                .map(Box::new);
            let declared = DeclaredType {
                element,
                enclosing,
                args,
            };
            current = Some(if self.universe.class(element).is_missing() {
                TypeMirror::Error(declared)
            } else {
                TypeMirror::Declared(declared)
            });
        }
        current.unwrap_or_else(|| self.error_type(&sig.internal_name()))
    }

    fn argument(&self, arg: &TypeArgument) -> TypeMirror {
        match arg {
            TypeArgument::Any => TypeMirror::Wildcard(WildcardBound::Unbounded),
            TypeArgument::Exact(sig) => self.mirror(sig),
            TypeArgument::Extends(sig) => TypeMirror::extends_wildcard(self.mirror(sig)),
            TypeArgument::Super(sig) => TypeMirror::super_wildcard(self.mirror(sig)),
        }
    }

    /// Erased mirror of a field descriptor.
    pub(crate) fn field_type(&self, ty: &FieldType) -> TypeMirror {
        match ty {
            FieldType::Base(base) => TypeMirror::Primitive((*base).into()),
            FieldType::Array(component) => TypeMirror::array(self.field_type(component)),
            FieldType::Object(internal_name) => {
                let element = self.universe.resolve_id(internal_name, Some(self.module));
                let declared = DeclaredType::new(element, Vec::new());
                if self.universe.class(element).is_missing() {
                    TypeMirror::Error(declared)
                } else {
                    TypeMirror::Declared(declared)
                }
            }
        }
    }
}

fn find_named(universe: &Universe, ids: &[TypeParamId], name: &str) -> Option<TypeParamId> {
    ids.iter()
        .copied()
        .find(|&id| universe.type_parameter(id).name() == name)
}
