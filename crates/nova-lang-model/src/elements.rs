//! `Elements`: element queries in the shape consumers expect.

use std::collections::{HashSet, VecDeque};

use crate::annotation::{AnnotationMirror, AnnotationValue};
use crate::arena::{ClassId, ExecutableId, ModuleId};
use crate::element::{
    Element, ElementId, ElementKind, Modifier, ModuleElement, PackageElement, TypeElement,
};
use crate::error::Result;
use crate::lookup::INHERITED;
use crate::Universe;

#[derive(Debug, Clone, Copy)]
pub struct Elements<'u> {
    universe: &'u Universe,
}

/// Internal names a dotted qualified name may denote: every split into a package prefix and
/// a `$`-joined chain of member types.
fn candidate_internal_names(qualified: &str) -> Vec<String> {
    let segments: Vec<&str> = qualified.split('.').collect();
    (0..segments.len())
        .map(|split| {
            let package = segments[..split].join("/");
            let types = segments[split..].join("$");
            if package.is_empty() {
                types
            } else {
                format!("{package}/{types}")
            }
        })
        .collect()
}

impl<'u> Elements<'u> {
    pub(crate) fn new(universe: &'u Universe) -> Self {
        Self { universe }
    }

    pub fn module_element(&self, name: &str) -> Option<ModuleElement<'u>> {
        self.universe.module_by_name(name)
    }

    /// The package named `name`, or `None` when no module or more than one module has it.
    pub fn package_element(&self, name: &str) -> Option<PackageElement<'u>> {
        let mut found = self
            .universe
            .modules()
            .into_iter()
            .filter_map(|module| module.package(name).ok().flatten());
        let first = found.next()?;
        match found.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn package_element_in(&self, module: ModuleId, name: &str) -> Option<PackageElement<'u>> {
        self.universe.module(module).package(name).ok().flatten()
    }

    fn type_in_module(&self, module: ModuleId, qualified: &str) -> Option<ClassId> {
        candidate_internal_names(qualified)
            .into_iter()
            .filter_map(|internal| self.universe.find_in_module(module, &internal))
            .find(|&id| self.universe.class(id).qualified_name() == qualified)
    }

    /// The type with canonical name `qualified`, searched in every module. Absent and
    /// ambiguous names both give `None`.
    pub fn type_element(&self, qualified: &str) -> Option<TypeElement<'u>> {
        let mut hits: Vec<ClassId> = self
            .universe
            .modules()
            .iter()
            .filter_map(|module| self.type_in_module(module.id(), qualified))
            .collect();
        hits.dedup();
        match hits.as_slice() {
            [only] => Some(self.universe.class(*only)),
            [] => None,
            _ => {
                tracing::debug!(
                    target: "nova.lang_model",
                    name = qualified,
                    candidates = hits.len(),
                    "ambiguous type name"
                );
                None
            }
        }
    }

    /// The type with canonical name `qualified` as visible from `module`.
    pub fn type_element_in(&self, module: ModuleId, qualified: &str) -> Option<TypeElement<'u>> {
        self.universe
            .module(module)
            .readable_ids()
            .into_iter()
            .find_map(|candidate| self.type_in_module(candidate, qualified))
            .map(|id| self.universe.class(id))
    }

    /// Always returns a type; unknown names give a missing type.
    pub fn type_by_internal_name(&self, internal_name: &str, module: Option<ModuleId>) -> TypeElement<'u> {
        self.universe.lookup().resolve(internal_name, module)
    }

    pub fn binary_name(&self, class: ClassId) -> String {
        self.universe.class(class).binary_name()
    }

    pub fn package_of(&self, element: ElementId) -> Option<PackageElement<'u>> {
        match self.universe.element(element) {
            Element::Module(_) => None,
            Element::Package(package) => Some(package),
            other => self.universe.class(other.nearest_type()?).package(),
        }
    }

    pub fn module_of(&self, element: ElementId) -> Option<ModuleElement<'u>> {
        match self.universe.element(element) {
            Element::Module(module) => Some(module),
            Element::Package(package) => Some(package.module()),
            other => Some(self.universe.class(other.nearest_type()?).module()),
        }
    }

    /// The top-level type lexically enclosing `element`.
    pub fn outermost_type(&self, element: ElementId) -> Option<TypeElement<'u>> {
        let mut current = self.universe.element(element).nearest_type()?;
        let mut visited = HashSet::from([current]);
        while let Some(outer) = self.universe.class(current).enclosing_type() {
            if !visited.insert(outer) {
                break;
            }
            current = outer;
        }
        Some(self.universe.class(current))
    }

    fn is_inheritable(&self, member: &Element<'u>, from: &TypeElement<'u>, into: &TypeElement<'u>) -> bool {
        let modifiers = member.modifiers();
        if modifiers.contains(&Modifier::Private) {
            return false;
        }
        match member {
            Element::Executable(exec) => {
                if exec.kind() != ElementKind::Method {
                    return false;
                }
                if from.is_interface() && exec.is_static() {
                    return false;
                }
            }
            Element::Variable(_) | Element::Type(_) => {}
            _ => return false,
        }
        let package_private = !modifiers.contains(&Modifier::Public)
            && !modifiers.contains(&Modifier::Protected)
            && !from.is_interface();
        !package_private || from.package().map(|p| p.id()) == into.package().map(|p| p.id())
    }

    fn is_shadowed_by(&self, candidate: &Element<'u>, member: ElementId, viewing: ClassId) -> bool {
        let types = self.universe.types();
        match (candidate.id(), member) {
            (ElementId::Executable(inherited), ElementId::Executable(own))
                if !self.universe.executable(inherited).is_static() =>
            {
                types.overrides(own, inherited, viewing)
            }
            (inherited, own) => types.hides(own, inherited),
        }
    }

    /// Members declared in `class` plus those it inherits, superclasses first. Private
    /// members, constructors, initializers, static interface methods and inherited members
    /// that are overridden or hidden are left out.
    pub fn all_members(&self, class: ClassId) -> Result<Vec<ElementId>> {
        let into = self.universe.class(class);
        let mut members = into.enclosed_elements()?;

        let mut visited = HashSet::from([class]);
        let mut queue: VecDeque<ClassId> = into.superclass_id().into_iter().collect();
        queue.extend(into.interface_ids());
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let from = self.universe.class(id);
            let inherited = match from.enclosed_elements() {
                Ok(inherited) => inherited,
                Err(err) => {
                    tracing::debug!(
                        target: "nova.lang_model",
                        class = %from.binary_name(),
                        error = %err,
                        "members unavailable"
                    );
                    Vec::new()
                }
            };
            for candidate in inherited {
                let element = self.universe.element(candidate);
                if !self.is_inheritable(&element, &from, &into) {
                    continue;
                }
                if members
                    .iter()
                    .any(|&member| self.is_shadowed_by(&element, member, class))
                {
                    continue;
                }
                members.push(candidate);
            }
            queue.extend(from.superclass_id());
            queue.extend(from.interface_ids());
        }
        Ok(members)
    }

    fn is_inherited_annotation(&self, mirror: &AnnotationMirror) -> Result<bool> {
        let Some(annotation_type) = mirror.annotation_type_element() else {
            return Ok(false);
        };
        let inherited = self.universe.well_known(INHERITED);
        let meta = self.universe.class(annotation_type).annotation_mirrors()?;
        Ok(meta.iter().any(|m| m.annotation_type_element() == Some(inherited)))
    }

    /// Annotations present on `element`, plus, for classes, `@Inherited` annotations found
    /// along the superclass chain. The nearest declaration of an annotation type wins.
    ///
    /// Fails when a superclass or an annotation type on the way cannot be read.
    pub fn all_annotation_mirrors(&self, element: ElementId) -> Result<Vec<AnnotationMirror>> {
        let el = self.universe.element(element);
        let mut mirrors = el.annotation_mirrors()?;
        let Element::Type(class) = el else {
            return Ok(mirrors);
        };

        let mut visited = HashSet::from([class.id()]);
        let mut current = class.superclass_id();
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let superclass = self.universe.class(id);
            for mirror in superclass.annotation_mirrors()? {
                let present = mirrors
                    .iter()
                    .any(|m| m.annotation_type_element() == mirror.annotation_type_element());
                if !present && self.is_inherited_annotation(&mirror)? {
                    mirrors.push(mirror);
                }
            }
            current = superclass.superclass_id();
        }
        Ok(mirrors)
    }

    /// Every element of the annotation type with its explicit or default value, in
    /// declaration order. Elements with neither are left out.
    pub fn element_values_with_defaults(
        &self,
        mirror: &AnnotationMirror,
    ) -> Result<Vec<(ExecutableId, AnnotationValue)>> {
        let Some(annotation_type) = mirror.annotation_type_element() else {
            return Ok(Vec::new());
        };
        let mut values = Vec::new();
        for method in self.universe.class(annotation_type).methods()? {
            if let Some(explicit) = mirror.value(method.simple_name()) {
                values.push((method.id(), explicit.clone()));
            } else if let Some(default) = method.default_value()? {
                values.push((method.id(), default));
            }
        }
        Ok(values)
    }

    pub fn hides(&self, hider: ElementId, hidden: ElementId) -> bool {
        self.universe.types().hides(hider, hidden)
    }

    pub fn overrides(&self, overrider: ExecutableId, overridden: ExecutableId, viewing: ClassId) -> bool {
        self.universe.types().overrides(overrider, overridden, viewing)
    }
}
