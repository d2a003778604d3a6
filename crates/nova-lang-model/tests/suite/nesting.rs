use nova_classfile::access::{ACC_PUBLIC, ACC_STATIC};
use nova_classfile::{ClassStub, FieldStub, MethodStub};
use nova_lang_model::{ElementId, ElementKind, MemoryArchive, NestingKind, TypeMirror, Universe};
use pretty_assertions::assert_eq;

use super::fixtures::{class, universe_with};

const INNER: (&str, Option<&str>, Option<&str>, u16) =
    ("p/Outer$Inner", Some("p/Outer"), Some("Inner"), ACC_PUBLIC);
const NESTED: (&str, Option<&str>, Option<&str>, u16) =
    ("p/Outer$Nested", Some("p/Outer"), Some("Nested"), ACC_PUBLIC | ACC_STATIC);
const ANONYMOUS: (&str, Option<&str>, Option<&str>, u16) = ("p/Outer$1", None, None, 0);
const LOCAL: (&str, Option<&str>, Option<&str>, u16) = ("p/Outer$1Local", None, Some("Local"), 0);

fn with_records(
    stub: ClassStub,
    records: &[(&str, Option<&str>, Option<&str>, u16)],
) -> ClassStub {
    records
        .iter()
        .fold(stub, |stub, &(inner, outer, name, flags)| {
            stub.inner_class(inner, outer, name, flags)
        })
}

fn nested_universe() -> Universe {
    let run = Some(("run", "()V"));
    universe_with([MemoryArchive::new("nested.jar").with_classes([
        with_records(
            ClassStub::new("p/Outer")
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .method(MethodStub::new("run", "()V")),
            &[INNER, NESTED, ANONYMOUS, LOCAL],
        ),
        with_records(
            ClassStub::new("p/Outer$Inner").field(FieldStub::new("this$0", "Lp/Outer;")),
            &[INNER, ("p/Outer$Inner$Deep", Some("p/Outer$Inner"), Some("Deep"), ACC_PUBLIC)],
        ),
        with_records(
            ClassStub::new("p/Outer$Inner$Deep"),
            &[INNER, ("p/Outer$Inner$Deep", Some("p/Outer$Inner"), Some("Deep"), ACC_PUBLIC)],
        ),
        with_records(ClassStub::new("p/Outer$Nested"), &[NESTED]),
        with_records(ClassStub::new("p/Outer$1"), &[ANONYMOUS]).enclosing_method("p/Outer", run),
        with_records(ClassStub::new("p/Outer$1Local"), &[LOCAL]).enclosing_method("p/Outer", run),
        with_records(
            ClassStub::new("p/Outer$1Local$Member"),
            &[LOCAL, ("p/Outer$1Local$Member", Some("p/Outer$1Local"), Some("Member"), 0)],
        ),
    ])])
}

#[test]
fn top_level_and_member_names() {
    let universe = nested_universe();
    let outer = class(&universe, "p.Outer");
    assert_eq!(outer.nesting_kind(), NestingKind::TopLevel);
    assert_eq!(outer.simple_name(), "Outer");
    assert_eq!(outer.qualified_name(), "p.Outer");
    assert!(matches!(outer.enclosing_element(), Some(ElementId::Package(_))));

    let inner = class(&universe, "p.Outer.Inner");
    assert_eq!(inner.nesting_kind(), NestingKind::Member);
    assert_eq!(inner.simple_name(), "Inner");
    assert_eq!(inner.qualified_name(), "p.Outer.Inner");
    assert_eq!(inner.binary_name(), "p.Outer$Inner");
    assert_eq!(inner.enclosing_type(), Some(outer.id()));

    let deep = class(&universe, "p.Outer.Inner.Deep");
    assert_eq!(deep.simple_name(), "Deep");
    assert_eq!(deep.enclosing_type(), Some(inner.id()));
    assert_eq!(
        universe.elements().outermost_type(deep.id().into()),
        Some(outer.clone())
    );

    let member_types: Vec<String> = outer
        .member_types()
        .expect("member types")
        .iter()
        .map(|t| t.simple_name())
        .collect();
    assert_eq!(member_types, vec!["Inner", "Nested"]);
}

#[test]
fn anonymous_and_local_classes_have_no_canonical_name() {
    let universe = nested_universe();
    let lookup = universe.lookup();
    let outer = class(&universe, "p.Outer");
    let run = outer
        .method("run", "()V")
        .expect("members")
        .expect("run declared");

    let anonymous = lookup.resolve("p/Outer$1", None);
    assert_eq!(anonymous.nesting_kind(), NestingKind::Anonymous);
    assert_eq!(anonymous.simple_name(), "");
    assert_eq!(anonymous.qualified_name(), "");
    assert_eq!(anonymous.kind(), ElementKind::Class);
    assert_eq!(anonymous.enclosing_element(), Some(ElementId::Executable(run.id())));
    assert_eq!(anonymous.enclosing_type(), Some(outer.id()));

    let local = lookup.resolve("p/Outer$1Local", None);
    assert_eq!(local.nesting_kind(), NestingKind::Local);
    assert_eq!(local.simple_name(), "Local");
    assert_eq!(local.qualified_name(), "");
    assert_eq!(local.enclosing_element(), Some(ElementId::Executable(run.id())));

    let member_of_local = lookup.resolve("p/Outer$1Local$Member", None);
    assert_eq!(member_of_local.nesting_kind(), NestingKind::Member);
    assert_eq!(member_of_local.simple_name(), "Member");
    assert_eq!(member_of_local.qualified_name(), "");
    assert!(universe.elements().type_element("p.Outer.1Local.Member").is_none());
}

#[test]
fn inner_class_types_carry_their_generic_enclosing_type() {
    let universe = nested_universe();
    let outer = class(&universe, "p.Outer");
    let inner = class(&universe, "p.Outer.Inner");
    let nested = class(&universe, "p.Outer.Nested");

    assert!(inner.has_enclosing_instance());
    assert!(!inner.is_static());
    assert!(nested.is_static());
    assert!(!nested.has_enclosing_instance());

    let TypeMirror::Declared(inner_type) = inner.as_type() else {
        panic!("inner class should have a declared type");
    };
    assert!(inner_type.args.is_empty());
    assert_eq!(inner_type.enclosing.as_deref(), Some(&outer.as_type()));

    let TypeMirror::Declared(nested_type) = nested.as_type() else {
        panic!("nested class should have a declared type");
    };
    assert!(nested_type.enclosing.is_none());
}

#[test]
fn missing_outer_classes_do_not_break_name_derivation() {
    let universe = universe_with([MemoryArchive::new("orphans.jar").with_class(
        ClassStub::new("q/Gone$Kept").inner_class("q/Gone$Kept", Some("q/Gone"), Some("Kept"), ACC_PUBLIC),
    )]);
    let kept = class(&universe, "q.Gone.Kept");
    assert_eq!(kept.nesting_kind(), NestingKind::Member);
    let outer = universe.class(kept.enclosing_type().expect("outer by name"));
    assert!(outer.is_missing());
    assert_eq!(outer.qualified_name(), "q.Gone");
}
