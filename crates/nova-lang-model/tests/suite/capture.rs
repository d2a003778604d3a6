use nova_classfile::{ClassStub, MethodStub};
use nova_lang_model::{MemoryArchive, TypeMirror, TypeParamId, Universe};
use pretty_assertions::assert_eq;

use super::fixtures::{class, ty, universe_with};

fn captured_arg(ty: &TypeMirror) -> TypeParamId {
    match ty.as_declared().map(|d| d.args.as_slice()) {
        Some([TypeMirror::TypeVar(var)]) => *var,
        other => panic!("expected a single captured argument, got {other:?}"),
    }
}

fn sorted_universe() -> Universe {
    universe_with([MemoryArchive::new("sorted.jar").with_class(
        ClassStub::new("p/Sorted").signature("<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;"),
    )])
}

#[test]
fn wildcards_become_fresh_captured_variables() {
    let universe = universe_with([]);
    let types = universe.types();
    let number = ty(&universe, "java.lang.Number", vec![]);
    let list = ty(
        &universe,
        "java.util.List",
        vec![TypeMirror::extends_wildcard(number.clone())],
    );

    let first = types.capture(&list);
    let second = types.capture(&list);
    let (a, b) = (captured_arg(&first), captured_arg(&second));
    assert!(a != b);
    assert!(!types.is_same_type(&first, &second));
    assert!(types.is_same_type(&first, &first.clone()));

    let cap = universe.type_parameter(a);
    assert!(cap.is_captured());
    assert!(cap.name().starts_with("capture#"));
    assert_eq!(cap.bounds(), vec![number.clone()]);
    assert_eq!(types.upper_bound(a), number);
    assert_eq!(types.lower_bound(a), types.null_type());
}

#[test]
fn types_without_wildcards_are_left_alone() {
    let universe = universe_with([]);
    let types = universe.types();
    let list = ty(
        &universe,
        "java.util.List",
        vec![ty(&universe, "java.lang.String", vec![])],
    );
    assert_eq!(types.capture(&list), list);
    let int = types.primitive(nova_lang_model::PrimitiveType::Int);
    assert_eq!(types.capture(&int), int);
}

#[test]
fn super_wildcards_capture_a_lower_bound() {
    let universe = universe_with([]);
    let types = universe.types();
    let integer = ty(&universe, "java.lang.Integer", vec![]);
    let list = ty(
        &universe,
        "java.util.List",
        vec![TypeMirror::super_wildcard(integer.clone())],
    );

    let captured = types.capture(&list);
    let cap = captured_arg(&captured);
    assert_eq!(types.lower_bound(cap), integer);
    assert_eq!(types.upper_bound(cap), types.object_type());
    assert!(types.is_subtype(&integer, &TypeMirror::TypeVar(cap)));
    assert!(!types.is_subtype(&ty(&universe, "java.lang.String", vec![]), &TypeMirror::TypeVar(cap)));
}

#[test]
fn captures_of_self_referential_parameters_refer_to_themselves() {
    let universe = sorted_universe();
    let types = universe.types();

    let enum_class = class(&universe, "java.lang.Enum");
    let unbounded = ty(
        &universe,
        "java.lang.Enum",
        vec![types.wildcard(None, None).expect("wildcard")],
    );
    let captured = types.capture(&unbounded);
    let cap = captured_arg(&captured);
    assert_eq!(
        universe.type_parameter(cap).bounds(),
        vec![TypeMirror::declared(enum_class.id(), vec![TypeMirror::TypeVar(cap)])]
    );

    let integer = ty(&universe, "java.lang.Integer", vec![]);
    let sorted = ty(
        &universe,
        "p.Sorted",
        vec![TypeMirror::extends_wildcard(integer.clone())],
    );
    let cap = captured_arg(&types.capture(&sorted));
    let comparable = class(&universe, "java.lang.Comparable").id();
    assert_eq!(
        universe.type_parameter(cap).bounds(),
        vec![
            integer,
            TypeMirror::declared(comparable, vec![TypeMirror::TypeVar(cap)]),
        ]
    );
}

#[test]
fn subtyping_captures_the_candidate_first() {
    let universe = universe_with([]);
    let types = universe.types();
    let list = |arg: TypeMirror| ty(&universe, "java.util.List", vec![arg]);
    let integer = ty(&universe, "java.lang.Integer", vec![]);
    let number = ty(&universe, "java.lang.Number", vec![]);

    let of_integers = list(TypeMirror::extends_wildcard(integer.clone()));
    assert!(types.is_subtype(&of_integers, &list(TypeMirror::extends_wildcard(number))));
    assert!(!types.is_subtype(&of_integers, &list(integer.clone())));
    assert!(types.is_subtype_with(&list(integer.clone()), &list(integer), false));
}

#[test]
fn repeated_subtype_queries_reuse_their_captures() {
    let universe = universe_with([]);
    let types = universe.types();
    let unbounded = || types.wildcard(None, None).expect("wildcard");
    let list = ty(&universe, "java.util.List", vec![unbounded()]);
    let collection = ty(&universe, "java.util.Collection", vec![unbounded()]);

    let queries = || {
        assert!(types.is_subtype(&list, &collection));
        assert!(types.is_assignable(&list, &collection));
        assert!(!types.is_subtype(&collection, &list));
    };
    queries();
    let allocated = universe.type_parameter_count();
    for _ in 0..1_000 {
        queries();
    }
    assert_eq!(universe.type_parameter_count(), allocated);
    let settled = universe.type_parameter_count();
    assert!(types.is_subtype(&collection, &types.object_type()));
    assert_eq!(universe.type_parameter_count(), settled);

    // Explicit capture still hands out new variables each time.
    types.capture(&list);
    assert_eq!(universe.type_parameter_count(), settled + 1);
}

#[test]
fn member_views_reuse_their_fresh_method_variables() {
    let universe = universe_with([MemoryArchive::new("box.jar").with_class(
        ClassStub::new("p/Box")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(
                MethodStub::new("pick", "(Ljava/lang/Object;)Ljava/lang/Object;")
                    .signature("<U:TT;>(TU;)TU;"),
            ),
    )]);
    let types = universe.types();
    let pick = class(&universe, "p.Box")
        .method("pick", "(Ljava/lang/Object;)Ljava/lang/Object;")
        .expect("members")
        .expect("pick");
    let strings = ty(&universe, "p.Box", vec![ty(&universe, "java.lang.String", vec![])]);

    let first = types.as_member_of(&strings, pick.id().into()).expect("member");
    let allocated = universe.type_parameter_count();
    for _ in 0..100 {
        assert_eq!(types.as_member_of(&strings, pick.id().into()).expect("member"), first);
    }
    assert_eq!(universe.type_parameter_count(), allocated);
}
