use nova_lang_model::{PrimitiveType, TypeMirror, Universe};
use pretty_assertions::assert_eq;

use super::fixtures::{class, ty, universe_with};

fn string(universe: &Universe) -> TypeMirror {
    ty(universe, "java.lang.String", vec![])
}

fn integer(universe: &Universe) -> TypeMirror {
    ty(universe, "java.lang.Integer", vec![])
}

fn number(universe: &Universe) -> TypeMirror {
    ty(universe, "java.lang.Number", vec![])
}

#[test]
fn parameterized_types_follow_declared_supertypes() {
    let universe = universe_with([]);
    let types = universe.types();
    let s = string(&universe);
    let array_list = ty(&universe, "java.util.ArrayList", vec![s.clone()]);

    assert!(types.is_subtype(&array_list, &ty(&universe, "java.util.List", vec![s.clone()])));
    assert!(types.is_subtype(&array_list, &ty(&universe, "java.util.Collection", vec![s.clone()])));
    assert!(types.is_subtype(&array_list, &ty(&universe, "java.lang.Iterable", vec![s.clone()])));
    assert!(types.is_subtype(&array_list, &types.object_type()));
    assert!(!types.is_subtype(
        &array_list,
        &ty(&universe, "java.util.List", vec![types.object_type()])
    ));

    let list_of_strings = ty(&universe, "java.util.List", vec![s]);
    assert!(types.is_subtype(&list_of_strings, &types.object_type()));
}

#[test]
fn wildcard_arguments_use_containment() {
    let universe = universe_with([]);
    let types = universe.types();
    let list = |arg: TypeMirror| ty(&universe, "java.util.List", vec![arg]);
    let char_sequence = ty(&universe, "java.lang.CharSequence", vec![]);

    let strings = list(string(&universe));
    assert!(types.is_subtype(&strings, &list(TypeMirror::extends_wildcard(char_sequence))));
    assert!(types.is_subtype(&strings, &list(TypeMirror::extends_wildcard(types.object_type()))));
    assert!(types.is_subtype(&strings, &list(types.wildcard(None, None).expect("wildcard"))));

    let super_integer = list(TypeMirror::super_wildcard(integer(&universe)));
    assert!(types.is_subtype(&list(integer(&universe)), &super_integer));
    assert!(types.is_subtype(&list(number(&universe)), &super_integer));
    assert!(!types.is_subtype(&strings, &super_integer));

    let extends_number = TypeMirror::extends_wildcard(number(&universe));
    assert!(types.contains(&extends_number, &integer(&universe)));
    assert!(!types.contains(&extends_number, &string(&universe)));
    assert!(types.contains(
        &TypeMirror::super_wildcard(integer(&universe)),
        &number(&universe)
    ));
}

#[test]
fn super_type_views_carry_substituted_arguments() {
    let universe = universe_with([]);
    let types = universe.types();
    let s = string(&universe);
    let array_list = ty(&universe, "java.util.ArrayList", vec![s.clone()]);

    let list = class(&universe, "java.util.List").id();
    assert_eq!(
        types.as_super_type_of(&array_list, list),
        Some(ty(&universe, "java.util.List", vec![s.clone()]))
    );
    let iterable = class(&universe, "java.lang.Iterable").id();
    assert_eq!(
        types.as_super_type_of(&array_list, iterable),
        Some(ty(&universe, "java.lang.Iterable", vec![s.clone()]))
    );
    let integer_class = class(&universe, "java.lang.Integer").id();
    assert_eq!(types.as_super_type_of(&array_list, integer_class), None);

    assert_eq!(
        types.direct_supertypes(&array_list),
        vec![
            types.object_type(),
            ty(&universe, "java.util.List", vec![s.clone()]),
            ty(&universe, "java.io.Serializable", vec![]),
        ]
    );
    assert_eq!(
        types.direct_supertypes(&ty(&universe, "java.util.List", vec![s.clone()])),
        vec![
            types.object_type(),
            ty(&universe, "java.util.Collection", vec![s]),
        ]
    );
}

#[test]
fn arrays_are_covariant_over_references_only() {
    let universe = universe_with([]);
    let types = universe.types();
    let int = types.primitive(PrimitiveType::Int);
    let ints = types.array_of(int).expect("int[]");
    let longs = types
        .array_of(types.primitive(PrimitiveType::Long))
        .expect("long[]");
    let strings = types.array_of(string(&universe)).expect("String[]");
    let objects = types.array_of(types.object_type()).expect("Object[]");

    assert!(types.is_subtype(&strings, &objects));
    assert!(types.is_subtype(
        &strings,
        &TypeMirror::array(ty(&universe, "java.lang.CharSequence", vec![]))
    ));
    assert!(types.is_subtype(&TypeMirror::array(strings.clone()), &objects));
    assert!(!types.is_subtype(&objects, &strings));

    assert!(!types.is_subtype(&ints, &longs));
    assert!(!types.is_subtype(&ints, &objects));
    assert!(types.is_subtype(&ints, &types.object_type()));
    assert!(types.is_subtype(&ints, &ty(&universe, "java.lang.Cloneable", vec![])));
    assert!(types.is_subtype(&ints, &ty(&universe, "java.io.Serializable", vec![])));
    assert!(!types.is_subtype(&ints, &string(&universe)));

    assert!(types.array_of(types.null_type()).is_err());
}

#[test]
fn null_and_intersection_types() {
    let universe = universe_with([]);
    let types = universe.types();
    let null = types.null_type();
    assert!(types.is_subtype(&null, &string(&universe)));
    assert!(!types.is_subtype(&null, &types.primitive(PrimitiveType::Int)));

    let comparable_integer = ty(&universe, "java.lang.Comparable", vec![integer(&universe)]);
    let both = TypeMirror::Intersection(vec![number(&universe), comparable_integer]);
    assert!(types.is_subtype(&integer(&universe), &both));
    assert!(!types.is_subtype(&string(&universe), &both));
    assert!(types.is_subtype(&both, &number(&universe)));
}

#[test]
fn assignability_adds_boxing_and_unchecked_conversion() {
    let universe = universe_with([]);
    let types = universe.types();
    let int = types.primitive(PrimitiveType::Int);
    let long = types.primitive(PrimitiveType::Long);
    let short = types.primitive(PrimitiveType::Short);

    assert!(types.is_assignable(&int, &integer(&universe)));
    assert!(types.is_assignable(
        &int,
        &ty(&universe, "java.lang.Comparable", vec![integer(&universe)])
    ));
    assert!(!types.is_assignable(&int, &ty(&universe, "java.lang.Long", vec![])));
    assert!(types.is_assignable(&integer(&universe), &long));
    assert!(types.is_assignable(&integer(&universe), &int));
    assert!(!types.is_assignable(&integer(&universe), &short));
    assert!(!types.is_assignable(&ty(&universe, "java.lang.Long", vec![]), &int));

    let raw = ty(&universe, "java.util.ArrayList", vec![]);
    assert!(types.is_raw(&raw));
    let list_of_strings = ty(&universe, "java.util.List", vec![string(&universe)]);
    assert!(!types.is_subtype(&raw, &list_of_strings));
    assert!(types.is_assignable(&raw, &list_of_strings));
    assert!(types.is_subtype(&list_of_strings, &ty(&universe, "java.util.List", vec![])));
}

#[test]
fn boxing_helpers() {
    let universe = universe_with([]);
    let types = universe.types();
    assert_eq!(
        types.boxed_class(PrimitiveType::Char).qualified_name(),
        "java.lang.Character"
    );
    assert_eq!(
        types.unboxed_type(&integer(&universe)).expect("unboxes"),
        types.primitive(PrimitiveType::Int)
    );
    assert!(types.unboxed_type(&string(&universe)).is_err());
}

#[test]
fn same_type_is_structural_except_for_wildcards() {
    let universe = universe_with([]);
    let types = universe.types();
    let list = |arg: TypeMirror| ty(&universe, "java.util.List", vec![arg]);

    assert!(types.is_same_type(&list(string(&universe)), &list(string(&universe))));
    assert!(!types.is_same_type(&list(string(&universe)), &list(integer(&universe))));

    let unbounded = types.wildcard(None, None).expect("wildcard");
    assert!(!types.is_same_type(&unbounded, &unbounded));
    assert!(types.is_same_type(
        &list(unbounded),
        &list(TypeMirror::extends_wildcard(types.object_type()))
    ));

    let ints = TypeMirror::array(types.primitive(PrimitiveType::Int));
    assert!(types.is_same_type(&ints, &ints.clone()));
    assert!(!types.is_same_type(
        &ints,
        &TypeMirror::array(types.primitive(PrimitiveType::Long))
    ));
}
