use nova_classfile::{ClassStub, MethodStub};
use nova_lang_model::{
    ElementId, MemoryArchive, ModelError, PrimitiveType, TypeKind, TypeMirror, Universe,
};
use pretty_assertions::assert_eq;

use super::fixtures::{class, ty, universe_with};

fn generic_universe() -> Universe {
    universe_with([MemoryArchive::new("generic.jar").with_classes([
        ClassStub::new("p/Box")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(
                MethodStub::new("pick", "(Ljava/lang/Object;)Ljava/lang/Object;")
                    .signature("<U:TT;>(TU;)TU;"),
            )
            .method(MethodStub::new("get", "()Ljava/lang/Object;").signature("()TT;"))
            .method(
                MethodStub::new("same", "(Ljava/lang/Object;)Ljava/lang/Object;")
                    .signature("<V:Ljava/lang/Object;>(TV;)TV;"),
            ),
        ClassStub::new("p/Sorted")
            .signature("<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;"),
        ClassStub::new_enum("p/Color"),
    ])])
}

#[test]
fn erasure_drops_arguments_and_follows_leftmost_bounds() {
    let universe = generic_universe();
    let types = universe.types();
    let s = ty(&universe, "java.lang.String", vec![]);

    let list_of_strings = ty(&universe, "java.util.List", vec![s.clone()]);
    assert_eq!(types.erasure(&list_of_strings), ty(&universe, "java.util.List", vec![]));

    let sorted_t = class(&universe, "p.Sorted").type_parameters().expect("params")[0].as_type();
    assert_eq!(types.erasure(&sorted_t), ty(&universe, "java.lang.Comparable", vec![]));

    let enum_e = class(&universe, "java.lang.Enum").type_parameters().expect("params")[0].as_type();
    assert_eq!(types.erasure(&enum_e), ty(&universe, "java.lang.Enum", vec![]));
    assert_eq!(
        types.erasure(&TypeMirror::array(enum_e)),
        TypeMirror::array(ty(&universe, "java.lang.Enum", vec![]))
    );
    assert_eq!(
        types.erasure(&TypeMirror::extends_wildcard(s.clone())),
        s
    );

    let missing = universe.lookup().resolve("x/Gone", None).as_type();
    assert_eq!(types.erasure(&missing), missing);
}

#[test]
fn erasure_is_idempotent() {
    let universe = generic_universe();
    let types = universe.types();
    let number = ty(&universe, "java.lang.Number", vec![]);
    let samples = vec![
        ty(
            &universe,
            "java.util.Map",
            vec![number.clone(), TypeMirror::extends_wildcard(number.clone())],
        ),
        class(&universe, "p.Sorted").type_parameters().expect("params")[0].as_type(),
        TypeMirror::array(class(&universe, "p.Box").type_parameters().expect("params")[0].as_type()),
        TypeMirror::Intersection(vec![number, ty(&universe, "java.io.Serializable", vec![])]),
        types.primitive(PrimitiveType::Double),
    ];
    for sample in samples {
        let once = types.erasure(&sample);
        assert_eq!(types.erasure(&once), once, "erasure of {sample:?}");
    }
}

#[test]
fn self_referential_bounds_point_back_at_the_parameter() {
    let universe = generic_universe();
    let enum_class = class(&universe, "java.lang.Enum");
    let params = enum_class.type_parameters().expect("params");
    let e = &params[0];
    assert_eq!(e.name(), "E");
    assert_eq!(
        e.bounds(),
        vec![TypeMirror::declared(enum_class.id(), vec![e.as_type()])]
    );
    assert_eq!(e.generic_element(), Some(ElementId::Type(enum_class.id())));

    let types = universe.types();
    let color = class(&universe, "p.Color");
    let comparable_color = ty(&universe, "java.lang.Comparable", vec![color.as_type()]);
    assert!(types.is_subtype(&color.as_type(), &comparable_color));
    assert_eq!(
        color.superclass().expect("superclass"),
        TypeMirror::declared(enum_class.id(), vec![color.as_type()])
    );
}

#[test]
fn substitution_replaces_type_variables() {
    let universe = generic_universe();
    let types = universe.types();
    let list = class(&universe, "java.util.List");
    let e = list.type_parameters().expect("params")[0].id();
    let s = ty(&universe, "java.lang.String", vec![]);

    assert_eq!(
        types.substitute(&list.as_type(), &[e], &[s.clone()]),
        ty(&universe, "java.util.List", vec![s.clone()])
    );
    let wildcard = TypeMirror::super_wildcard(TypeMirror::TypeVar(e));
    assert_eq!(
        types.substitute(&wildcard, &[e], &[s.clone()]),
        TypeMirror::super_wildcard(s)
    );
}

#[test]
fn members_viewed_through_a_parameterized_subtype() {
    let universe = generic_universe();
    let types = universe.types();
    let s = ty(&universe, "java.lang.String", vec![]);
    let get = class(&universe, "java.util.List")
        .method("get", "(I)Ljava/lang/Object;")
        .expect("members")
        .expect("List.get");

    let array_list = ty(&universe, "java.util.ArrayList", vec![s.clone()]);
    let viewed = types
        .as_member_of(&array_list, get.id().into())
        .expect("List.get is a member of ArrayList<String>");
    let viewed = viewed.as_executable().expect("executable type");
    assert_eq!(viewed.return_type, s);
    assert_eq!(viewed.params, vec![types.primitive(PrimitiveType::Int)]);
    assert_eq!(viewed.receiver, ty(&universe, "java.util.List", vec![s.clone()]));

    let raw = ty(&universe, "java.util.ArrayList", vec![]);
    let erased = types.as_member_of(&raw, get.id().into()).expect("raw view");
    assert_eq!(
        erased.as_executable().expect("executable type").return_type,
        types.object_type()
    );

    let get_key = class(&universe, "java.util.Map.Entry")
        .method("getKey", "()Ljava/lang/Object;")
        .expect("members")
        .expect("Entry.getKey");
    let not_a_member = types.as_member_of(&array_list, get_key.id().into());
    assert!(matches!(not_a_member, Err(ModelError::IllegalArgument(_))));

    let package = class(&universe, "java.util.List").package().expect("package");
    assert!(types.as_member_of(&array_list, package.id().into()).is_err());
}

#[test]
fn generic_methods_get_fresh_variables_when_their_bounds_change() {
    let universe = generic_universe();
    let types = universe.types();
    let s = ty(&universe, "java.lang.String", vec![]);
    let box_class = class(&universe, "p.Box");
    let box_of_strings = ty(&universe, "p.Box", vec![s.clone()]);

    let pick = box_class
        .method("pick", "(Ljava/lang/Object;)Ljava/lang/Object;")
        .expect("members")
        .expect("pick");
    let declared = pick.executable_type().expect("signature");
    let viewed = types
        .as_member_of(&box_of_strings, pick.id().into())
        .expect("member");
    let viewed = viewed.as_executable().expect("executable type");

    assert_eq!(viewed.type_vars.len(), 1);
    assert!(viewed.type_vars[0] != declared.type_vars[0]);
    let fresh = universe.type_parameter(viewed.type_vars[0]);
    assert_eq!(fresh.name(), "U");
    assert_eq!(fresh.bounds(), vec![s.clone()]);
    assert_eq!(viewed.return_type, fresh.as_type());
    assert_eq!(types.erasure(&viewed.return_type), s);

    // `V` is bounded by Object only, so the declared variable survives.
    let same = box_class
        .method("same", "(Ljava/lang/Object;)Ljava/lang/Object;")
        .expect("members")
        .expect("same");
    let viewed = types
        .as_member_of(&box_of_strings, same.id().into())
        .expect("member");
    assert_eq!(
        viewed.as_executable().expect("executable type").type_vars,
        same.executable_type().expect("signature").type_vars
    );

    let get = box_class
        .method("get", "()Ljava/lang/Object;")
        .expect("members")
        .expect("get");
    let viewed = types
        .as_member_of(&box_of_strings, get.id().into())
        .expect("member");
    assert_eq!(viewed.as_executable().expect("executable type").return_type.kind(), TypeKind::Declared);
}

#[test]
fn generic_methods_keep_their_declared_exceptions() {
    let universe = universe_with([MemoryArchive::new("io.jar").with_classes([
        ClassStub::new("p/Oops"),
        ClassStub::new("p/Io")
            .method(
                MethodStub::new("read", "(Ljava/lang/Object;)V")
                    .signature("<T:Ljava/lang/Object;>(TT;)V")
                    .throws("p/Oops"),
            )
            .method(
                MethodStub::new("rethrow", "()V")
                    .signature("<X:Ljava/lang/Object;>()V^TX;")
                    .throws("java/lang/Object"),
            ),
    ])]);
    let io = class(&universe, "p.Io");

    let read = io
        .method("read", "(Ljava/lang/Object;)V")
        .expect("members")
        .expect("read");
    assert_eq!(
        read.thrown_types().expect("signature"),
        vec![ty(&universe, "p.Oops", vec![])]
    );

    let rethrow = io.method("rethrow", "()V").expect("members").expect("rethrow");
    let exec = rethrow.executable_type().expect("signature");
    assert_eq!(exec.thrown, vec![TypeMirror::TypeVar(exec.type_vars[0])]);
}
