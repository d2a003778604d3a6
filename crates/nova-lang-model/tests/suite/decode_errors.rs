use std::sync::Arc;

use nova_classfile::{ClassStub, MethodStub};
use nova_lang_model::{ArchiveError, MemoryArchive, ModelError, TypeMirror};
use pretty_assertions::assert_eq;

use super::fixtures::{class, register, universe_with};

#[test]
fn malformed_signatures_fail_only_the_affected_class() {
    let universe = universe_with([MemoryArchive::new("bad.jar").with_classes([
        ClassStub::new("p/Bad").signature("<T:Ljava/lang/Object"),
        ClassStub::new("p/Good")
            .extends(Some("p/Bad"))
            .method(MethodStub::new("m", "()V")),
    ])]);

    let bad = class(&universe, "p.Bad");
    let first = bad.superclass().expect_err("signature is truncated");
    assert!(matches!(first, ModelError::Decode { .. }), "{first:?}");
    assert!(first.to_string().contains("p.Bad"), "{first}");
    assert_eq!(bad.superclass().expect_err("replayed"), first);
    assert!(bad.type_parameters().is_err());

    let good = class(&universe, "p.Good");
    assert_eq!(
        good.superclass().expect("good signature"),
        TypeMirror::declared(bad.id(), vec![])
    );
    assert!(good.method("m", "()V").expect("members").is_some());
}

#[test]
fn unreadable_entries_surface_archive_errors_once() {
    let archive = Arc::new(
        MemoryArchive::new("broken.jar")
            .with_unreadable("p/Broken", "truncated entry")
            .with_class(ClassStub::new("p/Fine"))
            .with_class(ClassStub::new("p/Kid").extends(Some("p/Broken"))),
    );
    let universe = universe_with([]);
    register(&universe, &archive);

    let broken = class(&universe, "p.Broken");
    assert!(!broken.is_missing());
    let err = broken.superclass().expect_err("entry cannot be read");
    assert_eq!(
        err,
        ModelError::Archive(ArchiveError::Io {
            archive: "broken.jar".to_string(),
            entry: "p/Broken".to_string(),
            message: "truncated entry".to_string(),
        })
    );
    let reads = archive.read_count();
    assert_eq!(broken.superclass().expect_err("replayed"), err);
    assert!(broken.annotation_mirrors().is_err());
    assert_eq!(archive.read_count(), reads);

    // Inherited annotations cannot be collected past the unreadable superclass.
    let kid = class(&universe, "p.Kid");
    assert_eq!(kid.annotation_mirrors().expect("own annotations"), vec![]);
    assert_eq!(
        universe.elements().all_annotation_mirrors(kid.id().into()),
        Err(err.clone())
    );

    let fine = class(&universe, "p.Fine");
    assert_eq!(
        fine.superclass().expect("readable"),
        universe.types().object_type()
    );
}
