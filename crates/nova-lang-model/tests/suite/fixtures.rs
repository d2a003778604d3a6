//! A miniature `java.base` plus helpers for building universes in tests.

use std::sync::Arc;

use nova_classfile::access::{ACC_ABSTRACT, ACC_FINAL, ACC_INTERFACE, ACC_PUBLIC, ACC_STATIC, ACC_SUPER};
use nova_classfile::{Annotation, ClassStub, MethodStub};
use nova_lang_model::{MemoryArchive, ModelConfig, TypeElement, TypeMirror, Universe};
use nova_modules::ModuleInfo;

pub const INHERITED: &str = "Ljava/lang/annotation/Inherited;";

fn abstract_method(name: &str, descriptor: &str, signature: &str) -> MethodStub {
    MethodStub::new(name, descriptor)
        .access(ACC_PUBLIC | ACC_ABSTRACT)
        .signature(signature)
}

fn number_box(internal_name: &str) -> ClassStub {
    ClassStub::new(internal_name)
        .access(ACC_PUBLIC | ACC_FINAL | ACC_SUPER)
        .extends(Some("java/lang/Number"))
        .implements("java/lang/Comparable")
        .signature(format!(
            "Ljava/lang/Number;Ljava/lang/Comparable<L{internal_name};>;"
        ))
}

fn plain_box(internal_name: &str) -> ClassStub {
    ClassStub::new(internal_name)
        .access(ACC_PUBLIC | ACC_FINAL | ACC_SUPER)
        .implements("java/io/Serializable")
}

pub fn java_base_info() -> ModuleInfo {
    ModuleInfo::explicit("java.base")
        .exports("java.io")
        .exports("java.lang")
        .exports("java.lang.annotation")
        .exports("java.util")
}

/// The handful of platform classes the suite relies on, packaged as module `java.base`.
pub fn jdk() -> MemoryArchive {
    let map_entry_flags = ACC_PUBLIC | ACC_STATIC | ACC_INTERFACE | ACC_ABSTRACT;
    MemoryArchive::new("jdk/java.base").with_classes([
        ClassStub::new_module_info(java_base_info()),
        ClassStub::new("java/lang/Object")
            .method(MethodStub::new("<init>", "()V"))
            .method(MethodStub::new("hashCode", "()I"))
            .method(MethodStub::new("equals", "(Ljava/lang/Object;)Z"))
            .method(MethodStub::new("toString", "()Ljava/lang/String;")),
        ClassStub::new_interface("java/io/Serializable"),
        ClassStub::new_interface("java/lang/Cloneable"),
        ClassStub::new_interface("java/lang/CharSequence")
            .method(MethodStub::new("length", "()I").access(ACC_PUBLIC | ACC_ABSTRACT)),
        ClassStub::new_interface("java/lang/Comparable")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(abstract_method("compareTo", "(Ljava/lang/Object;)I", "(TT;)I")),
        ClassStub::new("java/lang/String")
            .access(ACC_PUBLIC | ACC_FINAL | ACC_SUPER)
            .implements("java/io/Serializable")
            .implements("java/lang/Comparable")
            .implements("java/lang/CharSequence")
            .signature(
                "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;Ljava/lang/CharSequence;",
            )
            .method(MethodStub::new("length", "()I")),
        ClassStub::new("java/lang/Number")
            .access(ACC_PUBLIC | ACC_ABSTRACT | ACC_SUPER)
            .implements("java/io/Serializable"),
        number_box("java/lang/Integer"),
        number_box("java/lang/Long"),
        number_box("java/lang/Short"),
        number_box("java/lang/Byte"),
        number_box("java/lang/Float"),
        number_box("java/lang/Double"),
        plain_box("java/lang/Boolean"),
        plain_box("java/lang/Character"),
        ClassStub::new("java/lang/Enum")
            .access(ACC_PUBLIC | ACC_ABSTRACT | ACC_SUPER)
            .implements("java/lang/Comparable")
            .implements("java/io/Serializable")
            .signature(
                "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
            )
            .method(MethodStub::new("name", "()Ljava/lang/String;").access(ACC_PUBLIC | ACC_FINAL)),
        ClassStub::new("java/lang/Record").access(ACC_PUBLIC | ACC_ABSTRACT | ACC_SUPER),
        ClassStub::new_interface("java/lang/Iterable")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        ClassStub::new_interface("java/lang/annotation/Annotation"),
        ClassStub::new_annotation("java/lang/annotation/Inherited"),
        ClassStub::new_interface("java/util/Collection")
            .implements("java/lang/Iterable")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;")
            .method(abstract_method("add", "(Ljava/lang/Object;)Z", "(TE;)Z")),
        ClassStub::new_interface("java/util/List")
            .implements("java/util/Collection")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
            .method(abstract_method("add", "(Ljava/lang/Object;)Z", "(TE;)Z"))
            .method(abstract_method("get", "(I)Ljava/lang/Object;", "(I)TE;")),
        ClassStub::new("java/util/ArrayList")
            .implements("java/util/List")
            .implements("java/io/Serializable")
            .signature(
                "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;Ljava/io/Serializable;",
            )
            .method(MethodStub::new("<init>", "()V"))
            .method(MethodStub::new("add", "(Ljava/lang/Object;)Z").signature("(TE;)Z"))
            .method(MethodStub::new("get", "(I)Ljava/lang/Object;").signature("(I)TE;")),
        ClassStub::new_interface("java/util/Map")
            .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
            .inner_class("java/util/Map$Entry", Some("java/util/Map"), Some("Entry"), map_entry_flags),
        ClassStub::new_interface("java/util/Map$Entry")
            .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
            .inner_class("java/util/Map$Entry", Some("java/util/Map"), Some("Entry"), map_entry_flags)
            .method(abstract_method("getKey", "()Ljava/lang/Object;", "()TK;")),
    ])
}

/// An annotation type marked `@Inherited`.
pub fn inherited_annotation_type(internal_name: &str) -> ClassStub {
    ClassStub::new_annotation(internal_name).annotation(Annotation::new(INHERITED))
}

pub fn universe_with(archives: impl IntoIterator<Item = MemoryArchive>) -> Universe {
    let universe = Universe::new(ModelConfig::default()).expect("default config is valid");
    universe
        .register_archive(jdk().into_arc())
        .expect("register jdk");
    for archive in archives {
        universe
            .register_archive(archive.into_arc())
            .expect("register archive");
    }
    universe
}

pub fn register(universe: &Universe, archive: &Arc<MemoryArchive>) {
    universe
        .register_archive(archive.clone())
        .expect("register archive");
}

pub fn class<'u>(universe: &'u Universe, qualified: &str) -> TypeElement<'u> {
    universe
        .elements()
        .type_element(qualified)
        .unwrap_or_else(|| panic!("type {qualified} should resolve"))
}

/// `qualified<args>` as a declared type.
pub fn ty(universe: &Universe, qualified: &str, args: Vec<TypeMirror>) -> TypeMirror {
    let element = class(universe, qualified).id();
    universe
        .types()
        .declared_type(element, args)
        .unwrap_or_else(|err| panic!("{qualified}: {err}"))
}
