use std::sync::Arc;

use nova_classfile::ClassStub;
use nova_lang_model::{Archive, MapModuleResolver, MemoryArchive, ModelConfig, Universe};
use nova_modules::{ModuleInfo, ModuleKind, ModuleName};
use pretty_assertions::assert_eq;

use super::fixtures::{jdk, universe_with};

fn module_jar(info: ModuleInfo, classes: &[&str]) -> MemoryArchive {
    let name = format!("{}.jar", info.name);
    MemoryArchive::new(name)
        .with_class(ClassStub::new_module_info(info))
        .with_classes(classes.iter().map(|&class| ClassStub::new(class)))
}

fn names(universe: &Universe, module: &str) -> Vec<String> {
    universe
        .module_by_name(module)
        .expect("module registered")
        .readable_modules()
        .iter()
        .map(|m| m.name().to_string())
        .collect()
}

#[test]
fn readability_follows_transitive_edges_past_the_first_hop() {
    let universe = universe_with([
        module_jar(ModuleInfo::explicit("app").requires("lib.a", false), &["app/Main"]),
        module_jar(ModuleInfo::explicit("lib.a").requires("lib.b", true), &["a/A"]),
        module_jar(ModuleInfo::explicit("lib.b").requires("lib.c", false), &["b/B"]),
        module_jar(ModuleInfo::explicit("lib.c"), &["c/C"]),
    ]);

    assert_eq!(names(&universe, "app"), vec!["app", "lib.a", "java.base", "lib.b"]);

    let app = universe.module_by_name("app").expect("app");
    assert!(app.reads(&ModuleName::new("lib.b")));
    assert!(!app.reads(&ModuleName::new("lib.c")));

    let lookup = universe.lookup();
    assert!(!lookup.resolve("b/B", Some(app.id())).is_missing());
    let hidden = lookup.resolve("c/C", Some(app.id()));
    assert!(hidden.is_missing());
    assert_eq!(hidden.module(), app);

    let lib_b = universe.module_by_name("lib.b").expect("lib.b");
    assert!(!lookup.resolve("c/C", Some(lib_b.id())).is_missing());
}

#[test]
fn reachable_edges_include_the_implicit_base_module() {
    let universe = universe_with([module_jar(
        ModuleInfo::explicit("app").requires("lib.a", true),
        &[],
    )]);
    let app = universe.module_by_name("app").expect("app");
    let edges: Vec<(String, bool)> = app
        .reachable_modules()
        .into_iter()
        .map(|edge| (edge.name.to_string(), edge.is_transitive))
        .collect();
    assert_eq!(
        edges,
        vec![("lib.a".to_string(), true), ("java.base".to_string(), false)]
    );

    let base = universe.module_by_name("java.base").expect("java.base");
    assert!(base.reachable_modules().is_empty());
}

#[test]
fn the_unnamed_module_reads_every_module() {
    let universe = universe_with([
        module_jar(ModuleInfo::explicit("lib.a"), &["a/A"]),
        MemoryArchive::new("classes").with_class(ClassStub::new("plain/Thing")),
    ]);
    let unnamed = universe.unnamed_module();
    assert!(unnamed.is_unnamed());
    assert!(unnamed.reads(&ModuleName::new("lib.a")));
    assert!(unnamed.reads(&ModuleName::new("java.base")));

    let thing = universe.lookup().resolve("plain/Thing", None);
    assert!(!thing.is_missing());
    assert_eq!(thing.module(), unnamed);
    assert!(!universe.lookup().resolve("a/A", None).is_missing());
}

#[test]
fn closure_loads_dependencies_and_reports_unresolvable_ones() {
    let lib_a: Arc<dyn Archive> =
        module_jar(ModuleInfo::explicit("lib.a").requires("lib.b", false), &["a/A"]).into_arc();
    let lib_b: Arc<dyn Archive> =
        module_jar(ModuleInfo::explicit("lib.b").requires("lib.c", false), &["b/B"]).into_arc();
    let resolver = MapModuleResolver::new()
        .with_module("lib.a", lib_a)
        .with_module("lib.b", lib_b);

    let universe = Universe::new(ModelConfig::default())
        .expect("config")
        .with_resolver(resolver);
    universe.register_archive(jdk().into_arc()).expect("jdk");
    universe
        .register_archive(
            module_jar(
                ModuleInfo::explicit("app")
                    .requires("lib.a", true)
                    .requires("ghost", false),
                &["app/Main"],
            )
            .into_arc(),
        )
        .expect("app");

    let unresolved = universe.compute_modules_closure();
    assert_eq!(unresolved, vec![ModuleName::new("ghost")]);

    assert!(universe.module_by_name("lib.a").is_some());
    // lib.a is reached transitively, so its own requirements are loaded too.
    assert!(universe.module_by_name("lib.b").is_some());
    // lib.b is a plain dependency and is not expanded further.
    assert!(universe.module_by_name("lib.c").is_none());

    let app = universe.module_by_name("app").expect("app");
    assert!(!universe.lookup().resolve("a/A", Some(app.id())).is_missing());
}

#[test]
fn closure_accepts_a_closure_resolver() {
    let lib_x = module_jar(ModuleInfo::explicit("lib.x"), &["x/X"]).into_arc();
    let universe = Universe::new(ModelConfig::default())
        .expect("config")
        .with_resolver(move |name: &ModuleName| (name.as_str() == "lib.x").then(|| lib_x.clone()));
    universe.register_archive(jdk().into_arc()).expect("jdk");
    universe
        .register_archive(module_jar(ModuleInfo::explicit("app").requires("lib.x", false), &[]).into_arc())
        .expect("app");

    assert!(universe.compute_modules_closure().is_empty());
    let lib_x = universe.module_by_name("lib.x").expect("lib.x loaded");
    assert_eq!(lib_x.kind(), ModuleKind::Explicit);
}

#[test]
fn archives_without_descriptors_become_automatic_or_unnamed() {
    let universe = universe_with([
        MemoryArchive::new("named.jar")
            .with_manifest("Automatic-Module-Name", "com.example.named")
            .with_class(ClassStub::new("com/example/named/N")),
        MemoryArchive::new("anonymous.jar")
            .with_file_name("commons-lang3-3.12.0.jar")
            .with_class(ClassStub::new("org/apache/commons/lang3/StringUtils")),
    ]);

    let named = universe
        .module_by_name("com.example.named")
        .expect("manifest names the module");
    assert_eq!(named.kind(), ModuleKind::Automatic);
    assert!(named.reads(&ModuleName::new("java.base")));

    // File-name derivation is off by default.
    let utils = universe
        .lookup()
        .resolve("org/apache/commons/lang3/StringUtils", None);
    assert!(utils.module().is_unnamed());
}

#[test]
fn file_names_derive_module_names_when_enabled() {
    let config =
        ModelConfig::from_toml_str("derive_automatic_module_names = true").expect("valid config");
    let universe = Universe::new(config).expect("config");
    universe.register_archive(jdk().into_arc()).expect("jdk");
    let id = universe
        .register_archive(
            MemoryArchive::new("anonymous.jar")
                .with_file_name("commons-lang3-3.12.0.jar")
                .with_class(ClassStub::new("org/apache/commons/lang3/StringUtils"))
                .into_arc(),
        )
        .expect("register");
    assert_eq!(universe.module(id).name().as_str(), "commons.lang3");
    assert_eq!(universe.module(id).kind(), ModuleKind::Automatic);
}

#[test]
fn archives_registered_after_gathering_stay_invisible() {
    let universe = universe_with([module_jar(ModuleInfo::explicit("lib.a"), &["a/A"])]);
    let lib_a = universe.module_by_name("lib.a").expect("lib.a");
    assert_eq!(lib_a.packages().expect("packages").len(), 1);

    let late = module_jar(ModuleInfo::explicit("lib.a"), &["a/Late"]).into_arc();
    let id = universe.register_archive(late).expect("register");
    assert_eq!(id, lib_a.id());
    assert_eq!(lib_a.archives().len(), 2);
    assert!(universe
        .elements()
        .type_element_in(lib_a.id(), "a.Late")
        .is_none());
}

#[test]
fn exports_restrict_explicit_modules_only() {
    let universe = universe_with([
        module_jar(
            ModuleInfo::explicit("lib.a").exports("a"),
            &["a/A", "a/internal/Hidden"],
        ),
        MemoryArchive::new("loose.jar").with_class(ClassStub::new("l/Loose")),
    ]);
    let other = ModuleName::new("app");

    let base = universe.base_module();
    assert!(base.exports_to("java.util", &other));
    assert!(!base.exports_to("jdk.internal.misc", &other));

    let lib_a = universe.module_by_name("lib.a").expect("lib.a");
    assert!(lib_a.exports_to("a", &other));
    assert!(!lib_a.exports_to("a.internal", &other));
    assert!(lib_a.exports_to("a.internal", lib_a.name()));

    assert!(universe.unnamed_module().exports_to("l", &other));
}
