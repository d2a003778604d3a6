//! Collaborator interfaces: where class stubs come from.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nova_classfile::ClassStub;
use nova_modules::ModuleName;

use crate::error::ArchiveError;

/// A container of compiled types (jar, jmod, class directory, ...).
///
/// Implementations do the I/O and decoding. The model calls [`Archive::read_class`] at most
/// once per type and memoizes the outcome, failures included.
pub trait Archive: Send + Sync + fmt::Debug {
    /// Stable identity used in diagnostics and for the archive-to-module mapping.
    fn name(&self) -> &str;

    /// File name used to derive an automatic module name, if the archive has one.
    fn file_name(&self) -> Option<&str> {
        None
    }

    /// Internal names of every class entry, including `package-info` and `module-info`.
    fn entries(&self) -> Result<Vec<String>, ArchiveError>;

    fn read_class(&self, internal_name: &str) -> Result<ClassStub, ArchiveError>;

    fn manifest_attribute(&self, key: &str) -> Option<String>;
}

/// Maps a module name to the archive that provides it.
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, module: &ModuleName) -> Option<Arc<dyn Archive>>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&ModuleName) -> Option<Arc<dyn Archive>> + Send + Sync,
{
    fn resolve(&self, module: &ModuleName) -> Option<Arc<dyn Archive>> {
        self(module)
    }
}

/// Resolver over a fixed set of archives.
#[derive(Debug, Default)]
pub struct MapModuleResolver {
    modules: HashMap<ModuleName, Arc<dyn Archive>>,
}

impl MapModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, name: impl Into<String>, archive: Arc<dyn Archive>) -> Self {
        self.modules.insert(ModuleName::new(name), archive);
        self
    }
}

impl ModuleResolver for MapModuleResolver {
    fn resolve(&self, module: &ModuleName) -> Option<Arc<dyn Archive>> {
        self.modules.get(module).cloned()
    }
}

/// An archive whose stubs are already in memory.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    name: String,
    file_name: Option<String>,
    classes: BTreeMap<String, ClassStub>,
    broken: BTreeMap<String, String>,
    manifest: HashMap<String, String>,
    reads: AtomicUsize,
}

impl MemoryArchive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, stub: ClassStub) -> Self {
        self.classes.insert(stub.internal_name.clone(), stub);
        self
    }

    pub fn with_classes(mut self, stubs: impl IntoIterator<Item = ClassStub>) -> Self {
        for stub in stubs {
            self.classes.insert(stub.internal_name.clone(), stub);
        }
        self
    }

    /// An entry that is listed but fails to read with `message`.
    pub fn with_unreadable(mut self, internal_name: impl Into<String>, message: impl Into<String>) -> Self {
        self.broken.insert(internal_name.into(), message.into());
        self
    }

    pub fn with_manifest(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.manifest.insert(key.into(), value.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Number of [`Archive::read_class`] calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn into_arc(self) -> Arc<dyn Archive> {
        Arc::new(self)
    }
}

impl Archive for MemoryArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn entries(&self) -> Result<Vec<String>, ArchiveError> {
        let mut out: Vec<String> = self.classes.keys().cloned().collect();
        out.extend(self.broken.keys().cloned());
        out.sort();
        Ok(out)
    }

    fn read_class(&self, internal_name: &str) -> Result<ClassStub, ArchiveError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if let Some(message) = self.broken.get(internal_name) {
            return Err(ArchiveError::Io {
                archive: self.name.clone(),
                entry: internal_name.to_string(),
                message: message.clone(),
            });
        }
        self.classes
            .get(internal_name)
            .cloned()
            .ok_or_else(|| ArchiveError::MissingEntry {
                archive: self.name.clone(),
                entry: internal_name.to_string(),
            })
    }

    fn manifest_attribute(&self, key: &str) -> Option<String> {
        self.manifest.get(key).cloned()
    }
}
