//! Java Platform Module System (JPMS) model.

use std::fmt;

pub const JAVA_BASE: &str = "java.base";

/// Manifest attribute naming an automatic module.
pub const AUTOMATIC_MODULE_NAME: &str = "Automatic-Module-Name";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The unnamed (classpath) module.
    pub fn unnamed() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unnamed(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_java_base(&self) -> bool {
        self.0 == JAVA_BASE
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unnamed() {
            return f.write_str("<unnamed>");
        }
        self.0.fmt(f)
    }
}

impl From<&str> for ModuleName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Declared by a `module-info.class`.
    Explicit,
    /// Named through `Automatic-Module-Name` or the archive file name.
    Automatic,
    /// The classpath.
    Unnamed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub kind: ModuleKind,
    pub name: ModuleName,
    pub is_open: bool,
    pub requires: Vec<Requires>,
    pub exports: Vec<Exports>,
    pub opens: Vec<Opens>,
    pub uses: Vec<Uses>,
    pub provides: Vec<Provides>,
}

impl ModuleInfo {
    /// An explicit module with no directives.
    pub fn explicit(name: impl Into<String>) -> Self {
        Self::with_kind(ModuleKind::Explicit, ModuleName::new(name))
    }

    pub fn automatic(name: impl Into<String>) -> Self {
        Self::with_kind(ModuleKind::Automatic, ModuleName::new(name))
    }

    pub fn unnamed() -> Self {
        Self::with_kind(ModuleKind::Unnamed, ModuleName::unnamed())
    }

    fn with_kind(kind: ModuleKind, name: ModuleName) -> Self {
        Self {
            kind,
            name,
            is_open: false,
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
        }
    }

    pub fn requires(mut self, module: impl Into<String>, is_transitive: bool) -> Self {
        self.requires.push(Requires {
            module: ModuleName::new(module),
            is_transitive,
            is_static: false,
        });
        self
    }

    pub fn exports(mut self, package: impl Into<String>) -> Self {
        self.exports.push(Exports {
            package: package.into(),
            to: Vec::new(),
        });
        self
    }

    pub fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    pub fn requires_module(&self, name: &ModuleName) -> bool {
        self.requires.iter().any(|req| &req.module == name)
    }

    pub fn exports_package_to(&self, package: &str, to: &ModuleName) -> bool {
        if &self.name == to || self.kind != ModuleKind::Explicit {
            return true;
        }

        self.exports.iter().any(|exports| {
            exports.package == package
                && (exports.to.is_empty() || exports.to.iter().any(|m| m == to))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requires {
    pub module: ModuleName,
    pub is_transitive: bool,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exports {
    pub package: String,
    pub to: Vec<ModuleName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opens {
    pub package: String,
    pub to: Vec<ModuleName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uses {
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provides {
    pub service: String,
    pub implementations: Vec<String>,
}

/// Derive an automatic module name from an archive file name, following the rules of
/// `java.lang.module.ModuleFinder.of`: drop the `.jar` extension and any `-<digit>...` version
/// suffix, map non-alphanumerics to `.`, collapse repeated dots and trim dots at either end.
///
/// Returns `None` when nothing usable remains.
pub fn derive_automatic_module_name(file_name: &str) -> Option<ModuleName> {
    let stem = file_name.strip_suffix(".jar").unwrap_or(file_name);

    let bytes = stem.as_bytes();
    let version_start = (0..bytes.len()).find(|&idx| {
        bytes[idx] == b'-' && bytes.get(idx + 1).is_some_and(|c| c.is_ascii_digit())
    });
    let stem = match version_start {
        Some(idx) => &stem[..idx],
        None => stem,
    };

    let mut out = String::with_capacity(stem.len());
    for c in stem.chars() {
        let c = if c.is_alphanumeric() { c } else { '.' };
        if c == '.' && (out.is_empty() || out.ends_with('.')) {
            continue;
        }
        out.push(c);
    }
    while out.ends_with('.') {
        out.pop();
    }

    (!out.is_empty()).then(|| ModuleName::new(out))
}
