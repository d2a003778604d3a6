use thiserror::Error;

pub type Result<T, E = ModelError> = std::result::Result<T, E>;

/// Failure reported by an [`crate::Archive`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("failed to read `{entry}` from {archive}: {message}")]
    Io {
        archive: String,
        entry: String,
        message: String,
    },
    #[error("{archive} has no entry `{entry}`")]
    MissingEntry { archive: String, entry: String },
    #[error("malformed archive {archive}: {message}")]
    Malformed { archive: String, message: String },
}

/// Errors surfaced by the element/type model.
///
/// Cloneable so that a failed lazy derivation can be memoized and reported unchanged on every
/// later access without re-running the failing read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("failed to decode {element}: {source}")]
    Decode {
        element: String,
        #[source]
        source: nova_classfile::Error,
    },
    #[error("{element} expects {expected} type arguments, found {found}")]
    InvalidTypeArguments {
        element: String,
        expected: usize,
        found: usize,
    },
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ModelError {
    pub(crate) fn decode(element: impl Into<String>, source: nova_classfile::Error) -> Self {
        ModelError::Decode {
            element: element.into(),
            source,
        }
    }
}
