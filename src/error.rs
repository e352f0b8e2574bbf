use crate::Path;
use thiserror::Error;

/// Structural failures raised by the reducer and path resolution.
///
/// These mean an operation did not match the shape of the current root (a stale
/// or malformed path). They are never expected in normal single-flight use.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("no value at path '{path}'")]
    PathNotFound { path: Path },
    #[error("expected {expected} at path '{path}', found {found}")]
    TypeMismatch {
        path: Path,
        expected: &'static str,
        found: &'static str,
    },
    #[error("key '{key}' already exists at path '{path}'")]
    DuplicateKey { path: Path, key: String },
    #[error("adding to the object at path '{path}' requires a key")]
    MissingKey { path: Path },
    #[error("array at path '{path}' does not take a key")]
    UnexpectedKey { path: Path },
    #[error("the root value is not an entry of any container")]
    RootEntry,
}

/// Failures surfaced by the interaction controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("entry at path '{path}' has no key to rename")]
    NotRenamable { path: Path },
}
