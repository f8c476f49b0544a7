//! Error types for doclint.

use std::path::PathBuf;

use crate::output::OutputError;
use crate::parsed::ParseError;
use crate::walker::WalkError;

/// Top-level error type for doclint operations.
#[derive(Debug, thiserror::Error)]
pub enum DoclintError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("no C or C++ source files found in {0}")]
    NoFilesFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Map an error to its exit code.
///
/// Exit code 1 is reserved for "violations found".
pub fn exit_code(error: &DoclintError) -> i32 {
    match error {
        DoclintError::PathNotFound(_) => 3,
        DoclintError::PermissionDenied(_) => 4,
        DoclintError::NoFilesFound(_) => 5,
        DoclintError::Io(_) => 2,
        DoclintError::Walk(_) => 2,
        DoclintError::Parse(_) => 2,
        DoclintError::Output(_) => 2,
    }
}
