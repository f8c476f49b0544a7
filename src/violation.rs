//! Findings produced by the documentation and cross-reference checks.

use std::collections::TryReserveError;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// How serious a finding is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Presentation tag grouping related kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Documentation,
    Header,
    Info,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Documentation => write!(f, "Docs"),
            Category::Header => write!(f, "Header"),
            Category::Info => write!(f, "Info"),
        }
    }
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    MissingDocumentation,
    ImproperDocumentationFormat,
    SignatureMismatch,
    MissingDeclaration,
    MissingImplementation,
    DocInconsistency,
    ParameterMismatch,
    ReturnTypeMismatch,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::MissingDocumentation => "missing-documentation",
            ViolationKind::ImproperDocumentationFormat => "improper-documentation-format",
            ViolationKind::SignatureMismatch => "signature-mismatch",
            ViolationKind::MissingDeclaration => "missing-declaration",
            ViolationKind::MissingImplementation => "missing-implementation",
            ViolationKind::DocInconsistency => "doc-inconsistency",
            ViolationKind::ParameterMismatch => "parameter-mismatch",
            ViolationKind::ReturnTypeMismatch => "return-type-mismatch",
        };
        f.write_str(name)
    }
}

/// A single finding at a file location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub category: Category,
    pub file: PathBuf,
    /// 1-indexed line.
    pub line: usize,
    pub message: String,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        severity: Severity,
        category: Category,
        file: impl Into<PathBuf>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            category,
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}: {}",
            self.file.display(),
            self.line,
            self.severity,
            self.category,
            self.kind,
            self.message
        )
    }
}

/// Append to a findings list without aborting the process on allocation
/// failure.
///
/// Growth keeps `Vec`'s amortized doubling; only the reservation is checked.
pub fn push_checked<T>(list: &mut Vec<T>, item: T) -> Result<(), TryReserveError> {
    list.try_reserve(1)?;
    list.push(item);
    Ok(())
}
