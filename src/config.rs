//! Lint configuration.
//!
//! A [`LintConfig`] is built once by the caller (CLI flags or code) and passed
//! by reference into every check. Nothing here is global.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::violation::Severity;

/// How hard the documentation checks push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Lenient,
    #[default]
    Standard,
    Strict,
}

impl Strictness {
    /// Severity for a function with no documentation at all.
    pub fn missing_doc_severity(self) -> Severity {
        match self {
            Strictness::Lenient => Severity::Warning,
            Strictness::Standard | Strictness::Strict => Severity::Error,
        }
    }

    /// Severity for documentation that exists but lacks required pieces.
    pub fn format_severity(self) -> Severity {
        match self {
            Strictness::Lenient => Severity::Info,
            Strictness::Standard => Severity::Warning,
            Strictness::Strict => Severity::Error,
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strictness::Lenient => write!(f, "lenient"),
            Strictness::Standard => write!(f, "standard"),
            Strictness::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Strictness::Lenient),
            "standard" => Ok(Strictness::Standard),
            "strict" => Ok(Strictness::Strict),
            _ => Err(format!("unknown strictness: {}", s)),
        }
    }
}

/// Options for documentation and cross-reference checks.
#[derive(Debug, Clone, Serialize)]
pub struct LintConfig {
    pub strictness: Strictness,
    /// Run the structural format check on documented functions.
    pub check_format: bool,
    /// Pair implementation files with headers and diff them.
    pub cross_reference: bool,
    /// Report return-type and per-parameter type drift separately instead of
    /// a single count-based signature mismatch.
    pub strict_signatures: bool,
    /// Base directory for pairing searches. `None` means the process working
    /// directory.
    pub project_root: Option<PathBuf>,
    /// Subdirectories of `include/` (and `src/`) searched during pairing.
    pub include_subdirs: Vec<String>,
    /// Program entry point, exempt from documentation and cross-reference checks.
    pub entry_point: String,
    /// Name prefixes marking test/debug helpers.
    pub reserved_prefixes: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Standard,
            check_format: false,
            cross_reference: true,
            strict_signatures: false,
            project_root: None,
            include_subdirs: Vec::new(),
            entry_point: "main".to_string(),
            reserved_prefixes: vec!["test_".to_string(), "debug_".to_string()],
        }
    }
}

impl LintConfig {
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn with_format_check(mut self, enabled: bool) -> Self {
        self.check_format = enabled;
        self
    }

    pub fn with_cross_reference(mut self, enabled: bool) -> Self {
        self.cross_reference = enabled;
        self
    }

    pub fn with_strict_signatures(mut self, enabled: bool) -> Self {
        self.strict_signatures = enabled;
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn with_include_subdirs(mut self, subdirs: Vec<String>) -> Self {
        self.include_subdirs = subdirs;
        self
    }

    /// Directory pairing searches start from.
    pub fn search_root(&self) -> PathBuf {
        match &self.project_root {
            Some(root) => root.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf()),
        }
    }

    /// True if `name` is the entry point or carries a reserved prefix.
    pub fn is_exempt_name(&self, name: &str) -> bool {
        name == self.entry_point
            || self
                .reserved_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
    }
}
