//! Fluent builder API for doclint.
//!
//! Provides both a builder-style `Linter` for whole trees and `lint_file`
//! for single files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::config::LintConfig;
use crate::docs::check_file;
use crate::errors::DoclintError;
use crate::filter::{detect_source_kind, SourceKind};
use crate::parsed::ParsedFile;
use crate::violation::{Severity, Violation};
use crate::walker::{source_files, WalkError, WalkOptions};
use crate::xref::{compare, find_header, to_violations, XrefError};

/// Builder for linting a source tree.
///
/// # Examples
///
/// ```no_run
/// use doclint::builder::Linter;
/// use doclint::config::{LintConfig, Strictness};
///
/// let report = Linter::new("./project")
///     .config(LintConfig::default().with_strictness(Strictness::Strict))
///     .exclude(&["third_party/*"])
///     .run()
///     .unwrap();
///
/// println!("{} violations", report.total_violations());
/// ```
pub struct Linter {
    root: PathBuf,
    config: LintConfig,
    walk_options: WalkOptions,
}

impl Linter {
    /// Create a new linter for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: LintConfig::default(),
            walk_options: WalkOptions::default(),
        }
    }

    /// Replace the lint configuration.
    pub fn config(mut self, config: LintConfig) -> Self {
        self.config = config;
        self
    }

    /// Skip files matching these globs (relative to the root).
    pub fn exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.walk_options = self.walk_options.exclude(patterns);
        self
    }

    /// Include hidden files.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.walk_options.include_hidden = include;
        self
    }

    /// Set maximum directory depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.walk_options.max_depth = Some(depth);
        self
    }

    /// Walk the tree and lint every C-family file in parallel.
    ///
    /// Without an explicit project root, pairing searches the linted
    /// directory after the working directory.
    pub fn run(self) -> Result<LintReport, DoclintError> {
        let entries = source_files(&self.root, &self.walk_options).map_err(|e| match e {
            WalkError::NotFound { path } => DoclintError::PathNotFound(path),
            WalkError::PermissionDenied { path } => DoclintError::PermissionDenied(path),
            other => DoclintError::Walk(other),
        })?;

        if entries.is_empty() {
            return Err(DoclintError::NoFilesFound(self.root));
        }

        let mut config = self.config;
        if config.project_root.is_none() && self.root.is_dir() {
            config.project_root = Some(self.root.clone());
        }

        let mut files: Vec<FileReport> = entries
            .into_par_iter()
            .map(|entry| lint_file(&entry.path, &config))
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(LintReport {
            root: self.root,
            files,
        })
    }
}

/// Findings for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<SourceKind>,
    pub function_count: usize,
    pub violations: Vec<Violation>,
}

impl FileReport {
    fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: detect_source_kind(path),
            function_count: 0,
            violations: Vec::new(),
        }
    }
}

/// Result of a tree-wide run.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    pub root: PathBuf,
    pub files: Vec<FileReport>,
}

impl LintReport {
    /// All violations, in file order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.files.iter().flat_map(|f| f.violations.iter())
    }

    pub fn total_violations(&self) -> usize {
        self.files.iter().map(|f| f.violations.len()).sum()
    }

    pub fn total_functions(&self) -> usize {
        self.files.iter().map(|f| f.function_count).sum()
    }

    pub fn has_violations(&self) -> bool {
        self.files.iter().any(|f| !f.violations.is_empty())
    }

    /// Number of violations at exactly this severity.
    pub fn count_at(&self, severity: Severity) -> usize {
        self.violations().filter(|v| v.severity == severity).count()
    }
}

/// Lint one file: documentation checks, then cross-reference checks for
/// implementation files that have a header.
///
/// An unreadable file yields an empty report.
pub fn lint_file(path: &Path, config: &LintConfig) -> FileReport {
    let Ok(parsed) = ParsedFile::parse(path) else {
        return FileReport::empty(path);
    };

    let kind = detect_source_kind(path);
    let mut violations = check_file(&parsed, config);

    if config.cross_reference && kind == Some(SourceKind::Implementation) {
        let root = config.search_root();
        let header = find_header(path, &root, &config.include_subdirs)
            .and_then(|header_path| ParsedFile::parse(&header_path).ok());
        if let Some(header) = header {
            let findings = match compare(&parsed, &header, config) {
                Ok(findings) => findings,
                Err(XrefError::Allocation { collected, .. }) => collected,
                Err(XrefError::Parse(_)) => Vec::new(),
            };
            violations.extend(to_violations(&findings, path, header.path()));
        }
    }

    FileReport {
        path: path.to_path_buf(),
        kind,
        function_count: parsed.functions().len(),
        violations,
    }
}
