//! Header/implementation cross-referencing.
//!
//! Pairs an implementation file with its header by directory convention,
//! parses both, and diffs the two function inventories.
//!
//! Pairing looks under each base directory (the working directory, then the
//! project root, then the file's own directory) for, in order:
//!
//! ```text
//! include/<name>.h
//! include/<subdir>/<name>.h     for each configured subdir
//! <name>.h
//! ```
//!
//! The reverse lookup uses `src/` in place of `include/`.

use std::collections::{HashSet, TryReserveError};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::LintConfig;
use crate::docs::normalize_type_string;
use crate::filter::{HEADER_EXTENSIONS, IMPLEMENTATION_EXTENSIONS};
use crate::parsed::{ParseError, ParsedFile};
use crate::signature::FunctionInfo;
use crate::violation::{push_checked, Category, Severity, Violation, ViolationKind};

/// Kind of cross-reference finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum XRefKind {
    SignatureMismatch,
    MissingDeclaration,
    MissingImplementation,
    DocInconsistency,
    ParameterMismatch,
    ReturnTypeMismatch,
}

impl From<XRefKind> for ViolationKind {
    fn from(kind: XRefKind) -> Self {
        match kind {
            XRefKind::SignatureMismatch => ViolationKind::SignatureMismatch,
            XRefKind::MissingDeclaration => ViolationKind::MissingDeclaration,
            XRefKind::MissingImplementation => ViolationKind::MissingImplementation,
            XRefKind::DocInconsistency => ViolationKind::DocInconsistency,
            XRefKind::ParameterMismatch => ViolationKind::ParameterMismatch,
            XRefKind::ReturnTypeMismatch => ViolationKind::ReturnTypeMismatch,
        }
    }
}

impl fmt::Display for XRefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ViolationKind::from(*self))
    }
}

/// A difference between a header and its implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XRefViolation {
    pub function_name: String,
    pub kind: XRefKind,
    pub header_line: Option<usize>,
    pub impl_line: Option<usize>,
    pub description: String,
}

/// Errors that stop a pairing's analysis.
#[derive(Debug, Error)]
pub enum XrefError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Findings collected before the failure.
    #[error("out of memory after {} findings", .collected.len())]
    Allocation {
        collected: Vec<XRefViolation>,
        #[source]
        source: TryReserveError,
    },
}

/// True if a function takes part in cross-referencing.
pub fn is_eligible(func: &FunctionInfo, config: &LintConfig) -> bool {
    !func.is_static && !config.is_exempt_name(&func.name)
}

/// Find the header paired with an implementation file.
pub fn find_header(impl_path: &Path, root: &Path, subdirs: &[String]) -> Option<PathBuf> {
    find_pair(impl_path, root, "include", subdirs, HEADER_EXTENSIONS)
}

/// Find the implementation paired with a header file.
pub fn find_implementation(header_path: &Path, root: &Path, subdirs: &[String]) -> Option<PathBuf> {
    find_pair(header_path, root, "src", subdirs, IMPLEMENTATION_EXTENSIONS)
}

fn find_pair(
    path: &Path,
    root: &Path,
    conventional_dir: &str,
    subdirs: &[String],
    extensions: &[&str],
) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let own_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut bases: Vec<&Path> = vec![cwd.as_path()];
    if root != cwd.as_path() {
        bases.push(root);
    }
    bases.push(own_dir);

    candidate_paths(stem, &bases, conventional_dir, subdirs, extensions)
        .into_iter()
        .find(|candidate| candidate.is_file() && candidate.as_path() != path)
}

/// All pairing candidates in priority order.
fn candidate_paths(
    stem: &str,
    bases: &[&Path],
    conventional_dir: &str,
    subdirs: &[String],
    extensions: &[&str],
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for base in bases {
        let conventional = base.join(conventional_dir);
        let mut dirs = vec![conventional.clone()];
        dirs.extend(subdirs.iter().map(|sub| conventional.join(sub)));
        dirs.push(base.to_path_buf());

        for dir in dirs {
            for ext in extensions {
                candidates.push(dir.join(format!("{}.{}", stem, ext)));
            }
        }
    }

    candidates
}

/// Cross-reference an implementation file against its header.
///
/// Never fails: with no header, an unreadable file, or an allocation failure
/// the result is whatever could be collected (usually nothing).
pub fn analyze(impl_path: &Path, config: &LintConfig) -> Vec<XRefViolation> {
    let root = config.search_root();
    let Some(header_path) = find_header(impl_path, &root, &config.include_subdirs) else {
        return Vec::new();
    };

    match analyze_pair(impl_path, &header_path, config) {
        Ok(violations) => violations,
        Err(XrefError::Allocation { collected, .. }) => collected,
        Err(XrefError::Parse(_)) => Vec::new(),
    }
}

/// Cross-reference two known files.
pub fn analyze_pair(
    impl_path: &Path,
    header_path: &Path,
    config: &LintConfig,
) -> Result<Vec<XRefViolation>, XrefError> {
    let implementation = ParsedFile::parse(impl_path)?;
    let header = ParsedFile::parse(header_path)?;
    compare(&implementation, &header, config)
}

/// Diff two parsed inventories.
pub fn compare(
    implementation: &ParsedFile,
    header: &ParsedFile,
    config: &LintConfig,
) -> Result<Vec<XRefViolation>, XrefError> {
    let mut out = Vec::new();

    // Each name is reported once, at its first record.
    let mut seen: HashSet<&str> = HashSet::new();

    // Implementation -> header
    for func in implementation
        .functions()
        .iter()
        .filter(|f| f.is_definition && is_eligible(f, config))
    {
        if !seen.insert(func.name.as_str()) {
            continue;
        }

        let Some(decl) = header.function(&func.name) else {
            record(
                &mut out,
                XRefViolation {
                    function_name: func.name.clone(),
                    kind: XRefKind::MissingDeclaration,
                    header_line: None,
                    impl_line: Some(func.line_number),
                    description: format!(
                        "'{}' is defined but not declared in {}",
                        func.name,
                        header.path().display()
                    ),
                },
            )?;
            continue;
        };

        for finding in compare_signatures(decl, func, config) {
            record(&mut out, finding)?;
        }

        if let (Some(header_doc), Some(impl_doc)) =
            (decl.documentation_text.as_deref(), func.documentation_text.as_deref())
        {
            if !docs_consistent(header_doc, impl_doc) {
                record(
                    &mut out,
                    XRefViolation {
                        function_name: func.name.clone(),
                        kind: XRefKind::DocInconsistency,
                        header_line: Some(decl.line_number),
                        impl_line: Some(func.line_number),
                        description: format!(
                            "documentation for '{}' differs between header and implementation",
                            func.name
                        ),
                    },
                )?;
            }
        }
    }

    // Header -> implementation
    seen.clear();
    for decl in header
        .functions()
        .iter()
        .filter(|f| is_eligible(f, config))
    {
        if !seen.insert(decl.name.as_str()) {
            continue;
        }

        if !decl.has_documentation {
            record(
                &mut out,
                XRefViolation {
                    function_name: decl.name.clone(),
                    kind: XRefKind::DocInconsistency,
                    header_line: Some(decl.line_number),
                    impl_line: None,
                    description: format!("header declaration of '{}' is undocumented", decl.name),
                },
            )?;
        }

        if !decl.is_definition && implementation.definition(&decl.name).is_none() {
            record(
                &mut out,
                XRefViolation {
                    function_name: decl.name.clone(),
                    kind: XRefKind::MissingImplementation,
                    header_line: Some(decl.line_number),
                    impl_line: None,
                    description: format!(
                        "'{}' is declared but not implemented in {}",
                        decl.name,
                        implementation.path().display()
                    ),
                },
            )?;
        }
    }

    Ok(out)
}

/// Signature findings for a matched declaration/definition pair.
///
/// By default the return type and parameter count are compared and any
/// difference is one `SignatureMismatch`. With `strict_signatures`, return
/// type and parameters are reported separately and parameter types are
/// compared one by one.
fn compare_signatures(
    decl: &FunctionInfo,
    def: &FunctionInfo,
    config: &LintConfig,
) -> Vec<XRefViolation> {
    let decl_ret = normalize_type_string(&decl.return_type);
    let def_ret = normalize_type_string(&def.return_type);
    let return_differs = decl_ret != def_ret;
    let count_differs = decl.parameter_count() != def.parameter_count();

    let finding = |kind: XRefKind, description: String| XRefViolation {
        function_name: def.name.clone(),
        kind,
        header_line: Some(decl.line_number),
        impl_line: Some(def.line_number),
        description,
    };

    if !config.strict_signatures {
        if return_differs || count_differs {
            return vec![finding(
                XRefKind::SignatureMismatch,
                format!(
                    "header declares '{}' but implementation defines '{}'",
                    decl.signature(),
                    def.signature()
                ),
            )];
        }
        return Vec::new();
    }

    let mut findings = Vec::new();
    if return_differs {
        findings.push(finding(
            XRefKind::ReturnTypeMismatch,
            format!(
                "'{}' returns '{}' in header but '{}' in implementation",
                def.name, decl_ret, def_ret
            ),
        ));
    }
    if count_differs {
        findings.push(finding(
            XRefKind::ParameterMismatch,
            format!(
                "'{}' takes {} parameter(s) in header but {} in implementation",
                def.name,
                decl.parameter_count(),
                def.parameter_count()
            ),
        ));
    } else {
        for (index, (hp, ip)) in decl.parameters.iter().zip(def.parameters.iter()).enumerate() {
            let (h, i) = (normalize_type_string(&hp.ty), normalize_type_string(&ip.ty));
            if h != i {
                findings.push(finding(
                    XRefKind::ParameterMismatch,
                    format!(
                        "parameter {} of '{}' is '{}' in header but '{}' in implementation",
                        index + 1,
                        def.name,
                        h,
                        i
                    ),
                ));
            }
        }
    }
    findings
}

/// Whether two documentation texts for the same function agree.
///
/// Any two present docs are currently treated as consistent.
fn docs_consistent(_header_doc: &str, _impl_doc: &str) -> bool {
    true
}

fn record(out: &mut Vec<XRefViolation>, finding: XRefViolation) -> Result<(), XrefError> {
    push_checked(out, finding).map_err(|source| XrefError::Allocation {
        collected: std::mem::take(out),
        source,
    })
}

/// Convert cross-reference findings into generic violations.
///
/// Header-side findings (no implementation line) point at the header.
pub fn to_violations(
    findings: &[XRefViolation],
    impl_path: &Path,
    header_path: &Path,
) -> Vec<Violation> {
    findings
        .iter()
        .map(|finding| {
            let (category, severity) = match finding.kind {
                XRefKind::DocInconsistency => (Category::Info, Severity::Info),
                _ => (Category::Header, Severity::Warning),
            };
            let (file, line) = match (finding.impl_line, finding.header_line) {
                (Some(line), _) => (impl_path, line),
                (None, Some(line)) => (header_path, line),
                (None, None) => (impl_path, 1),
            };
            Violation::new(
                finding.kind.into(),
                severity,
                category,
                file,
                line,
                finding.description.clone(),
            )
        })
        .collect()
}
