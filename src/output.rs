//! Output formatting for doclint.
//!
//! Renders lint reports, function inventories and token streams as plain
//! text for terminals or JSON for tooling.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::builder::LintReport;
use crate::lexer::Token;
use crate::signature::FunctionInfo;
use crate::violation::Severity;

/// Errors that can occur during output formatting.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per violation plus a summary (default).
    #[default]
    Text,
    /// JSON for programmatic access.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Serialize)]
struct JsonSummary {
    files: usize,
    functions: usize,
    violations: usize,
    errors: usize,
    warnings: usize,
    info: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a LintReport,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonFunctions<'a> {
    path: &'a Path,
    functions: &'a [FunctionInfo],
}

#[derive(Serialize)]
struct JsonTokens<'a> {
    path: &'a Path,
    token_count: usize,
    tokens: &'a [Token],
}

fn summary(report: &LintReport) -> JsonSummary {
    JsonSummary {
        files: report.files.len(),
        functions: report.total_functions(),
        violations: report.total_violations(),
        errors: report.count_at(Severity::Error),
        warnings: report.count_at(Severity::Warning),
        info: report.count_at(Severity::Info),
    }
}

// ============================================================================
// Main Entry Points
// ============================================================================

/// Format a lint report.
pub fn format_report(report: &LintReport, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Text => Ok(format_report_text(report)),
        OutputFormat::Json => {
            let output = JsonReport {
                report,
                summary: summary(report),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

/// Format the function inventory of one file.
pub fn format_functions(
    path: &Path,
    functions: &[FunctionInfo],
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonFunctions { path, functions })?),
        OutputFormat::Text => {
            let mut output = String::new();
            for func in functions {
                let mut flags = Vec::new();
                if func.is_static {
                    flags.push("static");
                }
                flags.push(if func.is_definition {
                    "definition"
                } else {
                    "declaration"
                });
                if func.has_documentation {
                    flags.push("documented");
                }
                let _ = writeln!(
                    output,
                    "{}:{}: {} [{}]",
                    path.display(),
                    func.line_number,
                    func.signature(),
                    flags.join(", ")
                );
            }
            Ok(output)
        }
    }
}

/// Format a token stream.
pub fn format_tokens(
    path: &Path,
    tokens: &[Token],
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonTokens {
            path,
            token_count: tokens.len(),
            tokens,
        })?),
        OutputFormat::Text => {
            let mut output = String::new();
            for token in tokens {
                let _ = writeln!(
                    output,
                    "{}:{}\t{}\t{:?}",
                    token.line, token.column, token.kind, token.text
                );
            }
            Ok(output)
        }
    }
}

// ============================================================================
// Text Formatting
// ============================================================================

fn format_report_text(report: &LintReport) -> String {
    let mut output = String::new();

    for violation in report.violations() {
        let _ = writeln!(output, "{}", violation);
    }

    let summary = summary(report);
    if summary.violations > 0 {
        output.push('\n');
    }
    let _ = writeln!(
        output,
        "{} {} checked, {} {}: {} {}, {} {}, {} info",
        summary.files,
        plural(summary.files, "file", "files"),
        summary.violations,
        plural(summary.violations, "violation", "violations"),
        summary.errors,
        plural(summary.errors, "error", "errors"),
        summary.warnings,
        plural(summary.warnings, "warning", "warnings"),
        summary.info,
    );

    output
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
