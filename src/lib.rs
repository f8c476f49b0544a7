//! doclint - documentation and declaration consistency checks for C-family code.
//!
//! doclint tokenizes C and C++ sources, extracts function signatures along
//! with the comments documenting them, and cross-checks implementation files
//! against their headers.
//!
//! # Quick Start
//!
//! ```no_run
//! use doclint::builder::Linter;
//! use doclint::config::{LintConfig, Strictness};
//!
//! let report = Linter::new("./my-project")
//!     .config(LintConfig::default().with_strictness(Strictness::Strict))
//!     .run()
//!     .unwrap();
//!
//! for violation in report.violations() {
//!     println!("{violation}");
//! }
//! ```
//!
//! # Modules
//!
//! - [`lexer`] - Tokenizer for C-family source text
//! - [`signature`] - Function signature extraction from token streams
//! - [`parsed`] - Per-file token and function inventory
//! - [`docs`] - Documentation presence and format checks
//! - [`xref`] - Header/implementation pairing and diffing
//! - [`violation`] - Findings, kinds and severities
//! - [`config`] - Lint options and strictness levels
//! - [`filter`] - Header/implementation file classification
//! - [`walker`] - Directory traversal with gitignore support
//! - [`builder`] - Fluent API for linting trees
//! - [`output`] - Text and JSON rendering
//!
//! # Supported Files
//!
//! - Headers (`.h`, `.hpp`, `.hh`, `.hxx`)
//! - Implementations (`.c`, `.cc`, `.cpp`, `.cxx`)

pub mod lexer;
pub mod signature;
pub mod parsed;
pub mod docs;
pub mod xref;
pub mod violation;
pub mod config;
pub mod filter;
pub mod errors;
pub mod walker;
pub mod output;
pub mod builder;

// Re-export key types at crate root for convenience
pub use builder::{lint_file, FileReport, LintReport, Linter};
pub use config::{LintConfig, Strictness};
pub use errors::DoclintError;
pub use filter::SourceKind;
pub use lexer::{scan, Token, TokenKind};
pub use output::OutputError;
pub use parsed::{ParseError, ParsedFile};
pub use signature::{extract, FunctionInfo, Parameter};
pub use violation::{Category, Severity, Violation, ViolationKind};
pub use walker::WalkError;
pub use xref::{XRefKind, XRefViolation, XrefError};
