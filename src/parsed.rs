//! Per-file parse results.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::lexer::{scan, Token};
use crate::signature::{extract, FunctionInfo};

/// Errors while loading a file for analysis.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Token stream and function inventory of one source file.
///
/// Built once and never mutated; consumers borrow it and drop it when done.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    path: PathBuf,
    tokens: Vec<Token>,
    functions: Vec<FunctionInfo>,
}

impl ParsedFile {
    /// Read and parse a file.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; only I/O failures are
    /// errors.
    pub fn parse(path: &Path) -> Result<Self, ParseError> {
        let bytes = std::fs::read(path).map_err(|source| ParseError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(Self::from_source(path, &content))
    }

    /// Parse in-memory source as if it were read from `path`.
    pub fn from_source(path: impl Into<PathBuf>, content: &str) -> Self {
        let tokens = scan(content);
        let functions = extract(&tokens);
        Self {
            path: path.into(),
            tokens,
            functions,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    /// First record with this name.
    pub fn function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// First definition (record with a body) with this name.
    pub fn definition(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions
            .iter()
            .find(|f| f.name == name && f.is_definition)
    }
}
