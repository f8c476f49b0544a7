//! C-family file classification.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Header extensions, in pairing priority order.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "hxx"];

/// Implementation extensions, in pairing priority order.
pub const IMPLEMENTATION_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Role of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Header,
    Implementation,
}

impl SourceKind {
    /// File extensions for this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceKind::Header => HEADER_EXTENSIONS,
            SourceKind::Implementation => IMPLEMENTATION_EXTENSIONS,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Header => write!(f, "header"),
            SourceKind::Implementation => write!(f, "implementation"),
        }
    }
}

/// Classify a path by extension (case-insensitive).
pub fn detect_source_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if HEADER_EXTENSIONS.contains(&ext.as_str()) {
        Some(SourceKind::Header)
    } else if IMPLEMENTATION_EXTENSIONS.contains(&ext.as_str()) {
        Some(SourceKind::Implementation)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_source_kind() {
        assert_eq!(detect_source_kind(Path::new("src/a.c")), Some(SourceKind::Implementation));
        assert_eq!(detect_source_kind(Path::new("src/a.CPP")), Some(SourceKind::Implementation));
        assert_eq!(detect_source_kind(Path::new("include/a.h")), Some(SourceKind::Header));
        assert_eq!(detect_source_kind(Path::new("include/a.hpp")), Some(SourceKind::Header));
        assert_eq!(detect_source_kind(Path::new("README.md")), None);
        assert_eq!(detect_source_kind(Path::new("Makefile")), None);
    }

    #[test]
    fn test_extensions_start_with_c_defaults() {
        assert_eq!(SourceKind::Header.extensions()[0], "h");
        assert_eq!(SourceKind::Implementation.extensions()[0], "c");
    }
}
