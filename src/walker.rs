//! Directory traversal with gitignore support.
//!
//! Uses the `ignore` crate to walk directories while respecting
//! .gitignore, .git/info/exclude, global gitignore, and .doclintignore.

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;
use thiserror::Error;

use crate::filter::{detect_source_kind, SourceKind};

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Respect .gitignore patterns.
    pub respect_gitignore: bool,
    /// Glob patterns (matched against the path relative to the root) to skip.
    pub exclude: Vec<Pattern>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_symlinks: false,
            include_hidden: false,
            respect_gitignore: true,
            exclude: Vec::new(),
        }
    }
}

impl WalkOptions {
    /// Create options that include hidden files.
    pub fn with_hidden() -> Self {
        Self {
            include_hidden: true,
            ..Default::default()
        }
    }

    /// Set maximum depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Add exclude patterns. Invalid patterns are dropped.
    pub fn exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.exclude
            .extend(patterns.iter().filter_map(|p| Pattern::new(p.as_ref()).ok()));
        self
    }
}

/// A C-family file found by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub kind: SourceKind,
}

/// Collect C-family source files under `root`, sorted by path.
///
/// A file path is returned as-is if it is a C-family file.
///
/// # Examples
///
/// ```no_run
/// use doclint::walker::{source_files, WalkOptions};
/// use std::path::Path;
///
/// for entry in source_files(Path::new("."), &WalkOptions::default()).unwrap() {
///     println!("{} ({})", entry.path.display(), entry.kind);
/// }
/// ```
pub fn source_files(root: &Path, options: &WalkOptions) -> Result<Vec<SourceEntry>, WalkError> {
    if !root.exists() {
        return Err(WalkError::NotFound {
            path: root.to_path_buf(),
        });
    }

    if root.is_file() {
        return Ok(detect_source_kind(root)
            .map(|kind| SourceEntry {
                path: root.to_path_buf(),
                kind,
            })
            .into_iter()
            .collect());
    }

    let mut builder = WalkBuilder::new(root);

    builder
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .follow_links(options.follow_symlinks);

    if let Some(depth) = options.max_depth {
        builder.max_depth(Some(depth));
    }

    let doclintignore = root.join(".doclintignore");
    if doclintignore.exists() {
        builder.add_ignore(&doclintignore);
    }

    let mut entries = Vec::new();

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(ignore::Error::Io(io_err)) => {
                let path = root.to_path_buf();
                if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                    return Err(WalkError::PermissionDenied { path });
                }
                return Err(WalkError::Io {
                    path,
                    source: io_err,
                });
            }
            // Skip non-IO errors (like gitignore parse errors)
            Err(_) => continue,
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if options
            .exclude
            .iter()
            .any(|pattern| pattern.matches_path(relative))
        {
            continue;
        }

        if let Some(kind) = detect_source_kind(path) {
            entries.push(SourceEntry {
                path: path.to_path_buf(),
                kind,
            });
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("include")).unwrap();
        fs::write(dir.path().join("src/main.c"), "int main(void) { return 0; }").unwrap();
        fs::write(dir.path().join("src/util.c"), "void util(void) {}").unwrap();
        fs::write(dir.path().join("include/util.h"), "void util(void);").unwrap();
        fs::write(dir.path().join("Makefile"), "all:").unwrap();

        dir
    }

    fn names(entries: &[SourceEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_source_files_basic() {
        let dir = create_test_dir();

        let entries = source_files(dir.path(), &WalkOptions::default()).unwrap();

        assert_eq!(names(&entries), ["util.h", "main.c", "util.c"]);
        assert_eq!(entries[0].kind, SourceKind::Header);
        assert_eq!(entries[1].kind, SourceKind::Implementation);
    }

    #[test]
    fn test_source_files_nonexistent() {
        let result = source_files(Path::new("/nonexistent/path"), &WalkOptions::default());
        assert!(matches!(result, Err(WalkError::NotFound { .. })));
    }

    #[test]
    fn test_single_file_root() {
        let dir = create_test_dir();
        let file = dir.path().join("src/util.c");

        let entries = source_files(&file, &WalkOptions::default()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, file);

        let makefile = source_files(&dir.path().join("Makefile"), &WalkOptions::default()).unwrap();
        assert!(makefile.is_empty());
    }

    #[test]
    fn test_respects_gitignore() {
        let dir = TempDir::new().unwrap();

        // Initialize git repo (ignore crate needs this to respect .gitignore)
        fs::create_dir(dir.path().join(".git")).unwrap();

        fs::write(dir.path().join("visible.c"), "").unwrap();
        fs::write(dir.path().join("generated.c"), "").unwrap();
        fs::write(dir.path().join(".gitignore"), "generated.c").unwrap();

        let entries = source_files(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(names(&entries), ["visible.c"]);
    }

    #[test]
    fn test_respects_doclintignore() {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("keep.c"), "").unwrap();
        fs::write(dir.path().join("skip.c"), "").unwrap();
        fs::write(dir.path().join(".doclintignore"), "skip.c").unwrap();

        let entries = source_files(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(names(&entries), ["keep.c"]);
    }

    #[test]
    fn test_hidden_files() {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("visible.c"), "").unwrap();
        fs::write(dir.path().join(".hidden.c"), "").unwrap();

        let entries = source_files(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(names(&entries), ["visible.c"]);

        let entries = source_files(dir.path(), &WalkOptions::with_hidden()).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = create_test_dir();

        let options = WalkOptions::default().exclude(&["include/*"]);
        let entries = source_files(dir.path(), &options).unwrap();
        assert_eq!(names(&entries), ["main.c", "util.c"]);
    }

    #[test]
    fn test_max_depth() {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::write(dir.path().join("a/b/c/deep.c"), "").unwrap();
        fs::write(dir.path().join("a/shallow.c"), "").unwrap();

        let options = WalkOptions::default().max_depth(2);
        let entries = source_files(dir.path(), &options).unwrap();
        assert_eq!(names(&entries), ["shallow.c"]);
    }
}
