//! File access rooted at a configured content directory.
//!
//! Templates and replacement specifications are addressed by logical paths
//! relative to a root, so the rest of the engine never touches absolute
//! filesystem paths.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read-only view over a directory tree.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Create a source rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether the root directory exists on disk.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A source rooted at a subdirectory of this one.
    pub fn child(&self, relative: &str) -> FileSource {
        FileSource {
            root: self.root.join(relative),
        }
    }

    /// Read a file under the root as UTF-8 text.
    pub fn read_text(&self, relative: &str) -> std::io::Result<String> {
        fs::read_to_string(self.root.join(relative))
    }

    /// List every file under the root, recursively, as paths relative to
    /// the root. Results are sorted so callers see a stable order; a
    /// missing root yields an empty list.
    pub fn list_files_recursively(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.root)
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_read_text() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "folder/order.json", r#"{"id": "A1"}"#);

        let source = FileSource::new(dir.path());
        let content = source.read_text("folder/order.json").unwrap();
        assert_eq!(content, r#"{"id": "A1"}"#);

        assert!(source.read_text("folder/missing.json").is_err());
    }

    #[test]
    fn test_child_and_exists() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "replacements/order.json", "{}");

        let source = FileSource::new(dir.path());
        assert!(source.exists());
        assert!(source.child("replacements").exists());
        assert!(!source.child("nowhere").exists());
    }

    #[test]
    fn test_list_files_recursively_is_relative_and_sorted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.json", "{}");
        write(dir.path(), "a/nested.json", "{}");
        write(dir.path(), "a/deep/leaf.json", "{}");

        let source = FileSource::new(dir.path());
        let files = source.list_files_recursively();
        assert_eq!(
            files,
            vec![
                PathBuf::from("a/deep/leaf.json"),
                PathBuf::from("a/nested.json"),
                PathBuf::from("b.json"),
            ]
        );
    }

    #[test]
    fn test_list_files_on_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path()).child("missing");
        assert!(source.list_files_recursively().is_empty());
    }
}
