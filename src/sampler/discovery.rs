//! Candidate file discovery under a resolved root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// The two extension classes searched under a directory root.
///
/// Documentation files are enumerated before source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileClasses {
    pub documentation: Vec<String>,
    pub source: Vec<String>,
}

impl Default for FileClasses {
    fn default() -> Self {
        Self {
            documentation: vec!["md".to_string()],
            source: vec!["py".to_string()],
        }
    }
}

impl FileClasses {
    pub fn new(documentation: Vec<String>, source: Vec<String>) -> Self {
        Self {
            documentation: normalize_extensions(documentation),
            source: normalize_extensions(source),
        }
    }
}

fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
    extensions
        .into_iter()
        .map(|ext| ext.trim().trim_start_matches("*.").trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// Enumerate candidate files for a root.
///
/// A file is its own candidate. A directory is walked once per extension
/// class, sorted by file name. Symlinked files are candidates but symlinked
/// directories are not descended into.
pub fn discover_files(root: &Path, classes: &FileClasses) -> Vec<PathBuf> {
    if !root.is_dir() {
        return vec![root.to_path_buf()];
    }

    let mut files = walk_with_extensions(root, &classes.documentation);
    files.extend(walk_with_extensions(root, &classes.source));
    files
}

fn walk_with_extensions(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    if extensions.is_empty() {
        return Vec::new();
    }

    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        // Symlinked files count; symlinked directories are not walked.
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
        })
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn file_root_is_its_own_candidate() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "x").unwrap();
        assert_eq!(discover_files(&file, &FileClasses::default()), vec![file]);
    }

    #[test]
    fn documentation_class_comes_before_source_class() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();
        fs::write(dir.path().join("z.md"), "").unwrap();
        fs::write(dir.path().join("pkg/b.md"), "").unwrap();
        fs::write(dir.path().join("pkg/c.py"), "").unwrap();
        fs::write(dir.path().join("ignored.rs"), "").unwrap();

        let files = discover_files(dir.path(), &FileClasses::default());
        assert_eq!(names(dir.path(), &files), vec!["pkg/b.md", "z.md", "a.py", "pkg/c.py"]);
    }

    #[test]
    fn traversal_order_is_stable() {
        let dir = TempDir::new().unwrap();
        for name in ["delta.md", "alpha.md", "charlie.md", "bravo.md"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let first = discover_files(dir.path(), &FileClasses::default());
        let second = discover_files(dir.path(), &FileClasses::default());
        assert_eq!(first, second);
        assert_eq!(
            names(dir.path(), &first),
            vec!["alpha.md", "bravo.md", "charlie.md", "delta.md"]
        );
    }

    #[test]
    fn directories_named_like_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("folder.md")).unwrap();
        fs::write(dir.path().join("folder.md/inner.md"), "").unwrap();
        let files = discover_files(dir.path(), &FileClasses::default());
        assert_eq!(names(dir.path(), &files), vec!["folder.md/inner.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_candidates_but_linked_dirs_are_not_walked() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("real.md"), "cache notes").unwrap();
        fs::create_dir(outside.path().join("nested")).unwrap();
        fs::write(outside.path().join("nested/deep.md"), "").unwrap();

        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.md"), dir.path().join("link.md")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("nested"), dir.path().join("linked")).unwrap();

        let files = discover_files(dir.path(), &FileClasses::default());
        assert_eq!(names(dir.path(), &files), vec!["link.md"]);
    }

    #[test]
    fn custom_classes_are_normalized() {
        let classes = FileClasses::new(
            vec![" .rst".to_string(), "*.txt".to_string(), "".to_string()],
            vec!["rs".to_string()],
        );
        assert_eq!(classes.documentation, vec!["rst", "txt"]);
        assert_eq!(classes.source, vec!["rs"]);
    }
}
