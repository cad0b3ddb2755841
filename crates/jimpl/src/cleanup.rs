use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One entry that could not be removed during staging cleanup.
#[derive(Debug)]
pub struct CleanupWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Remove `dir` and everything under it, deepest entries first. Failures are
/// collected instead of raised so that cleanup runs to the end and the
/// original outcome of the run is preserved.
pub fn remove_dir_best_effort(dir: &Path) -> Vec<CleanupWarning> {
    let mut warnings = Vec::new();
    for entry in WalkDir::new(dir).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warnings.push(CleanupWarning {
                    path: err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                    message: err.to_string(),
                });
                continue;
            }
        };
        let removed = if entry.file_type().is_dir() {
            std::fs::remove_dir(entry.path())
        } else {
            std::fs::remove_file(entry.path())
        };
        if let Err(err) = removed {
            warnings.push(CleanupWarning {
                path: entry.path().to_path_buf(),
                message: err.to_string(),
            });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("staging");
        std::fs::create_dir_all(root.join("p/q")).unwrap();
        std::fs::write(root.join("p/q/FooImpl.java"), "x").unwrap();
        std::fs::write(root.join("p/q/FooImpl.class"), "y").unwrap();

        let warnings = remove_dir_best_effort(&root);
        assert!(warnings.is_empty());
        assert!(!root.exists());
    }

    #[test]
    fn missing_root_yields_warning_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let warnings = remove_dir_best_effort(&dir.path().join("never-created"));
        assert_eq!(warnings.len(), 1);
    }
}
