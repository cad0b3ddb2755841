use std::path::{Path, PathBuf};

use thiserror::Error;

/// A discovered JDK: the `javac` binary plus, when the installation layout
/// allows, the `jmods/` directory used to resolve JDK types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkInstallation {
    root: Option<PathBuf>,
    javac: PathBuf,
}

#[derive(Debug, Error)]
pub enum JdkDiscoveryError {
    #[error("could not discover a JDK installation (tried JAVA_HOME and `javac` on PATH)")]
    NotFound,

    #[error("JAVA_HOME `{root}` does not contain `bin/{binary}`", binary = javac_binary())]
    MissingJavac { root: PathBuf },
}

impl JdkInstallation {
    pub fn javac(&self) -> &Path {
        &self.javac
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// The `jmods/` directory, when present. Absent on JRE-style layouts;
    /// callers then simply cannot resolve JDK-provided types.
    pub fn jmods_dir(&self) -> Option<PathBuf> {
        let dir = self.root.as_ref()?.join("jmods");
        dir.is_dir().then_some(dir)
    }

    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, JdkDiscoveryError> {
        let root = root.as_ref().to_path_buf();
        let javac = root.join("bin").join(javac_binary());
        if !javac.is_file() {
            return Err(JdkDiscoveryError::MissingJavac { root });
        }
        Ok(Self {
            root: Some(root),
            javac,
        })
    }

    /// Discovery order: `JAVA_HOME`, then `javac` on `PATH` (inferring the
    /// root from the binary's grandparent directory).
    pub fn discover() -> Result<Self, JdkDiscoveryError> {
        if let Some(home) = std::env::var_os("JAVA_HOME") {
            let home = PathBuf::from(home);
            if let Ok(found) = Self::from_root(&home) {
                return Ok(found);
            }
        }
        discover_from_path().ok_or(JdkDiscoveryError::NotFound)
    }
}

fn discover_from_path() -> Option<JdkInstallation> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        let candidate = dir.join(javac_binary());
        if candidate.is_file() {
            // <root>/bin/javac — the grandparent is the installation root.
            let root = candidate
                .parent()
                .and_then(Path::parent)
                .map(Path::to_path_buf);
            return Some(JdkInstallation {
                root,
                javac: candidate,
            });
        }
    }
    None
}

const fn javac_binary() -> &'static str {
    if cfg!(windows) {
        "javac.exe"
    } else {
        "javac"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_root_requires_bin_javac() {
        let dir = tempfile::tempdir().unwrap();
        let err = JdkInstallation::from_root(dir.path()).unwrap_err();
        assert!(matches!(err, JdkDiscoveryError::MissingJavac { .. }));

        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(javac_binary()), b"").unwrap();
        let jdk = JdkInstallation::from_root(dir.path()).unwrap();
        assert_eq!(jdk.root(), Some(dir.path()));
        assert!(jdk.jmods_dir().is_none());

        std::fs::create_dir_all(dir.path().join("jmods")).unwrap();
        assert!(jdk.jmods_dir().is_some());
    }
}
