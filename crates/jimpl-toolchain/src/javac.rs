use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::command::{CommandRunner, DefaultCommandRunner};
use crate::discovery::JdkInstallation;
use crate::ToolchainError;

/// The external compiler. Invocations are synchronous and out-of-process;
/// every failure is terminal for the current target.
#[derive(Debug)]
pub struct Toolchain {
    javac: PathBuf,
    runner: Box<dyn CommandRunner>,
}

impl Toolchain {
    /// Locate `javac` on the host. Failure is [`ToolchainError::NoCompilerAvailable`].
    pub fn discover() -> Result<Self, ToolchainError> {
        let jdk = JdkInstallation::discover().map_err(|err| {
            tracing::debug!(target = "jimpl.toolchain", error = %err, "jdk discovery failed");
            ToolchainError::NoCompilerAvailable
        })?;
        Ok(Self::new(jdk.javac().to_path_buf(), Box::new(DefaultCommandRunner)))
    }

    pub fn new(javac: PathBuf, runner: Box<dyn CommandRunner>) -> Self {
        Self { javac, runner }
    }

    /// Compile `source_file` with UTF-8 encoding and the given classpath
    /// entries, working in `source_root`. Compiled classes land next to
    /// their sources.
    pub fn compile(
        &self,
        source_root: &Path,
        source_file: &Path,
        classpath: &[PathBuf],
    ) -> Result<(), ToolchainError> {
        let args = vec![
            "-encoding".to_string(),
            "UTF-8".to_string(),
            "-cp".to_string(),
            join_classpath(classpath),
            source_file.display().to_string(),
        ];

        tracing::debug!(
            target = "jimpl.toolchain",
            javac = %self.javac.display(),
            source = %source_file.display(),
            "invoking compiler"
        );

        let output = self
            .runner
            .run(source_root, &self.javac, &args)
            .map_err(|err| {
                tracing::debug!(target = "jimpl.toolchain", error = %err, "compiler spawn failed");
                ToolchainError::NoCompilerAvailable
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ToolchainError::Compile {
                diagnostics: output.combined(),
            })
        }
    }
}

fn join_classpath(entries: &[PathBuf]) -> String {
    std::env::join_paths(entries)
        .map(|joined: OsString| joined.to_string_lossy().into_owned())
        .unwrap_or_else(|_| {
            entries
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(if cfg!(windows) { ";" } else { ":" })
        })
}
