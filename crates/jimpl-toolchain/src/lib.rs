//! Driving the host Java toolchain: out-of-process `javac` invocation and
//! JAR assembly for compiled implementations.

#![forbid(unsafe_code)]

mod command;
mod discovery;
mod jar;
mod javac;

pub use crate::command::{CommandOutput, CommandRunner, DefaultCommandRunner};
pub use crate::discovery::{JdkDiscoveryError, JdkInstallation};
pub use crate::jar::package_jar;
pub use crate::javac::Toolchain;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("no Java compiler available (tried JAVA_HOME and `javac` on PATH)")]
    NoCompilerAvailable,

    #[error("generated source failed to compile:\n{diagnostics}")]
    Compile { diagnostics: String },

    #[error("failed to package archive `{path}`")]
    Package {
        path: PathBuf,
        #[source]
        source: PackageFailure,
    },
}

#[derive(Debug, Error)]
pub enum PackageFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
