//! Implementation synthesis: given the binary name of an abstract class or
//! interface, generate the minimal concrete subtype `<SimpleName>Impl`,
//! either as a source file under an output root or compiled and packaged
//! into a JAR.
//!
//! Type information comes through the [`TypeProvider`] seam; compilation and
//! packaging go through `jimpl-toolchain`. The synthesizer itself holds no
//! mutable state, so one instance can serve any number of independent runs.

#![forbid(unsafe_code)]

mod cleanup;
pub mod eligibility;
mod error;

pub use crate::eligibility::IneligibleReason;
pub use crate::error::ImplementError;

use std::fs;
use std::path::{Path, PathBuf};

use jimpl_codegen::tokens::{CLASS_EXTENSION, SOURCE_EXTENSION};
use jimpl_reflect::{generation_plan, GenerationPlan, TypeDescriptor, TypeProvider};
use jimpl_toolchain::Toolchain;

pub struct Implementor<'a> {
    provider: &'a dyn TypeProvider,
    toolchain: Option<Toolchain>,
}

impl<'a> Implementor<'a> {
    pub fn new(provider: &'a dyn TypeProvider) -> Self {
        Self {
            provider,
            toolchain: None,
        }
    }

    /// Use a preconfigured toolchain instead of discovering one from the
    /// host environment on first use.
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    /// Generate `<SimpleName>Impl.java` under `output_root`, mirroring the
    /// target's package as a directory path. Returns the written path.
    ///
    /// Repeat runs over the same target rewrite the identical file.
    pub fn implement(&self, type_name: &str, output_root: &Path) -> Result<PathBuf, ImplementError> {
        let target = self.resolve_target(type_name)?;
        let plan = generation_plan(self.provider, &target)?;
        let path = write_source(&target, &plan, output_root)?;
        tracing::info!(
            target = "jimpl",
            implemented = %target.binary_name,
            output = %path.display(),
            "wrote implementation source"
        );
        Ok(path)
    }

    /// Generate, compile, and package the implementation of `type_name` into
    /// a JAR at `jar_path`.
    ///
    /// Intermediate files live in a hidden staging directory next to the
    /// archive, so the two stay on one filesystem; the staging directory is
    /// removed on every exit path, success or failure.
    pub fn implement_jar(&self, type_name: &str, jar_path: &Path) -> Result<(), ImplementError> {
        // Resolve and screen before touching the filesystem: a rejected
        // target must leave no trace.
        let target = self.resolve_target(type_name)?;
        let plan = generation_plan(self.provider, &target)?;

        let jar_parent = parent_or_cwd(jar_path);
        fs::create_dir_all(&jar_parent).map_err(|err| {
            ImplementError::io(
                format!("failed to create archive directory `{}`", jar_parent.display()),
                err,
            )
        })?;
        let staging = tempfile::Builder::new()
            .prefix(".jimpl-")
            .tempdir_in(&jar_parent)
            .map_err(|err| ImplementError::io("failed to create staging directory", err))?;

        let result = self.build_archive(&target, &plan, staging.path(), jar_path);

        for warning in cleanup::remove_dir_best_effort(staging.path()) {
            tracing::warn!(
                target = "jimpl",
                path = %warning.path.display(),
                error = %warning.message,
                "failed to remove staging entry"
            );
        }
        result
    }

    fn build_archive(
        &self,
        target: &TypeDescriptor,
        plan: &GenerationPlan,
        staging: &Path,
        jar_path: &Path,
    ) -> Result<(), ImplementError> {
        let source_path = write_source(target, plan, staging)?;

        let discovered;
        let toolchain = match &self.toolchain {
            Some(toolchain) => toolchain,
            None => {
                discovered = Toolchain::discover()?;
                &discovered
            }
        };

        let classpath = compile_classpath(staging, target);
        toolchain.compile(staging, &source_path, &classpath)?;
        jimpl_toolchain::package_jar(staging, &class_entry_name(target), jar_path)?;

        tracing::info!(
            target = "jimpl",
            implemented = %target.binary_name,
            archive = %jar_path.display(),
            "packaged implementation archive"
        );
        Ok(())
    }

    fn resolve_target(&self, type_name: &str) -> Result<TypeDescriptor, ImplementError> {
        let name = type_name.trim();
        if name.is_empty() {
            return Err(ImplementError::InvalidRequest);
        }
        if let Some(reason) = eligibility::reject_by_name(name) {
            return Err(ImplementError::UnsupportedType {
                name: name.to_string(),
                reason,
            });
        }
        let target = self
            .provider
            .find_type(name)?
            .ok_or_else(|| ImplementError::TypeNotFound(name.to_string()))?;
        eligibility::check(&target).map_err(|reason| ImplementError::UnsupportedType {
            name: target.binary_name.clone(),
            reason,
        })?;
        Ok(target)
    }
}

fn write_source(
    target: &TypeDescriptor,
    plan: &GenerationPlan,
    root: &Path,
) -> Result<PathBuf, ImplementError> {
    let path = source_path(root, target);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            ImplementError::io(
                format!("failed to create package directory `{}`", parent.display()),
                err,
            )
        })?;
    }
    let source = jimpl_codegen::render(target, plan);
    fs::write(&path, source).map_err(|err| {
        ImplementError::io(format!("failed to write `{}`", path.display()), err)
    })?;
    Ok(path)
}

/// `<root>/<package as path>/<SimpleName>Impl.java`.
fn source_path(root: &Path, target: &TypeDescriptor) -> PathBuf {
    let mut path = root.to_path_buf();
    let package = target.package();
    if !package.is_empty() {
        for segment in package.split('.') {
            path.push(segment);
        }
    }
    path.push(format!(
        "{}.{SOURCE_EXTENSION}",
        jimpl_codegen::implementation_name(target)
    ));
    path
}

/// Archive entry for the compiled unit, always `/`-separated.
fn class_entry_name(target: &TypeDescriptor) -> String {
    let name = jimpl_codegen::implementation_name(target);
    let package = target.package();
    if package.is_empty() {
        format!("{name}.{CLASS_EXTENSION}")
    } else {
        format!("{}/{name}.{CLASS_EXTENSION}", package.replace('.', "/"))
    }
}

/// The staging root first, then the entry the target came from so the
/// compiler can resolve its supertypes. JDK types need no entry: `javac`
/// resolves the platform by itself, and jmod archives are not valid
/// classpath entries anyway.
fn compile_classpath(staging: &Path, target: &TypeDescriptor) -> Vec<PathBuf> {
    let mut classpath = vec![staging.to_path_buf()];
    if let Some(origin) = &target.origin {
        let is_jmod = origin.extension().is_some_and(|ext| ext == "jmod");
        if !is_jmod {
            classpath.push(origin.clone());
        }
    }
    classpath
}

fn parent_or_cwd(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
