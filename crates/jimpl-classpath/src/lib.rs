//! Classpath-backed implementation of the reflection facility.
//!
//! Types are located by binary name across class directories, JARs, and JDK
//! jmod archives, parsed with `jimpl-classfile`, and lowered into
//! `jimpl-reflect` descriptors.

#![forbid(unsafe_code)]

mod lower;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::ZipArchive;

use jimpl_reflect::{ProviderError, TypeDescriptor, TypeProvider};

pub use crate::lower::lower_classfile;

#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("classfile error: {0}")]
    ClassFile(#[from] jimpl_classfile::Error),
}

/// One classpath entry. Jmod archives keep their classes under a `classes/`
/// prefix; otherwise all three kinds resolve `a.b.C` to `a/b/C.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    ClassDir(PathBuf),
    Jar(PathBuf),
    Jmod(PathBuf),
}

impl ClasspathEntry {
    /// Classify a path: directories become class dirs, `.jmod` files jmods,
    /// everything else a JAR.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            ClasspathEntry::ClassDir(path)
        } else if path.extension().is_some_and(|ext| ext == "jmod") {
            ClasspathEntry::Jmod(path)
        } else {
            ClasspathEntry::Jar(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ClasspathEntry::ClassDir(p) | ClasspathEntry::Jar(p) | ClasspathEntry::Jmod(p) => p,
        }
    }

    /// Whether this entry belongs to the JDK itself rather than user code.
    pub fn is_jdk(&self) -> bool {
        matches!(self, ClasspathEntry::Jmod(_))
    }

    /// Read the classfile bytes for `binary_name`, `Ok(None)` when absent.
    pub fn read_class(&self, binary_name: &str) -> Result<Option<Vec<u8>>, ClasspathError> {
        let relative = class_relative_path(binary_name);
        match self {
            ClasspathEntry::ClassDir(dir) => {
                let candidate = dir.join(&relative);
                if !candidate.is_file() {
                    return Ok(None);
                }
                let mut buf = Vec::new();
                File::open(&candidate)?.read_to_end(&mut buf)?;
                Ok(Some(buf))
            }
            ClasspathEntry::Jar(path) => read_zip_entry(path, &relative),
            ClasspathEntry::Jmod(path) => read_zip_entry(path, &format!("classes/{relative}")),
        }
    }
}

/// `a.b.Outer$Inner` -> `a/b/Outer$Inner.class`.
fn class_relative_path(binary_name: &str) -> String {
    format!("{}.class", binary_name.replace('.', "/"))
}

fn read_zip_entry(archive: &Path, name: &str) -> Result<Option<Vec<u8>>, ClasspathError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;
    let result = match zip.by_name(name) {
        Ok(mut entry) => {
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            Ok(Some(buf))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err.into()),
    };
    result
}

/// An ordered set of classpath entries, resolving types first-entry-wins,
/// with per-invocation memoization of lowered descriptors.
#[derive(Debug)]
pub struct Classpath {
    entries: Vec<ClasspathEntry>,
    cache: RefCell<HashMap<String, Option<TypeDescriptor>>>,
}

impl Classpath {
    pub fn new(entries: Vec<ClasspathEntry>) -> Self {
        Self {
            entries,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn entries(&self) -> &[ClasspathEntry] {
        &self.entries
    }

    fn resolve(&self, binary_name: &str) -> Result<Option<TypeDescriptor>, ClasspathError> {
        for entry in &self.entries {
            if let Some(bytes) = entry.read_class(binary_name)? {
                let classfile = jimpl_classfile::ClassFile::parse(&bytes)?;
                let mut descriptor = lower_classfile(&classfile)?;
                descriptor.origin = Some(entry.path().to_path_buf());
                return Ok(Some(descriptor));
            }
        }
        Ok(None)
    }
}

impl TypeProvider for Classpath {
    fn find_type(&self, binary_name: &str) -> Result<Option<TypeDescriptor>, ProviderError> {
        if let Some(cached) = self.cache.borrow().get(binary_name) {
            return Ok(cached.clone());
        }
        let resolved = self
            .resolve(binary_name)
            .map_err(|err| ProviderError::new(binary_name, err))?;
        self.cache
            .borrow_mut()
            .insert(binary_name.to_string(), resolved.clone());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_names_map_to_class_paths() {
        assert_eq!(class_relative_path("p.q.Foo"), "p/q/Foo.class");
        assert_eq!(class_relative_path("Plain"), "Plain.class");
        assert_eq!(class_relative_path("p.Outer$Inner"), "p/Outer$Inner.class");
    }

    #[test]
    fn missing_class_in_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let entry = ClasspathEntry::ClassDir(dir.path().to_path_buf());
        assert!(entry.read_class("no.such.Type").unwrap().is_none());
    }

    #[test]
    fn entry_classification() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ClasspathEntry::from_path(dir.path()),
            ClasspathEntry::ClassDir(_)
        ));
        assert!(matches!(
            ClasspathEntry::from_path("/jdk/jmods/java.base.jmod"),
            ClasspathEntry::Jmod(_)
        ));
        assert!(matches!(
            ClasspathEntry::from_path("lib/dep.jar"),
            ClasspathEntry::Jar(_)
        ));
    }
}
