use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{PackageFailure, ToolchainError};

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
const MANIFEST: &[u8] = b"Manifest-Version: 1.0\r\n\r\n";

/// Assemble the output archive: a version-only manifest plus exactly one
/// compiled-unit entry, read from `class_root` and stored at `entry_name`
/// (`p/q/FooImpl.class`).
///
/// On failure the partially written archive is left behind; callers must
/// treat the error as "archive invalid, discard it".
pub fn package_jar(class_root: &Path, entry_name: &str, jar_path: &Path) -> Result<(), ToolchainError> {
    write_jar(class_root, entry_name, jar_path).map_err(|source| ToolchainError::Package {
        path: jar_path.to_path_buf(),
        source,
    })
}

fn write_jar(class_root: &Path, entry_name: &str, jar_path: &Path) -> Result<(), PackageFailure> {
    let mut class_bytes = Vec::new();
    File::open(class_root.join(entry_name))?.read_to_end(&mut class_bytes)?;

    let mut jar = ZipWriter::new(File::create(jar_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    jar.start_file(MANIFEST_PATH, options)?;
    jar.write_all(MANIFEST)?;

    jar.start_file(entry_name, options)?;
    jar.write_all(&class_bytes)?;

    jar.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    #[test]
    fn archive_holds_manifest_and_single_entry() {
        let dir = tempfile::tempdir().unwrap();
        let class_root = dir.path().join("classes");
        std::fs::create_dir_all(class_root.join("p")).unwrap();
        std::fs::write(class_root.join("p/FooImpl.class"), b"\xca\xfe\xba\xbe").unwrap();

        let jar_path = dir.path().join("out.jar");
        package_jar(&class_root, "p/FooImpl.class", &jar_path).unwrap();

        let mut archive = ZipArchive::new(File::open(&jar_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut manifest = String::new();
        archive
            .by_name(MANIFEST_PATH)
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert_eq!(manifest, "Manifest-Version: 1.0\r\n\r\n");

        let mut class = Vec::new();
        archive
            .by_name("p/FooImpl.class")
            .unwrap()
            .read_to_end(&mut class)
            .unwrap();
        assert_eq!(class, b"\xca\xfe\xba\xbe");
    }

    #[test]
    fn missing_class_file_is_package_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = package_jar(dir.path(), "p/Gone.class", &dir.path().join("out.jar")).unwrap_err();
        assert!(matches!(err, ToolchainError::Package { .. }));
    }
}
