use std::path::Path;

use jimpl::{Implementor, ImplementError, IneligibleReason};
use jimpl_reflect::{
    ConstructorDescriptor, JavaType, MapProvider, MethodDescriptor, Modifiers, TypeDescriptor,
    TypeKind,
};

fn method(name: &str, mods: u16, params: &[&str], ret: &str) -> MethodDescriptor {
    MethodDescriptor {
        name: name.to_string(),
        modifiers: Modifiers(mods),
        type_parameters: vec![],
        parameters: params.iter().map(|p| JavaType::simple(*p)).collect(),
        return_type: JavaType::simple(ret),
        throws: vec![],
    }
}

fn interface(name: &str, methods: Vec<MethodDescriptor>) -> TypeDescriptor {
    TypeDescriptor {
        binary_name: name.to_string(),
        kind: TypeKind::Interface,
        modifiers: Modifiers(Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT),
        superclass: Some("java.lang.Object".to_string()),
        interfaces: vec![],
        type_parameters: vec![],
        methods,
        constructors: vec![],
        sealed: false,
        local_or_anonymous: false,
        origin: None,
    }
}

fn abstract_class(name: &str, ctor_params: &[&str]) -> TypeDescriptor {
    TypeDescriptor {
        binary_name: name.to_string(),
        kind: TypeKind::Class,
        modifiers: Modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT),
        superclass: Some("java.lang.Object".to_string()),
        interfaces: vec![],
        type_parameters: vec![],
        methods: vec![],
        constructors: vec![ConstructorDescriptor {
            modifiers: Modifiers(Modifiers::PUBLIC),
            type_parameters: vec![],
            parameters: ctor_params.iter().map(|p| JavaType::simple(*p)).collect(),
            throws: vec![],
        }],
        sealed: false,
        local_or_anonymous: false,
        origin: None,
    }
}

fn runner_provider() -> MapProvider {
    MapProvider::new([interface(
        "p.Runner",
        vec![method(
            "run",
            Modifiers::PUBLIC | Modifiers::ABSTRACT,
            &[],
            "void",
        )],
    )])
}

#[test]
fn blank_type_name_is_invalid_request() {
    let provider = runner_provider();
    let out = tempfile::tempdir().unwrap();
    let err = Implementor::new(&provider)
        .implement("   ", out.path())
        .unwrap_err();
    assert!(matches!(err, ImplementError::InvalidRequest));
}

#[test]
fn unknown_type_is_not_found() {
    let provider = runner_provider();
    let out = tempfile::tempdir().unwrap();
    let err = Implementor::new(&provider)
        .implement("p.Nope", out.path())
        .unwrap_err();
    assert!(matches!(err, ImplementError::TypeNotFound(name) if name == "p.Nope"));
}

#[test]
fn array_and_primitive_names_are_screened_without_lookup() {
    let provider = MapProvider::default();
    let out = tempfile::tempdir().unwrap();
    let implementor = Implementor::new(&provider);

    let err = implementor.implement("int", out.path()).unwrap_err();
    assert!(matches!(
        err,
        ImplementError::UnsupportedType {
            reason: IneligibleReason::PrimitiveType,
            ..
        }
    ));

    let err = implementor
        .implement("java.lang.String[]", out.path())
        .unwrap_err();
    assert!(matches!(
        err,
        ImplementError::UnsupportedType {
            reason: IneligibleReason::ArrayType,
            ..
        }
    ));
}

#[test]
fn rejected_target_writes_nothing() {
    let mut final_class = abstract_class("p.Locked", &[]);
    final_class.modifiers = Modifiers(Modifiers::PUBLIC | Modifiers::FINAL);
    let provider = MapProvider::new([final_class]);
    let out = tempfile::tempdir().unwrap();

    let err = Implementor::new(&provider)
        .implement("p.Locked", out.path())
        .unwrap_err();
    assert!(matches!(
        err,
        ImplementError::UnsupportedType {
            reason: IneligibleReason::FinalType,
            ..
        }
    ));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn source_lands_under_package_path() {
    let provider = runner_provider();
    let out = tempfile::tempdir().unwrap();

    let path = Implementor::new(&provider)
        .implement("p.Runner", out.path())
        .unwrap();
    assert_eq!(path, out.path().join("p/RunnerImpl.java"));

    let source = std::fs::read_to_string(&path).unwrap();
    assert!(source.starts_with("package p;\n"));
    assert!(source.contains("public class RunnerImpl implements p.Runner {"));
    assert!(source.contains("public void run() {"));
}

#[test]
fn constructor_forwarding_for_class_targets() {
    let provider = MapProvider::new([abstract_class("q.Base", &["int", "java.lang.String"])]);
    let out = tempfile::tempdir().unwrap();

    let path = Implementor::new(&provider)
        .implement("q.Base", out.path())
        .unwrap();
    let source = std::fs::read_to_string(path).unwrap();
    assert!(source.contains("public BaseImpl(int arg0, java.lang.String arg1) {"));
    assert!(source.contains("super(arg0, arg1);"));
}

#[test]
fn repeat_runs_are_byte_identical() {
    let provider = runner_provider();
    let out = tempfile::tempdir().unwrap();
    let implementor = Implementor::new(&provider);

    let first = implementor.implement("p.Runner", out.path()).unwrap();
    let first_bytes = std::fs::read(&first).unwrap();
    let second = implementor.implement("p.Runner", out.path()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_bytes, std::fs::read(&second).unwrap());
}

#[test]
fn private_constructors_only_is_no_usable_constructor() {
    let mut locked = abstract_class("p.Locked", &[]);
    locked.constructors[0].modifiers = Modifiers(Modifiers::PRIVATE);
    let provider = MapProvider::new([locked]);
    let out = tempfile::tempdir().unwrap();

    let err = Implementor::new(&provider)
        .implement("p.Locked", out.path())
        .unwrap_err();
    assert!(matches!(err, ImplementError::NoUsableConstructor(name) if name == "p.Locked"));
}

#[cfg(unix)]
mod jar {
    use super::*;
    use std::io;
    use std::os::unix::process::ExitStatusExt;
    use std::path::PathBuf;
    use std::process::ExitStatus;

    use jimpl_toolchain::{CommandOutput, CommandRunner, Toolchain, ToolchainError};
    use zip::ZipArchive;

    /// Stands in for `javac`: writes a `.class` next to the source argument.
    #[derive(Debug)]
    struct FakeCompiler;

    impl CommandRunner for FakeCompiler {
        fn run(&self, _cwd: &Path, _program: &Path, args: &[String]) -> io::Result<CommandOutput> {
            let source = args.last().expect("source file argument");
            std::fs::write(Path::new(source).with_extension("class"), b"\xca\xfe\xba\xbe")?;
            Ok(CommandOutput {
                status: ExitStatus::from_raw(0),
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    #[derive(Debug)]
    struct BrokenCompiler;

    impl CommandRunner for BrokenCompiler {
        fn run(&self, _cwd: &Path, _program: &Path, _args: &[String]) -> io::Result<CommandOutput> {
            Ok(CommandOutput {
                status: ExitStatus::from_raw(1 << 8),
                stdout: String::new(),
                stderr: "error: cannot find symbol".to_string(),
            })
        }
    }

    fn implementor_with(provider: &MapProvider, runner: Box<dyn CommandRunner>) -> Implementor<'_> {
        Implementor::new(provider)
            .with_toolchain(Toolchain::new(PathBuf::from("javac"), runner))
    }

    fn surviving_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn archive_flow_packages_and_cleans_staging() {
        let provider = runner_provider();
        let dir = tempfile::tempdir().unwrap();
        let jar_path = dir.path().join("runner.jar");

        implementor_with(&provider, Box::new(FakeCompiler))
            .implement_jar("p.Runner", &jar_path)
            .unwrap();

        // Only the archive survives; staging is gone.
        assert_eq!(surviving_entries(dir.path()), vec!["runner.jar"]);

        let mut archive = ZipArchive::new(std::fs::File::open(&jar_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.by_name("META-INF/MANIFEST.MF").is_ok());
        assert!(archive.by_name("p/RunnerImpl.class").is_ok());
    }

    #[test]
    fn compile_failure_surfaces_diagnostics_and_cleans_staging() {
        let provider = runner_provider();
        let dir = tempfile::tempdir().unwrap();
        let jar_path = dir.path().join("runner.jar");

        let err = implementor_with(&provider, Box::new(BrokenCompiler))
            .implement_jar("p.Runner", &jar_path)
            .unwrap_err();
        match err {
            ImplementError::Toolchain(ToolchainError::Compile { diagnostics }) => {
                assert!(diagnostics.contains("cannot find symbol"));
            }
            other => panic!("expected compile error, got {other:?}"),
        }
        assert!(surviving_entries(dir.path()).is_empty());
    }

    #[test]
    fn rejected_target_creates_no_staging() {
        let mut final_class = abstract_class("p.Locked", &[]);
        final_class.modifiers = Modifiers(Modifiers::PUBLIC | Modifiers::FINAL);
        let provider = MapProvider::new([final_class]);
        let dir = tempfile::tempdir().unwrap();

        let err = implementor_with(&provider, Box::new(FakeCompiler))
            .implement_jar("p.Locked", &dir.path().join("locked.jar"))
            .unwrap_err();
        assert!(matches!(err, ImplementError::UnsupportedType { .. }));
        assert!(surviving_entries(dir.path()).is_empty());
    }
}
