use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jimpl::Implementor;
use jimpl_classpath::{Classpath, ClasspathEntry};
use jimpl_toolchain::JdkInstallation;

#[derive(Parser)]
#[command(
    name = "jimpl",
    version,
    about = "Generate a minimal concrete implementation of a Java abstract class or interface"
)]
struct Cli {
    /// Compile the implementation and package it into OUTPUT as a JAR,
    /// instead of writing a source tree
    #[arg(long, alias = "jar")]
    archive: bool,

    /// Classpath used to resolve the target type; defaults to $CLASSPATH,
    /// then the current directory
    #[arg(long, short = 'c', value_name = "CLASSPATH")]
    classpath: Option<String>,

    /// Binary name of the type to implement (e.g. `java.util.List`)
    #[arg(value_name = "TYPE")]
    type_name: String,

    /// Output root directory, or the archive path with --archive
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("jimpl: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let classpath = Classpath::new(resolve_entries(cli.classpath.as_deref()));
    let implementor = Implementor::new(&classpath);

    if cli.archive {
        implementor.implement_jar(&cli.type_name, &cli.output)?;
    } else {
        implementor.implement(&cli.type_name, &cli.output)?;
    }
    Ok(())
}

/// User-supplied entries in order, then the host JDK's jmod archives so
/// platform types resolve. No JDK just means platform types don't.
fn resolve_entries(flag: Option<&str>) -> Vec<ClasspathEntry> {
    let joined = match flag {
        Some(cp) => cp.to_string(),
        None => std::env::var("CLASSPATH").unwrap_or_else(|_| ".".to_string()),
    };
    let mut entries: Vec<ClasspathEntry> = std::env::split_paths(&joined)
        .map(ClasspathEntry::from_path)
        .collect();
    entries.extend(jdk_entries());
    entries
}

fn jdk_entries() -> Vec<ClasspathEntry> {
    let Ok(jdk) = JdkInstallation::discover() else {
        tracing::debug!(target = "jimpl.cli", "no JDK found; platform types will not resolve");
        return Vec::new();
    };
    let Some(jmods) = jdk.jmods_dir() else {
        return Vec::new();
    };
    let Ok(listing) = std::fs::read_dir(&jmods) else {
        tracing::warn!(target = "jimpl.cli", dir = %jmods.display(), "unreadable jmods directory");
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = listing
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "jmod"))
        .collect();
    paths.sort();
    paths.into_iter().map(ClasspathEntry::from_path).collect()
}
