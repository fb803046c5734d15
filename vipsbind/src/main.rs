//! `vipsbind` command-line interface.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vipsbind_codegen::{Generator, GeneratorConfig, generate_from_files};
use vipsbind_registry::{RegistrySnapshot, parse_snapshot, validate_snapshot};

#[derive(Parser)]
#[command(name = "vipsbind")]
#[command(author, version, about = "Embind and TypeScript binding generator for libvips", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate every binding artifact into a directory
    Generate(GenerateArgs),
    /// Print the operations a run would walk
    List(ListArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Registry snapshot XML
    #[arg(short, long)]
    registry: PathBuf,

    /// GObject-Introspection document supplying enum docs
    #[arg(short, long)]
    gir: Option<PathBuf>,

    /// Generator configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hand-written text opening vips.d.ts
    #[arg(short, long)]
    preamble: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    out_dir: PathBuf,
}

#[derive(Args)]
struct ListArgs {
    /// Registry snapshot XML
    #[arg(short, long)]
    registry: PathBuf,

    /// Generator configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Apply this artifact's deny-list
    #[arg(short, long, value_enum)]
    artifact: Option<Artifact>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Artifact {
    Bindings,
    Operators,
    Declarations,
}

impl Artifact {
    fn deny(self, config: &GeneratorConfig) -> &[String] {
        match self {
            Artifact::Bindings => &config.skip.bindings,
            Artifact::Operators => &config.skip.operators,
            Artifact::Declarations => &config.skip.declarations,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate(args) => generate(args),
        Command::List(args) => list(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn load_snapshot(path: &Path) -> Result<RegistrySnapshot> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read registry {}", path.display()))?;
    let snapshot =
        parse_snapshot(&xml).with_context(|| format!("failed to parse {}", path.display()))?;
    validate_snapshot(&snapshot).with_context(|| format!("invalid registry {}", path.display()))?;
    Ok(snapshot)
}

fn generate(args: GenerateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let files = generate_from_files(
        &args.registry,
        args.gir.as_deref(),
        args.preamble.as_deref(),
        &config,
    )
    .with_context(|| format!("failed to generate from {}", args.registry.display()))?;

    files
        .write_to(&args.out_dir)
        .with_context(|| format!("failed to write {}", args.out_dir.display()))?;
    info!(dir = %args.out_dir.display(), "generation complete");
    Ok(())
}

fn list(args: ListArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let snapshot = load_snapshot(&args.registry)?;
    let deny = args.artifact.map(|a| a.deny(&config)).unwrap_or_default();

    let operations = Generator::new(&snapshot, &config).operations()?;
    for op in operations.iter().filter(|op| !deny.contains(&op.name)) {
        let marker = if op.is_instance { "method" } else { "static" };
        println!("{marker} {}", op.name);
    }
    Ok(())
}
