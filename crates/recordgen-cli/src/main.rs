//! `recordgen`: generate record object models from class-hierarchy schemas.

mod config;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Args, Parser, Subcommand};
use config::{GenerateConfig, RecordgenConfig};
use recordgen::{EmitOptions, SourceFile, emitter_names, emitters, get_emitter};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "recordgen", version, about)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate sources from a schema document
    Generate(GenerateArgs),
    /// List available emitters
    Emitters,
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Schema document (JSON)
    schema: PathBuf,

    /// Emitter to use
    #[arg(long)]
    emit: Option<String>,

    /// Write files under this directory instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Target package
    #[arg(long)]
    package: Option<String>,

    /// Generate the copy-with protocol
    #[arg(long, overrides_with = "no_withers")]
    withers: bool,

    /// Skip the copy-with protocol even if configured
    #[arg(long)]
    no_withers: bool,

    /// Decorate records with the builder annotation
    #[arg(long, overrides_with = "no_builder_annotation")]
    builder_annotation: bool,

    /// Leave records undecorated even if configured
    #[arg(long)]
    no_builder_annotation: bool,

    /// Fully-qualified nullability annotation
    #[arg(long, value_name = "FQN")]
    nullability_marker: Option<String>,

    /// Skip the record decomposition entirely
    #[arg(long)]
    no_records: bool,

    /// Config file replacing ./recordgen.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Flags as the top config layer. Unset flags leave lower layers alone.
    fn as_config(&self) -> RecordgenConfig {
        RecordgenConfig {
            emit: self.emit.clone(),
            package: self.package.clone(),
            out: self.out.clone(),
            generate: GenerateConfig {
                records: self.no_records.then_some(false),
                withers: switch(self.withers, self.no_withers),
                builder_annotation: switch(self.builder_annotation, self.no_builder_annotation),
                nullability_marker: self.nullability_marker.clone(),
            },
            naming: Default::default(),
        }
    }
}

/// An `--x`/`--no-x` pair as an optional override.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (_, true) => Some(false),
        (true, false) => Some(true),
        (false, false) => None,
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Emitters => {
            for emitter in emitters() {
                println!(
                    "{:<8} {} (.{})",
                    emitter.name(),
                    emitter.language(),
                    emitter.extension()
                );
            }
            Ok(())
        }
        Command::Generate(args) => {
            let cwd = std::env::current_dir().context("failed to read working directory")?;
            let config = RecordgenConfig::load(&cwd, args.config.as_deref())?;
            generate(&args, config)
        }
    }
}

fn generate(args: &GenerateArgs, config: RecordgenConfig) -> anyhow::Result<()> {
    let config = config.merge(args.as_config());
    let options = config.options();
    options.validate().context("invalid generation options")?;

    let emitter = get_emitter(config.emitter()).ok_or_else(|| {
        anyhow!(
            "unknown emitter `{}` (available: {})",
            config.emitter(),
            emitter_names().join(", ")
        )
    })?;

    let source = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("failed to read {}", args.schema.display()))?;
    let graph = recordgen::parse_schema_str(&source)
        .with_context(|| format!("invalid schema {}", args.schema.display()))?;

    let Some(model) = recordgen::generate(&graph, &options)? else {
        eprintln!("records disabled, nothing generated");
        return Ok(());
    };

    let emit_options = EmitOptions {
        package: config.package.clone(),
    };
    let files = emitter.emit(&graph, &model, &emit_options)?;

    match &config.out {
        Some(out) => {
            write_files(out, &files)?;
            eprintln!("wrote {} file(s) to {}", files.len(), out.display());
        }
        None => print_files(&files),
    }
    Ok(())
}

fn write_files(out: &Path, files: &[SourceFile]) -> anyhow::Result<()> {
    for file in files {
        let path = out.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, &file.contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "written");
    }
    Ok(())
}

fn print_files(files: &[SourceFile]) {
    for (i, file) in files.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("==> {} <==", file.path.display());
        print!("{}", file.contents);
    }
}
