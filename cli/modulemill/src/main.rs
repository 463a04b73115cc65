//! ModuleMill CLI: documentation-contract linter for ModuleKit repositories.

mod commands;
mod config;
mod discover;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::lint::OutputFormat;
use config::{LintFlags, MillConfig};

#[derive(Parser)]
#[command(name = "modulemill", version, about = "Lint ModuleKit documentation contracts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint documents and manifests
    Lint {
        /// Files or directories to lint
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Escalate soft findings and require metadata in every markdown file
        #[arg(long)]
        strict: bool,
        /// Fail when a UserGuide has no sibling ModuleManifest.yaml
        #[arg(long)]
        require_manifest: bool,
        /// Only lint canonical files under `_CURRENT` directories
        #[arg(long)]
        current_only: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
    /// Print one section of a markdown file by heading prefix
    Extract {
        /// Markdown file
        path: PathBuf,
        /// Heading title prefix, e.g. "3.2"
        #[arg(long)]
        section: String,
    },
    /// Trace the boot flow described by the registry and global instructions
    Boottrace {
        /// Repository root (default: directory holding modulemill.toml, else cwd)
        #[arg(long)]
        repo_root: Option<PathBuf>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

/// Dispatch a subcommand. `Ok(false)` means the command ran but found problems.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let cwd = std::env::current_dir()?;
    let (config, config_dir) = match MillConfig::find_and_load(&cwd)? {
        Some((config, dir)) => {
            tracing::debug!(dir = %dir.display(), "loaded modulemill.toml");
            (config, Some(dir))
        }
        None => (MillConfig::default(), None),
    };

    match cli.command {
        Commands::Lint {
            paths,
            strict,
            require_manifest,
            current_only,
            format,
        } => {
            let flags = LintFlags {
                strict,
                require_manifest,
                current_only,
            };
            let opts = config.lint_options(flags);
            commands::lint::run(&paths, &opts, config.current_only(flags), format)
        }

        Commands::Extract { path, section } => {
            commands::extract::run(&path, &section)?;
            Ok(true)
        }

        Commands::Boottrace { repo_root } => {
            let root = repo_root.or(config_dir).unwrap_or(cwd);
            commands::boottrace::run(&root)
        }
    }
}
