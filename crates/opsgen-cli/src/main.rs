//! opsgen CLI - Typed client generator
//!
//! Commands:
//! - `opsgen generate` - Generate clients for the targets in opsgen.toml
//! - `opsgen check` - Validate opsgen.toml and the operations it points to

use clap::{Parser, Subcommand};
use opsgen_core::LogLevel;

mod generate;
mod manifest;

#[derive(Parser)]
#[command(name = "opsgen")]
#[command(author, version, about = "Generate typed operation clients", long_about = None)]
struct Cli {
    /// Log verbosity (trace, debug, info, warn, error, off)
    #[arg(long, global = true, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate client sources
    Generate {
        /// Path to opsgen.toml (default: ./opsgen.toml)
        #[arg(short, long)]
        manifest: Option<String>,

        /// Output directory, overriding [project] output
        #[arg(short, long)]
        output: Option<String>,

        /// Skip external formatters
        #[arg(long)]
        no_format: bool,
    },

    /// Validate an opsgen.toml manifest
    Check {
        /// Path to opsgen.toml (default: ./opsgen.toml)
        #[arg(short, long)]
        manifest: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    opsgen_logging::init_logging(cli.log_level)?;

    match cli.command {
        Commands::Generate {
            manifest,
            output,
            no_format,
        } => {
            generate::run(manifest, output, no_format)?;
        }
        Commands::Check { manifest } => {
            manifest::check(manifest)?;
        }
    }

    Ok(())
}
