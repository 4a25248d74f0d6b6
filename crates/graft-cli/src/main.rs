//! `graft` developer CLI.
//!
//! `graft check` reports diagnostics for a crate, `graft expand` shows or
//! writes what the build script would generate.

mod check;
mod expand;

use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode};
use tracing::error;

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(name = "graft", version, about = "Marker-driven member synthesis for Rust types")]
struct Cli {
    /// Directory containing the crate's `Cargo.toml`.
    #[arg(long, short = 'm', global = true, default_value = ".", env = "GRAFT_MANIFEST_DIR")]
    manifest_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

///
/// Command
///

#[derive(Debug, Subcommand)]
enum Command {
    /// Report structural diagnostics; exits with 1 when any is an error.
    Check(check::CheckArgs),

    /// Print or write the generated sources.
    Expand(expand::ExpandArgs),
}

fn main() -> ExitCode {
    graft_build::init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Check(args) => check::run(&cli.manifest_dir, args),
        Command::Expand(args) => expand::run(&cli.manifest_dir, args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::from(2)
        }
    }
}
