use clap::{Args, ValueEnum};
use graft_build::{Error, Project};
use graft_core::{diagnostic::Diagnostic, pipeline::PassStats};
use serde::Serialize;
use std::{path::Path, process::ExitCode};

///
/// CheckArgs
///

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

///
/// Format
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Format {
    Json,
    Text,
}

///
/// CheckReport
///

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    crate_name: String,
    diagnostics: &'a [Diagnostic],
    stats: PassStats,
}

pub fn run(manifest_dir: &Path, args: &CheckArgs) -> Result<ExitCode, Error> {
    let project = Project::discover(manifest_dir)?;
    let (_, output) = project.generate()?;

    match args.format {
        Format::Text => {
            for diagnostic in &output.diagnostics {
                println!("{diagnostic}");
            }
            println!(
                "{}: {} diagnostic(s), {}",
                project.crate_name(),
                output.diagnostics.len(),
                output.stats
            );
        }
        Format::Json => {
            let report = CheckReport {
                crate_name: project.crate_name(),
                diagnostics: &output.diagnostics,
                stats: output.stats,
            };
            let json = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"));
            println!("{json}");
        }
    }

    Ok(if output.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
