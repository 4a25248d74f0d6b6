use clap::Args;
use graft_build::{Error, Project, emit::OutDir};
use graft_core::pipeline::{Cancellation, Generator, Host};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::info;

///
/// ExpandArgs
///

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Write files into this directory instead of printing them.
    #[arg(long, short = 'o')]
    out_dir: Option<PathBuf>,

    /// Only show files for this module path, e.g. `my_crate::ui`.
    #[arg(long)]
    module: Option<String>,
}

///
/// Stdout
///

struct Stdout<'a> {
    module: Option<&'a str>,
}

impl Host for Stdout<'_> {
    fn emit_source(&mut self, file_name: &str, text: &str) {
        if self.module.is_none_or(|module| in_module(file_name, module)) {
            println!("// ---- {file_name}");
            println!("{text}");
        }
    }

    fn report_diagnostic(&mut self, diagnostic: graft_core::diagnostic::Diagnostic) {
        eprintln!("{diagnostic}");
    }
}

// `{module}.{pattern}.rs`, not files of nested modules
fn in_module(file_name: &str, module: &str) -> bool {
    file_name
        .strip_prefix(module)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| rest.matches('.').count() == 1)
}

pub fn run(manifest_dir: &Path, args: &ExpandArgs) -> Result<ExitCode, Error> {
    let project = Project::discover(manifest_dir)?;
    let model = project.load_model()?;
    let mut generator = Generator::new(project.options());
    let cancel = Cancellation::new();

    if let Some(out_dir) = &args.out_dir {
        let mut host = OutDir::create(out_dir)?;
        generator.run(&model, &mut host, &cancel)?;
        let report = host.finish(model.namespaces())?;
        for diagnostic in &report.diagnostics {
            eprintln!("{diagnostic}");
        }
        info!(
            dir = %out_dir.display(),
            written = report.written,
            unchanged = report.unchanged,
            removed = report.removed,
            "expanded"
        );
    } else {
        let mut host = Stdout {
            module: args.module.as_deref(),
        };
        generator.run(&model, &mut host, &cancel)?;
    }

    Ok(ExitCode::SUCCESS)
}

///
/// TESTS
///
