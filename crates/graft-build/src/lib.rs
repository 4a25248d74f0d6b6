//! Build-time front end for graft.
//!
//! Reads the crate's module tree with `syn`, runs the graft pipeline over it
//! and writes the synthesized members under `OUT_DIR/graft/`. Call
//! [`build!`] from `build.rs`.

pub mod config;
pub mod emit;
pub mod error;
pub mod model;
pub mod resolve;
pub mod source;

mod macros;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use model::SourceModel;

use crate::{
    config::CONFIG_FILE,
    emit::{EmitReport, OUT_SUBDIR, OutDir},
    source::SourceTree,
};
use graft_core::{
    options::Options,
    pipeline::{Cancellation, Generator, PassOutput, PassStats},
};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GRAFT_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr `tracing` subscriber filtered by `GRAFT_LOG`. Does nothing
/// when a subscriber is already installed.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

///
/// Project
///
/// One consuming crate: its manifest directory, package name and
/// `graft.toml`.
///

#[derive(Clone, Debug)]
pub struct Project {
    manifest_dir: PathBuf,
    package_name: String,
    config: Config,
}

impl Project {
    pub fn open(manifest_dir: impl Into<PathBuf>, package_name: &str) -> Result<Self, Error> {
        let manifest_dir = manifest_dir.into();
        let config = Config::load(&manifest_dir)?;

        Ok(Self {
            manifest_dir,
            package_name: package_name.to_string(),
            config,
        })
    }

    /// Open the crate at `manifest_dir`, reading its package name from
    /// `Cargo.toml`.
    pub fn discover(manifest_dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let manifest_dir = manifest_dir.into();
        let path = manifest_dir.join("Cargo.toml");

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let manifest: toml::Table = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        let name = manifest
            .get("package")
            .and_then(|package| package.get("name"))
            .and_then(toml::Value::as_str)
            .ok_or(ConfigError::MissingPackage { path })?
            .to_string();

        Self::open(manifest_dir, &name)
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn manifest_dir(&self) -> &Path {
        &self.manifest_dir
    }

    /// Crate name as `module_path!()` spells it.
    #[must_use]
    pub fn crate_name(&self) -> String {
        self.config.crate_name(&self.package_name)
    }

    #[must_use]
    pub fn options(&self) -> Options {
        self.config.options()
    }

    /// Load and index the module tree.
    pub fn load_model(&self) -> Result<SourceModel, Error> {
        let entry = self.config.entry(&self.manifest_dir);
        let tree = SourceTree::load(&entry, &self.crate_name())?;

        Ok(SourceModel::build(
            &tree,
            &self.options().markers,
            &self.manifest_dir,
        ))
    }

    /// One complete pass with a fresh generator.
    pub fn generate(&self) -> Result<(SourceModel, PassOutput), Error> {
        let model = self.load_model()?;
        let output = Generator::new(self.options()).generate(&model, &Cancellation::new())?;

        Ok((model, output))
    }
}

///
/// BuildReport
///

#[derive(Clone, Debug)]
pub struct BuildReport {
    pub out_dir: PathBuf,
    pub stats: PassStats,
    pub emit: EmitReport,
}

/// Everything [`build!`] does, for build scripts that want the report.
pub fn run_build_script() -> Result<BuildReport, Error> {
    init_logging();
    println!("cargo:rerun-if-env-changed={LOG_ENV}");

    let manifest_dir = env_var("CARGO_MANIFEST_DIR").map(PathBuf::from)?;
    let out_dir = env_var("OUT_DIR").map(PathBuf::from)?;
    let package_name = env_var("CARGO_PKG_NAME")?;

    let config_path = manifest_dir.join(CONFIG_FILE);
    if config_path.exists() {
        println!("cargo:rerun-if-changed={}", config_path.display());
    }

    let project = Project::open(&manifest_dir, &package_name)?;
    let model = project.load_model()?;
    for file in model.files() {
        println!("cargo:rerun-if-changed={}", file.display());
    }

    let mut host = OutDir::create(out_dir.join(OUT_SUBDIR))?;
    let stats = Generator::new(project.options()).run(&model, &mut host, &Cancellation::new())?;
    let emit = host.finish(model.namespaces())?;

    for diagnostic in &emit.diagnostics {
        println!(
            "cargo:warning={}[{}]: {} ({})",
            diagnostic.severity, diagnostic.rule, diagnostic.message, diagnostic.location
        );
    }

    let errors = emit.error_count();
    if errors > 0 && project.config().deny_errors {
        return Err(Error::Denied { errors });
    }

    info!(
        crate_name = %project.crate_name(),
        %stats,
        written = emit.written,
        unchanged = emit.unchanged,
        "graft build complete"
    );

    Ok(BuildReport {
        out_dir,
        stats,
        emit,
    })
}

fn env_var(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}
