//! `graft.toml`, read from the consuming crate's manifest directory.

use graft_core::{
    markers::{DEFAULT_MARKER_CRATE, MarkerSet},
    options::{InstanceInit, NotifyOptions, Options, SingletonOptions},
};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

pub const CONFIG_FILE: &str = "graft.toml";

const DEFAULT_ENTRY: &str = "src/lib.rs";
const FALLBACK_ENTRY: &str = "src/main.rs";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error("`{key}` must be a plain identifier, got `{value}`")]
    InvalidIdent { key: &'static str, value: String },

    #[error("{} has no `[package] name`", path.display())]
    MissingPackage { path: PathBuf },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

///
/// Config
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name markers are imported through.
    pub marker_crate: Option<String>,

    /// Crate name as seen by `module_path!()`; defaults to the package name.
    pub target_crate: Option<String>,

    /// Root of the module tree, relative to the manifest directory.
    pub entry: Option<PathBuf>,

    /// Fail the build when an error diagnostic is reported.
    pub deny_errors: bool,

    pub singleton: SingletonConfig,
    pub notify: NotifyConfig,
}

impl Config {
    /// Load `graft.toml` from `manifest_dir`; a missing file means defaults.
    pub fn load(manifest_dir: &Path) -> Result<Self, ConfigError> {
        let path = manifest_dir.join(CONFIG_FILE);

        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&path, &text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_ident("marker_crate", self.marker_crate.as_deref(), true)?;
        check_ident("target_crate", self.target_crate.as_deref(), true)?;
        check_ident("singleton.accessor", self.singleton.accessor.as_deref(), false)
    }

    /// Crate name used for generated namespaces.
    #[must_use]
    pub fn crate_name(&self, package_name: &str) -> String {
        self.target_crate
            .as_deref()
            .unwrap_or(package_name)
            .replace('-', "_")
    }

    /// Module tree root: configured, else `src/lib.rs`, else `src/main.rs`.
    #[must_use]
    pub fn entry(&self, manifest_dir: &Path) -> PathBuf {
        if let Some(entry) = &self.entry {
            return manifest_dir.join(entry);
        }

        let lib = manifest_dir.join(DEFAULT_ENTRY);
        if lib.exists() {
            lib
        } else {
            manifest_dir.join(FALLBACK_ENTRY)
        }
    }

    #[must_use]
    pub fn options(&self) -> Options {
        let markers = MarkerSet::new(
            self.marker_crate
                .as_deref()
                .unwrap_or(DEFAULT_MARKER_CRATE),
        );
        let singleton_defaults = SingletonOptions::default();

        Options {
            markers,
            singleton: SingletonOptions {
                accessor: self
                    .singleton
                    .accessor
                    .clone()
                    .unwrap_or(singleton_defaults.accessor),
                init: self.singleton.init,
                implement_trait: self
                    .singleton
                    .implement_trait
                    .unwrap_or(singleton_defaults.implement_trait),
            },
            notify: NotifyOptions {
                implement_trait: self
                    .notify
                    .implement_trait
                    .unwrap_or(NotifyOptions::default().implement_trait),
            },
        }
    }
}

///
/// SingletonConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SingletonConfig {
    pub accessor: Option<String>,
    pub init: InstanceInit,
    pub implement_trait: Option<bool>,
}

///
/// NotifyConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    pub implement_trait: Option<bool>,
}

// crate names may be written with dashes, which become underscores
fn check_ident(
    key: &'static str,
    value: Option<&str>,
    crate_name: bool,
) -> Result<(), ConfigError> {
    let Some(value) = value else {
        return Ok(());
    };
    let normalized = if crate_name {
        value.replace('-', "_")
    } else {
        value.to_string()
    };

    let valid = normalized
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && normalized.chars().all(|c| c.is_alphanumeric() || c == '_')
        && syn::parse_str::<syn::Ident>(&normalized).is_ok();

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdent {
            key,
            value: value.to_string(),
        })
    }
}

///
/// TESTS
///
