use crate::config::ConfigError;
use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{errors} error diagnostic(s) reported and `deny_errors` is set")]
    Denied { errors: usize },

    #[error(transparent)]
    Generate(#[from] graft_core::Error),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("environment variable `{0}` is not set")]
    MissingEnv(&'static str),

    #[error("{}:{line}:{column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, err: &syn::Error) -> Self {
        let start = err.span().start();

        Self::Parse {
            path: path.into(),
            line: start.line,
            column: start.column + 1,
            message: err.to_string(),
        }
    }
}
