use crate::markers::MarkerSet;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Options
///
/// Knobs shared by every synthesizer and the validator for one generation
/// session.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Options {
    pub markers: MarkerSet,
    pub singleton: SingletonOptions,
    pub notify: NotifyOptions,
}

impl Options {
    #[must_use]
    pub fn new(markers: MarkerSet) -> Self {
        Self {
            markers,
            ..Self::default()
        }
    }
}

///
/// SingletonOptions
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SingletonOptions {
    /// Name of the generated static accessor.
    pub accessor: String,
    pub init: InstanceInit,

    /// Also emit an impl of the marker crate's `Singleton` trait.
    pub implement_trait: bool,
}

impl Default for SingletonOptions {
    fn default() -> Self {
        Self {
            accessor: "instance".to_string(),
            init: InstanceInit::default(),
            implement_trait: true,
        }
    }
}

///
/// NotifyOptions
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotifyOptions {
    /// Also emit an impl of the marker crate's `NotifyPropertyChanged` trait.
    pub implement_trait: bool,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            implement_trait: true,
        }
    }
}

///
/// InstanceInit
///
/// How a generated accessor creates its instance on first access.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceInit {
    /// Read, and create when absent. Not atomic: concurrent first accesses
    /// may each construct an instance and the last store wins.
    #[default]
    #[display("check-then-create")]
    CheckThenCreate,

    /// `std::sync::OnceLock`; exactly one instance is ever constructed.
    #[display("once")]
    Once,
}
