//! Marker-driven synthesis and structural validation.
//!
//! The pipeline reads a host's resolved declaration model through
//! [`model::SymbolModel`], selects marked declarations, and turns them into
//! generated `impl` fragments ([`synth`]) and diagnostics ([`validate`]).
//! Everything here is a pure read-then-emit transformation; the host owns all
//! symbol identity and decides where generated files land.

pub mod diagnostic;
pub mod error;
pub mod extract;
pub mod group;
pub mod markers;
pub mod model;
pub mod naming;
pub mod options;
pub mod pipeline;
pub mod scan;
pub mod synth;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        diagnostic::{Diagnostic, RuleId, Severity},
        error::Error,
        markers::MarkerSet,
        model::{
            ArgValue, Constructor, Location, Marker, MarkerPath, NodeId, NodeKind, SymbolId,
            SymbolModel, SyntaxNode, SyntaxTree, Visibility,
        },
        options::{InstanceInit, NotifyOptions, Options, SingletonOptions},
        pipeline::{Cancellation, Generator, Host, PassOutput, PassStats, SourceFile},
    };
}
