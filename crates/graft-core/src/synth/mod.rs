//! Synthesizers.
//!
//! Each pattern is one [`Synthesizer`]: a predicate picking candidate nodes,
//! an extractor turning a candidate into a record, and a template turning one
//! owner's records into a fragment.

pub mod fragment;
pub mod notify;
pub mod singleton;

pub use fragment::{FragmentBuilder, Member, SynthesizedFragment};

use crate::{
    extract::Owned,
    group::TypeGroup,
    model::{NodeId, SymbolModel},
    scan::Predicate,
};
use std::fmt::Debug;

///
/// Synthesizer
///

pub trait Synthesizer: Send + Sync {
    type Metadata: Owned + Clone + Debug + Eq + Send + Sync;

    /// Short pattern tag, used in emitted file names.
    fn pattern(&self) -> &'static str;

    fn predicate(&self) -> Predicate;

    fn extract(&self, model: &dyn SymbolModel, node: NodeId) -> Option<Self::Metadata>;

    /// Render the group, or `None` when there is nothing to add.
    fn synthesize(&self, group: &TypeGroup<Self::Metadata>) -> Option<SynthesizedFragment>;
}
