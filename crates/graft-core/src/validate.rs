//! Structural validation.
//!
//! A type carrying the instance-accessor marker may declare no constructor at
//! all, or exactly one that is private and takes no parameters. Anything else
//! is reported once per type, at the type's name.

use crate::{
    Error,
    diagnostic::{Diagnostic, INVALID_SINGLETON, RuleDescriptor},
    markers::MarkerSet,
    model::{NodeId, SymbolModel, SyntaxTree},
    pipeline::Cancellation,
    scan,
};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

///
/// Validator
///

#[derive(Clone, Debug, Default)]
pub struct Validator {
    markers: MarkerSet,
}

impl Validator {
    #[must_use]
    pub const fn new(markers: MarkerSet) -> Self {
        Self { markers }
    }

    /// Rules this validator can report.
    #[must_use]
    pub const fn rules() -> &'static [RuleDescriptor] {
        &[INVALID_SINGLETON]
    }

    /// Check every type declaration in `model`, in tree order.
    pub fn validate<M>(&self, model: &M, cancel: &Cancellation) -> Result<Vec<Diagnostic>, Error>
    where
        M: SyntaxTree + SymbolModel,
    {
        let candidates: Vec<_> = scan::candidates(model, scan::is_type_declaration).collect();
        let processed = AtomicUsize::new(0);

        let found = candidates
            .par_iter()
            .map(|node| {
                cancel.checkpoint(processed.fetch_add(1, Ordering::Relaxed))?;

                Ok(self.diagnose(model, node.id))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(found.into_iter().flatten().collect())
    }

    /// Diagnostic for one type declaration, if it breaks the rule.
    #[must_use]
    pub fn diagnose<M>(&self, model: &M, node: NodeId) -> Option<Diagnostic>
    where
        M: SymbolModel + ?Sized,
    {
        let ty = model.declared_symbol(node)?;
        if !model
            .markers(ty)
            .iter()
            .any(|m| m.path == *self.markers.singleton())
        {
            return None;
        }

        let constructors = model.constructors(ty);
        let valid = match constructors.as_slice() {
            [] => true,
            [only] => only.is_private_parameterless(),
            _ => false,
        };
        if valid {
            return None;
        }

        let name = model.symbol_name(ty)?;
        let location = model.location(ty).unwrap_or_default();
        debug!(%ty, %name, constructors = constructors.len(), "invalid singleton");

        Some(Diagnostic::new(&INVALID_SINGLETON, location, &name))
    }
}

///
/// TESTS
///
