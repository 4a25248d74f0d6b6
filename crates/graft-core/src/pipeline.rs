//! Generation passes.
//!
//! A [`Pipeline`] drives one synthesizer: scan, extract, group, synthesize.
//! Extraction results are cached per node and keyed by the node's revision;
//! rendered fragments are cached per owner and reused while the owner's
//! records compare equal. The [`Generator`] runs every pipeline plus the
//! validator and hands the results to a [`Host`].

use crate::{
    Error,
    diagnostic::Diagnostic,
    group::group_by_owner,
    model::{NodeId, SymbolId, SymbolModel, SyntaxTree},
    options::Options,
    scan,
    synth::{
        SynthesizedFragment, Synthesizer, notify::NotifySynthesizer,
        singleton::SingletonSynthesizer,
    },
    validate::Validator,
};
use derive_more::Display;
use rayon::prelude::*;
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};
use tracing::{info, trace};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by graft. Do not edit.";

///
/// Cancellation
///
/// Shared flag a host flips to abandon a pass in flight. A cancelled pass
/// emits nothing.
///

#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Fail with [`Error::Cancelled`] once cancellation was requested.
    pub fn checkpoint(&self, processed: usize) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled { processed })
        } else {
            Ok(())
        }
    }
}

///
/// Host
///
/// Where a finished pass goes.
///

pub trait Host {
    fn emit_source(&mut self, file_name: &str, text: &str);

    fn report_diagnostic(&mut self, diagnostic: Diagnostic);
}

///
/// SourceFile
///
/// All fragments one pattern adds to the types of one namespace.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SourceFile {
    pub file_name: String,
    pub namespace: String,
    pub pattern: &'static str,
    pub owners: Vec<String>,
    pub text: String,
}

impl SourceFile {
    fn assemble(namespace: &str, pattern: &'static str, fragments: &[&SynthesizedFragment]) -> Self {
        let mut text = String::from(GENERATED_HEADER);
        text.push('\n');
        for fragment in fragments {
            text.push_str(&fragment.render().to_string());
            text.push('\n');
        }

        Self {
            file_name: format!("{namespace}.{pattern}.rs"),
            namespace: namespace.to_string(),
            pattern,
            owners: fragments.iter().map(|f| f.owner_name.clone()).collect(),
            text,
        }
    }
}

///
/// PassStats
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize)]
#[display(
    "{candidates} candidates, {extracted} extracted, {reused} reused, {rendered} rendered"
)]
pub struct PassStats {
    pub candidates: usize,

    /// Candidates whose metadata was (re)computed.
    pub extracted: usize,

    /// Candidates served from the extraction cache.
    pub reused: usize,

    /// Owners whose fragment was (re)rendered.
    pub rendered: usize,
}

impl PassStats {
    fn merge(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.extracted += other.extracted;
        self.reused += other.reused;
        self.rendered += other.rendered;
    }
}

///
/// PassOutput
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PassOutput {
    pub sources: Vec<SourceFile>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: PassStats,
}

impl PassOutput {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

// Cached extraction result for one node.
struct Extracted<M> {
    revision: u64,
    record: Option<M>,
}

// Cached fragment for one owner, valid while its records are unchanged.
struct Rendered<M> {
    records: Vec<M>,
    fragment: Option<SynthesizedFragment>,
}

///
/// Pipeline
///

pub struct Pipeline<S: Synthesizer> {
    synthesizer: S,
    extracted: HashMap<NodeId, Extracted<S::Metadata>>,
    rendered: HashMap<SymbolId, Rendered<S::Metadata>>,
}

impl<S: Synthesizer> Pipeline<S> {
    #[must_use]
    pub fn new(synthesizer: S) -> Self {
        Self {
            synthesizer,
            extracted: HashMap::new(),
            rendered: HashMap::new(),
        }
    }

    /// Run one pass. Caches are only replaced once the pass completes.
    pub fn run<M>(
        &mut self,
        model: &M,
        cancel: &Cancellation,
    ) -> Result<(Vec<SynthesizedFragment>, PassStats), Error>
    where
        M: SyntaxTree + SymbolModel,
    {
        let pattern = self.synthesizer.pattern();
        let candidates: Vec<_> = scan::candidates(model, self.synthesizer.predicate()).collect();
        let processed = AtomicUsize::new(0);

        let results = {
            let cache = &self.extracted;
            let synthesizer = &self.synthesizer;

            candidates
                .par_iter()
                .map(|node| {
                    cancel.checkpoint(processed.fetch_add(1, Ordering::Relaxed))?;

                    match cache.get(&node.id) {
                        Some(hit) if hit.revision == node.revision => {
                            trace!(pattern, node = %node.id, "extraction cache hit");
                            Ok((node, hit.record.clone(), true))
                        }
                        _ => Ok((node, synthesizer.extract(model, node.id), false)),
                    }
                })
                .collect::<Result<Vec<_>, Error>>()?
        };

        let mut stats = PassStats {
            candidates: candidates.len(),
            ..PassStats::default()
        };
        let mut extracted = HashMap::with_capacity(results.len());
        let mut records = Vec::with_capacity(results.len());

        for (node, record, hit) in results {
            if hit {
                stats.reused += 1;
            } else {
                stats.extracted += 1;
            }
            records.push(record.clone());
            extracted.insert(
                node.id,
                Extracted {
                    revision: node.revision,
                    record,
                },
            );
        }

        let mut rendered = HashMap::new();
        let mut fragments = Vec::new();

        for group in group_by_owner(records) {
            let owner = group.owner();
            let fragment = match self.rendered.remove(&owner) {
                Some(cached) if cached.records == group.members() => cached.fragment,
                _ => {
                    stats.rendered += 1;
                    self.synthesizer.synthesize(&group)
                }
            };

            fragments.extend(fragment.clone());
            rendered.insert(
                owner,
                Rendered {
                    records: group.members().to_vec(),
                    fragment,
                },
            );
        }

        self.extracted = extracted;
        self.rendered = rendered;
        info!(pattern, %stats, "pass complete");

        Ok((fragments, stats))
    }
}

///
/// Generator
///
/// Long-lived generation session. Keep one per host so repeated passes reuse
/// work for unchanged declarations.
///

pub struct Generator {
    singleton: Pipeline<SingletonSynthesizer>,
    notify: Pipeline<NotifySynthesizer>,
    validator: Validator,
}

impl Generator {
    #[must_use]
    pub fn new(options: Options) -> Self {
        let Options {
            markers,
            singleton,
            notify,
        } = options;

        Self {
            singleton: Pipeline::new(SingletonSynthesizer::new(markers.clone(), singleton)),
            notify: Pipeline::new(NotifySynthesizer::new(markers.clone(), notify)),
            validator: Validator::new(markers),
        }
    }

    /// Run every pattern and the validator over `model`.
    ///
    /// Files come out sorted by name; diagnostics in declaration order.
    pub fn generate<M>(&mut self, model: &M, cancel: &Cancellation) -> Result<PassOutput, Error>
    where
        M: SyntaxTree + SymbolModel,
    {
        let (mut fragments, mut stats) = self.singleton.run(model, cancel)?;
        let (notify, notify_stats) = self.notify.run(model, cancel)?;
        fragments.extend(notify);
        stats.merge(notify_stats);

        let diagnostics = self.validator.validate(model, cancel)?;

        let mut files: BTreeMap<(&str, &'static str), Vec<&SynthesizedFragment>> = BTreeMap::new();
        for fragment in &fragments {
            files
                .entry((fragment.namespace.as_str(), fragment.pattern))
                .or_default()
                .push(fragment);
        }

        let mut sources: Vec<_> = files
            .into_iter()
            .map(|((namespace, pattern), fragments)| {
                SourceFile::assemble(namespace, pattern, &fragments)
            })
            .collect();
        sources.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        Ok(PassOutput {
            sources,
            diagnostics,
            stats,
        })
    }

    /// [`Self::generate`], then deliver everything to `host`.
    pub fn run<M, H>(
        &mut self,
        model: &M,
        host: &mut H,
        cancel: &Cancellation,
    ) -> Result<PassStats, Error>
    where
        M: SyntaxTree + SymbolModel,
        H: Host + ?Sized,
    {
        let output = self.generate(model, cancel)?;

        for source in &output.sources {
            host.emit_source(&source.file_name, &source.text);
        }
        for diagnostic in output.diagnostics {
            host.report_diagnostic(diagnostic);
        }

        Ok(output.stats)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

///
/// TESTS
///
