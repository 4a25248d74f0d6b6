use thiserror::Error as ThisError;

///
/// Error
///
/// Pass-level failures. Per-declaration problems never surface here: a
/// candidate that cannot be resolved is dropped, and structural violations
/// become diagnostics.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("generation pass cancelled after {processed} candidates")]
    Cancelled { processed: usize },
}
