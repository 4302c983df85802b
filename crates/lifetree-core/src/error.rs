//! Error types for the lifetree-core crate.
//!
//! Generation and scoring never fail for well-formed input. The only
//! failure a caller has to handle here is a life that ended before enough
//! consciousness samples were recorded to say anything about it.

/// Errors raised by the life recorder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifeError {
    /// Too few samples were recorded to score the life or tell its story.
    ///
    /// Callers are expected to skip the operation, not abort.
    #[error("insufficient data: {recorded} samples recorded, {required} required")]
    InsufficientData {
        /// Samples recorded so far.
        recorded: usize,
        /// Minimum number of samples required.
        required: usize,
    },
}
