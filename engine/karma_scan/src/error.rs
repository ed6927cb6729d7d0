//! Scan failures.

use karma_ds::DsError;
use karma_types::ElementType;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ScanError {
    #[error("continuous phase unwrapping is not implemented")]
    ContinuousPhaseUnimplemented,

    #[error("element type {0} cannot be scanned")]
    NotNumeric(ElementType),

    #[error("histogram needs at least one bin over a non-empty range (got {bins} bins over {min}..{max})")]
    InvalidHistogram { min: f64, max: f64, bins: usize },

    /// Name resolution through the descriptor graph failed.
    #[error(transparent)]
    Ds(#[from] DsError),
}

pub type Result<T, E = ScanError> = std::result::Result<T, E>;
