//! Budget-constrained parameter search.
//!
//! Two strategies share the [`Evaluator`](crate::budget::Evaluator):
//!
//! - [`search_max_resolution`]: fixed palette, grow the long edge in fixed
//!   steps until the encode no longer fits, then keep the last fit.
//! - [`search_max_palette`]: fixed long edge, grow the palette in fixed steps
//!   while the encode fits and the palette is not yet close to the image's own
//!   distinct color count, then step back once and re-evaluate.
//!
//! Both are strictly sequential. A search moves `Init -> Probing` and ends in
//! either `Converged` (an output that was evaluated as fitting) or
//! `Infeasible`, which is reported and never clamped. Cancellation is polled
//! before every evaluation; a cancelled search returns no partial output.

mod cancel;
mod palette;
mod resolution;

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::markup::EncodedOutput;
use crate::raster::{RasterError, TargetSpec};

pub use cancel::{CancelToken, Cancellation};
pub use palette::{search_max_palette, search_max_palette_with};
pub use resolution::{search_max_resolution, search_max_resolution_with};

/// No parameter value in range satisfies the budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Infeasible {
    /// Even the smallest resolution step is over budget.
    #[error("no resolution fits: smallest attempt costs {byte_cost} bytes")]
    NoFeasibleResolution { byte_cost: usize },

    /// A single-color palette is already over budget at this resolution.
    #[error("resolution too large for any palette: single color costs {byte_cost} bytes")]
    ResolutionTooLargeForAnyPalette { byte_cost: usize },

    /// The committed value failed its confirming evaluation.
    #[error("palette size {palette_size} failed confirmation at {byte_cost} bytes")]
    Unconfirmed { palette_size: u16, byte_cost: usize },
}

/// Errors from a parameter search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Infeasible(#[from] Infeasible),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The caller cancelled the search.
    #[error("search cancelled")]
    Cancelled,
}

/// A converged search: the committed output and the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub output: EncodedOutput,
    pub spec: TargetSpec,
    /// Number of encode passes the search ran.
    pub evaluations: u32,
}

/// Mutable state of one search call. Never shared between searches.
#[derive(Debug)]
struct SearchState<T> {
    value: T,
    step: T,
    last_feasible: Option<(TargetSpec, EncodedOutput)>,
    evaluations: u32,
}

impl<T: Copy> SearchState<T> {
    fn new(value: T, step: T) -> Self {
        Self {
            value,
            step,
            last_feasible: None,
            evaluations: 0,
        }
    }

    fn checkpoint(&self, cancel: &impl Cancellation) -> Result<(), SearchError> {
        if cancel.is_cancelled() {
            tracing::debug!(evaluations = self.evaluations, "search cancelled");
            return Err(SearchError::Cancelled);
        }
        Ok(())
    }
}

/// Route search logs to the test harness. Enable with `RUST_LOG=hintpix_core=debug`.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
