//! Resolution search: maximize the long edge for a fixed palette size.

use tracing::debug;

use super::{Cancellation, Infeasible, SearchError, SearchOutcome, SearchState};
use crate::budget::{BudgetError, Evaluator};
use crate::config::EngineConfig;
use crate::raster::{RasterError, SourceRaster, TargetSpec, MIN_MANUAL_LONG_EDGE};

/// Find the largest long edge that fits the configured ceiling.
///
/// Starts at 2 pixels and grows by `config.resolution_step` while the encode
/// fits. The first over-budget step ends the scan and the previous step is
/// the answer, so the result `R` fits while `R + step` does not. Steps whose
/// short edge would round to zero are skipped.
///
/// # Errors
///
/// - `Infeasible::NoFeasibleResolution` when the first encodable step is over budget
/// - `RasterError::InvalidParameter` for a palette size outside 1-256
/// - `ConfigError` for an invalid configuration
pub fn search_max_resolution(
    raster: &SourceRaster,
    palette_size: u16,
    use_alpha: bool,
    config: &EngineConfig,
) -> Result<SearchOutcome, SearchError> {
    search_max_resolution_with(raster, palette_size, use_alpha, config, &|| false)
}

/// [`search_max_resolution`] with cooperative cancellation.
pub fn search_max_resolution_with(
    raster: &SourceRaster,
    palette_size: u16,
    use_alpha: bool,
    config: &EngineConfig,
    cancel: &impl Cancellation,
) -> Result<SearchOutcome, SearchError> {
    config.validate()?;
    let evaluator = Evaluator::new(raster, config);
    let base = TargetSpec::new(MIN_MANUAL_LONG_EDGE, palette_size, use_alpha)?;
    let mut state = SearchState::new(MIN_MANUAL_LONG_EDGE, config.resolution_step);

    debug!(
        palette_size,
        use_alpha,
        ceiling = evaluator.ceiling().bytes(),
        "resolution search probing"
    );

    loop {
        state.checkpoint(cancel)?;

        let spec = base.with_long_edge(state.value);
        state.evaluations += 1;

        match evaluator.evaluate(&spec) {
            Ok(output) => state.last_feasible = Some((spec, output)),
            Err(BudgetError::Raster(RasterError::DegenerateSize { width, height })) => {
                debug!(long_edge = state.value, width, height, "skipping degenerate step");
            }
            Err(BudgetError::Raster(err)) => return Err(err.into()),
            Err(BudgetError::OverBudget { byte_cost, .. }) => {
                return match state.last_feasible.take() {
                    Some((spec, output)) => {
                        debug!(
                            long_edge = spec.long_edge,
                            byte_cost = output.byte_cost,
                            evaluations = state.evaluations,
                            "resolution search converged"
                        );
                        Ok(SearchOutcome {
                            output,
                            spec,
                            evaluations: state.evaluations,
                        })
                    }
                    None => {
                        debug!(byte_cost, "resolution search infeasible");
                        Err(Infeasible::NoFeasibleResolution { byte_cost }.into())
                    }
                };
            }
        }

        state.value = state.value.checked_add(state.step).ok_or_else(|| {
            RasterError::InvalidParameter("long edge overflowed during search".to_string())
        })?;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::budget::encode_under_budget;
    use crate::raster::{PixelFormat, ResampleFilter};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: the answer fits and the next step does not.
        #[test]
        fn prop_resolution_boundary_is_tight(
            w in 1u32..=24,
            h in 1u32..=24,
            seed in any::<u8>(),
            ceiling in 200usize..=4000,
        ) {
            let pixels: Vec<u8> = (0..w * h * 3)
                .map(|i| ((i / 3 / 4) as u8).wrapping_mul(seed | 1))
                .collect();
            let raster = SourceRaster::new(w, h, PixelFormat::Rgb8, pixels).unwrap();
            let mut config = EngineConfig::new();
            config.max_byte_size = ceiling;
            config.filter = ResampleFilter::Nearest;

            match search_max_resolution(&raster, 4, false, &config) {
                Ok(outcome) => {
                    prop_assert!(outcome.output.byte_cost <= ceiling);
                    prop_assert!(encode_under_budget(&raster, &outcome.spec, &config).is_ok());
                    let next = outcome.spec.with_long_edge(outcome.spec.long_edge + 2);
                    prop_assert!(
                        matches!(
                            encode_under_budget(&raster, &next, &config),
                            Err(BudgetError::OverBudget { .. })
                        ),
                        "R + 2 should be over budget"
                    );
                }
                Err(SearchError::Infeasible(Infeasible::NoFeasibleResolution { byte_cost })) => {
                    prop_assert!(byte_cost > ceiling);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }
}
