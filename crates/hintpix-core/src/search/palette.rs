//! Palette search: maximize the palette size for a fixed long edge.

use tracing::debug;

use super::{Cancellation, Infeasible, SearchError, SearchOutcome, SearchState};
use crate::budget::{BudgetError, Evaluator};
use crate::config::EngineConfig;
use crate::raster::{SourceRaster, TargetSpec, MAX_PALETTE_SIZE};

/// Grow the palette while it fits and is not yet close to the image's own color count.
///
/// 1. Probe a single-color palette; if that is over budget nothing can fit.
/// 2. Count the distinct colors of the image quantized to 256 colors at the
///    target resolution.
/// 3. Add `config.palette_step` colors at a time while the last encode cost
///    less than the ceiling and the palette differs from the distinct count
///    by more than half a step.
/// 4. Step back to the previously evaluated size and re-evaluate it.
///
/// The stop rule aims at the image's natural color count rather than at
/// exhausting the budget, so a larger palette may still fit.
///
/// # Errors
///
/// - `Infeasible::ResolutionTooLargeForAnyPalette` when one color is over budget
/// - `Infeasible::Unconfirmed` when the committed size fails re-evaluation
/// - `RasterError::DegenerateSize` when `long_edge` collapses a side
pub fn search_max_palette(
    raster: &SourceRaster,
    long_edge: u32,
    use_alpha: bool,
    config: &EngineConfig,
) -> Result<SearchOutcome, SearchError> {
    search_max_palette_with(raster, long_edge, use_alpha, config, &|| false)
}

/// [`search_max_palette`] with cooperative cancellation.
pub fn search_max_palette_with(
    raster: &SourceRaster,
    long_edge: u32,
    use_alpha: bool,
    config: &EngineConfig,
    cancel: &impl Cancellation,
) -> Result<SearchOutcome, SearchError> {
    config.validate()?;
    let evaluator = Evaluator::new(raster, config);
    let ceiling = evaluator.ceiling().bytes();
    let base = TargetSpec::new(long_edge, 1, use_alpha)?;
    let mut state = SearchState::new(1u16, config.palette_step);

    state.checkpoint(cancel)?;
    state.evaluations += 1;
    let mut byte_cost = evaluator.cost(&base)?;
    if !evaluator.ceiling().fits(byte_cost) {
        debug!(long_edge, byte_cost, "palette search infeasible");
        return Err(Infeasible::ResolutionTooLargeForAnyPalette { byte_cost }.into());
    }

    let max_distinct = evaluator.distinct_colors(long_edge, use_alpha)?;
    debug!(long_edge, max_distinct, ceiling, "palette search probing");

    let mut previous = state.value;
    while byte_cost < ceiling
        && usize::from(state.value).abs_diff(max_distinct) * 2 > usize::from(state.step)
        && state.value < MAX_PALETTE_SIZE
    {
        state.checkpoint(cancel)?;

        previous = state.value;
        state.value = state
            .value
            .saturating_add(state.step)
            .min(MAX_PALETTE_SIZE);
        state.evaluations += 1;

        byte_cost = evaluator.cost(&base.with_palette_size(state.value))?;
    }

    // Step back once and confirm
    state.checkpoint(cancel)?;
    let spec = base.with_palette_size(previous);
    state.evaluations += 1;

    match evaluator.evaluate(&spec) {
        Ok(output) => {
            debug!(
                palette_size = spec.palette_size,
                byte_cost = output.byte_cost,
                evaluations = state.evaluations,
                "palette search converged"
            );
            Ok(SearchOutcome {
                output,
                spec,
                evaluations: state.evaluations,
            })
        }
        Err(BudgetError::OverBudget { byte_cost, .. }) => Err(Infeasible::Unconfirmed {
            palette_size: spec.palette_size,
            byte_cost,
        }
        .into()),
        Err(BudgetError::Raster(err)) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::encode_under_budget;
    use crate::raster::{PixelFormat, RasterError, ResampleFilter};
    use crate::search::{init_test_tracing, CancelToken};

    /// `stripes` vertical bands of distinct gray levels, `width` x `height`.
    fn striped(width: u32, height: u32, stripes: u32) -> SourceRaster {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..height {
            for x in 0..width {
                let band = x * stripes / width;
                let v = (band * 255 / stripes.max(2).saturating_sub(1).max(1)) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        SourceRaster::new(width, height, PixelFormat::Rgb8, pixels).unwrap()
    }

    fn nearest_config() -> EngineConfig {
        let mut config = EngineConfig::new();
        config.filter = ResampleFilter::Nearest;
        config
    }

    #[test]
    fn test_steps_back_from_color_limit() {
        init_test_tracing();
        // 32 distinct colors at 64x64; generous ceiling
        let raster = striped(64, 64, 32);
        let outcome = search_max_palette(&raster, 64, false, &nearest_config()).unwrap();

        // 1, 6, ..., 31 (|31 - 32| <= 2.5 stops) -> step back to 26
        assert_eq!(outcome.spec.palette_size, 26);
        assert_eq!(outcome.spec.long_edge, 64);
        assert!(outcome.output.colors_used <= 26);
        // probe + 6 steps + confirmation
        assert_eq!(outcome.evaluations, 8);
    }

    #[test]
    fn test_few_colors_stay_at_one() {
        // 2 distinct colors: |1 - 2| <= 2.5 means the loop never runs
        let raster = striped(8, 8, 2);
        let outcome = search_max_palette(&raster, 8, false, &nearest_config()).unwrap();
        assert_eq!(outcome.spec.palette_size, 1);
        assert_eq!(outcome.evaluations, 2);
    }

    #[test]
    fn test_budget_limits_palette() {
        let raster = striped(64, 8, 64);
        let config = nearest_config();

        // Allow anything cheaper than a 16-color encode
        let evaluator = Evaluator::new(&raster, &config);
        let spec = TargetSpec::new(64, 16, false).unwrap();
        let cost_16 = evaluator.encode(&spec).unwrap().byte_cost;

        let mut config = config;
        config.max_byte_size = cost_16 - 1;
        let outcome = search_max_palette(&raster, 64, false, &config).unwrap();

        // 16 is over budget, so the committed size is one of 1, 6, 11
        let size = outcome.spec.palette_size;
        assert!(size < 16, "committed {size}");
        assert_eq!((size - 1) % 5, 0);
        assert!(encode_under_budget(&raster, &outcome.spec, &config).is_ok());
    }

    #[test]
    fn test_single_color_over_budget() {
        let raster = striped(16, 16, 4);
        let mut config = nearest_config();
        config.max_byte_size = 10;

        let err = search_max_palette(&raster, 16, false, &config).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Infeasible(Infeasible::ResolutionTooLargeForAnyPalette { .. })
        ));
    }

    #[test]
    fn test_degenerate_resolution() {
        let raster = striped(100, 1, 4);
        let err = search_max_palette(&raster, 2, false, &nearest_config()).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Raster(RasterError::DegenerateSize { .. })
        ));
    }

    #[test]
    fn test_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let err = search_max_palette_with(&striped(8, 8, 8), 8, false, &nearest_config(), &token)
            .unwrap_err();
        assert_eq!(err, SearchError::Cancelled);
    }

    #[test]
    fn test_never_exceeds_256() {
        // Gradient with more than 256 colors
        let mut pixels = Vec::with_capacity(64 * 64 * 3);
        for y in 0..64u32 {
            for x in 0..64u32 {
                pixels.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8]);
            }
        }
        let raster = SourceRaster::new(64, 64, PixelFormat::Rgb8, pixels).unwrap();
        let mut config = nearest_config();
        config.max_byte_size = 1_000_000;
        let outcome = search_max_palette(&raster, 64, false, &config).unwrap();

        // Steps of 5 from 1 stop near the distinct count, then step back
        let size = outcome.spec.palette_size;
        assert!(size <= MAX_PALETTE_SIZE);
        assert!(size >= 100, "stopped early at {size}");
        assert_eq!((size - 1) % 5, 0);
        assert!(outcome.output.colors_used <= size as usize);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::budget::encode_under_budget;
    use crate::raster::{PixelFormat, ResampleFilter};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: a converged palette search always re-evaluates as feasible.
        #[test]
        fn prop_committed_palette_fits(
            side in 2u32..=20,
            colors in 1u32..=40,
            ceiling in 100usize..=3000,
        ) {
            let mut pixels = Vec::with_capacity((side * side * 3) as usize);
            for i in 0..side * side {
                let c = (i % colors) as u8;
                pixels.extend_from_slice(&[c.wrapping_mul(6), c.wrapping_mul(3), 255 - c]);
            }
            let raster = SourceRaster::new(side, side, PixelFormat::Rgb8, pixels).unwrap();
            let mut config = EngineConfig::new();
            config.max_byte_size = ceiling;
            config.filter = ResampleFilter::Nearest;

            match search_max_palette(&raster, side, false, &config) {
                Ok(outcome) => {
                    prop_assert!(outcome.output.byte_cost <= ceiling);
                    prop_assert!(encode_under_budget(&raster, &outcome.spec, &config).is_ok());
                    prop_assert!(outcome.spec.palette_size >= 1);
                    prop_assert!(outcome.spec.palette_size <= MAX_PALETTE_SIZE);
                }
                Err(SearchError::Infeasible(Infeasible::ResolutionTooLargeForAnyPalette { byte_cost })) => {
                    prop_assert!(byte_cost > ceiling);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }
}
