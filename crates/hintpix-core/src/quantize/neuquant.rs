//! Palette learning for images with more distinct colors than palette slots.
//!
//! Uses the NeuQuant network from `color_quant`. A one-color palette is the
//! pixel mean instead, since the network needs at least two neurons.

use color_quant::NeuQuant;
use image::Rgba;

/// NeuQuant sampling factor: 1 examines every pixel, 10 one in ten.
fn sample_factor(pixel_count: usize) -> i32 {
    match pixel_count {
        n if n > 1_000_000 => 10,
        n if n > 500_000 => 8,
        n if n > 100_000 => 5,
        n if n > 20_000 => 3,
        _ => 1,
    }
}

/// Learn at most `max_colors` candidate colors from `pixels`.
///
/// Candidates may repeat or go unused; the caller maps pixels to the nearest
/// candidate and drops the rest. With `use_alpha` off every candidate is
/// forced opaque.
pub(crate) fn learn_palette(
    pixels: &[Rgba<u8>],
    max_colors: usize,
    use_alpha: bool,
) -> Vec<Rgba<u8>> {
    if pixels.is_empty() {
        return Vec::new();
    }
    if max_colors <= 1 {
        return vec![mean_color(pixels)];
    }

    let raw: Vec<u8> = pixels.iter().flat_map(|p| p.0).collect();
    let nq = NeuQuant::new(sample_factor(pixels.len()), max_colors, &raw);

    nq.color_map_rgba()
        .chunks_exact(4)
        .map(|c| Rgba([c[0], c[1], c[2], if use_alpha { c[3] } else { 255 }]))
        .collect()
}

/// Rounded per-channel mean.
fn mean_color(pixels: &[Rgba<u8>]) -> Rgba<u8> {
    let total = pixels.len() as u64;
    let sums = pixels.iter().fold([0u64; 4], |mut acc, p| {
        for (sum, value) in acc.iter_mut().zip(p.0) {
            *sum += u64::from(value);
        }
        acc
    });
    Rgba(sums.map(|s| ((s + total / 2) / total) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: u32) -> Vec<Rgba<u8>> {
        (0..len)
            .map(|i| {
                let v = (i * 255 / len.max(2).saturating_sub(1)) as u8;
                Rgba([v, v, 255 - v, 255])
            })
            .collect()
    }

    #[test]
    fn test_single_color_is_mean() {
        let pixels = vec![Rgba([0, 0, 0, 255]); 3]
            .into_iter()
            .chain([Rgba([200, 0, 0, 255])])
            .collect::<Vec<_>>();
        assert_eq!(learn_palette(&pixels, 1, false), vec![Rgba([50, 0, 0, 255])]);
    }

    #[test]
    fn test_palette_length_matches_request() {
        let pixels = ramp(512);
        for size in [2usize, 7, 64, 256] {
            assert_eq!(learn_palette(&pixels, size, false).len(), size);
        }
    }

    #[test]
    fn test_opaque_candidates() {
        let pixels = ramp(300);
        assert!(learn_palette(&pixels, 16, false).iter().all(|c| c[3] == 255));
    }

    #[test]
    fn test_deterministic() {
        let pixels = ramp(400);
        assert_eq!(learn_palette(&pixels, 12, false), learn_palette(&pixels, 12, false));
    }

    #[test]
    fn test_empty_input() {
        assert!(learn_palette(&[], 8, false).is_empty());
    }

    #[test]
    fn test_sample_factor_tiers() {
        assert_eq!(sample_factor(64 * 64), 1);
        assert_eq!(sample_factor(300 * 300), 3);
        assert_eq!(sample_factor(4000 * 3000), 10);
    }
}
