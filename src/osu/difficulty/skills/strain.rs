use crate::{any::difficulty::skills::DECAY_WEIGHT, util::difficulty::lerp};

pub const REDUCED_SECTION_COUNT: usize = 10;
const REDUCED_STRAIN_BASELINE: f64 = 0.75;

/// Weighted sum of strain peaks where the highest `reduced_section_count`
/// peaks are scaled down to reduce the impact of short difficulty spikes.
pub fn difficulty_value(current_strain_peaks: Vec<f64>, reduced_section_count: usize) -> f64 {
    let mut difficulty = 0.0;
    let mut weight = 1.0;

    let mut peaks = current_strain_peaks;
    peaks.retain(|&p| p > 0.0);
    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    for (i, strain) in peaks.iter_mut().take(reduced_section_count).enumerate() {
        let clamped = f64::from((i as f32 / reduced_section_count as f32).clamp(0.0, 1.0));
        let scale = f64::log10(lerp(1.0, 10.0, clamped));
        *strain *= lerp(REDUCED_STRAIN_BASELINE, 1.0, scale);
    }

    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    for strain in peaks {
        difficulty += strain * weight;
        weight *= DECAY_WEIGHT;
    }

    difficulty
}

pub fn difficulty_to_performance(difficulty: f64) -> f64 {
    f64::powf(5.0 * f64::max(1.0, difficulty / 0.0675) - 4.0, 3.0) / 100_000.0
}

/// Inverse of [`difficulty_to_performance`] for performance values above
/// its floor.
pub fn performance_to_difficulty(performance: f64) -> f64 {
    let base = (100_000.0 * performance.max(0.0)).cbrt();

    ((base + 4.0) / 5.0).max(1.0) * 0.0675
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    #[test]
    fn top_peak_is_reduced() {
        let value = difficulty_value(vec![10.0], REDUCED_SECTION_COUNT);

        assert!(value.eq(7.5), "{value}");
    }

    #[test]
    fn peaks_beyond_reduced_count_are_untouched() {
        let peaks = vec![1.0; 11];
        let value = difficulty_value(peaks, 10);

        // The unreduced peak is sorted to the front, followed by the reduced
        // ones in descending order
        let mut expected = 1.0;
        let mut weight = DECAY_WEIGHT;

        for i in (0..10).rev() {
            let scale = (1.0 + 9.0 * f64::from(i as f32 / 10.0_f32)).log10();
            expected += lerp(0.75, 1.0, scale) * weight;
            weight *= DECAY_WEIGHT;
        }

        assert!(value.almost_eq(expected, 1e-9), "{value} != {expected}");
    }

    #[test]
    fn performance_floor() {
        assert!(difficulty_to_performance(0.0).eq(1e-5));
        assert!(performance_to_difficulty(0.0).eq(0.0675));
    }

    #[test]
    fn performance_converts_back() {
        for difficulty in [0.0675, 0.5, 2.0, 4.25] {
            let performance = difficulty_to_performance(difficulty);

            assert!(
                performance_to_difficulty(performance).almost_eq(difficulty, 1e-9),
                "{difficulty}"
            );
        }
    }
}
