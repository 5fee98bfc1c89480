use std::f64::consts::E;

pub const fn bpm_to_milliseconds(bpm: f64, delimiter: Option<i32>) -> f64 {
    60_000.0 / i32_unwrap_or(delimiter, 4) as f64 / bpm
}

pub const fn milliseconds_to_bpm(ms: f64, delimiter: Option<i32>) -> f64 {
    60_000.0 / (ms * i32_unwrap_or(delimiter, 4) as f64)
}

// `Option::unwrap_or` is not const
const fn i32_unwrap_or(option: Option<i32>, default: i32) -> i32 {
    match option {
        Some(value) => value,
        None => default,
    }
}

pub fn logistic(x: f64, midpoint_offset: f64, multiplier: f64, max_value: Option<f64>) -> f64 {
    max_value.unwrap_or(1.0) / (1.0 + f64::exp(multiplier * (midpoint_offset - x)))
}

// Takes the exponent directly
pub fn logistic_exp(exp: f64, max_value: Option<f64>) -> f64 {
    max_value.unwrap_or(1.0) / (1.0 + f64::exp(exp))
}

/// Gaussian bell curve with its peak `multiplier` at `mean`.
pub fn bell_curve(x: f64, mean: f64, width: f64, multiplier: Option<f64>) -> f64 {
    multiplier.unwrap_or(1.0) * f64::exp(E * -((x - mean).powi(2) / width.powi(2)))
}

/// Smoothstep between `start` and `end`, returns a value in `[0, 1]`.
pub fn smoothstep(x: f64, start: f64, end: f64) -> f64 {
    let x = reverse_lerp(x, start, end);

    x * x * (3.0 - 2.0 * x)
}

/// Like [`smoothstep`] but with vanishing second derivatives at the
/// bounds.
pub fn smootherstep(x: f64, start: f64, end: f64) -> f64 {
    let x = reverse_lerp(x, start, end);

    x * x * x * (x * (6.0 * x - 15.0) + 10.0)
}

/// Where `x` lies between `start` and `end`, clamped to `[0, 1]`.
pub fn reverse_lerp(x: f64, start: f64, end: f64) -> f64 {
    ((x - start) / (end - start)).clamp(0.0, 1.0)
}

pub fn lerp(start: f64, end: f64, amount: f64) -> f64 {
    start + (end - start) * amount
}

/// The `p`-norm of the given values.
pub fn norm(p: f64, values: &[f64]) -> f64 {
    values
        .iter()
        .map(|x| x.powf(p))
        .sum::<f64>()
        .powf(p.recip())
}

/// Lower bound of the probability `p` observed over `n` trials that holds
/// with 99% confidence (Wilson score interval).
pub fn probability_lower_bound(n: f64, p: f64) -> f64 {
    // One-tailed 99% critical value of the normal distribution
    const Z: f64 = 2.326_347_874_04;
    const Z2: f64 = Z * Z;

    (n * p + Z2 / 2.0) / (n + Z2) - Z / (n + Z2) * (n * p * (1.0 - p) + Z2 / 4.0).sqrt()
}

/// Scale `difficulty` into an `(min, mid, max)` range around `5.0`.
pub fn difficulty_range(difficulty: f64, min: f64, mid: f64, max: f64) -> f64 {
    if difficulty > 5.0 {
        mid + (max - mid) * (difficulty - 5.0) / 5.0
    } else if difficulty < 5.0 {
        mid - (mid - min) * (5.0 - difficulty) / 5.0
    } else {
        mid
    }
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    #[test]
    fn bpm_ms_inverse() {
        let ms = bpm_to_milliseconds(200.0, None);
        assert!(milliseconds_to_bpm(ms, None).eq(200.0));
    }

    #[test]
    fn logistic_midpoints() {
        assert!(logistic(4.0, 4.0, -1.0 / 25.0, Some(0.5)).eq(0.25));
        assert!(logistic_exp(0.0, None).eq(0.5));
        assert!(logistic_exp(E, None) < logistic_exp(-E, None));
    }

    #[test]
    fn bell_curve_peaks_at_mean() {
        assert!(bell_curve(1.0, 1.0, 0.5, None).eq(1.0));
        assert!(bell_curve(1.5, 1.0, 0.5, Some(2.0)).almost_eq(2.0 * (-E).exp(), 1e-12));
        assert!(bell_curve(0.7, 1.0, 0.3, None).eq(bell_curve(1.3, 1.0, 0.3, None)));
    }

    #[test]
    fn smoothstep_bounds() {
        assert!(smoothstep(-3.0, 0.0, 1.0).eq(0.0));
        assert!(smoothstep(0.5, 0.0, 1.0).eq(0.5));
        assert!(smoothstep(7.0, 0.0, 1.0).eq(1.0));
    }

    #[test]
    fn smootherstep_is_symmetric() {
        assert!(smootherstep(0.5, 0.0, 1.0).eq(0.5));
        assert!(smootherstep(0.25, 1.0, 0.0).almost_eq(1.0 - smootherstep(0.25, 0.0, 1.0), 1e-12));
    }

    #[test]
    fn lower_bound_is_below_observation() {
        let bound = probability_lower_bound(500.0, 0.95);

        assert!(bound < 0.95);
        assert!(bound > 0.9);
        assert!(probability_lower_bound(10.0, 0.95) < bound);
    }

    #[test]
    fn range_midpoint() {
        assert!(difficulty_range(5.0, 80.0, 50.0, 20.0).eq(50.0));
        assert!(difficulty_range(10.0, 80.0, 50.0, 20.0).eq(20.0));
        assert!(difficulty_range(0.0, 80.0, 50.0, 20.0).eq(80.0));
    }
}
