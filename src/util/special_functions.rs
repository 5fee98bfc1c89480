use std::f64::consts::PI;

const FRAC_2_SQRT_PI: f64 = std::f64::consts::FRAC_2_SQRT_PI;

/// The error function.
pub fn erf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    } else if x < 0.0 {
        return -erf(-x);
    } else if x >= 6.0 {
        return 1.0;
    } else if x < 3.0 {
        return erf_series(x);
    }

    1.0 - erfc_continued_fraction(x)
}

/// The inverse of [`erf`] for values in `[-1, 1]`.
pub fn erf_inv(p: f64) -> f64 {
    if p <= -1.0 {
        return f64::NEG_INFINITY;
    } else if p >= 1.0 {
        return f64::INFINITY;
    } else if p == 0.0 {
        return 0.0;
    }

    let mut x = erf_inv_estimate(p);

    // Newton steps on the estimate
    for _ in 0..3 {
        let derivative = FRAC_2_SQRT_PI * f64::exp(-x * x);

        if derivative == 0.0 {
            break;
        }

        x -= (erf(x) - p) / derivative;
    }

    x
}

// Every term is positive so there's no cancellation for moderate `x`.
fn erf_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    let mut n = 0.0;

    while term > sum * f64::EPSILON {
        n += 1.0;
        term *= 2.0 * x2 / (2.0 * n + 1.0);
        sum += term;
    }

    FRAC_2_SQRT_PI * f64::exp(-x2) * sum
}

fn erfc_continued_fraction(x: f64) -> f64 {
    const DEPTH: u32 = 80;

    let mut fraction = x;

    for k in (1..=DEPTH).rev() {
        fraction = x + f64::from(k) / 2.0 / fraction;
    }

    f64::exp(-x * x) / (PI.sqrt() * fraction)
}

// <https://people.maths.ox.ac.uk/gilesm/files/gems_erfinv.pdf>
#[allow(clippy::unreadable_literal)]
fn erf_inv_estimate(x: f64) -> f64 {
    let mut w = -f64::ln((1.0 - x) * (1.0 + x));

    let p = if w < 5.0 {
        w -= 2.5;

        let mut p = 2.81022636e-08;
        p = 3.43273939e-07 + p * w;
        p = -3.5233877e-06 + p * w;
        p = -4.39150654e-06 + p * w;
        p = 0.00021858087 + p * w;
        p = -0.00125372503 + p * w;
        p = -0.00417768164 + p * w;
        p = 0.246640727 + p * w;

        1.50140941 + p * w
    } else {
        w = w.sqrt() - 3.0;

        let mut p = -0.000200214257;
        p = 0.000100950558 + p * w;
        p = 0.00134934322 + p * w;
        p = -0.00367342844 + p * w;
        p = 0.00573950773 + p * w;
        p = -0.0076224613 + p * w;
        p = 0.00943887047 + p * w;
        p = 1.00167406 + p * w;

        2.83297682 + p * w
    };

    p * x
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    #[test]
    fn erf_known_values() {
        assert!(erf(0.0).eq(0.0));
        assert!(erf(0.5).almost_eq(0.520_499_877_813_046_5, 1e-14));
        assert!(erf(1.0).almost_eq(0.842_700_792_949_714_9, 1e-14));
        assert!(erf(-2.0).almost_eq(-0.995_322_265_018_952_7, 1e-14));
        assert!(erf(3.5).almost_eq(0.999_999_256_901_627_7, 1e-14));
        assert!((1.0 - erf(4.0)).almost_eq(1.541_725_790_028_002e-8, 1e-15));
    }

    #[test]
    fn erf_inv_inverts() {
        for p in [-0.99, -0.5, 0.01, 0.3, 0.75, 0.999_99] {
            let x = erf_inv(p);
            assert!(erf(x).almost_eq(p, 1e-12), "{p}: {x}");
        }

        assert!(erf_inv(1.0).is_infinite());
    }
}
