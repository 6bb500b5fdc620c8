//! Logistic distribution

use crate::pbrt::*;

/// Logistic function with scale `s`, normalized over the real line.
///
/// * `x` - Value.
/// * `s` - Scale factor.
#[inline]
pub fn logistic(x: Float, s: Float) -> Float {
    let x = abs(x);
    let e = (-x / s).exp();
    e / (s * sqr(1.0 + e))
}

/// Cumulative distribution function of the logistic function.
///
/// * `x` - Value.
/// * `s` - Scale factor.
#[inline]
pub fn logistic_cdf(x: Float, s: Float) -> Float {
    1.0 / (1.0 + (-x / s).exp())
}

/// Logistic function renormalized over the interval [a, b].
///
/// * `x` - Value.
/// * `s` - Scale factor.
/// * `a` - Start of interval.
/// * `b` - End of interval.
#[inline]
pub fn trimmed_logistic(x: Float, s: Float, a: Float, b: Float) -> Float {
    debug_assert!(a < b);
    logistic(x, s) / (logistic_cdf(b, s) - logistic_cdf(a, s))
}

/// Sample the trimmed logistic function over [a, b] by inverting its CDF.
///
/// * `u` - Uniform sample in [0, 1).
/// * `s` - Scale factor.
/// * `a` - Start of interval.
/// * `b` - End of interval.
pub fn sample_trimmed_logistic(u: Float, s: Float, a: Float, b: Float) -> Float {
    debug_assert!(a < b);
    let k = logistic_cdf(b, s) - logistic_cdf(a, s);
    let x = -s * (1.0 / (u * k + logistic_cdf(a, s)) - 1.0).ln();
    debug_assert!(!x.is_nan());
    clamp(x, a, b)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn trimmed_logistic_integrates_to_one() {
        let s = 0.5;
        let n = 20_000;
        let dx = TWO_PI / n as Float;
        let sum: Float = (0..n)
            .map(|i| trimmed_logistic(-PI + (i as Float + 0.5) * dx, s, -PI, PI) * dx)
            .sum();
        assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-3), "sum = {}", sum);
    }

    #[test]
    fn logistic_is_symmetric() {
        assert_eq!(logistic(0.3, 0.7), logistic(-0.3, 0.7));
        assert!(approx_eq!(Float, logistic_cdf(0.0, 0.7), 0.5, ulps = 2));
    }

    proptest! {
        #[test]
        fn sample_trimmed_logistic_inverts_cdf(u in 0.01..0.99f32, s in 0.1..2.0f32) {
            let x = sample_trimmed_logistic(u, s, -PI, PI);
            prop_assert!((-PI..=PI).contains(&x));

            let k = logistic_cdf(PI, s) - logistic_cdf(-PI, s);
            let cdf = (logistic_cdf(x, s) - logistic_cdf(-PI, s)) / k;
            prop_assert!(approx_eq!(Float, cdf, u, epsilon = 1e-3));
        }
    }
}
