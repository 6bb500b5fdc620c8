//! Common

use super::clamp::*;
use num_traits::Num;
use std::ops::{Add, Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 4*PI (4π)
pub const INV_FOUR_PI: Float = 1.0 / (PI * 4.0);

/// sqrt(PI/8)
pub const SQRT_PI_OVER_8: Float = 0.626657069;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Returns the square of a number.
///
/// * `v` - The number.
#[inline(always)]
pub fn sqr<T: Mul<T, Output = T> + Copy>(v: T) -> T {
    v * v
}

/// Evaluate a polynomial `c[0] + c[1] t + c[2] t^2 + ...` using Horner's rule.
///
/// * `t` - The variable.
/// * `c` - Coefficients, lowest degree first.
#[inline]
pub fn evaluate_polynomial(t: Float, c: &[Float]) -> Float {
    c.iter().rev().fold(0.0, |acc, &ci| acc * t + ci)
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t` - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Square root that clamps slightly negative arguments (from round-off) to 0.
///
/// * `x` - The value.
#[inline(always)]
pub fn safe_sqrt(x: Float) -> Float {
    debug_assert!(x >= -1e-3, "safe_sqrt({x})");
    max(0.0, x).sqrt()
}

/// Inverse sine that clamps its argument to [-1, 1].
///
/// * `x` - The value.
#[inline(always)]
pub fn safe_asin(x: Float) -> Float {
    debug_assert!((-1.0001..=1.0001).contains(&x), "safe_asin({x})");
    clamp(x, -1.0, 1.0).asin()
}

/// Inverse cosine that clamps its argument to [-1, 1].
///
/// * `x` - The value.
#[inline(always)]
pub fn safe_acos(x: Float) -> Float {
    debug_assert!((-1.0001..=1.0001).contains(&x), "safe_acos({x})");
    clamp(x, -1.0, 1.0).acos()
}

/// Convert degrees to radians.
///
/// * `deg` - Angle in degrees.
#[inline(always)]
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

/// Convert radians to degrees.
///
/// * `rad` - Angle in radians.
#[inline(always)]
pub fn degrees(rad: Float) -> Float {
    (180.0 / PI) * rad
}

/// Returns the next lower representable floating point value.
///
/// * `v` - Floating point value.
pub fn next_float_down(v: Float) -> Float {
    // Handle infinity and positive zero for next_float_down
    if v.is_infinite() && v < 0.0 {
        return v;
    }

    // Advance v to next lower float
    let nv = if v == 0.0 { -0.0 } else { v };
    let mut ui = nv.to_bits();
    if nv > 0.0 {
        ui -= 1;
    } else {
        ui += 1;
    }

    Float::from_bits(ui)
}

/// Emulates the behavior of `upper_bound` but uses a function object to get
/// values at various indices instead of requiring access to an actual array.
/// It is used to bisect arrays that are procedurally generated such as those
/// interpolated from point samples.
///
/// Returns the index `i` in [0, size - 2] such that `pred(i)` is true and
/// `pred(i + 1)` is false.
///
/// * `size` - Size of array (at least 2).
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    debug_assert!(size >= 2);

    let (mut first, mut len) = (0, size);
    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first.saturating_sub(1), 0, size - 2)
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
    fn find_interval_clamps_to_ends() {
        let a = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_interval(a.len(), |i| a[i] <= -5.0), 0);
        assert_eq!(find_interval(a.len(), |i| a[i] <= 10.0), 2);
        assert_eq!(find_interval(a.len(), |i| a[i] <= 1.5), 1);
        assert_eq!(find_interval(a.len(), |i| a[i] <= 0.0), 0);
    }

    #[test]
    fn safe_functions_clamp_round_off() {
        assert_eq!(safe_sqrt(-1e-7), 0.0);
        assert!(approx_eq!(Float, safe_asin(1.0000001), PI_OVER_TWO, ulps = 2));
        assert!(approx_eq!(Float, safe_acos(-1.0000001), PI, ulps = 2));
    }

    #[test]
    fn evaluate_polynomial_horner() {
        assert_eq!(evaluate_polynomial(2.0, &[]), 0.0);
        assert_eq!(evaluate_polynomial(2.0, &[3.0]), 3.0);
        assert_eq!(evaluate_polynomial(2.0, &[1.0, -2.0, 0.5]), -1.0);
    }

    #[test]
    fn next_float_down_is_smaller() {
        assert!(next_float_down(1.0) < 1.0);
        assert!(next_float_down(0.0) < 0.0);
        assert_eq!(next_float_down(-Float::INFINITY), -Float::INFINITY);
    }

    proptest! {
        #[test]
        fn find_interval_brackets_value(x in 0.0..9.0f32) {
            let a: Vec<Float> = (0..10).map(|i| i as Float).collect();
            let i = find_interval(a.len(), |j| a[j] <= x);
            prop_assert!(a[i] <= x && x <= a[i + 1]);
        }

        #[test]
        fn radians_degrees_roundtrip(d in -360.0..360.0f32) {
            prop_assert!(approx_eq!(Float, degrees(radians(d)), d, epsilon = 0.001));
        }

        #[test]
        fn lerp_end_points(a in -100.0..100.0f32, b in -100.0..100.0f32) {
            prop_assert_eq!(lerp(0.0, a, b), a);
            prop_assert!(approx_eq!(Float, lerp(1.0, a, b), b, epsilon = 0.0001));
        }
    }
}
