//! Clamp

use num_traits::Num;

/// Clamps a value x to [min, max].
///
/// See https://github.com/rust-lang/rust/issues/44095
///
/// * `x`   - The number to clamp.
/// * `min` - Minimum value.
/// * `max` - Maximum value.
#[inline(always)]
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamp_nan_passes_through() {
        assert!(clamp(f32::NAN, 0.0, 1.0).is_nan());
    }

    proptest! {
        #[test]
        fn clamp_stays_in_range(x in -100.0..100.0f32, lo in -10.0..0.0f32, hi in 0.0..10.0f32) {
            let c = clamp(x, lo, hi);
            prop_assert!(c >= lo && c <= hi);
        }

        #[test]
        fn clamp_usize(x in 0..100usize) {
            let c = clamp(x, 10, 20);
            prop_assert!((10..=20).contains(&c));
        }
    }
}
