//! Sampled Spectrum.

use super::N_SPECTRUM_SAMPLES;
use crate::pbrt::*;
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// SampledSpectrum holds the values of a spectral distribution at the
/// `N_SPECTRUM_SAMPLES` wavelengths of a `SampledWavelengths`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SampledSpectrum {
    /// The sampled spectral values.
    c: [Float; N_SPECTRUM_SAMPLES],
}

impl SampledSpectrum {
    /// Create a new `SampledSpectrum` with a constant value across all
    /// wavelengths.
    ///
    /// * `v` - Constant value.
    pub fn new(v: Float) -> Self {
        let ret = Self {
            c: [v; N_SPECTRUM_SAMPLES],
        };
        debug_assert!(!ret.has_nans());
        ret
    }

    /// Spectrum with all values set to 0.
    pub const ZERO: Self = Self {
        c: [0.0; N_SPECTRUM_SAMPLES],
    };

    /// Spectrum with all values set to 1.
    pub const ONE: Self = Self {
        c: [1.0; N_SPECTRUM_SAMPLES],
    };

    /// Returns the stored samples.
    pub fn samples(&self) -> &[Float] {
        &self.c
    }

    /// Returns true if any sample is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if the values are zero everywhere.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns the maximum sample value.
    pub fn max_component_value(&self) -> Float {
        self.c[1..].iter().fold(self.c[0], |m, v| max(m, *v))
    }

    /// Returns the average of the sample values.
    pub fn average(&self) -> Float {
        self.c.iter().sum::<Float>() / N_SPECTRUM_SAMPLES as Float
    }

    /// Returns `e^v` for every sample value `v`.
    pub fn exp(&self) -> Self {
        let ret = Self {
            c: self.c.map(|v| v.exp()),
        };
        debug_assert!(!ret.has_nans());
        ret
    }

    /// Returns the square root of every sample value.
    pub fn sqrt(&self) -> Self {
        Self {
            c: self.c.map(|v| v.sqrt()),
        }
    }

    /// Clamps the sample values to [0, ∞).
    pub fn clamp_zero(&self) -> Self {
        Self {
            c: self.c.map(|v| max(0.0, v)),
        }
    }

    /// Divides by another spectrum, yielding 0 where the divisor is 0.
    ///
    /// * `other` - The divisor.
    pub fn safe_div(&self, other: &Self) -> Self {
        let mut ret = *self;
        for (v, d) in ret.c.iter_mut().zip(other.c.iter()) {
            *v = if *d != 0.0 { *v / *d } else { 0.0 };
        }
        ret
    }
}

impl Default for SampledSpectrum {
    /// Return a black `SampledSpectrum`.
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Float> for SampledSpectrum {
    /// Create a new `SampledSpectrum` with a constant value across all
    /// wavelengths.
    ///
    /// * `v` - Constant value.
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

impl From<[Float; N_SPECTRUM_SAMPLES]> for SampledSpectrum {
    /// Create a new `SampledSpectrum` from sampled spectral values.
    ///
    /// * `c` - Sample values.
    fn from(c: [Float; N_SPECTRUM_SAMPLES]) -> Self {
        let ret = Self { c };
        debug_assert!(!ret.has_nans());
        ret
    }
}

impl Add for SampledSpectrum {
    type Output = Self;

    /// Adds the corresponding sample values from another `SampledSpectrum`.
    ///
    /// * `other` - The other `SampledSpectrum`.
    fn add(self, other: Self) -> Self::Output {
        let mut ret = self;
        ret += other;
        ret
    }
}

impl AddAssign for SampledSpectrum {
    /// Adds the corresponding sample values from another `SampledSpectrum`.
    ///
    /// * `other` - The other `SampledSpectrum`.
    fn add_assign(&mut self, other: Self) {
        for (v, o) in self.c.iter_mut().zip(other.c.iter()) {
            *v += o;
        }
    }
}

impl Sub for SampledSpectrum {
    type Output = Self;

    /// Subtracts the corresponding sample values from another `SampledSpectrum`.
    ///
    /// * `other` - The other `SampledSpectrum`.
    fn sub(self, other: Self) -> Self::Output {
        let mut ret = self;
        ret -= other;
        ret
    }
}

impl SubAssign for SampledSpectrum {
    /// Subtracts the corresponding sample values from another `SampledSpectrum`.
    ///
    /// * `other` - The other `SampledSpectrum`.
    fn sub_assign(&mut self, other: Self) {
        for (v, o) in self.c.iter_mut().zip(other.c.iter()) {
            *v -= o;
        }
    }
}

impl Mul for SampledSpectrum {
    type Output = Self;

    /// Multiplies the corresponding sample values from another `SampledSpectrum`.
    ///
    /// * `other` - The other `SampledSpectrum`.
    fn mul(self, other: Self) -> Self::Output {
        let mut ret = self;
        ret *= other;
        ret
    }
}

impl MulAssign for SampledSpectrum {
    /// Multiplies the corresponding sample values from another `SampledSpectrum`.
    ///
    /// * `other` - The other `SampledSpectrum`.
    fn mul_assign(&mut self, other: Self) {
        for (v, o) in self.c.iter_mut().zip(other.c.iter()) {
            *v *= o;
        }
    }
}

impl Mul<Float> for SampledSpectrum {
    type Output = Self;

    /// Scales the sample values with a constant factor.
    ///
    /// * `f` - Scaling factor.
    fn mul(self, f: Float) -> Self::Output {
        let mut ret = self;
        ret *= f;
        ret
    }
}

impl Mul<SampledSpectrum> for Float {
    type Output = SampledSpectrum;

    /// Scales the sample values of a `SampledSpectrum`.
    ///
    /// * `s` - Sample values.
    fn mul(self, s: SampledSpectrum) -> Self::Output {
        s * self
    }
}

impl MulAssign<Float> for SampledSpectrum {
    /// Scales the sample values with a constant factor.
    ///
    /// * `f` - Scaling factor.
    fn mul_assign(&mut self, f: Float) {
        for v in self.c.iter_mut() {
            *v *= f;
        }
        debug_assert!(!self.has_nans());
    }
}

impl Div for SampledSpectrum {
    type Output = Self;

    /// Divides the corresponding sample values from another
    /// `SampledSpectrum`.
    ///
    /// * `other` - The other `SampledSpectrum`.
    fn div(self, other: Self) -> Self::Output {
        let mut ret = self;
        ret /= other;
        ret
    }
}

impl DivAssign for SampledSpectrum {
    /// Divides the corresponding sample values from another `SampledSpectrum`.
    ///
    /// * `other` - The other `SampledSpectrum`.
    fn div_assign(&mut self, other: Self) {
        for (v, o) in self.c.iter_mut().zip(other.c.iter()) {
            debug_assert!(*o != 0.0);
            *v /= o;
        }
    }
}

impl Div<Float> for SampledSpectrum {
    type Output = Self;

    /// Divides the sample values with given factor.
    ///
    /// * `f` - Scaling value.
    fn div(self, f: Float) -> Self::Output {
        let mut ret = self;
        ret /= f;
        ret
    }
}

impl DivAssign<Float> for SampledSpectrum {
    /// Divides the sample values with given factor.
    ///
    /// * `f` - Scaling value.
    fn div_assign(&mut self, f: Float) {
        debug_assert!(f != 0.0);
        for v in self.c.iter_mut() {
            *v /= f;
        }
    }
}

impl Neg for SampledSpectrum {
    type Output = Self;

    /// Scale the values by -1.
    fn neg(self) -> Self::Output {
        Self {
            c: self.c.map(|v| -v),
        }
    }
}

impl Index<usize> for SampledSpectrum {
    type Output = Float;

    /// Index the sample value.
    ///
    /// * `i` -  The index.
    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl IndexMut<usize> for SampledSpectrum {
    /// Index the sample to get a mutable sample value.
    ///
    /// * `i` - The index.
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.c[i]
    }
}

impl fmt::Display for SampledSpectrum {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (i, v) in self.c.iter().enumerate() {
            write!(f, "{}", v)?;
            if i < N_SPECTRUM_SAMPLES - 1 {
                write!(f, ", ")?;
            }
        }
        write!(f, " ]")
    }
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
    fn constants() {
        assert!(SampledSpectrum::ZERO.is_black());
        assert!(!SampledSpectrum::ONE.is_black());
        assert_eq!(SampledSpectrum::default(), SampledSpectrum::ZERO);
        assert_eq!(SampledSpectrum::from(1.0), SampledSpectrum::ONE);
    }

    #[test]
    fn reductions() {
        let s = SampledSpectrum::from([1.0, 4.0, 2.0, 3.0]);
        assert_eq!(s.max_component_value(), 4.0);
        assert!(approx_eq!(Float, s.average(), 2.5, ulps = 2));
        assert_eq!(s[1], 4.0);
    }

    #[test]
    fn exp_of_zero_is_one() {
        assert_eq!(SampledSpectrum::ZERO.exp(), SampledSpectrum::ONE);
    }

    #[test]
    fn safe_div_skips_zero() {
        let a = SampledSpectrum::from([1.0, 2.0, 3.0, 4.0]);
        let b = SampledSpectrum::from([2.0, 0.0, 1.0, 0.0]);
        assert_eq!(a.safe_div(&b), SampledSpectrum::from([0.5, 0.0, 3.0, 0.0]));
    }

    #[test]
    fn has_nans() {
        let mut s = SampledSpectrum::ONE;
        assert!(!s.has_nans());
        s[2] = Float::NAN;
        assert!(s.has_nans());
    }

    #[test]
    fn display() {
        let s = SampledSpectrum::from([1.0, 2.0, 3.0, 4.5]);
        assert_eq!(format!("{}", s), "[ 1, 2, 3, 4.5 ]");
    }

    proptest! {
        #[test]
        fn arithmetic(a in 0.1..10.0f32, b in 0.1..10.0f32) {
            let sa = SampledSpectrum::new(a);
            let sb = SampledSpectrum::new(b);
            prop_assert_eq!((sa + sb)[0], a + b);
            prop_assert_eq!((sa - sb)[1], a - b);
            prop_assert_eq!((sa * sb)[2], a * b);
            prop_assert_eq!((sa / sb)[3], a / b);
            prop_assert_eq!((b * sa)[0], a * b);
            prop_assert_eq!((sa / b)[0], a / b);
            prop_assert_eq!((-sa)[0], -a);
        }
    }
}
