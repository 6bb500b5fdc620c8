//! Sampled Wavelengths

use super::{LAMBDA_MAX, LAMBDA_MIN, N_SPECTRUM_SAMPLES};
use crate::pbrt::*;
use std::fmt;

/// Stores the wavelengths at which a `SampledSpectrum` is sampled along with
/// the probability density for each of them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SampledWavelengths {
    /// Wavelengths in nm.
    lambda: [Float; N_SPECTRUM_SAMPLES],

    /// Probability density of each wavelength.
    pdf: [Float; N_SPECTRUM_SAMPLES],
}

impl SampledWavelengths {
    /// Sample wavelengths uniformly in [λmin, λmax] with stratified offsets
    /// from a single uniform sample.
    ///
    /// * `u`          - Uniform sample in [0, 1).
    /// * `lambda_min` - Shortest wavelength.
    /// * `lambda_max` - Longest wavelength.
    pub fn sample_uniform(u: Float, lambda_min: Float, lambda_max: Float) -> Self {
        let mut lambda = [0.0; N_SPECTRUM_SAMPLES];

        // Sample first wavelength using `u`.
        lambda[0] = lerp(u, lambda_min, lambda_max);

        // Initialize remaining wavelengths with equal spacing, wrapped into
        // the range.
        let delta = (lambda_max - lambda_min) / N_SPECTRUM_SAMPLES as Float;
        for i in 1..N_SPECTRUM_SAMPLES {
            lambda[i] = lambda[i - 1] + delta;
            if lambda[i] > lambda_max {
                lambda[i] = lambda_min + (lambda[i] - lambda_max);
            }
        }

        Self {
            lambda,
            pdf: [1.0 / (lambda_max - lambda_min); N_SPECTRUM_SAMPLES],
        }
    }

    /// Sample wavelengths uniformly over the visible range.
    ///
    /// * `u` - Uniform sample in [0, 1).
    pub fn sample_visible_uniform(u: Float) -> Self {
        Self::sample_uniform(u, LAMBDA_MIN, LAMBDA_MAX)
    }

    /// Use a fixed set of wavelengths with unit densities.
    ///
    /// * `lambda` - Wavelengths in nm.
    pub fn from_lambdas(lambda: [Float; N_SPECTRUM_SAMPLES]) -> Self {
        Self {
            lambda,
            pdf: [1.0; N_SPECTRUM_SAMPLES],
        }
    }

    /// Returns the wavelength of the i-th sample.
    ///
    /// * `i` - Sample index.
    pub fn lambda(&self, i: usize) -> Float {
        self.lambda[i]
    }

    /// Returns the probability density of the i-th sample.
    ///
    /// * `i` - Sample index.
    pub fn pdf(&self, i: usize) -> Float {
        self.pdf[i]
    }
}

impl fmt::Display for SampledWavelengths {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ SampledWavelengths lambda: {:?} pdf: {:?} ]",
            self.lambda, self.pdf
        )
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
    fn from_lambdas_has_unit_pdf() {
        let w = SampledWavelengths::from_lambdas([400.0, 500.0, 600.0, 700.0]);
        assert_eq!(w.lambda(2), 600.0);
        assert_eq!(w.pdf(3), 1.0);
    }

    proptest! {
        #[test]
        fn uniform_samples_stay_in_range(u in 0.0..1.0f32) {
            let w = SampledWavelengths::sample_visible_uniform(u);
            for i in 0..N_SPECTRUM_SAMPLES {
                prop_assert!(w.lambda(i) >= LAMBDA_MIN && w.lambda(i) <= LAMBDA_MAX + 1e-3);
                prop_assert!(approx_eq!(Float, w.pdf(i), 1.0 / (LAMBDA_MAX - LAMBDA_MIN), ulps = 2));
            }
        }
    }
}
