//! Spectrum

use crate::pbrt::Float;

mod rgb;
mod sampled_spectrum;
mod sampled_wavelengths;

// Re-export
pub use rgb::*;
pub use sampled_spectrum::*;
pub use sampled_wavelengths::*;

/// Number of wavelength samples carried by `SampledSpectrum` and
/// `SampledWavelengths`.
pub const N_SPECTRUM_SAMPLES: usize = 4;

/// Shortest wavelength of the visible range in nm.
pub const LAMBDA_MIN: Float = 360.0;

/// Longest wavelength of the visible range in nm.
pub const LAMBDA_MAX: Float = 830.0;
