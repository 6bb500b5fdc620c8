//! BSDF Sample

use super::BxDFFlags;
use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::fmt;

/// Stores the result of sampling a BxDF.
#[derive(Copy, Clone, Debug)]
pub struct BSDFSample {
    /// The BxDF value for the sampled pair of directions.
    pub f: SampledSpectrum,

    /// The sampled incident direction.
    pub wi: Vector3f,

    /// The value of the PDF for the sampled direction.
    pub pdf: Float,

    /// The lobe that was sampled.
    pub flags: BxDFFlags,

    /// Relative index of refraction along the sampled path. 1 unless the
    /// direction was refracted.
    pub eta: Float,

    /// Set when `pdf` is only proportional to the true density.
    pub pdf_is_proportional: bool,
}

impl BSDFSample {
    /// Create a new `BSDFSample` for a non-refracted direction.
    ///
    /// * `f`     - The BxDF value.
    /// * `wi`    - The sampled incident direction.
    /// * `pdf`   - The value of the PDF.
    /// * `flags` - The lobe that was sampled.
    pub fn new(f: SampledSpectrum, wi: Vector3f, pdf: Float, flags: BxDFFlags) -> Self {
        Self {
            f,
            wi,
            pdf,
            flags,
            eta: 1.0,
            pdf_is_proportional: false,
        }
    }

    /// Returns the sample with the relative index of refraction set.
    ///
    /// * `eta` - Relative index of refraction.
    pub fn with_eta(self, eta: Float) -> Self {
        Self { eta, ..self }
    }

    /// Returns `true` if a reflection lobe was sampled.
    pub fn is_reflection(&self) -> bool {
        self.flags.is_reflective()
    }

    /// Returns `true` if a transmission lobe was sampled.
    pub fn is_transmission(&self) -> bool {
        self.flags.is_transmissive()
    }

    /// Returns `true` if a specular lobe was sampled.
    pub fn is_specular(&self) -> bool {
        self.flags.is_specular()
    }
}

impl fmt::Display for BSDFSample {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ BSDFSample f: {} wi: {} pdf: {} flags: {} eta: {} pdf_is_proportional: {} ]",
            self.f, self.wi, self.pdf, self.flags, self.eta, self.pdf_is_proportional
        )
    }
}
