//! Reflection and surface scattering models

use crate::geometry::*;
use crate::microfacet::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;
use crate::stat_rare;
use std::fmt;
use std::sync::Arc;

mod bxdf_flags;
mod bxdf_sample;
mod common;
mod dielectric;
mod diffuse;
mod diffuse_transmission;
mod fresnel;
mod hair;
mod measured;
mod measured_cache;
mod measured_data;
#[cfg(test)]
mod measured_fixture;
mod tabulated_hair;
mod transport_mode;

// Re-export
pub use bxdf_flags::*;
pub use bxdf_sample::*;
pub use common::*;
pub use dielectric::*;
pub use diffuse::*;
pub use diffuse_transmission::*;
pub use fresnel::*;
pub use hair::*;
pub use measured::*;
pub use measured_cache::*;
pub use measured_data::*;
pub use tabulated_hair::*;
pub use transport_mode::*;

/// BxDF for BRDFs and BTDFs.
///
/// NOTES:
///
/// The scattering models are enumerated directly instead of going through
/// trait objects so calls on the hot path are a `match` away from the
/// concrete implementation.
#[derive(Clone, Debug)]
pub enum BxDF {
    Diffuse(DiffuseBxDF),
    DiffuseTransmission(DiffuseTransmissionBxDF),
    Dielectric(DielectricBxDF),
    Hair(HairBxDF),
    TabulatedHair(TabulatedHairBxDF),
    Measured(MeasuredBxDF),
}

impl BxDF {
    /// Returns the BxDF flags.
    pub fn flags(&self) -> BxDFFlags {
        match self {
            BxDF::Diffuse(bxdf) => bxdf.flags(),
            BxDF::DiffuseTransmission(bxdf) => bxdf.flags(),
            BxDF::Dielectric(bxdf) => bxdf.flags(),
            BxDF::Hair(bxdf) => bxdf.flags(),
            BxDF::TabulatedHair(bxdf) => bxdf.flags(),
            BxDF::Measured(bxdf) => bxdf.flags(),
        }
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo`   - Outgoing direction.
    /// * `wi`   - Incident direction.
    /// * `mode` - Transport mode.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> SampledSpectrum {
        match self {
            BxDF::Diffuse(bxdf) => bxdf.f(wo, wi, mode),
            BxDF::DiffuseTransmission(bxdf) => bxdf.f(wo, wi, mode),
            BxDF::Dielectric(bxdf) => bxdf.f(wo, wi, mode),
            BxDF::Hair(bxdf) => bxdf.f(wo, wi, mode),
            BxDF::TabulatedHair(bxdf) => bxdf.f(wo, wi, mode),
            BxDF::Measured(bxdf) => bxdf.f(wo, wi, mode),
        }
    }

    /// Samples an incident direction for the given outgoing direction. No
    /// sample is returned for an outgoing direction in the tangent plane.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `uc`           - Uniform sample used to choose a lobe.
    /// * `u`            - The 2D uniform random values.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        if wo.z == 0.0 {
            return None;
        }
        match self {
            BxDF::Diffuse(bxdf) => bxdf.sample_f(wo, uc, u, mode, sample_flags),
            BxDF::DiffuseTransmission(bxdf) => bxdf.sample_f(wo, uc, u, mode, sample_flags),
            BxDF::Dielectric(bxdf) => bxdf.sample_f(wo, uc, u, mode, sample_flags),
            BxDF::Hair(bxdf) => bxdf.sample_f(wo, uc, u, mode, sample_flags),
            BxDF::TabulatedHair(bxdf) => bxdf.sample_f(wo, uc, u, mode, sample_flags),
            BxDF::Measured(bxdf) => bxdf.sample_f(wo, uc, u, mode, sample_flags),
        }
    }

    /// Evaluates the PDF for the sampling method.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `wi`           - Incident direction.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    pub fn pdf(
        &self,
        wo: &Vector3f,
        wi: &Vector3f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Float {
        match self {
            BxDF::Diffuse(bxdf) => bxdf.pdf(wo, wi, mode, sample_flags),
            BxDF::DiffuseTransmission(bxdf) => bxdf.pdf(wo, wi, mode, sample_flags),
            BxDF::Dielectric(bxdf) => bxdf.pdf(wo, wi, mode, sample_flags),
            BxDF::Hair(bxdf) => bxdf.pdf(wo, wi, mode, sample_flags),
            BxDF::TabulatedHair(bxdf) => bxdf.pdf(wo, wi, mode, sample_flags),
            BxDF::Measured(bxdf) => bxdf.pdf(wo, wi, mode, sample_flags),
        }
    }

    /// Computes the hemispherical-directional reflectance function ρ.
    ///
    /// * `wo` - Outgoing direction.
    /// * `uc` - Samples used to choose lobes.
    /// * `u2` - Samples used to choose directions.
    pub fn rho_hd(&self, wo: &Vector3f, uc: &[Float], u2: &[Point2f]) -> SampledSpectrum {
        assert!(uc.len() == u2.len());
        if wo.z == 0.0 {
            return SampledSpectrum::ZERO;
        }

        let mut r = SampledSpectrum::ZERO;
        for (c, u) in uc.iter().zip(u2.iter()) {
            // Estimate one term of `rho_hd`.
            if let Some(bs) = self.sample_f(wo, *c, u, TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                if bs.pdf > 0.0 {
                    r += bs.f * abs_cos_theta(&bs.wi) / bs.pdf;
                }
            }
        }
        r / uc.len() as Float
    }

    /// Computes the hemispherical-hemispherical reflectance function ρ.
    ///
    /// * `u1` - Samples used to choose outgoing directions.
    /// * `uc` - Samples used to choose lobes.
    /// * `u2` - Samples used to choose incident directions.
    pub fn rho_hh(&self, u1: &[Point2f], uc: &[Float], u2: &[Point2f]) -> SampledSpectrum {
        assert!(u1.len() == uc.len() && uc.len() == u2.len());

        let mut r = SampledSpectrum::ZERO;
        for ((s1, c), s2) in u1.iter().zip(uc.iter()).zip(u2.iter()) {
            // Estimate one term of `rho_hh`.
            let wo = uniform_sample_hemisphere(s1);
            if wo.z == 0.0 {
                continue;
            }
            let pdfo = uniform_hemisphere_pdf();
            if let Some(bs) = self.sample_f(&wo, *c, s2, TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                if bs.pdf > 0.0 {
                    r += bs.f * abs_cos_theta(&bs.wi) * abs_cos_theta(&wo) / (pdfo * bs.pdf);
                }
            }
        }
        r / (PI * u1.len() as Float)
    }
}

impl From<DiffuseBxDF> for BxDF {
    fn from(bxdf: DiffuseBxDF) -> Self {
        BxDF::Diffuse(bxdf)
    }
}

impl From<DiffuseTransmissionBxDF> for BxDF {
    fn from(bxdf: DiffuseTransmissionBxDF) -> Self {
        BxDF::DiffuseTransmission(bxdf)
    }
}

impl From<DielectricBxDF> for BxDF {
    fn from(bxdf: DielectricBxDF) -> Self {
        BxDF::Dielectric(bxdf)
    }
}

impl From<HairBxDF> for BxDF {
    fn from(bxdf: HairBxDF) -> Self {
        BxDF::Hair(bxdf)
    }
}

impl From<TabulatedHairBxDF> for BxDF {
    fn from(bxdf: TabulatedHairBxDF) -> Self {
        BxDF::TabulatedHair(bxdf)
    }
}

impl From<MeasuredBxDF> for BxDF {
    fn from(bxdf: MeasuredBxDF) -> Self {
        BxDF::Measured(bxdf)
    }
}

impl fmt::Display for BxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BxDF::Diffuse(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
            BxDF::DiffuseTransmission(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
            BxDF::Dielectric(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
            BxDF::Hair(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
            BxDF::TabulatedHair(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
            BxDF::Measured(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
