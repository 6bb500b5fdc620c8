//! Diffuse Reflection

use super::*;

/// BRDF for the Lambertian model that scatters incident illumination equally
/// in all directions of the same hemisphere.
#[derive(Copy, Clone, Debug)]
pub struct DiffuseBxDF {
    /// Reflectance spectrum which gives the fraction of incident light that
    /// is scattered.
    r: SampledSpectrum,
}

impl DiffuseBxDF {
    /// Create a new instance of `DiffuseBxDF`.
    ///
    /// * `r` - Reflectance spectrum.
    pub fn new(r: SampledSpectrum) -> Self {
        Self { r }
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo`   - Outgoing direction.
    /// * `wi`   - Incident direction.
    /// * `mode` - Transport mode.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode) -> SampledSpectrum {
        if !same_hemisphere(wo, wi) {
            return SampledSpectrum::ZERO;
        }
        self.r * INV_PI
    }

    /// Samples an incident direction with a cosine-weighted distribution on
    /// the side of `wo`.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `uc`           - Uniform sample used to choose a lobe (unused).
    /// * `u`            - The 2D uniform random values.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        _uc: Float,
        u: &Point2f,
        _mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            return None;
        }

        // Cosine-sample the hemisphere, flipping the direction if necessary.
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z *= -1.0;
        }
        let pdf = cosine_hemisphere_pdf(abs_cos_theta(&wi));
        Some(BSDFSample::new(
            self.r * INV_PI,
            wi,
            pdf,
            BxDFFlags::DIFFUSE_REFLECTION,
        ))
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
        _mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Float {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) || !same_hemisphere(wo, wi) {
            return 0.0;
        }
        cosine_hemisphere_pdf(abs_cos_theta(wi))
    }

    /// Returns the BxDF flags.
    pub fn flags(&self) -> BxDFFlags {
        if self.r.is_black() {
            BxDFFlags::UNSET
        } else {
            BxDFFlags::DIFFUSE_REFLECTION
        }
    }
}

impl fmt::Display for DiffuseBxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ DiffuseBxDF R: {} ]", self.r)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
