//! Diffuse Transmission

use super::*;

/// BSDF for a Lambertian surface that scatters light equally into both
/// hemispheres; `r` controls reflection and `t` transmission.
#[derive(Copy, Clone, Debug)]
pub struct DiffuseTransmissionBxDF {
    /// Reflectance spectrum.
    r: SampledSpectrum,

    /// Transmittance spectrum.
    t: SampledSpectrum,
}

impl DiffuseTransmissionBxDF {
    /// Create a new instance of `DiffuseTransmissionBxDF`.
    ///
    /// * `r` - Reflectance spectrum.
    /// * `t` - Transmittance spectrum.
    pub fn new(r: SampledSpectrum, t: SampledSpectrum) -> Self {
        Self { r, t }
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo`   - Outgoing direction.
    /// * `wi`   - Incident direction.
    /// * `mode` - Transport mode.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode) -> SampledSpectrum {
        if same_hemisphere(wo, wi) {
            self.r * INV_PI
        } else {
            self.t * INV_PI
        }
    }

    /// Returns the probabilities of choosing the reflection and transmission
    /// lobes restricted by the sample flags.
    ///
    /// * `sample_flags` - Lobes that may be sampled.
    fn lobe_probabilities(&self, sample_flags: BxDFReflTransFlags) -> (Float, Float) {
        let pr = if sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            self.r.max_component_value()
        } else {
            0.0
        };
        let pt = if sample_flags.contains(BxDFReflTransFlags::TRANSMISSION) {
            self.t.max_component_value()
        } else {
            0.0
        };
        (pr, pt)
    }

    /// Samples the reflection or transmission lobe and a cosine-weighted
    /// direction in the corresponding hemisphere.
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
        let (pr, pt) = self.lobe_probabilities(sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return None;
        }

        let mut wi = cosine_sample_hemisphere(u);
        if uc < pr / (pr + pt) {
            if wo.z < 0.0 {
                wi.z *= -1.0;
            }
            let pdf = cosine_hemisphere_pdf(abs_cos_theta(&wi)) * pr / (pr + pt);
            Some(BSDFSample::new(
                self.f(wo, &wi, mode),
                wi,
                pdf,
                BxDFFlags::DIFFUSE_REFLECTION,
            ))
        } else {
            if wo.z > 0.0 {
                wi.z *= -1.0;
            }
            let pdf = cosine_hemisphere_pdf(abs_cos_theta(&wi)) * pt / (pr + pt);
            Some(BSDFSample::new(
                self.f(wo, &wi, mode),
                wi,
                pdf,
                BxDFFlags::DIFFUSE_TRANSMISSION,
            ))
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
        _mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Float {
        let (pr, pt) = self.lobe_probabilities(sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return 0.0;
        }

        let lobe = if same_hemisphere(wo, wi) { pr } else { pt };
        lobe / (pr + pt) * cosine_hemisphere_pdf(abs_cos_theta(wi))
    }

    /// Returns the BxDF flags.
    pub fn flags(&self) -> BxDFFlags {
        let mut flags = BxDFFlags::UNSET;
        if !self.r.is_black() {
            flags |= BxDFFlags::DIFFUSE_REFLECTION;
        }
        if !self.t.is_black() {
            flags |= BxDFFlags::DIFFUSE_TRANSMISSION;
        }
        flags
    }
}

impl fmt::Display for DiffuseTransmissionBxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ DiffuseTransmissionBxDF R: {} T: {} ]", self.r, self.t)
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
    fn flags_follow_spectra() {
        let zero = SampledSpectrum::ZERO;
        let half = SampledSpectrum::new(0.5);
        assert_eq!(
            DiffuseTransmissionBxDF::new(half, zero).flags(),
            BxDFFlags::DIFFUSE_REFLECTION
        );
        assert_eq!(
            DiffuseTransmissionBxDF::new(zero, half).flags(),
            BxDFFlags::DIFFUSE_TRANSMISSION
        );
        assert_eq!(
            DiffuseTransmissionBxDF::new(half, half).flags(),
            BxDFFlags::DIFFUSE_REFLECTION | BxDFFlags::DIFFUSE_TRANSMISSION
        );
        assert_eq!(DiffuseTransmissionBxDF::new(zero, zero).flags(), BxDFFlags::UNSET);
    }

    #[test]
    fn filter_restricts_lobes() {
        let bxdf = DiffuseTransmissionBxDF::new(SampledSpectrum::new(0.3), SampledSpectrum::new(0.6));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let u = Point2f::new(0.2, 0.4);
        let mode = TransportMode::Radiance;

        // Reflection only: always the upper hemisphere regardless of `uc`.
        let s = bxdf
            .sample_f(&wo, 0.99, &u, mode, BxDFReflTransFlags::REFLECTION)
            .unwrap();
        assert!(s.is_reflection());
        assert!(s.wi.z > 0.0);

        // Transmission only.
        let s = bxdf
            .sample_f(&wo, 0.01, &u, mode, BxDFReflTransFlags::TRANSMISSION)
            .unwrap();
        assert!(s.is_transmission());
        assert!(s.wi.z < 0.0);

        assert!(bxdf.sample_f(&wo, 0.5, &u, mode, BxDFReflTransFlags::UNSET).is_none());
    }

    proptest! {
        #[test]
        fn sample_matches_pdf(
            theta in 0.01..3.13f32,
            phi in 0.0..6.28f32,
            uc in 0.0..1.0f32,
            u0 in 0.0..1.0f32,
            u1 in 0.0..1.0f32,
        ) {
            let bxdf = DiffuseTransmissionBxDF::new(
                SampledSpectrum::from([0.2, 0.3, 0.4, 0.5]),
                SampledSpectrum::new(0.25),
            );
            let wo = spherical_direction(theta.sin(), theta.cos(), phi);
            let mode = TransportMode::Radiance;
            let flags = BxDFReflTransFlags::ALL;

            let s = bxdf.sample_f(&wo, uc, &Point2f::new(u0, u1), mode, flags).unwrap();
            prop_assume!(s.wi.z != 0.0 && wo.z != 0.0);

            let pdf = bxdf.pdf(&wo, &s.wi, mode, flags);
            prop_assert!(approx_eq!(Float, pdf, s.pdf, epsilon = 1e-5));

            let f = bxdf.f(&wo, &s.wi, mode);
            prop_assert_eq!(f, s.f);
        }
    }
}
