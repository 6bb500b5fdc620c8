//! Measured BxDF

use super::*;

/// BRDF that evaluates and samples tabulated measurements of a real
/// material's reflectance.
#[derive(Clone, Debug)]
pub struct MeasuredBxDF {
    /// The measured data.
    brdf: Arc<MeasuredBxDFData>,

    /// Wavelengths at which to evaluate the spectral reflectance.
    lambda: SampledWavelengths,
}

impl MeasuredBxDF {
    /// Create a new instance of `MeasuredBxDF`.
    ///
    /// * `brdf`   - The measured data.
    /// * `lambda` - Wavelengths at which to evaluate the spectral reflectance.
    pub fn new(brdf: Arc<MeasuredBxDFData>, lambda: SampledWavelengths) -> Self {
        Self { brdf, lambda }
    }

    /// Returns the BxDF flags.
    pub fn flags(&self) -> BxDFFlags {
        BxDFFlags::GLOSSY_REFLECTION
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
        let (wo, wi) = if wo.z < 0.0 { (-*wo, -*wi) } else { (*wo, *wi) };

        let wm = match half_vector(&wo, &wi) {
            Some(wm) => wm,
            None => return SampledSpectrum::ZERO,
        };

        let theta_o = spherical_theta(&wo);
        let phi_o = wo.y.atan2(wo.x);
        let u_wo = Point2f::new(theta2u(theta_o), phi2u(phi_o));
        let u_wm = self.half_vector_to_unit(&wm, phi_o);

        let (ui, _) = self.brdf.vndf.invert(&u_wm, &[phi_o, theta_o]);
        let fr = self.spectral_reflectance(&ui, phi_o, theta_o);

        fr * self.brdf.ndf.evaluate(&u_wm, &[])
            / (4.0 * self.brdf.sigma.evaluate(&u_wo, &[]) * cos_theta(&wi))
    }

    /// Samples the luminance and visible normal distributions and reflects
    /// `wo` about the sampled microfacet normal.
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

        let flip_wi = wo.z <= 0.0;
        let wo = if flip_wi { -*wo } else { *wo };

        let theta_o = spherical_theta(&wo);
        let phi_o = wo.y.atan2(wo.x);
        let param = [phi_o, theta_o];

        // Warp the sample with the luminance then the visible normals.
        let (u, lum_pdf) = self.brdf.luminance.sample(u, &param);
        let (u_wm, pdf) = self.brdf.vndf.sample(&u, &param);

        let mut phi_m = u2phi(u_wm.y);
        if self.brdf.isotropic {
            phi_m += phi_o;
        }
        let theta_m = u2theta(u_wm.x);
        let sin_theta_m = theta_m.sin();
        let wm = spherical_direction(sin_theta_m, theta_m.cos(), phi_m);
        let wi = reflect(&wo, &wm);
        if wi.z <= 0.0 {
            return None;
        }

        let u_wo = Point2f::new(theta2u(theta_o), phi2u(phi_o));
        let fr = self.spectral_reflectance(&u, phi_o, theta_o)
            * self.brdf.ndf.evaluate(&u_wm, &[])
            / (4.0 * self.brdf.sigma.evaluate(&u_wo, &[]) * abs_cos_theta(&wi));
        let pdf = pdf / jacobian(&wo, &wm, u_wm.x, sin_theta_m);

        let wi = if flip_wi { -wi } else { wi };
        Some(BSDFSample::new(
            fr,
            wi,
            pdf * lum_pdf,
            BxDFFlags::GLOSSY_REFLECTION,
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
        let (wo, wi) = if wo.z < 0.0 { (-*wo, -*wi) } else { (*wo, *wi) };

        let wm = match half_vector(&wo, &wi) {
            Some(wm) => wm,
            None => return 0.0,
        };

        let theta_o = spherical_theta(&wo);
        let phi_o = wo.y.atan2(wo.x);
        let param = [phi_o, theta_o];
        let u_wm = self.half_vector_to_unit(&wm, phi_o);

        let (sample, vndf_pdf) = self.brdf.vndf.invert(&u_wm, &param);
        let lum_pdf = self.brdf.luminance.evaluate(&sample, &param);
        let sin_theta_m = (sqr(wm.x) + sqr(wm.y)).sqrt();
        vndf_pdf * lum_pdf / jacobian(&wo, &wm, u_wm.x, sin_theta_m)
    }

    /// Map a microfacet normal to the unit square. The azimuth is relative to
    /// `phi_o` for isotropic data and wraps around into `[0, 1)`.
    ///
    /// * `wm`    - Microfacet normal.
    /// * `phi_o` - Azimuth of the outgoing direction.
    fn half_vector_to_unit(&self, wm: &Vector3f, phi_o: Float) -> Point2f {
        let theta_m = spherical_theta(wm);
        let phi_m = wm.y.atan2(wm.x);
        let u = phi2u(if self.brdf.isotropic {
            phi_m - phi_o
        } else {
            phi_m
        });
        Point2f::new(theta2u(theta_m), u - u.floor())
    }

    /// Interpolate the spectral reflectance at each of the wavelengths.
    ///
    /// * `u`       - Position in the unit square.
    /// * `phi_o`   - Azimuth of the outgoing direction.
    /// * `theta_o` - Elevation of the outgoing direction.
    fn spectral_reflectance(&self, u: &Point2f, phi_o: Float, theta_o: Float) -> SampledSpectrum {
        let mut fr = SampledSpectrum::ZERO;
        for i in 0..N_SPECTRUM_SAMPLES {
            let lambda = self.lambda.lambda(i);
            fr[i] = max(0.0, self.brdf.spectra.evaluate(u, &[phi_o, theta_o, lambda]));
        }
        fr
    }
}

impl fmt::Display for MeasuredBxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ MeasuredBxDF brdf: {} ]", self.brdf)
    }
}

/// Returns the normalized half vector or `None` if it has zero length.
///
/// * `wo` - Outgoing direction.
/// * `wi` - Incident direction.
fn half_vector(wo: &Vector3f, wi: &Vector3f) -> Option<Vector3f> {
    let wm = *wi + *wo;
    stat_rare!(N_ZERO_HALF_VECTORS, N_HALF_VECTORS, wm.length_squared() == 0.0);
    if wm.length_squared() == 0.0 {
        None
    } else {
        Some(wm.normalize())
    }
}

/// Returns the change of variables from the unit square to the sphere of
/// incident directions.
///
/// * `wo`          - Outgoing direction.
/// * `wm`          - Microfacet normal.
/// * `u_theta`     - Elevation coordinate of `wm` in the unit square.
/// * `sin_theta_m` - Sine of the elevation of `wm`.
fn jacobian(wo: &Vector3f, wm: &Vector3f, u_theta: Float, sin_theta_m: Float) -> Float {
    4.0 * wo.dot(wm) * max(2.0 * sqr(PI) * u_theta * sin_theta_m, 1e-6)
}

/// Map an elevation in `[0, π/2]` to `[0, 1]`.
///
/// * `theta` - The elevation.
pub fn theta2u(theta: Float) -> Float {
    safe_sqrt(theta * (2.0 / PI))
}

/// Map an azimuth in `[-π, π]` to `[0, 1]`.
///
/// * `phi` - The azimuth.
pub fn phi2u(phi: Float) -> Float {
    (phi + PI) / (2.0 * PI)
}

/// Inverse of `theta2u()`.
///
/// * `u` - The unit coordinate.
pub fn u2theta(u: Float) -> Float {
    sqr(u) * (PI / 2.0)
}

/// Inverse of `phi2u()`.
///
/// * `u` - The unit coordinate.
pub fn u2phi(u: Float) -> Float {
    (2.0 * u - 1.0) * PI
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::measured_fixture::*;
    use super::*;
    use crate::rng::RNG;
    use float_cmp::*;
    use std::fs;

    fn measured(stem: &str) -> MeasuredBxDF {
        let path = write_isotropic_brdf(stem);
        let data = MeasuredBxDFData::from_file(&path).unwrap().unwrap();
        fs::remove_file(&path).ok();
        MeasuredBxDF::new(
            Arc::new(data),
            SampledWavelengths::from_lambdas([400.0, 500.0, 600.0, 700.0]),
        )
    }

    #[test]
    fn reparameterizations_invert() {
        for &t in [0.0, 0.3, 1.0, PI / 2.0].iter() {
            assert!(approx_eq!(Float, u2theta(theta2u(t)), t, epsilon = 1e-6));
        }
        for &p in [-PI, -1.0, 0.0, 2.0, PI].iter() {
            assert!(approx_eq!(Float, u2phi(phi2u(p)), p, epsilon = 1e-6));
        }
        assert!(approx_eq!(Float, theta2u(PI / 2.0), 1.0, epsilon = 1e-6));
        assert_eq!(phi2u(-PI), 0.0);
    }

    #[test]
    fn opposite_hemispheres_are_black() {
        let bxdf = measured("measured_opposite");
        let wo = Vector3f::new(0.3, 0.1, 0.9).normalize();
        let wi = Vector3f::new(-0.2, 0.4, -0.8).normalize();
        let mode = TransportMode::Radiance;
        assert!(bxdf.f(&wo, &wi, mode).is_black());
        assert_eq!(bxdf.pdf(&wo, &wi, mode, BxDFReflTransFlags::ALL), 0.0);
    }

    #[test]
    fn backfacing_matches_frontfacing() {
        let bxdf = measured("measured_backfacing");
        let wo = Vector3f::new(0.3, 0.1, 0.9).normalize();
        let wi = Vector3f::new(-0.2, 0.4, 0.8).normalize();
        let mode = TransportMode::Radiance;
        assert_eq!(bxdf.f(&wo, &wi, mode), bxdf.f(&-wo, &-wi, mode));
        assert_eq!(
            bxdf.pdf(&wo, &wi, mode, BxDFReflTransFlags::ALL),
            bxdf.pdf(&-wo, &-wi, mode, BxDFReflTransFlags::ALL)
        );
    }

    #[test]
    fn transmission_filter() {
        let bxdf = measured("measured_filter");
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let mode = TransportMode::Radiance;
        let u = Point2f::new(0.4, 0.6);
        assert!(bxdf
            .sample_f(&wo, 0.5, &u, mode, BxDFReflTransFlags::TRANSMISSION)
            .is_none());
        assert_eq!(bxdf.pdf(&wo, &wo, mode, BxDFReflTransFlags::TRANSMISSION), 0.0);
    }

    #[test]
    fn samples_match_pdf_and_f() {
        let bxdf = measured("measured_samples");
        let mode = TransportMode::Radiance;
        let flags = BxDFReflTransFlags::ALL;
        let mut rng = RNG::new(11);

        let mut n_checked = 0;
        for _ in 0..2000 {
            let wo = cosine_sample_hemisphere(&rng.uniform_point2f());
            let u = rng.uniform_point2f();
            if wo.z < 0.05 {
                continue;
            }
            let s = match bxdf.sample_f(&wo, 0.5, &u, mode, flags) {
                Some(s) => s,
                None => continue,
            };
            assert_eq!(s.flags, BxDFFlags::GLOSSY_REFLECTION);
            assert!(s.wi.z > 0.0);
            assert!(s.pdf > 0.0 && !s.f.has_nans());

            // Skip microfacet normals close to the pole where the elevation
            // is poorly conditioned.
            let wm = (wo + s.wi).normalize();
            if wm.z > 0.999 || s.wi.z < 0.05 {
                continue;
            }

            let pdf = bxdf.pdf(&wo, &s.wi, mode, flags);
            assert!(
                approx_eq!(Float, pdf, s.pdf, epsilon = 2e-2 * s.pdf),
                "pdf {} != sampled {}",
                pdf,
                s.pdf
            );

            let f = bxdf.f(&wo, &s.wi, mode);
            for i in 0..N_SPECTRUM_SAMPLES {
                assert!(approx_eq!(Float, f[i], s.f[i], epsilon = 2e-2 * s.f[i]));
            }
            n_checked += 1;
        }
        assert!(n_checked > 200);
    }

    #[test]
    fn display() {
        let bxdf = measured("measured_display");
        assert!(bxdf
            .to_string()
            .starts_with("[ MeasuredBxDF brdf: [ MeasuredBxDFData filename: "));
    }
}
