//! Dielectric

use super::*;

/// BSDF for an interface between two dielectric media. Smooth interfaces
/// scatter specularly; rough interfaces use a Trowbridge-Reitz microfacet
/// distribution for both reflection and transmission.
#[derive(Copy, Clone, Debug)]
pub struct DielectricBxDF {
    /// Relative index of refraction (inside over outside).
    eta: Float,

    /// Microfacet distribution.
    mf_distrib: TrowbridgeReitzDistribution,
}

impl DielectricBxDF {
    /// Create a new instance of `DielectricBxDF`.
    ///
    /// * `eta`        - Relative index of refraction (inside over outside).
    /// * `mf_distrib` - Microfacet distribution.
    pub fn new(eta: Float, mf_distrib: TrowbridgeReitzDistribution) -> Self {
        register_stats();
        Self { eta, mf_distrib }
    }

    /// Returns the relative index of refraction.
    pub fn eta(&self) -> Float {
        self.eta
    }

    /// Returns `true` if the interface scatters specularly.
    fn is_smooth(&self) -> bool {
        self.eta == 1.0 || self.mf_distrib.effectively_smooth()
    }

    /// Returns the BxDF flags.
    pub fn flags(&self) -> BxDFFlags {
        let flags = if self.eta == 1.0 {
            BxDFFlags::TRANSMISSION
        } else {
            BxDFFlags::REFLECTION | BxDFFlags::TRANSMISSION
        };
        if self.mf_distrib.effectively_smooth() {
            flags | BxDFFlags::SPECULAR
        } else {
            flags | BxDFFlags::GLOSSY
        }
    }

    /// Returns the probabilities of choosing reflection and transmission
    /// restricted by the sample flags.
    ///
    /// * `r`            - Fresnel reflectance.
    /// * `sample_flags` - Lobes that may be sampled.
    fn lobe_probabilities(r: Float, sample_flags: BxDFReflTransFlags) -> (Float, Float) {
        let pr = if sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            r
        } else {
            0.0
        };
        let pt = if sample_flags.contains(BxDFReflTransFlags::TRANSMISSION) {
            1.0 - r
        } else {
            0.0
        };
        (pr, pt)
    }

    /// Returns the generalized half vector for a pair of directions along
    /// with the relative index of refraction and whether the pair is a
    /// reflection. Returns `None` for configurations that cannot scatter.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn half_vector(&self, wo: &Vector3f, wi: &Vector3f) -> Option<(Vector3f, Float, bool)> {
        let cos_theta_o = cos_theta(wo);
        let cos_theta_i = cos_theta(wi);
        let reflect = cos_theta_i * cos_theta_o > 0.0;
        let etap = if reflect {
            1.0
        } else if cos_theta_o > 0.0 {
            self.eta
        } else {
            1.0 / self.eta
        };

        let wm = *wi * etap + *wo;
        stat_rare!(N_ZERO_HALF_VECTORS, N_HALF_VECTORS, wm.length_squared() == 0.0);
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 || wm.length_squared() == 0.0 {
            return None;
        }
        let wm = wm.normalize().face_forward(&Vector3f::new(0.0, 0.0, 1.0));

        // Discard backfacing microfacets.
        if wm.dot(wi) * cos_theta_i < 0.0 || wm.dot(wo) * cos_theta_o < 0.0 {
            return None;
        }
        Some((wm, etap, reflect))
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions. Smooth interfaces return 0 since their distribution is a
    /// delta function.
    ///
    /// * `wo`   - Outgoing direction.
    /// * `wi`   - Incident direction.
    /// * `mode` - Transport mode.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> SampledSpectrum {
        if self.is_smooth() {
            return SampledSpectrum::ZERO;
        }
        let (wm, etap, reflect) = match self.half_vector(wo, wi) {
            Some(h) => h,
            None => return SampledSpectrum::ZERO,
        };

        let cos_theta_o = cos_theta(wo);
        let cos_theta_i = cos_theta(wi);
        let r = fr_dielectric(wo.dot(&wm), self.eta);
        let d = self.mf_distrib.d(&wm);
        let g = self.mf_distrib.g(wo, wi);

        if reflect {
            SampledSpectrum::new(d * g * r / abs(4.0 * cos_theta_i * cos_theta_o))
        } else {
            let denom = sqr(wi.dot(&wm) + wo.dot(&wm) / etap) * cos_theta_i * cos_theta_o;
            let mut ft = d * (1.0 - r) * g * abs(wi.dot(&wm) * wo.dot(&wm) / denom);
            if mode == TransportMode::Radiance {
                ft /= sqr(etap);
            }
            SampledSpectrum::new(ft)
        }
    }

    /// Samples reflection or transmission according to the Fresnel
    /// reflectance.
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
        if self.is_smooth() {
            self.sample_specular(wo, uc, mode, sample_flags)
        } else {
            self.sample_rough(wo, uc, u, mode, sample_flags)
        }
    }

    /// Samples the perfectly specular interface.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `uc`           - Uniform sample used to choose a lobe.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    fn sample_specular(
        &self,
        wo: &Vector3f,
        uc: Float,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        let r = fr_dielectric(cos_theta(wo), self.eta);
        let t = 1.0 - r;
        let (pr, pt) = Self::lobe_probabilities(r, sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return None;
        }

        if uc < pr / (pr + pt) {
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
            if wi.z == 0.0 {
                return None;
            }
            let fr = SampledSpectrum::new(r / abs_cos_theta(&wi));
            Some(BSDFSample::new(
                fr,
                wi,
                pr / (pr + pt),
                BxDFFlags::SPECULAR_REFLECTION,
            ))
        } else {
            let refracted = refract(wo, &Vector3f::new(0.0, 0.0, 1.0), self.eta);
            stat_rare!(N_REFRACTION_FAILURES, N_REFRACTIONS, refracted.is_none());
            let (wi, etap) = refracted?;
            if wi.z == 0.0 {
                return None;
            }

            let mut ft = t / abs_cos_theta(&wi);
            if mode == TransportMode::Radiance {
                ft /= sqr(etap);
            }
            Some(
                BSDFSample::new(
                    SampledSpectrum::new(ft),
                    wi,
                    pt / (pr + pt),
                    BxDFFlags::SPECULAR_TRANSMISSION,
                )
                .with_eta(etap),
            )
        }
    }

    /// Samples the rough interface using the distribution of visible normals.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `uc`           - Uniform sample used to choose a lobe.
    /// * `u`            - The 2D uniform random values.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    fn sample_rough(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        let wm = self.mf_distrib.sample_wm(wo, u);
        let r = fr_dielectric(wo.dot(&wm), self.eta);
        let t = 1.0 - r;
        let (pr, pt) = Self::lobe_probabilities(r, sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return None;
        }

        if uc < pr / (pr + pt) {
            let wi = reflect(wo, &wm);
            if !same_hemisphere(wo, &wi) || wi.z == 0.0 {
                return None;
            }

            let pdf = self.mf_distrib.pdf(wo, &wm) / (4.0 * wo.abs_dot(&wm)) * pr / (pr + pt);
            if pdf.is_nan() || pdf <= 0.0 {
                return None;
            }
            let f = self.mf_distrib.d(&wm) * self.mf_distrib.g(wo, &wi) * r
                / (4.0 * cos_theta(&wi) * cos_theta(wo));
            Some(BSDFSample::new(
                SampledSpectrum::new(f),
                wi,
                pdf,
                BxDFFlags::GLOSSY_REFLECTION,
            ))
        } else {
            let refracted = refract(wo, &wm, self.eta);
            stat_rare!(N_REFRACTION_FAILURES, N_REFRACTIONS, refracted.is_none());
            let (wi, etap) = refracted?;
            if same_hemisphere(wo, &wi) || wi.z == 0.0 {
                return None;
            }

            let denom = sqr(wi.dot(&wm) + wo.dot(&wm) / etap);
            let dwm_dwi = wi.abs_dot(&wm) / denom;
            let pdf = self.mf_distrib.pdf(wo, &wm) * dwm_dwi * pt / (pr + pt);
            if pdf.is_nan() || pdf <= 0.0 {
                return None;
            }

            let mut ft = t
                * self.mf_distrib.d(&wm)
                * self.mf_distrib.g(wo, &wi)
                * abs(wi.dot(&wm) * wo.dot(&wm) / (cos_theta(&wi) * cos_theta(wo) * denom));
            if mode == TransportMode::Radiance {
                ft /= sqr(etap);
            }
            Some(
                BSDFSample::new(
                    SampledSpectrum::new(ft),
                    wi,
                    pdf,
                    BxDFFlags::GLOSSY_TRANSMISSION,
                )
                .with_eta(etap),
            )
        }
    }

    /// Evaluates the PDF for the sampling method. Smooth interfaces return 0.
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
        if self.is_smooth() {
            return 0.0;
        }
        let (wm, etap, reflect) = match self.half_vector(wo, wi) {
            Some(h) => h,
            None => return 0.0,
        };

        let r = fr_dielectric(wo.dot(&wm), self.eta);
        let (pr, pt) = Self::lobe_probabilities(r, sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return 0.0;
        }

        if reflect {
            self.mf_distrib.pdf(wo, &wm) / (4.0 * wo.abs_dot(&wm)) * pr / (pr + pt)
        } else {
            let denom = sqr(wi.dot(&wm) + wo.dot(&wm) / etap);
            let dwm_dwi = wi.abs_dot(&wm) / denom;
            self.mf_distrib.pdf(wo, &wm) * dwm_dwi * pt / (pr + pt)
        }
    }
}

impl fmt::Display for DielectricBxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ DielectricBxDF eta: {} mf_distrib: {} ]",
            self.eta, self.mf_distrib
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
