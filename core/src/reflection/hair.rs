//! Hair

use super::*;

/// Number of explicitly modeled scattering lobes; the remaining higher order
/// terms are lumped into one extra lobe.
pub const P_MAX: usize = 3;

/// Lower bound for the longitudinal variance so that a zero `beta_m` stays
/// finite.
const MIN_LONGITUDINAL_VARIANCE: Float = 1e-4;

/// Lower bound for the azimuthal logistic scale so that a zero `beta_n`
/// stays finite.
const MIN_AZIMUTHAL_SCALE: Float = 1e-3;

/// Scattering model for hair fibers. The fiber runs along the local x-axis
/// and the y-z plane is its cross-section.
#[derive(Copy, Clone, Debug)]
pub struct HairBxDF {
    /// Offset along the curve width where the ray intersected the fiber in
    /// [-1, 1].
    h: Float,

    /// Index of refraction of the fiber interior.
    eta: Float,

    /// Absorption coefficient of the fiber interior.
    sigma_a: SampledSpectrum,

    /// Longitudinal roughness in [0, 1].
    beta_m: Float,

    /// Azimuthal roughness in [0, 1].
    beta_n: Float,

    /// Longitudinal variance per lobe.
    v: [Float; P_MAX + 1],

    /// Azimuthal logistic scale factor.
    s: Float,

    /// sin(2^k α) for the scale tilt α.
    sin_2k_alpha: [Float; P_MAX],

    /// cos(2^k α) for the scale tilt α.
    cos_2k_alpha: [Float; P_MAX],
}

impl HairBxDF {
    /// Create a new instance of `HairBxDF`.
    ///
    /// * `h`       - Offset along the curve width in [-1, 1].
    /// * `eta`     - Index of refraction of the fiber interior.
    /// * `sigma_a` - Absorption coefficient of the fiber interior.
    /// * `beta_m`  - Longitudinal roughness in [0, 1]. The derived variance
    ///               is kept above a small floor.
    /// * `beta_n`  - Azimuthal roughness in [0, 1]. The derived logistic
    ///               scale is kept above a small floor.
    /// * `alpha`   - Angle in degrees that the scales on the fiber are tilted.
    pub fn new(
        h: Float,
        eta: Float,
        sigma_a: SampledSpectrum,
        beta_m: Float,
        beta_n: Float,
        alpha: Float,
    ) -> Self {
        assert!((-1.0..=1.0).contains(&h), "Invalid h={h}");
        assert!((0.0..=1.0).contains(&beta_m), "Invalid beta_m={beta_m}");
        assert!((0.0..=1.0).contains(&beta_n), "Invalid beta_n={beta_n}");

        // Compute longitudinal variance from beta_m.
        let mut v = [0.0; P_MAX + 1];
        v[0] = sqr(0.726 * beta_m + 0.812 * sqr(beta_m) + 3.7 * beta_m.powi(20));
        v[1] = 0.25 * v[0];
        v[2] = 4.0 * v[0];
        for p in 3..=P_MAX {
            v[p] = v[2];
        }
        for vp in v.iter_mut() {
            *vp = max(*vp, MIN_LONGITUDINAL_VARIANCE);
        }

        // Compute azimuthal logistic scale factor from beta_n.
        let s = SQRT_PI_OVER_8 * (0.265 * beta_n + 1.194 * sqr(beta_n) + 5.372 * beta_n.powi(22));
        let s = max(s, MIN_AZIMUTHAL_SCALE);

        // Compute alpha terms for hair scales.
        let mut sin_2k_alpha = [0.0; P_MAX];
        let mut cos_2k_alpha = [0.0; P_MAX];
        sin_2k_alpha[0] = radians(alpha).sin();
        cos_2k_alpha[0] = safe_sqrt(1.0 - sqr(sin_2k_alpha[0]));
        for i in 1..P_MAX {
            sin_2k_alpha[i] = 2.0 * cos_2k_alpha[i - 1] * sin_2k_alpha[i - 1];
            cos_2k_alpha[i] = sqr(cos_2k_alpha[i - 1]) - sqr(sin_2k_alpha[i - 1]);
        }

        Self {
            h,
            eta,
            sigma_a,
            beta_m,
            beta_n,
            v,
            s,
            sin_2k_alpha,
            cos_2k_alpha,
        }
    }

    /// Returns the BxDF flags.
    pub fn flags(&self) -> BxDFFlags {
        BxDFFlags::GLOSSY_REFLECTION
    }

    /// Returns the longitudinal variance of lobe `p`.
    ///
    /// * `p` - Lobe index.
    pub(crate) fn v(&self, p: usize) -> Float {
        self.v[p]
    }

    /// Returns the azimuthal logistic scale factor.
    pub(crate) fn s(&self) -> Float {
        self.s
    }

    /// Returns γo, the angle between the incident ray and the fiber normal
    /// in the cross-section plane.
    pub(crate) fn gamma_o(&self) -> Float {
        safe_asin(self.h)
    }

    /// Returns the angle γt of the refracted ray in the cross-section plane.
    ///
    /// * `sin_theta_o` - sin(θo).
    /// * `cos_theta_o` - cos(θo).
    pub(crate) fn gamma_t(&self, sin_theta_o: Float, cos_theta_o: Float) -> Float {
        safe_asin(self.sin_gamma_t(sin_theta_o, cos_theta_o))
    }

    /// Returns sin(γt) using the modified index of refraction for the
    /// projected cross-section.
    ///
    /// * `sin_theta_o` - sin(θo).
    /// * `cos_theta_o` - cos(θo).
    fn sin_gamma_t(&self, sin_theta_o: Float, cos_theta_o: Float) -> Float {
        let etap = safe_sqrt(sqr(self.eta) - sqr(sin_theta_o)) / cos_theta_o;
        self.h / etap
    }

    /// Returns the transmittance of one pass through the fiber interior.
    ///
    /// * `sin_theta_o` - sin(θo).
    /// * `cos_theta_o` - cos(θo).
    pub(crate) fn transmittance(&self, sin_theta_o: Float, cos_theta_o: Float) -> SampledSpectrum {
        let sin_theta_t = sin_theta_o / self.eta;
        let cos_theta_t = safe_sqrt(1.0 - sqr(sin_theta_t));
        let cos_gamma_t = safe_sqrt(1.0 - sqr(self.sin_gamma_t(sin_theta_o, cos_theta_o)));
        (-self.sigma_a * (2.0 * cos_gamma_t / cos_theta_t)).exp()
    }

    /// Returns the attenuation of each lobe.
    ///
    /// * `sin_theta_o` - sin(θo).
    /// * `cos_theta_o` - cos(θo).
    pub(crate) fn attenuation(
        &self,
        sin_theta_o: Float,
        cos_theta_o: Float,
    ) -> [SampledSpectrum; P_MAX + 1] {
        let t = self.transmittance(sin_theta_o, cos_theta_o);
        ap(cos_theta_o, self.eta, self.h, t)
    }

    /// Returns the rotation of the outgoing direction that accounts for the
    /// tilted scales on the fiber surface as (sin(θ'o), |cos(θ'o)|).
    ///
    /// * `sin_theta_o` - sin(θo).
    /// * `cos_theta_o` - cos(θo).
    /// * `p`           - Lobe index.
    pub(crate) fn tilt(&self, sin_theta_o: Float, cos_theta_o: Float, p: usize) -> (Float, Float) {
        let (sin, cos) = (self.sin_2k_alpha, self.cos_2k_alpha);
        let (sin_thetap_o, cos_thetap_o) = match p {
            0 => (
                sin_theta_o * cos[1] - cos_theta_o * sin[1],
                cos_theta_o * cos[1] + sin_theta_o * sin[1],
            ),
            1 => (
                sin_theta_o * cos[0] + cos_theta_o * sin[0],
                cos_theta_o * cos[0] - sin_theta_o * sin[0],
            ),
            2 => (
                sin_theta_o * cos[2] + cos_theta_o * sin[2],
                cos_theta_o * cos[2] - sin_theta_o * sin[2],
            ),
            _ => (sin_theta_o, cos_theta_o),
        };
        (sin_thetap_o, abs(cos_thetap_o))
    }

    /// Returns the discrete probabilities of sampling each lobe, proportional
    /// to the average lobe attenuation.
    ///
    /// * `cos_theta_o` - cos(θo).
    pub fn ap_pdf(&self, cos_theta_o: Float) -> [Float; P_MAX + 1] {
        let sin_theta_o = safe_sqrt(1.0 - sqr(cos_theta_o));
        let ap = self.attenuation(sin_theta_o, cos_theta_o);

        let mut ap_pdf = [0.0; P_MAX + 1];
        let sum_y: Float = ap.iter().map(|a| a.average()).sum();
        if sum_y <= 0.0 {
            return ap_pdf;
        }
        for (pdf, a) in ap_pdf.iter_mut().zip(ap.iter()) {
            *pdf = a.average() / sum_y;
        }
        ap_pdf
    }

    /// Returns the longitudinal/azimuthal mixture density for a pair of
    /// fiber-frame angles.
    ///
    /// * `wo`      - Fiber-frame angles of the outgoing direction.
    /// * `wi`      - Fiber-frame angles of the incident direction.
    /// * `dphi`    - Azimuthal difference φi - φo.
    /// * `ap_pdf`  - Lobe probabilities.
    /// * `gamma_t` - γt.
    fn mixture_pdf(
        &self,
        wo: &FiberAngles,
        wi: &FiberAngles,
        dphi: Float,
        ap_pdf: &[Float; P_MAX + 1],
        gamma_t: Float,
    ) -> Float {
        let gamma_o = self.gamma_o();
        let mut pdf = 0.0;
        for p in 0..P_MAX {
            let (sin_thetap_o, cos_thetap_o) = self.tilt(wo.sin_theta, wo.cos_theta, p);
            pdf += mp(
                wi.cos_theta,
                cos_thetap_o,
                wi.sin_theta,
                sin_thetap_o,
                self.v[p],
            ) * ap_pdf[p]
                * np(dphi, p, self.s, gamma_o, gamma_t);
        }
        pdf += mp(
            wi.cos_theta,
            wo.cos_theta,
            wi.sin_theta,
            wo.sin_theta,
            self.v[P_MAX],
        ) * ap_pdf[P_MAX]
            * INV_TWO_PI;
        pdf
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo`   - Outgoing direction.
    /// * `wi`   - Incident direction.
    /// * `mode` - Transport mode.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode) -> SampledSpectrum {
        let o = FiberAngles::from(wo);
        let i = FiberAngles::from(wi);
        let gamma_o = self.gamma_o();
        let gamma_t = self.gamma_t(o.sin_theta, o.cos_theta);

        let ap = self.attenuation(o.sin_theta, o.cos_theta);
        let phi = i.phi - o.phi;

        let mut fsum = SampledSpectrum::ZERO;
        for p in 0..P_MAX {
            let (sin_thetap_o, cos_thetap_o) = self.tilt(o.sin_theta, o.cos_theta, p);
            fsum += ap[p]
                * (mp(i.cos_theta, cos_thetap_o, i.sin_theta, sin_thetap_o, self.v[p])
                    * np(phi, p, self.s, gamma_o, gamma_t));
        }

        // Remaining terms after the last modeled lobe.
        fsum += ap[P_MAX]
            * (mp(i.cos_theta, o.cos_theta, i.sin_theta, o.sin_theta, self.v[P_MAX]) * INV_TWO_PI);

        let cos_i = abs_cos_theta(wi);
        if cos_i > 0.0 {
            fsum /= cos_i;
        }
        debug_assert!(!fsum.has_nans());
        fsum
    }

    /// Samples a lobe, then a longitudinal and an azimuthal angle.
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
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            return None;
        }

        let o = FiberAngles::from(wo);
        let gamma_o = self.gamma_o();
        let gamma_t = self.gamma_t(o.sin_theta, o.cos_theta);

        // Determine which term p to sample.
        let ap_pdf = self.ap_pdf(o.cos_theta);
        let DiscreteSample {
            offset: p,
            u_remapped: uc,
            ..
        } = sample_discrete(&ap_pdf, uc)?;

        let (sin_thetap_o, cos_thetap_o) = self.tilt(o.sin_theta, o.cos_theta, p);

        // Sample Mp to compute θi.
        let cos_theta = 1.0
            + self.v[p] * (max(u[0], 1e-5) + (1.0 - u[0]) * (-2.0 / self.v[p]).exp()).ln();
        let sin_theta = safe_sqrt(1.0 - sqr(cos_theta));
        let cos_phi = (TWO_PI * u[1]).cos();
        let sin_theta_i = -cos_theta * sin_thetap_o + sin_theta * cos_phi * cos_thetap_o;
        let cos_theta_i = safe_sqrt(1.0 - sqr(sin_theta_i));

        // Sample Np to compute Δφ.
        let dphi = if p < P_MAX {
            phi(p, gamma_o, gamma_t) + sample_trimmed_logistic(uc, self.s, -PI, PI)
        } else {
            TWO_PI * uc
        };

        let phi_i = o.phi + dphi;
        let wi = Vector3f::new(
            sin_theta_i,
            cos_theta_i * phi_i.cos(),
            cos_theta_i * phi_i.sin(),
        );

        let i = FiberAngles {
            sin_theta: sin_theta_i,
            cos_theta: cos_theta_i,
            phi: phi_i,
        };
        let pdf = self.mixture_pdf(&o, &i, dphi, &ap_pdf, gamma_t);
        Some(BSDFSample::new(
            self.f(wo, &wi, mode),
            wi,
            pdf,
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
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            return 0.0;
        }

        let o = FiberAngles::from(wo);
        let i = FiberAngles::from(wi);
        let gamma_t = self.gamma_t(o.sin_theta, o.cos_theta);
        let ap_pdf = self.ap_pdf(o.cos_theta);
        self.mixture_pdf(&o, &i, i.phi - o.phi, &ap_pdf, gamma_t)
    }

    /// Returns the absorption coefficient for the given concentrations of
    /// eumelanin and pheomelanin.
    ///
    /// * `ce` - Eumelanin concentration.
    /// * `cp` - Pheomelanin concentration.
    pub fn sigma_a_from_concentration(ce: Float, cp: Float) -> RGB {
        let eumelanin_sigma_a = RGB::new(0.419, 0.697, 1.37);
        let pheomelanin_sigma_a = RGB::new(0.187, 0.4, 1.05);
        ce * eumelanin_sigma_a + cp * pheomelanin_sigma_a
    }

    /// Returns the absorption coefficient that yields approximately the
    /// given multiple scattered reflectance.
    ///
    /// * `c`      - Desired reflectance.
    /// * `beta_n` - Azimuthal roughness.
    pub fn sigma_a_from_reflectance(c: &SampledSpectrum, beta_n: Float) -> SampledSpectrum {
        let denom = evaluate_polynomial(beta_n, &[5.969, -0.215, 2.532, -10.73, 5.574, 0.245]);
        let mut sigma_a = SampledSpectrum::ZERO;
        for i in 0..N_SPECTRUM_SAMPLES {
            sigma_a[i] = sqr(c[i].ln() / denom);
        }
        sigma_a
    }
}

impl fmt::Display for HairBxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ HairBxDF h: {} eta: {} beta_m: {} beta_n: {} v[0]: {} s: {} sigma_a: {} ]",
            self.h, self.eta, self.beta_m, self.beta_n, self.v[0], self.s, self.sigma_a
        )
    }
}

/// Angles of a direction in the fiber frame where the fiber runs along x.
#[derive(Copy, Clone, Debug)]
pub(crate) struct FiberAngles {
    /// sin(θ), the component along the fiber.
    pub sin_theta: Float,

    /// cos(θ).
    pub cos_theta: Float,

    /// Azimuth φ in the cross-section plane.
    pub phi: Float,
}

impl From<&Vector3f> for FiberAngles {
    /// Compute the fiber-frame angles of a direction.
    ///
    /// * `w` - The direction.
    fn from(w: &Vector3f) -> Self {
        let sin_theta = w.x;
        Self {
            sin_theta,
            cos_theta: safe_sqrt(1.0 - sqr(sin_theta)),
            phi: w.z.atan2(w.y),
        }
    }
}

/// Modified Bessel function of the first kind, I0.
///
/// * `x` - The argument.
#[inline]
fn i0(x: Float) -> Float {
    let mut val = 0.0;
    let mut x2i = 1.0;
    let mut ifact: i64 = 1;
    let mut i4: i64 = 1;
    for i in 0..10 {
        if i > 1 {
            ifact *= i;
        }
        val += x2i / (i4 as Float * sqr(ifact as Float));
        x2i *= x * x;
        i4 *= 4;
    }
    val
}

/// Logarithm of I0 with an asymptotic form for large arguments.
///
/// * `x` - The argument.
#[inline]
fn log_i0(x: Float) -> Float {
    if x > 12.0 {
        x + 0.5 * (-(TWO_PI.ln()) + (1.0 / x).ln() + 1.0 / (8.0 * x))
    } else {
        i0(x).ln()
    }
}

/// Longitudinal scattering function.
///
/// * `cos_theta_i` - cos(θi).
/// * `cos_theta_o` - cos(θo).
/// * `sin_theta_i` - sin(θi).
/// * `sin_theta_o` - sin(θo).
/// * `v`           - Longitudinal variance.
pub(crate) fn mp(
    cos_theta_i: Float,
    cos_theta_o: Float,
    sin_theta_i: Float,
    sin_theta_o: Float,
    v: Float,
) -> Float {
    let a = cos_theta_i * cos_theta_o / v;
    let b = sin_theta_i * sin_theta_o / v;
    let mp = if v <= 0.1 {
        (log_i0(a) - b - 1.0 / v + 0.6931 + (1.0 / (2.0 * v)).ln()).exp()
    } else {
        ((-b).exp() * i0(a)) / ((1.0 / v).sinh() * 2.0 * v)
    };
    debug_assert!(!mp.is_infinite() && !mp.is_nan());
    mp
}

/// Returns the fraction of incident light carried by each lobe.
///
/// * `cos_theta_o` - cos(θo).
/// * `eta`         - Index of refraction of the fiber interior.
/// * `h`           - Offset along the curve width.
/// * `t`           - Transmittance of one pass through the interior.
pub(crate) fn ap(
    cos_theta_o: Float,
    eta: Float,
    h: Float,
    t: SampledSpectrum,
) -> [SampledSpectrum; P_MAX + 1] {
    let mut ap = [SampledSpectrum::ZERO; P_MAX + 1];

    // Compute p = 0 attenuation at initial cylinder intersection.
    let cos_gamma_o = safe_sqrt(1.0 - sqr(h));
    let cos_theta = cos_theta_o * cos_gamma_o;
    let f = fr_dielectric(cos_theta, eta);
    ap[0] = SampledSpectrum::new(f);

    // Compute p = 1 attenuation term.
    ap[1] = t * sqr(1.0 - f);

    // Compute attenuation terms up to p = P_MAX.
    for p in 2..P_MAX {
        ap[p] = ap[p - 1] * t * f;
    }

    // Compute attenuation term accounting for remaining orders of scattering.
    ap[P_MAX] = (ap[P_MAX - 1] * t * f).safe_div(&(SampledSpectrum::ONE - t * f));
    ap
}

/// Returns the net change in azimuthal direction for lobe `p`.
///
/// * `p`       - Lobe index.
/// * `gamma_o` - γo.
/// * `gamma_t` - γt.
#[inline]
pub(crate) fn phi(p: usize, gamma_o: Float, gamma_t: Float) -> Float {
    let p = p as Float;
    2.0 * p * gamma_t - 2.0 * gamma_o + p * PI
}

/// Azimuthal scattering function.
///
/// * `delta_phi` - Azimuthal difference φi - φo.
/// * `p`         - Lobe index.
/// * `s`         - Logistic scale factor.
/// * `gamma_o`   - γo.
/// * `gamma_t`   - γt.
#[inline]
pub(crate) fn np(delta_phi: Float, p: usize, s: Float, gamma_o: Float, gamma_t: Float) -> Float {
    let mut dphi = delta_phi - phi(p, gamma_o, gamma_t);

    // Remap dphi to [-π, π].
    while dphi > PI {
        dphi -= TWO_PI;
    }
    while dphi < -PI {
        dphi += TWO_PI;
    }
    trimmed_logistic(dphi, s, -PI, PI)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::*;
    use proptest::prelude::*;

    fn hair(h: Float, sigma_a: Float, beta_m: Float, beta_n: Float, alpha: Float) -> HairBxDF {
        HairBxDF::new(h, 1.55, SampledSpectrum::new(sigma_a), beta_m, beta_n, alpha)
    }

    #[test]
    #[should_panic]
    fn rejects_invalid_offset() {
        hair(1.5, 0.0, 0.3, 0.3, 0.0);
    }

    #[test]
    #[should_panic]
    fn rejects_invalid_roughness() {
        hair(0.0, 0.0, 1.2, 0.3, 0.0);
    }

    #[test]
    fn zero_roughness_stays_finite() {
        let mut rng = RNG::new(17);
        let mode = TransportMode::Radiance;
        let flags = BxDFReflTransFlags::ALL;
        for (beta_m, beta_n) in [(0.0, 0.3), (0.3, 0.0), (0.0, 0.0)] {
            let bxdf = hair(0.4, 0.5, beta_m, beta_n, 2.0);
            assert!(bxdf.v(0) > 0.0 && bxdf.s() > 0.0);

            for _ in 0..200 {
                let wo = uniform_sample_sphere(&rng.uniform_point2f());
                let wi = uniform_sample_sphere(&rng.uniform_point2f());
                let f = bxdf.f(&wo, &wi, mode);
                assert!(f.samples().iter().all(|v| v.is_finite() && *v >= 0.0), "f={f}");
                let pdf = bxdf.pdf(&wo, &wi, mode, flags);
                assert!(pdf.is_finite() && pdf >= 0.0, "pdf={pdf}");

                let uc = rng.uniform_float();
                let u = rng.uniform_point2f();
                if let Some(s) = bxdf.sample_f(&wo, uc, &u, mode, flags) {
                    assert!(s.f.samples().iter().all(|v| v.is_finite()), "f={}", s.f);
                    assert!(s.pdf.is_finite(), "pdf={}", s.pdf);
                    assert!(!s.wi.x.is_nan() && !s.wi.y.is_nan() && !s.wi.z.is_nan());
                }
            }
        }
    }

    #[test]
    fn importance_matches_radiance() {
        let bxdf = hair(-0.3, 0.8, 0.4, 0.5, 2.0);
        let flags = BxDFReflTransFlags::ALL;
        let mut rng = RNG::new(19);
        for _ in 0..100 {
            let wo = uniform_sample_sphere(&rng.uniform_point2f());
            let wi = uniform_sample_sphere(&rng.uniform_point2f());
            assert_eq!(
                bxdf.f(&wo, &wi, TransportMode::Radiance),
                bxdf.f(&wo, &wi, TransportMode::Importance)
            );
            assert_eq!(
                bxdf.pdf(&wo, &wi, TransportMode::Radiance, flags),
                bxdf.pdf(&wo, &wi, TransportMode::Importance, flags)
            );

            let uc = rng.uniform_float();
            let u = rng.uniform_point2f();
            let a = bxdf.sample_f(&wo, uc, &u, TransportMode::Radiance, flags);
            let b = bxdf.sample_f(&wo, uc, &u, TransportMode::Importance, flags);
            match (a, b) {
                (Some(a), Some(b)) => {
                    assert_eq!(a.wi, b.wi);
                    assert_eq!(a.f, b.f);
                    assert_eq!(a.pdf, b.pdf);
                }
                (None, None) => {}
                _ => panic!("sampling depends on transport mode"),
            }
        }
    }

    #[test]
    fn i0_matches_reference_values() {
        assert!(approx_eq!(Float, i0(0.0), 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, i0(1.0), 1.2660659, epsilon = 1e-5));
        assert!(approx_eq!(Float, i0(2.0), 2.2795853, epsilon = 1e-5));
        assert!(approx_eq!(Float, log_i0(2.0), (2.2795853 as Float).ln(), epsilon = 1e-5));
        assert!(log_i0(20.0) > log_i0(12.0));
    }

    #[test]
    fn lossless_attenuation_sums_to_one() {
        for cos_theta_o in [0.1, 0.5, 0.9, 1.0] {
            for h in [-0.9, 0.0, 0.5] {
                let ap = ap(cos_theta_o, 1.55, h, SampledSpectrum::ONE);
                let sum: Float = ap.iter().map(|a| a[0]).sum();
                assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-5), "sum={sum}");
            }
        }
    }

    #[test]
    fn sigma_a_from_concentration() {
        let rgb = HairBxDF::sigma_a_from_concentration(1.0, 0.0);
        assert!(approx_eq!(Float, rgb.g, 0.697, epsilon = 1e-6));
        let rgb = HairBxDF::sigma_a_from_concentration(0.5, 2.0);
        assert!(approx_eq!(Float, rgb.r, 0.5 * 0.419 + 2.0 * 0.187, epsilon = 1e-6));
        assert!(approx_eq!(Float, rgb.b, 0.5 * 1.37 + 2.0 * 1.05, epsilon = 1e-6));
    }

    #[test]
    fn sigma_a_from_reflectance() {
        let c = SampledSpectrum::from([0.1, 0.3, 0.6, 1.0]);
        let sigma_a = HairBxDF::sigma_a_from_reflectance(&c, 0.3);
        let denom = 5.969 - 0.215 * 0.3 + 2.532 * 0.09 - 10.73 * 0.027 + 5.574 * 0.0081
            + 0.245 * 0.00243;
        assert!(approx_eq!(Float, sigma_a[0], sqr((0.1 as Float).ln() / denom), epsilon = 1e-5));
        assert_eq!(sigma_a[3], 0.0);
        assert!(sigma_a[0] > sigma_a[1] && sigma_a[1] > sigma_a[2]);
    }

    #[test]
    fn display() {
        let bxdf = hair(0.5, 0.25, 0.25, 0.5, 2.0);
        let s = bxdf.to_string();
        assert!(s.starts_with("[ HairBxDF h: 0.5 eta: 1.55 beta_m: 0.25 beta_n: 0.5 v[0]: "));
        assert!(s.ends_with("sigma_a: [ 0.25, 0.25, 0.25, 0.25 ] ]"));
    }

    #[test]
    fn tilt_without_scales_is_identity() {
        let bxdf = hair(0.3, 0.0, 0.3, 0.3, 0.0);
        for p in 0..=P_MAX {
            let (s, c) = bxdf.tilt(0.6, 0.8, p);
            assert!(approx_eq!(Float, s, 0.6, epsilon = 1e-6));
            assert!(approx_eq!(Float, c, 0.8, epsilon = 1e-6));
        }
    }

    #[test]
    fn filter_without_reflection_gives_no_sample() {
        let bxdf = hair(0.3, 0.5, 0.3, 0.3, 2.0);
        let wo = Vector3f::new(0.2, 0.5, 0.8).normalize();
        let mode = TransportMode::Radiance;
        assert!(bxdf
            .sample_f(&wo, 0.5, &Point2f::new(0.5, 0.5), mode, BxDFReflTransFlags::TRANSMISSION)
            .is_none());
        assert_eq!(bxdf.pdf(&wo, &wo, mode, BxDFReflTransFlags::TRANSMISSION), 0.0);
    }

    #[test]
    fn sampled_white_furnace() {
        // Without absorption every sample carries unit weight.
        let mut rng = RNG::new(3);
        let mode = TransportMode::Radiance;
        for beta_m in [0.1, 0.4, 0.8] {
            for beta_n in [0.2, 0.5, 0.9] {
                for _ in 0..200 {
                    let h = -1.0 + 2.0 * rng.uniform_float();
                    let bxdf = hair(h, 0.0, beta_m, beta_n, 2.0);
                    let wo = uniform_sample_sphere(&rng.uniform_point2f());
                    let uc = rng.uniform_float();
                    let u = rng.uniform_point2f();
                    if let Some(s) = bxdf.sample_f(&wo, uc, &u, mode, BxDFReflTransFlags::ALL) {
                        if s.pdf > 0.0 {
                            let w = s.f[0] * abs_cos_theta(&s.wi) / s.pdf;
                            assert!(approx_eq!(Float, w, 1.0, epsilon = 1e-3), "w={w}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn mixture_density_integrates_to_one() {
        let bxdf = hair(0.3, 0.6, 0.5, 0.5, 2.0);
        let mode = TransportMode::Radiance;
        let wo = Vector3f::new(0.3, 0.6, 0.742).normalize();
        let mut rng = RNG::new(11);

        let n = 100_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let wi = uniform_sample_sphere(&rng.uniform_point2f());
            sum += bxdf.pdf(&wo, &wi, mode, BxDFReflTransFlags::ALL) / uniform_sphere_pdf();
        }
        let integral = sum / n as Float;
        assert!(abs(integral - 1.0) < 0.05, "integral={integral}");
    }

    #[test]
    fn lobe_probabilities_sum_to_one() {
        let bxdf = hair(-0.4, 1.2, 0.3, 0.6, 2.0);
        for cos_theta_o in [0.05, 0.3, 0.7, 1.0] {
            let ap_pdf = bxdf.ap_pdf(cos_theta_o);
            assert!(ap_pdf.iter().all(|p| *p >= 0.0));
            let sum: Float = ap_pdf.iter().sum();
            assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-5));
        }
    }

    proptest! {
        #[test]
        fn sample_matches_pdf(
            h in -1.0..1.0f32,
            sigma_a in 0.0..2.0f32,
            beta_m in 0.1..1.0f32,
            beta_n in 0.1..1.0f32,
            w0 in 0.0..1.0f32,
            w1 in 0.0..1.0f32,
            uc in 0.0..1.0f32,
            u0 in 0.0..1.0f32,
            u1 in 0.0..1.0f32,
        ) {
            let bxdf = hair(h, sigma_a, beta_m, beta_n, 2.0);
            let wo = uniform_sample_sphere(&Point2f::new(w0, w1));
            let mode = TransportMode::Radiance;
            let flags = BxDFReflTransFlags::ALL;

            if let Some(s) = bxdf.sample_f(&wo, uc, &Point2f::new(u0, u1), mode, flags) {
                let pdf = bxdf.pdf(&wo, &s.wi, mode, flags);
                prop_assert!(abs(pdf - s.pdf) <= 1e-3 * max(pdf, s.pdf) + 1e-4,
                    "pdf={} sample.pdf={}", pdf, s.pdf);
                prop_assert!(s.f[0] >= 0.0);
            }
        }

        #[test]
        fn mp_is_symmetric(
            cos_i in 0.0..1.0f32,
            cos_o in 0.0..1.0f32,
            sin_i in -1.0..1.0f32,
            sin_o in -1.0..1.0f32,
            v in 0.01..1.0f32,
        ) {
            let a = mp(cos_i, cos_o, sin_i, sin_o, v);
            let b = mp(cos_o, cos_i, sin_o, sin_i, v);
            prop_assert!(abs(a - b) <= 1e-4 * max(a, b) + 1e-6);
        }

        #[test]
        fn azimuthal_mirror_symmetry(
            theta_o in -1.4..1.4f32,
            theta_i in -1.4..1.4f32,
            phi_o in -3.0..3.0f32,
            dphi in 0.0..3.0f32,
        ) {
            // A centered ray sees a symmetric cross-section.
            let bxdf = hair(0.0, 0.4, 0.3, 0.3, 0.0);
            let dir = |theta: Float, phi: Float| {
                Vector3f::new(theta.sin(), theta.cos() * phi.cos(), theta.cos() * phi.sin())
            };
            let wo = dir(theta_o, phi_o);
            let wi_a = dir(theta_i, phi_o + dphi);
            let wi_b = dir(theta_i, phi_o - dphi);

            let mode = TransportMode::Radiance;
            let fa = bxdf.f(&wo, &wi_a, mode)[0];
            let fb = bxdf.f(&wo, &wi_b, mode)[0];
            prop_assert!(abs(fa - fb) <= 1e-3 * max(fa, fb) + 1e-5, "fa={} fb={}", fa, fb);
        }

        #[test]
        fn longitudinal_mirror_symmetry(
            h in -1.0..1.0f32,
            sigma_a in 0.0..2.0f32,
            theta_o in -1.4..1.4f32,
            theta_i in -1.4..1.4f32,
            phi_o in -3.0..3.0f32,
            phi_i in -3.0..3.0f32,
        ) {
            // Without scale tilt, flipping both directions across the
            // fiber's normal plane leaves the scattering unchanged.
            let bxdf = hair(h, sigma_a, 0.3, 0.4, 0.0);
            let dir = |theta: Float, phi: Float| {
                Vector3f::new(theta.sin(), theta.cos() * phi.cos(), theta.cos() * phi.sin())
            };
            let mode = TransportMode::Radiance;
            let fa = bxdf.f(&dir(theta_o, phi_o), &dir(theta_i, phi_i), mode)[0];
            let fb = bxdf.f(&dir(-theta_o, phi_o), &dir(-theta_i, phi_i), mode)[0];
            prop_assert!(abs(fa - fb) <= 1e-3 * max(fa, fb) + 1e-5, "fa={} fb={}", fa, fb);
        }
    }
}
