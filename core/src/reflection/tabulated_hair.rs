//! Tabulated Hair

use super::*;

/// Number of one degree steps from 0 to 90 degrees inclusive.
pub const FIBER_TABLE_ANGLES: usize = 91;

/// Fixed scale that table values are divided by on lookup.
const FIBER_TABLE_SCALE: Float = 2.5;

/// Measured fiber reflectance indexed by incident angle, outgoing angle and
/// wavelength sample.
#[derive(Clone, Debug, PartialEq)]
pub struct FiberBRDFTable {
    /// Values in `[theta_i][theta_o][lambda]` order.
    values: Vec<Float>,
}

impl FiberBRDFTable {
    /// Create a new `FiberBRDFTable`.
    ///
    /// * `values` - `91 x 91 x N_SPECTRUM_SAMPLES` values in
    ///              `[theta_i][theta_o][lambda]` order with angles in degrees.
    pub fn new(values: Vec<Float>) -> Result<Self, String> {
        let expected = FIBER_TABLE_ANGLES * FIBER_TABLE_ANGLES * N_SPECTRUM_SAMPLES;
        if values.len() != expected {
            return Err(format!(
                "FiberBRDFTable: expected {} values ({}x{}x{}), got {}.",
                expected,
                FIBER_TABLE_ANGLES,
                FIBER_TABLE_ANGLES,
                N_SPECTRUM_SAMPLES,
                values.len()
            ));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(format!("FiberBRDFTable: invalid value {}.", v));
        }
        Ok(Self { values })
    }

    /// Returns the scaled reflectance for a pair of angles in degrees. Angles
    /// beyond 90 are clamped.
    ///
    /// * `theta_i` - Incident angle.
    /// * `theta_o` - Outgoing angle.
    pub fn lookup(&self, theta_i: usize, theta_o: usize) -> SampledSpectrum {
        let it = theta_i.min(FIBER_TABLE_ANGLES - 1);
        let ot = theta_o.min(FIBER_TABLE_ANGLES - 1);
        let offset = (it * FIBER_TABLE_ANGLES + ot) * N_SPECTRUM_SAMPLES;

        let mut r = SampledSpectrum::ZERO;
        for i in 0..N_SPECTRUM_SAMPLES {
            r[i] = self.values[offset + i] / FIBER_TABLE_SCALE;
        }
        r
    }
}

/// Returns the absolute elevation of a direction from the fiber's normal
/// plane in whole degrees.
///
/// * `w` - The direction.
fn table_angle(w: &Vector3f) -> usize {
    let theta = w.x.atan2((w.y * w.y + w.z * w.z).sqrt());
    degrees(theta).round().abs() as usize
}

/// Experimental fiber model that replaces the analytic lobes of `HairBxDF`
/// with a measured reflectance table for evaluation. Sampling still follows
/// the analytic lobes so `pdf` does not match `f`.
#[derive(Clone, Debug)]
pub struct TabulatedHairBxDF {
    /// Analytic model used for sampling and attenuation.
    hair: HairBxDF,

    /// Measured reflectance.
    table: Arc<FiberBRDFTable>,
}

impl TabulatedHairBxDF {
    /// Create a new instance of `TabulatedHairBxDF`.
    ///
    /// * `hair`  - Analytic hair model.
    /// * `table` - Measured reflectance table.
    pub fn new(hair: HairBxDF, table: Arc<FiberBRDFTable>) -> Self {
        Self { hair, table }
    }

    /// Returns the BxDF flags.
    pub fn flags(&self) -> BxDFFlags {
        self.hair.flags()
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo`   - Outgoing direction.
    /// * `wi`   - Incident direction.
    /// * `mode` - Transport mode.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode) -> SampledSpectrum {
        let o = FiberAngles::from(wo);
        let t = self.hair.transmittance(o.sin_theta, o.cos_theta);
        self.table.lookup(table_angle(wi), table_angle(wo)) * t
    }

    /// Samples a direction from the analytic lobes.
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
        let gamma_o = self.hair.gamma_o();
        let s = self.hair.s();

        let ap_pdf = self.hair.ap_pdf(o.cos_theta);
        let DiscreteSample {
            offset: p,
            u_remapped: uc,
            ..
        } = sample_discrete(&ap_pdf, uc)?;

        let (sin_thetap_o, cos_thetap_o) = self.hair.tilt(o.sin_theta, o.cos_theta, p);

        let v = self.hair.v(p);
        let cos_theta = 1.0 + v * (max(u[0], 1e-5) + (1.0 - u[0]) * (-2.0 / v).exp()).ln();
        let sin_theta = safe_sqrt(1.0 - sqr(cos_theta));
        let cos_phi = (TWO_PI * u[1]).cos();
        let sin_theta_i = -cos_theta * sin_thetap_o + sin_theta * cos_phi * cos_thetap_o;
        let cos_theta_i = safe_sqrt(1.0 - sqr(sin_theta_i));

        // The refracted angle is replaced by γo here.
        let dphi = if p < P_MAX {
            phi(p, gamma_o, gamma_o) + sample_trimmed_logistic(uc, s, -PI, PI)
        } else {
            TWO_PI * uc
        };

        let phi_i = o.phi + dphi;
        let wi = Vector3f::new(
            sin_theta_i,
            cos_theta_i * phi_i.cos(),
            cos_theta_i * phi_i.sin(),
        );

        let mut pdf = 0.0;
        for p in 0..P_MAX {
            let (sin_thetap_o, cos_thetap_o) = self.hair.tilt(o.sin_theta, o.cos_theta, p);
            pdf += mp(cos_theta_i, cos_thetap_o, sin_theta_i, sin_thetap_o, self.hair.v(p))
                * ap_pdf[p]
                * np(dphi, p, s, gamma_o, gamma_o);
        }
        pdf += mp(
            cos_theta_i,
            o.cos_theta,
            sin_theta_i,
            o.sin_theta,
            self.hair.v(P_MAX),
        ) * ap_pdf[P_MAX]
            * INV_TWO_PI;

        Some(BSDFSample::new(
            self.f(wo, &wi, mode),
            wi,
            pdf,
            self.flags(),
        ))
    }

    /// Evaluates the table weighted PDF.
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
        let gamma_o = self.hair.gamma_o();
        let gamma_t = self.hair.gamma_t(o.sin_theta, o.cos_theta);
        let ap_pdf = self.hair.ap_pdf(o.cos_theta);
        let dphi = i.phi - o.phi;

        let table = self.table.lookup(table_angle(wi), table_angle(wo)).average();
        let mut pdf = 0.0;
        for p in 0..P_MAX {
            pdf += table * ap_pdf[p] * np(dphi, p, self.hair.s(), gamma_o, gamma_t);
        }
        pdf += mp(
            i.cos_theta,
            o.cos_theta,
            i.sin_theta,
            o.sin_theta,
            self.hair.v(P_MAX),
        ) * ap_pdf[P_MAX]
            * INV_TWO_PI;
        pdf
    }
}

impl fmt::Display for TabulatedHairBxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ TabulatedHairBxDF hair: {} ]", self.hair)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
