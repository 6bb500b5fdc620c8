//! Fresnel Dielectrics

use crate::pbrt::*;

/// Computes the Fresnel reflection formula for dielectric materials and
/// unpolarized light.
///
/// * `cos_theta_i` - Cosine of the angle made by incident direction and
///                   surface normal. Negative values mean the incident
///                   direction is inside the medium.
/// * `eta`         - Relative index of refraction (inside over outside).
pub fn fr_dielectric(cos_theta_i: Float, eta: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let mut eta = eta;

    // Potentially flip interface orientation.
    if cos_theta_i < 0.0 {
        eta = 1.0 / eta;
        cos_theta_i = -cos_theta_i;
    }

    // Compute cos_theta_t using Snell's law.
    let sin2_theta_i = 1.0 - sqr(cos_theta_i);
    let sin2_theta_t = sin2_theta_i / sqr(eta);

    // Handle total internal reflection.
    if sin2_theta_t >= 1.0 {
        return 1.0;
    }
    let cos_theta_t = safe_sqrt(1.0 - sin2_theta_t);

    let r_parl = (eta * cos_theta_i - cos_theta_t) / (eta * cos_theta_i + cos_theta_t);
    let r_perp = (cos_theta_i - eta * cos_theta_t) / (cos_theta_i + eta * cos_theta_t);
    (sqr(r_parl) + sqr(r_perp)) / 2.0
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
    fn normal_incidence() {
        let eta = 1.5;
        let expected = sqr((eta - 1.0) / (eta + 1.0));
        assert!(approx_eq!(Float, fr_dielectric(1.0, eta), expected, epsilon = 1e-6));
        assert!(approx_eq!(Float, fr_dielectric(-1.0, eta), expected, epsilon = 1e-6));
    }

    #[test]
    fn matched_interface_does_not_reflect() {
        assert_eq!(fr_dielectric(0.5, 1.0), 0.0);
    }

    #[test]
    fn total_internal_reflection() {
        assert_eq!(fr_dielectric(-0.1, 1.5), 1.0);
    }

    proptest! {
        #[test]
        fn in_unit_range(cos_theta in -1.0..1.0f32, eta in 1.0..3.0f32) {
            let r = fr_dielectric(cos_theta, eta);
            prop_assert!((0.0..=1.0).contains(&r));
        }

        #[test]
        fn grazing_exceeds_normal(eta in 1.1..3.0f32) {
            prop_assert!(fr_dielectric(0.01, eta) > fr_dielectric(1.0, eta));
        }
    }
}
