//! Spherical coordinates

use super::vector3::*;
use crate::pbrt::*;

/// Returns a direction (x, y, z) for spherical coordinates (θ, Ø).
///
/// * `sin_theta` - sin(θ).
/// * `cos_theta` - cos(θ).
/// * `phi`       - Ø.
#[inline]
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f::new(
        clamp(sin_theta, -1.0, 1.0) * phi.cos(),
        clamp(sin_theta, -1.0, 1.0) * phi.sin(),
        clamp(cos_theta, -1.0, 1.0),
    )
}

/// Return the spherical angle θ for a given vector.
///
/// * `v` - The vector.
#[inline]
pub fn spherical_theta(v: &Vector3f) -> Float {
    safe_acos(v.z)
}

/// Return the spherical angle Ø in [0, 2π) for a given vector.
///
/// * `v` - The vector.
#[inline]
pub fn spherical_phi(v: &Vector3f) -> Float {
    let p = v.y.atan2(v.x);
    if p < 0.0 {
        p + TWO_PI
    } else {
        p
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
    fn pole_has_zero_theta() {
        let v = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(spherical_theta(&v), 0.0);
        assert_eq!(spherical_phi(&v), 0.0);
    }

    proptest! {
        #[test]
        fn direction_roundtrip(theta in 0.01..3.13f32, phi in 0.0..6.28f32) {
            let v = spherical_direction(theta.sin(), theta.cos(), phi);
            prop_assert!(approx_eq!(Float, v.length(), 1.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(Float, spherical_theta(&v), theta, epsilon = 1e-3));
            prop_assert!(approx_eq!(Float, spherical_phi(&v), phi, epsilon = 1e-3));
        }
    }
}
