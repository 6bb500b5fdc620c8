//! Common

use crate::geometry::*;
use crate::pbrt::*;
use crate::{stat_counter, stat_memory_counter, stat_percent, stat_register_fns, stats::*};

stat_percent!(
    "BxDF/Refraction failures",
    N_REFRACTION_FAILURES,
    N_REFRACTIONS,
    bxdf_stats_refraction,
);
stat_percent!(
    "BxDF/Zero-length half vectors",
    N_ZERO_HALF_VECTORS,
    N_HALF_VECTORS,
    bxdf_stats_half_vectors,
);
stat_memory_counter!(
    "Memory/Measured BRDF data",
    MEASURED_BRDF_MEMORY,
    measured_brdf_stats_memory,
);
stat_counter!(
    "Measured BRDF/Files loaded",
    N_MEASURED_BRDF_FILES,
    measured_brdf_stats_files,
);

stat_register_fns!(
    bxdf_stats_refraction,
    bxdf_stats_half_vectors,
    measured_brdf_stats_memory,
    measured_brdf_stats_files,
);

/// Returns the cosine of the angle θ measured from the given direction to the
/// z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns the square of the cosine of the angle θ measured from the given
/// direction to the z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

/// Returns the absolute value of the cosine of the angle θ measured from the
/// given direction to the z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns the square of the sine of the angle θ measured from the given
/// direction to the z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_2_theta(w: &Vector3f) -> Float {
    max(0.0, 1.0 - cos_2_theta(w))
}

/// Returns the sine of the angle θ measured from the given direction to the
/// z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

/// Returns the square of the tangent of the angle θ measured from the given
/// direction to the z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn tan_2_theta(w: &Vector3f) -> Float {
    sin_2_theta(w) / cos_2_theta(w)
}

/// Returns the cosine of the angle Φ measured from the given direction to the
/// x-axis after projection to the xy plane.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        1.0
    } else {
        clamp(w.x / s, -1.0, 1.0)
    }
}

/// Returns the sine of the angle Φ measured from the given direction to the
/// x-axis after projection to the xy plane.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        0.0
    } else {
        clamp(w.y / s, -1.0, 1.0)
    }
}

/// Returns `true` if two vectors are in the same hemisphere.
///
/// * `w`  - First vector.
/// * `wp` - Second vector.
#[inline]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Reflect a vector about a normal and return the result.
///
/// * `wo` - The vector to reflect.
/// * `n`  - The normal.
#[inline]
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -(*wo) + 2.0 * wo.dot(n) * *n
}

/// Refract a direction through an interface with relative index of refraction
/// `eta`. The normal may lie on either side; the interface is flipped when
/// `wi` is on the opposite side. Returns the refracted direction and the
/// relative index of refraction actually used, or `None` on total internal
/// reflection.
///
/// * `wi`  - Incident direction.
/// * `n`   - Surface normal.
/// * `eta` - Ratio of indices of refraction (inside over outside).
pub fn refract(wi: &Vector3f, n: &Vector3f, eta: Float) -> Option<(Vector3f, Float)> {
    let mut n = *n;
    let mut eta = eta;
    let mut cos_theta_i = n.dot(wi);
    if cos_theta_i < 0.0 {
        eta = 1.0 / eta;
        cos_theta_i = -cos_theta_i;
        n = -n;
    }

    // Snell's law.
    let sin2_theta_i = max(0.0, 1.0 - sqr(cos_theta_i));
    let sin2_theta_t = sin2_theta_i / sqr(eta);
    if sin2_theta_t >= 1.0 {
        return None;
    }
    let cos_theta_t = safe_sqrt(1.0 - sin2_theta_t);

    let wt = -(*wi) / eta + (cos_theta_i / eta - cos_theta_t) * n;
    Some((wt, eta))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
