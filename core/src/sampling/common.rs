//! Common sampling functions.

use crate::geometry::*;
use crate::pbrt::*;
use crate::rng::*;

/// Uniformly sample a direction on a hemisphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_hemisphere(u: &Point2f) -> Vector3f {
    let z = u[0];
    let r = safe_sqrt(1.0 - z * z);
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a hemisphere.
#[inline]
pub fn uniform_hemisphere_pdf() -> Float {
    INV_TWO_PI
}

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = safe_sqrt(1.0 - z * z);
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Uniformly sample a point on the disk using polar coordinates.
///
/// * `u` - The random sample point.
pub fn uniform_sample_disk_polar(u: &Point2f) -> Point2f {
    let r = u[0].sqrt();
    let theta = TWO_PI * u[1];
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let u_offset = Point2f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0);

    // Handle degeneracy at the origin.
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::zero();
    }

    // Apply concentric mapping to point
    let (r, theta) = if abs(u_offset.x) > abs(u_offset.y) {
        (u_offset.x, PI_OVER_FOUR * (u_offset.y / u_offset.x))
    } else {
        (
            u_offset.y,
            PI_OVER_TWO - PI_OVER_FOUR * (u_offset.x / u_offset.y),
        )
    };

    r * Point2f::new(theta.cos(), theta.sin())
}

/// Sample a direction on a hemisphere using cosine-weighted sampling.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = safe_sqrt(1.0 - d.x * d.x - d.y * d.y);
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted sampling a direction from a hemisphere.
///
/// * `cos_theta` - Cosine term of incident radiance.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Result of sampling a discrete distribution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiscreteSample {
    /// The sampled index.
    pub offset: usize,

    /// Probability of having picked `offset`.
    pub pmf: Float,

    /// The uniform sample remapped to [0, 1) within the chosen bucket so it
    /// can be reused.
    pub u_remapped: Float,
}

/// Sample an index from a list of non-negative weights. Returns `None` if the
/// weights are empty or sum to zero.
///
/// * `weights` - Unnormalized weights.
/// * `u`       - Uniform sample in [0, 1).
pub fn sample_discrete(weights: &[Float], u: Float) -> Option<DiscreteSample> {
    let sum_weights: Float = weights.iter().sum();
    if weights.is_empty() || !(sum_weights > 0.0) {
        return None;
    }

    // Compute rescaled `u` sample.
    let mut up = u * sum_weights;
    if up == sum_weights {
        up = next_float_down(up);
    }

    // Find offset in weights corresponding to `u`.
    let mut offset = 0;
    let mut sum = 0.0;
    while offset + 1 < weights.len() && sum + weights[offset] <= up {
        sum += weights[offset];
        offset += 1;
    }

    let w = weights[offset];
    Some(DiscreteSample {
        offset,
        pmf: w / sum_weights,
        u_remapped: if w > 0.0 {
            min((up - sum) / w, ONE_MINUS_EPSILON)
        } else {
            0.0
        },
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
