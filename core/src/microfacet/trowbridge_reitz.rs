//! Trowbridge-Reitz Distribution

use super::MicrofacetDistribution;
use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::sampling::*;
use std::fmt;

/// Implements the anisotropic variant of the Trowbridge-Reitz distribution.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TrowbridgeReitzDistribution {
    /// For microfacets oriented perpendicular to the x-axis and where
    /// α = sqrt(2) * σ and σ is the RMS slope of microfacets.
    alpha_x: Float,

    /// For microfacets oriented perpendicular to the y-axis and where
    /// α = sqrt(2) * σ and σ is the RMS slope of microfacets.
    alpha_y: Float,
}

impl TrowbridgeReitzDistribution {
    /// Create a new `TrowbridgeReitzDistribution`. Very small roughness values
    /// are kept as-is so that `effectively_smooth()` can detect them.
    ///
    /// * `alpha_x` - For microfacets oriented perpendicular to the x-axis and
    ///               where α = sqrt(2) * σ and σ is the RMS slope of
    ///               microfacets.
    /// * `alpha_y` - For microfacets oriented perpendicular to the y-axis and
    ///               where α = sqrt(2) * σ and σ is the RMS slope of
    ///               microfacets.
    pub fn new(alpha_x: Float, alpha_y: Float) -> Self {
        assert!(
            alpha_x >= 0.0 && alpha_y >= 0.0,
            "Invalid roughness alpha_x={alpha_x}, alpha_y={alpha_y}"
        );
        Self { alpha_x, alpha_y }
    }

    /// Maps scalar roughness parameter in [0, 1] to alpha values where
    /// values close to 0 are near-perfect specular reflection.
    ///
    /// * `roughness` - Roughness parameter value.
    pub fn roughness_to_alpha(roughness: Float) -> Float {
        roughness.sqrt()
    }

    /// Returns α along the x-axis.
    pub fn alpha_x(&self) -> Float {
        self.alpha_x
    }

    /// Returns α along the y-axis.
    pub fn alpha_y(&self) -> Float {
        self.alpha_y
    }
}

impl MicrofacetDistribution for TrowbridgeReitzDistribution {
    /// Return the differential area of microfacets oriented with the surface
    /// normal `wm`.
    ///
    /// * `wm` - A sample normal from the distrubition of normal vectors.
    #[rustfmt::skip]
    fn d(&self, wm: &Vector3f) -> Float {
        let tan2_theta = tan_2_theta(wm);
        if tan2_theta.is_infinite() || tan2_theta.is_nan() {
            return 0.0;
        }

        let cos4_theta = sqr(cos_2_theta(wm));
        if cos4_theta < 1e-16 {
            return 0.0;
        }

        let e = tan2_theta * (sqr(cos_phi(wm) / self.alpha_x) +
                              sqr(sin_phi(wm) / self.alpha_y));
        1.0 / (PI * self.alpha_x * self.alpha_y * cos4_theta * sqr(1.0 + e))
    }

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `w` - The direction from camera/viewer.
    #[rustfmt::skip]
    fn lambda(&self, w: &Vector3f) -> Float {
        let tan2_theta = tan_2_theta(w);
        if tan2_theta.is_infinite() || tan2_theta.is_nan() {
            return 0.0;
        }

        // Compute α² for direction `w`.
        let alpha2 = sqr(cos_phi(w) * self.alpha_x) +
                     sqr(sin_phi(w) * self.alpha_y);
        ((1.0 + alpha2 * tan2_theta).sqrt() - 1.0) / 2.0
    }

    /// Returns a sample from the distribution of visible normals.
    ///
    /// * `w` - Direction from which microfacets are seen.
    /// * `u` - The 2D uniform random values.
    fn sample_wm(&self, w: &Vector3f, u: &Point2f) -> Vector3f {
        // Transform `w` to hemispherical configuration.
        let mut wh = Vector3f::new(self.alpha_x * w.x, self.alpha_y * w.y, w.z).normalize();
        if wh.z < 0.0 {
            wh = -wh;
        }

        // Find orthonormal basis for visible normal sampling.
        let t1 = if wh.z < 0.99999 {
            Vector3f::new(0.0, 0.0, 1.0).cross(&wh).normalize()
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let t2 = wh.cross(&t1);

        // Generate uniformly distributed points on the unit disk.
        let mut p = uniform_sample_disk_polar(u);

        // Warp hemispherical projection for visible normal sampling.
        let h = safe_sqrt(1.0 - sqr(p.x));
        p.y = lerp((1.0 + wh.z) / 2.0, h, p.y);

        // Reproject to hemisphere and transform normal to ellipsoid configuration.
        let pz = safe_sqrt(1.0 - sqr(p.x) - sqr(p.y));
        let nh = p.x * t1 + p.y * t2 + pz * wh;
        Vector3f::new(
            self.alpha_x * nh.x,
            self.alpha_y * nh.y,
            max(1e-6, nh.z),
        )
        .normalize()
    }

    /// Returns `true` if roughness is below 1e-3 along both axes.
    fn effectively_smooth(&self) -> bool {
        max(self.alpha_x, self.alpha_y) < 1e-3
    }
}

impl fmt::Display for TrowbridgeReitzDistribution {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ TrowbridgeReitzDistribution alpha_x: {} alpha_y: {} ]",
            self.alpha_x, self.alpha_y
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn effectively_smooth_threshold() {
        assert!(TrowbridgeReitzDistribution::new(0.0, 0.0).effectively_smooth());
        assert!(TrowbridgeReitzDistribution::new(0.0009, 0.0002).effectively_smooth());
        assert!(!TrowbridgeReitzDistribution::new(0.0009, 0.01).effectively_smooth());
    }

    #[test]
    fn roughness_to_alpha_is_sqrt() {
        let a = TrowbridgeReitzDistribution::roughness_to_alpha(0.25);
        assert!(approx_eq!(Float, a, 0.5, ulps = 2));
    }

    #[test]
    fn display() {
        let d = TrowbridgeReitzDistribution::new(0.5, 0.25);
        assert_eq!(
            format!("{}", d),
            "[ TrowbridgeReitzDistribution alpha_x: 0.5 alpha_y: 0.25 ]"
        );
    }

    #[test]
    fn projected_area_is_one() {
        // ∫ D(wm) cos(θm) dwm = 1 over the upper hemisphere.
        let distrib = TrowbridgeReitzDistribution::new(0.3, 0.6);
        let mut rng = RNG::new(7);
        let n = 200_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let wm = uniform_sample_hemisphere(&rng.uniform_point2f());
            sum += distrib.d(&wm) * abs_cos_theta(&wm) / uniform_hemisphere_pdf();
        }
        let estimate = sum / n as Float;
        assert!(approx_eq!(Float, estimate, 1.0, epsilon = 0.05), "{}", estimate);
    }

    #[test]
    fn visible_normals_integrate_to_one() {
        let distrib = TrowbridgeReitzDistribution::new(0.4, 0.4);
        let wo = Vector3f::new(0.3, -0.2, 0.9).normalize();
        let mut rng = RNG::new(11);
        let n = 200_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let wm = uniform_sample_hemisphere(&rng.uniform_point2f());
            sum += distrib.d_visible(&wo, &wm) / uniform_hemisphere_pdf();
        }
        let estimate = sum / n as Float;
        assert!(approx_eq!(Float, estimate, 1.0, epsilon = 0.05), "{}", estimate);
    }

    prop_point2!(unit_point2, f32, 0.0..1.0f32, 0.0..1.0f32);

    proptest! {
        #[test]
        fn sample_wm_is_unit_upper_hemisphere(
            u in unit_point2(),
            x in -1.0..1.0f32,
            y in -1.0..1.0f32,
            z in 0.05..1.0f32,
            alpha in 0.01..1.0f32,
        ) {
            let distrib = TrowbridgeReitzDistribution::new(alpha, alpha * 0.5);
            let w = Vector3f::new(x, y, z).normalize();
            let wm = distrib.sample_wm(&w, &u);
            prop_assert!(wm.z > 0.0);
            prop_assert!(approx_eq!(Float, wm.length(), 1.0, epsilon = 1e-4));
            prop_assert!(distrib.pdf(&w, &wm) >= 0.0);
        }

        #[test]
        fn g_is_bounded(x in -1.0..1.0f32, z in 0.01..1.0f32, alpha in 0.01..1.0f32) {
            let distrib = TrowbridgeReitzDistribution::new(alpha, alpha);
            let w = Vector3f::new(x, 0.0, z).normalize();
            let g1 = distrib.g1(&w);
            prop_assert!((0.0..=1.0).contains(&g1));
            prop_assert!(distrib.g(&w, &w) <= g1 + 1e-6);
        }
    }
}
