//! Microfacet Distribution Models

use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;

mod trowbridge_reitz;

// Re-exports
pub use trowbridge_reitz::*;

/// Interface for microfacet distribution models.
pub trait MicrofacetDistribution {
    /// Return the differential area of microfacets oriented with the surface
    /// normal `wm`.
    ///
    /// * `wm` - A sample normal from the distrubition of normal vectors.
    fn d(&self, wm: &Vector3f) -> Float;

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `w` - The direction from camera/viewer.
    fn lambda(&self, w: &Vector3f) -> Float;

    /// Returns a sample from the distribution of visible normals as seen from
    /// direction `w`. The result is always in the upper hemisphere.
    ///
    /// * `w` - Direction from which microfacets are seen.
    /// * `u` - The 2D uniform random values.
    fn sample_wm(&self, w: &Vector3f, u: &Point2f) -> Vector3f;

    /// Returns `true` if the surface is so smooth that it should be treated
    /// as a perfect specular surface.
    fn effectively_smooth(&self) -> bool;

    /// Evaluates Smith's masking-shadowing function which gives the fraction of
    /// microfacets that are visible from a given direction.
    ///
    /// * `w` - The direction from camera/viewer.
    fn g1(&self, w: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(w))
    }

    /// Returns the fraction of microfacets in a differential area that are
    /// visible from both directions `wo` and `wi`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(wo) + self.lambda(wi))
    }

    /// Returns the distribution of normals visible from direction `w`.
    ///
    /// * `w`  - Direction from which microfacets are seen.
    /// * `wm` - Microfacet normal.
    fn d_visible(&self, w: &Vector3f, wm: &Vector3f) -> Float {
        let cos_theta_w = abs_cos_theta(w);
        if cos_theta_w == 0.0 {
            return 0.0;
        }
        self.g1(w) / cos_theta_w * self.d(wm) * w.abs_dot(wm)
    }

    /// Evaluates the PDF of `sample_wm()`.
    ///
    /// * `w`  - Direction from which microfacets are seen.
    /// * `wm` - Microfacet normal.
    fn pdf(&self, w: &Vector3f, wm: &Vector3f) -> Float {
        self.d_visible(w, wm)
    }
}
