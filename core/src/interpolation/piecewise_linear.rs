//! Piecewise Linear 2D Distribution

use crate::geometry::*;
use crate::pbrt::*;
use crate::rng::*;
use std::mem::size_of;

/// A bilinearly interpolated function on `[0, 1]^2` sampled on a regular
/// `x_size * y_size` grid that can be evaluated, importance sampled and
/// inverted. The function may additionally depend on `N` parameters, each of
/// which has its own sorted grid of values. Lookups interpolate linearly
/// between the two nearest slices of every parameter.
///
/// Data is laid out as a sequence of `x_size * y_size` slices, one per
/// parameter combination, with the first parameter varying slowest.
#[derive(Clone, Debug)]
pub struct PiecewiseLinear2D<const N: usize> {
    /// Resolution of the discretized density function.
    size: (usize, usize),

    /// Size of a bilinear patch in the unit square.
    patch_size: Point2f,

    /// Inverse of `patch_size`.
    inv_patch_size: Point2f,

    /// Resolution of each parameter.
    param_size: [usize; N],

    /// Stride per parameter in units of slices. A parameter with a single
    /// value has stride 0.
    param_strides: [usize; N],

    /// Discretization of each parameter domain.
    param_values: [Vec<Float>; N],

    /// Density values.
    data: Vec<Float>,

    /// Marginal CDF in the y direction.
    marginal_cdf: Vec<Float>,

    /// Conditional CDF in the x direction.
    conditional_cdf: Vec<Float>,
}

/// Interpolation weights `(w0, w1)` for each parameter.
type ParamWeights<const N: usize> = [[Float; 2]; N];

impl<const N: usize> PiecewiseLinear2D<N> {
    /// Create a new `PiecewiseLinear2D`.
    ///
    /// * `data`         - Function values; `x_size * y_size` values for every
    ///                    combination of parameter values.
    /// * `x_size`       - Horizontal resolution (at least 2).
    /// * `y_size`       - Vertical resolution (at least 2).
    /// * `param_values` - Sorted grid of values for each parameter.
    /// * `normalize`    - Normalize each slice so it integrates to 1.
    /// * `build_cdf`    - Build the CDFs needed by `sample()` and `invert()`.
    ///                    This requires `normalize`.
    pub fn new(
        data: &[Float],
        x_size: usize,
        y_size: usize,
        param_values: [&[Float]; N],
        normalize: bool,
        build_cdf: bool,
    ) -> Result<Self, String> {
        if build_cdf && !normalize {
            return Err(String::from(
                "PiecewiseLinear2D: build_cdf implies normalize=true",
            ));
        }
        if x_size < 2 || y_size < 2 {
            return Err(format!(
                "PiecewiseLinear2D: resolution must be at least 2x2, got {}x{}",
                x_size, y_size
            ));
        }

        // Keep track of the dependence on additional parameters.
        let mut param_size = [0; N];
        let mut param_strides = [0; N];
        let mut slices = 1;
        for i in (0..N).rev() {
            let n = param_values[i].len();
            if n < 1 {
                return Err(format!(
                    "PiecewiseLinear2D: parameter {} has no values",
                    i
                ));
            }
            param_size[i] = n;
            param_strides[i] = if n > 1 { slices } else { 0 };
            slices *= n;
        }

        let n_values = x_size * y_size;
        if data.len() != slices * n_values {
            return Err(format!(
                "PiecewiseLinear2D: expected {} values ({} slices of {}x{}), got {}",
                slices * n_values,
                slices,
                x_size,
                y_size,
                data.len()
            ));
        }

        let mut data_out = vec![0.0; slices * n_values];
        let mut marginal_cdf = vec![];
        let mut conditional_cdf = vec![];

        let inv_patch_size = Point2f::new((x_size - 1) as Float, (y_size - 1) as Float);

        if build_cdf {
            marginal_cdf = vec![0.0; slices * y_size];
            conditional_cdf = vec![0.0; slices * n_values];

            for slice in 0..slices {
                let src = &data[slice * n_values..(slice + 1) * n_values];
                let conditional = &mut conditional_cdf[slice * n_values..(slice + 1) * n_values];
                let marginal = &mut marginal_cdf[slice * y_size..(slice + 1) * y_size];

                // Construct conditional CDF.
                for y in 0..y_size {
                    let mut sum = 0.0_f64;
                    let row = y * x_size;
                    conditional[row] = 0.0;
                    for x in 0..x_size - 1 {
                        sum += 0.5 * (src[row + x] as f64 + src[row + x + 1] as f64);
                        conditional[row + x + 1] = sum as Float;
                    }
                }

                // Construct marginal CDF.
                marginal[0] = 0.0;
                let mut sum = 0.0_f64;
                for y in 0..y_size - 1 {
                    sum += 0.5
                        * (conditional[(y + 1) * x_size - 1] as f64
                            + conditional[(y + 2) * x_size - 1] as f64);
                    marginal[y + 1] = sum as Float;
                }

                // Normalize CDFs and PDF.
                let normalization = 1.0 / marginal[y_size - 1];
                conditional.iter_mut().for_each(|c| *c *= normalization);
                marginal.iter_mut().for_each(|m| *m *= normalization);
                for (out, v) in data_out[slice * n_values..(slice + 1) * n_values]
                    .iter_mut()
                    .zip(src)
                {
                    *out = v * normalization;
                }
            }
        } else {
            for slice in 0..slices {
                let src = &data[slice * n_values..(slice + 1) * n_values];

                let mut normalization = 1.0 / (inv_patch_size.x * inv_patch_size.y);
                if normalize {
                    let mut sum = 0.0_f64;
                    for y in 0..y_size - 1 {
                        let i = y * x_size;
                        for x in 0..x_size - 1 {
                            let v00 = src[i + x];
                            let v10 = src[i + x + 1];
                            let v01 = src[i + x + x_size];
                            let v11 = src[i + x + 1 + x_size];
                            sum += (0.25 * (v00 + v10 + v01 + v11)) as f64;
                        }
                    }
                    normalization = (1.0 / sum) as Float;
                }

                for (out, v) in data_out[slice * n_values..(slice + 1) * n_values]
                    .iter_mut()
                    .zip(src)
                {
                    *out = v * normalization;
                }
            }
        }

        Ok(Self {
            size: (x_size, y_size),
            patch_size: Point2f::new(1.0 / (x_size - 1) as Float, 1.0 / (y_size - 1) as Float),
            inv_patch_size,
            param_size,
            param_strides,
            param_values: param_values.map(|v| v.to_vec()),
            data: data_out,
            marginal_cdf,
            conditional_cdf,
        })
    }

    /// Evaluate the density at position `pos`.
    ///
    /// * `pos`   - Position in `[0, 1]^2`.
    /// * `param` - Parameter values.
    pub fn evaluate(&self, pos: &Point2f, param: &[Float; N]) -> Float {
        let (weights, slice_offset) = self.param_weights(param);

        // Compute linear interpolation weights.
        let pos = pos.scale(&self.inv_patch_size);
        let offset = (
            min(pos.x as usize, self.size.0 - 2),
            min(pos.y as usize, self.size.1 - 2),
        );
        let w1 = Point2f::new(pos.x - offset.0 as Float, pos.y - offset.1 as Float);
        let w0 = Point2f::new(1.0 - w1.x, 1.0 - w1.y);

        let size = self.size.0 * self.size.1;
        let index = offset.0 + offset.1 * self.size.0 + slice_offset * size;

        let v00 = self.lookup(&self.data, 0, index, size, &weights);
        let v10 = self.lookup(&self.data, 1, index, size, &weights);
        let v01 = self.lookup(&self.data, self.size.0, index, size, &weights);
        let v11 = self.lookup(&self.data, self.size.0 + 1, index, size, &weights);

        (w0.y * (w0.x * v00 + w1.x * v10) + w1.y * (w0.x * v01 + w1.x * v11))
            * self.inv_patch_size.x
            * self.inv_patch_size.y
    }

    /// Warp a uniformly distributed sample to the distribution. Returns the
    /// warped point and its density.
    ///
    /// * `u`     - Uniform sample in `[0, 1)^2`.
    /// * `param` - Parameter values.
    pub fn sample(&self, u: &Point2f, param: &[Float; N]) -> (Point2f, Float) {
        debug_assert!(!self.marginal_cdf.is_empty(), "sample() requires CDFs");

        // Avoid degeneracies at the extrema.
        let mut sample = Point2f::new(
            clamp(u.x, 1.0 - ONE_MINUS_EPSILON, ONE_MINUS_EPSILON),
            clamp(u.y, 1.0 - ONE_MINUS_EPSILON, ONE_MINUS_EPSILON),
        );

        let (weights, slice_offset) = self.param_weights(param);
        let (x_size, y_size) = self.size;
        let n_values = x_size * y_size;

        // Sample the row first.
        let marginal_offset = slice_offset * y_size;
        let fetch_marginal =
            |idx: usize| self.lookup(&self.marginal_cdf, 0, marginal_offset + idx, y_size, &weights);
        let row = find_interval(y_size, |idx| fetch_marginal(idx) < sample.y);
        sample.y -= fetch_marginal(row);

        let offset = row * x_size + slice_offset * n_values;
        let cdf = &self.conditional_cdf;
        let r0 = self.lookup(cdf, x_size - 1, offset, n_values, &weights);
        let r1 = self.lookup(cdf, 2 * x_size - 1, offset, n_values, &weights);

        let is_const = abs(r0 - r1) < 1e-4 * (r0 + r1);
        sample.y = if is_const {
            2.0 * sample.y / (r0 + r1)
        } else {
            (r0 - safe_sqrt(r0 * r0 - 2.0 * sample.y * (r0 - r1))) / (r0 - r1)
        };

        // Sample the column next.
        sample.x *= (1.0 - sample.y) * r0 + sample.y * r1;

        let fetch_conditional = |idx: usize| {
            let v0 = self.lookup(cdf, 0, offset + idx, n_values, &weights);
            let v1 = self.lookup(cdf, x_size, offset + idx, n_values, &weights);
            (1.0 - sample.y) * v0 + sample.y * v1
        };
        let col = find_interval(x_size, |idx| fetch_conditional(idx) < sample.x);
        sample.x -= fetch_conditional(col);

        let offset = offset + col;
        let v00 = self.lookup(&self.data, 0, offset, n_values, &weights);
        let v10 = self.lookup(&self.data, 1, offset, n_values, &weights);
        let v01 = self.lookup(&self.data, x_size, offset, n_values, &weights);
        let v11 = self.lookup(&self.data, x_size + 1, offset, n_values, &weights);
        let c0 = (1.0 - sample.y) * v00 + sample.y * v01;
        let c1 = (1.0 - sample.y) * v10 + sample.y * v11;

        let is_const = abs(c0 - c1) < 1e-4 * (c0 + c1);
        sample.x = if is_const {
            2.0 * sample.x / (c0 + c1)
        } else {
            (c0 - safe_sqrt(c0 * c0 - 2.0 * sample.x * (c0 - c1))) / (c0 - c1)
        };

        let p = Point2f::new(
            (col as Float + sample.x) * self.patch_size.x,
            (row as Float + sample.y) * self.patch_size.y,
        );
        let pdf = ((1.0 - sample.x) * c0 + sample.x * c1)
            * self.inv_patch_size.x
            * self.inv_patch_size.y;
        (p, pdf)
    }

    /// Inverse of `sample()`. Maps a point of the domain back to the uniform
    /// sample that produces it and returns the density at that point.
    ///
    /// * `p`     - Position in `[0, 1]^2`.
    /// * `param` - Parameter values.
    pub fn invert(&self, p: &Point2f, param: &[Float; N]) -> (Point2f, Float) {
        debug_assert!(!self.marginal_cdf.is_empty(), "invert() requires CDFs");

        let (weights, slice_offset) = self.param_weights(param);
        let (x_size, y_size) = self.size;
        let n_values = x_size * y_size;

        // Fetch values at corners of bilinear patch.
        let mut sample = p.scale(&self.inv_patch_size);
        let pos = (
            min(sample.x as usize, x_size - 2),
            min(sample.y as usize, y_size - 2),
        );
        sample.x -= pos.0 as Float;
        sample.y -= pos.1 as Float;

        let offset = pos.0 + pos.1 * x_size + slice_offset * n_values;

        // Invert the x component.
        let v00 = self.lookup(&self.data, 0, offset, n_values, &weights);
        let v10 = self.lookup(&self.data, 1, offset, n_values, &weights);
        let v01 = self.lookup(&self.data, x_size, offset, n_values, &weights);
        let v11 = self.lookup(&self.data, x_size + 1, offset, n_values, &weights);

        let w1 = sample;
        let w0 = Point2f::new(1.0 - w1.x, 1.0 - w1.y);

        let c0 = w0.y * v00 + w1.y * v01;
        let c1 = w0.y * v10 + w1.y * v11;
        let pdf = w0.x * c0 + w1.x * c1;

        sample.x *= c0 + 0.5 * sample.x * (c1 - c0);

        let cdf = &self.conditional_cdf;
        let v0 = self.lookup(cdf, 0, offset, n_values, &weights);
        let v1 = self.lookup(cdf, x_size, offset, n_values, &weights);
        sample.x += (1.0 - sample.y) * v0 + sample.y * v1;

        let offset = pos.1 * x_size + slice_offset * n_values;
        let r0 = self.lookup(cdf, x_size - 1, offset, n_values, &weights);
        let r1 = self.lookup(cdf, 2 * x_size - 1, offset, n_values, &weights);
        sample.x /= (1.0 - sample.y) * r0 + sample.y * r1;

        // Invert the y component.
        sample.y *= r0 + 0.5 * sample.y * (r1 - r0);
        let offset = pos.1 + slice_offset * y_size;
        sample.y += self.lookup(&self.marginal_cdf, 0, offset, y_size, &weights);

        (
            sample,
            pdf * self.inv_patch_size.x * self.inv_patch_size.y,
        )
    }

    /// Returns the number of bytes used by the tables.
    pub fn bytes_used(&self) -> usize {
        let params: usize = self.param_values.iter().map(|v| v.len()).sum();
        size_of::<Float>()
            * (self.data.len() + self.marginal_cdf.len() + self.conditional_cdf.len() + params)
    }

    /// Look up interpolation weights and the starting slice for the given
    /// parameter values.
    ///
    /// * `param` - Parameter values.
    fn param_weights(&self, param: &[Float; N]) -> (ParamWeights<N>, usize) {
        let mut weights = [[1.0, 0.0]; N];
        let mut slice_offset = 0;
        for dim in 0..N {
            if self.param_size[dim] == 1 {
                continue;
            }

            let values = &self.param_values[dim];
            let index = find_interval(self.param_size[dim], |idx| values[idx] <= param[dim]);
            let p0 = values[index];
            let p1 = values[index + 1];

            let w1 = clamp((param[dim] - p0) / (p1 - p0), 0.0, 1.0);
            weights[dim] = [1.0 - w1, w1];
            slice_offset += self.param_strides[dim] * index;
        }
        (weights, slice_offset)
    }

    /// Multilinear lookup of `data[base + i0]` across the slices bracketing
    /// every parameter.
    ///
    /// * `data`    - Table to read.
    /// * `base`    - Offset within a slice.
    /// * `i0`      - Index of the first bracketing slice element.
    /// * `size`    - Number of elements per slice.
    /// * `weights` - Parameter interpolation weights.
    fn lookup(
        &self,
        data: &[Float],
        base: usize,
        i0: usize,
        size: usize,
        weights: &ParamWeights<N>,
    ) -> Float {
        self.lookup_dim(N, data, base, i0, size, weights)
    }

    /// Recursive helper for `lookup()`.
    fn lookup_dim(
        &self,
        dim: usize,
        data: &[Float],
        base: usize,
        i0: usize,
        size: usize,
        weights: &ParamWeights<N>,
    ) -> Float {
        if dim == 0 {
            return data[base + i0];
        }

        let i1 = i0 + self.param_strides[dim - 1] * size;
        let [w0, w1] = weights[dim - 1];
        let v0 = self.lookup_dim(dim - 1, data, base, i0, size, weights);
        if w1 == 0.0 {
            return v0 * w0;
        }
        let v1 = self.lookup_dim(dim - 1, data, base, i1, size, weights);
        v0 * w0 + v1 * w1
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
