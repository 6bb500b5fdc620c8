//! Measured BxDF Data

use super::*;
use crate::interpolation::PiecewiseLinear2D;
use crate::stat_inc;
use crate::tensor::{Tensor, TensorField, TensorType};
use std::mem::size_of;

/// Measured reflectance data loaded from a tensor file along with the
/// interpolants used to evaluate and sample it.
#[derive(Clone, Debug)]
pub struct MeasuredBxDFData {
    /// Path of the source file.
    filename: String,

    /// Wavelengths at which `spectra` is tabulated.
    wavelengths: Vec<Float>,

    /// Microfacet normal distribution.
    pub(crate) ndf: PiecewiseLinear2D<0>,

    /// Projected microfacet area.
    pub(crate) sigma: PiecewiseLinear2D<0>,

    /// Visible normal distribution conditioned on `(φo, θo)`.
    pub(crate) vndf: PiecewiseLinear2D<2>,

    /// Luminance warp conditioned on `(φo, θo)`.
    pub(crate) luminance: PiecewiseLinear2D<2>,

    /// Spectral reflectance conditioned on `(φo, θo, λ)`.
    pub(crate) spectra: PiecewiseLinear2D<3>,

    /// Data depends only on the azimuth difference.
    pub(crate) isotropic: bool,
}

/// The fields of a structurally valid BRDF file.
struct Fields<'a> {
    theta_i: &'a TensorField,
    phi_i: &'a TensorField,
    wavelengths: &'a TensorField,
    ndf: &'a TensorField,
    sigma: &'a TensorField,
    vndf: &'a TensorField,
    luminance: &'a TensorField,
    spectra: &'a TensorField,
}

impl<'a> Fields<'a> {
    /// Checks the field names, types and shapes. Returns a description of the
    /// first mismatch found.
    ///
    /// * `tensor` - The loaded tensor file.
    fn from_tensor(tensor: &'a Tensor) -> Result<Self, String> {
        schema_field(tensor, "description", TensorType::UInt8, 1)?;
        let jacobian = schema_field(tensor, "jacobian", TensorType::UInt8, 1)?;
        let theta_i = schema_field(tensor, "theta_i", TensorType::Float32, 1)?;
        let phi_i = schema_field(tensor, "phi_i", TensorType::Float32, 1)?;
        let wavelengths = schema_field(tensor, "wavelengths", TensorType::Float32, 1)?;
        let ndf = schema_field(tensor, "ndf", TensorType::Float32, 2)?;
        let sigma = schema_field(tensor, "sigma", TensorType::Float32, 2)?;
        let vndf = schema_field(tensor, "vndf", TensorType::Float32, 4)?;
        let luminance = schema_field(tensor, "luminance", TensorType::Float32, 4)?;
        let spectra = schema_field(tensor, "spectra", TensorType::Float32, 5)?;

        let n_phi = phi_i.shape[0];
        let n_theta = theta_i.shape[0];
        let checks = [
            (jacobian.shape[0] == 1, "jacobian must have a single entry"),
            (
                vndf.shape[0] == n_phi && vndf.shape[1] == n_theta,
                "vndf does not match the incident grid",
            ),
            (
                luminance.shape[0] == n_phi && luminance.shape[1] == n_theta,
                "luminance does not match the incident grid",
            ),
            (
                luminance.shape[2] == luminance.shape[3],
                "luminance slices are not square",
            ),
            (
                spectra.shape[0] == n_phi && spectra.shape[1] == n_theta,
                "spectra does not match the incident grid",
            ),
            (
                spectra.shape[2] == wavelengths.shape[0],
                "spectra does not match the wavelengths",
            ),
            (
                spectra.shape[3] == spectra.shape[4],
                "spectra slices are not square",
            ),
            (
                luminance.shape[2] == spectra.shape[3] && luminance.shape[3] == spectra.shape[4],
                "luminance and spectra resolutions differ",
            ),
        ];
        if let Some((_, reason)) = checks.iter().find(|(ok, _)| !ok) {
            return Err(String::from(*reason));
        }

        Ok(Self {
            theta_i,
            phi_i,
            wavelengths,
            ndf,
            sigma,
            vndf,
            luminance,
            spectra,
        })
    }
}

/// Returns the field with the given name if it has the expected type and rank.
///
/// * `tensor` - The loaded tensor file.
/// * `name`   - Field name.
/// * `dtype`  - Expected data type.
/// * `rank`   - Expected number of dimensions.
fn schema_field<'a>(
    tensor: &'a Tensor,
    name: &str,
    dtype: TensorType,
    rank: usize,
) -> Result<&'a TensorField, String> {
    let f = tensor
        .field(name)
        .ok_or_else(|| format!("missing field '{}'", name))?;
    if f.dtype != dtype || f.rank() != rank {
        return Err(format!(
            "field '{}' must be {} with rank {}, found {} with rank {}",
            name,
            dtype,
            rank,
            f.dtype,
            f.rank()
        ));
    }
    Ok(f)
}

/// Decode a field that is known to hold 32-bit floats.
///
/// * `name`  - Field name for diagnostics.
/// * `field` - The field.
fn floats(name: &str, field: &TensorField) -> Result<Vec<Float>, String> {
    field
        .as_f32_vec()
        .ok_or_else(|| format!("field '{}' has an invalid payload", name))
}

impl MeasuredBxDFData {
    /// Load a BRDF file and build its interpolants.
    ///
    /// Returns `Ok(None)` if the file does not have the expected structure.
    ///
    /// * `path` - The file path.
    pub fn from_file(path: &str) -> Result<Option<Self>, String> {
        let tensor = Tensor::from_file(path)?;
        Self::from_tensor(&tensor)
    }

    /// Build the interpolants from a loaded tensor file.
    ///
    /// Returns `Ok(None)` if the tensor does not have the expected structure
    /// and `Err` for data that is structurally valid but unsupported.
    ///
    /// * `tensor` - The loaded tensor file.
    pub fn from_tensor(tensor: &Tensor) -> Result<Option<Self>, String> {
        register_stats();

        let filename = tensor.filename();
        let fields = match Fields::from_tensor(tensor) {
            Ok(fields) => fields,
            Err(reason) => {
                error!(
                    "{}: invalid BRDF file structure ({}): {}",
                    filename, reason, tensor
                );
                return Ok(None);
            }
        };

        let err = |e: String| format!("{}: {}", filename, e);

        let theta_i = floats("theta_i", fields.theta_i).map_err(err)?;
        let phi_i = floats("phi_i", fields.phi_i).map_err(err)?;
        let wavelengths = floats("wavelengths", fields.wavelengths).map_err(err)?;

        let isotropic = phi_i.len() <= 2;
        if !isotropic {
            let range = phi_i[phi_i.len() - 1] - phi_i[0];
            let reduction = (TWO_PI / range).round() as i32;
            if reduction != 1 {
                return Err(format!(
                    "{}: reduction {} (!= 1) not supported",
                    filename, reduction
                ));
            }
        }

        let ndf_shape = &fields.ndf.shape;
        let ndf = PiecewiseLinear2D::new(
            &floats("ndf", fields.ndf).map_err(err)?,
            ndf_shape[1],
            ndf_shape[0],
            [],
            false,
            false,
        )
        .map_err(err)?;

        let sigma_shape = &fields.sigma.shape;
        let sigma = PiecewiseLinear2D::new(
            &floats("sigma", fields.sigma).map_err(err)?,
            sigma_shape[1],
            sigma_shape[0],
            [],
            false,
            false,
        )
        .map_err(err)?;

        let vndf_shape = &fields.vndf.shape;
        let vndf = PiecewiseLinear2D::new(
            &floats("vndf", fields.vndf).map_err(err)?,
            vndf_shape[3],
            vndf_shape[2],
            [phi_i.as_slice(), theta_i.as_slice()],
            true,
            true,
        )
        .map_err(err)?;

        let luminance_shape = &fields.luminance.shape;
        let luminance = PiecewiseLinear2D::new(
            &floats("luminance", fields.luminance).map_err(err)?,
            luminance_shape[3],
            luminance_shape[2],
            [phi_i.as_slice(), theta_i.as_slice()],
            true,
            true,
        )
        .map_err(err)?;

        let spectra_shape = &fields.spectra.shape;
        let spectra = PiecewiseLinear2D::new(
            &floats("spectra", fields.spectra).map_err(err)?,
            spectra_shape[4],
            spectra_shape[3],
            [phi_i.as_slice(), theta_i.as_slice(), wavelengths.as_slice()],
            false,
            false,
        )
        .map_err(err)?;

        let data = Self {
            filename: String::from(filename),
            wavelengths,
            ndf,
            sigma,
            vndf,
            luminance,
            spectra,
            isotropic,
        };

        stat_inc!(MEASURED_BRDF_MEMORY, data.bytes_used() as u64);
        stat_inc!(N_MEASURED_BRDF_FILES, 1);
        info!(
            "{}: loaded {} BRDF with {} wavelengths",
            filename,
            if isotropic { "isotropic" } else { "anisotropic" },
            data.wavelengths.len()
        );

        Ok(Some(data))
    }

    /// Returns the path of the source file.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the tabulated wavelengths.
    pub fn wavelengths(&self) -> &[Float] {
        &self.wavelengths
    }

    /// Returns `true` if the data depends only on the azimuth difference.
    pub fn is_isotropic(&self) -> bool {
        self.isotropic
    }

    /// Returns the number of bytes used by the data.
    pub fn bytes_used(&self) -> usize {
        size_of::<Self>()
            + size_of::<Float>() * self.wavelengths.len()
            + self.ndf.bytes_used()
            + self.sigma.bytes_used()
            + self.vndf.bytes_used()
            + self.luminance.bytes_used()
            + self.spectra.bytes_used()
    }
}

impl fmt::Display for MeasuredBxDFData {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ MeasuredBxDFData filename: {} ]", self.filename)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::measured_fixture::*;
    use super::*;
    use crate::tensor::writer::*;
    use std::fs;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn load(stem: &str, fields: &[FieldSpec]) -> Result<Option<MeasuredBxDFData>, String> {
        let path = temp_path(stem);
        write_tensor_file(&path, fields).unwrap();
        let result = MeasuredBxDFData::from_file(&path);
        fs::remove_file(&path).ok();
        result
    }

    #[test]
    fn loads_isotropic() {
        init();
        let path = write_isotropic_brdf("loads_isotropic");
        let data = MeasuredBxDFData::from_file(&path).unwrap().unwrap();
        assert_eq!(data.filename(), path);
        assert!(data.is_isotropic());
        assert_eq!(data.wavelengths(), &WAVELENGTHS);
        assert!(data.bytes_used() > size_of::<MeasuredBxDFData>());
        assert_eq!(
            data.to_string(),
            format!("[ MeasuredBxDFData filename: {} ]", path)
        );
        fs::remove_file(&path).ok();
    }

    #[test]
    fn tracks_memory() {
        init();
        let path = write_isotropic_brdf("tracks_memory");
        let before = MEASURED_BRDF_MEMORY.with(|v| *v.borrow());
        let data = MeasuredBxDFData::from_file(&path).unwrap().unwrap();
        let after = MEASURED_BRDF_MEMORY.with(|v| *v.borrow());
        assert_eq!(after - before, data.bytes_used() as u64);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_vndf_is_none() {
        init();
        let fields: Vec<FieldSpec> = measured_fields(&[0.0])
            .into_iter()
            .filter(|f| f.name != "vndf")
            .collect();
        assert!(load("missing_vndf_is_none", &fields).unwrap().is_none());
    }

    #[test]
    fn wrong_spectra_rank_is_none() {
        init();
        let mut fields = measured_fields(&[0.0]);
        let spectra = fields.iter_mut().find(|f| f.name == "spectra").unwrap();
        let n = spectra.shape.iter().product::<u64>();
        spectra.shape = vec![n];
        assert!(load("wrong_spectra_rank_is_none", &fields).unwrap().is_none());
    }

    #[test]
    fn mismatched_wavelengths_is_none() {
        init();
        let mut fields = measured_fields(&[0.0]);
        let wavelengths = fields.iter_mut().find(|f| f.name == "wavelengths").unwrap();
        wavelengths.shape = vec![1];
        wavelengths.data.truncate(4);
        assert!(load("mismatched_wavelengths_is_none", &fields)
            .unwrap()
            .is_none());
    }

    #[test]
    fn anisotropic_full_circle() {
        init();
        let fields = measured_fields(&[-PI, 0.0, PI]);
        let data = load("anisotropic_full_circle", &fields).unwrap().unwrap();
        assert!(!data.is_isotropic());
    }

    #[test]
    fn anisotropic_reduction_fails() {
        init();
        let fields = measured_fields(&[0.0, PI / 2.0, PI]);
        let err = load("anisotropic_reduction_fails", &fields).unwrap_err();
        assert!(err.contains("reduction 2"), "{}", err);
    }

    #[test]
    fn missing_file_fails() {
        init();
        let path = temp_path("missing_file_fails");
        assert!(MeasuredBxDFData::from_file(&path).is_err());
    }
}
