//! Small measured BRDF tensor files for tests.

use crate::pbrt::*;
use crate::tensor::writer::*;
use crate::tensor::TensorType;
use byteorder::{ByteOrder, LittleEndian};

/// Resolution of each 2D slice.
pub const GRID: usize = 8;

/// Incident elevations of the fixture.
pub const THETA_I: [Float; 3] = [0.0, 0.75, 1.5];

/// Wavelengths of the fixture.
pub const WAVELENGTHS: [Float; 2] = [360.0, 830.0];

/// Encode floats as a little endian payload.
///
/// * `values` - The values.
pub fn f32_bytes(values: &[Float]) -> Vec<u8> {
    let mut bytes = vec![0_u8; 4 * values.len()];
    LittleEndian::write_f32_into(values, &mut bytes);
    bytes
}

/// Values of one slice that vary only with the elevation coordinate.
///
/// * `f` - Function of the horizontal coordinate in `[0, 1]`.
fn slice<F: Fn(Float) -> Float>(f: F) -> Vec<Float> {
    let mut values = Vec::with_capacity(GRID * GRID);
    for _y in 0..GRID {
        for x in 0..GRID {
            values.push(f(x as Float / (GRID - 1) as Float));
        }
    }
    values
}

/// Returns the fields of a valid BRDF file for the given azimuth grid.
///
/// * `phi_i` - Incident azimuths.
pub fn measured_fields(phi_i: &[Float]) -> Vec<FieldSpec> {
    let n_phi = phi_i.len();
    let n_theta = THETA_I.len();
    let n_lambda = WAVELENGTHS.len();
    let g = GRID as u64;

    let ndf = slice(|x| 2.0 - x);
    let sigma = slice(|_| 1.0);

    let mut vndf = vec![];
    let mut luminance = vec![];
    let mut spectra = vec![];
    for _ in 0..n_phi {
        for t in 0..n_theta {
            vndf.extend(slice(|x| 1.0 + (t as Float + 1.0) * (1.0 - x)));
            luminance.extend(slice(|x| 1.0 + x));
            for l in 0..n_lambda {
                spectra.extend(slice(|x| 0.2 + 0.1 * l as Float + 0.3 * x));
            }
        }
    }

    vec![
        FieldSpec::new(
            "description",
            TensorType::UInt8,
            &[4],
            b"test".to_vec(),
        ),
        FieldSpec::new("jacobian", TensorType::UInt8, &[1], vec![1]),
        FieldSpec::new(
            "theta_i",
            TensorType::Float32,
            &[n_theta as u64],
            f32_bytes(&THETA_I),
        ),
        FieldSpec::new(
            "phi_i",
            TensorType::Float32,
            &[n_phi as u64],
            f32_bytes(phi_i),
        ),
        FieldSpec::new(
            "wavelengths",
            TensorType::Float32,
            &[n_lambda as u64],
            f32_bytes(&WAVELENGTHS),
        ),
        FieldSpec::new("ndf", TensorType::Float32, &[g, g], f32_bytes(&ndf)),
        FieldSpec::new("sigma", TensorType::Float32, &[g, g], f32_bytes(&sigma)),
        FieldSpec::new(
            "vndf",
            TensorType::Float32,
            &[n_phi as u64, n_theta as u64, g, g],
            f32_bytes(&vndf),
        ),
        FieldSpec::new(
            "luminance",
            TensorType::Float32,
            &[n_phi as u64, n_theta as u64, g, g],
            f32_bytes(&luminance),
        ),
        FieldSpec::new(
            "spectra",
            TensorType::Float32,
            &[n_phi as u64, n_theta as u64, n_lambda as u64, g, g],
            f32_bytes(&spectra),
        ),
    ]
}

/// Write an isotropic BRDF file to a fresh temporary path and return it.
///
/// * `stem` - Prefix for the file name.
pub fn write_isotropic_brdf(stem: &str) -> String {
    let path = temp_path(stem);
    write_tensor_file(&path, &measured_fields(&[0.0])).unwrap();
    path
}
