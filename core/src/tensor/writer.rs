//! Tensor file writer used to build fixtures for tests.

use super::{TensorType, EXPECTED_HEADER, EXPECTED_VERSION};
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Description of a field to write.
pub struct FieldSpec {
    pub name: String,
    pub dtype: TensorType,
    pub shape: Vec<u64>,
    pub data: Vec<u8>,
}

impl FieldSpec {
    /// Create a new `FieldSpec`.
    ///
    /// * `name`  - Field name.
    /// * `dtype` - Data type.
    /// * `shape` - Extent of each dimension.
    /// * `data`  - Raw little endian payload.
    pub fn new(name: &str, dtype: TensorType, shape: &[u64], data: Vec<u8>) -> Self {
        Self {
            name: String::from(name),
            dtype,
            shape: shape.to_vec(),
            data,
        }
    }
}

/// Returns a unique path in the temporary directory.
///
/// * `stem` - Prefix for the file name.
pub fn temp_path(stem: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir()
        .join(format!("{}-{}-{}.tensor", stem, std::process::id(), n))
        .to_string_lossy()
        .into_owned()
}

/// Write a tensor file with the payloads stored after the header in field
/// order.
///
/// * `path`   - The file path.
/// * `fields` - The fields to write.
pub fn write_tensor_file(path: &str, fields: &[FieldSpec]) -> std::io::Result<()> {
    let header_size: usize = 12
        + 2
        + 4
        + fields
            .iter()
            .map(|f| 2 + f.name.len() + 2 + 1 + 8 + 8 * f.shape.len())
            .sum::<usize>();

    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(&EXPECTED_HEADER)?;
    w.write_all(&EXPECTED_VERSION)?;
    w.write_u32::<LittleEndian>(fields.len() as u32)?;

    let mut offset = header_size as u64;
    for f in fields {
        w.write_u16::<LittleEndian>(f.name.len() as u16)?;
        w.write_all(f.name.as_bytes())?;
        w.write_u16::<LittleEndian>(f.shape.len() as u16)?;
        w.write_u8(f.dtype as u8)?;
        w.write_u64::<LittleEndian>(offset)?;
        for s in f.shape.iter() {
            w.write_u64::<LittleEndian>(*s)?;
        }
        offset += f.data.len() as u64;
    }

    for f in fields {
        w.write_all(&f.data)?;
    }
    w.flush()
}
