//! Tensor files
//!
//! A tensor file is a little endian container of named n-dimensional arrays:
//!
//! ```text
//! offset 0:  12 bytes  "tensor_file\0"
//! offset 12: 2 bytes   version (1, 0)
//! offset 14: 4 bytes   number of fields (u32)
//! per field:
//!   u16 name length, name, u16 rank, u8 type, u64 data offset, rank x u64 shape
//! ```

use std::collections::btree_map::Iter;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;

mod reader;
mod tensor_field;
mod tensor_type;
#[cfg(test)]
pub(crate) mod writer;

// Re-export
pub use reader::*;
pub use tensor_field::*;
pub use tensor_type::*;

/// Header, version and field count.
const MIN_FILE_SIZE: u64 = 12 + 2 + 4;

/// Contents of a tensor file.
#[derive(Clone, Debug)]
pub struct Tensor {
    /// Path of the file that was loaded.
    filename: String,

    /// Total size of the file in bytes.
    size: u64,

    /// Fields by name.
    fields: BTreeMap<String, TensorField>,
}

impl Tensor {
    /// Load a tensor file. Any I/O failure or malformed header fails the whole
    /// load.
    ///
    /// * `path` - The file path.
    pub fn from_file(path: &str) -> Result<Self, String> {
        Self::read(path).map_err(|err| format!("{}: Tensor: {}", path, err))
    }

    /// Reads the tensor file.
    ///
    /// * `path` - The file path.
    fn read(path: &str) -> Result<Self, String> {
        let mut file = open_file(path)?;

        let size = file.file_size()?;
        if size < MIN_FILE_SIZE {
            return Err(String::from("Invalid tensor file: too small, truncated?"));
        }

        file.check_header()?;
        file.check_version()?;
        let n_fields = file.read_le_u32()?;

        let mut fields = BTreeMap::new();
        for _ in 0..n_fields {
            let name_length = file.read_le_u16()?;
            let name = file.read_bytes(name_length as usize)?;
            let name = String::from_utf8_lossy(&name).into_owned();

            let ndim = file.read_le_u16()?;
            let dtype = TensorType::try_from(file.read_byte()?)?;
            let offset = file.read_le_u64()?;

            let mut shape = Vec::with_capacity(ndim as usize);
            let mut total_size = dtype.size() as u64;
            for _ in 0..ndim {
                let extent = file.read_le_u64()?;
                total_size = total_size
                    .checked_mul(extent)
                    .ok_or_else(|| format!("Field '{}' is too large.", name))?;
                shape.push(extent as usize);
            }

            if total_size > size {
                return Err(format!(
                    "Field '{}' needs {} bytes but file has {} bytes, truncated?",
                    name, total_size, size
                ));
            }
            let data = file.read_bytes_at(offset, total_size as usize)?;

            debug!("{}: field '{}' {} {:?}", path, name, dtype, shape);
            fields.insert(
                name,
                TensorField {
                    dtype,
                    offset,
                    shape,
                    data,
                },
            );
        }

        Ok(Self {
            filename: String::from(path),
            size,
            fields,
        })
    }

    /// Returns the path of the loaded file.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the total file size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if the file contains a field with the given name.
    ///
    /// * `name` - Field name.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the field with the given name.
    ///
    /// * `name` - Field name.
    pub fn field(&self, name: &str) -> Option<&TensorField> {
        self.fields.get(name)
    }

    /// Returns an iterator over the fields sorted by name.
    pub fn fields(&self) -> Iter<'_, String, TensorField> {
        self.fields.iter()
    }
}

impl fmt::Display for Tensor {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tensor[")?;
        writeln!(f, "  filename = \"{}\",", self.filename)?;
        writeln!(f, "  size = {},", self.size)?;
        writeln!(f, "  fields = {{")?;

        let n = self.fields.len();
        for (i, (name, field)) in self.fields.iter().enumerate() {
            let shape: Vec<String> = field.shape.iter().map(|s| s.to_string()).collect();
            writeln!(f, "    \"{}\" => [", name)?;
            writeln!(f, "      dtype = {},", field.dtype)?;
            writeln!(f, "      offset = {},", field.offset)?;
            writeln!(f, "      shape = [{}]", shape.join(", "))?;
            writeln!(f, "    ]{}", if i + 1 < n { "," } else { "" })?;
        }

        writeln!(f, "  }}")?;
        write!(f, "]")
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
