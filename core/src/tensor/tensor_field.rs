//! Tensor Field

use super::TensorType;
use byteorder::{ByteOrder, LittleEndian};

/// A named n-dimensional array stored in a tensor file.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorField {
    /// Data type of the elements.
    pub dtype: TensorType,

    /// Absolute offset of the payload in the file.
    pub offset: u64,

    /// Extent of each dimension.
    pub shape: Vec<usize>,

    /// Raw little endian payload.
    pub data: Vec<u8>,
}

impl TensorField {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Returns `true` if the field has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Decode the payload as 32-bit floats. Returns `None` for any other
    /// data type.
    pub fn as_f32_vec(&self) -> Option<Vec<f32>> {
        if self.dtype != TensorType::Float32 || self.data.len() != 4 * self.len() {
            return None;
        }
        let mut values = vec![0.0_f32; self.len()];
        LittleEndian::read_f32_into(&self.data, &mut values);
        Some(values)
    }
}
