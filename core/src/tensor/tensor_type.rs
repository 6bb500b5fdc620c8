//! Tensor Data Types

use std::convert::TryFrom;
use std::fmt;

/// Data type of a tensor field. The discriminants match the values stored
/// in tensor files.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TensorType {
    UInt8 = 1,
    Int8 = 2,
    UInt16 = 3,
    Int16 = 4,
    UInt32 = 5,
    Int32 = 6,
    UInt64 = 7,
    Int64 = 8,
    Float16 = 9,
    Float32 = 10,
    Float64 = 11,
}

impl TensorType {
    /// Returns the size in bytes of one element.
    pub fn size(&self) -> usize {
        match self {
            Self::UInt8 | Self::Int8 => 1,
            Self::UInt16 | Self::Int16 | Self::Float16 => 2,
            Self::UInt32 | Self::Int32 | Self::Float32 => 4,
            Self::UInt64 | Self::Int64 | Self::Float64 => 8,
        }
    }
}

impl TryFrom<u8> for TensorType {
    type Error = String;

    /// Convert a stored type tag to `TensorType`.
    ///
    /// * `v` - The type tag.
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::UInt8),
            2 => Ok(Self::Int8),
            3 => Ok(Self::UInt16),
            4 => Ok(Self::Int16),
            5 => Ok(Self::UInt32),
            6 => Ok(Self::Int32),
            7 => Ok(Self::UInt64),
            8 => Ok(Self::Int64),
            9 => Ok(Self::Float16),
            10 => Ok(Self::Float32),
            11 => Ok(Self::Float64),
            _ => Err(format!("Invalid tensor file: unknown type {}.", v)),
        }
    }
}

impl fmt::Display for TensorType {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UInt8 => "uint8_t",
            Self::Int8 => "int8_t",
            Self::UInt16 => "uint16_t",
            Self::Int16 => "int16_t",
            Self::UInt32 => "uint32_t",
            Self::Int32 => "int32_t",
            Self::UInt64 => "uint64_t",
            Self::Int64 => "int64_t",
            Self::Float16 => "float16_t",
            Self::Float32 => "float32_t",
            Self::Float64 => "float64_t",
        };
        write!(f, "{}", s)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
