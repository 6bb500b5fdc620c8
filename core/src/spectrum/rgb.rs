//! RGB

use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, Index, Mul};

/// An RGB triple.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGB {
    /// Red.
    pub r: Float,

    /// Green.
    pub g: Float,

    /// Blue.
    pub b: Float,
}

impl RGB {
    /// Creates a new RGB triple.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b }
    }
}

impl Add for RGB {
    type Output = Self;

    /// Adds the corresponding components of another triple.
    ///
    /// * `other` - The other triple.
    fn add(self, other: Self) -> Self::Output {
        Self::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl Mul<RGB> for Float {
    type Output = RGB;

    /// Scales the components of a triple.
    ///
    /// * `c` - The triple.
    fn mul(self, c: RGB) -> Self::Output {
        RGB::new(self * c.r, self * c.g, self * c.b)
    }
}

impl Index<usize> for RGB {
    type Output = Float;

    /// Index the components in R, G, B order.
    ///
    /// * `i` - The index.
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            _ => panic!("Invalid index for std::Index on RGB"),
        }
    }
}

impl fmt::Display for RGB {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {}, {}, {} ]", self.r, self.g, self.b)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
