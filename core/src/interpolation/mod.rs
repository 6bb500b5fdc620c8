//! Interpolation

mod piecewise_linear;

// Re-export
pub use piecewise_linear::*;
