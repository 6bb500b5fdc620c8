//! Core

extern crate bitflags;
#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod stats;

#[macro_use]
pub mod geometry;
pub mod interpolation;
pub mod microfacet;
pub mod pbrt;
pub mod reflection;
pub mod rng;
pub mod sampling;
pub mod spectrum;
pub mod tensor;
