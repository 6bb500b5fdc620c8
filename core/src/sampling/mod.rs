//! Sampling

mod common;
mod logistic;

// Re-export
pub use common::*;
pub use logistic::*;
