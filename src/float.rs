//! Wrapper module to allow switching the float type globally.
//!
//! The float constants are glob imported into this module, so that other code
//! can write e.g. `float::PI` without caring which width is selected.

/// Type alias for the selected global float type
pub type Float = f32;

pub use std::f32::consts::*;
