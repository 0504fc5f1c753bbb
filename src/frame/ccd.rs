//! CCD module
//!
//! A CCD is the full readout of one detector: an ordered list of windows
//! plus frame-level metadata. Statistics, cropping and arithmetic operate
//! across all windows without assembling the full sensor image.

mod arith;
mod convert;
mod crop;
mod stats;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;

pub use arith::Operand;
pub use stats::{CentileSpec, Centiles};
pub use types::Ccd;
pub use validation::{ValidationConfig, ValidationConfigBuilder};
