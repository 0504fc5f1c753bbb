//! Window module
//!
//! A window is a rectangular, independently binned sub-image of a detector
//! readout. This module provides the typed pixel buffer, reductions,
//! geometric enclosure and cropping, and elementwise arithmetic.

mod arith;
mod geometry;
mod render;
mod stats;
pub mod types;


pub use arith::{WindowOp, WindowOperand};
pub use render::WindowRenderer;
pub use types::{PixelKind, Pixels, Window};
