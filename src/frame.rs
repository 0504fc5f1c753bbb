//! Windowed CCD frame model
//!
//! This module provides the in-memory representation of multi-window
//! detector readouts, with separate modules for the window sub-image, the
//! CCD container and the metadata carried alongside it.

pub mod ccd;
pub mod common;
pub mod meta;
pub mod window;

pub use common::{FrameError, Result};

pub use meta::{Header, HeaderEntry, HeaderValue, Time};

pub use window::{PixelKind, Pixels, Window, WindowOp, WindowOperand, WindowRenderer};

pub use ccd::{Ccd, CentileSpec, Centiles, Operand, ValidationConfig, ValidationConfigBuilder};
