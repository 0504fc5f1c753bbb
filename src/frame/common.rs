//! Common utilities module
//!
//! This module contains shared utilities used across the frame model.

pub mod error;
pub mod stats;

pub use error::{FrameError, Result};
