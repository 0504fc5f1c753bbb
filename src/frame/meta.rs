//! Frame metadata carried alongside a CCD
//!
//! Neither type is interpreted by the frame algebra: derived CCDs hold the
//! same `Arc` as their source operand.

pub mod header;
pub mod time;

pub use header::{Header, HeaderEntry, HeaderValue};
pub use time::Time;
