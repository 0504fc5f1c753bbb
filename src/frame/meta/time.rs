use std::fmt;

/// Central time of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Time {
    /// Modified Julian Date of the mid-exposure
    pub mjd: f64,
    /// Exposure length in seconds
    pub expose: f64,
    /// Whether the timestamp is considered reliable
    pub good: bool,
    /// Explanation when `good` is false
    pub reason: String,
}

impl Time {
    pub fn new(mjd: f64, expose: f64, good: bool, reason: impl Into<String>) -> Self {
        Self {
            mjd,
            expose,
            good,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MJD = {:.8}, exposure = {:.4} s, good = {}",
            self.mjd, self.expose, self.good
        )?;
        if !self.reason.is_empty() {
            write!(f, ", reason = {}", self.reason)?;
        }
        Ok(())
    }
}
