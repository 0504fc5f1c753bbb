//! Matching one CCD's window layout against another's.
//!
//! Matching is first-fit: for each target window the source windows are
//! scanned in order and the first suitable one is used, whether or not it
//! already served an earlier target.

use tracing::{debug, instrument};

use crate::frame::ccd::types::Ccd;
use crate::frame::common::error::{FrameError, Result};

impl Ccd {
    /// True if the maximum dimensions agree and every window of `other` is
    /// enclosed by some window of this CCD.
    pub fn can_crop_to(&self, other: &Ccd) -> bool {
        if self.nxmax != other.nxmax || self.nymax != other.nymax {
            return false;
        }
        other
            .iter()
            .all(|target| self.iter().any(|win| win.encloses(target)))
    }

    /// Crops this CCD to the layout of `other`, leaving `self` unchanged.
    /// The result shares this CCD's time, header and validity.
    #[instrument(skip(self, other), fields(targets = other.nwin()))]
    pub fn crop_to(&self, other: &Ccd) -> Result<Ccd> {
        if self.nxmax != other.nxmax || self.nymax != other.nymax {
            return Err(FrameError::DimensionMismatch {
                expected: (self.nxmax, self.nymax),
                found: (other.nxmax, other.nymax),
            });
        }

        let mut wins = Vec::with_capacity(other.nwin());
        for (n, target) in other.iter().enumerate() {
            let source = self
                .iter()
                .position(|win| win.can_crop_to(target))
                .ok_or(FrameError::CropMismatch(n + 1))?;
            debug!(window = n + 1, source = source + 1, "Matched crop window");
            wins.push(self[source].crop_to(target)?);
        }

        Ok(self.with_windows(wins, self.good))
    }
}
