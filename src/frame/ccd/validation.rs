//! Opt-in structural checks for CCDs

use std::sync::Arc;

use tracing::debug;

use crate::frame::ccd::types::Ccd;
use crate::frame::common::error::{FrameError, Result};
use crate::frame::meta::{Header, Time};
use crate::frame::window::Window;

/// Which structural expectations to enforce.
///
/// The default enforces nothing, matching [`Ccd::new`].
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig {
    /// Every window must lie inside `nxmax` x `nymax`
    pub validate_bounds: bool,
    /// No two windows may share a pixel
    pub validate_overlap: bool,
    /// CCD-CCD arithmetic requires equal window counts instead of
    /// truncating to the shorter frame
    pub match_window_counts: bool,
}

impl ValidationConfig {
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }

    /// Enables every check.
    pub fn strict() -> Self {
        Self {
            validate_bounds: true,
            validate_overlap: true,
            match_window_counts: true,
        }
    }
}

/// Builder for ValidationConfig
#[derive(Default)]
pub struct ValidationConfigBuilder {
    validate_bounds: Option<bool>,
    validate_overlap: Option<bool>,
    match_window_counts: Option<bool>,
}

impl ValidationConfigBuilder {
    pub fn validate_bounds(mut self, enable: bool) -> Self {
        self.validate_bounds = Some(enable);
        self
    }

    pub fn validate_overlap(mut self, enable: bool) -> Self {
        self.validate_overlap = Some(enable);
        self
    }

    pub fn match_window_counts(mut self, enable: bool) -> Self {
        self.match_window_counts = Some(enable);
        self
    }

    pub fn build(self) -> ValidationConfig {
        let default = ValidationConfig::default();
        ValidationConfig {
            validate_bounds: self.validate_bounds.unwrap_or(default.validate_bounds),
            validate_overlap: self.validate_overlap.unwrap_or(default.validate_overlap),
            match_window_counts: self
                .match_window_counts
                .unwrap_or(default.match_window_counts),
        }
    }
}

impl Ccd {
    /// Like [`Ccd::new`] but runs the checks enabled in `config` first.
    pub fn new_checked(
        wins: Vec<Window>,
        time: Arc<Time>,
        nxmax: usize,
        nymax: usize,
        good: bool,
        head: Option<Arc<Header>>,
        config: &ValidationConfig,
    ) -> Result<Self> {
        let ccd = Self::new(wins, time, nxmax, nymax, good, head);
        ccd.validate(config)?;
        Ok(ccd)
    }

    /// Window numbers in errors are 1-based.
    pub fn validate(&self, config: &ValidationConfig) -> Result<()> {
        if config.validate_bounds {
            for (n, win) in self.iter().enumerate() {
                if !win.fits_within(self.nxmax, self.nymax) {
                    return Err(FrameError::OutOfBounds(n + 1, self.nxmax, self.nymax));
                }
            }
        }

        if config.validate_overlap {
            let wins = self.data();
            for (i, a) in wins.iter().enumerate() {
                for (j, b) in wins.iter().enumerate().skip(i + 1) {
                    if a.overlaps(b) {
                        return Err(FrameError::Overlap(i + 1, j + 1));
                    }
                }
            }
        }

        debug!(nwin = self.nwin(), "CCD passed validation");
        Ok(())
    }

    /// Fails if `config` demands equal window counts and `other` differs.
    pub fn check_pairing(&self, other: &Ccd, config: &ValidationConfig) -> Result<()> {
        if config.match_window_counts && self.nwin() != other.nwin() {
            return Err(FrameError::WindowCountMismatch(self.nwin(), other.nwin()));
        }
        Ok(())
    }
}
