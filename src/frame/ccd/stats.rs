//! Statistics over all windows of a CCD.
//!
//! Every statistic pools pixels across windows; none of them average
//! per-window results.

use tracing::{debug, instrument};

use crate::frame::ccd::types::Ccd;
use crate::frame::common::error::{FrameError, Result};
use crate::frame::window::PixelKind;
use crate::frame::common::stats::{
    median_sorted, nan_max, nan_min, percentile_sorted, sort_values,
};

/// Percentile argument: a single value or a list, each in [0, 100].
#[derive(Debug, Clone, PartialEq)]
pub enum CentileSpec {
    Single(f64),
    Many(Vec<f64>),
}

impl From<f64> for CentileSpec {
    fn from(pcent: f64) -> Self {
        CentileSpec::Single(pcent)
    }
}

impl From<Vec<f64>> for CentileSpec {
    fn from(pcents: Vec<f64>) -> Self {
        CentileSpec::Many(pcents)
    }
}

impl From<&[f64]> for CentileSpec {
    fn from(pcents: &[f64]) -> Self {
        CentileSpec::Many(pcents.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for CentileSpec {
    fn from(pcents: [f64; N]) -> Self {
        CentileSpec::Many(pcents.to_vec())
    }
}

/// Result of [`Ccd::centile`], shaped like its argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Centiles {
    Single(f64),
    Many(Vec<f64>),
}

impl Centiles {
    /// The value for a single percentile, or the first of several.
    pub fn first(&self) -> Option<f64> {
        match self {
            Centiles::Single(v) => Some(*v),
            Centiles::Many(vs) => vs.first().copied(),
        }
    }
}

impl Ccd {
    /// Total number of pixels.
    pub fn npix(&self) -> usize {
        self.iter().map(|win| win.size()).sum()
    }

    /// Sum of all pixel values over the total pixel count.
    pub fn mean(&self) -> Option<f64> {
        let npix = self.npix();
        if npix == 0 {
            return None;
        }
        let sum: f64 = self.iter().map(|win| win.sum()).sum();
        Some(sum / npix as f64)
    }

    /// Global minimum; NaN if any pixel is NaN.
    pub fn min(&self) -> Option<f64> {
        self.iter().filter_map(|win| win.min()).reduce(nan_min)
    }

    /// Global maximum; NaN if any pixel is NaN.
    pub fn max(&self) -> Option<f64> {
        self.iter().filter_map(|win| win.max()).reduce(nan_max)
    }

    fn pooled_sorted(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.npix());
        for win in self {
            values.extend(win.data().iter_f64());
        }
        sort_values(&mut values);
        values
    }

    /// Median of all pixels pooled across windows.
    pub fn median(&self) -> Option<f64> {
        median_sorted(&self.pooled_sorted())
    }

    /// Level below which `pcent` percent of the pooled pixel values lie,
    /// interpolating linearly between ranks.
    pub fn centile(&self, pcent: impl Into<CentileSpec>) -> Result<Centiles> {
        let sorted = self.pooled_sorted();
        let level = |p: f64| -> Result<f64> {
            percentile_sorted(&sorted, p)?.ok_or(FrameError::NoPixels)
        };
        match pcent.into() {
            CentileSpec::Single(p) => Ok(Centiles::Single(level(p)?)),
            CentileSpec::Many(ps) => ps
                .into_iter()
                .map(level)
                .collect::<Result<Vec<_>>>()
                .map(Centiles::Many),
        }
    }

    /// Subtracts each window's own median from it, in place. Integer
    /// windows are first converted to 4-byte floats so that pixels below
    /// the background keep their negative residuals.
    #[instrument(skip(self), fields(nwin = self.nwin()))]
    pub fn rback(&mut self) {
        for (n, win) in self.iter_mut().enumerate() {
            if win.kind().is_integer() {
                win.to_kind(PixelKind::F32);
            }
            if let Some(background) = win.median() {
                debug!(window = n + 1, background, "Removing background");
                *win -= background;
            }
        }
    }
}
