use ndarray::{Array2, s};
use tracing::debug;

use crate::frame::common::error::{FrameError, Result};
use crate::frame::window::types::{PixelKind, Pixels, Window};

impl Window {
    /// First unbinned column past the right edge.
    pub fn x_end(&self) -> usize {
        self.llx + self.nx() * self.xbin
    }

    /// First unbinned row past the top edge.
    pub fn y_end(&self) -> usize {
        self.lly + self.ny() * self.ybin
    }

    /// True if `other`'s region lies inside this window and its binning
    /// factors are integer multiples of ours.
    pub fn encloses(&self, other: &Window) -> bool {
        other.xbin % self.xbin == 0
            && other.ybin % self.ybin == 0
            && self.llx <= other.llx
            && self.lly <= other.lly
            && other.x_end() <= self.x_end()
            && other.y_end() <= self.y_end()
    }

    /// True if `crop_to(other)` will succeed: `other` must be enclosed and
    /// its corner must fall on a pixel boundary of this window.
    pub fn can_crop_to(&self, other: &Window) -> bool {
        self.encloses(other)
            && (other.llx - self.llx) % self.xbin == 0
            && (other.lly - self.lly) % self.ybin == 0
    }

    /// Extracts the region and binning of `other`, summing blocks of pixels
    /// when `other` is more coarsely binned. Plain extraction keeps this
    /// window's pixel kind; block sums of integer pixels are stored as
    /// 8-byte floats since they can exceed the u16 range.
    pub fn crop_to(&self, other: &Window) -> Result<Window> {
        if !self.can_crop_to(other) {
            return Err(FrameError::InvalidWindow(format!(
                "cannot crop [{}] to [{}]",
                self.format(),
                other.format()
            )));
        }

        let x0 = (other.llx - self.llx) / self.xbin;
        let y0 = (other.lly - self.lly) / self.ybin;
        let rx = other.xbin / self.xbin;
        let ry = other.ybin / self.ybin;
        let (nx, ny) = (other.nx(), other.ny());

        let data = if rx == 1 && ry == 1 {
            self.data.block(y0, x0, ny, nx)
        } else {
            debug!("Rebinning crop by {}x{}", rx, ry);
            let src = self.data.to_f64();
            let binned = Array2::from_shape_fn((ny, nx), |(iy, ix)| {
                let ys = y0 + iy * ry;
                let xs = x0 + ix * rx;
                src.slice(s![ys..ys + ry, xs..xs + rx]).sum()
            });
            let kind = if self.kind().is_integer() {
                PixelKind::F64
            } else {
                self.kind()
            };
            Pixels::from_f64(binned, kind)
        };

        Ok(Window {
            llx: other.llx,
            lly: other.lly,
            xbin: other.xbin,
            ybin: other.ybin,
            data,
        })
    }

    /// True if the two windows share any unbinned pixel.
    pub fn overlaps(&self, other: &Window) -> bool {
        self.llx < other.x_end()
            && other.llx < self.x_end()
            && self.lly < other.y_end()
            && other.lly < self.y_end()
    }

    /// True if the window lies within a `nxmax` x `nymax` frame.
    pub fn fits_within(&self, nxmax: usize, nymax: usize) -> bool {
        self.x_end() <= nxmax && self.y_end() <= nymax
    }
}
