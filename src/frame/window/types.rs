//! Window data types

use std::fmt;

use ndarray::{Array2, s};

use crate::frame::common::error::{FrameError, Result};

/// Element type of a window's pixel buffer, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelKind {
    /// 2-byte unsigned integer, the raw readout format
    U16,
    /// 4-byte float
    F32,
    /// 8-byte float
    F64,
}

impl PixelKind {
    pub fn is_integer(self) -> bool {
        matches!(self, PixelKind::U16)
    }

    pub fn is_float(self) -> bool {
        !self.is_integer()
    }

    /// Kind able to hold results of mixing `self` with `other`.
    pub fn wider(self, other: PixelKind) -> PixelKind {
        self.max(other)
    }
}

impl fmt::Display for PixelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelKind::U16 => "uint16",
            PixelKind::F32 => "float32",
            PixelKind::F64 => "float64",
        };
        f.write_str(name)
    }
}

/// Pixel buffer of shape `(ny, nx)`.
#[derive(Debug, Clone)]
pub enum Pixels {
    U16(Array2<u16>),
    F32(Array2<f32>),
    F64(Array2<f64>),
}

impl From<Array2<u16>> for Pixels {
    fn from(data: Array2<u16>) -> Self {
        Pixels::U16(data)
    }
}

impl From<Array2<f32>> for Pixels {
    fn from(data: Array2<f32>) -> Self {
        Pixels::F32(data)
    }
}

impl From<Array2<f64>> for Pixels {
    fn from(data: Array2<f64>) -> Self {
        Pixels::F64(data)
    }
}

/// Rounds half to even and saturates at the u16 range; NaN maps to 0.
fn to_u16(v: f64) -> u16 {
    v.round_ties_even() as u16
}

impl Pixels {
    pub fn kind(&self) -> PixelKind {
        match self {
            Pixels::U16(_) => PixelKind::U16,
            Pixels::F32(_) => PixelKind::F32,
            Pixels::F64(_) => PixelKind::F64,
        }
    }

    /// `(ny, nx)`
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Pixels::U16(a) => a.dim(),
            Pixels::F32(a) => a.dim(),
            Pixels::F64(a) => a.dim(),
        }
    }

    pub fn len(&self) -> usize {
        let (ny, nx) = self.dim();
        ny * nx
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in row-major order, widened to f64.
    pub fn iter_f64(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            Pixels::U16(a) => Box::new(a.iter().map(|&v| f64::from(v))),
            Pixels::F32(a) => Box::new(a.iter().map(|&v| f64::from(v))),
            Pixels::F64(a) => Box::new(a.iter().copied()),
        }
    }

    pub fn to_f64(&self) -> Array2<f64> {
        match self {
            Pixels::U16(a) => a.mapv(f64::from),
            Pixels::F32(a) => a.mapv(f64::from),
            Pixels::F64(a) => a.clone(),
        }
    }

    pub fn from_f64(values: Array2<f64>, kind: PixelKind) -> Pixels {
        match kind {
            PixelKind::U16 => Pixels::U16(values.mapv(to_u16)),
            PixelKind::F32 => Pixels::F32(values.mapv(|v| v as f32)),
            PixelKind::F64 => Pixels::F64(values),
        }
    }

    /// Converts to `kind`, leaving the buffer untouched if already there.
    pub fn into_kind(self, kind: PixelKind) -> Pixels {
        if self.kind() == kind {
            return self;
        }
        match (self, kind) {
            (Pixels::F32(a), PixelKind::U16) => Pixels::U16(a.mapv(|v| to_u16(f64::from(v)))),
            (Pixels::F64(a), PixelKind::F32) => Pixels::F32(a.mapv(|v| v as f32)),
            (other, kind) => Pixels::from_f64(other.to_f64(), kind),
        }
    }

    /// Copies the `ny` x `nx` block starting at binned pixel `(y0, x0)`.
    pub(crate) fn block(&self, y0: usize, x0: usize, ny: usize, nx: usize) -> Pixels {
        let region = s![y0..y0 + ny, x0..x0 + nx];
        match self {
            Pixels::U16(a) => Pixels::U16(a.slice(region).to_owned()),
            Pixels::F32(a) => Pixels::F32(a.slice(region).to_owned()),
            Pixels::F64(a) => Pixels::F64(a.slice(region).to_owned()),
        }
    }
}

/// A rectangular sub-image of the detector.
///
/// `llx`/`lly` give the lower-left corner in unbinned pixels (0-based);
/// `xbin`/`ybin` are the readout binning factors. The binned dimensions are
/// those of the pixel buffer, so a window covers the unbinned columns
/// `llx..llx + nx * xbin` and rows `lly..lly + ny * ybin`.
#[derive(Debug, Clone)]
pub struct Window {
    pub(crate) llx: usize,
    pub(crate) lly: usize,
    pub(crate) xbin: usize,
    pub(crate) ybin: usize,
    pub(crate) data: Pixels,
}

impl Window {
    pub fn new(
        llx: usize,
        lly: usize,
        xbin: usize,
        ybin: usize,
        data: impl Into<Pixels>,
    ) -> Result<Self> {
        if xbin == 0 || ybin == 0 {
            return Err(FrameError::InvalidWindow(format!(
                "binning factors must be at least 1, got xbin={xbin}, ybin={ybin}"
            )));
        }
        Ok(Self {
            llx,
            lly,
            xbin,
            ybin,
            data: data.into(),
        })
    }

    /// Window with every pixel set to `value`, converted to `kind`.
    #[allow(clippy::too_many_arguments)]
    pub fn filled(
        llx: usize,
        lly: usize,
        nx: usize,
        ny: usize,
        xbin: usize,
        ybin: usize,
        kind: PixelKind,
        value: f64,
    ) -> Result<Self> {
        let data = Pixels::from_f64(Array2::from_elem((ny, nx), value), kind);
        Self::new(llx, lly, xbin, ybin, data)
    }

    pub fn zeros(
        llx: usize,
        lly: usize,
        nx: usize,
        ny: usize,
        xbin: usize,
        ybin: usize,
        kind: PixelKind,
    ) -> Result<Self> {
        Self::filled(llx, lly, nx, ny, xbin, ybin, kind, 0.0)
    }

    pub fn llx(&self) -> usize {
        self.llx
    }

    pub fn lly(&self) -> usize {
        self.lly
    }

    pub fn xbin(&self) -> usize {
        self.xbin
    }

    pub fn ybin(&self) -> usize {
        self.ybin
    }

    /// Binned width.
    pub fn nx(&self) -> usize {
        self.data.dim().1
    }

    /// Binned height.
    pub fn ny(&self) -> usize {
        self.data.dim().0
    }

    pub fn kind(&self) -> PixelKind {
        self.data.kind()
    }

    pub fn data(&self) -> &Pixels {
        &self.data
    }

    /// Replaces the pixel buffer. The window's binned dimensions follow the
    /// new buffer's shape.
    pub fn set_data(&mut self, data: impl Into<Pixels>) {
        self.data = data.into();
    }

    /// Converts the buffer in place. Integer targets are rounded to nearest.
    pub fn to_kind(&mut self, kind: PixelKind) {
        let data = std::mem::replace(&mut self.data, Pixels::U16(Array2::zeros((0, 0))));
        self.data = data.into_kind(kind);
    }

    /// One-line description of the window layout.
    pub fn format(&self) -> String {
        format!(
            "llx={}, lly={}, nx={}, ny={}, xbin={}, ybin={}",
            self.llx,
            self.lly,
            self.nx(),
            self.ny(),
            self.xbin,
            self.ybin
        )
    }
}

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.llx == other.llx
            && self.lly == other.lly
            && self.xbin == other.xbin
            && self.ybin == other.ybin
            && self.data.dim() == other.data.dim()
            && self
                .data
                .iter_f64()
                .zip(other.data.iter_f64())
                .all(|(a, b)| a == b)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "llx, lly = {}, {}; nx, ny = {}, {}; xbin, ybin = {}, {}; type = {}",
            self.llx,
            self.lly,
            self.nx(),
            self.ny(),
            self.xbin,
            self.ybin,
            self.kind()
        )?;
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => write!(
                f,
                "min = {}, max = {}, mean = {}",
                min,
                max,
                self.sum() / self.size() as f64
            ),
            _ => write!(f, "no pixels"),
        }
    }
}
