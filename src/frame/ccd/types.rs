//! CCD container type

use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::frame::common::error::{FrameError, Result};
use crate::frame::meta::{Header, Time};
use crate::frame::window::{Window, WindowRenderer};

/// One detector readout.
///
/// Window order is significant: equality and CCD-CCD arithmetic pair
/// windows by position. Windows are expected to lie within
/// `[0, nxmax) x [0, nymax)` and not to overlap, but [`Ccd::new`] does not
/// check this; see [`Ccd::new_checked`].
///
/// Derived frames (arithmetic results, crops) share `time` and `head` with
/// their source through the same `Arc`.
#[derive(Debug, Clone)]
pub struct Ccd {
    data: Vec<Window>,
    /// Central time of the exposure
    pub time: Arc<Time>,
    /// Maximum unbinned X dimension
    pub nxmax: usize,
    /// Maximum unbinned Y dimension
    pub nymax: usize,
    /// False if the data are junk
    pub good: bool,
    pub head: Option<Arc<Header>>,
}

impl Ccd {
    pub fn new(
        wins: Vec<Window>,
        time: Arc<Time>,
        nxmax: usize,
        nymax: usize,
        good: bool,
        head: Option<Arc<Header>>,
    ) -> Self {
        Self {
            data: wins,
            time,
            nxmax,
            nymax,
            good,
            head,
        }
    }

    /// New frame with the given windows and this frame's metadata.
    pub(crate) fn with_windows(&self, wins: Vec<Window>, good: bool) -> Ccd {
        Ccd {
            data: wins,
            time: Arc::clone(&self.time),
            nxmax: self.nxmax,
            nymax: self.nymax,
            good,
            head: self.head.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of windows (alternative to `len`).
    pub fn nwin(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[Window] {
        &self.data
    }

    pub fn set_data(&mut self, wins: Vec<Window>) {
        self.data = wins;
    }

    pub fn get(&self, i: usize) -> Option<&Window> {
        self.data.get(i)
    }

    /// Replaces the `i`-th window.
    pub fn set(&mut self, i: usize, win: Window) -> Result<()> {
        let nwin = self.data.len();
        let slot = self
            .data
            .get_mut(i)
            .ok_or(FrameError::WindowIndex { index: i, nwin })?;
        *slot = win;
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Window> {
        self.data.iter_mut()
    }

    /// Plots every window through `renderer`.
    pub fn plot<R: WindowRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        vmin: f64,
        vmax: f64,
        use_primary: bool,
        colormap: &str,
    ) -> Result<()> {
        for win in &self.data {
            win.plot(renderer, vmin, vmax, use_primary, colormap)?;
        }
        Ok(())
    }

    /// One line per window describing its layout.
    pub fn format(&self) -> String {
        self.data
            .iter()
            .enumerate()
            .map(|(n, win)| format!("Window {} = {}\n", n + 1, win.format()))
            .collect()
    }
}

impl PartialEq for Ccd {
    fn eq(&self, other: &Self) -> bool {
        self.nxmax == other.nxmax
            && self.nymax == other.nymax
            && self.data.len() == other.data.len()
            && self.data.iter().zip(&other.data).all(|(a, b)| a == b)
    }
}

impl Index<usize> for Ccd {
    type Output = Window;

    fn index(&self, i: usize) -> &Window {
        &self.data[i]
    }
}

impl IndexMut<usize> for Ccd {
    fn index_mut(&mut self, i: usize) -> &mut Window {
        &mut self.data[i]
    }
}

impl<'a> IntoIterator for &'a Ccd {
    type Item = &'a Window;
    type IntoIter = std::slice::Iter<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a> IntoIterator for &'a mut Ccd {
    type Item = &'a mut Window;
    type IntoIter = std::slice::IterMut<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

impl fmt::Display for Ccd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(head) = &self.head {
            write!(f, "{head}")?;
        }
        writeln!(f)?;
        writeln!(f, "Time: {}", self.time)?;
        writeln!(
            f,
            "Dimensions = {}, {}, number of windows = {}, status = {}",
            self.nxmax,
            self.nymax,
            self.data.len(),
            self.good
        )?;
        for (n, win) in self.data.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Window number {}:", n + 1)?;
            writeln!(f, "{win}")?;
        }
        Ok(())
    }
}
