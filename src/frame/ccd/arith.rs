//! CCD arithmetic.
//!
//! The right-hand side is either another CCD, whose windows are paired with
//! ours by position, or a scalar applied to every window. Pairing stops at
//! the shorter window list unless the caller opts into
//! [`ValidationConfig::match_window_counts`].
//!
//! Value-returning forms build new windows and mark the result good only if
//! both CCD operands are good; a scalar leaves validity unchanged. In-place
//! forms leave `good` alone.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use tracing::trace;

use crate::frame::ccd::types::Ccd;
use crate::frame::ccd::validation::ValidationConfig;
use crate::frame::common::error::{FrameError, Result};
use crate::frame::window::{Window, WindowOp};

#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Frame(&'a Ccd),
    Scalar(f64),
}

impl<'a> From<&'a Ccd> for Operand<'a> {
    fn from(ccd: &'a Ccd) -> Self {
        Operand::Frame(ccd)
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl Ccd {
    /// Fails on the first window pair whose shapes differ.
    fn check_shapes(&self, other: &Ccd) -> Result<()> {
        self.iter().zip(other).try_for_each(|(win, owin)| {
            let (dim, odim) = (win.data().dim(), owin.data().dim());
            if dim != odim {
                return Err(FrameError::ShapeMismatch(dim, odim));
            }
            Ok(())
        })
    }

    /// `self op= rhs`. On error no window has been modified.
    pub fn apply<'a>(&mut self, op: WindowOp, rhs: impl Into<Operand<'a>>) -> Result<&mut Self> {
        match rhs.into() {
            Operand::Frame(other) => {
                self.check_shapes(other)?;
                trace!(op = %op.symbol(), pairs = self.nwin().min(other.nwin()), "In-place CCD arithmetic");
                for (win, owin) in self.iter_mut().zip(other) {
                    win.apply(op, owin)?;
                }
            }
            Operand::Scalar(value) => {
                for win in self.iter_mut() {
                    win.apply(op, value)?;
                }
            }
        }
        Ok(self)
    }

    /// `self op rhs` as a new CCD sharing this CCD's time and header.
    pub fn combine<'a>(&self, op: WindowOp, rhs: impl Into<Operand<'a>>) -> Result<Ccd> {
        match rhs.into() {
            Operand::Frame(other) => {
                trace!(op = %op.symbol(), pairs = self.nwin().min(other.nwin()), "CCD arithmetic");
                let wins = self
                    .iter()
                    .zip(other)
                    .map(|(win, owin)| win.combine(op, owin))
                    .collect::<Result<Vec<Window>>>()?;
                Ok(self.with_windows(wins, self.good && other.good))
            }
            Operand::Scalar(value) => {
                let wins = self
                    .iter()
                    .map(|win| win.combine(op, value))
                    .collect::<Result<Vec<Window>>>()?;
                Ok(self.with_windows(wins, self.good))
            }
        }
    }

    /// `lhs op self` for a scalar `lhs`.
    pub fn reflect(&self, op: WindowOp, lhs: f64) -> Ccd {
        let wins = self.iter().map(|win| win.reflect(op, lhs)).collect();
        self.with_windows(wins, self.good)
    }

    /// [`Ccd::apply`] with the pairing checks of `config`.
    pub fn apply_checked<'a>(
        &mut self,
        op: WindowOp,
        rhs: impl Into<Operand<'a>>,
        config: &ValidationConfig,
    ) -> Result<&mut Self> {
        let rhs = rhs.into();
        if let Operand::Frame(other) = rhs {
            self.check_pairing(other, config)?;
        }
        self.apply(op, rhs)
    }

    /// [`Ccd::combine`] with the pairing checks of `config`.
    pub fn combine_checked<'a>(
        &self,
        op: WindowOp,
        rhs: impl Into<Operand<'a>>,
        config: &ValidationConfig,
    ) -> Result<Ccd> {
        let rhs = rhs.into();
        if let Operand::Frame(other) = rhs {
            self.check_pairing(other, config)?;
        }
        self.combine(op, rhs)
    }
}

macro_rules! ccd_operator {
    ($op:ident, $Trait:ident, $method:ident, $AssignTrait:ident, $assign_method:ident) => {
        impl $AssignTrait<f64> for Ccd {
            fn $assign_method(&mut self, rhs: f64) {
                for win in self.iter_mut() {
                    win.$assign_method(rhs);
                }
            }
        }

        /// # Panics
        ///
        /// Panics, leaving `self` unchanged, if paired windows differ in
        /// shape.
        impl $AssignTrait<&Ccd> for Ccd {
            fn $assign_method(&mut self, rhs: &Ccd) {
                if let Err(e) = self.apply(WindowOp::$op, rhs) {
                    panic!("{e}");
                }
            }
        }

        impl $Trait<f64> for &Ccd {
            type Output = Ccd;

            fn $method(self, rhs: f64) -> Ccd {
                let wins = self.iter().map(|win| win.$method(rhs)).collect();
                self.with_windows(wins, self.good)
            }
        }

        impl $Trait<f64> for Ccd {
            type Output = Ccd;

            fn $method(self, rhs: f64) -> Ccd {
                (&self).$method(rhs)
            }
        }

        /// # Panics
        ///
        /// Panics if paired windows differ in shape.
        impl $Trait<&Ccd> for &Ccd {
            type Output = Ccd;

            fn $method(self, rhs: &Ccd) -> Ccd {
                self.combine(WindowOp::$op, rhs)
                    .unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl $Trait<&Ccd> for f64 {
            type Output = Ccd;

            fn $method(self, rhs: &Ccd) -> Ccd {
                rhs.reflect(WindowOp::$op, self)
            }
        }
    };
}

ccd_operator!(Add, Add, add, AddAssign, add_assign);
ccd_operator!(Sub, Sub, sub, SubAssign, sub_assign);
ccd_operator!(Mul, Mul, mul, MulAssign, mul_assign);
ccd_operator!(Div, Div, div, DivAssign, div_assign);
