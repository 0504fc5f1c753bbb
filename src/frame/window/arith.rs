//! Elementwise window arithmetic.
//!
//! Values are computed in f64 and stored back in the target kind. In-place
//! results keep the left window's kind; a new window built from two windows
//! takes the wider of the two kinds.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use ndarray::{Array2, Zip};

use crate::frame::common::error::{FrameError, Result};
use crate::frame::window::types::{PixelKind, Pixels, Window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl WindowOp {
    pub fn eval(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            WindowOp::Add => lhs + rhs,
            WindowOp::Sub => lhs - rhs,
            WindowOp::Mul => lhs * rhs,
            WindowOp::Div => lhs / rhs,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            WindowOp::Add => '+',
            WindowOp::Sub => '-',
            WindowOp::Mul => '*',
            WindowOp::Div => '/',
        }
    }
}

/// Right-hand side of a window operation.
#[derive(Debug, Clone, Copy)]
pub enum WindowOperand<'a> {
    Window(&'a Window),
    Scalar(f64),
}

impl<'a> From<&'a Window> for WindowOperand<'a> {
    fn from(win: &'a Window) -> Self {
        WindowOperand::Window(win)
    }
}

impl From<f64> for WindowOperand<'_> {
    fn from(value: f64) -> Self {
        WindowOperand::Scalar(value)
    }
}

impl Window {
    fn scalar_values(&self, op: WindowOp, rhs: f64) -> Array2<f64> {
        let mut values = self.data.to_f64();
        values.mapv_inplace(|v| op.eval(v, rhs));
        values
    }

    fn paired_values(&self, op: WindowOp, other: &Window) -> Result<Array2<f64>> {
        let (lhs_dim, rhs_dim) = (self.data.dim(), other.data.dim());
        if lhs_dim != rhs_dim {
            return Err(FrameError::ShapeMismatch(lhs_dim, rhs_dim));
        }
        let mut values = self.data.to_f64();
        let rhs = other.data.to_f64();
        Zip::from(&mut values)
            .and(&rhs)
            .for_each(|v, &r| *v = op.eval(*v, r));
        Ok(values)
    }

    /// Applies `self op rhs` in place.
    pub fn apply<'a>(&mut self, op: WindowOp, rhs: impl Into<WindowOperand<'a>>) -> Result<()> {
        let values = match rhs.into() {
            WindowOperand::Window(other) => self.paired_values(op, other)?,
            WindowOperand::Scalar(value) => self.scalar_values(op, value),
        };
        self.data = Pixels::from_f64(values, self.kind());
        Ok(())
    }

    /// Returns `self op rhs` as a new window with this window's layout.
    pub fn combine<'a>(&self, op: WindowOp, rhs: impl Into<WindowOperand<'a>>) -> Result<Window> {
        let (values, kind) = match rhs.into() {
            WindowOperand::Window(other) => (
                self.paired_values(op, other)?,
                self.kind().wider(other.kind()),
            ),
            WindowOperand::Scalar(value) => (self.scalar_values(op, value), self.kind()),
        };
        Ok(self.with_values(values, kind))
    }

    /// Returns `lhs op self` as a new window.
    pub fn reflect(&self, op: WindowOp, lhs: f64) -> Window {
        let mut values = self.data.to_f64();
        values.mapv_inplace(|v| op.eval(lhs, v));
        self.with_values(values, self.kind())
    }

    fn with_values(&self, values: Array2<f64>, kind: PixelKind) -> Window {
        Window {
            llx: self.llx,
            lly: self.lly,
            xbin: self.xbin,
            ybin: self.ybin,
            data: Pixels::from_f64(values, kind),
        }
    }
}

macro_rules! window_operator {
    ($op:ident, $Trait:ident, $method:ident, $AssignTrait:ident, $assign_method:ident) => {
        impl $AssignTrait<f64> for Window {
            fn $assign_method(&mut self, rhs: f64) {
                let values = self.scalar_values(WindowOp::$op, rhs);
                self.data = Pixels::from_f64(values, self.kind());
            }
        }

        /// # Panics
        ///
        /// Panics if the two windows differ in shape.
        impl $AssignTrait<&Window> for Window {
            fn $assign_method(&mut self, rhs: &Window) {
                if let Err(e) = self.apply(WindowOp::$op, rhs) {
                    panic!("{e}");
                }
            }
        }

        impl $Trait<f64> for &Window {
            type Output = Window;

            fn $method(self, rhs: f64) -> Window {
                self.with_values(self.scalar_values(WindowOp::$op, rhs), self.kind())
            }
        }

        /// # Panics
        ///
        /// Panics if the two windows differ in shape.
        impl $Trait<&Window> for &Window {
            type Output = Window;

            fn $method(self, rhs: &Window) -> Window {
                self.combine(WindowOp::$op, rhs)
                    .unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl $Trait<&Window> for f64 {
            type Output = Window;

            fn $method(self, rhs: &Window) -> Window {
                rhs.reflect(WindowOp::$op, self)
            }
        }
    };
}

window_operator!(Add, Add, add, AddAssign, add_assign);
window_operator!(Sub, Sub, sub, SubAssign, sub_assign);
window_operator!(Mul, Mul, mul, MulAssign, mul_assign);
window_operator!(Div, Div, div, DivAssign, div_assign);
