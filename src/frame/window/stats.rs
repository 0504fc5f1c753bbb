use crate::frame::common::stats::{median_sorted, nan_max, nan_min, sort_values};
use crate::frame::window::types::Window;

impl Window {
    /// Number of pixels.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Pixel values in row-major order.
    pub fn flatten(&self) -> Vec<f64> {
        self.data.iter_f64().collect()
    }

    pub fn sum(&self) -> f64 {
        self.data.iter_f64().sum()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.size() == 0 {
            return None;
        }
        Some(self.sum() / self.size() as f64)
    }

    /// Smallest pixel value, NaN if any pixel is NaN.
    pub fn min(&self) -> Option<f64> {
        self.data.iter_f64().reduce(nan_min)
    }

    /// Largest pixel value, NaN if any pixel is NaN.
    pub fn max(&self) -> Option<f64> {
        self.data.iter_f64().reduce(nan_max)
    }

    pub fn median(&self) -> Option<f64> {
        let mut values = self.flatten();
        sort_values(&mut values);
        median_sorted(&values)
    }
}
