use tracing::{debug, warn};

use crate::frame::ccd::types::Ccd;
use crate::frame::window::PixelKind;

impl Ccd {
    /// True if any window holds integer pixels. Integer storage saves space
    /// but is lossy under arithmetic; see [`Ccd::to_float`].
    pub fn any_int(&self) -> bool {
        self.iter().any(|win| win.kind().is_integer())
    }

    /// True if any window holds floating-point pixels.
    pub fn any_float(&self) -> bool {
        self.iter().any(|win| win.kind().is_float())
    }

    /// Converts every window to 4-byte floats if `single`, else 8-byte.
    pub fn to_float(&mut self, single: bool) {
        let kind = if single { PixelKind::F32 } else { PixelKind::F64 };
        debug!(%kind, "Converting CCD windows");
        for win in self {
            win.to_kind(kind);
        }
    }

    /// Converts every window to unsigned 16-bit integers, rounding to
    /// nearest. Values outside 0..=65535 produce a warning per window and
    /// saturate.
    pub fn to_int(&mut self) {
        let limit = f64::from(u16::MAX);
        for (n, win) in self.iter_mut().enumerate() {
            if let (Some(min), Some(max)) = (win.min(), win.max()) {
                if min < 0.0 || max > limit {
                    warn!(
                        window = n + 1,
                        min, max, "Input data out of range 0 to 65535"
                    );
                }
            }
            win.to_kind(PixelKind::U16);
        }
    }
}
