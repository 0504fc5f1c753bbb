use crate::frame::common::error::Result;
use crate::frame::window::types::Window;

/// Rendering backend for window images.
///
/// `vmin`/`vmax` map to the lowest and highest intensity, `use_primary`
/// selects the backend's primary device and `colormap` names the colour map.
pub trait WindowRenderer {
    fn render(
        &mut self,
        window: &Window,
        vmin: f64,
        vmax: f64,
        use_primary: bool,
        colormap: &str,
    ) -> Result<()>;
}

impl Window {
    pub fn plot<R: WindowRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        vmin: f64,
        vmax: f64,
        use_primary: bool,
        colormap: &str,
    ) -> Result<()> {
        renderer.render(self, vmin, vmax, use_primary, colormap)
    }
}
