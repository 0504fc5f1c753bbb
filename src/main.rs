use std::sync::Arc;

use ndarray::Array2;
use ucam_frames::frame::{Ccd, Header, PixelKind, Time, ValidationConfig, Window};
use ucam_frames::logger::{self, info, warn};

/// Two binned windows on a 1024x1024 chip with a gentle gradient on a bias
/// level, as a readout would deliver them.
fn synthetic_frame() -> anyhow::Result<Ccd> {
    let left = Array2::from_shape_fn((100, 120), |(y, x)| 1000 + (x + y) as u16);
    let right = Array2::from_shape_fn((100, 120), |(y, x)| 1100 + (x * y % 50) as u16);
    let wins = vec![
        Window::new(100, 200, 2, 2, left)?,
        Window::new(600, 200, 2, 2, right)?,
    ];

    let mut head = Header::new();
    head.add_entry("Instrument.name", "ULTRACAM", "instrument");
    head.add_entry("Run.exposure", 2.5, "seconds");

    let time = Arc::new(Time::new(56_000.5, 2.5, true, ""));
    let ccd = Ccd::new_checked(
        wins,
        time,
        1024,
        1024,
        true,
        Some(Arc::new(head)),
        &ValidationConfig::strict(),
    )?;
    Ok(ccd)
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Building synthetic frame...");
    let mut ccd = synthetic_frame()?;
    info!(nwin = ccd.nwin(), npix = ccd.npix(), "Frame assembled");
    print!("{ccd}");

    if let (Some(min), Some(max), Some(mean)) = (ccd.min(), ccd.max(), ccd.mean()) {
        info!(min, max, mean, "Raw statistics");
    }
    let levels = ccd.centile([5.0, 50.0, 95.0])?;
    info!("Centiles 5/50/95: {:?}", levels);

    ccd.to_float(true);
    ccd.rback();
    info!(median = ?ccd.median(), "Background removed");

    let target = {
        let wins = vec![Window::zeros(140, 240, 20, 20, 2, 2, PixelKind::F32)?];
        Ccd::new(wins, Arc::clone(&ccd.time), ccd.nxmax, ccd.nymax, true, None)
    };
    if ccd.can_crop_to(&target) {
        let cropped = ccd.crop_to(&target)?;
        info!(npix = cropped.npix(), "Cropped to target layout");
        print!("{}", cropped.format());
    } else {
        warn!("Frame cannot be cropped to target layout");
    }

    let scaled = 2.0 * &ccd;
    let diff = &scaled - &ccd;
    info!(equal = (diff == ccd), good = diff.good, "Arithmetic check");

    Ok(())
}
