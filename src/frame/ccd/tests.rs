#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ndarray::{Array2, array};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    use crate::frame::ccd::{Ccd, CentileSpec, Centiles, ValidationConfig};
    use crate::frame::common::error::{FrameError, Result};
    use crate::frame::meta::{Header, Time};
    use crate::frame::window::{PixelKind, Window, WindowOp, WindowRenderer};

    fn time() -> Arc<Time> {
        Arc::new(Time::new(55_000.25, 1.5, true, ""))
    }

    fn frame(wins: Vec<Window>) -> Ccd {
        Ccd::new(wins, time(), 100, 100, true, None)
    }

    /// 100x100 chip with one unbinned 10x10 integer window of value 500.
    fn flat_frame() -> Ccd {
        let win = Window::filled(0, 0, 10, 10, 1, 1, PixelKind::U16, 500.0).unwrap();
        frame(vec![win])
    }

    fn ramp_window(llx: usize, lly: usize, nx: usize, ny: usize, offset: f64) -> Window {
        let data = Array2::from_shape_fn((ny, nx), |(y, x)| offset + (y * nx + x) as f64);
        Window::new(llx, lly, 1, 1, data).unwrap()
    }

    fn two_window_frame() -> Ccd {
        frame(vec![
            ramp_window(0, 0, 4, 4, 0.0),
            ramp_window(50, 50, 2, 3, 100.0),
        ])
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    struct CountingRenderer {
        calls: usize,
        colormap: String,
    }

    impl WindowRenderer for CountingRenderer {
        fn render(
            &mut self,
            _window: &Window,
            _vmin: f64,
            _vmax: f64,
            _use_primary: bool,
            colormap: &str,
        ) -> Result<()> {
            self.calls += 1;
            self.colormap = colormap.to_string();
            Ok(())
        }
    }

    struct WarningCounter {
        count: Arc<AtomicUsize>,
    }

    impl<S: Subscriber> Layer<S> for WarningCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_equality_is_positional() {
        let a = two_window_frame();
        let b = two_window_frame();
        assert_eq!(a, b);

        let swapped = frame(vec![b[1].clone(), b[0].clone()]);
        assert_ne!(a, swapped);

        let mut changed = b.clone();
        changed[0] += 1.0;
        assert_ne!(a, changed);

        let mut resized = b.clone();
        resized.nxmax = 200;
        assert_ne!(a, resized);

        let fewer = frame(vec![b[0].clone()]);
        assert_ne!(a, fewer);
    }

    #[test]
    fn test_element_access() {
        let mut ccd = two_window_frame();
        assert_eq!(ccd.len(), 2);
        assert_eq!(ccd.nwin(), 2);
        assert!(!ccd.is_empty());
        assert_eq!(ccd[1].llx(), 50);

        let replacement = Window::zeros(20, 20, 2, 2, 1, 1, PixelKind::F64).unwrap();
        ccd.set(0, replacement.clone()).unwrap();
        assert_eq!(ccd[0], replacement);
        assert_eq!(ccd.get(0), Some(&replacement));
        assert!(ccd.get(5).is_none());

        assert!(matches!(
            ccd.set(2, replacement.clone()),
            Err(FrameError::WindowIndex { index: 2, nwin: 2 })
        ));

        ccd.set_data(vec![replacement]);
        assert_eq!(ccd.nwin(), 1);
        assert_eq!(ccd.data().len(), 1);
    }

    #[test]
    fn test_iteration_visits_windows_in_order() {
        let mut ccd = two_window_frame();
        let corners: Vec<usize> = (&ccd).into_iter().map(|win| win.llx()).collect();
        assert_eq!(corners, vec![0, 50]);

        for win in &mut ccd {
            *win -= 100.0;
        }
        assert_eq!(ccd[1].min(), Some(0.0));
    }

    #[test]
    fn test_type_conversion() {
        let mut ccd = two_window_frame();
        assert!(ccd.any_float());
        assert!(!ccd.any_int());

        ccd.to_int();
        assert!(ccd.any_int());
        assert!(!ccd.any_float());

        ccd.to_float(true);
        assert!(ccd.any_float());
        assert!(ccd.iter().all(|win| win.kind() == PixelKind::F32));

        ccd.to_float(false);
        assert!(ccd.iter().all(|win| win.kind() == PixelKind::F64));
    }

    #[test]
    fn test_to_int_out_of_range_still_converts() {
        let win = Window::new(0, 0, 1, 1, array![[-5.0, 70000.0], [1.5, 2.5]]).unwrap();
        let mut ccd = frame(vec![win]);
        ccd.to_int();

        assert!(ccd.any_int());
        assert_eq!(ccd[0].flatten(), vec![0.0, 65535.0, 2.0, 2.0]);
    }

    #[test]
    fn test_to_int_warns_once_per_out_of_range_window() {
        let mut ccd = frame(vec![
            Window::new(0, 0, 1, 1, array![[-5.0, 70000.0]]).unwrap(),
            Window::new(10, 0, 1, 1, array![[1.0, 2.0]]).unwrap(),
        ]);
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarningCounter {
            count: Arc::clone(&count),
        });

        tracing::subscriber::with_default(subscriber, || ccd.to_int());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(ccd.iter().all(|win| win.kind() == PixelKind::U16));
    }

    #[test]
    fn test_extrema_propagate_nan() {
        let ccd = frame(vec![
            Window::new(0, 0, 1, 1, array![[1.0, 2.0]]).unwrap(),
            Window::new(10, 0, 1, 1, array![[f64::NAN, 3.0]]).unwrap(),
        ]);
        assert!(ccd.min().unwrap().is_nan());
        assert!(ccd.max().unwrap().is_nan());
    }

    #[test]
    fn test_mean_is_pooled_not_averaged() {
        let ccd = frame(vec![
            Window::filled(0, 0, 1, 1, 1, 1, PixelKind::F64, 10.0).unwrap(),
            Window::filled(10, 10, 3, 1, 1, 1, PixelKind::F64, 2.0).unwrap(),
        ]);
        assert_eq!(ccd.npix(), 4);
        assert_close(ccd.mean().unwrap(), 16.0 / 4.0);
        assert_eq!(ccd.min(), Some(2.0));
        assert_eq!(ccd.max(), Some(10.0));
    }

    #[test]
    fn test_mean_matches_total_sum_over_count() {
        let ccd = two_window_frame();
        let sum: f64 = ccd.iter().flat_map(|win| win.flatten()).sum();
        assert_close(ccd.mean().unwrap(), sum / ccd.npix() as f64);
    }

    #[test]
    fn test_empty_frame_statistics() {
        let ccd = frame(Vec::new());
        assert_eq!(ccd.npix(), 0);
        assert_eq!(ccd.mean(), None);
        assert_eq!(ccd.min(), None);
        assert_eq!(ccd.median(), None);
        assert!(matches!(ccd.centile(50.0), Err(FrameError::NoPixels)));
    }

    #[test]
    fn test_single_window_median_and_centile() {
        let ccd = frame(vec![ramp_window(0, 0, 3, 3, 1.0)]);
        let own = ccd[0].median().unwrap();
        assert_eq!(ccd.median(), Some(own));
        assert_eq!(own, 5.0);
        assert_eq!(ccd.centile(50.0).unwrap(), Centiles::Single(own));
    }

    #[test]
    fn test_centile_pools_across_windows() {
        let ccd = frame(vec![
            Window::new(0, 0, 1, 1, array![[1.0, 2.0]]).unwrap(),
            Window::new(10, 0, 1, 1, array![[3.0, 4.0, 5.0]]).unwrap(),
        ]);
        assert_eq!(ccd.median(), Some(3.0));
        assert_eq!(
            ccd.centile([0.0, 25.0, 100.0]).unwrap(),
            Centiles::Many(vec![1.0, 2.0, 5.0])
        );
        assert_eq!(
            ccd.centile(CentileSpec::Many(vec![50.0])).unwrap().first(),
            Some(3.0)
        );
    }

    #[test]
    fn test_centile_rejects_invalid_percentile() {
        let ccd = two_window_frame();
        assert!(matches!(
            ccd.centile(150.0),
            Err(FrameError::InvalidPercentile(_))
        ));
        assert!(ccd.centile(vec![10.0, -1.0]).is_err());
    }

    #[test]
    fn test_rback_removes_each_window_median() {
        let mut ccd = frame(vec![
            Window::new(0, 0, 1, 1, array![[10.0, 11.0, 12.0]]).unwrap(),
            Window::new(10, 0, 1, 1, array![[100.0, 104.0, 108.0]]).unwrap(),
        ]);
        ccd.rback();
        assert_eq!(ccd[0].flatten(), vec![-1.0, 0.0, 1.0]);
        assert_eq!(ccd[1].flatten(), vec![-4.0, 0.0, 4.0]);
    }

    #[test]
    fn test_rback_on_integer_window_keeps_negative_residuals() {
        let mut ccd = frame(vec![
            Window::new(0, 0, 1, 1, array![[100u16, 110, 120]]).unwrap(),
        ]);
        ccd.rback();
        assert_eq!(ccd[0].kind(), PixelKind::F32);
        assert_eq!(ccd[0].flatten(), vec![-10.0, 0.0, 10.0]);
    }

    #[test]
    fn test_flat_frame_scenario() {
        let mut ccd = flat_frame();
        let original = ccd.clone();
        ccd.to_int();
        assert_eq!(ccd, original);
        assert_eq!(ccd.mean(), Some(500.0));

        ccd += 10.0;
        assert_eq!(ccd.mean(), Some(510.0));
        assert_eq!(ccd.min(), Some(510.0));
        assert_eq!(ccd.max(), Some(510.0));
    }

    #[test]
    fn test_crop_scenario() {
        let ccd = frame(vec![ramp_window(0, 0, 10, 10, 0.0)]);
        let target = frame(vec![
            Window::zeros(2, 3, 5, 5, 1, 1, PixelKind::F64).unwrap(),
        ]);

        assert!(ccd.can_crop_to(&target));
        let cropped = ccd.crop_to(&target).unwrap();
        assert_eq!(cropped.nwin(), 1);
        assert_eq!((cropped[0].llx(), cropped[0].lly()), (2, 3));
        assert_eq!((cropped[0].nx(), cropped[0].ny()), (5, 5));
        assert_eq!(cropped[0], ccd[0].crop_to(&target[0]).unwrap());
        assert_eq!(ccd.nwin(), 1);
        assert_eq!(ccd[0].nx(), 10);
    }

    #[test]
    fn test_self_crop_is_identity() {
        let ccd = two_window_frame();
        assert!(ccd.can_crop_to(&ccd));
        assert_eq!(ccd.crop_to(&ccd).unwrap(), ccd);
    }

    #[test]
    fn test_crop_shares_metadata() {
        let mut head = Header::new();
        head.add_entry("Run.number", 12i64, "");
        let head = Arc::new(head);
        let ccd = Ccd::new(
            vec![ramp_window(0, 0, 4, 4, 0.0)],
            time(),
            100,
            100,
            false,
            Some(Arc::clone(&head)),
        );

        let cropped = ccd.crop_to(&ccd).unwrap();
        assert!(Arc::ptr_eq(&cropped.time, &ccd.time));
        assert!(Arc::ptr_eq(cropped.head.as_ref().unwrap(), &head));
        assert!(!cropped.good);
    }

    #[test]
    fn test_dimension_mismatch() {
        let ccd = two_window_frame();
        let mut other = two_window_frame();
        other.nymax = 50;

        assert!(!ccd.can_crop_to(&other));
        assert!(matches!(
            ccd.crop_to(&other),
            Err(FrameError::DimensionMismatch {
                expected: (100, 100),
                found: (100, 50)
            })
        ));
    }

    #[test]
    fn test_crop_mismatch_names_target_window() {
        let ccd = frame(vec![ramp_window(0, 0, 10, 10, 0.0)]);
        let target = frame(vec![
            Window::zeros(0, 0, 2, 2, 1, 1, PixelKind::F64).unwrap(),
            Window::zeros(40, 40, 2, 2, 1, 1, PixelKind::F64).unwrap(),
        ]);

        assert!(!ccd.can_crop_to(&target));
        assert!(matches!(
            ccd.crop_to(&target),
            Err(FrameError::CropMismatch(2))
        ));
    }

    #[test]
    fn test_crop_matching_is_first_fit() {
        let ccd = frame(vec![
            ramp_window(0, 0, 10, 10, 0.0),
            ramp_window(0, 0, 10, 10, 1000.0),
        ]);
        let target = frame(vec![
            Window::zeros(0, 0, 2, 2, 1, 1, PixelKind::F64).unwrap(),
            Window::zeros(4, 4, 2, 2, 1, 1, PixelKind::F64).unwrap(),
        ]);

        let cropped = ccd.crop_to(&target).unwrap();
        assert!(cropped.iter().all(|win| win.max().unwrap() < 1000.0));
    }

    #[test]
    fn test_crop_rebins_coarser_target() {
        let ccd = frame(vec![
            Window::filled(0, 0, 8, 8, 1, 1, PixelKind::U16, 5.0).unwrap(),
        ]);
        let target = frame(vec![
            Window::zeros(2, 2, 2, 2, 2, 2, PixelKind::U16).unwrap(),
        ]);

        let cropped = ccd.crop_to(&target).unwrap();
        assert_eq!(cropped[0].flatten(), vec![20.0; 4]);
        assert_eq!(cropped[0].kind(), PixelKind::F64);
    }

    #[test]
    fn test_additive_identity() {
        let ccd = two_window_frame();
        assert_eq!(&ccd + 0.0, ccd);
        assert_eq!(0.0 + &ccd, ccd);
    }

    #[test]
    fn test_self_difference_is_zero() {
        let ccd = two_window_frame();
        let diff = &ccd - &ccd;
        assert_eq!(diff.nwin(), ccd.nwin());
        for (win, orig) in diff.iter().zip(&ccd) {
            assert_eq!((win.nx(), win.ny()), (orig.nx(), orig.ny()));
            assert!(win.flatten().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_scalar_round_trip_within_tolerance() {
        let ccd = two_window_frame();
        let back = &(&ccd + 0.1) - 0.1;
        for (win, orig) in back.iter().zip(&ccd) {
            for (a, b) in win.flatten().into_iter().zip(orig.flatten()) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_value_operators_leave_operands_untouched() {
        let ccd = two_window_frame();
        let before = ccd.clone();
        let _ = &ccd * &ccd;
        let _ = &ccd / 2.0;
        assert_eq!(ccd, before);
    }

    #[test]
    fn test_in_place_operators() {
        let mut ccd = two_window_frame();
        let other = two_window_frame();

        ccd *= 2.0;
        ccd -= &other;
        assert_eq!(ccd, other);

        ccd /= &other.combine(WindowOp::Add, 1.0).unwrap();
        assert!(ccd[0].max().unwrap() < 1.0);
    }

    #[test]
    fn test_reflected_operators() {
        let ccd = frame(vec![
            Window::filled(0, 0, 2, 2, 1, 1, PixelKind::F64, 4.0).unwrap(),
        ]);
        assert_eq!((10.0 - &ccd)[0].flatten(), vec![6.0; 4]);
        assert_eq!((8.0 / &ccd)[0].flatten(), vec![2.0; 4]);
        assert_eq!((3.0 * &ccd)[0].flatten(), vec![12.0; 4]);
    }

    #[test]
    fn test_validity_propagation() {
        let good = two_window_frame();
        let mut bad = two_window_frame();
        bad.good = false;

        assert!(!(&good + &bad).good);
        assert!(!(&bad - &good).good);
        assert!(!(&good * &bad).good);
        assert!(!(&good / &bad).good);
        assert!((&good + 1.0).good);
        assert!(!(2.0 * &bad).good);
        assert!((&good + &good).good);
    }

    #[test]
    fn test_derived_frames_share_metadata() {
        let head = Arc::new(Header::new());
        let ccd = Ccd::new(
            vec![ramp_window(0, 0, 2, 2, 0.0)],
            time(),
            100,
            100,
            true,
            Some(Arc::clone(&head)),
        );
        let sum = &ccd + &ccd;
        let reflected = 1.0 - &ccd;

        assert!(Arc::ptr_eq(&sum.time, &ccd.time));
        assert!(Arc::ptr_eq(reflected.head.as_ref().unwrap(), &head));
    }

    #[test]
    fn test_pairing_truncates_to_shorter_frame() {
        let long = two_window_frame();
        let short = frame(vec![long[0].clone()]);

        let sum = &long + &short;
        assert_eq!(sum.nwin(), 1);
        assert_eq!(sum[0].max(), Some(30.0));

        let mut target = long.clone();
        target += &short;
        assert_eq!(target[1], long[1]);
    }

    #[test]
    fn test_checked_pairing_rejects_count_mismatch() {
        let long = two_window_frame();
        let short = frame(vec![long[0].clone()]);
        let config = ValidationConfig::builder().match_window_counts(true).build();

        assert!(matches!(
            long.combine_checked(WindowOp::Add, &short, &config),
            Err(FrameError::WindowCountMismatch(2, 1))
        ));
        let mut target = long.clone();
        assert!(target.apply_checked(WindowOp::Sub, &short, &config).is_err());
        assert!(target.apply_checked(WindowOp::Sub, 1.0, &config).is_ok());
        assert!(long.combine_checked(WindowOp::Mul, &long, &config).is_ok());
    }

    fn mismatched_pair() -> (Ccd, Ccd) {
        let target = frame(vec![
            Window::filled(0, 0, 2, 2, 1, 1, PixelKind::F64, 1.0).unwrap(),
            Window::filled(20, 20, 2, 2, 1, 1, PixelKind::F64, 1.0).unwrap(),
        ]);
        let other = frame(vec![
            Window::filled(0, 0, 2, 2, 1, 1, PixelKind::F64, 5.0).unwrap(),
            Window::filled(20, 20, 3, 3, 1, 1, PixelKind::F64, 5.0).unwrap(),
        ]);
        (target, other)
    }

    #[test]
    fn test_failed_apply_leaves_frame_unchanged() {
        let (mut target, other) = mismatched_pair();
        let before = target.clone();

        assert!(matches!(
            target.apply(WindowOp::Add, &other),
            Err(FrameError::ShapeMismatch((2, 2), (3, 3)))
        ));
        assert_eq!(target, before);
        assert_eq!(target[0].flatten(), vec![1.0; 4]);
    }

    #[test]
    fn test_panicking_operator_leaves_frame_unchanged() {
        let (mut target, other) = mismatched_pair();
        let before = target.clone();

        let result = catch_unwind(AssertUnwindSafe(|| target += &other));
        assert!(result.is_err());
        assert_eq!(target, before);
    }

    #[test]
    fn test_shape_mismatch_surfaces_as_error() {
        let a = two_window_frame();
        let b = frame(vec![ramp_window(0, 0, 5, 5, 0.0)]);
        assert!(matches!(
            a.combine(WindowOp::Add, &b),
            Err(FrameError::ShapeMismatch(_, _))
        ));
    }

    #[test]
    fn test_validation_config() {
        let config = ValidationConfig::builder()
            .validate_bounds(true)
            .validate_overlap(false)
            .build();
        assert!(config.validate_bounds);
        assert!(!config.validate_overlap);
        assert!(!config.match_window_counts);

        let outside = vec![ramp_window(95, 0, 10, 10, 0.0)];
        assert!(matches!(
            Ccd::new_checked(outside.clone(), time(), 100, 100, true, None, &config),
            Err(FrameError::OutOfBounds(1, 100, 100))
        ));
        assert!(
            Ccd::new_checked(outside, time(), 100, 100, true, None, &ValidationConfig::default())
                .is_ok()
        );

        let overlapping = frame(vec![
            ramp_window(0, 0, 10, 10, 0.0),
            ramp_window(20, 20, 5, 5, 0.0),
            ramp_window(5, 5, 10, 10, 0.0),
        ]);
        assert!(matches!(
            overlapping.validate(&ValidationConfig::strict()),
            Err(FrameError::Overlap(1, 3))
        ));
        assert!(two_window_frame().validate(&ValidationConfig::strict()).is_ok());
    }

    #[test]
    fn test_plot_visits_every_window() {
        let ccd = two_window_frame();
        let mut renderer = CountingRenderer {
            calls: 0,
            colormap: String::new(),
        };
        ccd.plot(&mut renderer, 0.0, 1000.0, false, "binary").unwrap();
        assert_eq!(renderer.calls, 2);
        assert_eq!(renderer.colormap, "binary");
    }

    #[test]
    fn test_summary_lists_all_fields() {
        let mut head = Header::new();
        head.add_entry("Instrument.name", "ULTRACAM", "");
        let ccd = Ccd::new(
            vec![ramp_window(0, 0, 2, 2, 0.0), ramp_window(10, 10, 2, 2, 0.0)],
            time(),
            100,
            100,
            true,
            Some(Arc::new(head)),
        );

        let text = ccd.to_string();
        assert!(text.contains("Instrument.name"));
        assert!(text.contains("Dimensions = 100, 100, number of windows = 2, status = true"));
        assert!(text.contains("Window number 2:"));

        let format = ccd.format();
        assert_eq!(format.lines().count(), 2);
        assert!(format.starts_with("Window 1 = llx=0, lly=0, nx=2, ny=2, xbin=1, ybin=1"));
    }
}
