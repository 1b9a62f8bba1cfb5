#[cfg(test)]
mod tests {
    use mapfix_core::config::MapperConfig;
    use mapfix_core::enums::CalibrationStep;
    use mapfix_core::error::{CalibrationError, DegenerateReason};
    use mapfix_core::types::{CalibrationPoint, GeoPoint, ImagePoint};
    use mapfix_geo::geodesy::destination;

    use crate::fsm::{evaluate, CalibrationContext, CalibrationInput};
    use crate::workflow::CalibrationWorkflow;

    fn start_fix() -> GeoPoint {
        GeoPoint::new(30.0, 120.0)
    }

    fn make_context(
        config: &MapperConfig,
        step: CalibrationStep,
        point1: Option<CalibrationPoint>,
        latest_fix: Option<GeoPoint>,
    ) -> CalibrationContext<'_> {
        CalibrationContext {
            step,
            point1,
            point2: None,
            latest_fix,
            config,
        }
    }

    fn point1() -> CalibrationPoint {
        CalibrationPoint::new(ImagePoint::new(600.0, 400.0), start_fix())
    }

    #[test]
    fn test_start_from_idle() {
        let config = MapperConfig::default();
        let ctx = make_context(&config, CalibrationStep::Idle, None, None);
        let update = evaluate(&ctx, CalibrationInput::Start);
        assert!(update.step_changed);
        assert_eq!(update.new_step, CalibrationStep::AwaitingPoint1);
    }

    #[test]
    fn test_mark_point1_without_fix_is_rejected() {
        let config = MapperConfig::default();
        let ctx = make_context(&config, CalibrationStep::AwaitingPoint1, None, None);
        let update = evaluate(&ctx, CalibrationInput::MarkPoint(ImagePoint::new(1.0, 2.0)));
        assert!(!update.step_changed);
        assert_eq!(update.error, Some(CalibrationError::NoFix));
        assert!(update.point1.is_none());
    }

    #[test]
    fn test_mark_point1_pairs_latest_fix() {
        let config = MapperConfig::default();
        let ctx = make_context(&config, CalibrationStep::AwaitingPoint1, None, Some(start_fix()));
        let update = evaluate(&ctx, CalibrationInput::MarkPoint(ImagePoint::new(600.0, 400.0)));
        assert_eq!(update.new_step, CalibrationStep::AwaitingMovement);
        assert_eq!(update.point1, Some(point1()));
    }

    #[test]
    fn test_movement_guard() {
        let config = MapperConfig::default();

        // 8 m: still waiting
        let near = destination(&start_fix(), 10.0, 8.0);
        let ctx = make_context(&config, CalibrationStep::AwaitingMovement, Some(point1()), None);
        let update = evaluate(&ctx, CalibrationInput::Fix(near));
        assert!(!update.step_changed);
        assert_eq!(update.latest_fix, Some(near));

        // 11 m: guard opens
        let far = destination(&start_fix(), 10.0, 11.0);
        let update = evaluate(&ctx, CalibrationInput::Fix(far));
        assert!(update.step_changed);
        assert_eq!(update.new_step, CalibrationStep::AwaitingPoint2);
    }

    #[test]
    fn test_drift_back_closes_guard() {
        let config = MapperConfig::default();
        let near = destination(&start_fix(), 10.0, 4.0);
        let ctx = make_context(&config, CalibrationStep::AwaitingPoint2, Some(point1()), None);
        let update = evaluate(&ctx, CalibrationInput::Fix(near));
        assert_eq!(update.new_step, CalibrationStep::AwaitingMovement);
    }

    #[test]
    fn test_mark_point2_too_early() {
        let config = MapperConfig::default();
        let near = destination(&start_fix(), 0.0, 6.0);
        let ctx = make_context(&config, CalibrationStep::AwaitingMovement, Some(point1()), Some(near));
        let update = evaluate(&ctx, CalibrationInput::MarkPoint(ImagePoint::new(600.0, 380.0)));
        assert!(!update.step_changed);
        assert!(matches!(
            update.error,
            Some(CalibrationError::InsufficientMovement { required_m, .. }) if required_m == 10.0
        ));
        assert!(update.point2.is_none());
    }

    #[test]
    fn test_mark_point2_enters_computing() {
        let config = MapperConfig::default();
        let far = destination(&start_fix(), 0.0, 20.0);
        let ctx = make_context(&config, CalibrationStep::AwaitingPoint2, Some(point1()), Some(far));
        let update = evaluate(&ctx, CalibrationInput::MarkPoint(ImagePoint::new(600.0, 392.4)));
        assert_eq!(update.new_step, CalibrationStep::Computing);
        assert_eq!(update.point2.map(|p| p.geo), Some(far));
    }

    #[test]
    fn test_compute_outside_computing_is_noop() {
        let config = MapperConfig::default();
        let ctx = make_context(&config, CalibrationStep::AwaitingMovement, Some(point1()), None);
        let update = evaluate(&ctx, CalibrationInput::Compute);
        assert!(!update.step_changed);
        assert!(update.result.is_none());
        assert!(update.error.is_none());
    }

    #[test]
    fn test_cancel() {
        let config = MapperConfig::default();
        let ctx = make_context(&config, CalibrationStep::AwaitingMovement, Some(point1()), None);
        let update = evaluate(&ctx, CalibrationInput::Cancel);
        assert_eq!(update.new_step, CalibrationStep::Cancelled);
        assert!(update.point1.is_none());

        let ctx = make_context(&config, CalibrationStep::Idle, None, None);
        let update = evaluate(&ctx, CalibrationInput::Cancel);
        assert_eq!(update.error, Some(CalibrationError::NotInProgress));
        assert_eq!(update.new_step, CalibrationStep::Idle);
    }

    #[test]
    fn test_mark_when_idle_is_rejected() {
        let config = MapperConfig::default();
        let ctx = make_context(&config, CalibrationStep::Done, None, Some(start_fix()));
        let update = evaluate(&ctx, CalibrationInput::MarkPoint(ImagePoint::new(0.0, 0.0)));
        assert_eq!(update.error, Some(CalibrationError::NotInProgress));
    }

    /// Full walk: mark, walk 100 m north, mark 38 px up -> north-up, 100 m per unit.
    #[test]
    fn test_workflow_end_to_end() {
        let mut wf = CalibrationWorkflow::new(MapperConfig::default());
        assert_eq!(wf.step(), CalibrationStep::Idle);

        let report = wf.start();
        assert_eq!(report.to, CalibrationStep::AwaitingPoint1);

        wf.on_fix(start_fix());
        let report = wf.mark(ImagePoint::new(600.0, 400.0));
        assert_eq!(report.to, CalibrationStep::AwaitingMovement);

        for d in [2.0, 5.0, 8.0] {
            let report = wf.on_fix(destination(&start_fix(), 0.0, d));
            assert_eq!(report.to, CalibrationStep::AwaitingMovement);
        }
        assert!(wf.view().movement.can_mark);
        assert!(!wf.view().movement.sufficient);

        let report = wf.on_fix(destination(&start_fix(), 0.0, 100.0));
        assert!(report.step_changed());
        assert_eq!(report.to, CalibrationStep::AwaitingPoint2);
        assert!(wf.view().movement.sufficient);

        let report = wf.mark(ImagePoint::new(600.0, 362.0));
        assert_eq!(report.from, CalibrationStep::AwaitingPoint2);
        assert_eq!(report.to, CalibrationStep::Done);
        let cal = report.result.expect("calibration solved");
        assert!(cal.orientation_deg < 1e-6 || cal.orientation_deg > 360.0 - 1e-6);
        assert!((cal.scale_m_per_unit - 100.0).abs() < 1e-6);
        assert_eq!(wf.result(), Some(cal));
        assert_eq!(wf.point2().map(|p| p.image), Some(ImagePoint::new(600.0, 362.0)));
    }

    #[test]
    fn test_workflow_degenerate_returns_to_point2() {
        let mut wf = CalibrationWorkflow::new(MapperConfig::default());
        wf.start();
        wf.on_fix(start_fix());
        wf.mark(ImagePoint::new(600.0, 400.0));
        wf.on_fix(destination(&start_fix(), 90.0, 30.0));

        // Same pixel marked twice
        let report = wf.mark(ImagePoint::new(600.0, 400.0));
        assert_eq!(report.to, CalibrationStep::AwaitingPoint2);
        assert_eq!(
            report.error,
            Some(CalibrationError::DegenerateGeometry {
                reason: DegenerateReason::CoincidentImagePoints
            })
        );
        assert!(report.result.is_none());
        assert!(wf.point1().is_some(), "point one is kept");
        assert!(wf.point2().is_none());

        // Retry with a proper mark
        let report = wf.mark(ImagePoint::new(611.4, 400.0));
        assert_eq!(report.to, CalibrationStep::Done);
        let cal = report.result.unwrap();
        assert!(cal.orientation_deg < 1e-6 || cal.orientation_deg > 360.0 - 1e-6);
        assert!((cal.scale_m_per_unit - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_workflow_restart_clears_points() {
        let mut wf = CalibrationWorkflow::new(MapperConfig::default());
        wf.start();
        wf.on_fix(start_fix());
        wf.mark(ImagePoint::new(1.0, 1.0));
        wf.cancel();
        assert_eq!(wf.step(), CalibrationStep::Cancelled);

        let report = wf.start();
        assert_eq!(report.from, CalibrationStep::Cancelled);
        assert_eq!(report.to, CalibrationStep::AwaitingPoint1);
        assert!(wf.point1().is_none());
        assert!(wf.result().is_none());
    }
}
