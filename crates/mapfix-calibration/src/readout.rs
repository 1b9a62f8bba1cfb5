//! Live distance readout shown while walking to point two.

use mapfix_core::config::MapperConfig;
use mapfix_core::state::MovementReadout;
use mapfix_core::types::{CalibrationPoint, GeoPoint};
use mapfix_geo::geodesy::distance;

/// Readout for the current fix relative to point one. Zero until both exist.
pub fn movement_readout(
    point1: Option<&CalibrationPoint>,
    latest_fix: Option<&GeoPoint>,
    config: &MapperConfig,
) -> MovementReadout {
    let required_m = config.min_calibration_distance_m;
    let moved_m = match (point1, latest_fix) {
        (Some(p1), Some(fix)) => distance(&p1.geo, fix),
        _ => 0.0,
    };

    // Bar fills at twice the requirement
    let progress = if required_m > 0.0 {
        (moved_m / (2.0 * required_m)).min(1.0)
    } else {
        1.0
    };

    MovementReadout {
        moved_m,
        required_m,
        progress,
        can_mark: point1.is_some() && moved_m >= config.soft_calibration_distance_m,
        sufficient: point1.is_some() && moved_m >= required_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapfix_core::types::ImagePoint;
    use mapfix_geo::geodesy::destination;

    fn point1() -> CalibrationPoint {
        CalibrationPoint::new(ImagePoint::new(100.0, 100.0), GeoPoint::new(30.0, 120.0))
    }

    #[test]
    fn test_empty_readout() {
        let r = movement_readout(None, None, &MapperConfig::default());
        assert_eq!(r.moved_m, 0.0);
        assert_eq!(r.progress, 0.0);
        assert!(!r.can_mark);
        assert!(!r.sufficient);
    }

    #[test]
    fn test_readout_thresholds() {
        let config = MapperConfig::default();
        let p1 = point1();

        let fix = destination(&p1.geo, 45.0, 3.0);
        let r = movement_readout(Some(&p1), Some(&fix), &config);
        assert!((r.moved_m - 3.0).abs() < 1e-6);
        assert!((r.progress - 0.15).abs() < 1e-6);
        assert!(!r.can_mark);
        assert!(!r.sufficient);

        let fix = destination(&p1.geo, 45.0, 7.0);
        let r = movement_readout(Some(&p1), Some(&fix), &config);
        assert!(r.can_mark);
        assert!(!r.sufficient);

        let fix = destination(&p1.geo, 45.0, 12.0);
        let r = movement_readout(Some(&p1), Some(&fix), &config);
        assert!(r.can_mark);
        assert!(r.sufficient);
        assert!((r.progress - 0.6).abs() < 1e-6);

        let fix = destination(&p1.geo, 45.0, 40.0);
        let r = movement_readout(Some(&p1), Some(&fix), &config);
        assert_eq!(r.progress, 1.0);
    }
}
