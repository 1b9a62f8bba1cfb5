//! Calibration engine: orientation and scale of the image relative to the ground.
//!
//! Two ways to get a `MapCalibration`:
//! - manual: the user dials orientation and types a scale;
//! - two-point: solve both from two (GPS, pixel) pairs.

use mapfix_core::config::MapperConfig;
use mapfix_core::constants::MIN_IMAGE_SEPARATION_PX;
use mapfix_core::error::{CalibrationError, DegenerateReason};
use mapfix_core::types::{CalibrationPoint, GeoPoint, MapCalibration};

use crate::angle::normalize_degrees;
use crate::geodesy::{bearing, distance};

/// Build a calibration from user-supplied values.
///
/// Orientation is normalized into `[0, 360)`. Non-finite orientation and
/// non-positive or non-finite scale are rejected; range clamping is the
/// settings layer's job.
pub fn manual(orientation_deg: f64, scale_m_per_unit: f64) -> Result<MapCalibration, CalibrationError> {
    if !orientation_deg.is_finite() {
        return Err(CalibrationError::InvalidOrientation {
            value: orientation_deg,
        });
    }
    if !(scale_m_per_unit > 0.0) || !scale_m_per_unit.is_finite() {
        return Err(CalibrationError::InvalidScale {
            value: scale_m_per_unit,
        });
    }
    Ok(MapCalibration {
        orientation_deg: normalize_degrees(orientation_deg),
        scale_m_per_unit,
    })
}

/// Angle of the image-space vector `p1 -> p2`, compass convention (0 = image up).
///
/// Image y grows downward, hence `-dy`.
pub fn image_angle(p1: &CalibrationPoint, p2: &CalibrationPoint) -> f64 {
    let dx = p2.image.x - p1.image.x;
    let dy = p2.image.y - p1.image.y;
    dx.atan2(-dy).to_degrees()
}

/// Solve orientation and scale from two (GPS, pixel) pairs.
///
/// The caller is expected to have enforced the minimum GPS separation
/// (see [`check_movement`]); this only rejects geometry it cannot divide by.
pub fn two_point(
    p1: &CalibrationPoint,
    p2: &CalibrationPoint,
    config: &MapperConfig,
) -> Result<MapCalibration, CalibrationError> {
    let image_distance = p1.image.distance_to(&p2.image);
    if image_distance < MIN_IMAGE_SEPARATION_PX {
        return Err(CalibrationError::DegenerateGeometry {
            reason: DegenerateReason::CoincidentImagePoints,
        });
    }

    let gps_distance = distance(&p1.geo, &p2.geo);
    if gps_distance <= f64::EPSILON {
        return Err(CalibrationError::DegenerateGeometry {
            reason: DegenerateReason::CoincidentGpsPoints,
        });
    }

    let gps_bearing = bearing(&p1.geo, &p2.geo);
    let orientation_deg = normalize_degrees(gps_bearing - image_angle(p1, p2));

    let scale_units = image_distance / config.pixels_per_scale_unit;
    let scale_m_per_unit = (gps_distance / scale_units) * config.scale_multiplier;

    Ok(MapCalibration {
        orientation_deg,
        scale_m_per_unit,
    })
}

/// Distance moved since point one, rejected when below the configured minimum.
pub fn check_movement(
    point1: &GeoPoint,
    current: &GeoPoint,
    config: &MapperConfig,
) -> Result<f64, CalibrationError> {
    let moved_m = distance(point1, current);
    if moved_m < config.min_calibration_distance_m {
        return Err(CalibrationError::InsufficientMovement {
            moved_m,
            required_m: config.min_calibration_distance_m,
        });
    }
    Ok(moved_m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::destination;
    use mapfix_core::types::ImagePoint;

    /// Build a second calibration point consistent with orientation `o` and scale `s`.
    fn synthetic_pair(
        o: f64,
        s: f64,
        image_dir: f64,
        image_len: f64,
        config: &MapperConfig,
    ) -> (CalibrationPoint, CalibrationPoint) {
        let p1 = CalibrationPoint::new(ImagePoint::new(600.0, 400.0), GeoPoint::new(30.0, 120.0));
        let dir = image_dir.to_radians();
        let image2 = ImagePoint::new(
            p1.image.x + image_len * dir.sin(),
            p1.image.y - image_len * dir.cos(),
        );
        let ground = image_len / config.pixels_per_scale_unit * s / config.scale_multiplier;
        let geo2 = destination(&p1.geo, image_dir + o, ground);
        (p1, CalibrationPoint::new(image2, geo2))
    }

    fn angle_diff(a: f64, b: f64) -> f64 {
        let d = normalize_degrees(a - b);
        d.min(360.0 - d)
    }

    #[test]
    fn test_manual_normalizes_orientation() {
        let cal = manual(-90.0, 120.0).unwrap();
        assert_eq!(cal.orientation_deg, 270.0);
        assert_eq!(cal.scale_m_per_unit, 120.0);

        let cal = manual(720.0, 50.0).unwrap();
        assert_eq!(cal.orientation_deg, 0.0);
    }

    #[test]
    fn test_manual_rejects_non_positive_scale() {
        assert_eq!(
            manual(0.0, 0.0),
            Err(CalibrationError::InvalidScale { value: 0.0 })
        );
        assert!(manual(0.0, -10.0).is_err());
        assert!(manual(0.0, f64::NAN).is_err());
        assert!(manual(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_manual_rejects_non_finite_orientation() {
        assert_eq!(
            manual(f64::INFINITY, 100.0),
            Err(CalibrationError::InvalidOrientation {
                value: f64::INFINITY
            })
        );
        assert!(matches!(
            manual(f64::NAN, 100.0),
            Err(CalibrationError::InvalidOrientation { .. })
        ));
    }

    #[test]
    fn test_image_angle_compass_convention() {
        let origin = CalibrationPoint::new(ImagePoint::new(100.0, 100.0), GeoPoint::default());
        let at = |x, y| CalibrationPoint::new(ImagePoint::new(x, y), GeoPoint::default());
        assert!((image_angle(&origin, &at(100.0, 50.0)) - 0.0).abs() < 1e-12);
        assert!((image_angle(&origin, &at(150.0, 100.0)) - 90.0).abs() < 1e-12);
        assert!((image_angle(&origin, &at(100.0, 150.0)) - 180.0).abs() < 1e-12);
        assert!((image_angle(&origin, &at(50.0, 100.0)) + 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_point_recovers_orientation_and_scale() {
        let config = MapperConfig::default();
        let cases = [
            (0.0, 100.0, 0.0, 200.0),
            (30.0, 50.0, 45.0, 200.0),
            (275.0, 250.0, 190.0, 80.0),
            (359.0, 10.0, 300.0, 400.0),
        ];
        for (o, s, dir, len) in cases {
            let (p1, p2) = synthetic_pair(o, s, dir, len, &config);
            let cal = two_point(&p1, &p2, &config).unwrap();
            assert!(
                angle_diff(cal.orientation_deg, o) < 1e-6,
                "orientation {} vs {o}",
                cal.orientation_deg
            );
            assert!(
                (cal.scale_m_per_unit - s).abs() < 1e-6 * s,
                "scale {} vs {s}",
                cal.scale_m_per_unit
            );
            assert!((0.0..360.0).contains(&cal.orientation_deg));
        }
    }

    #[test]
    fn test_two_point_honours_multiplier() {
        let config = MapperConfig {
            scale_multiplier: 100.0,
            ..MapperConfig::default()
        };
        let (p1, p2) = synthetic_pair(10.0, 75.0, 20.0, 150.0, &config);
        let cal = two_point(&p1, &p2, &config).unwrap();
        assert!((cal.scale_m_per_unit - 75.0).abs() < 1e-6);
    }

    #[test]
    fn test_two_point_north_up_map() {
        // Walk 100 m north, mark 38 px higher: 100 m per scale unit, north up.
        let config = MapperConfig::default();
        let geo1 = GeoPoint::new(30.0, 120.0);
        let p1 = CalibrationPoint::new(ImagePoint::new(600.0, 400.0), geo1);
        let p2 = CalibrationPoint::new(ImagePoint::new(600.0, 362.0), destination(&geo1, 0.0, 100.0));
        let cal = two_point(&p1, &p2, &config).unwrap();
        assert!(angle_diff(cal.orientation_deg, 0.0) < 1e-6);
        assert!((cal.scale_m_per_unit - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_two_point_rejects_coincident_image_points() {
        let config = MapperConfig::default();
        let geo1 = GeoPoint::new(30.0, 120.0);
        let p1 = CalibrationPoint::new(ImagePoint::new(10.0, 10.0), geo1);
        let p2 = CalibrationPoint::new(ImagePoint::new(10.0, 10.0), destination(&geo1, 45.0, 50.0));
        assert_eq!(
            two_point(&p1, &p2, &config),
            Err(CalibrationError::DegenerateGeometry {
                reason: DegenerateReason::CoincidentImagePoints
            })
        );
    }

    #[test]
    fn test_two_point_rejects_coincident_gps_points() {
        let config = MapperConfig::default();
        let geo = GeoPoint::new(30.0, 120.0);
        let p1 = CalibrationPoint::new(ImagePoint::new(10.0, 10.0), geo);
        let p2 = CalibrationPoint::new(ImagePoint::new(50.0, 10.0), geo);
        assert_eq!(
            two_point(&p1, &p2, &config),
            Err(CalibrationError::DegenerateGeometry {
                reason: DegenerateReason::CoincidentGpsPoints
            })
        );
    }

    #[test]
    fn test_check_movement_threshold() {
        let config = MapperConfig::default();
        let start = GeoPoint::new(30.0, 120.0);

        let near = destination(&start, 90.0, 6.0);
        match check_movement(&start, &near, &config) {
            Err(CalibrationError::InsufficientMovement { moved_m, required_m }) => {
                assert!((moved_m - 6.0).abs() < 1e-6);
                assert_eq!(required_m, 10.0);
            }
            other => panic!("expected InsufficientMovement, got {other:?}"),
        }

        let far = destination(&start, 90.0, 12.0);
        let moved = check_movement(&start, &far, &config).unwrap();
        assert!((moved - 12.0).abs() < 1e-6);
    }
}
