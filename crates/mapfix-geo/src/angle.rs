//! Compass-angle helpers (degrees, 0 = North, clockwise).

use mapfix_core::enums::CompassPoint;

/// Normalize any finite angle into `[0, 360)`.
///
/// `((value % 360) + 360) % 360` rather than `rem_euclid`: the latter returns
/// exactly 360.0 for tiny negative inputs once rounded.
pub fn normalize_degrees(value: f64) -> f64 {
    ((value % 360.0) + 360.0) % 360.0
}

/// Wrap an angle difference into `(-180, 180]`.
pub fn wrap_delta(delta: f64) -> f64 {
    let d = normalize_degrees(delta);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Compass sector for an angle: eight 45° sectors centred on the principal directions.
pub fn compass_point(degrees: f64) -> CompassPoint {
    let a = normalize_degrees(degrees);
    if !(22.5..337.5).contains(&a) {
        CompassPoint::North
    } else if a < 67.5 {
        CompassPoint::NorthEast
    } else if a < 112.5 {
        CompassPoint::East
    } else if a < 157.5 {
        CompassPoint::SouthEast
    } else if a < 202.5 {
        CompassPoint::South
    } else if a < 247.5 {
        CompassPoint::SouthWest
    } else if a < 292.5 {
        CompassPoint::West
    } else {
        CompassPoint::NorthWest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_normalize_known_values() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_degrees(-0.0), 0.0);
    }

    #[test]
    fn test_normalize_tiny_negative_stays_below_360() {
        let n = normalize_degrees(-1e-20);
        assert!((0.0..360.0).contains(&n), "got {n}");
    }

    #[test]
    fn test_normalize_always_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let v: f64 = rng.gen_range(-1e7..1e7);
            let n = normalize_degrees(v);
            assert!((0.0..360.0).contains(&n), "normalize({v}) = {n}");
        }
        for k in -20..=20 {
            let n = normalize_degrees(360.0 * k as f64);
            assert_eq!(n, 0.0, "multiple {k} of 360");
        }
    }

    #[test]
    fn test_wrap_delta() {
        assert_eq!(wrap_delta(10.0), 10.0);
        assert_eq!(wrap_delta(-10.0), -10.0);
        assert_eq!(wrap_delta(350.0), -10.0);
        assert_eq!(wrap_delta(-350.0), 10.0);
        assert_eq!(wrap_delta(180.0), 180.0);
        assert_eq!(wrap_delta(-180.0), 180.0);
    }

    #[test]
    fn test_compass_points() {
        assert_eq!(compass_point(0.0), CompassPoint::North);
        assert_eq!(compass_point(337.5), CompassPoint::North);
        assert_eq!(compass_point(22.4), CompassPoint::North);
        assert_eq!(compass_point(22.5), CompassPoint::NorthEast);
        assert_eq!(compass_point(90.0), CompassPoint::East);
        assert_eq!(compass_point(135.0), CompassPoint::SouthEast);
        assert_eq!(compass_point(180.0), CompassPoint::South);
        assert_eq!(compass_point(225.0), CompassPoint::SouthWest);
        assert_eq!(compass_point(270.0), CompassPoint::West);
        assert_eq!(compass_point(315.0), CompassPoint::NorthWest);
        assert_eq!(compass_point(-90.0), CompassPoint::West);
        assert_eq!(compass_point(450.0), CompassPoint::East);
    }
}
