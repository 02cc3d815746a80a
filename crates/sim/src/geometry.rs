use glam::Vec2;

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Unit vector from `a` towards `b`, or `(0, 0)` when the points coincide.
///
/// A zero result means "no preferred direction"; callers skip whatever they
/// would have done with it.
pub fn direction_vector(a: Vec2, b: Vec2) -> Vec2 {
    let delta = b - a;
    let dist = delta.length();
    if dist == 0.0 {
        return Vec2::ZERO;
    }
    delta / dist
}

/// Unsigned angle between two vectors in radians, `0` if either is zero-length.
pub fn angle_between(u: Vec2, v: Vec2) -> f32 {
    let mag_u = u.length();
    let mag_v = v.length();
    if mag_u == 0.0 || mag_v == 0.0 {
        return 0.0;
    }
    // Rounding can push the cosine a hair outside [-1, 1].
    (u.dot(v) / (mag_u * mag_v)).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
        assert_eq!(distance(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn test_direction_vector_is_unit() {
        let d = direction_vector(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!((d.x - 0.6).abs() < 1e-6);
        assert!((d.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_direction_vector_same_point() {
        let p = Vec2::new(10.0, -3.0);
        assert_eq!(direction_vector(p, p), Vec2::ZERO);
    }

    #[test]
    fn test_angle_between() {
        let a = angle_between(Vec2::X, Vec2::Y);
        assert!((a - FRAC_PI_2).abs() < 1e-6);
        let b = angle_between(Vec2::X, Vec2::new(-2.0, 0.0));
        assert!((b - PI).abs() < 1e-5);
        assert!(angle_between(Vec2::new(3.0, 3.0), Vec2::new(1.0, 1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_angle_between_zero_vector() {
        assert_eq!(angle_between(Vec2::ZERO, Vec2::X), 0.0);
        assert_eq!(angle_between(Vec2::Y, Vec2::ZERO), 0.0);
    }
}
