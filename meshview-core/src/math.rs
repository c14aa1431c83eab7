/// Homogeneous coordinate helpers
use nalgebra::{Vector3, Vector4};

/// Below this magnitude a homogeneous `w` is treated as zero.
pub const W_EPSILON: f32 = 1e-6;

/// Lift a point into homogeneous form (w = 1).
pub fn to_homogeneous(v: &Vector3<f32>) -> Vector4<f32> {
    Vector4::new(v.x, v.y, v.z, 1.0)
}

/// Lift a direction into homogeneous form (w = 0).
pub fn expand_to_vec4(v: &Vector3<f32>) -> Vector4<f32> {
    Vector4::new(v.x, v.y, v.z, 0.0)
}

/// Perspective divide. Returns `None` for points at infinity.
pub fn to_cartesian(v: &Vector4<f32>) -> Option<Vector3<f32>> {
    if v.w.abs() < W_EPSILON {
        return None;
    }
    Some(Vector3::new(v.x / v.w, v.y / v.w, v.z / v.w))
}

/// Cross product of two homogeneous points, taken on their cartesian forms.
pub fn cross4(lhs: &Vector4<f32>, rhs: &Vector4<f32>) -> Option<Vector4<f32>> {
    let l = to_cartesian(lhs)?;
    let r = to_cartesian(rhs)?;
    Some(to_homogeneous(&l.cross(&r)))
}

/// Component-wise equality within `f32::EPSILON`.
pub fn is_vec_equal(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).abs() < f32::EPSILON)
}

pub fn is_vec4_equal(a: &Vector4<f32>, b: &Vector4<f32>) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).abs() < f32::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homogeneous_round_trip() {
        let v = Vector3::new(1.0, -2.0, 3.5);
        let h = to_homogeneous(&v);
        assert_eq!(h.w, 1.0);
        assert!(is_vec_equal(&to_cartesian(&h).unwrap(), &v));
    }

    #[test]
    fn test_direction_has_zero_w() {
        let d = expand_to_vec4(&Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(d.w, 0.0);
        assert!(to_cartesian(&d).is_none());
    }

    #[test]
    fn test_perspective_divide() {
        let v = Vector4::new(2.0, 4.0, 6.0, 2.0);
        let c = to_cartesian(&v).unwrap();
        assert!(is_vec_equal(&c, &Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_cross4() {
        let x = Vector4::new(1.0, 0.0, 0.0, 1.0);
        let y = Vector4::new(0.0, 1.0, 0.0, 1.0);
        let z = cross4(&x, &y).unwrap();
        assert!(is_vec4_equal(&z, &Vector4::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_vec_equality_tolerance() {
        let a = Vector3::new(1.0, 1.0, 1.0);
        assert!(!is_vec_equal(&a, &Vector3::new(1.0, 1.0, 1.001)));
        assert!(is_vec4_equal(&Vector4::zeros(), &Vector4::zeros()));
    }
}
