//! Semantic direction axes and tolerance helpers
//!
//! The engine treats +x as forward, +y as up and +z as right. Everything that
//! compares floating point state (tests included) goes through the same
//! per-component epsilon rule.

use cgmath::{InnerSpace, Vector3};

/// Forward axis, +x
pub const FORWARD: Vector3<f32> = Vector3 {
    x: 1.0,
    y: 0.0,
    z: 0.0,
};

/// Backward axis, -x
pub const BACK: Vector3<f32> = Vector3 {
    x: -1.0,
    y: 0.0,
    z: 0.0,
};

/// Up axis, +y
pub const UP: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// Down axis, -y
pub const DOWN: Vector3<f32> = Vector3 {
    x: 0.0,
    y: -1.0,
    z: 0.0,
};

/// Right axis, +z
pub const RIGHT: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Left axis, -z
pub const LEFT: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.0,
    z: -1.0,
};

/// Normalize a vector; the zero vector is returned unchanged
pub fn normalize_safe(v: Vector3<f32>) -> Vector3<f32> {
    if v.magnitude2() == 0.0 {
        v
    } else {
        v.normalize()
    }
}

/// Per-component `|a - b| <= epsilon` comparison for scalars
pub fn scalar_approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= f32::EPSILON
}

/// Per-component `|a - b| <= epsilon` comparison for vectors
pub fn vec3_approx_eq(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    scalar_approx_eq(a.x, b.x) && scalar_approx_eq(a.y, b.y) && scalar_approx_eq(a.z, b.z)
}

/// Per-component `|a - b| <= epsilon` comparison for quaternions
pub fn quat_approx_eq(a: cgmath::Quaternion<f32>, b: cgmath::Quaternion<f32>) -> bool {
    scalar_approx_eq(a.s, b.s) && vec3_approx_eq(a.v, b.v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;

    #[test]
    fn test_axes_are_unit_and_opposed() {
        assert!(vec3_approx_eq(FORWARD, -BACK));
        assert!(vec3_approx_eq(UP, -DOWN));
        assert!(vec3_approx_eq(RIGHT, -LEFT));
        assert!(scalar_approx_eq(FORWARD.magnitude(), 1.0));
        assert!(scalar_approx_eq(UP.magnitude(), 1.0));
        assert!(scalar_approx_eq(RIGHT.magnitude(), 1.0));
    }

    #[test]
    fn test_normalize_safe_zero_is_noop() {
        let z = Vector3::zero();
        assert!(vec3_approx_eq(normalize_safe(z), z));
    }

    #[test]
    fn test_normalize_safe_nonzero() {
        let v = Vector3::new(0.0, 3.0, 4.0);
        let n = normalize_safe(v);
        assert!(scalar_approx_eq(n.magnitude(), 1.0));
        assert!(vec3_approx_eq(n, Vector3::new(0.0, 0.6, 0.8)));
    }
}
