//! Interpolation helpers:
//! - step_value (hold left key)
//! - linear_value (component-wise + quat NLERP)
//! - quaternion NLERP with shortest-arc normalization

use crate::value::Value;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub(crate) fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
pub fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
/// Returns a normalized quaternion (x,y,z,w).
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    normalize4([
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ])
}

/// Step interpolation: choose left value.
#[inline]
pub fn step_value(a: &Value) -> Value {
    a.clone()
}

/// Linear interpolation across Value kinds.
pub fn linear_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Scalar(va), Value::Scalar(vb)) => Value::Scalar(lerp_f32(*va, *vb, t)),
        (Value::Vec3(va), Value::Vec3(vb)) => Value::Vec3(lerp_vec3(*va, *vb, t)),
        (Value::Quat(qa), Value::Quat(qb)) => Value::Quat(nlerp_quat(*qa, *qb, t)),
        (Value::Vector(va), Value::Vector(vb)) if va.len() == vb.len() => Value::Vector(
            va.iter()
                .zip(vb.iter())
                .map(|(x, y)| lerp_f32(*x, *y, t))
                .collect(),
        ),
        // Fallback: if types mismatch, prefer left (fail-soft).
        _ => a.clone(),
    }
}
