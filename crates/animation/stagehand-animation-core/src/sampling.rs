//! Track sampling at a clip-local time in seconds.
//!
//! Model:
//! - Keys are held constant before the first and after the last key time.
//! - Between keys, `Step` holds the left key and `Linear` lerps
//!   (quaternions via shortest-arc NLERP).
//!
//! API:
//! - sample_track(&Track, t) where t is seconds on the clip timeline.

use crate::data::{Interpolation, Track};
use crate::interp::functions::{linear_value, step_value};
use crate::value::Value;

/// Locate the segment containing `t`.
/// Returns (i0, i1, local_t); i0 == i1 when `t` lies outside the key range.
fn find_segment(times: &[f32], t: f32) -> (usize, usize, f32) {
    let n = times.len();
    if n <= 1 || t <= times[0] {
        return (0, 0, 0.0);
    }
    if t >= times[n - 1] {
        return (n - 1, n - 1, 0.0);
    }
    // First key strictly after t; guaranteed in 1..n by the checks above.
    let i1 = times.partition_point(|&k| k <= t);
    let i0 = i1 - 1;
    let denom = (times[i1] - times[i0]).max(f32::EPSILON);
    (i0, i1, ((t - times[i0]) / denom).clamp(0.0, 1.0))
}

/// Sample a single track at `t` seconds.
pub fn sample_track(track: &Track, t: f32) -> Value {
    let property = track.property();
    let (i0, i1, lt) = find_segment(track.times(), t);
    let left = Value::from_components(property, track.key(i0));
    if i0 == i1 {
        return left;
    }
    match track.interpolation() {
        Interpolation::Step => step_value(&left),
        Interpolation::Linear => {
            let right = Value::from_components(property, track.key(i1));
            linear_value(&left, &right, lt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-5, "left={a} right={b}");
    }

    #[test]
    fn clamps_outside_key_range() {
        let t = Track::new("j.position", vec![1.0, 2.0], vec![0.0, 0.0, 0.0, 2.0, 4.0, 6.0])
            .unwrap();
        assert_eq!(sample_track(&t, 0.0), Value::Vec3([0.0, 0.0, 0.0]));
        assert_eq!(sample_track(&t, 5.0), Value::Vec3([2.0, 4.0, 6.0]));
    }

    #[test]
    fn linear_midpoint() {
        let t = Track::new("j.position", vec![0.0, 2.0], vec![0.0, 0.0, 0.0, 2.0, 4.0, 6.0])
            .unwrap();
        match sample_track(&t, 1.0) {
            Value::Vec3(v) => {
                approx(v[0], 1.0);
                approx(v[1], 2.0);
                approx(v[2], 3.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn step_holds_left_key() {
        let t = Track::with_interpolation(
            "j.scale",
            Interpolation::Step,
            vec![0.0, 1.0],
            vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
        )
        .unwrap();
        assert_eq!(sample_track(&t, 0.99), Value::Vec3([1.0, 1.0, 1.0]));
        assert_eq!(sample_track(&t, 1.0), Value::Vec3([2.0, 2.0, 2.0]));
    }

    #[test]
    fn quaternion_result_is_normalized() {
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let t = Track::new(
            "j.quaternion",
            vec![0.0, 1.0],
            vec![0.0, 0.0, 0.0, 1.0, 0.0, h, 0.0, h],
        )
        .unwrap();
        match sample_track(&t, 0.5) {
            Value::Quat(q) => {
                let len = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
                approx(len, 1.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn exact_key_time_hits_key() {
        let t = Track::new("w.custom", vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 20.0]).unwrap();
        assert_eq!(sample_track(&t, 1.0), Value::Scalar(10.0));
        assert_eq!(sample_track(&t, 1.5), Value::Scalar(15.0));
    }
}
