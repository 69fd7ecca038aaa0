//! Accumulation of per-track contributions and blending into final Values.

use hashbrown::HashMap;

use crate::interp::functions::{dot4, normalize4};
use crate::value::Value;

/// Accumulator entry storing weighted sums per Value kind.
/// For vectors: component-wise sum and total weight.
/// For quaternions: weighted sum of (x,y,z,w), sign-aligned to the first
/// contribution, normalized at finalize.
#[derive(Clone, Debug)]
enum AccumEntry {
    Scalar { sum: f32, w: f32 },
    Vec3 { sum: [f32; 3], w: f32 },
    Quat { sum: [f32; 4], first: [f32; 4], w: f32 },
    Vector { sum: Vec<f32>, w: f32 },
}

impl AccumEntry {
    fn from_value(v: &Value, w: f32) -> Self {
        match v {
            Value::Scalar(x) => AccumEntry::Scalar { sum: x * w, w },
            Value::Vec3(a) => AccumEntry::Vec3 {
                sum: [a[0] * w, a[1] * w, a[2] * w],
                w,
            },
            Value::Quat(q) => AccumEntry::Quat {
                sum: [q[0] * w, q[1] * w, q[2] * w, q[3] * w],
                first: *q,
                w,
            },
            Value::Vector(a) => AccumEntry::Vector {
                sum: a.iter().map(|x| x * w).collect(),
                w,
            },
        }
    }

    fn add_value(&mut self, v: &Value, w: f32) {
        match (self, v) {
            (AccumEntry::Scalar { sum, w: ww }, Value::Scalar(x)) => {
                *sum += x * w;
                *ww += w;
            }
            (AccumEntry::Vec3 { sum, w: ww }, Value::Vec3(a)) => {
                sum[0] += a[0] * w;
                sum[1] += a[1] * w;
                sum[2] += a[2] * w;
                *ww += w;
            }
            (AccumEntry::Quat { sum, first, w: ww }, Value::Quat(q)) => {
                // Keep all contributions in the same hemisphere as the first one.
                let s = if dot4(*first, *q) < 0.0 { -w } else { w };
                sum[0] += q[0] * s;
                sum[1] += q[1] * s;
                sum[2] += q[2] * s;
                sum[3] += q[3] * s;
                *ww += w;
            }
            (AccumEntry::Vector { sum, w: ww }, Value::Vector(a)) if sum.len() == a.len() => {
                for (s, x) in sum.iter_mut().zip(a.iter()) {
                    *s += x * w;
                }
                *ww += w;
            }
            _ => {
                // Mismatched kind; ignore additional values to keep fail-soft behavior.
            }
        }
    }

    fn weight(&self) -> f32 {
        match self {
            AccumEntry::Scalar { w, .. }
            | AccumEntry::Vec3 { w, .. }
            | AccumEntry::Quat { w, .. }
            | AccumEntry::Vector { w, .. } => *w,
        }
    }

    fn finalize(self) -> Option<Value> {
        if self.weight() <= 0.0 {
            return None;
        }
        Some(match self {
            AccumEntry::Scalar { sum, w } => Value::Scalar(sum / w),
            AccumEntry::Vec3 { sum, w } => Value::Vec3([sum[0] / w, sum[1] / w, sum[2] / w]),
            AccumEntry::Quat { sum, .. } => Value::Quat(normalize4(sum)),
            AccumEntry::Vector { sum, w } => Value::Vector(sum.into_iter().map(|x| x / w).collect()),
        })
    }
}

/// Accumulates per-track contributions across actions.
#[derive(Default)]
pub struct Accumulator {
    map: HashMap<String, AccumEntry>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: &str, value: &Value, weight: f32) {
        if weight <= 0.0 {
            return;
        }
        match self.map.get_mut(key) {
            Some(entry) => entry.add_value(value, weight),
            None => {
                self.map
                    .insert(key.to_string(), AccumEntry::from_value(value, weight));
            }
        }
    }

    /// Top up every entry whose total weight is below 1 with the value
    /// returned by `rest`, so partial weights blend toward the rest pose.
    pub fn fill_with<F>(&mut self, mut rest: F)
    where
        F: FnMut(&str) -> Option<Value>,
    {
        for (key, entry) in self.map.iter_mut() {
            let missing = 1.0 - entry.weight();
            if missing <= 1e-6 {
                continue;
            }
            if let Some(v) = rest(key) {
                entry.add_value(&v, missing);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn finalize(self) -> HashMap<String, Value> {
        self.map
            .into_iter()
            .filter_map(|(k, entry)| entry.finalize().map(|v| (k, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_average_of_vectors() {
        let mut acc = Accumulator::new();
        acc.add("j.position", &Value::Vec3([0.0, 0.0, 0.0]), 0.25);
        acc.add("j.position", &Value::Vec3([4.0, 8.0, 0.0]), 0.75);
        let out = acc.finalize();
        assert_eq!(out["j.position"], Value::Vec3([3.0, 6.0, 0.0]));
    }

    #[test]
    fn zero_weight_is_ignored() {
        let mut acc = Accumulator::new();
        acc.add("j.position", &Value::Vec3([1.0, 1.0, 1.0]), 0.0);
        assert!(acc.is_empty());
    }

    #[test]
    fn partial_weight_blends_toward_rest() {
        let mut acc = Accumulator::new();
        acc.add("j.position", &Value::Vec3([2.0, 0.0, 0.0]), 0.5);
        acc.fill_with(|_| Some(Value::Vec3([0.0, 0.0, 0.0])));
        let out = acc.finalize();
        assert_eq!(out["j.position"], Value::Vec3([1.0, 0.0, 0.0]));
    }

    #[test]
    fn opposite_sign_quaternions_do_not_cancel() {
        let mut acc = Accumulator::new();
        acc.add("j.quaternion", &Value::Quat([0.0, 0.0, 0.0, 1.0]), 0.5);
        acc.add("j.quaternion", &Value::Quat([0.0, 0.0, 0.0, -1.0]), 0.5);
        match acc.finalize().remove("j.quaternion") {
            Some(Value::Quat(q)) => assert!((q[3] - 1.0).abs() < 1e-6),
            other => panic!("unexpected {other:?}"),
        }
    }
}
