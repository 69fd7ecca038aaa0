//! Sampled joint property values.

use serde::{Deserialize, Serialize};

use crate::data::TrackProperty;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Vec3,
    Quat,
    Vector,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    Scalar(f32),
    Vec3([f32; 3]),
    /// Quaternion (x, y, z, w)
    Quat([f32; 4]),
    /// Any other component count (custom properties).
    Vector(Vec<f32>),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Quat(_) => ValueKind::Quat,
            Value::Vector(_) => ValueKind::Vector,
        }
    }

    /// Build a value from one key's worth of components.
    pub fn from_components(property: TrackProperty, c: &[f32]) -> Value {
        match (property, c.len()) {
            (TrackProperty::Rotation, 4) => Value::Quat([c[0], c[1], c[2], c[3]]),
            (TrackProperty::Position | TrackProperty::Scale, 3) => Value::Vec3([c[0], c[1], c[2]]),
            (_, 1) => Value::Scalar(c[0]),
            _ => Value::Vector(c.to_vec()),
        }
    }

    pub fn components(&self) -> &[f32] {
        match self {
            Value::Scalar(x) => std::slice::from_ref(x),
            Value::Vec3(v) => v,
            Value::Quat(q) => q,
            Value::Vector(v) => v,
        }
    }
}
