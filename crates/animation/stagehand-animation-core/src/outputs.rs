//! Output contract of the mixer.
//!
//! A pose carries only the joint properties touched this frame, keyed by
//! target joint name. Scene hosts apply them to their own skeleton.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One blended joint property for this frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JointChange {
    pub joint: String,
    pub property: String,
    pub value: Value,
}

/// Blended joint values produced by `Mixer::update`, sorted by joint then property.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    #[serde(default)]
    pub changes: Vec<JointChange>,
}

impl Pose {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn get(&self, joint: &str, property: &str) -> Option<&Value> {
        self.changes
            .iter()
            .find(|c| c.joint == joint && c.property == property)
            .map(|c| &c.value)
    }
}
