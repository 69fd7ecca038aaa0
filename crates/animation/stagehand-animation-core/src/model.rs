//! Loaded scene data: skeleton joints with their rest transforms, plus any
//! clips that shipped inside the same file.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::data::{Clip, TrackProperty};
use crate::value::Value;

/// Rest (bind-time) local transform of one joint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Joint {
    pub name: String,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Joint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: [0.0; 3],
            rotation: identity_rotation(),
            scale: unit_scale(),
        }
    }

    /// Rest value for a property category; `None` for custom properties.
    pub fn rest_value(&self, property: TrackProperty) -> Option<Value> {
        match property {
            TrackProperty::Position => Some(Value::Vec3(self.translation)),
            TrackProperty::Rotation => Some(Value::Quat(self.rotation)),
            TrackProperty::Scale => Some(Value::Vec3(self.scale)),
            TrackProperty::Other => None,
        }
    }
}

/// Decoded output of one asset: `{ scene, animations }`.
#[derive(Clone, Debug, Default)]
pub struct LoadedAsset {
    pub scene: SceneInfo,
    pub animations: Vec<Clip>,
}

/// Named nodes of a scene graph.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SceneInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub joints: Vec<Joint>,
}

/// The target character: skeleton plus its built-in clips.
#[derive(Clone, Debug)]
pub struct CharacterModel {
    name: String,
    joints: HashMap<String, Joint>,
    builtin_clips: Vec<Clip>,
}

impl CharacterModel {
    pub fn new(name: impl Into<String>, joints: Vec<Joint>, builtin_clips: Vec<Clip>) -> Self {
        Self {
            name: name.into(),
            joints: joints.into_iter().map(|j| (j.name.clone(), j)).collect(),
            builtin_clips,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.get(name)
    }

    pub fn has_joint(&self, name: &str) -> bool {
        self.joints.contains_key(name)
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn builtin_clips(&self) -> &[Clip] {
        &self.builtin_clips
    }
}

impl From<LoadedAsset> for CharacterModel {
    fn from(asset: LoadedAsset) -> Self {
        CharacterModel::new(asset.scene.name, asset.scene.joints, asset.animations)
    }
}
