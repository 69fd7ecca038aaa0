//! Core configuration for stagehand-animation-core.

use serde::{Deserialize, Serialize};

/// Playback and asset configuration.
/// Every field has a default matching the demo's fixed setup, so an empty
/// JSON object is a valid config.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Crossfade length (seconds) used for both fade-out and fade-in.
    pub fade_duration: f32,
    /// Retargeted motion clips are registered as `{action_prefix}{index}`.
    pub action_prefix: String,
    /// Fixed relative asset paths.
    pub assets: AssetPaths,
}

/// Relative paths of the four demo assets.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetPaths {
    pub character: String,
    pub motion: String,
    pub audio: String,
    pub video: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fade_duration: 0.5,
            action_prefix: "dance_".to_string(),
            assets: AssetPaths::default(),
        }
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            character: "models/character.vrm".to_string(),
            motion: "models/dance.glb".to_string(),
            audio: "audio/dance.mp3".to_string(),
            video: "video/reference.mp4".to_string(),
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Registry name for the clip at `index`.
    pub fn action_name(&self, index: usize) -> String {
        format!("{}{}", self.action_prefix, index)
    }
}
