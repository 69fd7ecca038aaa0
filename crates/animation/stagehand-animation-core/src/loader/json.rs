//! JSON scene format used by fixtures and hosts that pre-bake their assets.
//!
//! ```json
//! {
//!   "name": "character",
//!   "joints": [{ "name": "J_Bip_C_Hips", "translation": [0, 1, 0] }],
//!   "animations": [{
//!     "name": "dance",
//!     "duration": 2.0,
//!     "tracks": [{ "name": "hips_JNT.position", "times": [0, 1], "values": [0,0,0, 0,1,0] }]
//!   }]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::data::{Clip, Interpolation, Track};
use crate::error::{ClipError, LoadError};
use crate::model::{Joint, LoadedAsset, SceneInfo};

#[derive(Deserialize)]
struct RawAsset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    joints: Vec<Joint>,
    #[serde(default)]
    animations: Vec<RawClip>,
}

#[derive(Deserialize)]
struct RawClip {
    name: String,
    /// Omitted or negative: derived from the tracks.
    #[serde(default = "derived_duration")]
    duration: f32,
    #[serde(default)]
    tracks: Vec<RawTrack>,
}

#[derive(Deserialize)]
struct RawTrack {
    name: String,
    times: Vec<f32>,
    values: Vec<f32>,
    #[serde(default)]
    interpolation: Interpolation,
}

fn derived_duration() -> f32 {
    -1.0
}

impl RawClip {
    fn build(self) -> Result<Clip, ClipError> {
        let tracks = self
            .tracks
            .into_iter()
            .map(|t| Track::with_interpolation(t.name, t.interpolation, t.times, t.values))
            .collect::<Result<Vec<_>, _>>()?;
        Clip::new(self.name, self.duration, tracks)
    }
}

pub(crate) fn decode(path: &Path, bytes: &[u8]) -> Result<LoadedAsset, LoadError> {
    let raw: RawAsset = serde_json::from_slice(bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let animations = raw
        .animations
        .into_iter()
        .map(RawClip::build)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| LoadError::InvalidClip {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(LoadedAsset {
        scene: SceneInfo {
            name: raw.name,
            joints: raw.joints,
        },
        animations,
    })
}

/// Parse a single clip object (`{ name, duration?, tracks }`).
pub fn clip_from_json_str(s: &str) -> Result<Clip, LoadError> {
    let raw: RawClip = serde_json::from_str(s).map_err(|source| LoadError::Json {
        path: "<inline>".into(),
        source,
    })?;
    raw.build().map_err(|source| LoadError::InvalidClip {
        path: "<inline>".into(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scene_and_clips() {
        let json = br#"{
            "name": "rig",
            "joints": [{ "name": "J_Bip_C_Hips", "translation": [0.0, 1.0, 0.0] }],
            "animations": [{
                "name": "bob",
                "tracks": [{ "name": "hips_JNT.position", "times": [0.0, 1.5], "values": [0,0,0, 0,1,0] }]
            }]
        }"#;
        let asset = decode(Path::new("rig.json"), json).unwrap();
        assert_eq!(asset.scene.name, "rig");
        assert_eq!(asset.scene.joints[0].rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(asset.animations.len(), 1);
        assert_eq!(asset.animations[0].duration(), 1.5);
    }

    #[test]
    fn bad_track_is_invalid_clip() {
        let json = br#"{ "animations": [{ "name": "x", "tracks": [{ "name": "a.position", "times": [0], "values": [1, 2] }] }] }"#;
        let err = decode(Path::new("x.json"), json).unwrap_err();
        assert!(matches!(err, LoadError::InvalidClip { .. }));
    }

    #[test]
    fn step_interpolation_is_read() {
        let clip = clip_from_json_str(
            r#"{ "name": "s", "tracks": [{ "name": "j.scale", "times": [0, 1], "values": [1,1,1, 2,2,2], "interpolation": "step" }] }"#,
        )
        .unwrap();
        assert_eq!(clip.tracks()[0].interpolation(), Interpolation::Step);
    }
}
