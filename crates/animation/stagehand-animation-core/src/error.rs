//! Error and warning types for the retargeting and playback core.
//!
//! Only load failures ever reach a user. Retarget and playback problems are
//! warnings: they are logged and the caller carries on.

use std::path::PathBuf;

use serde::Serialize;

/// Invariant violations found while building a track or clip.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ClipError {
    /// A track must carry at least one keyframe.
    #[error("track '{track}' has no keyframes")]
    EmptyTrack { track: String },

    /// Keyframe times must be finite and strictly increasing.
    #[error("track '{track}' has non-increasing or non-finite time at key {index}")]
    NonIncreasingTimes { track: String, index: usize },

    /// Value buffer does not match the property's component count.
    #[error("track '{track}' expects {expected} components per key, values buffer has {actual} entries for {keys} keys")]
    ArityMismatch {
        track: String,
        expected: usize,
        actual: usize,
        keys: usize,
    },

    /// Clip duration shorter than one of its tracks.
    #[error("clip '{clip}' duration {duration} is shorter than track end time {end_time}")]
    DurationTooShort {
        clip: String,
        duration: f32,
        end_time: f32,
    },
}

/// Problems building a bone map.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoneMapError {
    #[error("bone map entries must be non-empty identifiers")]
    EmptyIdentifier,

    #[error("bone map key '{0}' is mapped more than once")]
    DuplicateKey(String),
}

/// Asset fetch or decode failure.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
    #[error("asset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glTF asset {}: {source}", path.display())]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("invalid JSON asset {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported asset format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid animation in {}: {source}", path.display())]
    InvalidClip {
        path: PathBuf,
        #[source]
        source: ClipError,
    },

    #[error("asset {} contains no skeleton joints", path.display())]
    MissingCharacter { path: PathBuf },

    /// Failure reported by a host that performs the fetch itself.
    #[error("{0}")]
    Host(String),
}

impl LoadError {
    /// Message suitable for an error banner. Missing files get a friendlier hint.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::NotFound { path } => format!(
                "Could not find '{}'. Make sure the model files are in place and reload the page.",
                path.display()
            ),
            other => format!("Failed to load the character: {other}"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

/// A track or clip that could not be retargeted. Logged, never surfaced.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RetargetWarning {
    #[error("clip '{clip}': track '{track}' is not of the form <joint>.<property>")]
    MalformedTrackName { clip: String, track: String },

    #[error("clip '{clip}': joint '{joint}' has no bone map entry")]
    UnmappedJoint { clip: String, joint: String },

    #[error("clip '{clip}': no track could be mapped onto the target skeleton")]
    NoMappableTracks { clip: String },
}

/// A playback request that became a no-op.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlaybackWarning {
    #[error("model is not loaded yet; ignoring play request for '{action}'")]
    NotReady { action: String },

    #[error("no action registered under '{action}'")]
    UnknownAction { action: String },
}

/// Audio sink failure; the controller catches and logs these.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio unavailable: {0}")]
    Unavailable(String),

    #[error("audio playback rejected: {0}")]
    Rejected(String),
}
