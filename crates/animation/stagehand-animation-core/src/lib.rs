//! Stagehand Animation Core (engine-agnostic)
//!
//! Retargets motion-capture clips onto a VRM-style character skeleton and
//! plays them back with crossfades. Hosts (Bevy, wasm) own rendering, audio
//! output and the frame clock; this crate owns loading state, the bone map,
//! the mixer and the current-action pointer.

pub mod accumulate;
pub mod action;
pub mod audio;
pub mod bone_map;
pub mod config;
pub mod data;
pub mod error;
pub mod ids;
pub mod interp;
pub mod loader;
pub mod mixer;
pub mod model;
pub mod outputs;
pub mod playback;
pub mod retarget;
pub mod sampling;
pub mod stage;
pub mod value;

// Re-exports for consumers (adapters)
pub use action::{Action, ActionState, LoopMode};
pub use audio::{AudioSink, AudioStatus, NullAudio};
pub use bone_map::{BoneMap, STANDARD_BONE_PAIRS};
pub use config::{AssetPaths, Config};
pub use data::{track_name, Clip, Interpolation, Track, TrackBinding, TrackProperty};
pub use error::{
    AudioError, BoneMapError, ClipError, LoadError, PlaybackWarning, RetargetWarning,
};
pub use ids::{ActionId, ClipId};
pub use loader::{
    clip_from_json_str, decode_asset, load_asset, AssetLoader, AssetSource, FsSource, LoadRequest,
    LoadState, MemorySource,
};
pub use mixer::Mixer;
pub use model::{CharacterModel, Joint, LoadedAsset, SceneInfo};
pub use outputs::{JointChange, Pose};
pub use playback::{ClipPlayer, PlaybackController, PlaybackStatus};
pub use retarget::{retarget, retarget_all, retarget_with_report, RetargetReport};
pub use sampling::sample_track;
pub use stage::{ModelLoadedListener, ModelStatus, Stage};
pub use value::{Value, ValueKind};
