use std::path::PathBuf;

use bevy::prelude::*;
use stagehand_animation_core::{BoneMap, Config, ModelStatus, Stage};

mod components;
mod resources;
mod systems;

pub use components::{Soundtrack, StagehandCharacterRoot};
pub use resources::{
    AssetRoot, CueAudio, JointIndex, ModelStatusInbox, PendingPose, SoundtrackCue, StageResource,
};
pub use systems::{
    advance_stage_system, apply_pose_system, build_joint_index_system,
    forward_model_status_system, load_assets_system, play_clip_system, restart_soundtrack_system,
};

/// UI request: crossfade to the motion clip at this index.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayClip(pub usize);

/// Sent once per finished load, successful or not.
#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub struct ModelLoaded(pub ModelStatus);

pub struct StagehandAnimationPlugin {
    pub config: Config,
    pub bone_map: BoneMap,
    pub asset_root: PathBuf,
}

impl Default for StagehandAnimationPlugin {
    fn default() -> Self {
        Self {
            config: Config::default(),
            bone_map: BoneMap::standard(),
            asset_root: PathBuf::from("assets"),
        }
    }
}

impl Plugin for StagehandAnimationPlugin {
    fn build(&self, app: &mut App) {
        let cue = SoundtrackCue::default();
        let inbox = ModelStatusInbox::default();

        let mut stage = Stage::new(
            self.config.clone(),
            self.bone_map.clone(),
            Box::new(CueAudio(cue.clone())),
        );
        let listener_inbox = inbox.clone();
        stage.set_model_loaded_listener(move |status| listener_inbox.push(status.clone()));

        app.insert_non_send_resource(StageResource(stage))
            .insert_non_send_resource(inbox)
            .insert_resource(cue)
            .insert_resource(AssetRoot(self.asset_root.clone()))
            .init_resource::<JointIndex>()
            .init_resource::<PendingPose>()
            .add_event::<PlayClip>()
            .add_event::<ModelLoaded>()
            .add_systems(Startup, load_assets_system)
            .add_systems(
                Update,
                (
                    build_joint_index_system,
                    forward_model_status_system,
                    play_clip_system,
                    advance_stage_system,
                    apply_pose_system,
                    restart_soundtrack_system,
                )
                    .chain(),
            );
    }
}
