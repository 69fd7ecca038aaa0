use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use hashbrown::HashMap;

use stagehand_animation_core::loader::gltf_asset::sanitize_node_name;
use stagehand_animation_core::{ClipPlayer, FsSource, PlaybackStatus, TrackProperty, Value};

use crate::components::{Soundtrack, StagehandCharacterRoot};
use crate::resources::{
    AssetRoot, JointIndex, ModelStatusInbox, PendingPose, SoundtrackCue, StageResource,
};
use crate::{ModelLoaded, PlayClip};

/// Startup: fetch the character and motion from the asset root and build the
/// playable actions.
pub fn load_assets_system(mut stage: NonSendMut<StageResource>, root: Res<AssetRoot>) {
    let mut source = FsSource::new(root.0.clone());
    info!("stagehand: loading assets from {}", root.0.display());
    stage.0.load(&mut source);
}

/// Walks descendants under each `StagehandCharacterRoot` and indexes them by
/// sanitized `Name`.
pub fn build_joint_index_system(
    roots: Query<Entity, With<StagehandCharacterRoot>>,
    children: Query<&Children>,
    names: Query<&Name>,
    mut index: ResMut<JointIndex>,
) {
    let mut map: HashMap<String, Entity> = HashMap::new();

    fn walk(
        e: Entity,
        map: &mut HashMap<String, Entity>,
        names: &Query<&Name>,
        children: &Query<&Children>,
    ) {
        if let Ok(name) = names.get(e) {
            map.insert(sanitize_node_name(name.as_str()), e);
        }
        if let Ok(cs) = children.get(e) {
            for &c in cs.iter() {
                walk(c, map, names, children);
            }
        }
    }

    for root in roots.iter() {
        walk(root, &mut map, &names, &children);
    }

    index.map = map;
}

pub fn forward_model_status_system(
    inbox: NonSend<ModelStatusInbox>,
    mut loaded: EventWriter<ModelLoaded>,
) {
    for status in inbox.drain() {
        loaded.send(ModelLoaded(status));
    }
}

pub fn play_clip_system(mut stage: NonSendMut<StageResource>, mut requests: EventReader<PlayClip>) {
    for PlayClip(index) in requests.read() {
        if let PlaybackStatus::Ignored { warning } = stage.0.play_clip(*index) {
            debug!("stagehand: play request {index} ignored: {warning}");
        }
    }
}

pub fn advance_stage_system(
    mut stage: NonSendMut<StageResource>,
    time: Res<Time>,
    mut pending: ResMut<PendingPose>,
) {
    let dt = time.delta_seconds();
    match stage.0.update(dt) {
        Some(pose) => pending.0.clone_from(pose),
        None => pending.0.clear(),
    }
}

/// Write the pending pose into the indexed joints' transforms.
pub fn apply_pose_system(
    pending: Res<PendingPose>,
    index: Res<JointIndex>,
    mut transforms: Query<&mut Transform>,
) {
    for change in &pending.0.changes {
        let Some(&entity) = index.map.get(&change.joint) else {
            continue;
        };
        let Ok(mut tf) = transforms.get_mut(entity) else {
            continue;
        };
        match (TrackProperty::from_name(&change.property), &change.value) {
            (TrackProperty::Position, Value::Vec3(v)) => {
                tf.translation = Vec3::from_array(*v);
            }
            (TrackProperty::Rotation, Value::Quat(q)) => {
                tf.rotation = Quat::from_array(*q).normalize();
            }
            (TrackProperty::Scale, Value::Vec3(v)) => {
                tf.scale = Vec3::from_array(*v);
            }
            _ => {}
        }
    }
}

/// Restart the soundtrack when the core asked for it. Without an
/// `AssetServer` (headless apps) the request is dropped.
pub fn restart_soundtrack_system(
    mut commands: Commands,
    cue: Res<SoundtrackCue>,
    stage: NonSend<StageResource>,
    asset_server: Option<Res<AssetServer>>,
    playing: Query<Entity, With<Soundtrack>>,
) {
    if !cue.take() {
        return;
    }
    let Some(asset_server) = asset_server else {
        warn!("stagehand: no AssetServer; soundtrack restart skipped");
        return;
    };
    for entity in playing.iter() {
        commands.entity(entity).despawn();
    }
    let path = stage.0.config().assets.audio.clone();
    commands.spawn((
        AudioBundle {
            source: asset_server.load(path),
            settings: PlaybackSettings::DESPAWN,
        },
        Soundtrack,
    ));
}
