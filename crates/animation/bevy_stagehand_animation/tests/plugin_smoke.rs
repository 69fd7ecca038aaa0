use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_stagehand_animation::{
    JointIndex, ModelLoaded, PlayClip, SoundtrackCue, StageResource, StagehandAnimationPlugin,
    StagehandCharacterRoot,
};
use stagehand_animation_core::{AssetPaths, BoneMap, Config, LoadState};

fn fixture_plugin(fade_duration: f32) -> StagehandAnimationPlugin {
    StagehandAnimationPlugin {
        config: Config {
            fade_duration,
            assets: AssetPaths {
                character: "characters/vrm-humanoid.json".into(),
                motion: "animations/mocap-dance.json".into(),
                ..AssetPaths::default()
            },
            ..Config::default()
        },
        bone_map: BoneMap::standard(),
        asset_root: stagehand_test_fixtures::root(),
    }
}

fn app_with(plugin: StagehandAnimationPlugin) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO))
        .add_plugins(plugin);
    app
}

fn loaded_events(app: &App) -> Vec<ModelLoaded> {
    let events = app.world().resource::<Events<ModelLoaded>>();
    let mut reader = events.get_reader();
    reader.read(events).cloned().collect()
}

/// it should load the configured assets at startup and report success
#[test]
fn startup_load_reports_model_loaded() {
    let mut app = app_with(fixture_plugin(0.5));
    app.update();

    let stage = app.world().non_send_resource::<StageResource>();
    assert_eq!(stage.0.load_state(), &LoadState::Ready);

    let events = loaded_events(&app);
    assert_eq!(events.len(), 1);
    assert!(events[0].0.success);
    assert_eq!(events[0].0.clip_count, 2);
}

/// it should surface a missing model as an unsuccessful ModelLoaded event
#[test]
fn missing_assets_report_failure() {
    let mut plugin = fixture_plugin(0.5);
    plugin.asset_root = std::env::temp_dir().join("stagehand-missing-assets");
    let mut app = app_with(plugin);

    app.world_mut().send_event(PlayClip(0));
    app.update();

    let events = loaded_events(&app);
    assert_eq!(events.len(), 1);
    assert!(!events[0].0.success);
    assert!(events[0].0.message.is_some());
    assert!(!app.world().resource::<SoundtrackCue>().take());
}

/// it should drive named joints under the character root from the playing clip
#[test]
fn play_clip_writes_joint_transforms() {
    let mut app = app_with(fixture_plugin(0.0));

    let root = app.world_mut().spawn(StagehandCharacterRoot).id();
    let hips = app
        .world_mut()
        .spawn((
            Name::new("J_Bip_C_Hips"),
            Transform::default(),
            GlobalTransform::default(),
        ))
        .id();
    app.world_mut().entity_mut(root).add_child(hips);

    app.update();
    assert!(app.world().resource::<JointIndex>().map.contains_key("J_Bip_C_Hips"));

    app.world_mut().send_event(PlayClip(1));
    app.update();

    // "sway" starts at x = -0.2 and no time has passed.
    let tf = app.world().get::<Transform>(hips).expect("Transform exists");
    let expected = Vec3::new(-0.2, 0.9, 0.0);
    assert!(
        (tf.translation - expected).length() <= 1e-5,
        "expected translation {:?}, got {:?}",
        expected,
        tf.translation
    );
}

/// it should ignore play requests for indices that have no action
#[test]
fn unknown_clip_index_is_ignored() {
    let mut app = app_with(fixture_plugin(0.0));
    app.update();

    app.world_mut().send_event(PlayClip(42));
    app.update();

    let stage = app.world().non_send_resource::<StageResource>();
    assert!(stage.0.playback().current().is_none());
}
