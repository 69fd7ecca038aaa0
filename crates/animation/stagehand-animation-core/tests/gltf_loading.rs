use std::cell::RefCell;
use std::rc::Rc;

use stagehand_animation_core::{
    decode_asset, retarget_with_report, AssetPaths, BoneMap, ClipPlayer, Config, Interpolation,
    LoadState, LoadedAsset, MemorySource, ModelStatus, NullAudio, Stage, Value,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn motion() -> LoadedAsset {
    decode_asset(
        "models/bob.gltf",
        &stagehand_test_fixtures::animations::bytes("mocap-bob").unwrap(),
    )
    .unwrap()
}

/// it should read node rest transforms and sanitize node names
#[test]
fn nodes_become_joints_with_rest_transforms() {
    let asset = motion();
    assert_eq!(asset.scene.name, "MocapScene");
    let names: Vec<&str> = asset.scene.joints.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, ["hips_JNT", "spine1_JNT", "l_arm_JNT", "tail_JNT"]);
    assert_eq!(asset.scene.joints[0].translation, [0.0, 0.9, 0.0]);
    assert_eq!(asset.scene.joints[3].rotation, [0.0, 0.0, 0.0, 1.0]);
}

/// it should decode translation and rotation channels into named tracks
#[test]
fn channels_become_tracks() {
    let asset = motion();
    let bob = &asset.animations[0];
    assert_eq!(bob.name(), "bob");
    approx(bob.duration(), 1.0, 1e-6);

    let hips = bob.track("hips_JNT.position").unwrap();
    assert_eq!(hips.times(), &[0.0, 1.0]);
    assert_eq!(hips.values(), &[0.0, 0.9, 0.0, 0.0, 1.0, 0.0]);

    let spine = bob.track("spine1_JNT.quaternion").unwrap();
    assert_eq!(spine.arity(), 4);
    approx(spine.key(1)[0], 0.0998334, 1e-6);
    approx(spine.key(1)[3], 0.9950042, 1e-6);
}

/// it should keep only the value element of cubic spline keys
#[test]
fn cubic_spline_channel_keeps_values() {
    let asset = motion();
    let arm = asset.animations[0].track("l_arm_JNT.quaternion").unwrap();
    assert_eq!(arm.interpolation(), Interpolation::Linear);
    assert_eq!(arm.key_count(), 2);
    assert_eq!(arm.key(0), &[0.0, 0.0, 0.0, 1.0]);
    approx(arm.key(1)[2], 0.3826834, 1e-6);
    approx(arm.key(1)[3], 0.9238795, 1e-6);
}

/// it should skip a channel with invalid key times and keep the rest of the clip
#[test]
fn invalid_channel_is_skipped() {
    let asset = motion();
    let bob = &asset.animations[0];
    assert_eq!(bob.tracks().len(), 3);
    assert!(bob.track("tail_JNT.scale").is_none());
}

/// it should name unnamed animations by index and keep step interpolation
#[test]
fn unnamed_step_animation_gets_index_name() {
    let asset = motion();
    assert_eq!(asset.animations.len(), 2);
    let clip = &asset.animations[1];
    assert_eq!(clip.name(), "animation_1");
    let hips = clip.track("hips_JNT.position").unwrap();
    assert_eq!(hips.interpolation(), Interpolation::Step);
    assert_eq!(hips.key_count(), 3);
}

/// it should retarget decoded glTF tracks onto the standard humanoid names
#[test]
fn decoded_clip_retargets_to_vrm_names() {
    let asset = motion();
    let (clip, report) = retarget_with_report(&asset.animations[0], &BoneMap::standard());
    assert_eq!(report.mapped_tracks, 3);
    let names: Vec<&str> = clip.tracks().iter().map(|t| t.name()).collect();
    assert_eq!(
        names,
        [
            "J_Bip_C_Hips.position",
            "J_Bip_C_Spine.quaternion",
            "J_Bip_L_UpperArm.quaternion"
        ]
    );
    assert_eq!(
        clip.tracks()[0].values(),
        asset.animations[0].tracks()[0].values()
    );
}

/// it should load a glTF character and motion end to end through the stage
#[test]
fn stage_loads_gltf_assets() {
    let cfg = Config {
        fade_duration: 0.0,
        assets: AssetPaths {
            character: "models/mini-rig.gltf".into(),
            motion: "models/bob.gltf".into(),
            ..AssetPaths::default()
        },
        ..Config::default()
    };
    let mut src = MemorySource::new();
    src.insert(
        "models/mini-rig.gltf",
        stagehand_test_fixtures::characters::bytes("mini-rig").unwrap(),
    )
    .insert(
        "models/bob.gltf",
        stagehand_test_fixtures::animations::bytes("mocap-bob").unwrap(),
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut stage = Stage::new(cfg, BoneMap::standard(), Box::new(NullAudio));
    let sink = seen.clone();
    stage.set_model_loaded_listener(move |status: &ModelStatus| {
        sink.borrow_mut().push(status.clone())
    });
    stage.load(&mut src);

    assert_eq!(stage.load_state(), &LoadState::Ready);
    assert_eq!(
        seen.borrow().as_slice(),
        &[ModelStatus {
            success: true,
            message: None,
            clip_count: 2,
        }]
    );

    assert!(stage.play_clip(0).is_started());
    let pose = stage.update(0.5).unwrap();
    match pose.get("J_Bip_C_Hips", "position") {
        Some(Value::Vec3(p)) => approx(p[1], 0.95, 1e-5),
        other => panic!("unexpected hips value {other:?}"),
    }
}
