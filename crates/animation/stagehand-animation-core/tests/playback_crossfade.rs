use std::cell::Cell;
use std::rc::Rc;

use stagehand_animation_core::{
    decode_asset, retarget_all, ActionId, ActionState, AudioError, AudioSink, AudioStatus, BoneMap,
    CharacterModel, ClipPlayer, Config, LoopMode, NullAudio, PlaybackController, PlaybackStatus,
    PlaybackWarning, Value,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// Counts restarts; optionally fails every one of them.
struct CountingAudio {
    restarts: Rc<Cell<u32>>,
    fail: bool,
}

impl AudioSink for CountingAudio {
    fn restart(&mut self) -> Result<(), AudioError> {
        self.restarts.set(self.restarts.get() + 1);
        if self.fail {
            Err(AudioError::Rejected("autoplay blocked".into()))
        } else {
            Ok(())
        }
    }
}

fn loaded_controller(cfg: &Config, audio: Box<dyn AudioSink>) -> PlaybackController {
    let character = decode_asset(
        "character.json",
        &stagehand_test_fixtures::characters::bytes("vrm-humanoid").unwrap(),
    )
    .unwrap();
    let motion = decode_asset(
        "motion.json",
        &stagehand_test_fixtures::animations::bytes("mocap-dance").unwrap(),
    )
    .unwrap();

    let mut ctl = PlaybackController::new(cfg, audio);
    ctl.attach_model(CharacterModel::from(character));
    let clips = retarget_all(&motion.animations, &BoneMap::standard())
        .into_iter()
        .map(|(clip, _)| clip)
        .collect();
    assert_eq!(ctl.register_motion_clips(clips), 2);
    ctl
}

fn started(status: &PlaybackStatus) -> (ActionId, Option<ActionId>) {
    match status {
        PlaybackStatus::Started {
            action, faded_out, ..
        } => (*action, *faded_out),
        other => panic!("expected Started, got {other:?}"),
    }
}

/// it should ignore play requests until a model is attached
#[test]
fn play_before_load_is_a_logged_noop() {
    let mut ctl = PlaybackController::new(&Config::default(), Box::new(NullAudio));
    let status = ctl.play_clip(0);
    assert_eq!(
        status,
        PlaybackStatus::Ignored {
            warning: PlaybackWarning::NotReady {
                action: "dance_0".into()
            }
        }
    );
    assert!(ctl.current().is_none());
    assert!(ctl.update(0.016).is_none());
}

/// it should keep the current action when the requested index is unknown
#[test]
fn unknown_index_leaves_state_unchanged() {
    let mut ctl = loaded_controller(&Config::default(), Box::new(NullAudio));
    let (first, _) = started(&ctl.play_clip(0));

    let status = ctl.play_clip(7);
    assert!(matches!(
        status,
        PlaybackStatus::Ignored {
            warning: PlaybackWarning::UnknownAction { .. }
        }
    ));
    assert_eq!(ctl.current(), Some(first));
    let mixer = ctl.mixer().unwrap();
    assert_eq!(mixer.action(first).unwrap().state(), ActionState::FadingIn);
}

/// it should fade out the previous action so only the new one keeps running
#[test]
fn switching_clips_leaves_exactly_one_running() {
    let mut ctl = loaded_controller(&Config::default(), Box::new(NullAudio));
    let (a, faded) = started(&ctl.play_clip(0));
    assert_eq!(faded, None);
    ctl.update(0.25);

    let (b, faded) = started(&ctl.play_clip(1));
    assert_ne!(a, b);
    assert_eq!(faded, Some(a));
    {
        let mixer = ctl.mixer().unwrap();
        assert!(mixer.action(a).unwrap().is_stopping());
        assert_eq!(mixer.action(b).unwrap().state(), ActionState::FadingIn);
        let playing: Vec<_> = mixer
            .running_actions()
            .filter(|act| !act.is_stopping())
            .map(|act| act.id())
            .collect();
        assert_eq!(playing, vec![b]);
    }

    ctl.update(0.5);
    let mixer = ctl.mixer().unwrap();
    assert_eq!(mixer.action(a).unwrap().state(), ActionState::Stopped);
    let running: Vec<_> = mixer.running_actions().map(|act| act.id()).collect();
    assert_eq!(running, vec![b]);
    assert_eq!(ctl.current(), Some(b));
}

/// it should restart the same clip from zero without fading it out
#[test]
fn replaying_the_same_clip_resets_it() {
    let mut ctl = loaded_controller(&Config::default(), Box::new(NullAudio));
    let (a, _) = started(&ctl.play_clip(0));
    ctl.update(0.75);
    approx(ctl.mixer().unwrap().action(a).unwrap().elapsed(), 0.75, 1e-6);

    let (again, faded) = started(&ctl.play_clip(0));
    assert_eq!(again, a);
    assert_eq!(faded, None);
    let action = ctl.mixer().unwrap().action(a).unwrap();
    assert_eq!(action.elapsed(), 0.0);
    assert_eq!(action.state(), ActionState::FadingIn);
    assert_eq!(action.loop_mode(), LoopMode::Repeat);
}

/// it should cut over in one step when the fade duration is zero
#[test]
fn zero_fade_switches_immediately() {
    let cfg = Config {
        fade_duration: 0.0,
        ..Config::default()
    };
    let mut ctl = loaded_controller(&cfg, Box::new(NullAudio));
    let (a, _) = started(&ctl.play_clip(0));
    let (b, _) = started(&ctl.play_clip(1));
    let mixer = ctl.mixer().unwrap();
    assert_eq!(mixer.action(a).unwrap().state(), ActionState::Stopped);
    assert_eq!(mixer.action(b).unwrap().state(), ActionState::Looping);
    assert_eq!(mixer.action(b).unwrap().effective_weight(), 1.0);
}

/// it should return joints only the old clip drove to their rest pose
#[test]
fn switching_returns_joints_the_new_clip_ignores_to_rest() {
    let cfg = Config {
        fade_duration: 0.0,
        ..Config::default()
    };
    let mut ctl = loaded_controller(&cfg, Box::new(NullAudio));
    ctl.play_clip(0);
    let pose = ctl.update(0.5).unwrap();
    match pose.get("J_Bip_C_Spine", "quaternion") {
        Some(Value::Quat(q)) => assert!(q[0] > 0.01),
        other => panic!("unexpected spine value {other:?}"),
    }

    ctl.play_clip(1);
    let pose = ctl.update(0.1).unwrap();
    assert_eq!(
        pose.get("J_Bip_C_Spine", "quaternion"),
        Some(&Value::Quat([0.0, 0.0, 0.0, 1.0]))
    );
    assert!(pose.get("J_Bip_C_Hips", "position").is_some());

    let pose = ctl.update(0.1).unwrap();
    assert!(pose.get("J_Bip_C_Spine", "quaternion").is_none());
}

/// it should emit target joint names sampled from the retargeted clip
#[test]
fn pose_follows_the_retargeted_clip() {
    let mut ctl = loaded_controller(&Config::default(), Box::new(NullAudio));
    ctl.play_clip(1);
    let pose = ctl.update(0.5).unwrap();

    match pose.get("J_Bip_C_Hips", "position") {
        Some(Value::Vec3(p)) => {
            approx(p[0], 0.0, 1e-5);
            approx(p[1], 0.9, 1e-5);
        }
        other => panic!("unexpected hips value {other:?}"),
    }
    assert!(pose.get("J_Bip_C_Head", "quaternion").is_some());
    assert!(pose.get("hips_JNT", "position").is_none());
}

/// it should blend a fading-in clip against the rest pose
#[test]
fn fading_in_blends_from_the_rest_pose() {
    let mut ctl = loaded_controller(&Config::default(), Box::new(NullAudio));
    ctl.play_clip(1);
    // Halfway through the fade: weight 0.5 against the rest translation [0, 0.9, 0].
    let pose = ctl.update(0.25).unwrap();
    match pose.get("J_Bip_C_Hips", "position") {
        // sway at t=0.25 is x=-0.1, blended half-way toward x=0.
        Some(Value::Vec3(p)) => approx(p[0], -0.05, 1e-5),
        other => panic!("unexpected hips value {other:?}"),
    }
}

/// it should restart audio on every play and report failures without erroring
#[test]
fn audio_restarts_on_every_play_and_failures_are_caught() {
    let restarts = Rc::new(Cell::new(0));
    let audio = CountingAudio {
        restarts: restarts.clone(),
        fail: true,
    };
    let mut ctl = loaded_controller(&Config::default(), Box::new(audio));

    let status = ctl.play_clip(0);
    match status {
        PlaybackStatus::Started { audio, .. } => {
            assert!(matches!(audio, AudioStatus::Failed(msg) if msg.contains("autoplay")));
        }
        other => panic!("expected Started, got {other:?}"),
    }
    ctl.play_clip(1);
    assert_eq!(restarts.get(), 2);
    assert!(ctl.current().is_some());
}

/// it should register built-in clips under their own names next to dance_<i>
#[test]
fn builtin_clips_are_playable_by_name() {
    let mut ctl = loaded_controller(&Config::default(), Box::new(NullAudio));
    assert!(ctl.play_action("idle").is_started());
    let mut names: Vec<&str> = ctl.registered_names().collect();
    names.sort_unstable();
    assert_eq!(names, ["dance_0", "dance_1", "idle"]);
}

/// it should fade out the current action on stop_all
#[test]
fn stop_all_fades_out_the_current_action() {
    let mut ctl = loaded_controller(&Config::default(), Box::new(NullAudio));
    let (a, _) = started(&ctl.play_clip(0));
    ctl.update(0.5);
    ctl.stop_all();
    assert!(ctl.current().is_none());
    ctl.update(0.5);
    assert_eq!(
        ctl.mixer().unwrap().action(a).unwrap().state(),
        ActionState::Stopped
    );
}

/// it should drop the mixer and registry on teardown
#[test]
fn teardown_returns_to_not_ready() {
    let mut ctl = loaded_controller(&Config::default(), Box::new(NullAudio));
    ctl.play_clip(0);
    ctl.teardown();
    assert!(!ctl.is_ready());
    assert!(!ctl.play_clip(0).is_started());
}
