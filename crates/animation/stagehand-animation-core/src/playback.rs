//! Playback controller: crossfades between registered clips on request.
//!
//! The controller owns the mixer and the pointer to the current action. Clips
//! are registered under a name (`dance_<index>` for retargeted motion) and get
//! an action the first time they are played. Requests that cannot be served
//! are logged and answered with a status; nothing here returns an error to the
//! UI.

use hashbrown::HashMap;
use log::{info, warn};
use serde::Serialize;

use crate::action::LoopMode;
use crate::audio::{AudioSink, AudioStatus, NullAudio};
use crate::config::Config;
use crate::data::Clip;
use crate::error::PlaybackWarning;
use crate::ids::{ActionId, ClipId};
use crate::mixer::Mixer;
use crate::model::CharacterModel;
use crate::outputs::Pose;

/// Result of a play request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaybackStatus {
    Started {
        action: ActionId,
        /// Action that was told to fade out, if one was playing.
        faded_out: Option<ActionId>,
        audio: AudioStatus,
    },
    Ignored {
        warning: PlaybackWarning,
    },
}

impl PlaybackStatus {
    pub fn is_started(&self) -> bool {
        matches!(self, PlaybackStatus::Started { .. })
    }
}

/// Capability handed to UI code: the single "play clip by index" command.
pub trait ClipPlayer {
    fn play_clip(&mut self, index: usize) -> PlaybackStatus;
}

pub struct PlaybackController {
    fade_duration: f32,
    config: Config,
    mixer: Option<Mixer>,
    registry: HashMap<String, ClipId>,
    current: Option<ActionId>,
    audio: Box<dyn AudioSink>,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("fade_duration", &self.fade_duration)
            .field("action_prefix", &self.config.action_prefix)
            .field("ready", &self.mixer.is_some())
            .field("registered", &self.registry.len())
            .field("current", &self.current)
            .finish()
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(&Config::default(), Box::new(NullAudio))
    }
}

impl PlaybackController {
    pub fn new(cfg: &Config, audio: Box<dyn AudioSink>) -> Self {
        Self {
            fade_duration: cfg.fade_duration.max(0.0),
            config: cfg.clone(),
            mixer: None,
            registry: HashMap::new(),
            current: None,
            audio,
        }
    }

    /// Bind to a freshly loaded model. Its built-in clips are registered under
    /// their own names. Any previous model and its actions are dropped.
    pub fn attach_model(&mut self, model: CharacterModel) {
        self.teardown();
        let builtin: Vec<Clip> = model.builtin_clips().to_vec();
        self.mixer = Some(Mixer::new(model));
        for clip in builtin {
            let name = clip.name().to_string();
            self.register_clip(name, clip);
        }
    }

    /// Register retargeted motion clips as `{prefix}0`, `{prefix}1`, ...
    /// Returns the number registered; zero if no model is attached.
    pub fn register_motion_clips(&mut self, clips: Vec<Clip>) -> usize {
        let mut count = 0;
        for (index, clip) in clips.into_iter().enumerate() {
            let name = self.config.action_name(index);
            if self.register_clip(name, clip).is_some() {
                count += 1;
            }
        }
        count
    }

    /// Register one clip under `name`. Returns `None` when no model is attached.
    pub fn register_clip(&mut self, name: impl Into<String>, clip: Clip) -> Option<ClipId> {
        let name = name.into();
        let Some(mixer) = self.mixer.as_mut() else {
            warn!("playback: cannot register '{name}' before a model is attached");
            return None;
        };
        let id = mixer.add_clip(clip);
        info!("playback: registered '{name}'");
        self.registry.insert(name, id);
        Some(id)
    }

    /// Swap the soundtrack sink; hosts may provide one after construction.
    pub fn set_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.audio = audio;
    }

    pub fn is_ready(&self) -> bool {
        self.mixer.is_some()
    }

    pub fn mixer(&self) -> Option<&Mixer> {
        self.mixer.as_ref()
    }

    pub fn current(&self) -> Option<ActionId> {
        self.current
    }

    pub fn fade_duration(&self) -> f32 {
        self.fade_duration
    }

    pub fn registered_names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    /// The action bound to a registered name, if it has been played before.
    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        let clip = *self.registry.get(name)?;
        self.mixer.as_ref()?.existing_action(clip)
    }

    /// Crossfade to the action registered under `name`.
    pub fn play_action(&mut self, name: &str) -> PlaybackStatus {
        let Some(mixer) = self.mixer.as_mut() else {
            return ignored(PlaybackWarning::NotReady {
                action: name.to_string(),
            });
        };
        let Some(target) = self
            .registry
            .get(name)
            .and_then(|clip| mixer.clip_action(*clip))
        else {
            return ignored(PlaybackWarning::UnknownAction {
                action: name.to_string(),
            });
        };

        let fade = self.fade_duration;
        let mut faded_out = None;
        if let Some(previous) = self.current.filter(|prev| *prev != target) {
            if let Some(action) = mixer.action_mut(previous) {
                action.fade_out(fade);
                faded_out = Some(previous);
            }
        }

        if let Some(action) = mixer.action_mut(target) {
            action
                .reset()
                .fade_in(fade)
                .play()
                .set_loop(LoopMode::Repeat);
        }
        self.current = Some(target);

        let audio = match self.audio.restart() {
            Ok(()) => AudioStatus::Started,
            Err(e) => {
                warn!("playback: audio restart failed: {e}");
                AudioStatus::Failed(e.to_string())
            }
        };

        PlaybackStatus::Started {
            action: target,
            faded_out,
            audio,
        }
    }

    /// Fade out whatever is playing and stop the soundtrack.
    pub fn stop_all(&mut self) {
        if let (Some(mixer), Some(current)) = (self.mixer.as_mut(), self.current.take()) {
            if let Some(action) = mixer.action_mut(current) {
                action.fade_out(self.fade_duration);
            }
        }
        if let Err(e) = self.audio.stop() {
            warn!("playback: audio stop failed: {e}");
        }
    }

    /// Restart only the soundtrack (UI shells re-trigger music after overlays).
    pub fn restart_audio(&mut self) -> AudioStatus {
        match self.audio.restart() {
            Ok(()) => AudioStatus::Started,
            Err(e) => {
                warn!("playback: audio restart failed: {e}");
                AudioStatus::Failed(e.to_string())
            }
        }
    }

    /// Advance the mixer; `None` until a model is attached.
    pub fn update(&mut self, dt: f32) -> Option<&Pose> {
        self.mixer.as_mut().map(|m| m.update(dt))
    }

    /// Drop the mixer, every action and the registry.
    pub fn teardown(&mut self) {
        self.mixer = None;
        self.registry.clear();
        self.current = None;
    }
}

impl ClipPlayer for PlaybackController {
    fn play_clip(&mut self, index: usize) -> PlaybackStatus {
        let name = self.config.action_name(index);
        self.play_action(&name)
    }
}

fn ignored(warning: PlaybackWarning) -> PlaybackStatus {
    warn!("playback: {warning}");
    PlaybackStatus::Ignored { warning }
}
