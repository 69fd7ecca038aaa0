//! Stage: the facade hosts drive. It owns the load state, the bone map and the
//! playback controller, and reports load completion through one listener.

use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

use crate::audio::{AudioSink, AudioStatus};
use crate::bone_map::BoneMap;
use crate::config::Config;
use crate::error::LoadError;
use crate::loader::{load_asset, AssetLoader, AssetSource, LoadRequest, LoadState};
use crate::model::{CharacterModel, LoadedAsset};
use crate::outputs::Pose;
use crate::playback::{ClipPlayer, PlaybackController, PlaybackStatus};
use crate::retarget::retarget_all;

/// Payload of the model-loaded notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Motion clips registered as playable actions.
    pub clip_count: usize,
}

impl ModelStatus {
    fn loaded(clip_count: usize) -> Self {
        Self {
            success: true,
            message: None,
            clip_count,
        }
    }

    fn failed(err: &LoadError) -> Self {
        Self {
            success: false,
            message: Some(err.user_message()),
            clip_count: 0,
        }
    }
}

pub type ModelLoadedListener = Box<dyn FnMut(&ModelStatus)>;

pub struct Stage {
    cfg: Config,
    bones: BoneMap,
    loader: AssetLoader,
    playback: PlaybackController,
    listener: Option<ModelLoadedListener>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("cfg", &self.cfg)
            .field("bones", &self.bones.len())
            .field("loader", &self.loader)
            .field("playback", &self.playback)
            .finish()
    }
}

impl Stage {
    pub fn new(cfg: Config, bones: BoneMap, audio: Box<dyn AudioSink>) -> Self {
        let playback = PlaybackController::new(&cfg, audio);
        Self {
            cfg,
            bones,
            loader: AssetLoader::new(),
            playback,
            listener: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn bone_map(&self) -> &BoneMap {
        &self.bones
    }

    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController {
        &mut self.playback
    }

    pub fn set_model_loaded_listener(&mut self, listener: impl FnMut(&ModelStatus) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Fetch, decode, retarget and register in one go.
    pub fn load(&mut self, source: &mut dyn AssetSource) -> LoadRequest {
        if self.begin_load() == LoadRequest::Suppressed {
            return LoadRequest::Suppressed;
        }
        let character = load_asset(source, &self.cfg.assets.character);
        let motion = character
            .is_ok()
            .then(|| load_asset(source, &self.cfg.assets.motion));
        match (character, motion) {
            (Ok(character), Some(Ok(motion))) => {
                self.complete_load(character, motion);
            }
            (Err(e), _) | (_, Some(Err(e))) => {
                self.fail_load(e);
            }
            (Ok(_), None) => {}
        }
        LoadRequest::Started
    }

    /// Mark a load as in flight. Hosts that fetch asynchronously call this,
    /// then exactly one of `complete_load` / `fail_load`.
    pub fn begin_load(&mut self) -> LoadRequest {
        self.loader.try_begin()
    }

    /// Install the character and its retargeted motion. Returns the status
    /// also passed to the listener.
    pub fn complete_load(&mut self, character: LoadedAsset, motion: LoadedAsset) -> ModelStatus {
        if character.scene.joints.is_empty() {
            return self.fail_load(LoadError::MissingCharacter {
                path: PathBuf::from(&self.cfg.assets.character),
            });
        }

        let model = CharacterModel::from(character);
        info!(
            "stage: character '{}' loaded with {} joints",
            model.name(),
            model.joint_count()
        );
        self.playback.attach_model(model);

        let retargeted: Vec<_> = retarget_all(&motion.animations, &self.bones)
            .into_iter()
            .map(|(clip, report)| {
                info!(
                    "stage: retargeted '{}' ({} of {} tracks)",
                    clip.name(),
                    report.mapped_tracks,
                    report.source_tracks
                );
                clip
            })
            .collect();
        let count = self.playback.register_motion_clips(retargeted);

        self.loader.finish(&Ok(()));
        let status = ModelStatus::loaded(count);
        self.notify(&status);
        status
    }

    /// Record a failed load. Any previously attached model is dropped so the
    /// stage never plays clips from a load that is no longer current.
    pub fn fail_load(&mut self, err: LoadError) -> ModelStatus {
        warn!("stage: load failed: {err}");
        self.playback.teardown();
        let status = ModelStatus::failed(&err);
        self.loader.finish(&Err(err));
        self.notify(&status);
        status
    }

    pub fn play_action(&mut self, name: &str) -> PlaybackStatus {
        self.playback.play_action(name)
    }

    pub fn stop_all(&mut self) {
        self.playback.stop_all();
    }

    pub fn restart_audio(&mut self) -> AudioStatus {
        self.playback.restart_audio()
    }

    pub fn update(&mut self, dt: f32) -> Option<&Pose> {
        self.playback.update(dt)
    }

    fn notify(&mut self, status: &ModelStatus) {
        if let Some(listener) = self.listener.as_mut() {
            listener(status);
        }
    }
}

impl ClipPlayer for Stage {
    fn play_clip(&mut self, index: usize) -> PlaybackStatus {
        self.playback.play_clip(index)
    }
}
