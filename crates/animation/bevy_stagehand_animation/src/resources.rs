use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;
use hashbrown::HashMap;
use stagehand_animation_core::{AudioError, AudioSink, ModelStatus, Pose, Stage};

/// The core stage. Stored as a non-send resource: its listener and audio
/// sink are not `Send`.
pub struct StageResource(pub Stage);

/// Directory the startup load reads assets from.
#[derive(Resource, Clone, Debug)]
pub struct AssetRoot(pub PathBuf);

/// Joint name (as used in track identifiers) -> entity.
#[derive(Resource, Default)]
pub struct JointIndex {
    pub map: HashMap<String, Entity>,
}

/// Pose computed this frame, applied in a separate system.
#[derive(Resource, Default)]
pub struct PendingPose(pub Pose);

/// Load notifications queued by the stage listener until the next frame
/// turns them into `ModelLoaded` events.
#[derive(Clone, Default)]
pub struct ModelStatusInbox(pub Rc<RefCell<Vec<ModelStatus>>>);

impl ModelStatusInbox {
    pub fn push(&self, status: ModelStatus) {
        self.0.borrow_mut().push(status);
    }

    pub fn drain(&self) -> Vec<ModelStatus> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Raised by the core when a clip starts; consumed by the soundtrack system.
#[derive(Resource, Clone, Default)]
pub struct SoundtrackCue(Arc<AtomicBool>);

impl SoundtrackCue {
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns whether a restart was requested, clearing the request.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Audio sink handed to the core: it only raises the cue; the ECS side
/// spawns the actual audio entity.
pub struct CueAudio(pub SoundtrackCue);

impl AudioSink for CueAudio {
    fn restart(&mut self) -> Result<(), AudioError> {
        self.0.raise();
        Ok(())
    }
}
