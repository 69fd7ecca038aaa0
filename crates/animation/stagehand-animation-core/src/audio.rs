//! Audio sink seam. Hosts plug in their own player; the core only asks it to
//! restart the soundtrack when a clip starts, and never lets a failure escape.

use serde::Serialize;

use crate::error::AudioError;

/// Something that can (re)start the synchronized soundtrack.
pub trait AudioSink {
    /// Restart playback from the beginning.
    fn restart(&mut self) -> Result<(), AudioError>;

    fn stop(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sink for hosts without audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn restart(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Outcome of the best-effort audio side effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum AudioStatus {
    Started,
    Failed(String),
}
