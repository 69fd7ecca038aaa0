//! Playback actions: per-clip runtime state inside a mixer.
//!
//! State machine:
//!
//! ```text
//! Idle -> FadingIn -> Looping -> FadingOut -> Stopped -> (reset) Idle
//! ```
//!
//! `play` without a pending fade-in goes straight to `Looping`; a completed
//! fade-out stops the action by itself.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::interp::functions::lerp_f32;
use crate::ids::{ActionId, ClipId};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Repeat,
    PingPong,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    FadingIn,
    Looping,
    FadingOut,
    Stopped,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Reflect t into [0, span] with ping-pong behavior, where period = 2 * span.
fn ping_pong(t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    let m = fmod(t, 2.0 * span);
    if m <= span {
        m
    } else {
        2.0 * span - m
    }
}

/// Runtime binding of one clip to the mixer.
#[derive(Clone, Debug)]
pub struct Action {
    id: ActionId,
    clip: ClipId,
    clip_duration: f32,
    /// Unwrapped action time; loop mode maps it onto the clip.
    time: f32,
    weight: f32,
    effective_weight: f32,
    loop_mode: LoopMode,
    state: ActionState,
    fade: Option<Fade>,
    paused: bool,
}

impl Action {
    pub(crate) fn new(id: ActionId, clip: ClipId, clip_duration: f32) -> Self {
        Self {
            id,
            clip,
            clip_duration,
            time: 0.0,
            weight: 1.0,
            effective_weight: 0.0,
            loop_mode: LoopMode::Repeat,
            state: ActionState::Idle,
            fade: None,
            paused: false,
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn clip(&self) -> ClipId {
        self.clip
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Weight after fading; this is what the mixer blends with.
    pub fn effective_weight(&self) -> f32 {
        self.effective_weight
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// FadingIn, Looping or FadingOut.
    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            ActionState::FadingIn | ActionState::Looping | ActionState::FadingOut
        )
    }

    /// Fading out toward a stop, or already stopped.
    pub fn is_stopping(&self) -> bool {
        matches!(self.state, ActionState::FadingOut | ActionState::Stopped)
    }

    /// Unwrapped time since the last reset, in seconds.
    pub fn elapsed(&self) -> f32 {
        self.time
    }

    /// Time on the clip timeline after applying the loop mode.
    pub fn local_time(&self) -> f32 {
        let d = self.clip_duration;
        if d <= 0.0 {
            return 0.0;
        }
        match self.loop_mode {
            LoopMode::Once => self.time.clamp(0.0, d),
            LoopMode::Repeat => fmod(self.time, d),
            LoopMode::PingPong => ping_pong(self.time, d),
        }
    }

    /// Back to the start: time zero, no fade, `Idle`.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.fade = None;
        self.paused = false;
        self.state = ActionState::Idle;
        self.effective_weight = self.weight;
        self
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    /// Ramp the effective weight from zero to `weight` over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        if duration <= 0.0 {
            self.fade = None;
            self.effective_weight = self.weight;
            if self.state == ActionState::FadingIn {
                self.state = ActionState::Looping;
            }
            return self;
        }
        self.fade = Some(Fade {
            from: 0.0,
            to: self.weight,
            elapsed: 0.0,
            duration,
        });
        self.effective_weight = 0.0;
        if self.is_running() {
            self.state = ActionState::FadingIn;
        }
        self
    }

    /// Ramp the effective weight down to zero, then stop. No-op unless running.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        if !self.is_running() {
            return self;
        }
        if duration <= 0.0 {
            return self.stop();
        }
        self.fade = Some(Fade {
            from: self.effective_weight,
            to: 0.0,
            elapsed: 0.0,
            duration,
        });
        self.state = ActionState::FadingOut;
        self
    }

    /// Start (or restart after a stop). Already running actions are unaffected.
    pub fn play(&mut self) -> &mut Self {
        self.paused = false;
        if matches!(self.state, ActionState::Idle | ActionState::Stopped) {
            if self.fade.is_some() {
                self.state = ActionState::FadingIn;
            } else {
                self.effective_weight = self.weight;
                self.state = ActionState::Looping;
            }
        }
        self
    }

    /// Immediate stop; contributes nothing until played again.
    pub fn stop(&mut self) -> &mut Self {
        self.state = ActionState::Stopped;
        self.fade = None;
        self.effective_weight = 0.0;
        self
    }

    pub fn pause(&mut self) -> &mut Self {
        self.paused = true;
        self
    }

    pub fn resume(&mut self) -> &mut Self {
        self.paused = false;
        self
    }

    /// Advance time and fade by `dt` seconds.
    pub(crate) fn advance(&mut self, dt: f32) {
        if !self.is_running() || self.paused {
            return;
        }
        self.time += dt;

        if let Some(mut fade) = self.fade {
            fade.elapsed += dt;
            let k = (fade.elapsed / fade.duration).min(1.0);
            self.effective_weight = lerp_f32(fade.from, fade.to, k);
            if k >= 1.0 {
                self.fade = None;
                match self.state {
                    ActionState::FadingIn => self.state = ActionState::Looping,
                    ActionState::FadingOut => {
                        debug!("action {:?} faded out", self.id);
                        self.stop();
                        return;
                    }
                    _ => {}
                }
            } else {
                self.fade = Some(fade);
            }
        }

        if self.loop_mode == LoopMode::Once && self.time >= self.clip_duration {
            self.time = self.clip_duration;
            debug!("action {:?} finished", self.id);
            self.stop();
        }
    }
}
