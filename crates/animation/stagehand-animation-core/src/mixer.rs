//! Mixer: owns clips and their actions for one character and blends the
//! running actions into a pose every frame.
//!
//! Methods:
//! - new, add_clip, clip_action (lazy), action/action_mut, update (sample -> accumulate -> blend)
//!
//! A joint property that loses its last contributing action is emitted once
//! more at its rest value, so hosts that only write listed joints settle back
//! to the bind pose.

use hashbrown::HashSet;
use log::debug;

use crate::accumulate::Accumulator;
use crate::action::Action;
use crate::data::{Clip, TrackBinding};
use crate::ids::{ActionId, ClipId, IdAllocator};
use crate::model::CharacterModel;
use crate::outputs::{JointChange, Pose};
use crate::sampling::sample_track;
use crate::value::Value;

/// Minimal clip library storage.
#[derive(Default, Debug)]
struct ClipLib {
    items: Vec<(ClipId, Clip)>,
}

impl ClipLib {
    fn insert(&mut self, id: ClipId, clip: Clip) {
        self.items.push((id, clip));
    }

    fn get(&self, id: ClipId) -> Option<&Clip> {
        self.items
            .iter()
            .find_map(|(c, clip)| if *c == id { Some(clip) } else { None })
    }
}

/// Runtime animation state bound to one character model.
#[derive(Debug)]
pub struct Mixer {
    model: CharacterModel,
    ids: IdAllocator,
    clips: ClipLib,
    actions: Vec<Action>,
    /// (clip, track index) pairs that target joints the model lacks.
    unbound: HashSet<(ClipId, usize)>,
    time: f32,
    pose: Pose,
    /// Track keys emitted by the previous `update`.
    driven: HashSet<String>,
}

impl Mixer {
    pub fn new(model: CharacterModel) -> Self {
        Self {
            model,
            ids: IdAllocator::new(),
            clips: ClipLib::default(),
            actions: Vec::new(),
            unbound: HashSet::new(),
            time: 0.0,
            pose: Pose::default(),
            driven: HashSet::new(),
        }
    }

    pub fn model(&self) -> &CharacterModel {
        &self.model
    }

    /// Total time advanced through `update`.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Take ownership of a clip and return its id. Tracks aimed at joints the
    /// model does not have are recorded as unbound and never sampled.
    pub fn add_clip(&mut self, clip: Clip) -> ClipId {
        let id = self.ids.alloc_clip();
        for (idx, track) in clip.tracks().iter().enumerate() {
            let bound = track
                .binding()
                .map(|b| self.model.has_joint(b.joint))
                .unwrap_or(false);
            if !bound {
                debug!(
                    "mixer: track '{}' of clip '{}' has no joint on '{}'",
                    track.name(),
                    clip.name(),
                    self.model.name()
                );
                self.unbound.insert((id, idx));
            }
        }
        self.clips.insert(id, clip);
        id
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.get(id)
    }

    /// The action for `clip`, creating it on first request and reusing it after.
    pub fn clip_action(&mut self, clip: ClipId) -> Option<ActionId> {
        if let Some(existing) = self.existing_action(clip) {
            return Some(existing);
        }
        let duration = self.clips.get(clip)?.duration();
        let id = self.ids.alloc_action();
        self.actions.push(Action::new(id, clip, duration));
        Some(id)
    }

    pub fn existing_action(&self, clip: ClipId) -> Option<ActionId> {
        self.actions.iter().find(|a| a.clip() == clip).map(Action::id)
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id() == id)
    }

    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.iter_mut().find(|a| a.id() == id)
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn running_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|a| a.is_running())
    }

    pub fn stop_all_actions(&mut self) {
        for action in &mut self.actions {
            action.stop();
        }
    }

    /// Advance every action by `dt` seconds and blend the running ones.
    pub fn update(&mut self, dt: f32) -> &Pose {
        self.pose.clear();
        self.time += dt;

        for action in &mut self.actions {
            action.advance(dt);
        }

        let mut accum = Accumulator::new();
        for action in self.actions.iter().filter(|a| a.is_running()) {
            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }
            let Some(clip) = self.clips.get(action.clip()) else {
                continue;
            };
            let t = action.local_time();
            for (idx, track) in clip.tracks().iter().enumerate() {
                if self.unbound.contains(&(action.clip(), idx)) {
                    continue;
                }
                accum.add(track.name(), &sample_track(track, t), weight);
            }
        }

        let model = &self.model;
        accum.fill_with(|key| {
            let binding = TrackBinding::parse(key)?;
            model.joint(binding.joint)?.rest_value(binding.kind())
        });

        let mut blended = accum.finalize();
        let released: Vec<(String, Value)> = self
            .driven
            .iter()
            .filter(|key| !blended.contains_key(key.as_str()))
            .filter_map(|key| {
                let binding = TrackBinding::parse(key)?;
                let rest = model.joint(binding.joint)?.rest_value(binding.kind())?;
                Some((key.clone(), rest))
            })
            .collect();
        self.driven = blended.keys().cloned().collect();
        blended.extend(released);

        let mut changes: Vec<JointChange> = blended
            .into_iter()
            .filter_map(|(key, value)| {
                let binding = TrackBinding::parse(&key)?;
                Some(JointChange {
                    joint: binding.joint.to_string(),
                    property: binding.property.to_string(),
                    value,
                })
            })
            .collect();
        changes.sort_by(|a, b| (&a.joint, &a.property).cmp(&(&b.joint, &b.property)));
        self.pose.changes = changes;

        &self.pose
    }
}
