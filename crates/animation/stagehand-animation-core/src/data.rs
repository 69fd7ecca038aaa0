//! Keyframe track and clip data model.
//!
//! A track is identified by `"<joint>.<property>"` and stores a flat value
//! buffer with one fixed-size group of components per keyframe time. Clips are
//! immutable after construction; everything else in the crate reads them
//! through accessors.

use serde::{Deserialize, Serialize};

use crate::error::ClipError;

/// Keyframe interpolation between two samples.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Hold the left key until the next one.
    Step,
    /// Component-wise lerp; quaternions use shortest-arc nlerp.
    #[default]
    Linear,
}

/// Semantic category of a track's property name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrackProperty {
    Position,
    Rotation,
    Scale,
    /// Unrecognised property; passed through untouched.
    Other,
}

impl TrackProperty {
    pub fn from_name(name: &str) -> Self {
        match name {
            "position" | "translation" => TrackProperty::Position,
            "quaternion" | "rotation" => TrackProperty::Rotation,
            "scale" => TrackProperty::Scale,
            _ => TrackProperty::Other,
        }
    }

    /// Components per keyframe, when fixed by the property.
    pub fn arity(self) -> Option<usize> {
        match self {
            TrackProperty::Position | TrackProperty::Scale => Some(3),
            TrackProperty::Rotation => Some(4),
            TrackProperty::Other => None,
        }
    }
}

/// The `(joint, property)` pair a track name splits into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrackBinding<'a> {
    pub joint: &'a str,
    pub property: &'a str,
}

impl<'a> TrackBinding<'a> {
    /// Split `"<joint>.<property>"`. Anything other than exactly two
    /// non-empty parts yields `None`.
    pub fn parse(name: &'a str) -> Option<Self> {
        let mut parts = name.split('.');
        let joint = parts.next()?;
        let property = parts.next()?;
        if parts.next().is_some() || joint.is_empty() || property.is_empty() {
            return None;
        }
        Some(Self { joint, property })
    }

    pub fn kind(&self) -> TrackProperty {
        TrackProperty::from_name(self.property)
    }
}

#[inline]
pub fn track_name(joint: &str, property: &str) -> String {
    format!("{joint}.{property}")
}

/// A single animated property of a single joint.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Track {
    name: String,
    interpolation: Interpolation,
    times: Vec<f32>,
    values: Vec<f32>,
}

impl Track {
    /// Build a linear track, validating times and the value buffer.
    pub fn new(
        name: impl Into<String>,
        times: Vec<f32>,
        values: Vec<f32>,
    ) -> Result<Self, ClipError> {
        Self::with_interpolation(name, Interpolation::Linear, times, values)
    }

    pub fn with_interpolation(
        name: impl Into<String>,
        interpolation: Interpolation,
        times: Vec<f32>,
        values: Vec<f32>,
    ) -> Result<Self, ClipError> {
        let track = Self {
            name: name.into(),
            interpolation,
            times,
            values,
        };
        track.validate()?;
        Ok(track)
    }

    fn validate(&self) -> Result<(), ClipError> {
        if self.times.is_empty() {
            return Err(ClipError::EmptyTrack {
                track: self.name.clone(),
            });
        }
        let mut last = f32::NEG_INFINITY;
        for (index, &t) in self.times.iter().enumerate() {
            if !t.is_finite() || t <= last {
                return Err(ClipError::NonIncreasingTimes {
                    track: self.name.clone(),
                    index,
                });
            }
            last = t;
        }
        let keys = self.times.len();
        let expected = self.declared_arity().unwrap_or_else(|| {
            // Unknown property: infer, but demand at least one component per key.
            (self.values.len() / keys).max(1)
        });
        if self.values.len() != expected * keys {
            return Err(ClipError::ArityMismatch {
                track: self.name.clone(),
                expected,
                actual: self.values.len(),
                keys,
            });
        }
        Ok(())
    }

    fn declared_arity(&self) -> Option<usize> {
        self.binding().and_then(|b| b.kind().arity())
    }

    /// Copy of this track's samples under a different identifier.
    pub(crate) fn renamed(&self, name: String) -> Track {
        Track {
            name,
            interpolation: self.interpolation,
            times: self.times.clone(),
            values: self.values.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> Option<TrackBinding<'_>> {
        TrackBinding::parse(&self.name)
    }

    pub fn property(&self) -> TrackProperty {
        self.binding()
            .map(|b| b.kind())
            .unwrap_or(TrackProperty::Other)
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Components per keyframe.
    pub fn arity(&self) -> usize {
        self.values.len() / self.times.len().max(1)
    }

    pub fn key_count(&self) -> usize {
        self.times.len()
    }

    /// Components of key `i`.
    pub fn key(&self, i: usize) -> &[f32] {
        let n = self.arity();
        &self.values[i * n..(i + 1) * n]
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

/// A named, fixed-duration bundle of tracks sharing one timeline.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Clip {
    name: String,
    /// Seconds.
    duration: f32,
    tracks: Vec<Track>,
}

impl Clip {
    /// A negative `duration` means "derive it from the longest track".
    pub fn new(
        name: impl Into<String>,
        duration: f32,
        tracks: Vec<Track>,
    ) -> Result<Self, ClipError> {
        let name = name.into();
        let end_time = tracks.iter().map(Track::end_time).fold(0.0f32, f32::max);
        let duration = if duration < 0.0 { end_time } else { duration };
        if !duration.is_finite() || duration + 1e-6 < end_time {
            return Err(ClipError::DurationTooShort {
                clip: name,
                duration,
                end_time,
            });
        }
        Ok(Self {
            name,
            duration,
            tracks,
        })
    }

    /// Used by the retargeter: same name and duration, new (already valid) tracks.
    pub(crate) fn with_tracks(&self, tracks: Vec<Track>) -> Clip {
        Clip {
            name: self.name.clone(),
            duration: self.duration,
            tracks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
