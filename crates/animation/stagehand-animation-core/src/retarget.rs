//! Retargeting: rename a clip's tracks from source joints to target joints.
//!
//! Unmapped joints (helper/IK joints that exist only in the motion source) are
//! dropped silently apart from a debug log. Malformed track names are skipped
//! with a warning so that one bad track never aborts the rest of the clip.

use log::{debug, warn};
use serde::Serialize;

use crate::bone_map::BoneMap;
use crate::data::{track_name, Clip};
use crate::error::RetargetWarning;

/// Summary of one retarget pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RetargetReport {
    pub source_tracks: usize,
    pub mapped_tracks: usize,
    pub warnings: Vec<RetargetWarning>,
}

impl RetargetReport {
    pub fn dropped_tracks(&self) -> usize {
        self.source_tracks - self.mapped_tracks
    }
}

/// Retarget `source` through `bones`. The source clip is left untouched; the
/// result keeps its name and duration.
pub fn retarget(source: &Clip, bones: &BoneMap) -> Clip {
    retarget_with_report(source, bones).0
}

/// Like [`retarget`], also returning what was mapped and what was dropped.
pub fn retarget_with_report(source: &Clip, bones: &BoneMap) -> (Clip, RetargetReport) {
    let mut report = RetargetReport {
        source_tracks: source.tracks().len(),
        ..RetargetReport::default()
    };
    let mut tracks = Vec::with_capacity(source.tracks().len());

    for track in source.tracks() {
        let Some(binding) = track.binding() else {
            warn!(
                "retarget: skipping malformed track '{}' in clip '{}'",
                track.name(),
                source.name()
            );
            report.warnings.push(RetargetWarning::MalformedTrackName {
                clip: source.name().to_string(),
                track: track.name().to_string(),
            });
            continue;
        };

        match bones.resolve(binding.joint) {
            Some(target) => {
                tracks.push(track.renamed(track_name(target, binding.property)));
            }
            None => {
                debug!(
                    "retarget: dropping track '{}' (no mapping for joint '{}')",
                    track.name(),
                    binding.joint
                );
                report.warnings.push(RetargetWarning::UnmappedJoint {
                    clip: source.name().to_string(),
                    joint: binding.joint.to_string(),
                });
            }
        }
    }

    report.mapped_tracks = tracks.len();
    if tracks.is_empty() && !source.is_empty() {
        warn!(
            "retarget: clip '{}' has no tracks for the target skeleton",
            source.name()
        );
        report.warnings.push(RetargetWarning::NoMappableTracks {
            clip: source.name().to_string(),
        });
    }

    (source.with_tracks(tracks), report)
}

/// Retarget every clip in order.
pub fn retarget_all(sources: &[Clip], bones: &BoneMap) -> Vec<(Clip, RetargetReport)> {
    sources
        .iter()
        .map(|clip| retarget_with_report(clip, bones))
        .collect()
}
