//! glTF / GLB / VRM decoding.
//!
//! Only the skeleton and animation data are read. Images are never decoded and
//! morph-target channels are skipped.

use std::path::Path;

use gltf::animation::util::ReadOutputs;
use gltf::animation::{Interpolation as GltfInterpolation, Property};
use log::{debug, warn};

use crate::data::{track_name, Clip, Interpolation, Track};
use crate::error::LoadError;
use crate::model::{Joint, LoadedAsset, SceneInfo};

/// Node name as it appears in track identifiers. Characters that would break
/// the `<joint>.<property>` split are removed and whitespace becomes `_`.
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | '.' | ':' | '/'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn node_name(node: &gltf::Node) -> String {
    match node.name() {
        Some(name) => sanitize_node_name(name),
        None => format!("Node_{}", node.index()),
    }
}

pub(crate) fn decode(path: &Path, bytes: &[u8]) -> Result<LoadedAsset, LoadError> {
    let gltf_err = |source| LoadError::Gltf {
        path: path.to_path_buf(),
        source,
    };
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes).map_err(gltf_err)?;
    let buffers = gltf::import_buffers(&document, None, blob).map_err(gltf_err)?;

    let joints: Vec<Joint> = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            Joint {
                name: node_name(&node),
                translation,
                rotation,
                scale,
            }
        })
        .collect();

    let scene_name = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .and_then(|s| s.name().map(str::to_string))
        .unwrap_or_default();

    let mut animations = Vec::new();
    for (index, anim) in document.animations().enumerate() {
        let mut tracks = Vec::new();
        for channel in anim.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
            let joint = node_name(&channel.target().node());

            let Some(inputs) = reader.read_inputs() else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            let Some(outputs) = reader.read_outputs() else {
                continue;
            };

            let (property, arity, values): (&str, usize, Vec<f32>) =
                match (channel.target().property(), outputs) {
                    (Property::Translation, ReadOutputs::Translations(iter)) => {
                        ("position", 3, iter.flatten().collect())
                    }
                    (Property::Rotation, ReadOutputs::Rotations(iter)) => {
                        ("quaternion", 4, iter.into_f32().flatten().collect())
                    }
                    (Property::Scale, ReadOutputs::Scales(iter)) => {
                        ("scale", 3, iter.flatten().collect())
                    }
                    (property, _) => {
                        debug!("gltf: skipping {property:?} channel on '{joint}'");
                        continue;
                    }
                };

            let (interpolation, values) = match channel.sampler().interpolation() {
                GltfInterpolation::Step => (Interpolation::Step, values),
                GltfInterpolation::Linear => (Interpolation::Linear, values),
                GltfInterpolation::CubicSpline => {
                    (Interpolation::Linear, spline_values(&values, arity))
                }
            };

            let name = track_name(&joint, property);
            match Track::with_interpolation(name, interpolation, times, values) {
                Ok(track) => tracks.push(track),
                Err(e) => warn!("gltf: {}: skipping channel: {e}", path.display()),
            }
        }

        let name = anim
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("animation_{index}"));
        let clip = Clip::new(name, -1.0, tracks).map_err(|source| LoadError::InvalidClip {
            path: path.to_path_buf(),
            source,
        })?;
        animations.push(clip);
    }

    Ok(LoadedAsset {
        scene: SceneInfo {
            name: scene_name,
            joints,
        },
        animations,
    })
}

/// Cubic spline outputs store `[in_tangent, value, out_tangent]` per key;
/// keep the value element only.
fn spline_values(values: &[f32], arity: usize) -> Vec<f32> {
    values
        .chunks_exact(arity * 3)
        .flat_map(|key| key[arity..arity * 2].iter().copied())
        .collect()
}
