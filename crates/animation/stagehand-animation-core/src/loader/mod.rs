//! Asset loading: byte sources, format decoding and the in-flight load state.

pub mod gltf_asset;
pub mod json;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use log::{info, warn};
use serde::Serialize;

use crate::error::LoadError;
use crate::model::LoadedAsset;

pub use self::json::clip_from_json_str;

/// Where asset bytes come from.
pub trait AssetSource {
    fn fetch(&mut self, path: &str) -> Result<Vec<u8>, LoadError>;
}

/// Files under a root directory.
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsSource {
    fn fetch(&mut self, path: &str) -> Result<Vec<u8>, LoadError> {
        let full = self.root.join(path);
        fs::read(&full).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound {
                path: PathBuf::from(path),
            },
            _ => LoadError::Io { path: full, source },
        })
    }
}

/// In-memory assets keyed by relative path.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.files.insert(path.into(), bytes.into());
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

impl AssetSource for MemorySource {
    fn fetch(&mut self, path: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: PathBuf::from(path),
            })
    }
}

/// Decode by file extension: `.glb`, `.gltf` and `.vrm` through glTF,
/// `.json` through the JSON scene format.
pub fn decode_asset(path: &str, bytes: &[u8]) -> Result<LoadedAsset, LoadError> {
    let p = Path::new(path);
    let ext = p
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "glb" | "gltf" | "vrm" => gltf_asset::decode(p, bytes),
        "json" => json::decode(p, bytes),
        _ => Err(LoadError::UnsupportedFormat {
            path: p.to_path_buf(),
        }),
    }
}

/// Fetch then decode.
pub fn load_asset(source: &mut dyn AssetSource, path: &str) -> Result<LoadedAsset, LoadError> {
    let bytes = source.fetch(path)?;
    decode_asset(path, &bytes)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Answer to a load request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadRequest {
    Started,
    /// A load is already in flight; this request was dropped.
    Suppressed,
}

/// Tracks whether a load is in flight. Duplicate requests are dropped, never
/// queued; a finished or failed load may be retried.
#[derive(Clone, Debug)]
pub struct AssetLoader {
    state: LoadState,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
        }
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn try_begin(&mut self) -> LoadRequest {
        if self.is_loading() {
            warn!("loader: load already in progress; request dropped");
            return LoadRequest::Suppressed;
        }
        self.state = LoadState::Loading;
        LoadRequest::Started
    }

    pub fn finish(&mut self, result: &Result<(), LoadError>) {
        self.state = match result {
            Ok(()) => {
                info!("loader: assets ready");
                LoadState::Ready
            }
            Err(e) => {
                warn!("loader: {e}");
                LoadState::Failed(e.user_message())
            }
        };
    }
}
