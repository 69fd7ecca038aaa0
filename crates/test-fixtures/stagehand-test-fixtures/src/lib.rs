//! Shared JSON and glTF fixtures for the Stagehand crates, resolved through
//! `fixtures/manifest.json` at the workspace root.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    animations: HashMap<String, String>,
    characters: HashMap<String, String>,
    #[serde(rename = "bone-maps")]
    bone_maps: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

/// Directory holding every fixture; usable as an asset root.
pub fn root() -> PathBuf {
    fixtures_root()
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Generates the accessor module for one manifest section.
macro_rules! fixture_section {
    ($module:ident, $field:ident, $kind:literal) => {
        pub mod $module {
            use super::*;

            pub fn keys() -> Vec<String> {
                let mut keys: Vec<String> = MANIFEST.$field.keys().cloned().collect();
                keys.sort();
                keys
            }

            pub fn json(name: &str) -> Result<String> {
                read_to_string(lookup(&MANIFEST.$field, $kind, name)?)
            }

            pub fn bytes(name: &str) -> Result<Vec<u8>> {
                json(name).map(String::into_bytes)
            }

            pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
                super::load_json(lookup(&MANIFEST.$field, $kind, name)?)
            }

            pub fn path(name: &str) -> Result<PathBuf> {
                Ok(resolve_path(lookup(&MANIFEST.$field, $kind, name)?))
            }
        }
    };
}

fixture_section!(animations, animations, "animation");
fixture_section!(characters, characters, "character");
fixture_section!(bone_maps, bone_maps, "bone map");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_exists() {
        for name in animations::keys() {
            assert!(animations::path(&name).unwrap().is_file(), "{name}");
        }
        for name in characters::keys() {
            assert!(characters::path(&name).unwrap().is_file(), "{name}");
        }
        for name in bone_maps::keys() {
            assert!(bone_maps::path(&name).unwrap().is_file(), "{name}");
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        assert!(animations::json("does-not-exist").is_err());
    }
}
