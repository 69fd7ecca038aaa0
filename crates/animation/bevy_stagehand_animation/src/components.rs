use bevy::prelude::*;

/// Marker for the root of the spawned character hierarchy. Joints are looked
/// up by `Name` among its descendants.
#[derive(Component)]
pub struct StagehandCharacterRoot;

/// The currently playing soundtrack entity.
#[derive(Component)]
pub struct Soundtrack;
