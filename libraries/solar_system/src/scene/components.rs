use crate::registry::BodyId;
use bevy::prelude::*;

/// Parent of everything the composer spawns. Despawning it tears the scene down.
#[derive(Debug, Copy, Clone, Default, Reflect, Component)]
#[reflect(Component)]
pub struct SolarSystemRoot;

#[derive(Debug, Copy, Clone, Default, Reflect, Component)]
#[reflect(Component)]
pub struct SceneCamera;

/// The star at the origin.
#[derive(Debug, Copy, Clone, Default, Reflect, Component)]
#[reflect(Component)]
pub struct Star;

#[derive(Debug, Copy, Clone, Reflect, Component)]
#[reflect(Component)]
pub struct OrbitGuide(pub BodyId);

/// Disc decoration parented to a ring-bearing body.
#[derive(Debug, Copy, Clone, Reflect, Component)]
#[reflect(Component)]
pub struct Ring(pub BodyId);

#[derive(Debug, Copy, Clone, Default, Reflect, Component)]
#[reflect(Component)]
pub struct Starfield;
