use crate::clock::SimulationClock;
use crate::registry::{BodyDescriptor, BodyId};
use crate::scene::SceneIndex;
use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;

/// Scales a catalog `rotation-speed` into radians per animation-ratio unit.
pub const ROTATION_SCALE: f64 = 0.01;

pub struct BodyPlugin;

impl Plugin for BodyPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlanetaryBody>()
            .register_type::<SelfRotation>()
            .add_systems(
                Update,
                self_rotation_system
                    .in_set(crate::SolarSystemSet::Simulate)
                    .run_if(resource_exists::<SceneIndex>),
            );
    }
}

/// A body spawned from the registry. Its [`Name`] is the descriptor name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Component, Reflect)]
#[reflect(Component)]
pub struct PlanetaryBody(pub BodyId);

/// Spin about the body's own Y axis. Not tied to the orbital phase.
#[derive(Debug, Clone, Copy, PartialEq, Component, Reflect)]
#[reflect(Component)]
pub struct SelfRotation {
    speed: f64,
    angle: f64,
}

impl SelfRotation {
    pub fn new(rotation_speed: f32) -> Self {
        Self {
            speed: rotation_speed as f64 * ROTATION_SCALE,
            angle: 0.0,
        }
    }

    #[inline]
    pub fn advance(&mut self, elapsed: f64) -> f64 {
        self.angle += self.speed * elapsed;
        self.angle
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The cumulative angle is reduced to one turn before narrowing to `f32`.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle.rem_euclid(std::f64::consts::TAU) as f32)
    }
}

/// Spawns the renderable sphere of a body as a child of the scene root.
///
/// The mesh is a unit sphere scaled by the body radius, so decorations parented to
/// the body are expressed in body radii.
pub fn spawn<'a>(
    commands: &'a mut ChildBuilder,
    id: BodyId,
    descriptor: &BodyDescriptor,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    translation: Vec3,
) -> EntityCommands<'a> {
    commands.spawn((
        PlanetaryBody(id),
        Name::new(descriptor.name.clone()),
        SelfRotation::new(descriptor.rotation_speed),
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_translation(translation).with_scale(Vec3::splat(descriptor.radius)),
    ))
}

pub fn self_rotation_system(
    clock: Res<SimulationClock>,
    mut q: Query<(&mut Transform, &mut SelfRotation)>,
) {
    let elapsed = clock.delta();
    for (mut transform, mut spin) in &mut q {
        spin.advance(elapsed);
        transform.rotation = spin.rotation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn retrograde_spin_is_plain_addition() {
        let mut venus = SelfRotation::new(-0.004);
        let mut earth = SelfRotation::new(0.004);
        for _ in 0..50 {
            venus.advance(2.0);
            earth.advance(2.0);
        }
        assert_abs_diff_eq!(venus.angle(), -0.004 * 0.01 * 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(venus.angle(), -earth.angle(), epsilon = 1e-12);
    }

    #[test]
    fn rotation_keeps_small_steps_after_long_sessions() {
        let mut spin = SelfRotation::new(1.0);
        spin.advance(1e10);
        let before = spin.rotation();
        spin.advance(1.0);
        let after = spin.rotation();
        assert_abs_diff_eq!(before.angle_between(after), 0.01, epsilon = 1e-4);
    }

    #[test]
    fn rotation_is_about_y() {
        let mut spin = SelfRotation::new(1.0);
        spin.advance(std::f64::consts::FRAC_PI_2 / ROTATION_SCALE);
        let forward = spin.rotation() * Vec3::X;
        assert!(forward.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }
}
