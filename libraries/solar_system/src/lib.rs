use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

pub mod body;
pub mod clock;
pub mod orbit;
pub mod registry;
pub mod scene;
pub mod selection;
pub mod sun;
pub mod visibility;

/// Per-frame ordering: bodies move, then requests are applied, then the camera is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum SolarSystemSet {
    Simulate,
    Select,
    Frame,
}

struct SchedulePlugin;

impl Plugin for SchedulePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SolarSystemSet::Simulate,
                SolarSystemSet::Select,
                SolarSystemSet::Frame,
            )
                .chain(),
        );
    }
}

/// Everything needed to simulate and frame the scene described by a
/// [`registry::BodyRegistry`] resource, which the app inserts.
pub struct SolarSystemPlugin;

impl PluginGroup for SolarSystemPlugin {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(SchedulePlugin)
            .add(clock::ClockPlugin)
            .add(body::BodyPlugin)
            .add(orbit::OrbitPlugin)
            .add(sun::SunPlugin)
            .add(scene::ScenePlugin)
            .add(selection::SelectionPlugin)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::registry::BodyRegistry;
    use crate::scene::SceneSettings;
    use starrynight::StarfieldSettings;

    pub(crate) fn configure(app: &mut App, registry: BodyRegistry, seed: u64) {
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>()
            .insert_resource(registry)
            .insert_resource(SceneSettings {
                seed: Some(seed),
                starfield: StarfieldSettings {
                    count: 64,
                    ..default()
                },
                ..default()
            })
            .add_plugins(SolarSystemPlugin);
    }

    /// Headless app with the scene composed.
    pub(crate) fn test_app(registry: BodyRegistry) -> App {
        let mut app = App::new();
        configure(&mut app, registry, 7);
        app.update();
        app
    }

    #[test]
    fn frames_advance_orbits_and_spin_by_simulated_time() {
        use crate::body::{PlanetaryBody, ROTATION_SCALE};
        use crate::clock::SimulationClock;
        use crate::orbit::OrbitState;
        use crate::registry::tests::small_registry;
        use crate::scene::components::Star;
        use approx::assert_abs_diff_eq;
        use bevy::time::TimeUpdateStrategy;
        use std::time::Duration;

        let registry = small_registry();
        let star_speed = registry.star().rotation_speed as f64 * ROTATION_SCALE;
        let mut app = App::new();
        configure(&mut app, registry, 11);
        // 50 ms per frame is 3 animation-ratio units.
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)));
        app.update();

        let world = app.world_mut();
        let initial = world
            .query::<(&PlanetaryBody, &OrbitState)>()
            .iter(world)
            .map(|(body, orbit)| (body.0, *orbit))
            .collect::<Vec<_>>();
        assert_eq!(initial.len(), 3);

        let frames = 10;
        for _ in 0..frames {
            app.update();
        }
        let total = 3.0 * frames as f64;
        assert_abs_diff_eq!(
            app.world().resource::<SimulationClock>().elapsed(),
            total,
            epsilon = 1e-6
        );

        let world = app.world_mut();
        let mut q_bodies = world.query::<(&PlanetaryBody, &OrbitState, &Transform)>();
        for (id, start) in &initial {
            let (_, orbit, transform) = q_bodies
                .iter(world)
                .find(|(body, ..)| body.0 == *id)
                .unwrap();
            let expected = start.angle() + start.angular_speed() * total;
            assert_abs_diff_eq!(orbit.angle(), expected, epsilon = 1e-6);
            let position = start.point_from_angle(expected).as_vec3();
            assert!(transform.translation.abs_diff_eq(position, 1e-3));
        }

        let star = *world
            .query_filtered::<&Transform, With<Star>>()
            .single(world);
        assert_eq!(star.translation, Vec3::ZERO);
        let spin = Quat::from_rotation_y((star_speed * total) as f32);
        assert!(star.rotation.abs_diff_eq(spin, 1e-5));
        assert_ne!(star.rotation, Quat::IDENTITY);
    }
}
