use crate::scene::components::Star;
use crate::scene::SceneIndex;
use bevy::prelude::*;

pub struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Sunlight>()
            .register_type::<SunlightSettings>()
            .init_resource::<SunlightSettings>()
            .add_systems(
                Update,
                sun_lighting
                    .in_set(crate::SolarSystemSet::Frame)
                    .run_if(resource_exists::<SceneIndex>),
            );
    }
}

#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct SunlightSettings {
    /// Luminous power in lumens.
    pub intensity: f32,
    pub range: f32,
    pub color: Color,
}

impl Default for SunlightSettings {
    fn default() -> Self {
        Self {
            intensity: 1e7,
            range: 5_000.0,
            color: Color::WHITE,
        }
    }
}

/// Point light emitted by the star.
///
/// Not parented to the star: hiding the star on focus must not turn the light off.
#[derive(Debug, Copy, Clone, Default, Component, Reflect)]
#[reflect(Component)]
pub struct Sunlight;

pub fn spawn_sunlight(commands: &mut ChildBuilder, settings: &SunlightSettings, star_radius: f32) {
    commands.spawn((
        Sunlight,
        Name::new("Sunlight"),
        PointLight {
            color: settings.color,
            intensity: settings.intensity,
            range: settings.range,
            radius: star_radius,
            shadows_enabled: true,
            ..default()
        },
        Transform::default(),
    ));
}

fn sun_lighting(
    settings: Res<SunlightSettings>,
    q_star: Query<&Transform, (With<Star>, Without<Sunlight>)>,
    mut q_light: Query<(&mut Transform, &mut PointLight), With<Sunlight>>,
) {
    let Ok(star) = q_star.get_single() else {
        return;
    };
    for (mut transform, mut light) in &mut q_light {
        if transform.translation != star.translation {
            transform.translation = star.translation;
        }
        if settings.is_changed() {
            light.color = settings.color;
            light.intensity = settings.intensity;
            light.range = settings.range;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::small_registry;
    use crate::tests::test_app;

    #[test]
    fn light_sits_on_the_star_outside_its_hierarchy() {
        let mut app = test_app(small_registry());
        let world = app.world_mut();
        let (light, parent) = world
            .query_filtered::<(&PointLight, &Parent), With<Sunlight>>()
            .single(world);
        assert!(light.shadows_enabled);
        let parent = parent.get();
        assert!(world.get::<Star>(parent).is_none());
        let star = world.query_filtered::<Entity, With<Star>>().single(world);
        assert_ne!(parent, star);
    }

    #[test]
    fn settings_changes_reach_the_light() {
        let mut app = test_app(small_registry());
        app.world_mut().resource_mut::<SunlightSettings>().intensity = 42.0;
        app.update();
        let world = app.world_mut();
        let light = world
            .query_filtered::<&PointLight, With<Sunlight>>()
            .single(world);
        assert_eq!(light.intensity, 42.0);
    }
}
