use crate::registry::{BodyId, BodyRegistry};
use crate::selection::FramingSettings;
use bevy::prelude::*;
use starrynight::StarfieldSettings;

pub mod components;
mod compose;
pub mod error;
pub mod manifest;
pub mod materials;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::SolarSystemRoot>()
            .register_type::<components::SceneCamera>()
            .register_type::<components::Star>()
            .register_type::<components::OrbitGuide>()
            .register_type::<components::Ring>()
            .register_type::<components::Starfield>()
            .register_type::<SceneSettings>()
            .init_resource::<SceneSettings>()
            .init_resource::<FramingSettings>()
            .init_resource::<materials::PendingTextures>()
            .add_systems(
                Startup,
                compose::compose_scene.run_if(resource_exists::<BodyRegistry>),
            )
            .add_systems(
                Update,
                materials::resolve_textures.run_if(resource_exists::<SceneIndex>),
            )
            .add_systems(Last, teardown_on_exit.run_if(on_event::<AppExit>))
            .add_observer(teardown_scene);
    }
}

/// Knobs for the one-shot scene build.
#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct SceneSettings {
    /// Seeds initial orbital angles and the starfield. Random when unset.
    pub seed: Option<u64>,
    pub starfield: StarfieldSettings,
    /// Line segments per orbit guide.
    pub guide_segments: u32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            seed: None,
            starfield: StarfieldSettings::default(),
            guide_segments: 256,
        }
    }
}

/// Entities of the composed scene, indexed by [`BodyId`].
///
/// Present exactly while a scene exists; per-frame systems are gated on it.
#[derive(Debug, Clone, Resource)]
pub struct SceneIndex {
    root: Entity,
    camera: Entity,
    bodies: Vec<Entity>,
}

impl SceneIndex {
    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn camera(&self) -> Entity {
        self.camera
    }

    pub fn entity(&self, id: BodyId) -> Option<Entity> {
        self.bodies.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Despawns the scene and releases what it holds. Also fired on [`AppExit`].
#[derive(Debug, Copy, Clone, Default, Event)]
pub struct TeardownScene;

fn teardown_scene(
    _: Trigger<TeardownScene>,
    mut commands: Commands,
    index: Option<Res<SceneIndex>>,
    mut pending: ResMut<materials::PendingTextures>,
) {
    let Some(index) = index else {
        debug!("No scene to tear down");
        return;
    };
    info!("Tearing down scene");
    commands.entity(index.root).despawn_recursive();
    commands.remove_resource::<SceneIndex>();
    pending.clear();
}

fn teardown_on_exit(mut commands: Commands) {
    commands.trigger(TeardownScene);
}
