use crate::ui;
use bevy::core_pipeline::bloom::Bloom;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::log::debug;
use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_inspector_egui::DefaultInspectorConfigPlugin;
use pan_orbit::PanOrbitCameraPlugin;
use solar_system::registry::BodyRegistry;
use solar_system::scene::components::SceneCamera;
use solar_system::scene::SceneSettings;

pub(crate) struct AppSettings {
    pub(crate) resolution: WindowResolution,
    pub(crate) with_inspector: bool,
    pub(crate) registry: BodyRegistry,
    pub(crate) seed: Option<u64>,
}

pub(crate) fn get_app(settings: AppSettings) -> App {
    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Solar System 3D".to_string(),
                resolution: settings.resolution,
                ..default()
            }),
            ..default()
        }),
        MeshPickingPlugin,
        DefaultInspectorConfigPlugin,
        PanOrbitCameraPlugin,
    ))
    .insert_resource(settings.registry)
    .insert_resource(SceneSettings {
        seed: settings.seed,
        ..default()
    })
    .add_plugins((
        solar_system::SolarSystemPlugin,
        ui::UiPlugin {
            with_inspector: settings.with_inspector,
        },
    ))
    .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.1)))
    .insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 120.0,
    })
    .add_observer(on_add_scene_camera);
    app
}

fn on_add_scene_camera(trigger: Trigger<OnAdd, SceneCamera>, mut commands: Commands) {
    debug!("Add scene camera to {}", trigger.entity());
    commands.entity(trigger.entity()).insert((
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: 0.2,
            ..Bloom::NATURAL
        },
    ));
}
