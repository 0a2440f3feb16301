use bevy::prelude::*;

pub mod components;
mod systems;

pub use systems::PanOrbitSystems;

#[derive(Default)]
pub struct PanOrbitCameraPlugin;

impl Plugin for PanOrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::PanOrbitState>()
            .register_type::<components::PanOrbitCamera>()
            .add_systems(
                Update,
                (
                    systems::get_blocked_inputs
                        .pipe(systems::pan_orbit_input)
                        .run_if(resource_exists::<bevy_egui::EguiUserTextures>),
                    systems::update_camera_transform,
                )
                    .chain()
                    .in_set(PanOrbitSystems)
                    .run_if(any_with_component::<components::PanOrbitState>),
            );
    }
}
