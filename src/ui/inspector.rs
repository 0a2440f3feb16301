use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContext;
use bevy_inspector_egui::bevy_inspector;
use egui::containers;
use solar_system::clock::SimulationClock;
use solar_system::selection::{FramingSettings, SelectionState};
use solar_system::sun::SunlightSettings;

pub struct Plugin;

impl bevy::prelude::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, inspector_ui);
    }
}

fn inspector_ui(world: &mut World) {
    let Ok(mut ctx) = world
        .query_filtered::<&mut EguiContext, With<PrimaryWindow>>()
        .get_single_mut(world)
        .map(|ctx| ctx.clone())
    else {
        return;
    };

    containers::Window::new("Simulation")
        .frame(super::default_frame())
        .default_open(false)
        .show(ctx.get_mut(), |ui| {
            ui.collapsing("Clock", |ui| {
                bevy_inspector::ui_for_resource::<SimulationClock>(world, ui);
            });
            ui.collapsing("Selection", |ui| {
                bevy_inspector::ui_for_resource::<SelectionState>(world, ui);
            });
            ui.collapsing("Framing", |ui| {
                bevy_inspector::ui_for_resource::<FramingSettings>(world, ui);
            });
            ui.collapsing("Sunlight", |ui| {
                bevy_inspector::ui_for_resource::<SunlightSettings>(world, ui);
            });
        });

    containers::Window::new("Inspector")
        .frame(super::default_frame())
        .show(ctx.get_mut(), |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                bevy_inspector::ui_for_world_entities(world, ui);
            });
        });
}
