use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContext, EguiPlugin};
use egui::{containers, widgets, Align, Align2, Color32, RichText, Ui};
use solar_system::registry::BodyRegistry;
use solar_system::selection::{SelectionRequest, SelectionState};

mod inspector;

const HINT: &str = "Use Mouse to Orbit/Zoom. Click on planets to focus.";

#[derive(Default)]
pub struct UiPlugin {
    pub with_inspector: bool,
}

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin);
        }

        app.add_systems(Update, ui.run_if(resource_exists::<BodyRegistry>));

        if self.with_inspector {
            app.add_plugins(inspector::Plugin);
        }
    }
}

/// One button of the body list.
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    label: String,
    request: SelectionRequest,
    active: bool,
}

/// "Overview" first, then every orbiting body in catalog order.
fn entries(registry: &BodyRegistry, selection: &SelectionState) -> Vec<Entry> {
    let overview = Entry {
        label: format!("Overview ({})", registry.star().name),
        request: SelectionRequest::Reset,
        active: selection.focus().is_none(),
    };
    std::iter::once(overview)
        .chain(registry.orbiting().map(|(id, descriptor)| Entry {
            label: descriptor.name.clone(),
            request: SelectionRequest::focus(descriptor.name.as_str()),
            active: selection.is_focused(id),
        }))
        .collect()
}

#[derive(SystemParam)]
struct UiSystems<'w> {
    registry: Res<'w, BodyRegistry>,
    selection: Res<'w, SelectionState>,
    diagnostics: Res<'w, DiagnosticsStore>,
    time: ResMut<'w, Time<Virtual>>,
    requests: EventWriter<'w, SelectionRequest>,
}

fn ui(mut this: UiSystems, mut q_egui: Query<&mut EguiContext, With<PrimaryWindow>>) {
    let Ok(mut egui) = q_egui.get_single_mut() else {
        return;
    };

    let ctx = egui.get_mut();
    this.toplevel(ctx);
}

impl UiSystems<'_> {
    fn toplevel(&mut self, ctx: &egui::Context) {
        self.bodies_window(ctx);
        self.toolbar(ctx);
        self.hint(ctx);
    }

    fn bodies_window(&mut self, ctx: &egui::Context) {
        containers::Window::new("Solar System 3D")
            .anchor(Align2::LEFT_TOP, egui::vec2(16.0, 16.0))
            .frame(default_frame())
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                containers::ScrollArea::vertical()
                    .max_height(ctx.screen_rect().height() * 0.6)
                    .show(ui, |ui| self.body_list(ui));
                self.description(ui);
            });
    }

    fn body_list(&mut self, ui: &mut Ui) {
        for entry in entries(&self.registry, &self.selection) {
            if ui.selectable_label(entry.active, entry.label).clicked() {
                self.requests.send(entry.request);
            }
        }
    }

    fn description(&mut self, ui: &mut Ui) {
        let Some(descriptor) = self
            .selection
            .focus()
            .and_then(|id| self.registry.descriptor(id))
        else {
            return;
        };
        ui.separator();
        ui.heading(descriptor.name.as_str());
        ui.label(RichText::new(descriptor.description.as_str()).color(Color32::LIGHT_GRAY));
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        containers::Window::new("toolbar")
            .title_bar(false)
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .frame(default_frame())
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    self.speed_controls(ui);
                    ui.separator();
                    self.fps_display(ui);
                });
            });
    }

    fn speed_controls(&mut self, ui: &mut Ui) {
        let mut cur_speed = self.time.relative_speed();
        ui.with_layout(egui::Layout::left_to_right(Align::Max), |ui| {
            let paused = self.time.is_paused();
            if ui.button(if paused { "Play" } else { "Pause" }).clicked() {
                if paused {
                    self.time.unpause();
                } else {
                    self.time.pause();
                }
            }
            if ui.button("-").clicked() {
                self.time.set_relative_speed(cur_speed / 2.0);
            }
            if ui
                .add(
                    widgets::DragValue::new(&mut cur_speed)
                        .suffix("x")
                        .range(0.125..=64.0),
                )
                .changed()
            {
                self.time.set_relative_speed(cur_speed);
            };
            if ui.button("+").clicked() {
                self.time.set_relative_speed(cur_speed * 2.0);
            }
        });
    }

    fn fps_display(&mut self, ui: &mut Ui) {
        let Some(fps) = self.diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) else {
            return;
        };
        if !fps.is_enabled {
            return;
        }
        ui.label(
            fps.average()
                .map(|v| format!("FPS: {v:2.1} Hz"))
                .unwrap_or_else(|| String::from("N/A")),
        );
    }

    fn hint(&self, ctx: &egui::Context) {
        containers::Area::new(egui::Id::new("hint"))
            .anchor(Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(HINT)
                        .small()
                        .color(Color32::from_white_alpha(128)),
                );
            });
    }
}

fn default_frame() -> egui::Frame {
    let default_frame = egui::Frame::window(&egui::Style::default());
    let [r, g, b, _] = default_frame.fill.to_array();
    default_frame
        .fill(Color32::from_rgba_unmultiplied(r, g, b, 128))
        .inner_margin(egui::vec2(8.0, 6.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BodyRegistry {
        BodyRegistry::builtin().unwrap()
    }

    #[test]
    fn overview_comes_first_and_is_active_when_unfocused() {
        let registry = registry();
        let entries = entries(&registry, &SelectionState::default());
        assert_eq!(entries.len(), registry.len());
        assert_eq!(entries[0].label, "Overview (Sun)");
        assert_eq!(entries[0].request, SelectionRequest::Reset);
        assert!(entries[0].active);
        assert!(entries[1..].iter().all(|entry| !entry.active));
        assert_eq!(entries[1].label, "Mercury");
        assert_eq!(entries.last().map(|e| e.label.as_str()), Some("Neptune"));
    }

    #[test]
    fn every_body_button_focuses_its_body() {
        let registry = registry();
        for entry in &entries(&registry, &SelectionState::default())[1..] {
            assert_eq!(entry.request, SelectionRequest::focus(entry.label.as_str()));
            assert!(registry.lookup(&entry.label).is_some());
        }
    }
}
