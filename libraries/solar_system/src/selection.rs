//! Focus state machine and the camera framing it drives.
//!
//! Requests arrive as [`SelectionRequest`] events, from the UI or from picking, and are
//! applied in order within the frame: the visibility policy is re-evaluated for every
//! scene entity and the camera is re-framed, even when the focus did not change.

use crate::body::PlanetaryBody;
use crate::registry::{Body, BodyId, BodyRegistry};
use crate::scene::components::SceneCamera;
use crate::scene::SceneIndex;
use crate::visibility::{self, SceneEnabled, SceneMember};
use bevy::picking::pointer::PointerButton;
use bevy::picking::events::{Click, Pointer};
use bevy::prelude::*;
use pan_orbit::components::PanOrbitState;

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SelectionState>()
            .register_type::<FramingSettings>()
            .init_resource::<SelectionState>()
            .init_resource::<FramingSettings>()
            .add_event::<SelectionRequest>()
            .configure_sets(
                Update,
                pan_orbit::PanOrbitSystems.after(crate::SolarSystemSet::Frame),
            )
            .add_systems(
                Update,
                (
                    handle_selection_requests.in_set(crate::SolarSystemSet::Select),
                    follow_focused_body.in_set(crate::SolarSystemSet::Frame),
                )
                    .run_if(resource_exists::<SceneIndex>),
            )
            .add_observer(pick_body);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Event)]
pub enum SelectionRequest {
    Focus(String),
    Reset,
}

impl SelectionRequest {
    pub fn focus(name: impl Into<String>) -> Self {
        Self::Focus(name.into())
    }
}

/// The focused body, if any. Only [`SelectionRequest`]s change it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Resource, Reflect)]
#[reflect(Resource)]
pub struct SelectionState {
    focus: Option<BodyId>,
}

impl SelectionState {
    pub fn focus(&self) -> Option<BodyId> {
        self.focus
    }

    pub fn is_focused(&self, id: BodyId) -> bool {
        self.focus == Some(id)
    }
}

#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct FramingSettings {
    /// Camera distance when nothing is focused.
    pub overview_distance: f32,
    /// Camera distance when the star is focused.
    pub star_distance: f32,
    /// Desired distance to a focused body, in body radii.
    pub zoom_factor: f32,
    /// The camera only moves in when farther than this many desired distances.
    pub clamp_factor: f32,
}

impl Default for FramingSettings {
    fn default() -> Self {
        Self {
            overview_distance: 200.0,
            star_distance: 40.0,
            zoom_factor: 10.0,
            clamp_factor: 2.0,
        }
    }
}

/// Camera distance after focusing `body` from `current`.
///
/// Focusing an orbiting body never moves the camera farther away.
pub fn focus_framing(body: Body, current: f32, settings: &FramingSettings) -> f32 {
    match body {
        Body::Star(_) => settings.star_distance,
        Body::Orbiting(descriptor) => {
            let limit = descriptor.radius * settings.zoom_factor * settings.clamp_factor;
            if current > limit {
                limit
            } else {
                current
            }
        }
    }
}

/// Turns a pointer hit into a request. Misses and unknown names yield nothing.
pub fn pick_request(
    hit: bool,
    picked_name: &str,
    registry: &BodyRegistry,
) -> Option<SelectionRequest> {
    (hit && registry.lookup(picked_name).is_some()).then(|| SelectionRequest::focus(picked_name))
}

/// World position of a body. Bodies are direct children of the unparented scene root.
fn body_position(
    index: &SceneIndex,
    id: BodyId,
    q_transforms: &Query<&Transform>,
) -> Option<Vec3> {
    let root = q_transforms.get(index.root()).ok()?;
    let body = q_transforms.get(index.entity(id)?).ok()?;
    Some(root.transform_point(body.translation))
}

fn resolve(request: &SelectionRequest, registry: &BodyRegistry) -> Option<Option<BodyId>> {
    match request {
        SelectionRequest::Focus(name) => match registry.lookup(name) {
            Some(id) => Some(Some(id)),
            None => {
                debug!("Ignoring focus on unknown body {name:?}");
                None
            }
        },
        SelectionRequest::Reset => Some(None),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_selection_requests(
    mut requests: EventReader<SelectionRequest>,
    registry: Res<BodyRegistry>,
    index: Res<SceneIndex>,
    framing: Res<FramingSettings>,
    mut selection: ResMut<SelectionState>,
    mut q_members: Query<(&SceneMember, &mut Visibility, &mut SceneEnabled)>,
    q_transforms: Query<&Transform>,
    mut q_camera: Query<&mut PanOrbitState, With<SceneCamera>>,
) {
    for request in requests.read() {
        let Some(focus) = resolve(request, &registry) else {
            continue;
        };
        debug!("Selection: {:?} -> {:?}", selection.focus, focus);
        selection.focus = focus;

        let members = q_members
            .iter_mut()
            .map(|(member, visibility, enabled)| ((visibility, enabled), *member));
        for ((mut visibility, mut enabled), on) in visibility::evaluate(members, focus) {
            visibility::apply(on, &mut visibility, &mut enabled);
        }

        let Some(id) = focus else {
            for mut camera in &mut q_camera {
                camera.look_at(Vec3::ZERO, framing.overview_distance);
            }
            continue;
        };
        let target = registry
            .get(id)
            .zip(body_position(&index, id, &q_transforms));
        let Some((body, position)) = target else {
            debug!("No scene entity for body {id:?}, camera left as is");
            continue;
        };
        for mut camera in &mut q_camera {
            let radius = focus_framing(body, camera.radius, &framing);
            camera.look_at(position, radius);
        }
    }
}

/// Keeps the camera centered on the focused body as it moves along its orbit.
fn follow_focused_body(
    selection: Res<SelectionState>,
    index: Res<SceneIndex>,
    q_transforms: Query<&Transform>,
    mut q_camera: Query<&mut PanOrbitState, With<SceneCamera>>,
) {
    let Some(position) = selection
        .focus
        .and_then(|focus| body_position(&index, focus, &q_transforms))
    else {
        return;
    };
    for mut camera in &mut q_camera {
        if camera.center != position {
            camera.center = position;
        }
    }
}

fn pick_body(
    mut trigger: Trigger<Pointer<Click>>,
    registry: Option<Res<BodyRegistry>>,
    q_bodies: Query<(&Name, &SceneEnabled), With<PlanetaryBody>>,
    mut requests: EventWriter<SelectionRequest>,
) {
    if trigger.event().button != PointerButton::Primary {
        return;
    }
    let (Some(registry), Ok((name, enabled))) = (registry, q_bodies.get(trigger.entity())) else {
        return;
    };
    if let Some(request) = pick_request(enabled.0, name.as_str(), &registry) {
        trigger.propagate(false);
        requests.send(request);
    }
}
