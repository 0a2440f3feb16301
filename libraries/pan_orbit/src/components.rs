use bevy::prelude::*;

/// Internal state of the pan-orbit controller.
///
/// Other systems may write `center` and `radius` directly; the camera transform is
/// recomputed whenever the state changes.
#[derive(Debug, Clone, Copy, PartialEq, Component, Reflect)]
#[reflect(Component)]
pub struct PanOrbitState {
    pub center: Vec3,
    pub radius: f32,
    pub upside_down: bool,
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for PanOrbitState {
    fn default() -> Self {
        PanOrbitState {
            center: Vec3::ZERO,
            radius: 1.0,
            upside_down: false,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl PanOrbitState {
    /// Looks at `center` from `radius` away, keeping the current pitch and yaw.
    pub fn look_at(&mut self, center: Vec3, radius: f32) {
        self.center = center;
        self.radius = radius;
    }

    /// Camera transform for this state.
    pub fn transform(&self) -> Transform {
        // YXZ Euler rotation performs yaw/pitch/roll.
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        let translation = self.center + rotation * Vec3::Z * self.radius;
        Transform {
            translation,
            rotation,
            ..default()
        }
    }
}

/// Configuration of the pan-orbit controller
#[derive(Debug, Clone, Component, Reflect)]
#[reflect(Component)]
#[require(PanOrbitState)]
pub struct PanOrbitCamera {
    /// World units per pixel of mouse motion
    pub pan_sensitivity: f32,
    /// Radians per pixel of mouse motion
    pub orbit_sensitivity: f32,
    /// Exponent per pixel of mouse motion
    pub zoom_sensitivity: f32,
    /// For devices with a notched scroll wheel, like desktop mice
    pub scroll_line_sensitivity: f32,
    /// For devices with smooth scrolling, like touchpads
    pub scroll_pixel_sensitivity: f32,
    /// Closest the user can zoom in to the center
    pub min_radius: f32,
    /// Farthest the user can zoom out from the center
    pub max_radius: f32,
}

impl Default for PanOrbitCamera {
    fn default() -> Self {
        PanOrbitCamera {
            pan_sensitivity: 0.001,                 // 1000 pixels per world unit
            orbit_sensitivity: 0.1f32.to_radians(), // 0.1 degree per pixel
            zoom_sensitivity: 0.01,
            scroll_line_sensitivity: 16.0, // 1 "line" == 16 "pixels of motion"
            scroll_pixel_sensitivity: 1.0,
            min_radius: 2.0,
            max_radius: 1000.0,
        }
    }
}

impl PanOrbitCamera {
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.min_radius, self.max_radius)
    }
}
