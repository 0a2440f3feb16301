use crate::clock::SimulationClock;
use crate::scene::SceneIndex;
use bevy::math::{dvec3, DVec3};
use bevy::prelude::*;
use bevy::render::mesh::{Mesh, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use std::f64::consts;

/// Scales `1 / period` into radians per animation-ratio unit.
pub const TIME_SPEED: f64 = 0.01;

pub struct OrbitPlugin;

impl Plugin for OrbitPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OrbitState>().add_systems(
            Update,
            update_positions
                .in_set(crate::SolarSystemSet::Simulate)
                .run_if(resource_exists::<SceneIndex>),
        );
    }
}

type Real = f64;

/// Phase of a body along its circular orbit around the origin, in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Component, Reflect)]
#[reflect(Component)]
pub struct OrbitState {
    distance: Real,
    angular_speed: Real,
    angle: Real,
}

impl OrbitState {
    pub fn new(distance: f32, period: f32, initial_angle: Real) -> Self {
        Self {
            distance: distance as Real,
            angular_speed: Self::angular_speed_for(period),
            angle: initial_angle,
        }
    }

    #[inline]
    pub fn angular_speed_for(period: f32) -> Real {
        (period as Real).recip() * TIME_SPEED
    }

    /// Advances the phase by `elapsed` animation-ratio units and returns the new angle.
    ///
    /// The angle is never wrapped so that the phase stays cumulative.
    #[inline]
    pub fn advance(&mut self, elapsed: Real) -> Real {
        self.angle += self.angular_speed * elapsed;
        self.angle
    }

    #[inline]
    pub fn point_from_angle(&self, angle: Real) -> DVec3 {
        let (sin, cos) = angle.sin_cos();
        dvec3(self.distance * cos, 0.0, self.distance * sin)
    }

    #[inline]
    pub fn position(&self) -> DVec3 {
        self.point_from_angle(self.angle)
    }

    pub fn angle(&self) -> Real {
        self.angle
    }

    pub fn angular_speed(&self) -> Real {
        self.angular_speed
    }

    pub fn distance(&self) -> Real {
        self.distance
    }
}

/// Closed line strip tracing a circular orbit of `radius` in the XZ plane.
pub fn orbit_guide_mesh(radius: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let positions = (0..=segments)
        .map(|i| {
            let angle = i as Real / segments as Real * consts::TAU;
            let (sin, cos) = angle.sin_cos();
            [radius * cos as f32, 0.0, radius * sin as f32]
        })
        .collect::<Vec<_>>();
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    Mesh::new(PrimitiveTopology::LineStrip, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
}

fn update_positions(clock: Res<SimulationClock>, mut q: Query<(&mut Transform, &mut OrbitState)>) {
    let elapsed = clock.delta();
    for (mut transform, mut orbit) in &mut q {
        orbit.advance(elapsed);
        transform.translation = orbit.position().as_vec3();
    }
}
