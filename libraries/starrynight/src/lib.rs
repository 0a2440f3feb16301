//! Procedural background starfield.
//!
//! Stars are scattered on a thick spherical shell around the origin and merged into a
//! single vertex-colored mesh, so the whole field is one entity.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use rand::Rng;
use std::f32::consts::TAU;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct StarfieldSettings {
    pub count: usize,
    /// Distance from the origin.
    pub radius: Range<f32>,
    /// Size of each star, in world units.
    pub scale: Range<f32>,
    /// Share of stars tinted as hot (blue-white).
    pub hot_fraction: f32,
    /// Share of the remaining stars tinted as cool (orange-white).
    pub cool_fraction: f32,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        Self {
            count: 3000,
            radius: 500.0..900.0,
            scale: 0.2..0.6,
            hot_fraction: 0.2,
            cool_fraction: 0.2,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Reflect)]
pub enum StarClass {
    Hot,
    Sunlike,
    Cool,
}

impl StarClass {
    pub fn temperature(&self) -> f32 {
        match self {
            StarClass::Hot => 11_000.0,
            StarClass::Sunlike => 6_600.0,
            StarClass::Cool => 4_800.0,
        }
    }

    pub fn color(&self) -> Srgba {
        blackbody_color(self.temperature())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Reflect)]
pub struct Star {
    pub position: Vec3,
    pub scale: f32,
    pub class: StarClass,
}

pub fn generate(settings: &StarfieldSettings, rng: &mut impl Rng) -> Vec<Star> {
    (0..settings.count)
        .map(|_| {
            let radius = rng.gen_range(settings.radius.clone());
            let direction = {
                let z: f32 = rng.gen_range(-1.0..=1.0);
                let theta: f32 = rng.gen_range(0.0..TAU);
                let r = (1.0 - z * z).sqrt();
                Vec3::new(r * theta.cos(), r * theta.sin(), z)
            };
            let class = if rng.gen::<f32>() < settings.hot_fraction {
                StarClass::Hot
            } else if rng.gen::<f32>() < settings.cool_fraction {
                StarClass::Cool
            } else {
                StarClass::Sunlike
            };
            Star {
                position: direction * radius,
                scale: rng.gen_range(settings.scale.clone()),
                class,
            }
        })
        .collect()
}

const OCTAHEDRON: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

const OCTAHEDRON_FACES: [[u32; 3]; 8] = [
    [0, 2, 4],
    [4, 2, 1],
    [1, 2, 5],
    [5, 2, 0],
    [4, 3, 0],
    [1, 3, 4],
    [5, 3, 1],
    [0, 3, 5],
];

/// Merges every star into one mesh. Each star is a small octahedron carrying its
/// tint as a vertex color.
pub fn build_mesh(stars: &[Star]) -> Mesh {
    let vertex_count = stars.len() * OCTAHEDRON.len();
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(stars.len() * OCTAHEDRON_FACES.len() * 3);

    for star in stars {
        let base = positions.len() as u32;
        let color = LinearRgba::from(star.class.color()).to_f32_array();
        for corner in OCTAHEDRON {
            let corner = Vec3::from(corner);
            positions.push((star.position + corner * star.scale).to_array());
            normals.push(corner.to_array());
            colors.push(color);
        }
        indices.extend(OCTAHEDRON_FACES.iter().flatten().map(|i| base + i));
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
        .with_inserted_indices(Indices::U32(indices))
}

/// Approximated blackbody radiation to sRGB color conversion.
///
/// Not accurate, but acceptable to distant stars.
///
/// Taken from https://tannerhelland.com/2012/09/18/convert-temperature-rgb-algorithm-code.html
pub fn blackbody_color(k: f32) -> Srgba {
    let (r, g, b) = if k <= 6600.0 {
        let r = 255.0;

        let g = (if k < 1000.0 {
            0.0
        } else {
            99.470_8 * (k / 100.0 - 10.0).ln() - 161.119_57
        })
        .clamp(0.0, 255.0);

        let b = (if k < 1900.0 {
            0.0
        } else {
            138.517_73 * (k / 100.0 - 10.0).ln() - 305.044_8
        })
        .clamp(0.0, 255.0);

        (r, g, b)
    } else {
        let r = (329.698_73 * (k / 100.0 - 60.0).powf(-0.133_204_76)).clamp(0.0, 255.0);
        let g = (288.122_16 * (k / 100.0 - 60.0).powf(-0.075_514_846)).clamp(0.0, 255.0);
        let b = 255.0;

        (r, g, b)
    };

    Srgba::new(r / 255.0, g / 255.0, b / 255.0, 1.0)
}
