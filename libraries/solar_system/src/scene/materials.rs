use crate::registry::{BodyDescriptor, BodyKind, RingDescriptor};
use bevy::asset::LoadState;
use bevy::prelude::*;

/// Emissive multiplier on the star's base color, high enough to drive bloom.
pub const STAR_EMISSIVE: f32 = 8.0;

/// Which texture slots a loaded image fills.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Reflect)]
pub enum TextureSlot {
    Albedo,
    /// Albedo and emissive, for the star.
    Glow,
    /// Albedo whose alpha channel masks the geometry, for rings.
    Masked,
}

#[derive(Debug, Clone)]
struct PendingTexture {
    material: Handle<StandardMaterial>,
    image: Handle<Image>,
    slot: TextureSlot,
}

/// Images still loading, with the material they will be attached to.
///
/// Materials are created untextured so the scene renders right away; textures are
/// attached as they finish loading, and failed ones are dropped.
#[derive(Debug, Default, Resource)]
pub struct PendingTextures(Vec<PendingTexture>);

impl PendingTextures {
    pub fn request(
        &mut self,
        asset_server: &AssetServer,
        material: Handle<StandardMaterial>,
        path: &str,
        slot: TextureSlot,
    ) {
        debug!("Requesting texture {path}");
        self.0.push(PendingTexture {
            material,
            image: asset_server.load(path.to_string()),
            slot,
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

pub fn body_material(descriptor: &BodyDescriptor) -> StandardMaterial {
    let base_color = Color::from(descriptor.color);
    match descriptor.kind {
        BodyKind::Star => StandardMaterial {
            base_color,
            emissive: LinearRgba::from(descriptor.color) * STAR_EMISSIVE,
            perceptual_roughness: descriptor.surface.roughness,
            metallic: descriptor.surface.metallic,
            ..default()
        },
        BodyKind::Rocky | BodyKind::Gas => StandardMaterial {
            base_color,
            perceptual_roughness: descriptor.surface.roughness,
            metallic: descriptor.surface.metallic,
            ..default()
        },
    }
}

pub fn ring_material(ring: &RingDescriptor) -> StandardMaterial {
    StandardMaterial {
        base_color: ring.color.into(),
        alpha_mode: AlphaMode::Mask(0.5),
        perceptual_roughness: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

pub fn guide_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(0.3, 0.3, 0.3),
        unlit: true,
        ..default()
    }
}

/// Stars carry their tint as vertex colors.
pub fn starfield_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    }
}

pub fn apply_texture(material: &mut StandardMaterial, image: Handle<Image>, slot: TextureSlot) {
    match slot {
        TextureSlot::Albedo | TextureSlot::Masked => {
            material.base_color = Color::WHITE;
            material.base_color_texture = Some(image);
        }
        TextureSlot::Glow => {
            material.base_color = Color::WHITE;
            material.emissive = LinearRgba::WHITE * STAR_EMISSIVE;
            material.emissive_texture = Some(image.clone());
            material.base_color_texture = Some(image);
        }
    }
}

pub(crate) fn resolve_textures(
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingTextures>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if pending.is_empty() {
        return;
    }
    pending.0.retain(|texture| match asset_server.load_state(texture.image.id()) {
        LoadState::Loaded => {
            if let Some(material) = materials.get_mut(&texture.material) {
                apply_texture(material, texture.image.clone(), texture.slot);
                debug!(
                    "Applied texture {:?}",
                    texture.image.path().map(ToString::to_string)
                );
            }
            false
        }
        LoadState::Failed(err) => {
            warn!("Texture failed to load, keeping base color: {err}");
            false
        }
        _ => true,
    });
}
