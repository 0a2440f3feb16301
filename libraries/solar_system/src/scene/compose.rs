use crate::body;
use crate::orbit::{orbit_guide_mesh, OrbitState};
use crate::registry::{Body, BodyDescriptor, BodyId, BodyKind, BodyRegistry};
use crate::scene::components::{
    OrbitGuide, Ring, SceneCamera, SolarSystemRoot, Star, Starfield,
};
use crate::scene::materials::{self, PendingTextures, TextureSlot};
use crate::scene::{SceneIndex, SceneSettings};
use crate::selection::FramingSettings;
use crate::sun::{self, SunlightSettings};
use crate::visibility::{SceneEnabled, SceneMember};
use bevy::ecs::system::SystemParam;
use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::picking::PickingBehavior;
use bevy::prelude::*;
use pan_orbit::components::{PanOrbitCamera, PanOrbitState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};
use std::f64::consts::TAU;

/// Asset stores the composer writes into.
#[derive(SystemParam)]
pub(crate) struct SceneAssets<'w> {
    asset_server: Res<'w, AssetServer>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    pending: ResMut<'w, PendingTextures>,
}

impl SceneAssets<'_> {
    fn textured(
        &mut self,
        material: StandardMaterial,
        texture: Option<&str>,
        slot: TextureSlot,
    ) -> Handle<StandardMaterial> {
        let handle = self.materials.add(material);
        if let Some(path) = texture {
            self.pending
                .request(&self.asset_server, handle.clone(), path, slot);
        }
        handle
    }

    fn body_material(&mut self, descriptor: &BodyDescriptor) -> Handle<StandardMaterial> {
        let slot = match descriptor.kind {
            BodyKind::Star => TextureSlot::Glow,
            BodyKind::Rocky | BodyKind::Gas => TextureSlot::Albedo,
        };
        self.textured(
            materials::body_material(descriptor),
            descriptor.texture.as_deref(),
            slot,
        )
    }
}

fn scene_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Builds the whole scene from the registry, once.
pub(crate) fn compose_scene(
    mut commands: Commands,
    registry: Res<BodyRegistry>,
    settings: Res<SceneSettings>,
    framing: Res<FramingSettings>,
    sunlight: Res<SunlightSettings>,
    existing: Option<Res<SceneIndex>>,
    mut assets: SceneAssets,
) {
    if existing.is_some() {
        warn!("Scene already composed, ignoring");
        return;
    }
    let mut rng = scene_rng(settings.seed);
    let sphere = assets.meshes.add(Sphere::new(1.0).mesh().uv(64, 32));
    let guide_material = assets.materials.add(materials::guide_material());
    let mut bodies = vec![Entity::PLACEHOLDER; registry.len()];
    let mut camera = Entity::PLACEHOLDER;

    let root = commands
        .spawn((
            SolarSystemRoot,
            Name::new("Solar System"),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for (id, entry) in registry.iter() {
                bodies[id.index()] = match entry {
                    Body::Star(descriptor) => {
                        let material = assets.body_material(descriptor);
                        sun::spawn_sunlight(parent, &sunlight, descriptor.radius);
                        body::spawn(parent, id, descriptor, sphere.clone(), material, Vec3::ZERO)
                            .insert((
                                Star,
                                NotShadowCaster,
                                SceneMember::Body(id),
                                SceneEnabled::default(),
                            ))
                            .id()
                    }
                    Body::Orbiting(descriptor) => {
                        let entity = spawn_orbiting(
                            parent,
                            &mut assets,
                            &mut rng,
                            id,
                            descriptor,
                            sphere.clone(),
                        );
                        let guide = assets
                            .meshes
                            .add(orbit_guide_mesh(descriptor.distance, settings.guide_segments));
                        parent.spawn((
                            OrbitGuide(id),
                            Name::new(format!("{} Orbit", descriptor.name)),
                            Mesh3d(guide),
                            MeshMaterial3d(guide_material.clone()),
                            Transform::default(),
                            NotShadowCaster,
                            NotShadowReceiver,
                            PickingBehavior::IGNORE,
                            SceneMember::Detached,
                            SceneEnabled::default(),
                        ));
                        entity
                    }
                };
            }

            let stars = starrynight::generate(&settings.starfield, &mut rng);
            debug!("Generated {} background stars", stars.len());
            parent.spawn((
                Starfield,
                Name::new("Starfield"),
                Mesh3d(assets.meshes.add(starrynight::build_mesh(&stars))),
                MeshMaterial3d(assets.materials.add(materials::starfield_material())),
                Transform::default(),
                NotShadowCaster,
                NotShadowReceiver,
                PickingBehavior::IGNORE,
                SceneMember::Starfield,
                SceneEnabled::default(),
            ));

            camera = parent
                .spawn((
                    SceneCamera,
                    Name::new("Camera"),
                    PanOrbitCamera::default(),
                    PanOrbitState {
                        radius: framing.overview_distance,
                        pitch: -FRAC_PI_6,
                        ..default()
                    },
                    Transform::default(),
                ))
                .id();
        })
        .id();

    info!(
        "Composed scene with {} bodies ({} textures pending)",
        bodies.len(),
        assets.pending.len()
    );
    commands.insert_resource(SceneIndex {
        root,
        camera,
        bodies,
    });
}

fn spawn_orbiting(
    parent: &mut ChildBuilder,
    assets: &mut SceneAssets,
    rng: &mut impl Rng,
    id: BodyId,
    descriptor: &BodyDescriptor,
    sphere: Handle<Mesh>,
) -> Entity {
    let orbit = OrbitState::new(
        descriptor.distance,
        descriptor.period,
        rng.gen_range(0.0..TAU),
    );
    let translation = orbit.position().as_vec3();
    debug!(
        "Spawning {} at {translation} (angle {:.3})",
        descriptor.name,
        orbit.angle()
    );
    let material = assets.body_material(descriptor);
    let mut entity = body::spawn(parent, id, descriptor, sphere, material, translation);
    entity.insert((orbit, SceneMember::Body(id), SceneEnabled::default()));

    if let Some(rings) = &descriptor.rings {
        let mesh = assets
            .meshes
            .add(Annulus::new(rings.inner, rings.outer).mesh().resolution(96));
        let material = assets.textured(
            materials::ring_material(rings),
            rings.texture.as_deref(),
            TextureSlot::Masked,
        );
        entity.with_children(|body| {
            body.spawn((
                Ring(id),
                Name::new(format!("{} Rings", descriptor.name)),
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
                SceneMember::AttachedTo(id),
                SceneEnabled::default(),
            ));
        });
    }
    entity.id()
}
