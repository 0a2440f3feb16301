use crate::scene::error::CatalogError;
use crate::scene::manifest;
use bevy::prelude::*;
use bevy::utils::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../../assets/scenes/solar.system.yaml");

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Reflect)]
#[serde(rename_all = "kebab-case")]
pub enum BodyKind {
    Rocky,
    Gas,
    Star,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Rocky => "rocky",
            Self::Gas => "gas",
            Self::Star => "star",
        })
    }
}

/// Index of a body in the [`BodyRegistry`]. Only the registry hands these out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct BodyId(u16);

impl BodyId {
    /// `None` when `index` does not fit the id.
    #[inline]
    fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Reflect)]
pub struct SurfaceDescriptor {
    pub roughness: f32,
    pub metallic: f32,
}

impl SurfaceDescriptor {
    pub fn for_kind(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Rocky => Self {
                roughness: 0.7,
                metallic: 0.0,
            },
            BodyKind::Gas => Self {
                roughness: 0.8,
                metallic: 0.0,
            },
            BodyKind::Star => Self {
                roughness: 1.0,
                metallic: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct RingDescriptor {
    /// Inner radius, in body radii.
    pub inner: f32,
    /// Outer radius, in body radii.
    pub outer: f32,
    pub color: Srgba,
    pub texture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct BodyDescriptor {
    pub name: String,
    pub kind: BodyKind,
    pub radius: f32,
    pub distance: f32,
    /// Orbital period in years. Zero for the star.
    pub period: f32,
    pub rotation_speed: f32,
    pub color: Srgba,
    pub texture: Option<String>,
    pub description: String,
    pub surface: SurfaceDescriptor,
    pub rings: Option<RingDescriptor>,
}

/// A registry entry, split by whether it orbits.
#[derive(Debug, Copy, Clone)]
pub enum Body<'a> {
    Star(&'a BodyDescriptor),
    Orbiting(&'a BodyDescriptor),
}

impl<'a> Body<'a> {
    pub fn descriptor(self) -> &'a BodyDescriptor {
        match self {
            Body::Star(descriptor) | Body::Orbiting(descriptor) => descriptor,
        }
    }
}

/// Immutable catalog of the bodies in the scene.
///
/// The star is stored first; orbiting bodies follow in list order. Names are unique
/// and double as the entity [`Name`] of the spawned body.
#[derive(Debug, Clone, Resource)]
pub struct BodyRegistry {
    descriptors: Vec<BodyDescriptor>,
    by_name: HashMap<String, BodyId>,
}

impl BodyRegistry {
    const STAR: BodyId = BodyId(0);

    /// The catalog shipped in `assets/scenes/solar.system.yaml`.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&input)
    }

    pub fn from_yaml(input: &str) -> Result<Self, CatalogError> {
        let catalog = serde_yaml::from_str::<manifest::Catalog>(input)?;
        Self::from_manifest(catalog)
    }

    pub fn from_manifest(catalog: manifest::Catalog) -> Result<Self, CatalogError> {
        if catalog.bodies.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut descriptors = Vec::with_capacity(catalog.bodies.len() + 1);
        descriptors.push(star_descriptor(catalog.star)?);
        for body in catalog.bodies {
            descriptors.push(body_descriptor(body)?);
        }

        let mut by_name = HashMap::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            let id =
                BodyId::from_index(index).ok_or(CatalogError::TooManyBodies(descriptors.len()))?;
            if by_name.insert(descriptor.name.clone(), id).is_some() {
                return Err(CatalogError::DuplicateName(descriptor.name.clone()));
            }
        }
        Ok(Self {
            descriptors,
            by_name,
        })
    }

    pub fn star_id(&self) -> BodyId {
        Self::STAR
    }

    pub fn star(&self) -> &BodyDescriptor {
        &self.descriptors[Self::STAR.index()]
    }

    pub fn lookup(&self, name: &str) -> Option<BodyId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: BodyId) -> Option<Body<'_>> {
        let descriptor = self.descriptors.get(id.index())?;
        Some(if id == Self::STAR {
            Body::Star(descriptor)
        } else {
            Body::Orbiting(descriptor)
        })
    }

    pub fn descriptor(&self, id: BodyId) -> Option<&BodyDescriptor> {
        self.descriptors.get(id.index())
    }

    pub fn name(&self, id: BodyId) -> Option<&str> {
        self.descriptor(id).map(|d| d.name.as_str())
    }

    /// Every body, star first.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, Body<'_>)> {
        (0..self.descriptors.len()).filter_map(|index| {
            let id = BodyId::from_index(index)?;
            self.get(id).map(|body| (id, body))
        })
    }

    /// Orbiting bodies in list order.
    pub fn orbiting(&self) -> impl Iterator<Item = (BodyId, &BodyDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, descriptor)| Some((BodyId::from_index(index)?, descriptor)))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

fn parse_color(name: &str, color: &str) -> Result<Srgba, CatalogError> {
    Srgba::hex(color).map_err(|source| CatalogError::InvalidColor {
        name: name.to_string(),
        color: color.to_string(),
        source,
    })
}

fn ensure_positive(name: &str, field: &'static str, value: f32) -> Result<(), CatalogError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::NonPositive {
            name: name.to_string(),
            field,
            value,
        })
    }
}

/// Negative periods describe retrograde orbits.
fn ensure_period(name: &str, value: f32) -> Result<(), CatalogError> {
    if value != 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::InvalidPeriod {
            name: name.to_string(),
            value,
        })
    }
}

fn star_descriptor(star: manifest::Star) -> Result<BodyDescriptor, CatalogError> {
    ensure_positive(&star.name, "radius", star.radius)?;
    Ok(BodyDescriptor {
        color: parse_color(&star.name, &star.color)?,
        name: star.name,
        kind: BodyKind::Star,
        radius: star.radius,
        distance: 0.0,
        period: 0.0,
        rotation_speed: star.rotation_speed,
        texture: star.texture,
        description: star.description,
        surface: SurfaceDescriptor::for_kind(BodyKind::Star),
        rings: None,
    })
}

fn body_descriptor(body: manifest::Body) -> Result<BodyDescriptor, CatalogError> {
    if body.kind == BodyKind::Star {
        return Err(CatalogError::UnexpectedStar(body.name));
    }
    ensure_positive(&body.name, "radius", body.radius)?;
    ensure_positive(&body.name, "distance", body.distance)?;
    ensure_period(&body.name, body.period)?;

    let rings = match body.rings {
        Some(rings) => {
            if !(rings.inner > 0.0 && rings.inner < rings.outer) {
                return Err(CatalogError::InvalidRing(body.name));
            }
            Some(RingDescriptor {
                inner: rings.inner,
                outer: rings.outer,
                color: parse_color(&body.name, &rings.color)?,
                texture: rings.texture,
            })
        }
        None => None,
    };
    let surface = body
        .surface
        .map(|surface| SurfaceDescriptor {
            roughness: surface.roughness,
            metallic: surface.metallic,
        })
        .unwrap_or_else(|| SurfaceDescriptor::for_kind(body.kind));

    Ok(BodyDescriptor {
        color: parse_color(&body.name, &body.color)?,
        name: body.name,
        kind: body.kind,
        radius: body.radius,
        distance: body.distance,
        period: body.period,
        rotation_speed: body.rotation_speed,
        texture: body.texture,
        description: body.description,
        surface,
        rings,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SMALL_CATALOG: &str = r##"
star:
  name: Sun
  radius: 2.0
  rotation-speed: 0.2
  color: "#FDB813"
bodies:
  - name: Earth
    kind: rocky
    radius: 0.5
    distance: 20.0
    period: 1.0
    rotation-speed: 1.0
    color: "#22A6B3"
    description: Our home planet.
  - name: Saturn
    kind: gas
    radius: 2.0
    distance: 190.0
    period: 29.45
    rotation-speed: 2.2
    color: "#EAD6B8"
    rings:
      inner: 1.2
      outer: 2.5
      color: "#CDBA96"
  - name: Venus
    kind: rocky
    radius: 0.475
    distance: 14.4
    period: 0.62
    rotation-speed: -0.004
    color: "#E3BB76"
"##;

    pub(crate) fn small_registry() -> BodyRegistry {
        BodyRegistry::from_yaml(SMALL_CATALOG).unwrap()
    }

    #[test]
    fn builtin_catalog_parses() {
        let registry = BodyRegistry::builtin().unwrap();
        assert_eq!(registry.star().name, "Sun");
        assert_eq!(registry.star().kind, BodyKind::Star);
        let names = registry
            .orbiting()
            .map(|(_, d)| d.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"
            ]
        );
        let ringed = registry
            .orbiting()
            .filter(|(_, d)| d.rings.is_some())
            .map(|(_, d)| d.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ringed, ["Saturn"]);
    }

    #[test]
    fn lookup_resolves_every_name() {
        let registry = BodyRegistry::builtin().unwrap();
        for (id, body) in registry.iter() {
            assert_eq!(registry.lookup(&body.descriptor().name), Some(id));
        }
        assert_eq!(registry.lookup("Pluto"), None);
        assert!(matches!(
            registry.get(registry.star_id()),
            Some(Body::Star(_))
        ));
    }

    #[test]
    fn surface_defaults_follow_kind() {
        let registry = BodyRegistry::builtin().unwrap();
        let mars = registry.descriptor(registry.lookup("Mars").unwrap()).unwrap();
        assert_eq!(mars.surface, SurfaceDescriptor::for_kind(BodyKind::Rocky));
        let earth = registry.descriptor(registry.lookup("Earth").unwrap()).unwrap();
        assert_eq!(earth.surface.roughness, 0.6);
        assert_eq!(earth.surface.metallic, 0.1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let input = SMALL_CATALOG.replace("name: Venus", "name: Earth");
        assert!(matches!(
            BodyRegistry::from_yaml(&input),
            Err(CatalogError::DuplicateName(name)) if name == "Earth"
        ));
    }

    #[test]
    fn body_named_like_the_star_is_rejected() {
        let input = SMALL_CATALOG.replace("name: Venus", "name: Sun");
        assert!(matches!(
            BodyRegistry::from_yaml(&input),
            Err(CatalogError::DuplicateName(_))
        ));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let input = r##"
star:
  name: Sun
  radius: 2.0
  rotation-speed: 0.2
  color: "#FDB813"
bodies: []
"##;
        assert!(matches!(
            BodyRegistry::from_yaml(input),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let input = SMALL_CATALOG.replace("period: 0.62", "period: 0.0");
        assert!(matches!(
            BodyRegistry::from_yaml(&input),
            Err(CatalogError::InvalidPeriod { name, .. }) if name == "Venus"
        ));

        let input = SMALL_CATALOG.replace("radius: 0.5", "radius: -0.5");
        assert!(matches!(
            BodyRegistry::from_yaml(&input),
            Err(CatalogError::NonPositive { field: "radius", .. })
        ));

        let input = SMALL_CATALOG.replace("\"#E3BB76\"", "\"not-a-color\"");
        assert!(matches!(
            BodyRegistry::from_yaml(&input),
            Err(CatalogError::InvalidColor { .. })
        ));

        let input = SMALL_CATALOG.replace("kind: gas", "kind: star");
        assert!(matches!(
            BodyRegistry::from_yaml(&input),
            Err(CatalogError::UnexpectedStar(name)) if name == "Saturn"
        ));

        let input = SMALL_CATALOG.replace("inner: 1.2", "inner: 3.0");
        assert!(matches!(
            BodyRegistry::from_yaml(&input),
            Err(CatalogError::InvalidRing(_))
        ));
    }

    #[test]
    fn retrograde_period_is_accepted() {
        let input = SMALL_CATALOG.replace("period: 0.62", "period: -0.62");
        let registry = BodyRegistry::from_yaml(&input).unwrap();
        let venus = registry.descriptor(registry.lookup("Venus").unwrap()).unwrap();
        assert_eq!(venus.period, -0.62);
    }

    #[test]
    fn ids_cover_every_index_that_fits() {
        assert_eq!(BodyId::from_index(0), Some(BodyId(0)));
        assert_eq!(BodyId::from_index(u16::MAX as usize), Some(BodyId(u16::MAX)));
        assert_eq!(BodyId::from_index(u16::MAX as usize + 1), None);
    }

    #[test]
    fn oversized_catalog_is_rejected() {
        let mut catalog = serde_yaml::from_str::<manifest::Catalog>(SMALL_CATALOG).unwrap();
        let template = catalog.bodies[0].clone();
        catalog.bodies = (0..=u16::MAX as usize)
            .map(|i| manifest::Body {
                name: format!("Body {i}"),
                ..template.clone()
            })
            .collect();
        assert!(matches!(
            BodyRegistry::from_manifest(catalog),
            Err(CatalogError::TooManyBodies(n)) if n == u16::MAX as usize + 2
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = BodyRegistry::load("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}
