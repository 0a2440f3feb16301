use crate::registry::BodyKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Surface {
    pub roughness: f32,
    #[serde(default)]
    pub metallic: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Rings {
    pub inner: f32,
    pub outer: f32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Star {
    pub name: String,
    pub radius: f32,
    pub rotation_speed: f32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Body {
    pub name: String,
    pub kind: BodyKind,
    pub radius: f32,
    pub distance: f32,
    pub period: f32,
    pub rotation_speed: f32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<Surface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rings: Option<Rings>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Catalog {
    pub star: Star,
    pub bodies: Vec<Body>,
}
