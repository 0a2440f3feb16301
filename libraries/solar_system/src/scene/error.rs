use bevy::color::HexColorError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Catalog has no orbiting bodies")]
    Empty,
    #[error("Duplicate body name: {0:?}")]
    DuplicateName(String),
    #[error("Body {0:?} is declared as a star; only the catalog root may be a star")]
    UnexpectedStar(String),
    #[error("Invalid color {color:?} for {name:?}: {source}")]
    InvalidColor {
        name: String,
        color: String,
        #[source]
        source: HexColorError,
    },
    #[error("Body {name:?} has non-positive {field} ({value})")]
    NonPositive {
        name: String,
        field: &'static str,
        value: f32,
    },
    #[error("Body {name:?} has an invalid period ({value}); it must be finite and non-zero")]
    InvalidPeriod { name: String, value: f32 },
    #[error("Catalog has {0} bodies; at most {max} are supported", max = u16::MAX as usize + 1)]
    TooManyBodies(usize),
    #[error("Ring of {0:?} must have 0 < inner < outer")]
    InvalidRing(String),
}
