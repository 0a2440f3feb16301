use crate::app;
use bevy::app::AppExit;
use bevy::window::WindowResolution;
use clap::ArgAction;
use solar_system::registry::{Body, BodyRegistry};
use solar_system::scene::error::CatalogError;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(clap::Parser)]
#[clap(version, about = "Interactive 3D solar system")]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: CliCommand,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), CliError> {
        self.command.run()
    }
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Open the viewer
    Run {
        /// Window size, as <width>x<height>
        #[clap(short, long)]
        resolution: Option<Resolution>,
        #[clap(long, action = ArgAction::SetTrue)]
        inspector: bool,
        /// Body catalog to load instead of the built-in one
        #[clap(long)]
        catalog: Option<PathBuf>,
        /// Seed for initial orbital positions and the starfield
        #[clap(long)]
        seed: Option<u64>,
    },
    /// Print the bodies of the catalog in display order
    List {
        #[clap(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Resolution {
    width: f32,
    height: f32,
}

impl FromStr for Resolution {
    type Err = ResolutionInvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or(ResolutionInvalidFormat)?;
        let width = w.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        let height = h.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        if width <= 0.0 || height <= 0.0 {
            return Err(ResolutionInvalidFormat);
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid format for resolution; expected <width>x<height>")]
struct ResolutionInvalidFormat;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("Cannot load body catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Application exited with code {0}")]
    App(u8),
}

fn load_registry(catalog: Option<PathBuf>) -> Result<BodyRegistry, CatalogError> {
    match catalog {
        Some(path) => BodyRegistry::load(path),
        None => BodyRegistry::builtin(),
    }
}

fn list_line(body: Body) -> String {
    match body {
        Body::Star(star) => format!("{:<10} {:<6} radius {:>6.3}", star.name, star.kind, star.radius),
        Body::Orbiting(planet) => format!(
            "{:<10} {:<6} radius {:>6.3}  distance {:>6.1}  period {:>7.2}{}",
            planet.name,
            planet.kind,
            planet.radius,
            planet.distance,
            planet.period,
            if planet.rings.is_some() { "  ringed" } else { "" }
        ),
    }
}

impl CliCommand {
    fn run(self) -> Result<(), CliError> {
        match self {
            Self::List { catalog } => {
                let registry = load_registry(catalog)?;
                for (_, body) in registry.iter() {
                    println!("{}", list_line(body));
                }
                Ok(())
            }
            Self::Run {
                resolution,
                inspector,
                catalog,
                seed,
            } => {
                let registry = load_registry(catalog)?;
                let exit = app::get_app(app::AppSettings {
                    resolution: resolution
                        .map(|r| WindowResolution::new(r.width, r.height))
                        .unwrap_or_default(),
                    with_inspector: inspector,
                    registry,
                    seed,
                })
                .run();
                match exit {
                    AppExit::Success => Ok(()),
                    AppExit::Error(code) => Err(CliError::App(code.get())),
                }
            }
        }
    }
}
