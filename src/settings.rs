use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::media::{Catalog, WaveMode};
use crate::ray::DEFAULT_MARGIN;
use crate::scene::Viewport;

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn default_config_loads() {
        let settings = load_default_config().unwrap();
        assert_eq!(settings.medium1, "acrylic");
        assert_eq!(settings.medium2, "steel");
        assert_eq!(settings.mode, WaveMode::Longitudinal);
        assert_eq!(settings.angle, 30.0);
        assert!(settings.sweep.is_none());
    }

    #[test]
    fn cli_overrides() {
        let mut settings = load_default_config().unwrap();
        let args = CliArgs::try_parse_from([
            "snellwave",
            "--m1",
            "water",
            "--mode",
            "S",
            "-a",
            "12.5",
            "--sweep",
            "0",
            "60",
            "121",
        ])
        .unwrap();
        apply_args(&mut settings, args);
        assert_eq!(settings.medium1, "water");
        assert_eq!(settings.medium2, "steel");
        assert_eq!(settings.mode, WaveMode::Shear);
        assert_eq!(settings.angle, 12.5);
        assert_eq!(
            settings.sweep,
            Some(SweepSettings {
                start: 0.0,
                end: 60.0,
                steps: 121
            })
        );
    }

    #[test]
    fn sweep_accepts_negative_start() {
        let mut settings = load_default_config().unwrap();
        let args =
            CliArgs::try_parse_from(["snellwave", "--sweep", "-10", "40", "11"]).unwrap();
        apply_args(&mut settings, args);
        assert_eq!(
            settings.sweep,
            Some(SweepSettings {
                start: -10.0,
                end: 40.0,
                steps: 11
            })
        );
        assert!(validate_config(&settings).is_ok());
    }

    #[test]
    fn bad_mode_is_rejected_by_cli() {
        assert!(CliArgs::try_parse_from(["snellwave", "--mode", "Q"]).is_err());
    }

    #[test]
    fn validation() {
        let mut settings = load_default_config().unwrap();
        assert!(validate_config(&settings).is_ok());

        settings.medium2 = "vibranium".to_string();
        assert!(validate_config(&settings).is_err());

        let mut settings = load_default_config().unwrap();
        settings.angle = f64::NAN;
        assert!(validate_config(&settings).is_err());

        let mut settings = load_default_config().unwrap();
        settings.sweep = Some(SweepSettings {
            start: 10.0,
            end: 5.0,
            steps: 4,
        });
        assert!(validate_config(&settings).is_err());
    }
}

/// Default directory for written results.
pub const DEFAULT_DIRECTORY: &str = "output";

/// Runtime configuration for the application.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Name of the upper (incident) medium.
    pub medium1: String,
    /// Name of the lower (transmitting) medium.
    pub medium2: String,
    pub mode: WaveMode,
    /// Incidence angle in degrees from the normal.
    pub angle: f64,
    /// Optional TOML media catalog replacing the built-in table.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub sweep: Option<SweepSettings>,
    #[serde(default)]
    pub json: bool,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
}

/// Range of incidence angles to tabulate.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct SweepSettings {
    pub start: f64,
    pub end: f64,
    pub steps: usize,
}

fn default_directory() -> PathBuf {
    PathBuf::from(DEFAULT_DIRECTORY)
}

fn default_width() -> f64 {
    Viewport::default().width
}

fn default_height() -> f64 {
    Viewport::default().height
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN
}

impl Settings {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => {
                let path = if path.is_relative() && !path.exists() {
                    retrieve_project_root()?.join(path)
                } else {
                    path.clone()
                };
                Catalog::from_file(path)
            }
            None => Ok(Catalog::builtin()),
        }
    }
}

pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let default_config_file = root.join("config/default.toml");

    let settings = Config::builder()
        .add_source(File::from(default_config_file).required(true))
        .build()
        .context("Error loading configuration")?;

    let config: Settings = settings
        .try_deserialize()
        .context("Error deserializing configuration")?;

    validate_config(&config)?;

    Ok(config)
}

pub fn load_config() -> Result<Settings> {
    load_config_with(CliArgs::parse())
}

/// Loads the layered configuration and applies command line overrides.
pub fn load_config_with(args: CliArgs) -> Result<Settings> {
    let root = retrieve_project_root()?;

    let default_config_file = root.join("config/default.toml");
    let local_config = root.join("config/local.toml");

    // Check if local config exists, if not use default
    let config_file = if local_config.exists() {
        tracing::info!(path = ?local_config, "using local configuration");
        local_config
    } else {
        tracing::info!(path = ?default_config_file, "using default configuration");
        default_config_file
    };

    let settings = Config::builder()
        .add_source(File::from(config_file).required(true))
        .add_source(Environment::with_prefix("snellwave"))
        .build()
        .context("Error loading configuration")?;

    let mut config: Settings = settings
        .try_deserialize()
        .context("Error deserializing configuration")?;

    apply_args(&mut config, args);
    validate_config(&config)?;

    tracing::debug!(?config, "configuration loaded");

    Ok(config)
}

fn apply_args(config: &mut Settings, args: CliArgs) {
    if let Some(m1) = args.m1 {
        config.medium1 = m1;
    }
    if let Some(m2) = args.m2 {
        config.medium2 = m2;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(angle) = args.angle {
        config.angle = angle;
    }
    if let Some(catalog) = args.catalog {
        config.catalog = Some(catalog);
    }
    if let Some(dir) = args.dir {
        config.directory = dir;
    }
    if args.json {
        config.json = true;
    }
    if let Some(sweep) = args.sweep {
        if let [start, end, steps] = sweep[..] {
            config.sweep = Some(SweepSettings {
                start,
                end,
                steps: steps.max(0.0) as usize,
            });
        }
    }
}

/// Retrieve the project root directory.
/// This function tries to find the project root directory in different ways:
/// 1. If the CARGO_MANIFEST_DIR environment variable is set, use it.
/// 2. If the SNELLWAVE_ROOT_DIR environment variable is set, use it.
/// 3. If the "config" subdirectory is found in the executable directory or any of its parents,
///    use it.
fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        // When running through cargo (e.g. cargo run, cargo test)
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("SNELLWAVE_ROOT_DIR") {
        return Ok(PathBuf::from(path));
    }

    let exe_path = env::current_exe().context("Failed to get current executable path")?;
    let mut current_dir = exe_path.parent().map(PathBuf::from);
    while let Some(dir) = current_dir {
        if dir.join("config").is_dir() {
            return Ok(dir);
        }
        current_dir = dir.parent().map(PathBuf::from);
    }
    Err(anyhow!("Could not find project root directory"))
}

pub fn validate_config(config: &Settings) -> Result<()> {
    let catalog = config.load_catalog()?;
    for name in [&config.medium1, &config.medium2] {
        if !catalog.contains(name) {
            return Err(anyhow!(
                "Unknown medium '{}'. Available media: {}",
                name,
                catalog.names().collect::<Vec<_>>().join(", ")
            ));
        }
    }
    if !config.angle.is_finite() {
        return Err(anyhow!("Incidence angle must be a finite number"));
    }
    if !config.viewport().is_usable() {
        return Err(anyhow!(
            "Viewport must be at least 20 units in each dimension, got {}x{}",
            config.width,
            config.height
        ));
    }
    if !(config.margin >= 0.0) {
        return Err(anyhow!("Clip margin must be non-negative"));
    }
    if let Some(sweep) = config.sweep {
        if !(sweep.start.is_finite() && sweep.end.is_finite()) || sweep.end < sweep.start {
            return Err(anyhow!(
                "Sweep range must be finite and increasing, got {} to {}",
                sweep.start,
                sweep.end
            ));
        }
        if sweep.steps < 2 {
            return Err(anyhow!("Sweep needs at least 2 steps, got {}", sweep.steps));
        }
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Reflection, refraction and critical angles of elastic waves at a planar interface"
)]
pub struct CliArgs {
    /// Name of the upper medium, which carries the incident wave.
    #[arg(long)]
    m1: Option<String>,

    /// Name of the lower medium, into which waves are refracted.
    #[arg(long)]
    m2: Option<String>,

    /// Incident wave mode: L (longitudinal) or S (shear).
    #[arg(long, value_parser = parse_wave_mode)]
    mode: Option<WaveMode>,

    /// Incidence angle in degrees from the interface normal.
    /// Values outside [0, 89.999] are clamped.
    #[arg(short, long, allow_negative_numbers = true)]
    angle: Option<f64>,

    /// TOML media catalog to use instead of the built-in table.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Tabulate all angles over a range of incidence angles.
    /// Format: start end steps
    #[arg(long, num_args = 3, value_delimiter = ' ', allow_negative_numbers = true)]
    sweep: Option<Vec<f64>>,

    /// Output directory for written results.
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Also write the solution as JSON.
    #[arg(long)]
    json: bool,

    /// List the media in the catalog and exit.
    #[arg(long)]
    pub list: bool,
}

fn parse_wave_mode(s: &str) -> Result<WaveMode, String> {
    s.parse::<WaveMode>().map_err(|err| err.to_string())
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings:
  - Medium 1: {}
  - Medium 2: {}
  - Incident Mode: {}
  - Incidence Angle: {:.3}
  - Catalog: {}
  - Output Directory: {:?}
  ",
            self.medium1,
            self.medium2,
            self.mode,
            self.angle,
            self.catalog
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
            self.directory,
        )
    }
}
