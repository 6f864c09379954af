//! Elastic media and their wave speeds.
//!
//! A medium is described only by the speeds of the two bulk elastic modes it
//! can carry. Fluids carry no shear wave, which is encoded by an absent shear
//! speed rather than a zero or sentinel value.
//!
//! The module provides:
//! - The `WaveMode` tag used throughout the solver and the geometry layer
//! - `Medium`, an immutable pair of optional speeds
//! - `Catalog`, a named table of media with a built-in default set and
//!   TOML loading for user supplied tables

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parse_wave_mode() {
        assert_eq!("L".parse::<WaveMode>().unwrap(), WaveMode::Longitudinal);
        assert_eq!("s".parse::<WaveMode>().unwrap(), WaveMode::Shear);
        assert_eq!("shear".parse::<WaveMode>().unwrap(), WaveMode::Shear);
        assert!("x".parse::<WaveMode>().is_err());
        assert_eq!(WaveMode::Shear.other(), WaveMode::Longitudinal);
    }

    #[test]
    fn fluid_has_no_shear() {
        let catalog = Catalog::builtin();
        let water = catalog.get("water").unwrap();
        assert!(water.is_fluid());
        assert!(water.supports(WaveMode::Longitudinal));
        assert!(!water.supports(WaveMode::Shear));
        assert_eq!(water.speed(WaveMode::Shear), None);
        assert_eq!(water.speed(WaveMode::Longitudinal), Some(1480.0));
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 18);
        for (name, medium) in catalog.iter() {
            assert!(medium.validate().is_ok(), "invalid builtin medium {}", name);
        }
        assert!(catalog.get(DEFAULT_MEDIUM_1).is_ok());
        assert!(catalog.get(DEFAULT_MEDIUM_2).is_ok());
    }

    #[test]
    fn unknown_medium_is_an_error() {
        let catalog = Catalog::builtin();
        let err = catalog.get("unobtainium").unwrap_err();
        assert!(err.to_string().contains("unobtainium"));
    }

    #[test]
    fn load_catalog_from_toml() {
        let text = r#"
            [media.gel]
            longitudinal = 1520.0

            [media.tungsten]
            longitudinal = 5220.0
            shear = 2890.0
        "#;
        let catalog = Catalog::from_toml_str(text).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("gel").unwrap().is_fluid());
        assert_eq!(
            catalog.get("tungsten").unwrap().speed(WaveMode::Shear),
            Some(2890.0)
        );
    }

    #[test]
    fn reject_invalid_speed_in_toml() {
        let text = r#"
            [media.broken]
            longitudinal = -10.0
        "#;
        assert!(Catalog::from_toml_str(text).is_err());
    }
}

/// Medium selected for the upper half-plane when nothing else is configured.
pub const DEFAULT_MEDIUM_1: &str = "acrylic";
/// Medium selected for the lower half-plane when nothing else is configured.
pub const DEFAULT_MEDIUM_2: &str = "steel";

/// The two bulk elastic wave modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveMode {
    #[serde(rename = "L")]
    Longitudinal,
    #[serde(rename = "S")]
    Shear,
}

impl WaveMode {
    /// The mode a converted wave takes.
    pub fn other(self) -> Self {
        match self {
            WaveMode::Longitudinal => WaveMode::Shear,
            WaveMode::Shear => WaveMode::Longitudinal,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            WaveMode::Longitudinal => "L",
            WaveMode::Shear => "S",
        }
    }
}

impl FromStr for WaveMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "longitudinal" => Ok(WaveMode::Longitudinal),
            "s" | "shear" | "transverse" => Ok(WaveMode::Shear),
            _ => Err(anyhow!("Unknown wave mode '{}'. Expected 'L' or 'S'", s)),
        }
    }
}

impl fmt::Display for WaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Bulk wave speeds of a medium in metres per second.
///
/// `None` means the mode does not exist in the medium. Speeds are stored as
/// given; the solver classifies non-finite or non-positive values as invalid
/// rather than rejecting them here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Medium {
    #[serde(default)]
    pub longitudinal: Option<f64>,
    #[serde(default)]
    pub shear: Option<f64>,
}

impl Medium {
    pub const fn new(longitudinal: Option<f64>, shear: Option<f64>) -> Self {
        Self {
            longitudinal,
            shear,
        }
    }

    pub const fn solid(longitudinal: f64, shear: f64) -> Self {
        Self::new(Some(longitudinal), Some(shear))
    }

    pub const fn fluid(longitudinal: f64) -> Self {
        Self::new(Some(longitudinal), None)
    }

    pub fn speed(&self, mode: WaveMode) -> Option<f64> {
        match mode {
            WaveMode::Longitudinal => self.longitudinal,
            WaveMode::Shear => self.shear,
        }
    }

    /// True when the medium carries no shear wave.
    pub fn is_fluid(&self) -> bool {
        self.shear.is_none()
    }

    /// True when the medium has a usable speed for `mode`.
    pub fn supports(&self, mode: WaveMode) -> bool {
        self.speed(mode).is_some_and(is_valid_speed)
    }

    /// Checks that every speed that is present is finite and positive.
    pub fn validate(&self) -> Result<()> {
        for mode in [WaveMode::Longitudinal, WaveMode::Shear] {
            if let Some(speed) = self.speed(mode) {
                if !is_valid_speed(speed) {
                    return Err(anyhow!(
                        "{} speed must be finite and greater than 0, got {}",
                        mode,
                        speed
                    ));
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}

/// Named table of media.
///
/// **Context**: The interactive tool offers a fixed list of common
/// ultrasonic testing materials. Users may also supply their own table.
///
/// **How it Works**: Entries are kept in insertion order for the built-in
/// table so menus list them in a stable, meaningful order. Tables loaded from
/// TOML are ordered by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<(String, Medium)>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    media: BTreeMap<String, Medium>,
}

impl Catalog {
    /// The built-in table of longitudinal and shear speeds in m/s.
    pub fn builtin() -> Self {
        let entries = [
            ("steel", Medium::solid(5900.0, 3230.0)),
            ("rail steel", Medium::solid(5900.0, 3230.0)),
            ("aluminium", Medium::solid(6320.0, 3130.0)),
            ("copper", Medium::solid(4760.0, 2320.0)),
            ("brass", Medium::solid(4700.0, 2100.0)),
            ("titanium alloy", Medium::solid(6100.0, 3120.0)),
            ("stainless steel", Medium::solid(5790.0, 3100.0)),
            ("cast iron", Medium::solid(4500.0, 2500.0)),
            ("nickel alloy", Medium::solid(5800.0, 3000.0)),
            ("glass", Medium::solid(5600.0, 3400.0)),
            ("alumina ceramic", Medium::solid(10000.0, 6000.0)),
            ("acrylic", Medium::solid(2730.0, 1340.0)),
            ("epoxy", Medium::solid(2500.0, 1200.0)),
            ("polyethylene", Medium::solid(1950.0, 650.0)),
            ("concrete", Medium::solid(3200.0, 1800.0)),
            ("water", Medium::fluid(1480.0)),
            ("engine oil", Medium::fluid(1400.0)),
            ("air", Medium::fluid(343.0)),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(name, medium)| (name.to_string(), medium))
                .collect(),
        }
    }

    /// Parses a catalog of the form `[media.<name>] longitudinal = .. shear = ..`.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text).context("Failed to parse media catalog")?;
        for (name, medium) in &file.media {
            medium
                .validate()
                .with_context(|| format!("Invalid medium '{}'", name))?;
        }
        Ok(Self {
            entries: file.media.into_iter().collect(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read media catalog {:?}", path))?;
        Self::from_toml_str(&text)
    }

    pub fn get(&self, name: &str) -> Result<&Medium> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, medium)| medium)
            .ok_or_else(|| anyhow!("Unknown medium '{}'", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Medium)> {
        self.entries.iter().map(|(name, medium)| (name.as_str(), medium))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
