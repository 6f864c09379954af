use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::media::{Catalog, Medium};
use crate::solver::{Branch, Classification, CriticalAngle, Position, Solution};


/// Shown in place of an angle that does not exist.
pub const PLACEHOLDER: &str = "—";

/// Formats an angle to one decimal place, or the placeholder dash.
pub fn format_angle(angle: Option<f64>) -> String {
    match angle {
        Some(angle) if angle.is_finite() => format!("{:.1}", (angle * 10.0).round() / 10.0),
        _ => PLACEHOLDER.to_string(),
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Classification::Real => "real",
            Classification::Critical => "critical",
            Classification::Evanescent => "evanescent",
            Classification::NotApplicable => "not applicable",
            Classification::Invalid => "invalid",
        };
        write!(f, "{}", text)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Position::Below => "below",
            Position::At => "at",
            Position::Above => "above",
            Position::NotApplicable => "n/a",
        };
        write!(f, "{}", text)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", format_angle(self.angle), self.classification)
    }
}

impl fmt::Display for CriticalAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", format_angle(self.angle), self.position)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.result;
        let c = &self.critical;
        write!(
            f,
            "Angles (degrees from normal):
  - Incident {}: {}
  - Reflected L: {}
  - Reflected S: {}
  - Refracted L: {}
  - Refracted S: {}
Critical angles:
  - alpha1: {}
  - alpha2: {}
  - alpha3: {}
",
            self.incident.mode,
            format_angle(Some(self.incident.angle)),
            r.reflected_longitudinal,
            r.reflected_shear,
            r.refracted_longitudinal,
            r.refracted_shear,
            c.alpha1,
            c.alpha2,
            c.alpha3,
        )
    }
}

/// One line per medium: name, longitudinal and shear speed.
pub fn format_catalog(catalog: &Catalog) -> String {
    catalog
        .iter()
        .map(|(name, medium)| {
            format!(
                "{:<20} {:>8} {:>8}",
                name,
                format_speed(medium.longitudinal),
                format_speed(medium.shear)
            )
        })
        .join("\n")
}

fn format_speed(speed: Option<f64>) -> String {
    speed.map_or_else(|| PLACEHOLDER.to_string(), |s| format!("{:.0}", s))
}

/// Wave speeds of the selected pair, in m/s, as `cL1 cS1 cL2 cS2`.
pub fn format_media(name1: &str, medium1: &Medium, name2: &str, medium2: &Medium) -> String {
    let note = |medium: &Medium| if medium.is_fluid() { " (fluid, no shear)" } else { "" };
    format!(
        "Wave speeds (m/s):
  - Medium 1 {}: cL1 = {}, cS1 = {}{}
  - Medium 2 {}: cL2 = {}, cS2 = {}{}
",
        name1,
        format_speed(medium1.longitudinal),
        format_speed(medium1.shear),
        note(medium1),
        name2,
        format_speed(medium2.longitudinal),
        format_speed(medium2.shear),
        note(medium2),
    )
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {:?}", dir))
}

/// Write a solution as pretty JSON to `solution.json` in `dir`.
pub fn write_json(solution: &Solution, dir: &Path) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join("solution.json");
    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, solution)?;
    writer.flush()?;
    tracing::info!(path = ?path, "wrote solution");
    Ok(path)
}

/// Write a sweep table to `sweep.dat` in `dir`.
/// Columns are the incidence angle followed by the reflected L, reflected S,
/// refracted L and refracted S angles; absent angles are written as `nan`.
pub fn write_sweep(solutions: &[Solution], dir: &Path) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join("sweep.dat");
    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# alpha gammaL gammaS betaL betaS")?;
    for solution in solutions {
        let r = &solution.result;
        let columns = [
            r.reflected_longitudinal.angle,
            r.reflected_shear.angle,
            r.refracted_longitudinal.angle,
            r.refracted_shear.angle,
        ]
        .iter()
        .map(|angle| match angle {
            Some(angle) => format!("{:.6}", angle),
            None => "nan".to_string(),
        })
        .join(" ");
        writeln!(writer, "{:.6} {}", solution.incident.angle, columns)?;
    }
    writer.flush()?;

    tracing::info!(path = ?path, rows = solutions.len(), "wrote sweep");
    Ok(path)
}
