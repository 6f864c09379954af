//! Snell's law for elastic waves with mode conversion.
//!
//! An elastic wave striking a planar interface between two media produces up
//! to four outgoing waves: a reflected and a refracted wave of each of the
//! two bulk modes. This module computes the angle of every outgoing wave and
//! the critical incidence angles at which converted or refracted branches
//! graze the interface.
//!
//! The solver provides:
//! - Mirror-law reflection for the mode preserving branch
//! - Snell's law for mode converted reflection and both refractions
//! - Classification of each branch as real, critical, evanescent, not
//!   applicable or invalid
//! - Critical incidence angles and the position of the current incidence
//!   angle relative to each of them
//!
//! # Error Model
//!
//! Nothing here returns an error. Every anomaly, from a fluid that carries no
//! shear wave to a malformed speed, is encoded in the `Classification` of the
//! affected branch so callers can display it.

use serde::{Deserialize, Serialize};

use crate::media::{is_valid_speed, Medium, WaveMode};


/// Largest incidence angle used by the solver. Grazing incidence is excluded.
pub const MAX_INCIDENCE_DEG: f64 = 89.999;
/// Tolerance in degrees for an incidence angle to count as at a critical angle.
pub const CRITICAL_POSITION_EPSILON: f64 = 1e-6;
/// Tolerance for a Snell sine to count as exactly one.
pub const UNIT_SINE_TOLERANCE: f64 = 1e-12;

/// Outcome of solving one outgoing branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Ordinary propagating ray, angle in [0, 90).
    Real,
    /// Ray travels along the interface, angle exactly 90.
    Critical,
    /// Snell sine exceeds one; nothing propagates in this branch.
    Evanescent,
    /// The target mode does not exist in the relevant medium.
    NotApplicable,
    /// A required speed is non-finite or non-positive.
    Invalid,
}

/// Angle and classification of one outgoing wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Angle from the interface normal in degrees, if a ray exists.
    pub angle: Option<f64>,
    pub classification: Classification,
    /// Snell sine the angle was derived from.
    pub sin: Option<f64>,
}

impl Branch {
    fn invalid() -> Self {
        Self {
            angle: None,
            classification: Classification::Invalid,
            sin: None,
        }
    }

    fn not_applicable() -> Self {
        Self {
            angle: None,
            classification: Classification::NotApplicable,
            sin: None,
        }
    }

    /// True when the branch produces a ray that can be drawn.
    pub fn is_drawable(&self) -> bool {
        matches!(
            self.classification,
            Classification::Real | Classification::Critical
        ) && self.angle.is_some()
    }
}

/// Angles of the four outgoing waves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleResult {
    pub reflected_longitudinal: Branch,
    pub reflected_shear: Branch,
    pub refracted_longitudinal: Branch,
    pub refracted_shear: Branch,
}

impl AngleResult {
    pub fn reflected(&self, mode: WaveMode) -> &Branch {
        match mode {
            WaveMode::Longitudinal => &self.reflected_longitudinal,
            WaveMode::Shear => &self.reflected_shear,
        }
    }

    pub fn refracted(&self, mode: WaveMode) -> &Branch {
        match mode {
            WaveMode::Longitudinal => &self.refracted_longitudinal,
            WaveMode::Shear => &self.refracted_shear,
        }
    }
}

/// Where the current incidence angle lies relative to a critical angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Below,
    At,
    Above,
    NotApplicable,
}

impl Position {
    fn of(incidence: f64, critical: Option<f64>) -> Self {
        match critical {
            Some(critical) if critical.is_finite() => {
                let d = incidence - critical;
                if d.abs() < CRITICAL_POSITION_EPSILON {
                    Position::At
                } else if d < 0.0 {
                    Position::Below
                } else {
                    Position::Above
                }
            }
            _ => Position::NotApplicable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalAngle {
    /// Critical incidence angle in degrees, if it exists.
    pub angle: Option<f64>,
    pub position: Position,
}

impl CriticalAngle {
    fn new(incidence: f64, angle: Option<f64>) -> Self {
        Self {
            angle,
            position: Position::of(incidence, angle),
        }
    }
}

/// Critical incidence angles.
///
/// - `alpha1`: refracted longitudinal wave reaches 90 degrees
/// - `alpha2`: refracted shear wave reaches 90 degrees
/// - `alpha3`: reflected longitudinal wave reaches 90 degrees, shear
///   incidence only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalAngleSet {
    pub alpha1: CriticalAngle,
    pub alpha2: CriticalAngle,
    pub alpha3: CriticalAngle,
}

/// The incoming wave after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncidentWave {
    pub mode: WaveMode,
    /// Angle from the interface normal in degrees, within [0, 89.999].
    pub angle: f64,
}

impl IncidentWave {
    pub fn new(mode: WaveMode, angle: f64) -> Self {
        debug_assert!(!angle.is_nan(), "incidence angle must be a number");
        Self {
            mode,
            angle: angle.clamp(0.0, MAX_INCIDENCE_DEG),
        }
    }
}

/// Everything the solver derives from one set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub incident: IncidentWave,
    pub result: AngleResult,
    pub critical: CriticalAngleSet,
}

/// Flat form of the solver inputs, as exchanged with a user interface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverInput {
    pub incident_mode: WaveMode,
    pub incidence_angle: f64,
    pub speed_longitudinal_1: Option<f64>,
    pub speed_shear_1: Option<f64>,
    pub speed_longitudinal_2: Option<f64>,
    pub speed_shear_2: Option<f64>,
}

pub fn solve_input(input: &SolverInput) -> Solution {
    let medium1 = Medium::new(input.speed_longitudinal_1, input.speed_shear_1);
    let medium2 = Medium::new(input.speed_longitudinal_2, input.speed_shear_2);
    solve(input.incident_mode, input.incidence_angle, &medium1, &medium2)
}

/// Solves for every reflected and refracted angle at the interface.
///
/// **Context**: A wave of mode `mode` travels in `medium1` and meets the
/// interface with `medium2` at `angle` degrees from the normal. Each outgoing
/// wave obeys `sin(theta) / c = sin(incidence) / c_inc` with `c` the speed of
/// its own mode in its own medium.
///
/// **How it Works**: The incidence angle is clamped into [0, 89.999]. The
/// mode preserving reflection mirrors the incidence angle. The converted
/// reflection and both refractions go through Snell's law and the shared
/// sine-to-angle rule. Critical angles are computed for the refracted
/// branches and, for shear incidence, for the converted reflection.
pub fn solve(mode: WaveMode, angle: f64, medium1: &Medium, medium2: &Medium) -> Solution {
    let incident = IncidentWave::new(mode, angle);
    let a = incident.angle;
    let c_inc = medium1.speed(mode).filter(|c| is_valid_speed(*c));

    tracing::trace!(mode = %mode, angle = a, "solving interface angles");

    let result = match c_inc {
        None => AngleResult {
            reflected_longitudinal: Branch::invalid(),
            reflected_shear: Branch::invalid(),
            refracted_longitudinal: Branch::invalid(),
            refracted_shear: Branch::invalid(),
        },
        Some(c_inc) => {
            let sin_inc = a.to_radians().sin();
            let same = Branch {
                angle: Some(a),
                classification: Classification::Real,
                sin: Some(sin_inc),
            };
            let converted = snell_branch(sin_inc, c_inc, medium1.speed(mode.other()));
            let (reflected_longitudinal, reflected_shear) = match mode {
                WaveMode::Longitudinal => (same, converted),
                WaveMode::Shear => (converted, same),
            };
            AngleResult {
                reflected_longitudinal,
                reflected_shear,
                refracted_longitudinal: snell_branch(sin_inc, c_inc, medium2.longitudinal),
                refracted_shear: snell_branch(sin_inc, c_inc, medium2.shear),
            }
        }
    };

    let critical = match (mode, c_inc) {
        (_, None) => CriticalAngleSet {
            alpha1: CriticalAngle::new(a, None),
            alpha2: CriticalAngle::new(a, None),
            alpha3: CriticalAngle::new(a, None),
        },
        (WaveMode::Longitudinal, Some(c_inc)) => CriticalAngleSet {
            alpha1: CriticalAngle::new(a, critical_angle(c_inc, medium2.longitudinal)),
            alpha2: CriticalAngle::new(a, critical_angle(c_inc, medium2.shear)),
            alpha3: CriticalAngle::new(a, None),
        },
        (WaveMode::Shear, Some(c_inc)) => CriticalAngleSet {
            alpha1: CriticalAngle::new(a, critical_angle(c_inc, medium2.longitudinal)),
            alpha2: CriticalAngle::new(a, critical_angle(c_inc, medium2.shear)),
            alpha3: CriticalAngle::new(a, critical_angle(c_inc, medium1.longitudinal)),
        },
    };

    Solution {
        incident,
        result,
        critical,
    }
}

fn snell_branch(sin_inc: f64, c_inc: f64, c_target: Option<f64>) -> Branch {
    match c_target {
        None => Branch::not_applicable(),
        Some(c) if !is_valid_speed(c) => Branch::invalid(),
        Some(c) => angle_from_sin(sin_inc * c / c_inc),
    }
}

/// Converts a Snell sine into an angle and classification.
pub fn angle_from_sin(s: f64) -> Branch {
    let classification = if !s.is_finite() {
        Classification::Invalid
    } else if (s.abs() - 1.0).abs() <= UNIT_SINE_TOLERANCE {
        Classification::Critical
    } else if s.abs() < 1.0 {
        Classification::Real
    } else {
        Classification::Evanescent
    };
    let angle = match classification {
        Classification::Real => Some(s.asin().to_degrees()),
        Classification::Critical => Some(90.0),
        _ => None,
    };
    Branch {
        angle,
        classification,
        sin: s.is_finite().then_some(s),
    }
}

/// Incidence angle in degrees at which a branch of speed `c_target` grazes
/// the interface. Exists only when the target is strictly faster.
pub fn critical_angle(c_inc: f64, c_target: Option<f64>) -> Option<f64> {
    let c_target = c_target.filter(|c| is_valid_speed(*c))?;
    if !is_valid_speed(c_inc) || c_target <= c_inc {
        return None;
    }
    Some((c_inc / c_target).asin().to_degrees())
}
