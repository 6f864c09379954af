//! Owned interaction state for an interactive interface diagram.
//!
//! A `Session` holds everything a front end would otherwise keep in globals:
//! the media selection, the incident wave, the most recent solution, the
//! viewport layout and the drag state. Every change of input recomputes the
//! solution from scratch and replaces the previous one wholesale.

use anyhow::{anyhow, Result};
use nalgebra::Point2;

use crate::media::{Catalog, Medium, WaveMode};
use crate::ray::{angle_from_pointer, distance_point_to_segment};
use crate::scene::{Ray, Scene, Viewport};
use crate::settings::Settings;
use crate::solver::{solve, Solution};

#[cfg(test)]
mod tests {

    use super::*;

    fn water_steel() -> Session {
        Session::new(
            Catalog::builtin(),
            "water",
            "steel",
            WaveMode::Longitudinal,
            30.0,
            Viewport::default(),
        )
        .unwrap()
    }

    #[test]
    fn new_session_is_solved() {
        let session = water_steel();
        assert_eq!(session.solution().incident.angle, 30.0);
        assert_eq!(session.solution().result.reflected_longitudinal.angle, Some(30.0));
        assert!(!session.is_dragging());
    }

    #[test]
    fn unknown_medium_fails() {
        let err = Session::new(
            Catalog::builtin(),
            "water",
            "mithril",
            WaveMode::Longitudinal,
            30.0,
            Viewport::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn shear_from_fluid_falls_back_to_longitudinal() {
        let mut session = water_steel();
        session.set_mode(WaveMode::Shear);
        assert_eq!(session.mode(), WaveMode::Longitudinal);

        session.set_media("acrylic", "steel").unwrap();
        session.set_mode(WaveMode::Shear);
        assert_eq!(session.mode(), WaveMode::Shear);
        assert_eq!(session.solution().incident.mode, WaveMode::Shear);

        // switching the upper medium to a fluid drops shear incidence again
        session.set_media("engine oil", "steel").unwrap();
        assert_eq!(session.mode(), WaveMode::Longitudinal);
    }

    #[test]
    fn set_angle_clamps_and_recomputes() {
        let mut session = water_steel();
        session.set_angle(95.0);
        assert_eq!(session.angle(), 90.0);
        assert_eq!(session.solution().incident.angle, 89.999);
        session.set_angle(-3.0);
        assert_eq!(session.angle(), 0.0);
    }

    #[test]
    fn drag_incident_ray() {
        let mut session = water_steel();
        let (start, end) = session.incident_segment();
        let mid = Point2::from((start.coords + end.coords) * 0.5);

        assert!(!session.pointer_down(&Point2::new(10.0, 600.0)));
        assert!(!session.is_dragging());

        assert!(session.pointer_down(&mid));
        assert!(session.is_dragging());

        let origin = session.scene().origin();
        let target = Point2::new(origin.x - 100.0, origin.y - 100.0);
        assert_eq!(session.pointer_move(&target), Some(45.0));
        assert_eq!(session.angle(), 45.0);

        // below the interface the angle is kept
        assert_eq!(session.pointer_move(&Point2::new(origin.x, origin.y + 50.0)), None);
        assert_eq!(session.angle(), 45.0);

        session.pointer_up();
        assert!(!session.is_dragging());
        assert_eq!(session.pointer_move(&Point2::new(origin.x - 10.0, 20.0)), None);
        assert_eq!(session.angle(), 45.0);
    }

    #[test]
    fn hover_tracks_incident_ray() {
        let mut session = water_steel();
        let (start, _) = session.incident_segment();
        session.pointer_move(&start);
        assert!(session.is_hovering());
        session.pointer_move(&Point2::new(5.0, 600.0));
        assert!(!session.is_hovering());
    }

    #[test]
    fn frame_is_stable_between_inputs() {
        let session = water_steel();
        assert_eq!(session.frame(), session.frame());
    }
}

/// Pointer distance in pixels within which the incident ray can be grabbed.
pub const HIT_TOLERANCE: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    medium1: String,
    medium2: String,
    mode: WaveMode,
    angle: f64,
    solution: Solution,
    scene: Scene,
    dragging: bool,
    hovering: bool,
}

impl Session {
    pub fn new(
        catalog: Catalog,
        medium1: &str,
        medium2: &str,
        mode: WaveMode,
        angle: f64,
        viewport: Viewport,
    ) -> Result<Self> {
        let scene = Scene::new(viewport)
            .ok_or_else(|| anyhow!("Viewport {:?} is too small to draw in", viewport))?;
        let m1 = *catalog.get(medium1)?;
        let m2 = *catalog.get(medium2)?;
        let angle = angle.clamp(0.0, 90.0);
        let mut session = Self {
            solution: solve(mode, angle, &m1, &m2),
            catalog,
            medium1: medium1.to_string(),
            medium2: medium2.to_string(),
            mode,
            angle,
            scene,
            dragging: false,
            hovering: false,
        };
        session.recompute();
        Ok(session)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let scene = Scene::new(settings.viewport())
            .ok_or_else(|| anyhow!("Viewport {:?} is too small to draw in", settings.viewport()))?
            .with_margin(settings.margin);
        let mut session = Self::new(
            settings.load_catalog()?,
            &settings.medium1,
            &settings.medium2,
            settings.mode,
            settings.angle,
            settings.viewport(),
        )?;
        session.scene = scene;
        Ok(session)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn media_names(&self) -> (&str, &str) {
        (&self.medium1, &self.medium2)
    }

    pub fn media(&self) -> (Medium, Medium) {
        // both names were checked against the catalog when they were set
        let lookup = |name: &str| self.catalog.get(name).copied().unwrap_or_default();
        (lookup(&self.medium1), lookup(&self.medium2))
    }

    pub fn mode(&self) -> WaveMode {
        self.mode
    }

    /// Incidence angle as set by the user, in [0, 90].
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The most recent solution.
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn set_angle(&mut self, angle: f64) {
        debug_assert!(!angle.is_nan(), "incidence angle must be a number");
        self.angle = angle.clamp(0.0, 90.0);
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: WaveMode) {
        self.mode = mode;
        self.recompute();
    }

    pub fn set_media(&mut self, medium1: &str, medium2: &str) -> Result<()> {
        self.catalog.get(medium1)?;
        self.catalog.get(medium2)?;
        self.medium1 = medium1.to_string();
        self.medium2 = medium2.to_string();
        self.recompute();
        Ok(())
    }

    /// Re-lays the scene. Returns false and keeps the old layout if the
    /// viewport is too small.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.scene.resize(viewport)
    }

    /// Rays to draw for the current solution.
    pub fn frame(&self) -> Vec<Ray> {
        self.scene.project(&self.solution)
    }

    /// Far end and origin of the incident ray as currently drawn.
    pub fn incident_segment(&self) -> (Point2<f64>, Point2<f64>) {
        self.scene.incident_segment(self.solution.incident.angle)
    }

    fn hits_incident(&self, pointer: &Point2<f64>) -> bool {
        let (start, end) = self.incident_segment();
        distance_point_to_segment(pointer, &start, &end) <= HIT_TOLERANCE
    }

    /// Starts a drag if the pointer is on the incident ray.
    pub fn pointer_down(&mut self, pointer: &Point2<f64>) -> bool {
        self.dragging = self.hits_incident(pointer);
        self.dragging
    }

    /// Updates hover state, or while dragging, the incidence angle.
    ///
    /// Returns the new angle, rounded to a tenth of a degree, when the drag
    /// moved it.
    pub fn pointer_move(&mut self, pointer: &Point2<f64>) -> Option<f64> {
        if !self.dragging {
            self.hovering = self.hits_incident(pointer);
            return None;
        }
        let angle = angle_from_pointer(pointer, &self.scene.origin())?;
        let angle = (angle * 10.0).round() / 10.0;
        self.set_angle(angle);
        Some(self.angle)
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
        self.hovering = false;
    }

    fn recompute(&mut self) {
        let (m1, m2) = self.media();
        if self.mode == WaveMode::Shear && !m1.supports(WaveMode::Shear) {
            tracing::warn!(
                medium = %self.medium1,
                "medium carries no shear wave, using longitudinal incidence"
            );
            self.mode = WaveMode::Longitudinal;
        }
        self.solution = solve(self.mode, self.angle, &m1, &m2);
        tracing::debug!(
            mode = %self.mode,
            angle = self.angle,
            medium1 = %self.medium1,
            medium2 = %self.medium2,
            "recomputed interface angles"
        );
    }
}
