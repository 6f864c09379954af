//! Viewport layout and projection of solved angles into drawable rays.
//!
//! The scene places the interface as a horizontal line a little below the
//! middle of the viewport, with the interface point at its horizontal centre.
//! The upper rectangle holds the incident medium, the lower one the
//! transmitting medium. Projection is cheap and runs every frame against the
//! most recent `Solution`.

use geo_types::Rect;
use nalgebra::{Point2, Vector2};

use crate::media::WaveMode;
use crate::ray::{
    arc_parameters, clip_to_rect, direction_from_angle, screen_angle, Arc, Half, Quadrant,
    DEFAULT_MARGIN,
};
use crate::solver::{Branch, Solution};


/// Viewports smaller than this in either dimension are ignored.
pub const MIN_VIEWPORT_SIZE: f64 = 20.0;
/// Interface height as a fraction of the viewport height.
pub const INTERFACE_FRACTION: f64 = 0.52;

/// Size of the rendering surface in its own units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_usable(&self) -> bool {
        self.width >= MIN_VIEWPORT_SIZE && self.height >= MIN_VIEWPORT_SIZE
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(900.0, 675.0)
    }
}

/// Identifies a drawn ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayKind {
    Incident,
    Reflected(WaveMode),
    Refracted(WaveMode),
}

/// A ray ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub kind: RayKind,
    /// Mode of the wave travelling along this ray.
    pub mode: WaveMode,
    /// Angle from the normal in degrees.
    pub angle: f64,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub arc: Arc,
    pub arc_radius: f64,
}

impl Ray {
    pub fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }
}

/// Layout of the interface diagram for one viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    viewport: Viewport,
    interface_y: f64,
    origin: Point2<f64>,
    margin: f64,
}

impl Scene {
    /// Lays out a viewport, or returns `None` if it is too small to draw in.
    pub fn new(viewport: Viewport) -> Option<Self> {
        if !viewport.is_usable() {
            return None;
        }
        let interface_y = (viewport.height * INTERFACE_FRACTION).round();
        Some(Self {
            viewport,
            interface_y,
            origin: Point2::new((viewport.width * 0.5).round(), interface_y),
            margin: DEFAULT_MARGIN,
        })
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Re-lays the scene for a new viewport. Unusable sizes leave the layout
    /// untouched and return false.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        match Scene::new(viewport) {
            Some(scene) => {
                *self = scene.with_margin(self.margin);
                true
            }
            None => {
                tracing::debug!(?viewport, "ignoring resize to unusable viewport");
                false
            }
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn interface_y(&self) -> f64 {
        self.interface_y
    }

    /// The point where every ray meets the interface.
    pub fn origin(&self) -> Point2<f64> {
        self.origin
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Region of the incident medium.
    pub fn upper(&self) -> Rect<f64> {
        Rect::new((0.0, 0.0), (self.viewport.width, self.interface_y))
    }

    /// Region of the transmitting medium.
    pub fn lower(&self) -> Rect<f64> {
        Rect::new(
            (0.0, self.interface_y),
            (self.viewport.width, self.viewport.height),
        )
    }

    /// Endpoints of the incident ray for `angle`, from its far end to the origin.
    pub fn incident_segment(&self, angle: f64) -> (Point2<f64>, Point2<f64>) {
        let dir = direction_from_angle(angle, Quadrant::UpLeft);
        let len = clip_to_rect(&self.origin, &dir, &self.upper(), self.margin);
        (self.origin + dir * len, self.origin)
    }

    /// Projects a solution into rays.
    ///
    /// The incident ray always comes first, followed by the drawable reflected
    /// and refracted branches in longitudinal, shear order. Branches with no
    /// propagating wave produce no ray.
    pub fn project(&self, solution: &Solution) -> Vec<Ray> {
        let incident = solution.incident;
        let (start, end) = self.incident_segment(incident.angle);
        let mut rays = vec![Ray {
            kind: RayKind::Incident,
            mode: incident.mode,
            angle: incident.angle,
            start,
            end,
            arc: arc_parameters(screen_angle(&(start - end)), Half::Upper),
            arc_radius: 52.0,
        }];

        for mode in [WaveMode::Longitudinal, WaveMode::Shear] {
            let radius = match mode {
                WaveMode::Longitudinal => 58.0,
                WaveMode::Shear => 78.0,
            };
            rays.extend(self.outgoing(
                RayKind::Reflected(mode),
                solution.result.reflected(mode),
                radius,
            ));
        }
        for mode in [WaveMode::Longitudinal, WaveMode::Shear] {
            let radius = match mode {
                WaveMode::Longitudinal => 78.0,
                WaveMode::Shear => 104.0,
            };
            rays.extend(self.outgoing(
                RayKind::Refracted(mode),
                solution.result.refracted(mode),
                radius,
            ));
        }
        rays
    }

    fn outgoing(&self, kind: RayKind, branch: &Branch, arc_radius: f64) -> Option<Ray> {
        if !branch.is_drawable() {
            return None;
        }
        let angle = branch.angle?;
        let (mode, quadrant, rect, half) = match kind {
            RayKind::Reflected(mode) => (mode, Quadrant::UpRight, self.upper(), Half::Upper),
            RayKind::Refracted(mode) => (mode, Quadrant::DownRight, self.lower(), Half::Lower),
            RayKind::Incident => return None,
        };
        let dir = direction_from_angle(angle, quadrant);
        let len = clip_to_rect(&self.origin, &dir, &rect, self.margin);
        if len <= 0.0 {
            return None;
        }
        Some(Ray {
            kind,
            mode,
            angle,
            start: self.origin,
            end: self.origin + dir * len,
            arc: arc_parameters(screen_angle(&dir), half),
            arc_radius,
        })
    }
}
