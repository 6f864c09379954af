//! Two dimensional ray geometry for drawing and dragging interface rays.
//!
//! All coordinates live in the rendering surface's local space: x grows to
//! the right and y grows downward, so the upper medium has smaller y than the
//! interface. Angles handed to this module are acute angles measured from the
//! interface normal, in degrees, exactly as the solver produces them.
//!
//! The geometry layer provides:
//! - Direction vectors for each ray quadrant around the interface point
//! - Clipping of a ray to a viewport rectangle with an inner margin
//! - Point to segment distance for hit-testing the incident ray
//! - Inversion of a pointer position into an incidence angle
//! - Arc parameters for annotating the angle between a ray and the normal
//!
//! Nothing here fails. Degenerate input collapses to a zero length or to no
//! angle, which callers treat as nothing to draw.

use std::f64::consts::PI;

use geo_types::Rect;
use nalgebra::{Point2, Vector2};

#[cfg(test)]
mod tests {

    use super::*;

    fn rect(w: f64, h: f64) -> Rect<f64> {
        Rect::new((0.0, 0.0), (w, h))
    }

    #[test]
    fn quadrant_directions() {
        let up_left = direction_from_angle(30.0, Quadrant::UpLeft);
        assert!((up_left.x + 0.5).abs() < 1e-12);
        assert!((up_left.y + 3f64.sqrt() / 2.0).abs() < 1e-12);

        let up_right = direction_from_angle(30.0, Quadrant::UpRight);
        assert!(up_right.x > 0.0 && up_right.y < 0.0);

        let down_right = direction_from_angle(30.0, Quadrant::DownRight);
        assert!(down_right.x > 0.0 && down_right.y > 0.0);

        let down_left = direction_from_angle(30.0, Quadrant::DownLeft);
        assert!(down_left.x < 0.0 && down_left.y > 0.0);

        assert!((direction_from_angle(57.0, Quadrant::UpLeft).norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clip_straight_up() {
        let origin = Point2::new(450.0, 350.0);
        let dir = direction_from_angle(0.0, Quadrant::UpLeft);
        let len = clip_to_rect(&origin, &dir, &rect(900.0, 350.0), 22.0);
        assert!((len - 328.0).abs() < 1e-9, "len: {}", len);
    }

    #[test]
    fn clip_hits_side_first() {
        let origin = Point2::new(100.0, 350.0);
        let dir = direction_from_angle(80.0, Quadrant::UpLeft);
        let len = clip_to_rect(&origin, &dir, &rect(900.0, 350.0), 22.0);
        let end = origin + dir * len;
        assert!((end.x - 22.0).abs() < 1e-9, "end: {}", end);
        assert!(end.y > 22.0);
    }

    #[test]
    fn clip_degenerate() {
        let origin = Point2::new(100.0, 100.0);
        let zero = Vector2::new(0.0, 0.0);
        assert_eq!(clip_to_rect(&origin, &zero, &rect(200.0, 200.0), 10.0), 0.0);

        // origin already outside the shrunk rectangle
        let outside = Point2::new(5.0, 100.0);
        let right = Vector2::new(-1.0, 0.0);
        assert_eq!(clip_to_rect(&outside, &right, &rect(200.0, 200.0), 10.0), 0.0);

        let nan = Vector2::new(f64::NAN, f64::NAN);
        assert_eq!(clip_to_rect(&origin, &nan, &rect(200.0, 200.0), 10.0), 0.0);
    }

    #[test]
    fn segment_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_eq!(distance_point_to_segment(&Point2::new(5.0, 3.0), &a, &b), 3.0);
        assert_eq!(distance_point_to_segment(&Point2::new(-3.0, 4.0), &a, &b), 5.0);
        assert_eq!(distance_point_to_segment(&Point2::new(13.0, 4.0), &a, &b), 5.0);
        assert_eq!(distance_point_to_segment(&Point2::new(3.0, 4.0), &a, &a), 5.0);
    }

    #[test]
    fn pointer_below_interface_is_rejected() {
        let origin = Point2::new(450.0, 350.0);
        assert_eq!(angle_from_pointer(&Point2::new(300.0, 400.0), &origin), None);
        assert_eq!(angle_from_pointer(&Point2::new(300.0, 350.0), &origin), None);
        assert_eq!(angle_from_pointer(&Point2::new(300.0, 349.0), &origin), None);
        assert!(angle_from_pointer(&Point2::new(300.0, 348.9), &origin).is_some());
        assert_eq!(angle_from_pointer(&Point2::new(f64::NAN, 300.0), &origin), None);
    }

    #[test]
    fn pointer_side_does_not_matter() {
        let origin = Point2::new(450.0, 350.0);
        let left = angle_from_pointer(&Point2::new(350.0, 250.0), &origin).unwrap();
        let right = angle_from_pointer(&Point2::new(550.0, 250.0), &origin).unwrap();
        assert!((left - 45.0).abs() < 1e-9);
        assert_eq!(left, right);
        let vertical = angle_from_pointer(&Point2::new(450.0, 100.0), &origin).unwrap();
        assert_eq!(vertical, 0.0);
    }

    #[test]
    fn arc_is_acute() {
        // reflected ray at 30 degrees in the upper half
        let dir = direction_from_angle(30.0, Quadrant::UpRight);
        let arc = arc_parameters(screen_angle(&dir), Half::Upper);
        assert_eq!(arc.side, Side::Right);
        assert!(!arc.anticlockwise);
        assert!((arc.span().to_degrees() - 30.0).abs() < 1e-9);
        assert!((arc.start + PI / 2.0).abs() < 1e-12);

        // incident ray at 40 degrees up and to the left
        let dir = direction_from_angle(40.0, Quadrant::UpLeft);
        let arc = arc_parameters(screen_angle(&dir), Half::Upper);
        assert_eq!(arc.side, Side::Left);
        assert!(arc.anticlockwise);
        assert!((arc.span().to_degrees() - 40.0).abs() < 1e-9);

        // refracted ray at 70 degrees down and to the right
        let dir = direction_from_angle(70.0, Quadrant::DownRight);
        let arc = arc_parameters(screen_angle(&dir), Half::Lower);
        assert_eq!(arc.side, Side::Right);
        assert!((arc.span().to_degrees() - 70.0).abs() < 1e-9);
        assert!((arc.end - screen_angle(&dir)).abs() < 1e-9);
    }

    #[test]
    fn arc_never_reflex() {
        // a ray pointing almost straight down measured against the upward normal
        let arc = arc_parameters(PI / 2.0 - 0.1, Half::Upper);
        assert!(arc.span() <= PI / 2.0 + 1e-12);
        assert!((arc.span() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn arc_of_non_finite_angle() {
        for angle in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let arc = arc_parameters(angle, Half::Upper);
            assert_eq!(arc.span(), 0.0);
            assert!((arc.start + PI / 2.0).abs() < 1e-12);
        }
        let arc = arc_parameters(f64::NAN, Half::Lower);
        assert_eq!(arc.span(), 0.0);
    }

    #[test]
    fn arc_of_huge_angle() {
        for half in [Half::Upper, Half::Lower] {
            let arc = arc_parameters(1e20, half);
            assert!(arc.span().is_finite());
            assert!(arc.span() <= PI / 2.0 + 1e-12);
        }
    }

    #[test]
    fn clip_non_finite_inputs() {
        let dir = Vector2::new(0.6, 0.8);
        let nan_origin = Point2::new(f64::NAN, 50.0);
        assert_eq!(clip_to_rect(&nan_origin, &dir, &rect(100.0, 100.0), 10.0), 0.0);

        let origin = Point2::new(50.0, 50.0);
        assert_eq!(clip_to_rect(&origin, &dir, &rect(100.0, 100.0), f64::NAN), 0.0);
        assert_eq!(clip_to_rect(&origin, &dir, &rect(f64::INFINITY, 100.0), 10.0), 0.0);
    }
}

/// Clip margin in pixels kept between a ray end and the viewport edge.
pub const DEFAULT_MARGIN: f64 = 22.0;
/// Pointer must be at least this far above the interface to set an angle.
pub const POINTER_DEAD_ZONE: f64 = 1.0;

const DIRECTION_EPSILON: f64 = 1e-9;

/// Direction convention for a ray leaving or arriving at the interface point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Incident rays, drawn up and to the left of the normal.
    UpLeft,
    /// Reflected rays.
    UpRight,
    /// Refracted rays.
    DownRight,
    DownLeft,
}

/// Which half-plane an angle annotation lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Upper,
    Lower,
}

/// Side of the normal an arc sweeps toward, as seen on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Unit vector for an acute angle from the normal in the given quadrant.
pub fn direction_from_angle(angle: f64, quadrant: Quadrant) -> Vector2<f64> {
    let (s, c) = angle.to_radians().sin_cos();
    match quadrant {
        Quadrant::UpLeft => Vector2::new(-s, -c),
        Quadrant::UpRight => Vector2::new(s, -c),
        Quadrant::DownRight => Vector2::new(s, c),
        Quadrant::DownLeft => Vector2::new(-s, c),
    }
}

/// Canvas angle of a direction vector, measured clockwise from +x.
pub fn screen_angle(direction: &Vector2<f64>) -> f64 {
    direction.y.atan2(direction.x)
}

/// Computes the longest ray that stays inside a rectangle shrunk by `margin`.
///
/// **Context**: Every drawn ray starts at the interface point and should run
/// as far as possible toward the edge of its half of the viewport without
/// letting its arrow head or label leave the canvas.
///
/// **How it Works**: Intersects the ray with each of the four shrunk
/// boundaries it moves toward and keeps the smallest parameter. Components
/// smaller than a tiny epsilon are treated as parallel to that boundary.
/// A ray with no finite intersection, or whose nearest boundary lies behind
/// the origin, gets length zero.
pub fn clip_to_rect(
    origin: &Point2<f64>,
    direction: &Vector2<f64>,
    rect: &Rect<f64>,
    margin: f64,
) -> f64 {
    let (min, max) = (rect.min(), rect.max());
    let inputs = [origin.x, origin.y, min.x, min.y, max.x, max.y, margin];
    if inputs.iter().any(|v| !v.is_finite()) {
        return 0.0;
    }
    let mut t_max = f64::INFINITY;

    if direction.y > DIRECTION_EPSILON {
        t_max = t_max.min((max.y - margin - origin.y) / direction.y);
    }
    if direction.y < -DIRECTION_EPSILON {
        t_max = t_max.min((min.y + margin - origin.y) / direction.y);
    }
    if direction.x > DIRECTION_EPSILON {
        t_max = t_max.min((max.x - margin - origin.x) / direction.x);
    }
    if direction.x < -DIRECTION_EPSILON {
        t_max = t_max.min((min.x + margin - origin.x) / direction.x);
    }

    if !t_max.is_finite() || t_max < 0.0 {
        return 0.0;
    }
    t_max
}

/// Euclidean distance from `point` to the segment `start`..`end`.
pub fn distance_point_to_segment(
    point: &Point2<f64>,
    start: &Point2<f64>,
    end: &Point2<f64>,
) -> f64 {
    let v = end - start;
    let w = point - start;
    let len_sq = v.norm_squared();
    if len_sq == 0.0 {
        return w.norm();
    }
    let t = (w.dot(&v) / len_sq).clamp(0.0, 1.0);
    (point - (start + v * t)).norm()
}

/// Inverts a pointer position into an incidence angle in degrees.
///
/// Returns `None` unless the pointer is strictly more than one pixel above
/// the interface point; positions at or below it are ambiguous. The pointer
/// may be on either side of the normal.
pub fn angle_from_pointer(pointer: &Point2<f64>, origin: &Point2<f64>) -> Option<f64> {
    let d = pointer - origin;
    if !(d.y < -POINTER_DEAD_ZONE) {
        return None;
    }
    let theta = d.x.abs().atan2(-d.y).to_degrees();
    theta.is_finite().then(|| theta.clamp(0.0, 90.0))
}

/// Canvas arc between a ray and the normal, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    /// Angle of the normal the arc starts from.
    pub start: f64,
    /// Angle the arc ends at, on the ray.
    pub end: f64,
    pub side: Side,
    /// Sweep direction in canvas terms, for `arc(.., anticlockwise)` style APIs.
    pub anticlockwise: bool,
}

impl Arc {
    pub fn span(&self) -> f64 {
        (self.end - self.start).abs()
    }

    pub fn mid(&self) -> f64 {
        0.5 * (self.start + self.end)
    }

    /// Point on the arc bisector at `radius` from `center`, for labels.
    pub fn label_anchor(&self, center: &Point2<f64>, radius: f64) -> Point2<f64> {
        let (s, c) = self.mid().sin_cos();
        center + Vector2::new(c, s) * radius
    }

    /// Samples `n + 1` points along the arc, for renderers without an arc primitive.
    pub fn points(&self, center: &Point2<f64>, radius: f64, n: usize) -> Vec<Point2<f64>> {
        let n = n.max(1);
        (0..=n)
            .map(|i| {
                let t = self.start + (self.end - self.start) * i as f64 / n as f64;
                center + Vector2::new(t.cos(), t.sin()) * radius
            })
            .collect()
    }
}

/// Computes the acute arc between a ray at canvas angle `ray_angle` and the
/// normal of the given half-plane.
pub fn arc_parameters(ray_angle: f64, half: Half) -> Arc {
    let base = match half {
        Half::Upper => -PI / 2.0,
        Half::Lower => PI / 2.0,
    };

    if !ray_angle.is_finite() {
        return Arc {
            start: base,
            end: base,
            side: Side::Right,
            anticlockwise: false,
        };
    }

    // wrap into (-PI, PI]
    let mut d = (ray_angle - base + PI).rem_euclid(2.0 * PI) - PI;
    if d <= -PI {
        d += 2.0 * PI;
    }
    let acute = d.abs().min(PI - d.abs());

    let clockwise = d >= 0.0;
    let end = if clockwise { base + acute } else { base - acute };
    // clockwise from up is toward +x, clockwise from down is toward -x
    let side = match (half, clockwise) {
        (Half::Upper, true) | (Half::Lower, false) => Side::Right,
        _ => Side::Left,
    };

    Arc {
        start: base,
        end,
        side,
        anticlockwise: !clockwise,
    }
}
