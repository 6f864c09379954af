//! Drawing helpers for the interactive interface viewer.
//!
//! Converts the scene's rays and arcs into macroquad draw calls. Everything
//! here is cosmetic; the geometry itself comes from `scene` and `ray`.

use macroquad::prelude::*;
use nalgebra::Point2;

use crate::media::WaveMode;
use crate::output::format_angle;
use crate::scene::{Ray, RayKind, Scene};
use crate::session::Session;

const MEDIUM_1: Color = Color::new(0.86, 0.92, 0.98, 1.0);
const MEDIUM_2: Color = Color::new(0.93, 0.91, 0.86, 1.0);
const INTERFACE: Color = Color::new(0.11, 0.17, 0.42, 1.0);
const NORMAL: Color = Color::new(0.45, 0.45, 0.5, 1.0);
const ARROW_HEAD: f32 = 22.0;
const DASH: f32 = 10.0;

fn to_vec2(p: &Point2<f64>) -> Vec2 {
    vec2(p.x as f32, p.y as f32)
}

/// Colour of a ray by what it is and which mode it carries.
pub fn ray_color(kind: RayKind, mode: WaveMode) -> Color {
    match (kind, mode) {
        (RayKind::Incident, WaveMode::Longitudinal) => Color::new(0.80, 0.10, 0.10, 1.0),
        (RayKind::Incident, WaveMode::Shear) => Color::new(0.55, 0.10, 0.65, 1.0),
        (RayKind::Reflected(_), WaveMode::Longitudinal) => Color::new(0.95, 0.50, 0.05, 1.0),
        (RayKind::Reflected(_), WaveMode::Shear) => Color::new(0.10, 0.60, 0.55, 1.0),
        (RayKind::Refracted(_), WaveMode::Longitudinal) => Color::new(0.10, 0.35, 0.85, 1.0),
        (RayKind::Refracted(_), WaveMode::Shear) => Color::new(0.15, 0.60, 0.15, 1.0),
    }
}

/// Short label such as `gammaL` for the angle annotation of a ray.
pub fn angle_token(kind: RayKind, mode: WaveMode) -> String {
    let symbol = match kind {
        RayKind::Incident => "alpha",
        RayKind::Reflected(_) => "gamma",
        RayKind::Refracted(_) => "beta",
    };
    format!("{}{}", symbol, mode)
}

/// Draws a thick line with a faint halo and an arrow head at `to`.
pub fn draw_arrow(from: Vec2, to: Vec2, color: Color, width: f32) {
    let dir = to - from;
    let len = dir.length();
    if len <= f32::EPSILON {
        return;
    }
    let unit = dir / len;
    let base = to - unit * ARROW_HEAD.min(len);

    let mut halo = color;
    halo.a = 0.1;
    draw_line(from.x, from.y, base.x, base.y, width + 3.0, halo);
    draw_line(from.x, from.y, base.x, base.y, width, color);

    let side = vec2(-unit.y, unit.x) * ARROW_HEAD * 0.45;
    draw_triangle(to, base + side, base - side, color);
}

/// Draws white dashes along a segment, shifted by `offset` to animate them.
pub fn draw_marching(from: Vec2, to: Vec2, offset: f32) {
    let dir = to - from;
    let len = dir.length() - 20.0;
    if len <= 0.0 {
        return;
    }
    let unit = dir.normalize();
    let mut t = -(offset % (2.0 * DASH));
    while t < len {
        let a = t.max(0.0);
        let b = (t + DASH).min(len);
        if b > a {
            let p = from + unit * a;
            let q = from + unit * b;
            draw_line(p.x, p.y, q.x, q.y, 3.0, Color::new(1.0, 1.0, 1.0, 0.9));
        }
        t += 2.0 * DASH;
    }
}

fn draw_angle_arc(scene: &Scene, ray: &Ray, color: Color) {
    let origin = scene.origin();
    let points = ray.arc.points(&origin, ray.arc_radius, 24);
    for pair in points.windows(2) {
        let (p, q) = (to_vec2(&pair[0]), to_vec2(&pair[1]));
        draw_line(p.x, p.y, q.x, q.y, 2.5, color);
    }
    let anchor = to_vec2(&ray.arc.label_anchor(&origin, ray.arc_radius + 14.0));
    let label = format!(
        "{} {}",
        angle_token(ray.kind, ray.mode),
        format_angle(Some(ray.angle))
    );
    draw_text(&label, anchor.x - 8.0, anchor.y + 5.0, 18.0, color);
}

/// Draws the whole diagram for the session's current solution.
pub fn draw_scene(session: &Session, dash_offset: f32) {
    let scene = session.scene();
    let viewport = scene.viewport();
    let (w, h) = (viewport.width as f32, viewport.height as f32);
    let y = scene.interface_y() as f32;
    let origin = to_vec2(&scene.origin());

    draw_rectangle(0.0, 0.0, w, y, MEDIUM_1);
    draw_rectangle(0.0, y, w, h - y, MEDIUM_2);
    draw_line(0.0, y, w, y, 2.0, INTERFACE);

    let mut t = origin.y - 320.0;
    while t < origin.y + 320.0 {
        draw_line(origin.x, t, origin.x, (t + 8.0).min(origin.y + 320.0), 2.0, NORMAL);
        t += 15.0;
    }

    for ray in session.frame() {
        let color = ray_color(ray.kind, ray.mode);
        let (from, to) = (to_vec2(&ray.start), to_vec2(&ray.end));
        draw_arrow(from, to, color, 5.0);
        draw_marching(from, to, dash_offset);
        draw_angle_arc(scene, &ray, color);
    }

    let (m1, m2) = session.media_names();
    draw_text(m1, 12.0, 24.0, 22.0, INTERFACE);
    draw_text(m2, 12.0, y + 28.0, 22.0, INTERFACE);

    if session.is_hovering() || session.is_dragging() {
        let (start, _) = session.incident_segment();
        let tip = to_vec2(&start);
        draw_text("drag to change the incidence angle", tip.x + 12.0, tip.y + 52.0, 16.0, DARKGRAY);
    }

    let c = &session.solution().critical;
    let summary = format!(
        "alpha1 {}   alpha2 {}   alpha3 {}",
        format_angle(c.alpha1.angle),
        format_angle(c.alpha2.angle),
        format_angle(c.alpha3.angle)
    );
    draw_text(&summary, 12.0, h - 14.0, 18.0, INTERFACE);
}
