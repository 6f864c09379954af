use macroquad::prelude::*;
use nalgebra::Point2;
use snellwave::helpers;
use snellwave::media::WaveMode;
use snellwave::scene::Viewport;
use snellwave::session::Session;
use snellwave::settings;

const ANGLE_STEP: f64 = 0.5;

fn pointer() -> Point2<f64> {
    let (x, y) = mouse_position();
    Point2::new(x as f64, y as f64)
}

#[macroquad::main("snellwave")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = match settings::load_config() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error loading configuration: {:#}", err);
            return;
        }
    };
    let mut session = match Session::from_settings(&settings) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Error starting session: {:#}", err);
            return;
        }
    };
    let names: Vec<String> = session.catalog().names().map(str::to_string).collect();

    let mut dash_offset = 0.0f32;
    loop {
        session.resize(Viewport::new(screen_width() as f64, screen_height() as f64));

        if is_mouse_button_pressed(MouseButton::Left) {
            session.pointer_down(&pointer());
        }
        if is_mouse_button_released(MouseButton::Left) {
            session.pointer_up();
        }
        session.pointer_move(&pointer());

        if is_key_pressed(KeyCode::M) {
            session.set_mode(session.mode().other());
        }
        if is_key_pressed(KeyCode::Up) {
            session.set_angle(session.angle() + ANGLE_STEP);
        }
        if is_key_pressed(KeyCode::Down) {
            session.set_angle(session.angle() - ANGLE_STEP);
        }
        if is_key_pressed(KeyCode::Key1) || is_key_pressed(KeyCode::Key2) {
            let (m1, m2) = session.media_names();
            let (m1, m2) = (m1.to_string(), m2.to_string());
            let upper = is_key_pressed(KeyCode::Key1);
            let current = if upper { &m1 } else { &m2 };
            let next = names
                .iter()
                .position(|name| name == current)
                .map_or(0, |i| (i + 1) % names.len());
            let result = if upper {
                session.set_media(&names[next], &m2)
            } else {
                session.set_media(&m1, &names[next])
            };
            if let Err(err) = result {
                tracing::warn!("{:#}", err);
            }
        }

        dash_offset = (dash_offset + 0.6) % 10000.0;
        clear_background(WHITE);
        helpers::draw_scene(&session, dash_offset);

        if session.mode() == WaveMode::Shear {
            draw_text("shear incidence (M to toggle)", 12.0, 48.0, 18.0, DARKGRAY);
        } else {
            draw_text("longitudinal incidence (M to toggle)", 12.0, 48.0, 18.0, DARKGRAY);
        }

        next_frame().await
    }
}
