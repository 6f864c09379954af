use std::path::PathBuf;

use snellwave::media::WaveMode;
use snellwave::output;
use snellwave::scene::RayKind;
use snellwave::session::Session;
use snellwave::settings::{self, SweepSettings};
use snellwave::solver::Classification;
use snellwave::sweep;

#[test]
fn default_config_session() {
    let settings = settings::load_default_config().unwrap();
    let session = Session::from_settings(&settings).unwrap();

    // acrylic onto steel, longitudinal incidence at 30 degrees
    let solution = session.solution();
    assert_eq!(solution.incident.mode, WaveMode::Longitudinal);
    assert_eq!(solution.result.reflected_longitudinal.angle, Some(30.0));
    assert_eq!(
        solution.result.reflected_shear.classification,
        Classification::Real
    );
    // sin(30) * 5900 / 2730 > 1
    assert_eq!(
        solution.result.refracted_longitudinal.classification,
        Classification::Evanescent
    );
    // sin(30) * 3230 / 2730 = 0.59
    assert_eq!(
        solution.result.refracted_shear.classification,
        Classification::Real
    );

    let kinds: Vec<_> = session.frame().iter().map(|ray| ray.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RayKind::Incident,
            RayKind::Reflected(WaveMode::Longitudinal),
            RayKind::Reflected(WaveMode::Shear),
            RayKind::Refracted(WaveMode::Shear),
        ]
    );
}

#[test]
fn custom_catalog() {
    let mut settings = settings::load_default_config().unwrap();
    settings.catalog = Some(PathBuf::from("config/media.toml"));
    settings.medium1 = "lead".to_string();
    settings.medium2 = "glycerin".to_string();
    settings.mode = WaveMode::Shear;
    assert!(settings::validate_config(&settings).is_ok());

    let session = Session::from_settings(&settings).unwrap();
    let result = &session.solution().result;
    assert_eq!(result.reflected_shear.angle, Some(30.0));
    assert_eq!(
        result.refracted_shear.classification,
        Classification::NotApplicable
    );
    // lead shear 700 into glycerin 1920: sin = 0.5 * 1920 / 700 > 1
    assert_eq!(
        result.refracted_longitudinal.classification,
        Classification::Evanescent
    );
}

#[test]
fn sweep_and_write() {
    let settings = settings::load_default_config().unwrap();
    let session = Session::from_settings(&settings).unwrap();
    let (m1, m2) = session.media();
    let range = SweepSettings {
        start: 0.0,
        end: 80.0,
        steps: 161,
    };
    let solutions = sweep::sweep(WaveMode::Longitudinal, &m1, &m2, &range);
    assert_eq!(solutions.len(), 161);

    let dir = std::env::temp_dir().join(format!("snellwave-it-{}", std::process::id()));
    let sweep_path = output::write_sweep(&solutions, &dir).unwrap();
    let json_path = output::write_json(session.solution(), &dir).unwrap();

    let table = std::fs::read_to_string(sweep_path).unwrap();
    assert_eq!(table.lines().count(), 162);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["incident"]["mode"], "L");
    assert_eq!(
        json["result"]["refracted_longitudinal"]["classification"],
        "evanescent"
    );
    assert!(json["critical"]["alpha3"]["angle"].is_null());

    std::fs::remove_dir_all(&dir).unwrap();
}
