use chute_config::load_toml;
use rstest::rstest;

const FULL: &str = r#"
[pid]
kp = 5.0
ki = 1.0
kd = 0.5

[trigger]
fire_threshold = 85.0
reset_threshold = 80.0
min_sustained_s = 2.0

[trend]
persistence_s = 3.0

[vehicle]
mass_kg = 5.0
gravity_mps2 = 9.81
air_density_kgpm3 = 1.225
drag_coefficient = 0.8
reference_area_m2 = 0.5

[scenario]
name = "Cenario 1: Queda LOC-I"
kind = "loc_fall"
"#;

#[test]
fn accepts_full_reference_config() {
    let cfg = load_toml(FULL).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.scenario.kind, chute_config::ScenarioKind::LocFall);
    assert_eq!(cfg.trigger.fire_threshold, 85.0);
}

#[test]
fn empty_config_uses_defaults() {
    let cfg = load_toml("").expect("parse empty TOML");
    cfg.validate().expect("defaults are valid");
    assert_eq!(cfg.pid.kp, 5.0);
    assert_eq!(cfg.trigger.reset_threshold, 80.0);
    assert_eq!(cfg.trend.persistence_s, 3.0);
    assert!(cfg.vehicle.terminal_velocity_mps() < -14.0);
}

#[test]
fn min_duration_alias_is_accepted() {
    let cfg = load_toml("[trigger]\nmin_duration_s = 3.0\n").expect("parse TOML");
    assert_eq!(cfg.trigger.min_sustained_s, 3.0);
}

#[rstest]
#[case("[trigger]\nfire_threshold = 80.0\nreset_threshold = 80.0\n", "reset_threshold must be <")]
#[case("[trigger]\nfire_threshold = 120.0\n", "fire_threshold must be in [0, 100]")]
#[case("[trigger]\nmin_sustained_s = -1.0\n", "min_sustained_s must be finite")]
#[case("[pid]\nkp = -1.0\n", "pid.kp must be >= 0")]
#[case("[trend]\npersistence_s = -0.5\n", "persistence_s must be finite")]
#[case("[vehicle]\nmass_kg = 0.0\n", "mass_kg must be > 0")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` does not mention `{needle}`"
    );
}

#[test]
fn unknown_scenario_kind_is_a_parse_error() {
    assert!(load_toml("[scenario]\nkind = \"pouso\"\n").is_err());
}
