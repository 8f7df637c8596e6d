use soc_config::{CurrentSign, StartSoc, load_toml};

#[test]
fn empty_document_uses_defaults() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults should pass");
    assert_eq!(cfg.pack.capacity_ah, 27.0);
    assert_eq!(cfg.pack.series_cells, 96);
    assert_eq!(cfg.pack.current_sign, CurrentSign::AsMeasured);
    assert_eq!(cfg.fusion.ml_weight, 0.35);
    assert_eq!(cfg.predictor.fraction_scale_threshold, 2.0);
    assert_eq!(cfg.predictor.degenerate_range_eps, 1e-9);
    assert_eq!(cfg.physics.start_soc, StartSoc::FirstNeural);
    assert_eq!(cfg.physics.fixed_start_soc, 100.0);
    assert!(cfg.model.params.is_none());
}

#[test]
fn full_document_round_trips_fields() {
    let toml = r#"
[pack]
capacity_ah = 50.0
series_cells = 108
current_sign = "discharge_positive"

[fusion]
ml_weight = 0.5

[predictor]
fraction_scale_threshold = 1.5
degenerate_range_eps = 1e-6

[physics]
start_soc = "fixed"
fixed_start_soc = 80.0

[model]
params = "etc/model_params.json"

[logging]
level = "debug"
rotation = "daily"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.pack.series_cells, 108);
    assert_eq!(cfg.pack.current_sign, CurrentSign::DischargePositive);
    assert_eq!(cfg.physics.start_soc, StartSoc::Fixed);
    assert_eq!(
        cfg.model.params.as_deref(),
        Some(std::path::Path::new("etc/model_params.json"))
    );
}

#[test]
fn rejects_zero_series_cells() {
    let cfg = load_toml("[pack]\nseries_cells = 0\n").expect("parse TOML");
    let err = cfg.validate().expect_err("should reject series_cells=0");
    assert!(
        format!("{err}")
            .to_lowercase()
            .contains("series_cells must be >= 1")
    );
}

#[test]
fn rejects_blend_weight_above_one() {
    let cfg = load_toml("[fusion]\nml_weight = 1.2\n").expect("parse TOML");
    let err = cfg.validate().expect_err("should reject ml_weight > 1");
    assert!(format!("{err}").contains("fusion.ml_weight"));
}

#[test]
fn rejects_non_positive_capacity() {
    let cfg = load_toml("[pack]\ncapacity_ah = 0.0\n").expect("parse TOML");
    let err = cfg.validate().expect_err("should reject capacity 0");
    assert!(format!("{err}").contains("pack.capacity_ah"));
}

#[test]
fn rejects_out_of_range_fixed_start() {
    let cfg = load_toml("[physics]\nfixed_start_soc = 120.0\n").expect("parse TOML");
    let err = cfg.validate().expect_err("should reject start > 100");
    assert!(format!("{err}").contains("fixed_start_soc"));
}

#[test]
fn rejects_unknown_rotation() {
    let cfg = load_toml("[logging]\nrotation = \"weekly\"\n").expect("parse TOML");
    let err = cfg.validate().expect_err("should reject weekly rotation");
    assert!(format!("{err}").contains("logging.rotation"));
}

#[test]
fn unknown_current_sign_fails_to_parse() {
    assert!(load_toml("[pack]\ncurrent_sign = \"sideways\"\n").is_err());
}
