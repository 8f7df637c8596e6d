use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Zero weights: the network always outputs the middle of [y_min, y_max],
// i.e. 0.5 as a fraction, reported as 50 %.
const FLAT_MODEL: &str = r#"{
  "IW": [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
  "LW": [0.0, 0.0],
  "b1": [0.0, 0.0],
  "b2": 0.0,
  "x_min": [-100.0, -20.0, 2.5],
  "x_max": [100.0, 60.0, 4.2],
  "y_min": 0.0,
  "y_max": 1.0
}"#;

fn write_model(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("model_params.json");
    fs::write(&path, body).unwrap();
    path
}

// One amp-hour pack so a few seconds of heavy load drain it
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[pack]
capacity_ah = 1.0
series_cells = 96

[fusion]
ml_weight = 0.35

[physics]
start_soc = "first_neural"
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn write_cycle_csv(dir: &tempfile::TempDir) -> PathBuf {
    let csv = "current,voltage,temperature,time\n\
               -3600,350,25,0\n\
               -3600,349,25,1\n\
               -3600,348,25,2\n";
    let path = dir.path().join("cycle.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn base_cmd(dir: &tempfile::TempDir) -> Command {
    let cfg = write_valid_config(dir);
    let model = write_model(dir, FLAT_MODEL);
    let mut cmd = Command::cargo_bin("soc_cli").unwrap();
    // Always include a valid config to avoid relying on default path
    cmd.arg("--config").arg(&cfg).arg("--params").arg(&model);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["predict", "--current=-12.5", "--voltage", "350", "--temperature", "25"], 0, "SOC: 50.00 %", "stdout")]
#[case(&["predict", "--current", "-12.5", "--voltage", "350"], 2, "required", "stderr")]
#[case(&["check"], 0, "Hidden units: 2", "stdout")]
#[case(&["check"], 0, "fraction, scaled to %", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let mut cmd = base_cmd(&dir);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => assert.stdout(predicate::str::contains(needle)),
        _ => assert.stderr(predicate::str::contains(needle)),
    };
}

#[test]
fn simulate_csv_reports_discharge() {
    let dir = tempdir().unwrap();
    let cycle = write_cycle_csv(&dir);
    base_cmd(&dir)
        .arg("simulate")
        .arg("--input")
        .arg(&cycle)
        .assert()
        .success()
        .stdout(predicate::str::contains("Points: 2"))
        .stdout(predicate::str::contains("Discharged at: 1.0 s"))
        .stdout(predicate::str::contains("Final SOC: 0.00 %"));
}

#[test]
fn simulate_rejects_bad_csv_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "amps,volts,temp\n1,2,3\n").unwrap();
    base_cmd(&dir)
        .arg("simulate")
        .arg("--input")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Expected 'current,voltage,temperature[,time]'",
        ));
}

#[test]
fn missing_params_file_is_startup_failure() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    Command::cargo_bin("soc_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--params")
        .arg(dir.path().join("nope.json"))
        .arg("check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("could not be opened"));
}

#[test]
fn malformed_bundle_is_startup_failure() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    // LW is one short of the hidden width
    let model = write_model(
        &dir,
        r#"{"IW": [[0,0,0],[0,0,0]], "LW": [0], "b1": [0,0], "b2": 0,
            "x_min": [0,0,0], "x_max": [1,1,1], "y_min": 0, "y_max": 1}"#,
    );
    Command::cargo_bin("soc_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--params")
        .arg(&model)
        .arg("check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("expected hidden width 2"));
}

#[rstest]
#[case("[pack]\ncapacity_ah = 0.0\n", "capacity_ah")]
#[case("[fusion]\nml_weight = 1.5\n", "ml_weight")]
#[case("[logging]\nrotation = \"weekly\"\n", "rotation")]
#[case("[pack\n", "invalid configuration")]
fn invalid_config_exits_2(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, toml).unwrap();
    let model = write_model(&dir, FLAT_MODEL);
    Command::cargo_bin("soc_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--params")
        .arg(&model)
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(needle));
}

#[test]
fn out_of_range_start_soc_is_config_failure() {
    let dir = tempdir().unwrap();
    let cycle = write_cycle_csv(&dir);
    base_cmd(&dir)
        .arg("simulate")
        .arg("--input")
        .arg(&cycle)
        .arg("--start-soc")
        .arg("150")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("start SOC must be in [0, 100]"));
}

#[test]
fn model_path_from_config_is_relative_to_config_dir() {
    let dir = tempdir().unwrap();
    write_model(&dir, FLAT_MODEL);
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, "[model]\nparams = \"model_params.json\"\n").unwrap();
    Command::cargo_bin("soc_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}
