use std::fs::File;
use std::io::Write;

use soc_config::{load_drive_cycle, load_drive_cycle_csv, load_model_params};
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
fn csv_with_time_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cycle.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "current,voltage,temperature,time").unwrap();
    writeln!(f, "-10.0,350.0,25.0,0").unwrap();
    writeln!(f, "-10.5,349.0,25.1,2").unwrap();
    writeln!(f, "-11.0,348.0,25.2,4").unwrap();

    let rec = load_drive_cycle_csv(&path).unwrap();
    assert_eq!(rec.current, vec![-10.0, -10.5, -11.0]);
    assert_eq!(rec.voltage, vec![350.0, 349.0, 348.0]);
    assert_eq!(rec.temperature, vec![25.0, 25.1, 25.2]);
    assert_eq!(rec.time, Some(vec![0.0, 2.0, 4.0]));
}

#[rstest]
fn csv_without_time_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cycle.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "current,voltage,temperature").unwrap();
    writeln!(f, "1.0,350.0,25.0").unwrap();
    writeln!(f, "2.0,350.0,25.0").unwrap();

    let rec = load_drive_cycle(&path).unwrap();
    assert_eq!(rec.current.len(), 2);
    assert!(rec.time.is_none());
}

#[rstest]
fn csv_rejects_wrong_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cycle.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "amps,volts,celsius").unwrap();
    writeln!(f, "1.0,350.0,25.0").unwrap();

    let err = load_drive_cycle_csv(&path).expect_err("should reject headers");
    assert!(
        format!("{err}")
            .to_lowercase()
            .contains("drive cycle csv must have headers")
    );
}

#[rstest]
fn csv_reports_bad_row_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cycle.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "current,voltage,temperature").unwrap();
    writeln!(f, "1.0,350.0,25.0").unwrap();
    writeln!(f, "abc,350.0,25.0").unwrap();

    let err = load_drive_cycle_csv(&path).expect_err("should reject non-numeric row");
    assert!(format!("{err}").contains("invalid CSV row 3"));
}

#[rstest]
fn json_request_shape_keeps_mismatched_lengths() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cycle.json");
    std::fs::write(
        &path,
        r#"{"current": [1, 2, 3, 4, 5], "voltage": [350, 350, 350, 350], "temperature": [25, 25, 25, 25, 25]}"#,
    )
    .unwrap();

    let rec = load_drive_cycle(&path).unwrap();
    assert_eq!(rec.current.len(), 5);
    assert_eq!(rec.voltage.len(), 4);
    assert!(rec.time.is_none());
}

#[rstest]
fn missing_model_params_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = load_model_params(&dir.path().join("nope.json")).expect_err("missing file");
    assert!(format!("{err}").contains("open model params"));
}
