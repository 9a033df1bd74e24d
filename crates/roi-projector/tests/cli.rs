use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const IDENTITY_RECORD: &str = r#"{
  "extrinsic_matrix": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]],
  "camera1_matrix": [[1000, 0, 500], [0, 1000, 500], [0, 0, 1]],
  "camera2_matrix": [[1000, 0, 500], [0, 1000, 500], [0, 0, 1]]
}"#;

fn bin() -> Command {
    Command::cargo_bin("roi-projector").unwrap()
}

fn calibration_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("calib.json"), IDENTITY_RECORD).unwrap();
    dir
}

fn stdout_json(out: &[u8]) -> Value {
    serde_json::from_slice(out).unwrap()
}

fn calib(dir: &TempDir) -> PathBuf {
    dir.path().join("calib.json")
}

#[test]
fn corners_default_region_projects_onto_itself() {
    let dir = calibration_dir();
    let out = bin()
        .arg("corners")
        .arg(calib(&dir))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = stdout_json(&out);
    assert_eq!(json["ok"], true);
    assert_eq!(json["message"], "ok");
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 4);
    let first = points[0].as_array().unwrap();
    assert!((first[0].as_f64().unwrap() - 100.0).abs() < 1e-9);
    assert!((first[1].as_f64().unwrap() - 200.0).abs() < 1e-9);
}

#[test]
fn corners_with_zero_depth_fails_with_index() {
    let dir = calibration_dir();
    bin()
        .arg("corners")
        .arg(calib(&dir))
        .args(["100", "200", "1000", "400", "200", "1000"])
        .args(["400", "350", "0", "100", "350", "1000"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"ok\": false"))
        .stderr(predicate::str::contains("error: invalid depth at corner 2"));
}

#[test]
fn corners_rejects_wrong_value_count() {
    let dir = calibration_dir();
    bin()
        .arg("corners")
        .arg(calib(&dir))
        .args(["1", "2", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 12 values"));
}

#[test]
fn rect_with_negative_depth_is_invalid() {
    let dir = calibration_dir();
    bin()
        .arg("rect")
        .arg(calib(&dir))
        .args(["--x", "10", "--y", "10", "--w", "50", "--h", "40", "--depth", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid depth"));
}

#[test]
fn rect_prints_bounding_box_and_planar_variant() {
    let dir = calibration_dir();
    let out = bin()
        .arg("rect")
        .arg(calib(&dir))
        .args(["--x", "10", "--y", "20", "--w", "50", "--h", "40", "--depth", "800"])
        .arg("--planar")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = stdout_json(&out);
    for key in ["rect", "planar_rect"] {
        assert_eq!(json[key]["ok"], true);
        let w = json[key]["rect"]["w"].as_f64().unwrap();
        assert!((w - 50.0).abs() < 1e-6, "{key}: w = {w}");
    }
}

#[test]
fn missing_calibration_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .arg("corners")
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: calibration"));
}

#[test]
fn calibration_without_extrinsic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calib.json");
    fs::write(&path, IDENTITY_RECORD.replace("extrinsic_matrix", "pose")).unwrap();
    bin()
        .arg("corners")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("extrinsic_matrix"));
}

#[test]
fn overlap_reports_containment_ratio() {
    let out = bin()
        .args(["overlap", "--roi", "0,0,10,0,10,10,0,10"])
        .args(["--target", "5,0,15,0,15,10,5,10"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = stdout_json(&out);
    assert!((json["ratio"].as_f64().unwrap() - 0.5).abs() < 1e-12);
    assert_eq!(json["overlapping"], false);

    bin()
        .args(["overlap", "--roi", "0,0,10,0,10,10,0,10"])
        .args(["--target", "5,0,15,0,15,10,5,10", "--threshold", "0.4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"overlapping\": true"));
}

#[test]
fn overlap_needs_eight_values() {
    bin()
        .args(["overlap", "--roi", "0,0,10,0", "--target", "0,0,1,0,1,1,0,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--roi needs 8"));
}

#[test]
fn job_writes_report_next_to_job_file() {
    let dir = calibration_dir();
    let job = serde_json::json!({
        "calibration_path": "calib.json",
        "rect": { "x": 0.0, "y": 0.0, "w": 20.0, "h": 10.0 },
        "depth": 1200.0,
        "roi_quad": [[0, 0], [10, 0], [10, 10], [0, 10]],
        "target_quad": [[1, 1], [9, 1], [9, 9], [1, 9]],
        "params": { "overlap_threshold": 0.9 },
        "output_path": "report.json"
    });
    let job_path = dir.path().join("job.json");
    fs::write(&job_path, serde_json::to_string_pretty(&job).unwrap()).unwrap();

    bin()
        .arg("job")
        .arg(&job_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("report.json"));

    let report: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["rect"]["ok"], true);
    assert_eq!(report["overlap"]["threshold"], 0.9);
    assert_eq!(report["overlap"]["overlapping"], true);
    assert!(report.get("corners").is_none());
}

#[test]
fn verbose_flag_installs_stderr_logger() {
    let dir = calibration_dir();
    bin()
        .arg("-vv")
        .arg("corners")
        .arg(calib(&dir))
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG calibration]"));
}
