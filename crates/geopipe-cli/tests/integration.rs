#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn geopipe(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("geopipe").unwrap();
    cmd.current_dir(dir.path()).env("GEOPIPE_ROOT", dir.path());
    cmd
}

const TRACK: &str = r#"{
  "type": "FeatureCollection",
  "name": "morning-run",
  "features": [
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
      "properties": { "time": "2024-05-01T10:00:00Z", "ele": 12.0 }
    }
  ]
}"#;

const SESSION: &str = r#"
data: track.geojson
steps:
  - add: move-north
  - add: move-east
  - add: { kind: scale, label: Double, payload: { factor: 2.0 } }
  - toggle: 2
  - group: { ids: [1, 2], name: Compound A }
  - add: centre-point
"#;

fn write_session(dir: &TempDir) {
    std::fs::write(dir.path().join("track.geojson"), TRACK).unwrap();
    std::fs::write(dir.path().join("session.yaml"), SESSION).unwrap();
}

// ---------------------------------------------------------------------------
// geopipe run
// ---------------------------------------------------------------------------

#[test]
fn run_prints_actions_and_outcomes() {
    let dir = TempDir::new().unwrap();
    write_session(&dir);

    geopipe(&dir)
        .args(["run", "session.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dataset: morning-run"))
        .stdout(predicate::str::contains("Compound A"))
        .stdout(predicate::str::contains("Moved north by 0.1"))
        .stdout(predicate::str::contains("Centre Point: [0.100, 0.000]"));
}

#[test]
fn run_json_reports_state_and_outcomes() {
    let dir = TempDir::new().unwrap();
    write_session(&dir);

    let output = geopipe(&dir)
        .args(["--json", "run", "session.yaml"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["dataset"], "morning-run");
    assert_eq!(value["actions"][0]["kind"], "composite");
    assert_eq!(value["actions"][0]["label"], "Compound A");
    assert_eq!(value["actions"][0]["items"][1]["active"], false);
    assert_eq!(value["outcomes"]["1"]["type"], "SimpleOutcome");
    assert!(value["outcomes"].get("2").is_none());
    assert_eq!(value["outcomes"]["3"]["type"], "SpatialOutcome");

    let coords = &value["state"]["features"][0]["geometry"]["coordinates"];
    assert_eq!(coords[0], 0.0);
    assert!((coords[1].as_f64().unwrap() - 0.1).abs() < 1e-9);
}

#[test]
fn run_writes_final_state_with_out() {
    let dir = TempDir::new().unwrap();
    write_session(&dir);

    geopipe(&dir)
        .args(["run", "session.yaml", "--out", "result/final.geojson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let written = std::fs::read_to_string(dir.path().join("result/final.geojson")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["name"], "morning-run");
}

#[test]
fn run_data_flag_overrides_script() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("other.geojson"), TRACK).unwrap();
    std::fs::write(dir.path().join("session.yaml"), "steps:\n  - add: move-west\n").unwrap();

    geopipe(&dir)
        .args(["run", "session.yaml", "--data", "other.geojson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved west by 0.1"));
}

#[test]
fn run_without_dataset_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("session.yaml"), "steps: []\n").unwrap();

    geopipe(&dir)
        .args(["run", "session.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no dataset"));
}

#[test]
fn run_reports_failing_step() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("track.geojson"), TRACK).unwrap();
    std::fs::write(
        dir.path().join("session.yaml"),
        "data: track.geojson\nsteps:\n  - add: move-north\n  - add: scale-up\n  - group: { ids: [1, 9], name: bad }\n",
    )
    .unwrap();

    geopipe(&dir)
        .args(["run", "session.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("script step 3"));
}

#[test]
fn run_rejects_invalid_geojson() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("track.geojson"), r#"{ "type": "Feature" }"#).unwrap();
    std::fs::write(dir.path().join("session.yaml"), "data: track.geojson\n").unwrap();

    geopipe(&dir)
        .args(["run", "session.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse GeoJSON"));
}

// ---------------------------------------------------------------------------
// geopipe presets / kinds
// ---------------------------------------------------------------------------

#[test]
fn presets_lists_toolbar_actions() {
    let dir = TempDir::new().unwrap();
    geopipe(&dir)
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("move-north"))
        .stdout(predicate::str::contains("Elevation Plot"));
}

#[test]
fn presets_follow_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("geopipe.yaml"),
        "presets:\n  scale_up_factor: 3.5\n",
    )
    .unwrap();

    let output = geopipe(&dir).args(["presets", "--json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let scale_up = value
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "scale-up")
        .unwrap();
    assert_eq!(scale_up["action"]["payload"]["factor"], 3.5);
}

#[test]
fn kinds_lists_registered_handlers() {
    let dir = TempDir::new().unwrap();
    let output = geopipe(&dir).args(["kinds", "--json"]).output().unwrap();
    let kinds: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(kinds[0], "composite");
    assert!(kinds.contains(&"property-plot".to_string()));
}

// ---------------------------------------------------------------------------
// geopipe config
// ---------------------------------------------------------------------------

#[test]
fn config_show_prints_defaults() {
    let dir = TempDir::new().unwrap();
    geopipe(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found, showing defaults"))
        .stdout(predicate::str::contains("move_distance: 0.1"));
}

#[test]
fn config_validate_accepts_defaults() {
    let dir = TempDir::new().unwrap();
    geopipe(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_flags_bad_values() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("geopipe.yaml"),
        "presets:\n  move_distance: -1.0\n",
    )
    .unwrap();

    geopipe(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("move_distance"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_validate_rejects_oversized_precision() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("geopipe.yaml"), "summary:\n  precision: 200\n").unwrap();

    geopipe(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("summary.precision=200"));
}
