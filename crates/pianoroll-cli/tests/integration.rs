//! Integration tests for pianoroll-cli.
//!
//! Tests drive the built binary against patch files in a temp directory.

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to get the path to the `pianoroll` binary built by cargo.
fn pianoroll_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pianoroll"))
}

fn run(args: &[&str]) -> Output {
    pianoroll_bin()
        .args(args)
        .output()
        .expect("failed to run pianoroll")
}

fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "pianoroll {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn new_patch(dir: &TempDir) -> String {
    let path = dir.path().join("patch.json");
    let path = path.to_str().expect("utf-8 temp path").to_string();
    run_ok(&["new", &path]);
    path
}

fn read_state(path: &str) -> Value {
    let text = std::fs::read_to_string(Path::new(path)).expect("patch readable");
    let patch: Value = serde_json::from_str(&text).expect("patch is JSON");
    patch["data"].clone()
}

// ---------------------------------------------------------------------------
// models / new
// ---------------------------------------------------------------------------

#[test]
fn cli_models_lists_builtins() {
    let stdout = run_ok(&["models", "--ports"]);
    assert!(stdout.contains("Available Models"));
    assert!(stdout.contains("piano-roll"));
    assert!(stdout.contains("song-roll"));
    assert!(stdout.contains("End of Pattern"));
}

#[test]
fn cli_new_writes_envelope() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);

    let text = std::fs::read_to_string(&path).unwrap();
    let patch: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(patch["model"], "piano-roll");
    assert_eq!(patch["version"], 1);
    assert_eq!(patch["data"]["currentStep"], -1);
}

#[test]
fn cli_new_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);

    let output = run(&["new", &path]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));

    run_ok(&["new", &path, "--force"]);
}

#[test]
fn cli_new_rejects_unknown_model() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("x.json");
    let output = run(&["new", path.to_str().unwrap(), "--model", "drum-roll"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown model"));
}

// ---------------------------------------------------------------------------
// edit / inspect
// ---------------------------------------------------------------------------

#[test]
fn cli_edit_then_inspect() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);

    let stdout = run_ok(&[
        "edit", &path, "--pattern", "2", "--step", "5", "--pitch", "E4", "--velocity", "0.5",
        "--active", "true",
    ]);
    assert!(stdout.contains("E4"), "got: {stdout}");

    let state = read_state(&path);
    let step = &state["patterns"][2]["measures"][0]["steps"][5];
    assert_eq!(step["pitch"], 52);
    assert_eq!(step["velocity"], 0.5);
    assert_eq!(step["active"], true);

    let summary = run_ok(&["inspect", &path]);
    assert!(summary.contains("Current step:    -1"), "got: {summary}");
    assert!(summary.contains("1/16"), "got: {summary}");

    let steps = run_ok(&["inspect", &path, "--pattern", "2"]);
    assert!(steps.contains("Pattern 2 (1 x 4 x 4)"), "got: {steps}");
    assert!(steps.contains("E4"));
}

#[test]
fn cli_inspect_empty_patch() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);
    let stdout = run_ok(&["inspect", &path]);
    assert!(stdout.contains("All patterns are empty."));
}

#[test]
fn cli_edit_rejects_out_of_range_step() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);

    let output = run(&["edit", &path, "--pattern", "0", "--step", "16", "--active", "true"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));

    let output = run(&["edit", &path, "--pattern", "64", "--step", "0"]);
    assert!(!output.status.success());
}

#[test]
fn cli_edit_rejects_bad_velocity() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);
    let output = run(&["edit", &path, "-p", "0", "-s", "0", "--velocity", "1.5"]);
    assert!(!output.status.success());
}

#[test]
fn cli_edit_requires_piano_roll_patch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("song.json");
    let path = path.to_str().unwrap();
    run_ok(&["new", path, "--model", "song-roll"]);

    let output = run(&["edit", path, "-p", "0", "-s", "0", "--active", "true"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("song-roll"));
}

// ---------------------------------------------------------------------------
// geometry / copy-pattern
// ---------------------------------------------------------------------------

#[test]
fn cli_geometry_resizes_pattern() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);

    let stdout = run_ok(&[
        "geometry", &path, "--pattern", "1", "--measures", "2", "--beats", "3",
    ]);
    assert!(stdout.contains("= 24 steps"), "got: {stdout}");

    let state = read_state(&path);
    assert_eq!(state["patterns"][1]["numberOfMeasures"], 2);
    assert_eq!(state["patterns"][1]["beatsPerMeasure"], 3);
}

#[test]
fn cli_geometry_rejects_zero() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);
    let output = run(&["geometry", &path, "--pattern", "0", "--divisions", "0"]);
    assert!(!output.status.success());
}

#[test]
fn cli_copy_pattern_duplicates_steps_and_geometry() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);
    run_ok(&["geometry", &path, "-p", "0", "--divisions", "2"]);
    run_ok(&["edit", &path, "-p", "0", "-s", "3", "--active", "true", "--pitch", "60"]);

    run_ok(&["copy-pattern", &path, "--from", "0", "--to", "9"]);

    let state = read_state(&path);
    assert_eq!(state["patterns"][9]["divisionsPerBeat"], 2);
    assert_eq!(state["patterns"][9]["measures"][0]["steps"][3]["pitch"], 60);
    assert_eq!(state["patterns"][9]["measures"][0]["steps"][3]["active"], true);
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

#[test]
fn cli_render_prints_notes() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);
    run_ok(&["edit", &path, "-p", "0", "-s", "0", "--active", "true", "--pitch", "C5"]);

    let stdout = run_ok(&["render", &path, "--steps", "16"]);
    assert!(stdout.contains("note on   C5"), "got: {stdout}");
    assert!(stdout.contains("end of pattern"), "got: {stdout}");
    assert!(stdout.contains("1 notes, 1 pattern ends"), "got: {stdout}");
}

#[test]
fn cli_render_reads_config() {
    let dir = TempDir::new().unwrap();
    let path = new_patch(&dir);
    let config = dir.path().join("render.toml");
    std::fs::write(&config, "bpm = 60.0\nsteps = 32\n").unwrap();

    let stdout = run_ok(&["render", &path, "--config", config.to_str().unwrap()]);
    assert!(stdout.contains("Rendering 32 clocks at 60 bpm"), "got: {stdout}");
    assert!(stdout.contains("0 notes, 2 pattern ends"), "got: {stdout}");
}

#[test]
fn cli_render_missing_patch_fails() {
    let output = run(&["render", "/nonexistent/patch.json"]);
    assert!(!output.status.success());
}
