use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_replaymap")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "replaymap.exe"
            } else {
                "replaymap"
            });
            p
        })
}

fn run(args: &[&str], out_dir: &Path) -> Output {
    Command::new(exe())
        .args(args)
        .arg("--output_dir")
        .arg(out_dir)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn write_fixture(dir: &Path, name: &str, body: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec(body).unwrap()).unwrap();
    path
}

#[test]
fn renders_heatmap_from_saved_info() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(
        dir.path(),
        "fixture.json",
        &serde_json::json!({
            "id": "abc123",
            "title": "Fixture",
            "heatmap": [
                {"start_time": 0.0, "end_time": 10.0, "value": 0.2},
                {"start_time": 10.0, "end_time": 20.0, "value": 0.9}
            ]
        }),
    );
    let out_dir = dir.path().join("output");
    let fixture_arg = fixture.to_string_lossy().to_string();

    let output = run(
        &["--video_id", "abc123", "--from_info", fixture_arg.as_str()],
        &out_dir,
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(out_dir.join("heatmaps").join("abc123.png").exists());
    let saved = std::fs::read_to_string(out_dir.join("info").join("abc123.json")).unwrap();
    assert!(saved.starts_with("{\n    \"id\": \"abc123\""));
    assert!(saved.contains("\n        {\n            \"start_time\": 0.0"));
}

#[test]
fn save_info_false_skips_the_json_dump() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(
        dir.path(),
        "fixture.json",
        &serde_json::json!({"heatmap": [{"start_time": 0.0, "end_time": 5.0, "value": 1.0}]}),
    );
    let out_dir = dir.path().join("output");
    let fixture_arg = fixture.to_string_lossy().to_string();

    let output = run(
        &[
            "--video_id",
            "nosave",
            "--from_info",
            fixture_arg.as_str(),
            "--save_info",
            "false",
            "--show_chapters",
            "true",
        ],
        &out_dir,
    );
    assert!(output.status.success());
    assert!(!out_dir.join("info").join("nosave.json").exists());
    assert!(out_dir.join("heatmaps").join("nosave.png").exists());
}

#[test]
fn missing_heatmap_exits_non_zero_without_image() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(
        dir.path(),
        "fixture.json",
        &serde_json::json!({"id": "noheat", "chapters": null}),
    );
    let out_dir = dir.path().join("output");
    let fixture_arg = fixture.to_string_lossy().to_string();

    let output = run(
        &["--video_id", "noheat", "--from_info", fixture_arg.as_str()],
        &out_dir,
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No heatmap data found for noheat"));
    assert!(!out_dir.join("heatmaps").join("noheat.png").exists());
}

#[test]
fn extraction_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("output");

    let output = run(
        &[
            "--video_id",
            "abc123",
            "--yt_dlp",
            "/nonexistent/replaymap-test-yt-dlp",
        ],
        &out_dir,
    );
    assert!(!output.status.success());
    assert!(!out_dir.join("info").join("abc123.json").exists());
    assert!(!out_dir.join("heatmaps").join("abc123.png").exists());
}
