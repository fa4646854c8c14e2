//! Integration tests for Pulse
//!
//! These verify the CLI surface and the cross-crate pipeline wiring.

use std::process::Command;

#[test]
fn cli_help_lists_the_subcommands() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--", "--help"])
        .output()
        .expect("failed to run the pulse binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("suggest"));
    assert!(stdout.contains("clear"));
}

#[test]
fn suggest_runs_offline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("posts.json");
    let posts = serde_json::json!([{
        "id": "p1",
        "createdTime": "2024-06-03T09:30:00Z",
        "message": "hello",
        "likes": 3,
        "comments": 1,
        "shares": 0
    }]);
    std::fs::write(&input, posts.to_string()).unwrap();

    let output = Command::new("cargo")
        .args(["run", "--quiet", "--", "suggest", "--input"])
        .arg(&input)
        .output()
        .expect("failed to run the pulse binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Target Comments"));
}

#[test]
fn clear_removes_the_cache_directory() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join(".pulse");
    std::fs::create_dir_all(&cache_dir).unwrap();
    std::fs::write(cache_dir.join("post_analyses.json"), "{}").unwrap();

    let output = Command::new("cargo")
        .args(["run", "--quiet", "--", "--cache-dir"])
        .arg(&cache_dir)
        .arg("clear")
        .output()
        .expect("failed to run the pulse binary");

    assert!(output.status.success());
    assert!(!cache_dir.exists());
}
