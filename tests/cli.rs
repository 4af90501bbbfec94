use std::fs;
use std::path::Path;
use std::process::{ Command, Output };

use tempfile::tempdir;

const LISTING: &str =
    r#"{
    "sha": "abc",
    "tree": [
        {"path": "README.md", "mode": "100644", "type": "blob", "sha": "1"},
        {"path": "src", "mode": "040000", "type": "tree", "sha": "2"},
        {"path": "src/main.rs", "mode": "100644", "type": "blob", "sha": "3"},
        {"path": "src/util/readme_helper.rs", "mode": "100644", "type": "blob", "sha": "4"}
    ],
    "truncated": false
}"#;

fn repotree(dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_repotree");
    Command::new(bin)
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("config.yaml"))
        .arg("--state-file")
        .arg(dir.join("state.yaml"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_renders_saved_listing_to_stdout() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("listing.json"), LISTING).unwrap();

    let output = repotree(dir.path(), &["owner/repo", "--input", "listing.json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "owner/repo\n├── README.md\n├── src\n│   ├── main.rs\n│   ├── util\n│   │   ├── readme_helper.rs\n"
    );
}

#[test]
fn test_filter_with_json_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("listing.json"), LISTING).unwrap();

    let output = repotree(
        dir.path(),
        &["--input", "listing.json", "--filter", "README", "--format", "json"]
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "README.md": null,
            "src": { "util": { "readme_helper.rs": null } }
        })
    );
}

#[test]
fn test_output_format_follows_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("listing.json"), LISTING).unwrap();

    let output = repotree(dir.path(), &["o/r", "--input", "listing.json", "-o", "tree.md"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = fs::read_to_string(dir.path().join("tree.md")).unwrap();
    assert!(written.starts_with("# o/r\n\n```text\n├── README.md\n"));
}

#[test]
fn test_config_changes_render_style() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("listing.json"), LISTING).unwrap();
    fs::write(dir.path().join("config.yaml"), "indent_unit: \"  \"\nbranch: \"* \"\n").unwrap();

    let output = repotree(dir.path(), &["o/r", "--input", "listing.json", "--filter", "main"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "o/r\n* src\n  * main.rs\n");
}

#[test]
fn test_invalid_repository_is_reported() {
    let dir = tempdir().unwrap();

    let output = repotree(dir.path(), &["https://gitlab.com/owner/repo"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: not a GitHub repository"), "stderr: {}", stderr);
}

#[test]
fn test_missing_repository_without_state() {
    let dir = tempdir().unwrap();

    let output = repotree(dir.path(), &[]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no repository given"), "stderr: {}", stderr);
}

#[test]
fn test_ref_is_rejected_with_saved_listing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("listing.json"), LISTING).unwrap();

    let output = repotree(dir.path(), &["o/r", "--input", "listing.json", "--ref", "dev"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"), "stderr: {}", stderr);
}

#[test]
fn test_unreadable_saved_listing_is_a_decode_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("listing.json"), "<html></html>").unwrap();

    let output = repotree(dir.path(), &["o/r", "--input", "listing.json"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: could not decode tree listing"), "stderr: {}", stderr);
}
