#![cfg(feature = "cli")]

mod common;

use common::*;
use std::process::{Command, Output};
use tempfile::TempDir;

fn checker(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_legal-mentions-checker"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn folder_arg(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

#[test]
fn help_exits_zero() {
    let out = checker(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--mention"));
}

#[test]
fn version_exits_zero() {
    let out = checker(&["--version"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_is_malformed() {
    assert_eq!(checker(&[]).status.code(), Some(255));
}

#[test]
fn unknown_flag_is_malformed() {
    assert_eq!(checker(&["--versbose"]).status.code(), Some(255));
}

#[test]
fn missing_mention_is_malformed() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        checker(&["--folder", &folder_arg(&dir)]).status.code(),
        Some(255)
    );
}

#[test]
fn empty_values_fail_prechecks() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        checker(&["--folder", "", "--mention", MENTION]).status.code(),
        Some(255)
    );
    assert_eq!(
        checker(&["--folder", &folder_arg(&dir), "--mention", ""]).status.code(),
        Some(255)
    );
}

#[test]
fn missing_folder_fails_prechecks() {
    let out = checker(&["--folder", "/nonexistent/legal/assets", "--mention", MENTION]);
    assert_eq!(out.status.code(), Some(255));
}

#[test]
fn all_files_suitable_exits_two() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "logo.png", &png(&[png_text("Copyright", MENTION)]));

    let out = checker(&["--mention", MENTION, "--folder", &folder_arg(&dir)]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stdout).contains("SUCCESS"));
}

#[test]
fn one_file_without_mention_exits_one() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "credited.png", &png(&[png_iptc_copyright(MENTION)]));
    write(dir.path(), "bare.png", &png(&[]));

    let out = checker(&["--folder", &folder_arg(&dir), "--mention", MENTION, "--verbose"]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("FAILURE"));
    assert!(stdout.contains("bare.png"));
}

#[test]
fn empty_folder_exits_two() {
    let dir = TempDir::new().unwrap();
    let out = checker(&["--folder", &folder_arg(&dir), "--mention", MENTION]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn custom_filter() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "logo.png", &png(&[]));
    write(dir.path(), "icon.img", &png(&[png_text("Copyright", MENTION)]));

    let out = checker(&[
        "--folder", &folder_arg(&dir),
        "--mention", MENTION,
        "--filter", r"\.img$",
    ]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn json_report() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bare.png", &png(&[]));

    let out = checker(&["--folder", &folder_arg(&dir), "--mention", MENTION, "--json"]);
    assert_eq!(out.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["files"][0]["outcome"]["status"], "no_metadata");
    assert!(!String::from_utf8_lossy(&out.stdout).contains("FAILURE"));
}

#[test]
fn init_writes_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checker.json");
    let out = checker(&["--init", "--config", &path.to_string_lossy()]);
    assert_eq!(out.status.code(), Some(0));

    let config: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(config["filter"], "png|PNG");
}

#[test]
fn unsuitable_file_reported_once() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bare.png", &png(&[]));

    let out = checker(&["--folder", &folder_arg(&dir), "--mention", MENTION]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stdout.matches("bare.png").count(), 1);
    assert!(!stderr.contains("bare.png"));
}
