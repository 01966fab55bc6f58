//! Integration tests for the `audit` subcommand

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_wastwalk(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wastwalk"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("WASTWALK_TESTSUITE")
        .env_remove("WASTWALK_OUTPUT")
        .env_remove("WASTWALK_EXE")
        .output()
        .expect("failed to run wastwalk")
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_audit_reports_valid_invalid_and_missing() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    write(root, "testsuite/simple/basic-case.wast", "(module)");
    write(root, "testsuite/simple/never-run.wast", "(module)");
    write(
        root,
        "output/simple/basic_case/basic_case.json",
        r#"{"source_filename": "basic-case.wast",
            "commands": [{"type": "module", "line": 1, "filename": "basic_case.0.wasm"},
                         {"type": "assert_return", "line": 4}]}"#,
    );
    write(root, "output/simple/basic_case/basic_case.0.wasm", "\0asm");
    write(root, "output/simple/broken/broken.json", "not json");

    let report_path = root.join("audit.json");
    let out = run_wastwalk(root, &["audit", "--report", report_path.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert!(out.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains("Valid manifests: 1"), "stdout: {}", stdout);
    assert!(stdout.contains("Invalid manifests: 1"), "stdout: {}", stdout);
    assert!(stdout.contains("Sources without artifact: 1"), "stdout: {}", stdout);
    assert!(stderr.contains("never-run.wast"), "stderr: {}", stderr);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["command_totals"]["assert_return"], 1);
    assert_eq!(report["missing_manifests"].as_array().unwrap().len(), 1);
}

#[test]
fn test_audit_flags_missing_module_files() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(
        root,
        "output/a/a.json",
        r#"{"source_filename": "a.wast", "commands": [{"type": "module", "line": 1, "filename": "a.0.wasm"}]}"#,
    );

    let out = run_wastwalk(root, &["audit"]);

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing module"));
}

#[test]
fn test_audit_without_output_tree_fails() {
    let tmp = tempdir().unwrap();

    let out = run_wastwalk(tmp.path(), &["audit", "--quiet"]);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert!(!out.status.success());
    assert!(stderr.contains("Output directory does not exist"), "stderr: {}", stderr);
    assert!(!stderr.contains("Test-suite directory"), "stderr: {}", stderr);
}
