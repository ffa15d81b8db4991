//! End-to-end checks through the facade.

use std::fs;
use tempfile::TempDir;
use tfstyle::{
    lint_source, run_check, CancellationToken, CheckOptions, Config, FileRole, Severity,
};

#[test]
fn lint_source_uses_default_catalog() {
    let diagnostics = lint_source(
        "outputs.tf",
        "output \"vpc_id\" {\n  value = 1\n}\n",
        Some(FileRole::Outputs),
    );
    let ids: Vec<&str> = diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["DC.004"]);
    assert_eq!(tfstyle::default_registry().len(), 22);
}

#[test]
fn config_file_drives_the_run() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::write(
        root.join("tfstyle.toml"),
        "fail_on = \"warning\"\n\n[rules.output-description]\nseverity = \"error\"\n",
    )
    .unwrap();
    fs::write(root.join("outputs.tf"), "output \"vpc_id\" {\n  value = 1\n}\n").unwrap();

    let config = Config::from_file(&root.join("tfstyle.toml")).unwrap();
    let options = CheckOptions {
        paths: vec![root.to_path_buf()],
        ..CheckOptions::default()
    };
    let result = run_check(&config, &options).unwrap();

    assert_eq!(result.files_checked, 1);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
    assert!(result.has_diagnostics_at(config.fail_threshold()));
}

#[test]
fn cancelled_run_skips_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("main.tf"), "locals {}\n").unwrap();
    fs::write(tmp.path().join("locals.tf"), "locals {}\n").unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let options = CheckOptions {
        paths: vec![tmp.path().to_path_buf()],
        cancellation: Some(token),
        ..CheckOptions::default()
    };
    let result = run_check(&Config::default(), &options).unwrap();
    assert_eq!(result.files_checked, 0);
    assert_eq!(result.files_skipped, 2);
}

#[test]
fn broken_file_does_not_stop_others() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.tf"), "locals {\n  a = 1\n").unwrap();
    fs::write(tmp.path().join("main.tf"), "locals {\n  b = 2\n}\n").unwrap();

    let options = CheckOptions {
        paths: vec![tmp.path().to_path_buf()],
        ..CheckOptions::default()
    };
    let result = run_check(&Config::default(), &options).unwrap();
    assert_eq!(result.files_checked, 2);
    let ids: Vec<&str> = result.diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["PS.003"]);
}
