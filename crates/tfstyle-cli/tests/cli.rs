//! Runs the `tfstyle` binary against scratch projects.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn tfstyle(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tfstyle"))
        .args(args)
        .current_dir(dir)
        .env("TFSTYLE_CONFIG_DIR", dir.join("no-global"))
        .env_remove("TFSTYLE_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run tfstyle")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn warnings_pass_and_print_compact() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("variables.tf"),
        "variable \"region\" {\n  type = string\n}\n#note\n",
    )
    .unwrap();

    let output = tfstyle(tmp.path(), &["check", "--format", "compact", "variables.tf"]);
    assert_eq!(output.status.code(), Some(0));
    insta::assert_snapshot!(stdout(&output), @r#"
variables.tf:1:1: warning [DC.003] `variable "region"` has no `description`
variables.tf:4:1: warning [DC.001] Expected exactly one space after `#`
"#);
}

#[test]
fn errors_fail_the_run() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("versions.tf"), "terraform {\n}\n").unwrap();

    let output = tfstyle(tmp.path(), &["check", "--format", "compact", "."]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("error [SC.001]"));
}

#[test]
fn project_config_lowers_the_threshold() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tfstyle.toml"), "fail_on = \"warning\"\n").unwrap();
    fs::write(tmp.path().join("main.tf"), "#note\n").unwrap();

    let output = tfstyle(tmp.path(), &["check", "main.tf"]);
    assert_eq!(output.status.code(), Some(1));

    let output = tfstyle(tmp.path(), &["check", "--rules", "ST.008", "main.tf"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn json_report() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("main.tf"), "locals {\n  a = 1 \n}\n").unwrap();

    let output = tfstyle(tmp.path(), &["check", "--format", "json", "main.tf"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["files_checked"], 1);
    assert_eq!(value["warnings"], 1);
    assert_eq!(value["diagnostics"][0]["rule_id"], "ST.008");
    assert_eq!(value["diagnostics"][0]["severity"], "warning");
}

#[test]
fn list_rules_json() {
    let tmp = TempDir::new().unwrap();
    let output = tfstyle(tmp.path(), &["list-rules", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = value.as_array().unwrap();
    assert_eq!(rules.len(), 22);
    assert_eq!(rules[0]["id"], "ST.001");
}

#[test]
fn init_writes_once() {
    let tmp = TempDir::new().unwrap();
    assert!(tfstyle(tmp.path(), &["init"]).status.success());
    assert!(tmp.path().join("tfstyle.toml").is_file());
    assert!(!tfstyle(tmp.path(), &["init"]).status.success());
    assert!(tfstyle(tmp.path(), &["init", "--force"]).status.success());
}
