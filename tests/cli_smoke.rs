//! End-to-end checks of the signtool-batch binary.

mod common;

use assert_cmd::Command;
use common::Workspace;
use predicates::prelude::*;

fn signtool_batch() -> Command {
    let mut cmd = Command::cargo_bin("signtool-batch").expect("binary built");
    cmd.env_remove("SIGNTOOL_PFX")
        .env_remove("SIGNTOOL_PFX_PASSWORD")
        .env_remove("SIGNTOOL_PATH")
        .env_remove("SIGNTOOL_TIMESTAMP_URL")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_is_available() {
    signtool_batch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("signtool"));
}

#[test]
fn sign_without_certificate_fails_validation() {
    let ws = Workspace::new();
    let artifact = ws.artifact("a.exe");

    signtool_batch()
        .args(["sign", "--non-interactive"])
        .arg(&artifact)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PFX certificate"));
}

#[test]
fn sign_with_missing_certificate_file_fails_validation() {
    let ws = Workspace::new();
    let artifact = ws.artifact("a.exe");

    signtool_batch()
        .args(["sign", "--non-interactive", "--pfx"])
        .arg(ws.absent("missing.pfx"))
        .arg(&artifact)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PFX file does not exist"));
}

#[test]
fn sign_without_files_fails_validation() {
    let ws = Workspace::new();

    signtool_batch()
        .args(["sign", "--non-interactive", "--password", "secret", "--pfx"])
        .arg(ws.cert())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at least one file"));
}

#[test]
fn invalid_manual_signtool_is_rejected() {
    let ws = Workspace::new();
    let artifact = ws.artifact("a.exe");

    signtool_batch()
        .args(["sign", "--non-interactive", "--password", "secret", "--pfx"])
        .arg(ws.cert())
        .arg("--signtool")
        .arg(ws.absent("signtool.exe"))
        .arg(&artifact)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("signtool path does not exist"));
}

#[test]
fn zero_timeout_is_an_argument_error() {
    signtool_batch()
        .args(["sign", "--timeout-secs", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--timeout-secs"));
}

#[cfg(unix)]
#[test]
fn json_report_lists_each_file() {
    let ws = Workspace::new();
    let tool = common::fake_signtool(ws.path(), "signtool", "exit 0");
    let signed = ws.artifact("out/app.exe");

    signtool_batch()
        .args(["sign", "--non-interactive", "--json", "--password", "secret", "--pfx"])
        .arg(ws.cert())
        .arg("--signtool")
        .arg(&tool)
        .arg(&signed)
        .arg(ws.absent("out/missing.dll"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"outcome\": \"signed\""))
        .stdout(predicate::str::contains("\"outcome\": \"not_found\""))
        .stdout(predicate::str::contains("\"verdict\": \"partial\""))
        .stdout(predicate::str::contains("secret").not());
}

#[cfg(unix)]
#[test]
fn json_stdout_holds_only_the_report() {
    let ws = Workspace::new();
    let tool = common::fake_signtool(ws.path(), "signtool", "exit 0");
    let signed = ws.artifact("out/app.exe");

    let output = signtool_batch()
        .args(["-v", "sign", "--non-interactive", "--json", "--password", "secret", "--pfx"])
        .arg(ws.cert())
        .arg("--signtool")
        .arg(&tool)
        .arg(&signed)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["verdict"], "all_signed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Using signtool at"), "{stderr}");
    assert!(stderr.contains("Signing files"), "{stderr}");
}

#[cfg(unix)]
#[test]
fn folder_scan_signs_matching_files() {
    let ws = Workspace::new();
    let tool = common::fake_signtool(ws.path(), "signtool", "exit 0");
    ws.artifact("dist/app.exe");
    ws.artifact("dist/plugins/core.dll");
    ws.artifact("dist/readme.txt");

    signtool_batch()
        .args(["sign", "--non-interactive", "--password", "secret", "--pfx"])
        .arg(ws.cert())
        .arg("--signtool")
        .arg(&tool)
        .arg("--folder")
        .arg(ws.path().join("dist"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Complete: 2 succeeded, 0 failed"));
}
