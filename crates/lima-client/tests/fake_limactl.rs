//! End-to-end tests against a fake limactl script.
//!
//! The script serves `list` from a JSONL state file next to it and
//! rewrites that file on `stop`, so a stop-then-list round trip
//! observes the status change the way the dashboard does.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use lima_client::{LimaClient, LimaError, VmStatus};

const STATE: &str = r#"{"name":"alpha","status":"Running","sshLocalPort":60022,"cpus":4,"memory":4294967296,"disk":107374182400}
{"name":"beta","status":"Stopped","sshLocalPort":60023,"cpus":2,"memory":2147483648,"disk":53687091200}
"#;

const SCRIPT: &str = r#"#!/bin/sh
dir="$(cd "$(dirname "$0")" && pwd)"
case "$1" in
  list)
    cat "$dir/state.jsonl"
    ;;
  start|stop)
    verb="$1"
    from="Running"; to="Stopped"
    [ "$verb" = "start" ] && { from="Stopped"; to="Running"; }
    tmp="$dir/state.tmp"
    sed "s/\"$from\"/\"$to\"/" "$dir/state.jsonl" > "$tmp" && mv "$tmp" "$dir/state.jsonl"
    ;;
  delete)
    echo "cannot delete: instance is protected" >&2
    exit 1
    ;;
  *)
    exit 2
    ;;
esac
"#;

fn install_fake(dir: &Path) -> PathBuf {
    let program = dir.join("limactl");
    fs::write(&program, SCRIPT).expect("write script");
    fs::write(dir.join("state.jsonl"), STATE).expect("write state");
    let mut perms = fs::metadata(&program).expect("stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&program, perms).expect("chmod script");
    program
}

#[tokio::test]
async fn list_parses_fake_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = LimaClient::with_program(install_fake(dir.path()));

    let vms = client.list().await.expect("list should succeed");
    assert_eq!(vms.len(), 2);
    assert_eq!(vms[0].name, "alpha");
    assert_eq!(vms[0].status, VmStatus::Running);
    assert_eq!(vms[1].name, "beta");
    assert_eq!(vms[1].status, VmStatus::Stopped);
}

#[tokio::test]
async fn stop_then_list_shows_stopped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = LimaClient::with_program(install_fake(dir.path()));

    client.stop("alpha").await.expect("stop should succeed");

    let vms = client.list().await.expect("list should succeed");
    let alpha = vms.iter().find(|v| v.name == "alpha").expect("alpha present");
    assert_eq!(alpha.status, VmStatus::Stopped);
}

#[tokio::test]
async fn failing_command_reports_stderr() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = LimaClient::with_program(install_fake(dir.path()));

    let err = client.delete("alpha").await.expect_err("delete should fail");
    match err {
        LimaError::CommandFailed { command, stderr } => {
            assert_eq!(command, "delete alpha");
            assert!(stderr.contains("protected"));
        }
        other => unreachable!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_binary_is_not_installed() {
    let client = LimaClient::with_program("/nonexistent/limactl");
    let err = client.list().await.expect_err("list should fail");
    assert!(matches!(err, LimaError::NotInstalled { .. }));
}
