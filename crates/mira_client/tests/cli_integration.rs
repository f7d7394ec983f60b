//! Integration tests for the `mira` binary. The backend is unreachable here, so
//! every reply must come from the fallback table.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use mira_client::fallback::FALLBACK_REPLIES;
use predicates::prelude::*;

fn dead_backend() -> String {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = l.local_addr().unwrap().port();
    drop(l);
    format!("http://127.0.0.1:{}", port)
}

fn any_fallback_reply() -> impl Predicate<str> {
    let [a, b, c] = FALLBACK_REPLIES;
    predicate::str::contains(a.reply)
        .or(predicate::str::contains(b.reply))
        .or(predicate::str::contains(c.reply))
}

#[test]
fn offline_backend_replies_from_fallback_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::from(cargo_bin_cmd!("mira"));
    cmd.arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("--base-url")
        .arg(dead_backend())
        .arg("--seed")
        .arg("11")
        .write_stdin("hello\n");

    cmd.assert()
        .success()
        .stdout(any_fallback_reply())
        .stderr(predicate::str::contains("离线模式"));
}

#[test]
fn blank_lines_produce_no_reply() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::from(cargo_bin_cmd!("mira"));
    cmd.arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("--base-url")
        .arg(dead_backend())
        .write_stdin("\n   \n");

    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn unreadable_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "not json").unwrap();

    let mut cmd = Command::from(cargo_bin_cmd!("mira"));
    cmd.arg("--config").arg(&path).write_stdin("");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}
