//! Smoke tests for argument wiring and startup failures

use assert_cmd::Command;
use predicates::prelude::*;

fn neighborhood() -> Command {
    let mut cmd = Command::cargo_bin("neighborhood").unwrap();
    for key in ["DB_USER", "DB_PASSWORD", "DB_HOST", "DB_NAME", "BIND_ADDR"] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    neighborhood()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("schema"));
}

#[test]
fn test_serve_help_mentions_db_env() {
    neighborhood()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DB_HOST"))
        .stdout(predicate::str::contains("--init-schema"));
}

#[test]
fn test_serve_refuses_to_start_without_db_settings() {
    neighborhood()
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--db-user"));
}

#[test]
fn test_serve_gives_up_on_unreachable_database() {
    neighborhood()
        .args(["serve", "--connect-interval-ms", "1", "--connect-attempts", "1"])
        .env("DB_USER", "arbor")
        .env("DB_PASSWORD", "arbor")
        .env("DB_HOST", "127.0.0.1:1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to reach database"));
}
