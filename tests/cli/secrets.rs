//! Tests for put/get/rm/list/history/rollback.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_put_and_get() {
    let t = Test::init();

    let output = t.put("email/work", "hunter2");
    assert_success(&output);
    assert_stdout_contains(&output, "version 1");

    let output = t.get("email/work");
    assert_success(&output);
    assert_eq!(stdout(&output), "hunter2\n");
}

#[test]
fn test_put_from_stdin() {
    let t = Test::init();

    t.cmd()
        .args(["put", "db"])
        .write_stdin("from-stdin\n")
        .assert()
        .success();

    assert_eq!(stdout(&t.get("db")), "from-stdin\n");
}

#[test]
fn test_put_multiline_from_stdin() {
    let t = Test::init();

    t.cmd()
        .args(["put", "cert", "--multiline"])
        .write_stdin("line one\nline two\n")
        .assert()
        .success();

    assert_eq!(stdout(&t.get("cert")), "line one\nline two\n");
}

#[test]
fn test_put_rejects_empty_value() {
    let t = Test::init();
    t.cmd()
        .args(["put", "empty"])
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn test_get_versions() {
    let t = Test::init();
    assert_success(&t.put("k", "p1"));
    assert_success(&t.put("k", "p2"));

    assert_eq!(stdout(&t.run(&["get", "k", "--version", "1"])), "p1\n");
    assert_eq!(stdout(&t.run(&["get", "k", "--version", "0"])), "p2\n");
    assert_eq!(stdout(&t.run(&["get", "k", "--version", "99"])), "p2\n");
}

#[test]
fn test_rm() {
    let t = Test::init();
    assert_success(&t.put("k", "v"));
    assert_success(&t.run(&["rm", "k"]));

    let output = t.get("k");
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}

#[test]
fn test_list_sorted() {
    let t = Test::init();
    for key in ["z", "a/c", "a/b"] {
        assert_success(&t.put(key, "v"));
    }

    let output = t.run(&["list"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "a/b\na/c\nz\n");
}

#[test]
fn test_list_json() {
    let t = Test::init();
    assert_success(&t.put("a/b", "v"));

    let output = t.run(&["list", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["count"], 1);
    assert_eq!(json["keys"][0], "a/b");
}

#[test]
fn test_list_tree() {
    let t = Test::init();
    assert_success(&t.put("email/work", "v"));
    assert_success(&t.put("email/home", "v"));

    let output = t.run(&["list", "--tree"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("email"));
    assert!(out.contains("├── home"));
    assert!(out.contains("└── work"));
}

#[test]
fn test_history_json_has_no_ciphertext() {
    let t = Test::init();
    assert_success(&t.run(&["put", "k", "p1", "-m", "first"]));
    assert_success(&t.run(&["put", "k", "p2", "-m", "second"]));

    let output = t.run(&["history", "k", "--json"]);
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let versions = json.as_array().unwrap();

    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], 2);
    assert_eq!(versions[0]["message"], "second");
    assert_eq!(versions[0]["author"], "tester");
    assert!(versions.iter().all(|v| v.get("password").is_none()));
}

#[test]
fn test_history_text() {
    let t = Test::init();
    assert_success(&t.run(&["put", "k", "p1", "-m", "first"]));

    let output = t.run(&["history", "k"]);
    assert_success(&output);
    assert_stdout_contains(&output, "version 1 (current)");
    assert_stdout_contains(&output, "first");
}

#[test]
fn test_rollback() {
    let t = Test::init();
    assert_success(&t.put("k", "old"));
    assert_success(&t.put("k", "new"));

    let output = t.run(&["rollback", "k", "1"]);
    assert_success(&output);
    assert_stdout_contains(&output, "now version 3");

    assert_eq!(stdout(&t.get("k")), "old\n");
}

#[test]
fn test_audit_log_written() {
    let t = Test::init();
    assert_success(&t.put("k", "v"));
    assert_success(&t.get("k"));

    let log = std::fs::read_to_string(t.store().join(".audit.log")).unwrap();
    assert!(log.contains(" | tester | MODIFY | k"));
    assert!(log.contains(" | tester | ACCESS | k"));
}

#[test]
fn test_audit_disabled_by_env() {
    let t = Test::init();
    t.cmd()
        .env("PF_AUDIT", "false")
        .args(["put", "k", "v"])
        .assert()
        .success();

    assert!(!t.store().join(".audit.log").exists());
}
