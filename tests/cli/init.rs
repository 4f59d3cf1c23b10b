//! Tests for `pf init` and `pf keygen`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_init_generates_identity_and_recipients() {
    let t = Test::new();

    let output = t.run(&["init"]);
    assert_success(&output);
    assert_stdout_contains(&output, "initialized store");

    assert!(t.identity().is_file());
    let recipients = std::fs::read_to_string(t.store().join(".recipients")).unwrap();
    let key_line = recipients
        .lines()
        .find(|l| l.starts_with("age1"))
        .expect("recipient line");

    let identity = std::fs::read_to_string(t.identity()).unwrap();
    assert!(identity.contains(key_line));
}

#[test]
fn test_init_reuses_existing_identity() {
    let t = Test::new();
    assert_success(&t.run(&["keygen", "--output", t.identity().to_str().unwrap()]));
    let before = std::fs::read_to_string(t.identity()).unwrap();

    assert_success(&t.run(&["init"]));

    assert_eq!(std::fs::read_to_string(t.identity()).unwrap(), before);
}

#[test]
fn test_init_with_explicit_recipient_is_write_only() {
    let t = Test::new();
    let other = pf::core::cipher::KeyPair::generate();

    assert_success(&t.run(&["init", "--recipient", &other.recipient]));
    assert!(!t.identity().exists());

    assert_success(&t.put("shared/token", "abc"));
    let output = t.get("shared/token");
    assert_failure(&output);
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init();
    t.cmd()
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_init_rejects_bad_recipient() {
    let t = Test::new();
    t.cmd()
        .args(["init", "--recipient", "not-a-valid-age-key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid recipient"));
    assert!(!t.store().exists());
}

#[test]
fn test_keygen_prints_pair() {
    let t = Test::new();
    t.cmd()
        .arg("keygen")
        .assert()
        .success()
        .stdout(predicate::str::contains("age1"))
        .stdout(predicate::str::contains("AGE-SECRET-KEY-"));
}

#[test]
fn test_keygen_refuses_to_overwrite() {
    let t = Test::new();
    let path = t.home.path().join("key.txt");
    std::fs::write(&path, "keep me").unwrap();

    assert_failure(&t.run(&["keygen", "--output", path.to_str().unwrap()]));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
}
