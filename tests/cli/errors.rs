//! Error reporting tests.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_missing_store_flag() {
    let t = Test::new();
    t.cmd()
        .env_remove("PF_STORE")
        .args(["get", "k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no store configured"));
}

#[test]
fn test_uninitialized_store() {
    let t = Test::new();
    t.cmd()
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a store directory"))
        .stderr(predicate::str::contains("pf init"));
}

#[test]
fn test_get_missing_key() {
    let t = Test::init();
    t.cmd()
        .args(["get", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry 'missing' not found"));
}

#[test]
fn test_rm_missing_key() {
    let t = Test::init();
    t.cmd()
        .args(["rm", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_invalid_key() {
    let t = Test::init();
    t.cmd()
        .args(["put", "../outside", "v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid key"));
}

#[test]
fn test_wrong_identity_is_decryption_error() {
    let t = Test::init();
    assert_success(&t.put("k", "v"));

    let other = t.home.path().join("other.txt");
    assert_success(&t.run(&["keygen", "--output", other.to_str().unwrap()]));

    t.cmd()
        .env("PF_IDENTITY", &other)
        .args(["get", "k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("decryption failed"));
}
