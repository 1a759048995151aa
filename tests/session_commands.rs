mod support;

use std::fs;

use predicates::str::contains;

use support::{tsk_cmd, TestHome};

#[test]
fn login_persists_and_whoami_reads() {
    let home = TestHome::init();

    tsk_cmd(&home)
        .args(["login", "alice"])
        .assert()
        .success()
        .stdout(contains("Signed in as alice"));

    let contents = fs::read_to_string(home.session_file()).expect("session file");
    assert!(contents.contains("alice"));

    tsk_cmd(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("alice"))
        .stdout(contains("session"));
}

#[test]
fn login_trims_and_rejects_blank_owner() {
    let home = TestHome::init();

    tsk_cmd(&home)
        .args(["login", "  alice  "])
        .assert()
        .success()
        .stdout(contains("Signed in as alice"));

    tsk_cmd(&home)
        .args(["login", "   "])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn whoami_prefers_flag_then_env_then_session() {
    let home = TestHome::init();
    tsk_cmd(&home).args(["login", "carol"]).assert().success();

    tsk_cmd(&home)
        .args(["--owner", "alice", "whoami"])
        .env("TSK_OWNER", "bob")
        .assert()
        .success()
        .stdout(contains("alice"));

    tsk_cmd(&home)
        .arg("whoami")
        .env("TSK_OWNER", "bob")
        .assert()
        .success()
        .stdout(contains("bob"));

    tsk_cmd(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("carol"));
}

#[test]
fn logout_clears_the_session() {
    let home = TestHome::init();
    tsk_cmd(&home).args(["login", "alice"]).assert().success();

    tsk_cmd(&home)
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Signed out alice"));
    assert!(!home.session_file().exists());

    tsk_cmd(&home)
        .arg("whoami")
        .assert()
        .failure()
        .code(3)
        .stderr(contains("tsk login"));
}

#[test]
fn logout_without_session_warns() {
    let home = TestHome::init();

    tsk_cmd(&home)
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("No session to sign out"));
}

#[test]
fn signed_in_owner_scopes_task_commands() {
    let home = TestHome::init();
    tsk_cmd(&home).args(["login", "alice"]).assert().success();

    tsk_cmd(&home)
        .args(["add", "Buy milk"])
        .assert()
        .success();

    tsk_cmd(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Tasks for alice: 1 of 1"));

    // After sign-out the collection is unreachable until the next login.
    tsk_cmd(&home).arg("logout").assert().success();
    tsk_cmd(&home).arg("list").assert().failure().code(3);
}
