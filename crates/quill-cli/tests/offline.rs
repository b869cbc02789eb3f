//! CLI tests that need no backend.

mod common;

use common::{TestEnv, expect_failure, expect_success, run_cli};

/// A base URL nothing listens on.
fn closed_port_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[test]
fn test_version() {
    let env = TestEnv::new("http://127.0.0.1:8000");
    let stdout = expect_success(&["--version"], run_cli(&env, &["--version"]));
    assert!(stdout.starts_with("quill "));
}

#[test]
fn test_whoami_without_login() {
    let env = TestEnv::new("http://127.0.0.1:8000");
    let stderr = expect_failure(&["whoami"], run_cli(&env, &["whoami"]));
    assert!(stderr.contains("Not logged in"));
}

#[test]
fn test_whoami_reads_store() {
    let env = TestEnv::new("http://127.0.0.1:8000");
    env.seed_credentials("T1", "R1", "alice");

    let stdout = expect_success(&["whoami"], run_cli(&env, &["whoami"]));
    assert_eq!(stdout.trim(), "alice");
}

#[test]
fn test_logout_clears_store() {
    let env = TestEnv::new("http://127.0.0.1:8000");
    env.seed_credentials("T1", "R1", "alice");

    expect_success(&["logout"], run_cli(&env, &["logout"]));
    assert!(!env.store_path().exists());

    let stderr = expect_failure(&["whoami"], run_cli(&env, &["whoami"]));
    assert!(stderr.contains("Not logged in"));

    // Logging out twice is fine.
    expect_success(&["logout"], run_cli(&env, &["logout"]));
}

#[test]
fn test_unreachable_server_message() {
    let env = TestEnv::new(&closed_port_base());
    env.seed_credentials("T1", "R1", "alice");

    let args = ["posts", "list"];
    let stderr = expect_failure(&args, run_cli(&env, &args));
    assert!(
        stderr.contains("could not reach the server, check the backend is running"),
        "stderr: {}",
        stderr
    );
    // Nothing was refreshed.
    assert_eq!(env.stored_credentials()["access"], "T1");
}

#[test]
fn test_invalid_api_base() {
    let env = TestEnv::new("not a url");
    let args = ["posts", "get", "1"];
    let stderr = expect_failure(&args, run_cli(&env, &args));
    assert!(stderr.contains("Invalid API base URL"));
}

#[test]
fn test_corrupt_store_is_reported() {
    let env = TestEnv::new("http://127.0.0.1:8000");
    std::fs::write(env.store_path(), "{not json").unwrap();

    let stderr = expect_failure(&["whoami"], run_cli(&env, &["whoami"]));
    assert!(stderr.contains("Failed to open credential store"));
}

#[test]
fn test_update_requires_a_field() {
    let env = TestEnv::new("http://127.0.0.1:8000");
    let args = ["posts", "update", "7"];
    let stderr = expect_failure(&args, run_cli(&env, &args));
    assert!(stderr.contains("Nothing to update"));
}

#[test]
fn test_mark_read_needs_id_or_all() {
    let env = TestEnv::new("http://127.0.0.1:8000");
    let args = ["notifications", "mark-read"];
    let output = run_cli(&env, &args);
    assert!(!output.status.success());
    // clap usage errors exit with 2
    assert_eq!(output.status.code(), Some(2));
}
