//! CLI tests against a mock backend.
//!
//! Each test runs the `quill` binary against a wiremock server with its own
//! credential file, so state carried between invocations goes through the
//! file store exactly as it would for a user.

mod common;

use common::{TestEnv, expect_failure, expect_success, run_cli_async};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn post_json(id: u64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "slug": format!("post-{}", id),
        "author": "alice",
        "title": title,
        "content": "Body",
        "category": null,
        "tags": [],
        "summary": null,
        "tags_suggested": ["rust"],
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
        "like_count": 0,
        "comment_count": 0
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_persists_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/"))
        .and(body_json(json!({"username": "alice", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "T1",
            "refresh": "R1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    let args = ["login", "--username", "alice", "--password", "hunter2"];
    expect_success(&args, run_cli_async(&env, &args).await);

    let stored = env.stored_credentials();
    assert_eq!(stored["access"], "T1");
    assert_eq!(stored["refresh"], "R1");
    assert_eq!(stored["username"], "alice");

    let stdout = expect_success(&["whoami"], run_cli_async(&env, &["whoami"]).await);
    assert_eq!(stdout.trim(), "alice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_with_wrong_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    let args = ["login", "--username", "alice", "--password", "nope"];
    let stderr = expect_failure(&args, run_cli_async(&env, &args).await);

    assert!(stderr.contains("invalid credentials"));
    assert!(!env.store_path().exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_expired_token_is_refreshed_and_saved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/posts/"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [post_json(1, "First")]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.seed_credentials("T1", "R1", "alice");

    let args = ["posts", "list"];
    let stdout = expect_success(&args, run_cli_async(&env, &args).await);
    let post: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(post["title"], "First");
    assert_eq!(env.stored_credentials()["access"], "T2");

    // The next run starts with the refreshed token.
    expect_success(&args, run_cli_async(&env, &args).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rejected_refresh_surfaces_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/7/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is blacklisted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.seed_credentials("T1", "R1", "alice");

    let args = ["posts", "get", "7"];
    let stderr = expect_failure(&args, run_cli_async(&env, &args).await);

    assert!(stderr.contains("HTTP 401"));
    assert!(stderr.contains("Given token not valid"));
    assert_eq!(env.stored_credentials()["access"], "T1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_posts_query_flags() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/"))
        .and(query_param("search", "jwt"))
        .and(query_param("ordering", "-created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": format!("{}/api/posts/?page=2", server.uri()),
            "previous": null,
            "results": [post_json(1, "One"), post_json(2, "Two")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    let args = [
        "posts",
        "list",
        "--search",
        "jwt",
        "--ordering",
        "-created_at",
    ];
    let output = run_cli_async(&env, &args).await;
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let stdout = expect_success(&args, output);

    assert_eq!(stdout.lines().count(), 2);
    assert!(stderr.contains("--page 2"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_create_post_and_comment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/posts/"))
        .and(header("authorization", "Bearer T1"))
        .and(body_json(json!({
            "title": "Hello",
            "content": "World",
            "tags": ["rust", "cli"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json(5, "Hello")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/posts/5/comments/"))
        .and(body_json(json!({"content": "First!"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "post": 5,
            "author": "alice",
            "content": "First!",
            "created_at": "2024-05-01T10:05:00Z",
            "updated_at": "2024-05-01T10:05:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.seed_credentials("T1", "R1", "alice");

    let args = [
        "posts", "create", "--title", "Hello", "--content", "World", "--tags", "rust, cli",
    ];
    let output = run_cli_async(&env, &args).await;
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    expect_success(&args, output);
    assert!(stderr.contains("Suggested tags: rust"));

    let args = ["comments", "add", "5", "--content", "  First!  "];
    expect_success(&args, run_cli_async(&env, &args).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_post_needs_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/posts/5/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/posts/6/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "You do not have permission to perform this action."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.seed_credentials("T1", "R1", "alice");

    let args = ["posts", "delete", "5"];
    expect_success(&args, run_cli_async(&env, &args).await);

    let args = ["posts", "delete", "6"];
    let stderr = expect_failure(&args, run_cli_async(&env, &args).await);
    assert!(stderr.contains("You do not have permission"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_notifications_count_and_mark_all() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/unread/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 4,
            "next": null,
            "previous": null,
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/notifications/mark_read/"))
        .and(body_json(json!({"all": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.seed_credentials("T1", "R1", "alice");

    let args = ["notifications", "count"];
    let stdout = expect_success(&args, run_cli_async(&env, &args).await);
    assert_eq!(stdout.trim(), "4");

    let args = ["notifications", "mark-read", "--all"];
    expect_success(&args, run_cli_async(&env, &args).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_explicit_refresh_token_command() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T9"})))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.seed_credentials("T1", "R1", "alice");

    let args = ["refresh-token"];
    expect_success(&args, run_cli_async(&env, &args).await);
    assert_eq!(env.stored_credentials()["access"], "T9");
    assert_eq!(env.stored_credentials()["refresh"], "R1");
}
