//! Canned GitHub REST responses for a single pull request.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OWNER: &str = "octo";
pub const REPO: &str = "repo";
pub const HEAD_SHA: &str = "abc123";

/// Fixed wall-clock origin used with `ManualClock` so rate limit resets can
/// be expressed relative to it.
pub const CLOCK_ORIGIN: u64 = 1_700_000_000;

pub fn pull_request_url(number: u64) -> String {
    format!("https://github.com/{OWNER}/{REPO}/pull/{number}")
}

fn pull_path(number: u64) -> String {
    format!("/repos/{OWNER}/{REPO}/pulls/{number}")
}

fn commit_path(resource: &str) -> String {
    format!("/repos/{OWNER}/{REPO}/commits/{HEAD_SHA}/{resource}")
}

/// Pull request payload in the given state.
pub fn pull_request(number: u64, state: &str, merged: bool) -> Value {
    json!({
        "number": number,
        "title": "Add status monitor",
        "user": {"login": "octocat", "id": 1},
        "state": state,
        "merged": merged,
        "draft": false,
        "head": {"sha": HEAD_SHA},
        "labels": [],
        "assignees": [],
        "comments": 0,
        "updated_at": "2025-01-02T03:04:05Z"
    })
}

pub fn changes_requested_review() -> Value {
    json!({
        "id": 1,
        "user": {"login": "alice"},
        "state": "CHANGES_REQUESTED",
        "submitted_at": "2025-01-01T00:00:00Z"
    })
}

pub fn check_run(status: &str, conclusion: Option<&str>) -> Value {
    json!({"id": 9, "name": "build", "status": status, "conclusion": conclusion})
}

/// Serves the pull request payload, once when `times` is set or forever
/// otherwise.
pub async fn mount_pull_request(
    server: &MockServer,
    number: u64,
    payload: Value,
    times: Option<u64>,
) {
    let mock = Mock::given(method("GET"))
        .and(path(pull_path(number)))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload));
    match times {
        Some(limit) => mock.up_to_n_times(limit).mount(server).await,
        None => mock.mount(server).await,
    }
}

/// Serves reviews, the combined status, and check runs for the head commit.
pub async fn mount_secondary(
    server: &MockServer,
    number: u64,
    reviews: Vec<Value>,
    check_runs: Vec<Value>,
) {
    Mock::given(method("GET"))
        .and(path(format!("{}/reviews", pull_path(number))))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(reviews)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(commit_path("status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "pending"})))
        .mount(server)
        .await;
    let check_runs_body = json!({"total_count": check_runs.len(), "check_runs": check_runs});
    Mock::given(method("GET"))
        .and(path(commit_path("check-runs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(check_runs_body))
        .mount(server)
        .await;
}

/// Answers the next pull request fetch with an exhausted rate limit.
pub async fn mount_rate_limit_once(server: &MockServer, number: u64, reset_at: u64) {
    Mock::given(method("GET"))
        .and(path(pull_path(number)))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-limit", "60")
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", reset_at.to_string())
                .set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// Answers every pull request fetch with 404.
pub async fn mount_not_found(server: &MockServer, number: u64) {
    Mock::given(method("GET"))
        .and(path(pull_path(number)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(server)
        .await;
}
