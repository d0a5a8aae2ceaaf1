//! End-to-end monitoring runs against a mock GitHub API.

mod support;

use prwatch::monitor::{ManualClock, monitor_with_clock};
use prwatch::progress::RecordingProgressSink;
use prwatch::{GatewayOptions, MonitorReport, MonitorRequest, PersonalAccessToken};
use rstest::{fixture, rstest};
use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::github_api::{
    CLOCK_ORIGIN, check_run, mount_pull_request, mount_secondary, pull_request, pull_request_url,
};

struct Api {
    server: MockServer,
    clock: ManualClock,
    progress: RecordingProgressSink,
}

impl Api {
    fn options(&self, token: Option<&str>) -> GatewayOptions {
        GatewayOptions::new(token.and_then(PersonalAccessToken::new))
            .with_api_base(self.server.uri())
    }

    async fn run(&self, request: &MonitorRequest, options: &GatewayOptions) -> MonitorReport {
        monitor_with_clock(request, options, &self.progress, &self.clock).await
    }
}

#[fixture]
async fn api() -> Api {
    Api {
        server: MockServer::start().await,
        clock: ManualClock::starting_at(CLOCK_ORIGIN),
        progress: RecordingProgressSink::default(),
    }
}

#[rstest]
#[tokio::test]
async fn failing_checks_report_unsuccessful_completion(#[future] api: Api) {
    let fixture = api.await;
    mount_pull_request(&fixture.server, 5, pull_request(5, "open", false), None).await;
    mount_secondary(
        &fixture.server,
        5,
        Vec::new(),
        vec![check_run("completed", Some("failure"))],
    )
    .await;

    let request = MonitorRequest::new(pull_request_url(5));
    let report = fixture.run(&request, &fixture.options(None)).await;

    let json = serde_json::to_value(&report).expect("report should serialise");
    assert_eq!(json.get("success"), Some(&Value::Bool(false)));
    assert_eq!(
        json.get("reason").and_then(Value::as_str),
        Some("checks_complete")
    );
    assert_eq!(json.get("checks_passed"), Some(&Value::Bool(false)));
    assert_eq!(json.get("poll_count").and_then(Value::as_u64), Some(1));
    assert!(
        json.get("status_code").is_none(),
        "completed checks carry no status code"
    );
    let status = json.get("final_status").expect("final status present");
    assert_eq!(status.get("number").and_then(Value::as_u64), Some(5));
    assert_eq!(
        status.get("head_sha").and_then(Value::as_str),
        Some("abc123")
    );

    assert_eq!(
        fixture.progress.messages(),
        vec![
            "Starting monitor for octo/repo#5".to_owned(),
            "Connected (unauthenticated)".to_owned(),
            "Poll #1: open | Checks: complete | Reviews: none".to_owned(),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn token_is_sent_as_bearer_credentials(#[future] api: Api) {
    let fixture = api.await;
    // Only authenticated requests are answered; anything else 404s.
    let guarded = Mock::given(method("GET"))
        .and(path("/repos/octo/repo/pulls/8"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pull_request(8, "closed", false)));
    fixture.server.register(guarded).await;
    mount_secondary(&fixture.server, 8, Vec::new(), Vec::new()).await;

    let request = MonitorRequest::new(pull_request_url(8));
    let report = fixture
        .run(&request, &fixture.options(Some("  secret-token ")))
        .await;

    let outcome = report.outcome().expect("session should finish");
    assert!(outcome.success, "unexpected outcome {outcome:?}");
    assert_eq!(outcome.reason.as_str(), "closed");
    assert!(
        fixture
            .progress
            .messages()
            .contains(&"Connected (authenticated)".to_owned())
    );
}
