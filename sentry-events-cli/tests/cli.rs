use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};

const BIN: &str = "get-sentry-event-data";

fn tool(api_base: Option<&str>, token: Option<&str>) -> Command {
    let mut cmd = Command::cargo_bin(BIN).expect("binary");
    cmd.env_remove("SENTRY_API_TOKEN")
        .env_remove("SENTRY_API_URL")
        .env_remove("SENTRY_EVENTS_CONCURRENCY")
        .env_remove("SENTRY_EVENTS_TIMEOUT")
        .env_remove("SENTRY_EVENTS_CTXOUT")
        .env_remove("RUST_LOG");
    if let Some(token) = token {
        cmd.env("SENTRY_API_TOKEN", token);
    }
    if let Some(api_base) = api_base {
        cmd.env("SENTRY_API_URL", api_base);
    }
    cmd
}

fn api_base(server: &MockServer) -> String {
    format!("{}/api/0/", server.base_url())
}

#[test]
fn help_lists_options() {
    tool(None, None)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--pages"))
        .stdout(predicate::str::contains("--organisation"))
        .stdout(predicate::str::contains("--project-name"))
        .stdout(predicate::str::contains("--extended-event"));
}

#[test]
fn version_flag() {
    tool(None, None)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("3.0.0"));
}

#[test]
fn missing_token_fails_before_any_request() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!([]));
    });

    tool(Some(&api_base(&server)), None)
        .arg("42")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("SENTRY_API_TOKEN"));
    any.assert_calls(0);
}

#[test]
fn ctx_out_prints_redacted_context() {
    tool(Some("http://127.0.0.1:9/api/0/"), Some("very-secret"))
        .env("SENTRY_EVENTS_CTXOUT", "1")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Context:"))
        .stderr(predicate::str::contains("http://127.0.0.1:9/api/0/"))
        .stderr(predicate::str::contains("very-secret").not());
}

#[test]
fn missing_event_id_fails() {
    tool(None, Some("token"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("You must specify an event ID"));
}

#[test]
fn extended_mode_without_project_fails_before_any_request() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!([]));
    });

    tool(Some(&api_base(&server)), Some("token"))
        .args(["--extended-event", "--organisation", "acme", "42"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("organisation and a project name"));
    any.assert_calls(0);
}

#[test]
fn prints_formatted_events() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET)
            .path("/api/0/issues/42/events/")
            .header("authorization", "Bearer token")
            .query_param_missing("cursor");
        then.status(200)
            .header(
                "link",
                r#"<u>; rel="previous"; cursor="0:0:1", <v>; rel="next"; results="true"; cursor="0:100:0""#,
            )
            .json_body(json!([
                {
                    "eventID": "a",
                    "dateCreated": "2019-03-01T10:00:00Z",
                    "tags": [
                        {"key": "env", "value": "prod"},
                        {"key": "url", "value": "/x"},
                        {"key": "url", "value": "/y"}
                    ]
                }
            ]));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/api/0/issues/42/events/")
            .query_param("cursor", "0:100:0");
        then.status(200).json_body(json!([
            {"eventID": "b", "dateCreated": "2019-03-02T10:00:00Z", "tags": []}
        ]));
    });

    let output = tool(Some(&api_base(&server)), Some("token"))
        .args(["--pages", "2", "42"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(
        value,
        json!([
            {"dateCreated": "2019-03-01T10:00:00Z", "tags": {"env": "prod", "url": ["/x", "/y"]}},
            {"dateCreated": "2019-03-02T10:00:00Z", "tags": {}}
        ])
    );
    listing.assert_calls(1);
    second.assert_calls(1);
}

#[test]
fn extended_mode_prints_context() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/0/issues/42/events/");
        then.status(200).json_body(json!([
            {"eventID": "a", "dateCreated": "2019-03-01T10:00:00Z", "tags": []}
        ]));
    });
    let detail = server.mock(|when, then| {
        when.method(GET).path("/api/0/projects/acme/web/events/a/");
        then.status(200).json_body(json!({
            "eventID": "a",
            "dateCreated": "2019-03-01T10:00:00Z",
            "dateReceived": "2019-03-01T10:00:05Z",
            "tags": [{"key": "level", "value": "error"}],
            "context": {"order_id": 1234}
        }));
    });

    let output = tool(Some(&api_base(&server)), Some("token"))
        .args(["-x", "-o", "acme", "-n", "web", "42"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(
        value,
        json!([{
            "dateCreated": "2019-03-01T10:00:00Z",
            "tags": {"level": "error"},
            "dateReceived": "2019-03-01T10:00:05Z",
            "context": {"order_id": 1234}
        }])
    );
    detail.assert_calls(1);
}

#[test]
fn api_failure_exits_non_zero_without_output() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/0/issues/42/events/");
        then.status(401).json_body(json!({"detail": "Invalid token"}));
    });

    tool(Some(&api_base(&server)), Some("bad"))
        .arg("42")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("401"));
}
