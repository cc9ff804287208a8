use std::time::Duration;

use serde_json::json;

use super::super::session::SessionRunner;
use super::run_async_test;
use super::support::{ScriptedExecutor, request_email, status_result, timeout_result};
use crate::args::HttpMethod;
use crate::http::{NO_RESPONSE_STATUS, Payload};
use crate::load::{
    ExistingUser, LoadEvent, LoadTestConfig, MemoryEventSink, RequestStep, UserMetrics, UserSeed,
};

fn config() -> LoadTestConfig {
    let mut config = LoadTestConfig::new("http://svc.test", "/api/v1/profile", HttpMethod::Get);
    config.delay = Duration::from_millis(1);
    config
}

async fn run_session(
    config: &LoadTestConfig,
    executor: &ScriptedExecutor,
    events: &MemoryEventSink,
    seed: UserSeed,
) -> UserMetrics {
    SessionRunner::new(config, executor, events).run(seed).await
}

fn steps(metrics: &UserMetrics) -> Vec<RequestStep> {
    metrics.requests.iter().map(|record| record.step).collect()
}

#[test]
fn new_user_runs_full_chain() -> Result<(), String> {
    run_async_test(async {
        let config = config();
        let executor = ScriptedExecutor::new(10.0);
        let events = MemoryEventSink::new();
        let metrics = run_session(
            &config,
            &executor,
            &events,
            UserSeed::New { numeric_id: 101 },
        )
        .await;

        let expected = vec![
            RequestStep::Registration,
            RequestStep::Login,
            RequestStep::AuthenticatedTarget,
        ];
        if steps(&metrics) != expected {
            return Err(format!("Unexpected steps: {:?}", steps(&metrics)));
        }
        if metrics.user_id != "101" || !metrics.email.starts_with("sim_user_101@") {
            return Err(format!(
                "Unexpected identity: {} / {}",
                metrics.user_id, metrics.email
            ));
        }
        let expected_token = format!("tok-{}", metrics.email);
        if metrics.token.as_deref() != Some(expected_token.as_str()) {
            return Err(format!("Unexpected token: {:?}", metrics.token));
        }
        if !events.events().is_empty() {
            return Err("No events expected".to_owned());
        }

        let calls = executor.calls();
        let urls: Vec<&str> = calls.iter().map(|call| call.url.as_str()).collect();
        if urls
            != [
                "http://svc.test/api/v1/register",
                "http://svc.test/api/v1/login",
                "http://svc.test/api/v1/profile",
            ]
        {
            return Err(format!("Unexpected urls: {:?}", urls));
        }
        let target = calls.get(2).ok_or("Missing target call")?;
        let expected_header = ("Authorization".to_owned(), format!("Bearer {}", expected_token));
        if target.headers != vec![expected_header] {
            return Err(format!("Unexpected target headers: {:?}", target.headers));
        }
        if target.method != HttpMethod::Get {
            return Err(format!("Unexpected target method: {}", target.method));
        }
        Ok(())
    })
}

#[test]
fn registration_payload_carries_generated_identity() -> Result<(), String> {
    run_async_test(async {
        let config = config();
        let executor = ScriptedExecutor::new(10.0);
        let events = MemoryEventSink::new();
        let metrics = run_session(&config, &executor, &events, UserSeed::New { numeric_id: 7 }).await;

        let registration = metrics.requests.first().ok_or("Missing registration")?;
        if registration.method != HttpMethod::Post {
            return Err(format!("Unexpected method: {}", registration.method));
        }
        if registration.payload.get("username") != Some(&json!("sim_user_7")) {
            return Err(format!("Unexpected payload: {}", registration.payload));
        }
        if registration.payload.get("id") != Some(&json!(7)) {
            return Err(format!("Missing id: {}", registration.payload));
        }
        let login = metrics.requests.get(1).ok_or("Missing login")?;
        if login.payload.get("email") != registration.payload.get("email")
            || login.payload.get("password") != registration.payload.get("password")
        {
            return Err("Login must reuse the registered credentials".to_owned());
        }
        if login.payload.get("username").is_some() {
            return Err("Login payload should only carry email and password".to_owned());
        }
        Ok(())
    })
}

#[test]
fn registration_failure_stops_chain() -> Result<(), String> {
    run_async_test(async {
        let config = config();
        let executor = ScriptedExecutor::new(10.0).with_rule(|request| {
            request
                .url
                .ends_with("/register")
                .then(|| status_result(409, 12.0))
        });
        let events = MemoryEventSink::new();
        let metrics = run_session(
            &config,
            &executor,
            &events,
            UserSeed::New { numeric_id: 5 },
        )
        .await;

        if steps(&metrics) != vec![RequestStep::Registration] {
            return Err(format!("Unexpected steps: {:?}", steps(&metrics)));
        }
        let record = metrics.requests.first().ok_or("Missing record")?;
        if record.success || record.status_code != 409 {
            return Err(format!("Unexpected record: {:?}", record));
        }
        if executor.calls().len() != 1 {
            return Err("No further requests expected".to_owned());
        }
        if metrics.token.is_some() {
            return Err("Token must not be set".to_owned());
        }
        Ok(())
    })
}

#[test]
fn login_failure_emits_event_and_stops_chain() -> Result<(), String> {
    run_async_test(async {
        let config = config();
        let executor = ScriptedExecutor::new(10.0)
            .with_rule(|request| request.url.ends_with("/login").then(|| status_result(401, 8.0)));
        let events = MemoryEventSink::new();
        let metrics = run_session(
            &config,
            &executor,
            &events,
            UserSeed::New { numeric_id: 102 },
        )
        .await;

        if steps(&metrics) != vec![RequestStep::Registration, RequestStep::Login] {
            return Err(format!("Unexpected steps: {:?}", steps(&metrics)));
        }
        let expected = vec![LoadEvent::LoginFailed {
            user: "102".to_owned(),
            status_code: 401,
            error_detail: "No response data".to_owned(),
        }];
        if events.events() != expected {
            return Err(format!("Unexpected events: {:?}", events.events()));
        }
        Ok(())
    })
}

#[test]
fn login_without_token_is_a_failure() -> Result<(), String> {
    run_async_test(async {
        let config = config();
        let executor = ScriptedExecutor::new(10.0);
        let tokenless = executor.ok(json!({ "message": "welcome" }));
        let executor = executor.with_rule(move |request| {
            request.url.ends_with("/login").then(|| tokenless.clone())
        });
        let events = MemoryEventSink::new();
        let metrics = run_session(
            &config,
            &executor,
            &events,
            UserSeed::New { numeric_id: 3 },
        )
        .await;

        if steps(&metrics) != vec![RequestStep::Registration, RequestStep::Login] {
            return Err(format!("Unexpected steps: {:?}", steps(&metrics)));
        }
        let login = metrics.requests.get(1).ok_or("Missing login")?;
        if !login.success {
            return Err("The login request itself succeeded".to_owned());
        }
        match events.events().as_slice() {
            [LoadEvent::LoginFailed {
                status_code: 200,
                error_detail,
                ..
            }] if error_detail.contains("token") => Ok(()),
            other => Err(format!("Unexpected events: {:?}", other)),
        }
    })
}

#[test]
fn login_transport_error_reports_executor_error() -> Result<(), String> {
    run_async_test(async {
        let config = config();
        let executor = ScriptedExecutor::new(10.0)
            .with_rule(|request| request.url.ends_with("/login").then(timeout_result));
        let events = MemoryEventSink::new();
        let metrics = run_session(
            &config,
            &executor,
            &events,
            UserSeed::New { numeric_id: 4 },
        )
        .await;

        let login = metrics.requests.get(1).ok_or("Missing login")?;
        if login.status_code != NO_RESPONSE_STATUS {
            return Err(format!("Unexpected status: {}", login.status_code));
        }
        match events.events().as_slice() {
            [LoadEvent::LoginFailed {
                status_code: -1,
                error_detail,
                ..
            }] if error_detail.contains("timed out") => Ok(()),
            other => Err(format!("Unexpected events: {:?}", other)),
        }
    })
}

#[test]
fn existing_user_skips_registration() -> Result<(), String> {
    run_async_test(async {
        let config = config();
        let executor = ScriptedExecutor::new(10.0);
        let events = MemoryEventSink::new();
        let seed = UserSeed::Existing(ExistingUser {
            email: "ada@example.org".to_owned(),
            password: "secret".to_owned(),
        });
        let metrics = run_session(&config, &executor, &events, seed).await;

        if steps(&metrics) != vec![RequestStep::Login, RequestStep::AuthenticatedTarget] {
            return Err(format!("Unexpected steps: {:?}", steps(&metrics)));
        }
        if metrics.user_id != "ada@example.org" || metrics.email != "ada@example.org" {
            return Err(format!("Unexpected identity: {}", metrics.user_id));
        }
        let login_call = executor.calls();
        let login_call = login_call.first().ok_or("Missing login call")?;
        if request_email(login_call).as_deref() != Some("ada@example.org") {
            return Err("Login must use the supplied email".to_owned());
        }
        Ok(())
    })
}

#[test]
fn target_failure_is_recorded_and_chain_completes() -> Result<(), String> {
    run_async_test(async {
        let config = config();
        let executor = ScriptedExecutor::new(10.0).with_rule(|request| {
            request
                .url
                .ends_with("/profile")
                .then(|| status_result(500, 30.0))
        });
        let events = MemoryEventSink::new();
        let metrics = run_session(
            &config,
            &executor,
            &events,
            UserSeed::New { numeric_id: 9 },
        )
        .await;

        let target = metrics.requests.get(2).ok_or("Missing target record")?;
        if target.step != RequestStep::AuthenticatedTarget || target.success {
            return Err(format!("Unexpected target record: {:?}", target));
        }
        if target.status_code != 500 {
            return Err(format!("Unexpected status: {}", target.status_code));
        }
        if !events.events().is_empty() {
            return Err("Target failures are not login failures".to_owned());
        }
        Ok(())
    })
}

#[test]
fn target_uses_configured_method_payload_and_token_format() -> Result<(), String> {
    run_async_test(async {
        let mut config = config();
        config.http_method = HttpMethod::Put;
        config.auth_header_key = "X-Api-Key".to_owned();
        config.auth_token_format = "ApiKey {token}".to_owned();
        config.target_payload = Some(Payload::Json(json!({ "name": "demo" })));
        let executor = ScriptedExecutor::new(10.0);
        let events = MemoryEventSink::new();
        let seed = UserSeed::Existing(ExistingUser {
            email: "grace@example.org".to_owned(),
            password: "pw".to_owned(),
        });
        let metrics = run_session(&config, &executor, &events, seed).await;

        let target = metrics.requests.get(1).ok_or("Missing target record")?;
        if target.method != HttpMethod::Put || target.payload != json!({ "name": "demo" }) {
            return Err(format!("Unexpected target record: {:?}", target));
        }
        let calls = executor.calls();
        let call = calls.get(1).ok_or("Missing target call")?;
        let expected = vec![(
            "X-Api-Key".to_owned(),
            "ApiKey tok-grace@example.org".to_owned(),
        )];
        if call.headers != expected {
            return Err(format!("Unexpected headers: {:?}", call.headers));
        }
        if call.timeout != config.request_timeout {
            return Err("Timeout must be passed to the executor".to_owned());
        }
        Ok(())
    })
}
