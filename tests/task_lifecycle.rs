//! End-to-end task lifecycle against a scripted gateway

mod common;

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use a2a_task_client::prelude::*;
use common::Gateway;
use futures::future::join_all;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

const AGENT: &str = agents::TARIFF_CALC;

fn envelope(code: &str, data: Value) -> (u16, Value) {
    (
        200,
        json!({
            "success": true,
            "code": code,
            "message": "",
            "data": data,
        }),
    )
}

/// Gateway walking one ice cream import through every lifecycle stage
fn ice_cream_gateway() -> Gateway {
    let polls = Arc::new(AtomicUsize::new(0));

    Gateway::new(move |endpoint, body| {
        assert_eq!(endpoint, format!("{}/run", AGENT));

        match body["mode"].as_str() {
            Some("run") if body.get("task_id").is_none() => envelope(
                "WAITING_USER",
                json!({
                    "task_id": "tsk_1",
                    "stage": "interpreting",
                    "content": "Which country of origin?"
                }),
            ),
            Some("run") => envelope(
                "TASK_ACCEPTED",
                json!({"task_id": body["task_id"], "stage": "executing"}),
            ),
            Some("status") => {
                let code = if polls.fetch_add(1, Ordering::SeqCst) == 0 {
                    "TASK_RUNNING"
                } else {
                    "TASK_COMPLETED"
                };
                envelope(code, json!({"task_id": body["task_id"], "stage": "executing"}))
            }
            Some("results") => envelope(
                "TASK_COMPLETED",
                json!({
                    "task_id": body["task_id"],
                    "stage": "completed",
                    "is_final": true,
                    "content": {
                        "type": "result",
                        "data": {"hs_code": "2105.00", "duty_usd": 172.5, "origin": "CN"}
                    }
                }),
            ),
            other => panic!("unexpected mode {:?}", other),
        }
    })
}

#[tokio::test]
async fn multi_round_task_keeps_its_task_id() {
    let gateway = ice_cream_gateway();
    let engine = gateway.client().agent(AGENT);

    let first = assert_ok!(engine.run("Import 100kg ice cream").await);
    assert_eq!(first.code, StatusCode::WaitingUser);
    assert!(engine.needs_user_input(&first.code));
    assert_eq!(first.user_prompt().as_deref(), Some("Which country of origin?"));
    let task_id = first.task_id().unwrap().to_string();

    let accepted = assert_ok!(
        engine
            .run(RunRequest::new("China").with_task_id(&task_id))
            .await
    );
    assert_eq!(accepted.code, StatusCode::TaskAccepted);
    assert_eq!(accepted.task_id(), Some(task_id.as_str()));

    let running = assert_ok!(engine.status(&task_id).await);
    assert_eq!(running.code, StatusCode::TaskRunning);
    assert_eq!(running.run_status(), RunStatus::InProgress);

    let completed = assert_ok!(engine.status(&task_id).await);
    assert!(completed.is_finished());
    assert_eq!(completed.task_id(), Some(task_id.as_str()));

    let results = assert_ok!(engine.results(&task_id).await);
    assert_eq!(results.task_id(), Some(task_id.as_str()));
    let data = results.content().and_then(Content::result_data).unwrap();
    assert_eq!(data["hs_code"], "2105.00");

    let bodies = gateway.bodies();
    assert_eq!(bodies.len(), 5);
    assert_eq!(bodies[1]["task_id"], "tsk_1");
    assert_eq!(bodies[1]["text"], "China");
}

#[tokio::test]
async fn repeated_results_are_identical() {
    let gateway = ice_cream_gateway();
    let engine = gateway.client().agent(AGENT);

    let mut contents = Vec::new();
    for _ in 0..3 {
        let envelope = assert_ok!(engine.results("tsk_1").await);
        contents.push(serde_json::to_vec(&envelope.content()).unwrap());
    }

    assert!(contents.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn status_and_results_need_a_task_id() {
    let gateway = ice_cream_gateway();
    let engine = gateway.client().agent(AGENT);

    let err = assert_err!(engine.status("").await);
    assert_eq!(err.kind, ErrorKind::InvalidRequest);
    assert_eq!(err.api_code, "INVALID_REQUEST");

    let err = assert_err!(engine.results("").await);
    assert_eq!(err.message, "task_id is required");

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn continuation_may_omit_text() {
    let gateway = ice_cream_gateway();
    let engine = gateway.client().agent(AGENT);

    let envelope = assert_ok!(engine.run(RunRequest::new("").with_task_id("tsk_1")).await);
    assert_eq!(envelope.code, StatusCode::TaskAccepted);

    let err = assert_err!(engine.run("").await);
    assert_eq!(err.kind, ErrorKind::InvalidRequest);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn rate_limit_without_body() {
    let gateway = Gateway::new(|_, _| (429, Value::Null));
    let client = gateway.client();

    let err = assert_err!(client.run(AGENT, "Import 100kg ice cream").await);
    assert_eq!(err.kind, ErrorKind::RateLimited);
    assert_eq!(err.api_code, "RATE_LIMITED");
    assert_eq!(err.http_status, Some(429));
    assert_eq!(err.host_error_type(), "rate_limit_error");
}

#[tokio::test]
async fn structured_error_body_wins() {
    let gateway = Gateway::new(|_, _| {
        (
            402,
            json!({
                "success": false,
                "code": "INSUFFICIENT_CREDITS",
                "message": "Balance too low for this agent",
                "errors": {"required": 5, "available": 1}
            }),
        )
    });

    let err = assert_err!(gateway.client().status(AGENT, "tsk_1").await);
    assert_eq!(err.kind, ErrorKind::PaymentRequired);
    assert_eq!(err.message, "Balance too low for this agent");
    assert_eq!(err.details.unwrap()["available"], 1);
}

#[tokio::test]
async fn failed_task_surfaces_as_error() {
    let gateway = Gateway::new(|_, _| {
        (
            200,
            json!({
                "success": false,
                "code": "TASK_FAILED",
                "message": "Upstream tariff service unavailable",
                "data": {"task_id": "tsk_1", "stage": "executing"}
            }),
        )
    });

    let err = assert_err!(gateway.client().results(AGENT, "tsk_1").await);
    assert_eq!(err.api_code, "TASK_FAILED");
    assert_eq!(err.kind, ErrorKind::ServerError);
}

#[tokio::test]
async fn unknown_codes_pass_through() {
    let gateway = Gateway::new(|_, _| envelope("TASK_PAUSED", json!({"task_id": "tsk_1"})));

    let envelope = assert_ok!(gateway.client().status(AGENT, "tsk_1").await);
    assert_eq!(envelope.code, StatusCode::Unknown("TASK_PAUSED".into()));
    assert_eq!(envelope.run_status(), RunStatus::InProgress);
    assert!(!envelope.needs_user_input());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let gateway = Gateway::new(|_, _| (200, json!("<html>maintenance</html>")));

    let err = assert_err!(gateway.client().status(AGENT, "tsk_1").await);
    assert_eq!(err.kind, ErrorKind::DecodeError);
}

#[tokio::test]
async fn concurrent_manifest_lookups_fetch_once() {
    let gateway = Gateway::new(|endpoint, _| {
        assert_eq!(endpoint, format!("{}/manifest", AGENT));
        (
            200,
            json!({
                "name": "Tariff Calculator",
                "description": "Computes import duties for a shipment",
                "input_schema": {"type": "object"},
                "pricing": {"unit": "credits", "per_run": 2.0},
                "capabilities": ["run", "status", "results", "streaming"]
            }),
        )
    })
    .with_latency(Duration::from_millis(50));
    let client = gateway.client();

    let lookups = (0..16).map(|_| {
        let client = client.clone();
        tokio::spawn(async move { client.manifest(AGENT).await })
    });
    let manifests: Vec<_> = join_all(lookups)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(gateway.calls(), 1);
    assert!(manifests.iter().all(|m| Arc::ptr_eq(m, &manifests[0])));
    assert!(manifests[0].capabilities.streaming);

    let tool = assert_ok!(client.tool(AGENT).await);
    assert_eq!(tool.name, "Tariff Calculator");
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn manifest_failure_is_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = attempts.clone();
    let gateway = Gateway::new(move |_, _| {
        if seen.fetch_add(1, Ordering::SeqCst) == 0 {
            (503, Value::Null)
        } else {
            (200, json!({"name": "Tariff Calculator", "description": "Duties"}))
        }
    });
    let client = gateway.client();

    let err = assert_err!(client.manifest(AGENT).await);
    assert_eq!(err.api_code, "SERVER_ERROR");

    let manifest = assert_ok!(client.manifest(AGENT).await);
    assert_eq!(manifest.name, "Tariff Calculator");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
