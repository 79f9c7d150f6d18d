// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Handler tests for the gate function.
//!
//! Exercises the full invocation path with a mockito server standing in for
//! the OPA sidecar: event in, policy query out, HTTP-shaped response back.

use lambda_runtime::{Context, LambdaEvent};
use mockito::{Matcher, Server};
use opa_gate_core::application::Authorizer;
use opa_gate_core::infrastructure::opa::OpaClient;
use opa_gate_function::handler::{function_handler, POLICY_PACKAGE, POLICY_RULE};
use serde_json::json;

fn authorizer_for(server: &Server) -> Authorizer {
    Authorizer::new(OpaClient::new(server.url()), POLICY_PACKAGE).with_rule(POLICY_RULE)
}

#[tokio::test]
async fn test_allowed_event_returns_200() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/data/lambda_extension_test/allow")
        .match_body(Matcher::Json(json!({"input": {"user": "alice"}})))
        .with_status(200)
        .with_body(r#"{"result": true}"#)
        .create_async()
        .await;

    let authorizer = authorizer_for(&server);
    let event = LambdaEvent::new(json!({"user": "alice"}), Context::default());

    let response = function_handler(&authorizer, event).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"allow":true}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_denied_event_returns_403() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/data/lambda_extension_test/allow")
        .match_body(Matcher::Json(json!({"input": {"user": "bob"}})))
        .with_status(200)
        .with_body(r#"{"result": false}"#)
        .create_async()
        .await;

    let authorizer = authorizer_for(&server);
    let event = LambdaEvent::new(json!({"user": "bob"}), Context::default());

    let response = function_handler(&authorizer, event).await.unwrap();

    assert_eq!(response.status_code, 403);
    assert_eq!(response.body, r#"{"allow":false}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_sidecar_fails_the_invocation() {
    let authorizer =
        Authorizer::new(OpaClient::new("http://127.0.0.1:1"), POLICY_PACKAGE).with_rule(POLICY_RULE);
    let event = LambdaEvent::new(json!({"user": "alice"}), Context::default());

    let result = function_handler(&authorizer, event).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_response_survives_runtime_serialization() {
    // The runtime serializes the handler's return value; the wire shape must
    // keep the camelCase statusCode and the stringified body.
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/data/lambda_extension_test/allow")
        .with_status(200)
        .with_body(r#"{"result": true}"#)
        .create_async()
        .await;

    let authorizer = authorizer_for(&server);
    let event = LambdaEvent::new(json!({}), Context::default());

    let response = function_handler(&authorizer, event).await.unwrap();
    let wire = serde_json::to_value(&response).unwrap();

    assert_eq!(wire, json!({"statusCode": 200, "body": "{\"allow\":true}"}));
}
