// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Gate Function Handler
//!
//! Forwards the invocation event to the OPA sidecar and maps the boolean
//! `allow` decision onto an HTTP-style response.
//!
//! # Architecture
//!
//! - **Layer:** Presentation
//! - **Purpose:** Response Mapping for the gate policy
//! - **Integration:** Lambda runtime → Authorizer → OPA sidecar

use lambda_runtime::LambdaEvent;
use opa_gate_core::application::Authorizer;
use opa_gate_core::domain::decision::{GateResponse, PolicyError};
use serde_json::Value;
use tracing::info;

/// Policy package evaluated for every invocation.
pub const POLICY_PACKAGE: &str = "lambda_extension_test";

/// Rule within the package that yields the allow decision.
pub const POLICY_RULE: &str = "allow";

/// Handle one invocation: evaluate the gate policy and shape the response.
///
/// Policy errors are returned, not mapped to a response; the platform records
/// the invocation failure.
pub async fn function_handler(
    authorizer: &Authorizer,
    event: LambdaEvent<Value>,
) -> Result<GateResponse, PolicyError> {
    let (payload, context) = event.into_parts();

    let decision = authorizer.authorize(&payload).await?;

    info!(
        request_id = %context.request_id,
        allowed = decision.is_allowed(),
        "policy decision"
    );

    Ok(GateResponse::from(decision))
}
