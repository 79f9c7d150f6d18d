// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # OPA Gate Function
//!
//! Lambda entry point that authorizes invocation events against the OPA
//! sidecar listening on the loopback interface.
//!
//! ## Architecture
//!
//! - **Cold start**: initialize logging, build the `OpaClient` from the
//!   environment, probe sidecar health, construct the `Authorizer` once
//! - **Per invocation**: one policy query, one response; errors propagate to
//!   the platform as invocation failures

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{info, warn};

use opa_gate_core::application::Authorizer;
use opa_gate_core::infrastructure::opa::OpaClient;
use opa_gate_function::handler::{function_handler, POLICY_PACKAGE, POLICY_RULE};

/// Environment variable overriding the log filter ahead of `RUST_LOG`.
const LOG_LEVEL_ENV: &str = "GATE_LOG_LEVEL";

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging()?;

    // One client and authorizer per container lifecycle
    let client = OpaClient::from_env();

    match client.health().await {
        Ok(()) => info!("OPA sidecar is healthy"),
        Err(e) => warn!("OPA sidecar health probe failed: {e}"),
    }

    let authorizer = Authorizer::new(client, POLICY_PACKAGE).with_rule(POLICY_RULE);
    let authorizer = &authorizer;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        let response = function_handler(authorizer, event).await?;
        Ok::<_, Error>(response)
    }))
    .await
}

/// Initialize tracing subscriber for logging
///
/// Filter precedence: `GATE_LOG_LEVEL`, then `RUST_LOG`, then `info`.
fn init_logging() -> Result<(), Error> {
    let filter = match std::env::var(LOG_LEVEL_ENV) {
        Ok(level) => tracing_subscriber::EnvFilter::try_new(level)?,
        Err(_) => tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
