// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! OPA Sidecar Client
//!
//! This module provides infrastructure for querying an Open Policy Agent
//! sidecar over its Data API.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Evaluate named policy documents against caller input
//! - **Integration:** Function handler → local OPA HTTP API
//!
//! # Usage
//!
//! ```ignore
//! use opa_gate_core::infrastructure::opa::OpaClient;
//!
//! let client = OpaClient::from_env();
//! let decision = client.decide("lambda_extension_test", Some("allow"), &input).await?;
//! ```

use crate::domain::decision::{Decision, PolicyError};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Default address of the OPA sidecar.
pub const DEFAULT_OPA_ADDR: &str = "http://127.0.0.1:8181";

/// Environment variable overriding the sidecar address.
pub const OPA_ADDR_ENV: &str = "OPA_ADDR";

/// Wrapper the Data API expects around the caller input.
#[derive(Serialize)]
struct DataQuery<'a> {
    input: &'a Value,
}

pub struct OpaClient {
    /// Base URL of the sidecar, without a trailing slash
    base_url: String,

    /// HTTP client, reused across invocations
    client: Client,
}

impl OpaClient {
    /// Create a client for a sidecar at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client from the environment, falling back to the sidecar default.
    pub fn from_env() -> Self {
        let addr =
            std::env::var(OPA_ADDR_ENV).unwrap_or_else(|_| DEFAULT_OPA_ADDR.to_string());
        Self::new(addr)
    }

    /// Build the Data API URL for a package and optional rule.
    fn data_url(&self, package: &str, rule: Option<&str>) -> String {
        let mut url = format!("{}/v1/data/{}", self.base_url, package);
        if let Some(rule) = rule {
            url.push('/');
            url.push_str(rule);
        }
        url
    }

    /// Query a policy document and return the raw `result` value.
    ///
    /// The input event is posted unmodified inside `{"input": <input>}`.
    /// Network failures, non-success statuses, and unparseable bodies all
    /// propagate; there is no retry and no fallback decision.
    pub async fn query_raw(
        &self,
        package: &str,
        rule: Option<&str>,
        input: &Value,
    ) -> Result<Value, PolicyError> {
        let url = self.data_url(package, rule);

        let response = self
            .client
            .post(&url)
            .json(&DataQuery { input })
            .send()
            .await
            .map_err(|e| PolicyError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PolicyError::Service { status, body });
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| PolicyError::MalformedResponse(e.to_string()))?;

        // An absent `result` is OPA's "undefined decision" for the path
        match document.get("result") {
            Some(result) => Ok(result.clone()),
            None => Err(PolicyError::Undefined),
        }
    }

    /// Query a policy rule and narrow the result to an allow/deny decision.
    pub async fn decide(
        &self,
        package: &str,
        rule: Option<&str>,
        input: &Value,
    ) -> Result<Decision, PolicyError> {
        let result = self.query_raw(package, rule, input).await?;

        match result.as_bool() {
            Some(allowed) => Ok(Decision::from_allowed(allowed)),
            None => Err(PolicyError::NotBoolean(result.to_string())),
        }
    }

    /// Probe the sidecar health endpoint.
    pub async fn health(&self) -> Result<(), PolicyError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PolicyError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(PolicyError::Service { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_with_rule() {
        let client = OpaClient::new("http://127.0.0.1:8181");
        let url = client.data_url("lambda_extension_test", Some("allow"));

        assert_eq!(url, "http://127.0.0.1:8181/v1/data/lambda_extension_test/allow");
    }

    #[test]
    fn test_data_url_without_rule() {
        let client = OpaClient::new("http://127.0.0.1:8181");
        let url = client.data_url("lambda_extension_test", None);

        assert_eq!(url, "http://127.0.0.1:8181/v1/data/lambda_extension_test");
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let client = OpaClient::new("http://127.0.0.1:8181/");
        let url = client.data_url("authz", Some("allow"));

        assert_eq!(url, "http://127.0.0.1:8181/v1/data/authz/allow");
    }

    #[test]
    fn test_from_env_override_and_default() {
        // Both cases in one test: the variable is process-global and the
        // harness runs tests concurrently
        std::env::set_var(OPA_ADDR_ENV, "http://10.0.0.5:8181");
        let client = OpaClient::from_env();
        assert_eq!(client.base_url, "http://10.0.0.5:8181");

        std::env::remove_var(OPA_ADDR_ENV);
        let client = OpaClient::from_env();
        assert_eq!(client.base_url, DEFAULT_OPA_ADDR);
    }

    #[test]
    fn test_data_query_wraps_input() {
        let input = serde_json::json!({"user": "alice"});
        let payload = serde_json::to_value(DataQuery { input: &input }).unwrap();

        assert_eq!(payload, serde_json::json!({"input": {"user": "alice"}}));
    }
}
