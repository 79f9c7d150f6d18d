// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Authorizer Application Service
//!
//! Binds a fixed package (and optionally a rule) to an [`OpaClient`] so the
//! function handler evaluates the same policy on every invocation.
//!
//! ## Relationships
//! - Consumes the `OpaClient` infrastructure service for policy queries
//! - Produces `Decision` domain values for the handler to map

use crate::domain::decision::{Decision, PolicyError};
use crate::infrastructure::opa::OpaClient;
use serde_json::Value;
use tracing::debug;

pub struct Authorizer {
    client: OpaClient,
    package: String,
    rule: Option<String>,
}

impl Authorizer {
    /// Create an authorizer evaluating the full package document.
    pub fn new(client: OpaClient, package: impl Into<String>) -> Self {
        Self {
            client,
            package: package.into(),
            rule: None,
        }
    }

    /// Narrow evaluation to a single rule within the package.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Evaluate the configured policy against an invocation event.
    pub async fn authorize(&self, input: &Value) -> Result<Decision, PolicyError> {
        let decision = self
            .client
            .decide(&self.package, self.rule.as_deref(), input)
            .await?;

        debug!(
            package = %self.package,
            allowed = decision.is_allowed(),
            "policy evaluated"
        );

        Ok(decision)
    }
}
