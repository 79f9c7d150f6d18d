// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Decision
//!
//! Allow/deny outcome of a policy evaluation and the HTTP-shaped response
//! the gate function returns for it.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements decision

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while evaluating a policy
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Policy service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Malformed decision document: {0}")]
    MalformedResponse(String),

    #[error("Decision document has no `result` field")]
    Undefined,

    #[error("Expected a boolean decision, got: {0}")]
    NotBoolean(String),
}

/// Outcome of evaluating the gate policy against an invocation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// HTTP status code the gate reports for this decision.
    pub fn status_code(&self) -> u16 {
        match self {
            Decision::Allow => 200,
            Decision::Deny => 403,
        }
    }
}

/// HTTP-shaped response returned from the gate function.
///
/// The body carries the serialized `{"allow": <bool>}` document so API
/// Gateway style consumers can parse it without knowing the status mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl From<Decision> for GateResponse {
    fn from(decision: Decision) -> Self {
        let body = serde_json::json!({ "allow": decision.is_allowed() });
        Self {
            status_code: decision.status_code(),
            body: body.to_string(),
        }
    }
}
