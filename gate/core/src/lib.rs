// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Decision domain and OPA sidecar integration for the gate function.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Policy queries and allow/deny response mapping

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
