// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for the Proofline pipeline.
//!
//! [`RetryingExecutor`] wraps a single logical write in a bounded retry loop
//! with linearly scaled backoff. [`recording`] holds the metric helpers used
//! by the executor and by the delivery orchestrator.

pub mod recording;
pub mod retry;

pub use retry::{AttemptError, RetryPolicy, RetryingExecutor};
