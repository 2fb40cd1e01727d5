// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any installed recorder can collect these.
//! Without a recorder every call is a no-op.

use metrics::describe_counter;

/// Register all Proofline metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "proofline_mutation_attempts_total",
        "Attempts made by the retrying executor"
    );
    describe_counter!(
        "proofline_mutation_failures_total",
        "Primary mutations that exhausted their retry budget"
    );
    describe_counter!(
        "proofline_secondary_failures_total",
        "Audit writes and notification dispatches that failed"
    );
    describe_counter!(
        "proofline_notifications_total",
        "Notification dispatches by result"
    );
}

/// Record one attempt of a primary mutation.
pub fn record_attempt(operation: &str) {
    metrics::counter!("proofline_mutation_attempts_total", "operation" => operation.to_string())
        .increment(1);
}

/// Record a primary mutation that ran out of attempts.
pub fn record_exhausted(operation: &str) {
    metrics::counter!("proofline_mutation_failures_total", "operation" => operation.to_string())
        .increment(1);
}

/// Record a swallowed secondary-effect failure.
pub fn record_secondary_failure(effect: &str) {
    metrics::counter!("proofline_secondary_failures_total", "effect" => effect.to_string())
        .increment(1);
}

/// Record the result of a notification dispatch (`sent`, `rejected`, `error`, `timeout`).
pub fn record_notification(result: &'static str) {
    metrics::counter!("proofline_notifications_total", "result" => result).increment(1);
}
