// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache/view invalidation signal.

/// Marks a cached view stale after a successful primary mutation.
///
/// Fire-and-forget: implementations must return promptly and never fail.
pub trait ViewInvalidator: Send + Sync + 'static {
    fn invalidate(&self, path: &str);
}
