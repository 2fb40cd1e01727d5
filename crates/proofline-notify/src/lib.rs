// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification channel for new proofs of delivery.
//!
//! Provides [`HttpNotificationChannel`], a [`NotificationChannel`] that posts
//! `{orderId, podId}` to a webhook endpoint and interprets JSON and non-JSON
//! replies alike.
//!
//! [`NotificationChannel`]: proofline_core::NotificationChannel

pub mod client;

pub use client::{interpret_response, HttpNotificationChannel};
