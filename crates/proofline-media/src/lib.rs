// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload normalization for mobile captures.
//!
//! Camera and signature-pad APIs hand over either a `data:` URL or a bare
//! base64 string. [`normalize`] turns both into a [`BinaryArtifact`] ready
//! for the blob store.
//!
//! [`BinaryArtifact`]: proofline_core::BinaryArtifact

pub mod normalize;

pub use normalize::{file_extension, normalize, DEFAULT_CONTENT_TYPE};
