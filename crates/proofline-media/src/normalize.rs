// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data URL and raw base64 decoding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use proofline_core::{BinaryArtifact, ProoflineError};
use tracing::debug;

/// Content type used when neither the payload nor the caller names one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const DATA_URL_SCHEME: &str = "data:";

// Some capture APIs drop the trailing `=` padding, others use the URL-safe
// alphabet. Both engines accept padded and unpadded input.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes a captured payload into bytes plus a content type.
///
/// `data:` URLs use their own media type when they carry one; raw base64
/// input is tagged with `declared_content_type`. A comma-delimited prefix on
/// raw input is stripped. Empty results and invalid base64 fail with
/// [`ProoflineError::Decode`].
pub fn normalize(input: &str, declared_content_type: &str) -> Result<BinaryArtifact, ProoflineError> {
    let input = input.trim();

    let artifact = if has_data_scheme(input) {
        decode_data_url(input, declared_content_type)?
    } else {
        let payload = match input.split_once(',') {
            Some((_, rest)) => rest,
            None => input,
        };
        BinaryArtifact {
            bytes: decode_base64(payload)?,
            content_type: content_type_or_default(declared_content_type),
        }
    };

    if artifact.is_empty() {
        return Err(ProoflineError::Decode("payload decoded to zero bytes".into()));
    }

    debug!(
        size = artifact.len(),
        content_type = %artifact.content_type,
        "normalized capture payload"
    );
    Ok(artifact)
}

/// File extension conventionally used for a content type.
pub fn file_extension(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

fn has_data_scheme(input: &str) -> bool {
    input
        .get(..DATA_URL_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DATA_URL_SCHEME))
}

/// `data:[<mediatype>][;param=value]*[;base64],<payload>`
fn decode_data_url(input: &str, declared_content_type: &str) -> Result<BinaryArtifact, ProoflineError> {
    let rest = &input[DATA_URL_SCHEME.len()..];
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ProoflineError::Decode("data URL has no payload separator".into()))?;

    let mut segments = header.split(';');
    let media_type = segments.next().unwrap_or_default().trim();
    let is_base64 = segments.any(|s| s.trim().eq_ignore_ascii_case("base64"));

    let content_type = if media_type.contains('/') {
        media_type.to_string()
    } else {
        content_type_or_default(declared_content_type)
    };

    let bytes = if is_base64 {
        decode_base64(payload)?
    } else {
        percent_decode(payload)?
    };

    Ok(BinaryArtifact {
        bytes,
        content_type,
    })
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, ProoflineError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    STANDARD_LENIENT
        .decode(&compact)
        .or_else(|_| URL_SAFE_LENIENT.decode(&compact))
        .map_err(|e| ProoflineError::Decode(format!("invalid base64: {e}")))
}

fn percent_decode(payload: &str) -> Result<Vec<u8>, ProoflineError> {
    let raw = payload.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = raw
                .get(i + 1..i + 3)
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| ProoflineError::Decode("invalid percent-escape in data URL".into()))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Ok(out)
}

fn content_type_or_default(declared: &str) -> String {
    let declared = declared.trim();
    if declared.is_empty() {
        DEFAULT_CONTENT_TYPE.to_string()
    } else {
        declared.to_string()
    }
}
