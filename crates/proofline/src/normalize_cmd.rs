// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `proofline normalize` command implementation.
//!
//! Decodes a capture exactly as an upload would and writes the raw bytes,
//! which is how support inspects a photo or signature a device sent.

use std::io::Read;
use std::path::Path;

use proofline_core::ProoflineError;
use tracing::info;

/// Normalize the capture text in `input` (or stdin for `-`) into `output`.
pub fn run_normalize(
    input: &Path,
    declared_content_type: &str,
    output: &Path,
) -> Result<(), ProoflineError> {
    let text = read_input(input)?;
    let artifact = proofline_media::normalize(&text, declared_content_type)?;

    std::fs::write(output, &artifact.bytes).map_err(|e| {
        ProoflineError::Internal(format!("cannot write {}: {e}", output.display()))
    })?;

    info!(
        output = %output.display(),
        size = artifact.len(),
        content_type = %artifact.content_type,
        "capture normalized"
    );
    println!(
        "wrote {} bytes ({}, .{}) to {}",
        artifact.len(),
        artifact.content_type,
        proofline_media::file_extension(&artifact.content_type),
        output.display()
    );
    Ok(())
}

fn read_input(input: &Path) -> Result<String, ProoflineError> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| ProoflineError::Internal(format!("cannot read stdin: {e}")))?;
        return Ok(text);
    }

    std::fs::read_to_string(input)
        .map_err(|e| ProoflineError::Internal(format!("cannot read {}: {e}", input.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sig.txt");
        let output = dir.path().join("sig.bin");
        std::fs::write(&input, "data:text/plain;base64,aGVsbG8=\n").unwrap();

        run_normalize(&input, "application/octet-stream", &output).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"hello");
    }

    #[test]
    fn malformed_capture_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.txt");
        std::fs::write(&input, "not base64 at all!").unwrap();

        let err = run_normalize(&input, "image/png", &dir.path().join("out.bin")).unwrap_err();
        assert!(matches!(err, ProoflineError::Decode(_)));
        assert!(!dir.path().join("out.bin").exists());
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_normalize(
            &dir.path().join("absent.txt"),
            "image/png",
            &dir.path().join("out.bin"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
    }
}
