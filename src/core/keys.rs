//! Key material encoding.
//!
//! Raw key bytes are never parsed; they are only base64-encoded and
//! decoded at the boundary for human transport. Validation of the base64
//! grammar happens as a distinct step before any decode attempt so a
//! malformed key fails with a validation message, not a decode panic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, ValidationError};

/// Check that `encoded` is a well-formed standard-alphabet base64 string.
pub fn validate_encoded_key(encoded: &str) -> Result<()> {
    if encoded.is_empty() {
        return Err(ValidationError::InvalidKeyEncoding {
            reason: "key is empty".to_string(),
        }
        .into());
    }

    if encoded.len() % 4 != 0 {
        return Err(ValidationError::InvalidKeyEncoding {
            reason: format!("length {} is not a multiple of 4", encoded.len()),
        }
        .into());
    }

    let trimmed = encoded.trim_end_matches('=');
    if encoded.len() - trimmed.len() > 2 {
        return Err(ValidationError::InvalidKeyEncoding {
            reason: "more than two padding characters".to_string(),
        }
        .into());
    }

    if let Some(bad) = trimmed
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '+' && *c != '/')
    {
        return Err(ValidationError::InvalidKeyEncoding {
            reason: format!("invalid character '{}'", bad),
        }
        .into());
    }

    Ok(())
}

/// Encode raw key bytes for display or transport.
pub fn encode_key(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a validated base64 key back to raw bytes.
pub fn decode_key(encoded: &str) -> Result<Vec<u8>> {
    validate_encoded_key(encoded)?;
    STANDARD.decode(encoded).map_err(|e| {
        ValidationError::InvalidKeyEncoding {
            reason: e.to_string(),
        }
        .into()
    })
}
