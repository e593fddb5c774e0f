//! Reversible text encoding for Secret values
//!
//! Secret data is stored as standard, padded base64. Values read from a
//! Secret are decoded before they reach a template, and rendered values
//! are encoded again before they are written to a Secret.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Failure to decode a stored Secret value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("UTF-8 decode error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode a value for storage in a Secret
#[must_use]
pub fn encode(value: &str) -> String {
    encode_bytes(value.as_bytes())
}

/// Encode raw bytes for storage in a Secret
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a stored Secret value back to text
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(encoded.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}
