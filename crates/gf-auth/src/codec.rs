use crate::errors::{GfAuthError, Result};

/// Hex-encode a thin code the way the game client expects it on its command line
pub fn encode(code: &str) -> String {
    hex::encode(code.as_bytes())
}

/// Inverse of [`encode`]
pub fn decode(encoded: &str) -> Result<String> {
    let bytes = hex::decode(encoded)
        .map_err(|e| GfAuthError::MalformedResponse(format!("Invalid hex code: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| GfAuthError::MalformedResponse(format!("Code is not UTF-8: {}", e)))
}
