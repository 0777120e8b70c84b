use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::Result;

/// Encodes raw bytes into the text form held in `filedata` columns.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Reverses [`encode`].
pub fn decode(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text.trim())?)
}
