//! Turning uploaded file bytes into the text payload kept in the store, and back.
//!
//! Uploads above the compression threshold are zlib-compressed first; the
//! `compressed` flag travels with the row so downloads can undo it. A sha-256
//! of the original bytes guards the round trip.

pub mod codec;
pub mod compress;

use sha2::{Digest, Sha256};

pub use compress::{CompressionPolicy, DEFAULT_COMPRESSION_THRESHOLD};

use crate::error::{Error, Result};

/// A file ready to be written to a `filedata` column.
#[derive(Debug, Clone)]
pub struct EncodedPayload {
    pub text: String,
    pub compressed: bool,
    pub size_bytes: i64,
    pub checksum: String,
}

#[must_use]
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compresses (if the policy says so) and encodes an uploaded file.
pub fn prepare(bytes: &[u8], policy: &CompressionPolicy) -> Result<EncodedPayload> {
    let compressed = policy.should_compress(bytes.len());
    let text = if compressed {
        codec::encode(&compress::deflate(bytes)?)
    } else {
        codec::encode(bytes)
    };

    Ok(EncodedPayload {
        text,
        compressed,
        size_bytes: bytes.len() as i64,
        checksum: checksum(bytes),
    })
}

/// Recovers the original file bytes from a stored payload.
///
/// An empty `expected_checksum` skips verification.
pub fn restore(text: &str, compressed: bool, expected_checksum: &str) -> Result<Vec<u8>> {
    let raw = codec::decode(text)?;
    let bytes = if compressed {
        compress::inflate(&raw)?
    } else {
        raw
    };

    if !expected_checksum.is_empty() && checksum(&bytes) != expected_checksum {
        return Err(Error::ChecksumMismatch);
    }

    Ok(bytes)
}
