use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{Error, Result};

pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 5 * 1024 * 1024;

/// Decides which uploads are recompressed before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionPolicy {
    pub threshold_bytes: usize,
}

impl CompressionPolicy {
    #[must_use]
    pub fn new(threshold_bytes: usize) -> Self {
        Self { threshold_bytes }
    }

    /// Payloads strictly larger than the threshold are compressed.
    #[must_use]
    pub fn should_compress(&self, len: usize) -> bool {
        len > self.threshold_bytes
    }
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_THRESHOLD)
    }
}

/// Compresses bytes into a zlib stream.
pub fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Reverses [`deflate`].
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::CorruptPayload(e.to_string()))?;
    Ok(out)
}
