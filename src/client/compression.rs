//! XFEATURE COMPRESS GZIP negotiation and decompression

use crate::Result;
use crate::commands;
use crate::error::NntpError;
use flate2::read::ZlibDecoder;
use std::io::Read;
use tracing::{debug, trace};

use super::NntpClient;
use super::state::CompressionMode;

impl NntpClient {
    /// Attempt to enable headers-only compression (XFEATURE COMPRESS GZIP)
    ///
    /// Returns `true` if the server accepted the feature, `false` otherwise.
    /// A refusal is not an error; the connection continues uncompressed.
    pub async fn try_enable_compression(&mut self) -> Result<bool> {
        debug!("Attempting XFEATURE COMPRESS GZIP");
        self.send_command(commands::xfeature_compress_gzip()).await?;
        let response = self.read_response().await?;

        if response.is_success() {
            self.compression_mode = CompressionMode::HeadersOnly;
            debug!("XFEATURE COMPRESS GZIP enabled (headers-only compression)");
            return Ok(true);
        }

        debug!(
            "XFEATURE COMPRESS GZIP not supported (code {}), continuing without compression",
            response.code
        );
        Ok(false)
    }

    /// Get bandwidth statistics (compressed vs decompressed bytes)
    ///
    /// Returns `(bytes_compressed, bytes_decompressed)`.
    pub fn get_bandwidth_stats(&self) -> (u64, u64) {
        (self.bytes_compressed, self.bytes_decompressed)
    }

    /// Check if compression is enabled
    pub fn is_compression_enabled(&self) -> bool {
        self.compression_mode != CompressionMode::None
    }

    /// Inflate a compressed block received in headers-only mode
    ///
    /// The server sends zlib despite calling the feature "GZIP". A block that
    /// does not inflate is garbage and fails the response.
    pub(super) fn maybe_decompress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if self.compression_mode == CompressionMode::None {
            return Ok(data.to_vec());
        }

        let decompressed = inflate(data)?;
        self.bytes_compressed += data.len() as u64;
        self.bytes_decompressed += decompressed.len() as u64;
        trace!(
            "Decompressed {} bytes to {} bytes (zlib)",
            data.len(),
            decompressed.len()
        );
        Ok(decompressed)
    }
}

/// Zlib-inflate a whole block
fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    // Overview text typically expands 3-5x
    let mut decompressed = Vec::with_capacity(data.len() * 3);
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| NntpError::InvalidResponse(format!("zlib decompression failed: {}", e)))?;
    Ok(decompressed)
}
