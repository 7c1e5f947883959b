//! Event blob compression
//!
//! The replay core treats the compressed event stream as opaque bytes and
//! delegates to a [`Compressor`]. [`LzmaCodec`] handles the LZMA-alone
//! streams written by the game client.

use std::io::Cursor;

use crate::error::{Error, Result};

/// Byte-buffer compression seam used by the replay codec
pub trait Compressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// LZMA-alone codec backed by `lzma-rs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LzmaCodec;

impl Compressor for LzmaCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        lzma_rs::lzma_compress(&mut Cursor::new(data), &mut output)
            .map_err(|e| Error::Compression(e.to_string()))?;
        Ok(output)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        lzma_rs::lzma_decompress(&mut Cursor::new(data), &mut output)
            .map_err(|e| Error::Compression(e.to_string()))?;
        Ok(output)
    }
}
