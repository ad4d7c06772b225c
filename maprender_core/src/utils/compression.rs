//! Compression helpers for archive sections and tile payloads.
//!
//! ```rust
//! use maprender_core::{Blob, utils::*};
//!
//! let data = Blob::from("vector tile bytes");
//! let compressed = compress_gzip(&data)?;
//! assert_eq!(unzip(&compressed)?, data);
//! assert_eq!(decompress_gzip_or_raw(data.clone()), data);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::{Blob, TileCompression};
use anyhow::{Context, Result};
use brotli::BrotliDecompress;
use flate2::bufread::{GzDecoder, GzEncoder, ZlibDecoder};
use std::io::{Cursor, Read};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn decompress(blob: Blob, compression: TileCompression) -> Result<Blob> {
	match compression {
		TileCompression::Uncompressed => Ok(blob),
		TileCompression::Gzip => decompress_gzip(&blob),
		TileCompression::Brotli => decompress_brotli(&blob),
	}
}

pub fn compress_gzip(blob: &Blob) -> Result<Blob> {
	let mut encoder = GzEncoder::new(blob.as_slice(), flate2::Compression::default());
	let mut compressed_data = Vec::new();
	encoder
		.read_to_end(&mut compressed_data)
		.context("Failed to compress data using Gzip")?;
	Ok(Blob::from(compressed_data))
}

pub fn decompress_gzip(blob: &Blob) -> Result<Blob> {
	let mut decoder = GzDecoder::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	decoder
		.read_to_end(&mut decompressed_data)
		.context("Failed to decompress data using Gzip")?;
	Ok(Blob::from(decompressed_data))
}

pub fn decompress_brotli(blob: &Blob) -> Result<Blob> {
	let mut cursor = Cursor::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	BrotliDecompress(&mut cursor, &mut decompressed_data).context("Failed to decompress data using Brotli")?;
	Ok(Blob::from(decompressed_data))
}

/// Inflates a gzip or zlib stream, detecting the wrapper from the first bytes.
pub fn unzip(blob: &Blob) -> Result<Blob> {
	if blob.as_slice().starts_with(&GZIP_MAGIC) {
		return decompress_gzip(blob);
	}
	let mut decoder = ZlibDecoder::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	decoder
		.read_to_end(&mut decompressed_data)
		.context("Failed to decompress data using zlib")?;
	Ok(Blob::from(decompressed_data))
}

/// Tries gzip and falls back to the input when it is not a valid gzip stream.
#[must_use]
pub fn decompress_gzip_or_raw(blob: Blob) -> Blob {
	match decompress_gzip(&blob) {
		Ok(decompressed) => decompressed,
		Err(err) => {
			log::trace!("payload is not gzip compressed, using raw bytes: {err:#}");
			blob
		}
	}
}
