//! This module provides the [`Blob`] struct, an owned byte buffer that travels through every
//! resolver: archive tile payloads, downloaded assets, TileJSON documents and encoded images.
//!
//! # Examples
//!
//! ```rust
//! use maprender_core::Blob;
//!
//! let blob = Blob::from("Hello");
//! assert_eq!(blob.len(), 5);
//! assert_eq!(blob.as_str(), "Hello");
//! assert!(Blob::new_empty().is_empty());
//! ```

use super::ByteRange;
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns the bytes covered by `range`, failing if it lies outside the blob.
	pub fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let end = range.offset + range.length;
		ensure!(
			end <= self.len(),
			"range {range} is out of bounds for a blob of {} bytes",
			self.len()
		);
		Ok(Blob::from(&self.0[range.as_range_usize()]))
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_slice()
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Interprets the bytes as UTF-8, replacing invalid sequences.
	#[must_use]
	pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(value: Vec<u8>) -> Self {
		Blob(value)
	}
}

impl From<&[u8]> for Blob {
	fn from(value: &[u8]) -> Self {
		Blob(value.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(value: &[u8; N]) -> Self {
		Blob(value.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(value: &str) -> Self {
		Blob(value.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(value: String) -> Self {
		Blob(value.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let preview = self
			.0
			.iter()
			.take(16)
			.map(|b| format!("{b:02x}"))
			.collect::<Vec<_>>()
			.join(" ");
		if self.0.len() > 16 {
			write!(f, "Blob({} bytes: {preview} ...)", self.0.len())
		} else {
			write!(f, "Blob({} bytes: {preview})", self.0.len())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn read_range_inside_and_outside() -> Result<()> {
		let blob = Blob::from(&[10, 20, 30, 40, 50]);
		assert_eq!(blob.read_range(&ByteRange::new(1, 3))?.as_slice(), &[20, 30, 40]);
		assert!(blob.read_range(&ByteRange::new(3, 3)).is_err());
		Ok(())
	}

	#[test]
	fn debug_shows_length_and_prefix() {
		assert_eq!(format!("{:?}", Blob::from("AB")), "Blob(2 bytes: 41 42)");
		let long = Blob::from(vec![0u8; 20]);
		assert!(format!("{long:?}").starts_with("Blob(20 bytes: 00 00"));
		assert!(format!("{long:?}").ends_with("...)"));
	}

	#[test]
	fn string_conversions() {
		let blob = Blob::from(String::from("Xylofön"));
		assert_eq!(blob.as_str(), "Xylofön");
		assert_eq!(blob.clone().into_vec(), "Xylofön".as_bytes().to_vec());
	}
}
