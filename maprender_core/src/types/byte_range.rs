//! The `ByteRange` struct addresses a contiguous section of an archive, e.g. the root
//! directory or a single tile payload inside a PMTiles file.
//!
//! ```rust
//! use maprender_core::ByteRange;
//!
//! let range = ByteRange::new(23, 42);
//! assert_eq!(range.as_range_usize(), 23..65);
//! assert_eq!(range.get_shifted_forward(100).offset, 123);
//! ```

use std::fmt;
use std::ops::Range;

/// A range of bytes given by offset and length.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct ByteRange {
	pub offset: u64,
	pub length: u64,
}

impl ByteRange {
	#[must_use]
	pub fn new(offset: u64, length: u64) -> Self {
		Self { offset, length }
	}

	#[must_use]
	pub fn empty() -> Self {
		Self { offset: 0, length: 0 }
	}

	/// Returns a copy moved forward by `offset` bytes, used to turn section-relative
	/// offsets into absolute file offsets.
	#[must_use]
	pub fn get_shifted_forward(&self, offset: u64) -> Self {
		Self {
			offset: self.offset + offset,
			length: self.length,
		}
	}

	#[must_use]
	pub fn as_range_usize(&self) -> Range<usize> {
		self.offset as usize..(self.offset + self.length) as usize
	}
}

impl fmt::Debug for ByteRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..{}", self.offset, self.offset + self.length)
	}
}

impl fmt::Display for ByteRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{},{}]", self.offset, self.length)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formatting() {
		let range = ByteRange::new(5, 10);
		assert_eq!(format!("{range:?}"), "5..15");
		assert_eq!(format!("{range}"), "[5,10]");
		assert_eq!(ByteRange::empty(), ByteRange::new(0, 0));
	}
}
