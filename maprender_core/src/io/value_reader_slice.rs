//! A cursor over a byte slice that decodes little-endian integers and varints, as used by the
//! PMTiles header and directory encodings.
//!
//! ```rust
//! use maprender_core::io::ValueReaderSlice;
//!
//! let mut reader = ValueReaderSlice::new_le(&[0xAC, 0x02, 0x2A, 0x00, 0x00, 0x00]);
//! assert_eq!(reader.read_varint().unwrap(), 300);
//! assert_eq!(reader.read_i32().unwrap(), 42);
//! assert!(!reader.has_remaining());
//! ```

use anyhow::{Context, Result, bail, ensure};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

pub struct ValueReaderSlice<'a> {
	cursor: Cursor<&'a [u8]>,
	len: u64,
}

impl<'a> ValueReaderSlice<'a> {
	#[must_use]
	pub fn new_le(slice: &'a [u8]) -> ValueReaderSlice<'a> {
		ValueReaderSlice {
			cursor: Cursor::new(slice),
			len: slice.len() as u64,
		}
	}

	#[must_use]
	pub fn position(&self) -> u64 {
		self.cursor.position()
	}

	pub fn set_position(&mut self, position: u64) -> Result<()> {
		ensure!(position <= self.len, "position {position} is outside of {} bytes", self.len);
		self.cursor.set_position(position);
		Ok(())
	}

	#[must_use]
	pub fn has_remaining(&self) -> bool {
		self.cursor.position() < self.len
	}

	pub fn read_u8(&mut self) -> Result<u8> {
		self.cursor.read_u8().context("reading u8")
	}

	pub fn read_i32(&mut self) -> Result<i32> {
		self.cursor.read_i32::<LittleEndian>().context("reading i32")
	}

	pub fn read_u64(&mut self) -> Result<u64> {
		self.cursor.read_u64::<LittleEndian>().context("reading u64")
	}

	/// Reads an unsigned LEB128 varint.
	pub fn read_varint(&mut self) -> Result<u64> {
		let mut value = 0;
		let mut shift = 0;
		loop {
			let byte = self.cursor.read_u8().context("reading varint")?;
			value |= (u64::from(byte) & 0x7F) << shift;
			if byte & 0x80 == 0 {
				break;
			}
			shift += 7;
			if shift >= 70 {
				bail!("varint too long");
			}
		}
		Ok(value)
	}
}
