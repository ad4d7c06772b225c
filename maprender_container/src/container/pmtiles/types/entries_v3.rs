//! PMTiles v3 directories: a varint encoded list of entries that either point at tile data
//! (`run_length > 0`) or at a leaf directory (`run_length == 0`).

use anyhow::{Result, ensure};
use maprender_core::{Blob, ByteRange, io::ValueReaderSlice};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryV3 {
	pub tile_id: u64,
	pub range: ByteRange,
	pub run_length: u32,
}

impl EntryV3 {
	#[must_use]
	pub fn new(tile_id: u64, range: ByteRange, run_length: u32) -> Self {
		Self {
			tile_id,
			range,
			run_length,
		}
	}

	#[must_use]
	pub fn is_leaf_pointer(&self) -> bool {
		self.run_length == 0
	}
}

#[derive(Debug, Default, PartialEq)]
pub struct EntriesV3 {
	entries: Vec<EntryV3>,
}

impl EntriesV3 {
	/// Parses an uncompressed directory.
	pub fn from_blob(data: &Blob) -> Result<Self> {
		let mut reader = ValueReaderSlice::new_le(data.as_slice());

		let num_entries = reader.read_varint()?;
		// every entry needs at least four bytes
		ensure!(
			num_entries <= data.len(),
			"directory claims {num_entries} entries but has only {} bytes",
			data.len()
		);
		let num_entries = num_entries as usize;

		let mut entries: Vec<EntryV3> = Vec::with_capacity(num_entries);
		let mut last_id: u64 = 0;
		for _ in 0..num_entries {
			last_id += reader.read_varint()?;
			entries.push(EntryV3::new(last_id, ByteRange::empty(), 0));
		}

		for entry in &mut entries {
			entry.run_length = u32::try_from(reader.read_varint()?)?;
		}

		for entry in &mut entries {
			entry.range.length = reader.read_varint()?;
		}

		for i in 0..num_entries {
			let value = reader.read_varint()?;
			entries[i].range.offset = if i > 0 && value == 0 {
				entries[i - 1].range.offset + entries[i - 1].range.length
			} else {
				ensure!(value > 0, "first directory entry must have an explicit offset");
				value - 1
			};
		}

		Ok(EntriesV3 { entries })
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, EntryV3> {
		self.entries.iter()
	}

	/// Finds the entry covering `tile_id`.
	///
	/// Returns either an exact match, a run of tiles that contains the id, or the leaf pointer
	/// whose directory may contain it.
	#[must_use]
	pub fn find_tile(&self, tile_id: u64) -> Option<EntryV3> {
		let mut m: i64 = 0;
		let mut n: i64 = self.entries.len() as i64 - 1;

		while m <= n {
			let k = (n + m) >> 1;
			let entry_id = self.entries[k as usize].tile_id;
			match tile_id.cmp(&entry_id) {
				Ordering::Greater => m = k + 1,
				Ordering::Less => n = k - 1,
				Ordering::Equal => return Some(self.entries[k as usize]),
			}
		}

		// at this point, m > n
		if n >= 0 {
			let entry = self.entries[n as usize];
			if entry.run_length == 0 || tile_id - entry.tile_id < u64::from(entry.run_length) {
				return Some(entry);
			}
		}

		None
	}

	#[cfg(any(test, feature = "test"))]
	#[must_use]
	pub fn from_entries(entries: Vec<EntryV3>) -> Self {
		EntriesV3 { entries }
	}

	/// Encodes the directory, with offsets relative to the previous entry where possible.
	#[cfg(any(test, feature = "test"))]
	pub fn serialize(&self) -> Result<Blob> {
		let mut buffer: Vec<u8> = Vec::new();
		write_varint(&mut buffer, self.entries.len() as u64);

		let mut last_id: u64 = 0;
		for entry in &self.entries {
			write_varint(&mut buffer, entry.tile_id - last_id);
			last_id = entry.tile_id;
		}
		for entry in &self.entries {
			write_varint(&mut buffer, u64::from(entry.run_length));
		}
		for entry in &self.entries {
			write_varint(&mut buffer, entry.range.length);
		}
		for (i, entry) in self.entries.iter().enumerate() {
			let contiguous = i > 0 && {
				let previous = &self.entries[i - 1];
				entry.range.offset == previous.range.offset + previous.range.length
			};
			write_varint(&mut buffer, if contiguous { 0 } else { entry.range.offset + 1 });
		}

		Ok(Blob::from(buffer))
	}
}

#[cfg(any(test, feature = "test"))]
fn write_varint(buffer: &mut Vec<u8>, mut value: u64) {
	while value >= 0x80 {
		buffer.push((value as u8 & 0x7F) | 0x80);
		value >>= 7;
	}
	buffer.push(value as u8);
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn sample() -> EntriesV3 {
		EntriesV3::from_entries(vec![
			EntryV3::new(1, ByteRange::new(100, 100), 1),
			EntryV3::new(2, ByteRange::new(200, 100), 1),
			EntryV3::new(5, ByteRange::new(300, 100), 3),
			EntryV3::new(20, ByteRange::new(0, 50), 0),
		])
	}

	#[test]
	fn encoding_matches_reference_bytes() -> Result<()> {
		let entries = EntriesV3::from_entries(vec![
			EntryV3::new(1, ByteRange::new(100, 100), 0),
			EntryV3::new(2, ByteRange::new(200, 100), 1),
			EntryV3::new(3, ByteRange::new(300, 100), 0),
		]);
		let blob = entries.serialize()?;
		assert_eq!(
			blob.as_slice(),
			&[0x03, 0x01, 0x01, 0x01, 0x00, 0x01, 0x00, 0x64, 0x64, 0x64, 0x65, 0x00, 0x00]
		);
		assert_eq!(EntriesV3::from_blob(&blob)?, entries);
		Ok(())
	}

	#[test]
	fn find_exact_run_and_leaf() {
		let entries = sample();
		assert_eq!(entries.find_tile(0), None);
		assert_eq!(entries.find_tile(2).map(|e| e.range.offset), Some(200));
		assert_eq!(entries.find_tile(3), None);
		assert_eq!(entries.find_tile(7).map(|e| e.tile_id), Some(5));
		assert_eq!(entries.find_tile(8), None);
		let leaf = entries.find_tile(99).unwrap();
		assert!(leaf.is_leaf_pointer());
		assert_eq!(leaf.tile_id, 20);
	}

	#[test]
	fn rejects_truncated_directory() -> Result<()> {
		let blob = sample().serialize()?.into_vec();
		assert!(EntriesV3::from_blob(&Blob::from(&blob[..blob.len() - 1])).is_err());
		assert!(EntriesV3::from_blob(&Blob::from(&[0xFF, 0x01])).is_err());
		Ok(())
	}

	#[test]
	fn empty_directory() -> Result<()> {
		let entries = EntriesV3::from_blob(&Blob::from(&[0x00]))?;
		assert!(entries.is_empty());
		assert_eq!(entries.find_tile(0), None);
		Ok(())
	}
}
