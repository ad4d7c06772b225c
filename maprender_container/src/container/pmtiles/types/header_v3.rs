use super::{PMTilesCompression, PMTilesType};
use anyhow::{Result, ensure};
use maprender_core::{Blob, ByteRange, io::ValueReaderSlice};

/// The fixed 127-byte header at the start of every PMTiles v3 archive.
#[derive(Debug, PartialEq)]
pub struct HeaderV3 {
	pub root_dir: ByteRange,
	pub metadata: ByteRange,
	pub leaf_dirs: ByteRange,
	pub tile_data: ByteRange,
	pub addressed_tiles_count: u64,
	pub tile_entries_count: u64,
	pub tile_contents_count: u64,
	pub clustered: bool,
	pub internal_compression: PMTilesCompression,
	pub tile_compression: PMTilesCompression,
	pub tile_type: PMTilesType,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub min_lon_e7: i32,
	pub min_lat_e7: i32,
	pub max_lon_e7: i32,
	pub max_lat_e7: i32,
	pub center_zoom: u8,
	pub center_lon_e7: i32,
	pub center_lat_e7: i32,
}

impl HeaderV3 {
	pub const LEN: u64 = 127;

	pub fn deserialize(blob: &Blob) -> Result<Self> {
		let buffer = blob.as_slice();

		ensure!(buffer.len() == Self::LEN as usize, "pmtiles header must be {} bytes", Self::LEN);
		ensure!(&buffer[0..7] == b"PMTiles", "pmtiles magic number exception");
		ensure!(buffer[7] == 3, "pmtiles version: must be 3");

		let mut reader = ValueReaderSlice::new_le(buffer);
		reader.set_position(8)?;

		Ok(Self {
			root_dir: ByteRange::new(reader.read_u64()?, reader.read_u64()?),
			metadata: ByteRange::new(reader.read_u64()?, reader.read_u64()?),
			leaf_dirs: ByteRange::new(reader.read_u64()?, reader.read_u64()?),
			tile_data: ByteRange::new(reader.read_u64()?, reader.read_u64()?),
			addressed_tiles_count: reader.read_u64()?,
			tile_entries_count: reader.read_u64()?,
			tile_contents_count: reader.read_u64()?,
			clustered: reader.read_u8()? == 1,
			internal_compression: PMTilesCompression::from_u8(reader.read_u8()?)?,
			tile_compression: PMTilesCompression::from_u8(reader.read_u8()?)?,
			tile_type: PMTilesType::from_u8(reader.read_u8()?)?,
			min_zoom: reader.read_u8()?,
			max_zoom: reader.read_u8()?,
			min_lon_e7: reader.read_i32()?,
			min_lat_e7: reader.read_i32()?,
			max_lon_e7: reader.read_i32()?,
			max_lat_e7: reader.read_i32()?,
			center_zoom: reader.read_u8()?,
			center_lon_e7: reader.read_i32()?,
			center_lat_e7: reader.read_i32()?,
		})
	}

	/// Bounds as `[west, south, east, north]`, or `None` if the header leaves them empty.
	#[must_use]
	pub fn bounds(&self) -> Option<[f64; 4]> {
		if self.min_lon_e7 >= self.max_lon_e7 || self.min_lat_e7 >= self.max_lat_e7 {
			return None;
		}
		Some([
			e7(self.min_lon_e7),
			e7(self.min_lat_e7),
			e7(self.max_lon_e7),
			e7(self.max_lat_e7),
		])
	}

	/// Center as `[longitude, latitude, zoom]`, or `None` if the header bounds are empty.
	#[must_use]
	pub fn center(&self) -> Option<[f64; 3]> {
		self.bounds()?;
		Some([
			e7(self.center_lon_e7),
			e7(self.center_lat_e7),
			f64::from(self.center_zoom),
		])
	}

	#[cfg(any(test, feature = "test"))]
	pub fn serialize(&self) -> Result<Blob> {
		use byteorder::{LittleEndian as LE, WriteBytesExt};

		let mut buffer: Vec<u8> = Vec::with_capacity(Self::LEN as usize);
		buffer.extend_from_slice(b"PMTiles");
		buffer.write_u8(3)?;
		for range in [&self.root_dir, &self.metadata, &self.leaf_dirs, &self.tile_data] {
			buffer.write_u64::<LE>(range.offset)?;
			buffer.write_u64::<LE>(range.length)?;
		}
		buffer.write_u64::<LE>(self.addressed_tiles_count)?;
		buffer.write_u64::<LE>(self.tile_entries_count)?;
		buffer.write_u64::<LE>(self.tile_contents_count)?;
		buffer.write_u8(u8::from(self.clustered))?;
		buffer.write_u8(self.internal_compression as u8)?;
		buffer.write_u8(self.tile_compression as u8)?;
		buffer.write_u8(self.tile_type as u8)?;
		buffer.write_u8(self.min_zoom)?;
		buffer.write_u8(self.max_zoom)?;
		buffer.write_i32::<LE>(self.min_lon_e7)?;
		buffer.write_i32::<LE>(self.min_lat_e7)?;
		buffer.write_i32::<LE>(self.max_lon_e7)?;
		buffer.write_i32::<LE>(self.max_lat_e7)?;
		buffer.write_u8(self.center_zoom)?;
		buffer.write_i32::<LE>(self.center_lon_e7)?;
		buffer.write_i32::<LE>(self.center_lat_e7)?;
		Ok(Blob::from(buffer))
	}
}

fn e7(value: i32) -> f64 {
	f64::from(value) / 1e7
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn sample() -> HeaderV3 {
		HeaderV3 {
			root_dir: ByteRange::new(127, 25),
			metadata: ByteRange::new(152, 40),
			leaf_dirs: ByteRange::new(192, 0),
			tile_data: ByteRange::new(192, 1000),
			addressed_tiles_count: 7,
			tile_entries_count: 7,
			tile_contents_count: 6,
			clustered: true,
			internal_compression: PMTilesCompression::Gzip,
			tile_compression: PMTilesCompression::Gzip,
			tile_type: PMTilesType::MVT,
			min_zoom: 0,
			max_zoom: 14,
			min_lon_e7: 130_000_000,
			min_lat_e7: 524_000_000,
			max_lon_e7: 136_000_000,
			max_lat_e7: 527_000_000,
			center_zoom: 10,
			center_lon_e7: 134_000_000,
			center_lat_e7: 525_000_000,
		}
	}

	#[test]
	fn deserialize_serialized_header() -> Result<()> {
		let blob = sample().serialize()?;
		assert_eq!(blob.len(), HeaderV3::LEN);
		assert_eq!(HeaderV3::deserialize(&blob)?, sample());
		Ok(())
	}

	#[test]
	fn reject_bad_magic_and_version() -> Result<()> {
		let mut bytes = sample().serialize()?.into_vec();
		bytes[7] = 2;
		assert!(HeaderV3::deserialize(&Blob::from(bytes.clone())).is_err());
		bytes[0] = b'X';
		assert!(HeaderV3::deserialize(&Blob::from(bytes)).is_err());
		assert!(HeaderV3::deserialize(&Blob::from("PMTiles")).is_err());
		Ok(())
	}

	#[test]
	fn bounds_and_center() {
		let header = sample();
		assert_eq!(header.bounds(), Some([13.0, 52.4, 13.6, 52.7]));
		assert_eq!(header.center(), Some([13.4, 52.5, 10.0]));

		let empty = HeaderV3 {
			min_lon_e7: 0,
			max_lon_e7: 0,
			..sample()
		};
		assert_eq!(empty.bounds(), None);
		assert_eq!(empty.center(), None);
	}
}
