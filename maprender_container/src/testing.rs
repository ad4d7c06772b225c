//! Writers for small MBTiles and PMTiles archives, used by the tests of this workspace.

use crate::{EntriesV3, EntryV3, HeaderV3, PMTilesCompression, PMTilesType, tile_id};
use anyhow::Result;
use maprender_core::{Blob, ByteRange, TileAddress, TileKind, utils::compress_gzip};
use r2d2_sqlite::rusqlite::Connection;
use serde_json::Value;
use std::path::Path;

/// Describes the content of a PMTiles archive written by [`write_pmtiles`].
#[derive(Clone, Debug)]
pub struct PMTilesFixture {
	pub tile_type: PMTilesType,
	/// Tiles as `((z, x, y), data)`, stored in the order of their tile ids.
	pub tiles: Vec<((u8, u32, u32), Blob)>,
	pub metadata: Value,
	/// Moves the tile entries into leaf directories of at most this many entries.
	pub leaf_size: Option<usize>,
	/// Stores tile data gzip compressed.
	pub gzip_tiles: bool,
}

impl PMTilesFixture {
	#[must_use]
	pub fn vector(tiles: Vec<((u8, u32, u32), Blob)>) -> Self {
		PMTilesFixture {
			tile_type: PMTilesType::MVT,
			tiles,
			metadata: Value::Null,
			leaf_size: None,
			gzip_tiles: true,
		}
	}

	#[must_use]
	pub fn raster(tiles: Vec<((u8, u32, u32), Blob)>) -> Self {
		PMTilesFixture {
			tile_type: PMTilesType::PNG,
			tiles,
			metadata: Value::Null,
			leaf_size: None,
			gzip_tiles: false,
		}
	}

	/// A header without bounds, center or content.
	#[must_use]
	pub fn empty_header(tile_type: PMTilesType, min_zoom: u8, max_zoom: u8) -> HeaderV3 {
		HeaderV3 {
			root_dir: ByteRange::new(HeaderV3::LEN, 0),
			metadata: ByteRange::new(HeaderV3::LEN, 0),
			leaf_dirs: ByteRange::new(HeaderV3::LEN, 0),
			tile_data: ByteRange::new(HeaderV3::LEN, 0),
			addressed_tiles_count: 0,
			tile_entries_count: 0,
			tile_contents_count: 0,
			clustered: true,
			internal_compression: PMTilesCompression::Gzip,
			tile_compression: PMTilesCompression::None,
			tile_type,
			min_zoom,
			max_zoom,
			min_lon_e7: 0,
			min_lat_e7: 0,
			max_lon_e7: 0,
			max_lat_e7: 0,
			center_zoom: min_zoom,
			center_lon_e7: 0,
			center_lat_e7: 0,
		}
	}
}

/// Writes a PMTiles v3 archive laid out as header, root directory, metadata, leaf directories and tile data.
pub fn write_pmtiles(path: &Path, fixture: &PMTilesFixture) -> Result<()> {
	let mut tiles = fixture
		.tiles
		.iter()
		.map(|((z, x, y), blob)| {
			let id = tile_id(&TileAddress::new(*z, *x, *y, TileKind::Vector)?)?;
			Ok((id, blob.clone()))
		})
		.collect::<Result<Vec<_>>>()?;
	tiles.sort_by_key(|(id, _)| *id);

	let mut tile_data: Vec<u8> = Vec::new();
	let mut entries: Vec<EntryV3> = Vec::new();
	for (id, blob) in &tiles {
		let blob = if fixture.gzip_tiles { compress_gzip(blob)? } else { blob.clone() };
		entries.push(EntryV3::new(*id, ByteRange::new(tile_data.len() as u64, blob.len()), 1));
		tile_data.extend_from_slice(blob.as_slice());
	}

	let mut leaf_data: Vec<u8> = Vec::new();
	let root_entries = match fixture.leaf_size {
		Some(size) => {
			let mut root = Vec::new();
			for chunk in entries.chunks(size.max(1)) {
				let leaf = compress_gzip(&EntriesV3::from_entries(chunk.to_vec()).serialize()?)?;
				root.push(EntryV3::new(
					chunk[0].tile_id,
					ByteRange::new(leaf_data.len() as u64, leaf.len()),
					0,
				));
				leaf_data.extend_from_slice(leaf.as_slice());
			}
			root
		}
		None => entries,
	};

	let root = compress_gzip(&EntriesV3::from_entries(root_entries).serialize()?)?;
	let metadata = compress_gzip(&Blob::from(serde_json::to_vec(&fixture.metadata)?))?;

	let min_zoom = fixture.tiles.iter().map(|((z, _, _), _)| *z).min().unwrap_or(0);
	let max_zoom = fixture.tiles.iter().map(|((z, _, _), _)| *z).max().unwrap_or(0);

	let mut header = PMTilesFixture::empty_header(fixture.tile_type, min_zoom, max_zoom);
	header.root_dir = ByteRange::new(HeaderV3::LEN, root.len());
	header.metadata = ByteRange::new(header.root_dir.offset + header.root_dir.length, metadata.len());
	header.leaf_dirs = ByteRange::new(header.metadata.offset + header.metadata.length, leaf_data.len() as u64);
	header.tile_data = ByteRange::new(header.leaf_dirs.offset + header.leaf_dirs.length, tile_data.len() as u64);
	header.addressed_tiles_count = tiles.len() as u64;
	header.tile_entries_count = tiles.len() as u64;
	header.tile_contents_count = tiles.len() as u64;
	if fixture.gzip_tiles {
		header.tile_compression = PMTilesCompression::Gzip;
	}

	let mut file: Vec<u8> = header.serialize()?.into_vec();
	file.extend_from_slice(root.as_slice());
	file.extend_from_slice(metadata.as_slice());
	file.extend_from_slice(&leaf_data);
	file.extend_from_slice(&tile_data);
	std::fs::write(path, file)?;
	Ok(())
}

/// Writes an MBTiles database. Tiles are given in XYZ order and stored as TMS rows.
pub fn write_mbtiles(path: &Path, metadata: &[(&str, &str)], tiles: &[((u8, u32, u32), Blob)]) -> Result<()> {
	let conn = Connection::open(path)?;
	conn.execute_batch(
		"CREATE TABLE metadata (name TEXT, value TEXT, UNIQUE (name));
		CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB,
			UNIQUE (zoom_level, tile_column, tile_row));",
	)?;

	for (name, value) in metadata {
		conn.execute("INSERT INTO metadata (name, value) VALUES (?1, ?2)", [name, value])?;
	}

	for ((z, x, y), blob) in tiles {
		let address = TileAddress::new(*z, *x, *y, TileKind::Raster)?;
		conn.execute(
			"INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
			(u32::from(*z), *x, address.tms_row(), blob.as_slice()),
		)?;
	}
	Ok(())
}
