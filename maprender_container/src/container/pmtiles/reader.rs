//! Reads tiles and summary metadata from a PMTiles v3 archive.
//!
//! The byte source is pluggable: [`PMTilesReader::open_path`] reads a local file,
//! [`PMTilesReader::open_reader`] accepts any [`DataReader`], e.g. a
//! [`DataReaderHttp`](maprender_core::io::DataReaderHttp) for archives hosted on a web server.
//!
//! Opening reads the header, the metadata JSON and the root directory. Leaf directories are
//! fetched on demand and kept in a small LRU cache per reader.

use super::types::{EntriesV3, HeaderV3, PMTilesType, tile_id};
use crate::{ArchiveInfo, ArchiveKind, ArchiveReaderTrait};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use lru::LruCache;
use maprender_core::{
	Blob, ByteRange, TileAddress, TileCompression, WEB_MERCATOR_BOUNDS, center_of_bounds,
	io::{DataReader, DataReaderFile},
	utils::decompress,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::{fmt::Debug, num::NonZeroUsize, path::Path, sync::Arc};

const LEAF_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(64).unwrap();
const MAX_DIRECTORY_DEPTH: usize = 4;

pub struct PMTilesReader {
	data_reader: DataReader,
	header: HeaderV3,
	info: ArchiveInfo,
	internal_compression: TileCompression,
	root_entries: Arc<EntriesV3>,
	leaves_cache: Mutex<LruCache<ByteRange, Arc<EntriesV3>>>,
}

impl PMTilesReader {
	pub async fn open_path(path: &Path) -> Result<PMTilesReader> {
		PMTilesReader::open_reader(DataReaderFile::open(path).await?).await
	}

	pub async fn open_reader(data_reader: DataReader) -> Result<PMTilesReader> {
		log::debug!("opening PMTiles archive {}", data_reader.get_name());

		let header = HeaderV3::deserialize(&data_reader.read_range(&ByteRange::new(0, HeaderV3::LEN)).await?)
			.with_context(|| format!("reading PMTiles header of '{}'", data_reader.get_name()))?;
		log::trace!("header: {header:?}");

		let internal_compression = header.internal_compression.as_value()?;

		let metadata = if header.metadata.length > 0 {
			let blob = decompress(data_reader.read_range(&header.metadata).await?, internal_compression)?;
			parse_metadata(&blob)
		} else {
			Value::Null
		};

		let root_bytes = decompress(data_reader.read_range(&header.root_dir).await?, internal_compression)?;
		let root_entries = Arc::new(EntriesV3::from_blob(&root_bytes)?);
		log::trace!("root directory has {} entries", root_entries.len());

		let info = build_info(&header, &metadata);

		Ok(PMTilesReader {
			data_reader,
			header,
			info,
			internal_compression,
			root_entries,
			leaves_cache: Mutex::new(LruCache::new(LEAF_CACHE_SIZE)),
		})
	}

	#[must_use]
	pub fn header(&self) -> &HeaderV3 {
		&self.header
	}

	#[must_use]
	pub fn tile_type(&self) -> PMTilesType {
		self.header.tile_type
	}

	async fn get_leaf(&self, range: ByteRange) -> Result<Arc<EntriesV3>> {
		let cached = self.leaves_cache.lock().get(&range).cloned();
		if let Some(entries) = cached {
			return Ok(entries);
		}

		let blob = self.data_reader.read_range(&range).await?;
		let entries = Arc::new(EntriesV3::from_blob(&decompress(blob, self.internal_compression)?)?);
		self.leaves_cache.lock().put(range, entries.clone());
		Ok(entries)
	}
}

#[async_trait]
impl ArchiveReaderTrait for PMTilesReader {
	fn kind(&self) -> ArchiveKind {
		ArchiveKind::PMTiles
	}

	fn name(&self) -> &str {
		self.data_reader.get_name()
	}

	fn info(&self) -> &ArchiveInfo {
		&self.info
	}

	async fn get_tile_data(&self, address: &TileAddress) -> Result<Option<Blob>> {
		log::trace!("get tile {address:?} from {}", self.name());

		let tile_id = tile_id(address)?;
		let mut entries = self.root_entries.clone();

		for _ in 0..MAX_DIRECTORY_DEPTH {
			let Some(entry) = entries.find_tile(tile_id) else {
				return Ok(None);
			};

			if entry.range.length == 0 {
				return Ok(None);
			}

			if entry.run_length > 0 {
				let range = entry.range.get_shifted_forward(self.header.tile_data.offset);
				return Ok(Some(self.data_reader.read_range(&range).await?));
			}

			entries = self
				.get_leaf(entry.range.get_shifted_forward(self.header.leaf_dirs.offset))
				.await?;
		}

		bail!(
			"PMTiles directories of '{}' are nested deeper than {} levels",
			self.name(),
			MAX_DIRECTORY_DEPTH - 1
		)
	}
}

impl Debug for PMTilesReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PMTilesReader")
			.field("name", &self.data_reader.get_name())
			.field("tile_type", &self.header.tile_type)
			.field("info", &self.info)
			.finish()
	}
}

fn parse_metadata(blob: &Blob) -> Value {
	match serde_json::from_slice(blob.as_slice()) {
		Ok(value) => value,
		Err(err) => {
			log::warn!("ignoring unparsable PMTiles metadata: {err}");
			Value::Null
		}
	}
}

/// Reads a list of numbers given either as a JSON array or as a comma separated string.
fn numbers<const N: usize>(value: Option<&Value>) -> Option<[f64; N]> {
	let numbers: Vec<f64> = match value? {
		Value::Array(items) => items.iter().map(Value::as_f64).collect::<Option<_>>()?,
		Value::String(text) => text
			.split(',')
			.map(|s| s.trim().parse::<f64>().ok())
			.collect::<Option<_>>()?,
		_ => return None,
	};
	numbers.try_into().ok()
}

/// Center and bounds come from the metadata JSON, then the header, then the whole world.
fn build_info(header: &HeaderV3, metadata: &Value) -> ArchiveInfo {
	let bounds = numbers::<4>(metadata.get("bounds"))
		.or_else(|| header.bounds())
		.unwrap_or(WEB_MERCATOR_BOUNDS);

	let center = numbers::<3>(metadata.get("center"))
		.or_else(|| numbers::<2>(metadata.get("center")).map(|[lon, lat]| [lon, lat, f64::from(header.center_zoom)]))
		.or_else(|| header.center())
		.unwrap_or_else(|| center_of_bounds(&bounds, header.min_zoom));

	ArchiveInfo {
		minzoom: header.min_zoom,
		maxzoom: header.max_zoom,
		center,
		bounds,
		format: header.tile_type.format_name().to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{PMTilesFixture, write_pmtiles};
	use assert_fs::TempDir;
	use maprender_core::{TileKind, utils::decompress_gzip};
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn address(level: u8, x: u32, y: u32) -> TileAddress {
		TileAddress::new(level, x, y, TileKind::Vector).unwrap()
	}

	#[tokio::test]
	async fn reads_tiles_and_misses() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("test.pmtiles");
		write_pmtiles(
			&path,
			&PMTilesFixture::vector(vec![
				((0, 0, 0), Blob::from("z0")),
				((1, 1, 0), Blob::from("z1")),
				((2, 3, 3), Blob::from("z2")),
			]),
		)?;

		let reader = PMTilesReader::open_path(&path).await?;
		assert_eq!(reader.tile_type(), PMTilesType::MVT);

		let tile = reader.get_tile_data(&address(1, 1, 0)).await?.unwrap();
		assert_eq!(decompress_gzip(&tile)?.as_str(), "z1");
		let tile = reader.get_tile_data(&address(2, 3, 3)).await?.unwrap();
		assert_eq!(decompress_gzip(&tile)?.as_str(), "z2");
		assert_eq!(reader.get_tile_data(&address(1, 0, 0)).await?, None);
		assert_eq!(reader.get_tile_data(&address(5, 1, 1)).await?, None);
		Ok(())
	}

	#[tokio::test]
	async fn reads_tiles_through_leaf_directories() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("leaves.pmtiles");
		let tiles = (0..8u32)
			.flat_map(|x| (0..8u32).map(move |y| ((3u8, x, y), Blob::from(format!("{x}/{y}")))))
			.collect::<Vec<_>>();
		let mut fixture = PMTilesFixture::vector(tiles);
		fixture.leaf_size = Some(10);
		write_pmtiles(&path, &fixture)?;

		let reader = PMTilesReader::open_path(&path).await?;
		assert!(reader.root_entries.iter().any(|e| e.is_leaf_pointer()));
		for (x, y) in [(0, 0), (7, 7), (3, 5), (6, 1)] {
			let tile = reader.get_tile_data(&address(3, x, y)).await?.unwrap();
			assert_eq!(decompress_gzip(&tile)?.as_str(), format!("{x}/{y}"));
		}
		assert_eq!(reader.get_tile_data(&address(4, 0, 0)).await?, None);
		Ok(())
	}

	#[tokio::test]
	async fn info_prefers_metadata_over_header() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("meta.pmtiles");
		let mut fixture = PMTilesFixture::vector(vec![((0, 0, 0), Blob::from("z0"))]);
		fixture.metadata = json!({ "bounds": "13,52,14,53", "center": [13.5, 52.5, 8] });
		write_pmtiles(&path, &fixture)?;

		let info = PMTilesReader::open_path(&path).await?.info().clone();
		assert_eq!(info.bounds, [13.0, 52.0, 14.0, 53.0]);
		assert_eq!(info.center, [13.5, 52.5, 8.0]);
		assert_eq!((info.minzoom, info.maxzoom), (0, 0));
		assert_eq!(info.format, "pbf");
		Ok(())
	}

	#[test]
	fn info_defaults_without_metadata_or_header_bounds() {
		let header = HeaderV3::deserialize(&PMTilesFixture::empty_header(PMTilesType::MVT, 2, 9).serialize().unwrap())
			.unwrap();
		let info = build_info(&header, &Value::Null);
		assert_eq!(info.bounds, WEB_MERCATOR_BOUNDS);
		assert_eq!(info.center, [0.0, 0.0, 2.0]);
		assert_eq!((info.minzoom, info.maxzoom), (2, 9));
	}

	#[test]
	fn number_lists() {
		assert_eq!(numbers::<2>(Some(&json!([1, 2.5]))), Some([1.0, 2.5]));
		assert_eq!(numbers::<2>(Some(&json!("1, 2.5"))), Some([1.0, 2.5]));
		assert_eq!(numbers::<3>(Some(&json!([1, 2]))), None);
		assert_eq!(numbers::<2>(Some(&json!({"a": 1}))), None);
		assert_eq!(numbers::<2>(None), None);
	}
}
