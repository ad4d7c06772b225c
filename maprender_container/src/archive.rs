//! What every opened archive offers, independent of its file format.

use anyhow::Result;
use async_trait::async_trait;
use maprender_core::{Blob, MBTILES_SCHEME, PMTILES_SCHEME, TileAddress, resolve_name_from_url};
use std::{
	fmt::Debug,
	path::{Path, PathBuf},
};

/// The two local archive formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
	MBTiles,
	PMTiles,
}

impl ArchiveKind {
	#[must_use]
	pub fn extension(&self) -> &'static str {
		match self {
			ArchiveKind::MBTiles => "mbtiles",
			ArchiveKind::PMTiles => "pmtiles",
		}
	}

	#[must_use]
	pub fn scheme(&self) -> &'static str {
		match self {
			ArchiveKind::MBTiles => MBTILES_SCHEME,
			ArchiveKind::PMTiles => PMTILES_SCHEME,
		}
	}

	/// Maps an archive URL such as `mbtiles://name/0/0/0.pbf` to `<tile_path>/name.mbtiles`.
	///
	/// ```rust
	/// use maprender_container::ArchiveKind;
	///
	/// let path = ArchiveKind::PMTiles.resolve_archive_url("/data/tiles", "pmtiles://osm/1/0/0.mvt");
	/// assert_eq!(path, "/data/tiles/osm.pmtiles");
	/// ```
	#[must_use]
	pub fn resolve_archive_url(&self, tile_path: &str, url: &str) -> String {
		format!("{tile_path}/{}.{}", resolve_name_from_url(url), self.extension())
	}

	#[must_use]
	pub fn archive_path(&self, tile_path: &Path, name: &str) -> PathBuf {
		tile_path.join(format!("{name}.{}", self.extension()))
	}
}

/// Summary metadata of an archive.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveInfo {
	pub minzoom: u8,
	pub maxzoom: u8,
	/// `[longitude, latitude, zoom]`
	pub center: [f64; 3],
	/// `[west, south, east, north]`
	pub bounds: [f64; 4],
	/// Tile format as named in MBTiles metadata: `pbf`, `png`, `jpg`, `webp`, `avif` or `unknown`.
	pub format: String,
}

impl ArchiveInfo {
	#[must_use]
	pub fn is_vector(&self) -> bool {
		self.format == "pbf"
	}
}

/// An opened archive. Implementations are shared between concurrent requests.
#[async_trait]
pub trait ArchiveReaderTrait: Debug + Send + Sync {
	fn kind(&self) -> ArchiveKind;

	fn name(&self) -> &str;

	fn info(&self) -> &ArchiveInfo;

	/// Returns the stored payload of a tile, or `None` if the archive does not contain it.
	async fn get_tile_data(&self, address: &TileAddress) -> Result<Option<Blob>>;
}
