//! Local MBTiles and PMTiles archives and PMTiles archives hosted on web servers.
//!
//! Handles are opened on first use and shared through one [`ArchiveHandleCache`] per archive
//! kind, keyed by the archive name or the remote URL.

use anyhow::{Context, Result, bail, ensure};
use maprender_container::{
	ArchiveHandleCache, ArchiveKind, ArchiveReaderTrait, CachePolicy, MBTilesReader, PMTilesReader,
};
use maprender_core::{
	Blob, SourceDescriptor, SourceScheme, TILEJSON_VERSION, TileAddress, TileJSON, TileKind,
	io::DataReaderHttp,
	utils::{decompress_gzip_or_raw, unzip},
};
use reqwest::{Client, Url};
use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

type ArchiveHandle = Arc<dyn ArchiveReaderTrait>;

#[derive(Debug)]
pub struct ArchiveSources {
	tile_path: PathBuf,
	client: Client,
	mbtiles: ArchiveHandleCache<dyn ArchiveReaderTrait>,
	pmtiles: ArchiveHandleCache<dyn ArchiveReaderTrait>,
}

impl ArchiveSources {
	/// `tile_path` is the directory local archives are looked up in.
	#[must_use]
	pub fn new(tile_path: &Path, policy: CachePolicy, client: Client) -> Self {
		ArchiveSources {
			tile_path: tile_path.to_path_buf(),
			client,
			mbtiles: ArchiveHandleCache::new(policy),
			pmtiles: ArchiveHandleCache::new(policy),
		}
	}

	#[must_use]
	pub fn mbtiles_cache(&self) -> &ArchiveHandleCache<dyn ArchiveReaderTrait> {
		&self.mbtiles
	}

	#[must_use]
	pub fn pmtiles_cache(&self) -> &ArchiveHandleCache<dyn ArchiveReaderTrait> {
		&self.pmtiles
	}

	/// Drops all open archive handles.
	pub fn clear(&self) {
		self.mbtiles.clear();
		self.pmtiles.clear();
	}

	async fn handle(&self, source: &SourceDescriptor) -> Result<ArchiveHandle> {
		let locator = source.locator.as_str();
		match source.scheme {
			SourceScheme::LocalMBTiles => {
				let path = ArchiveKind::MBTiles.archive_path(&self.tile_path, locator);
				self
					.mbtiles
					.get_or_open(locator, || async move {
						Ok::<_, anyhow::Error>(Arc::new(MBTilesReader::open_path(&path).await?) as ArchiveHandle)
					})
					.await
			}
			SourceScheme::LocalPMTiles => {
				let path = ArchiveKind::PMTiles.archive_path(&self.tile_path, locator);
				self
					.pmtiles
					.get_or_open(locator, || async move {
						Ok::<_, anyhow::Error>(Arc::new(PMTilesReader::open_path(&path).await?) as ArchiveHandle)
					})
					.await
			}
			SourceScheme::RemotePMTiles => {
				let url = Url::parse(locator).with_context(|| format!("parsing archive URL '{locator}'"))?;
				let client = self.client.clone();
				self
					.pmtiles
					.get_or_open(locator, || async move {
						let reader = DataReaderHttp::from_url_with_client(url, client)?;
						Ok::<_, anyhow::Error>(Arc::new(PMTilesReader::open_reader(reader).await?) as ArchiveHandle)
					})
					.await
			}
			SourceScheme::RemoteTileServer => bail!("'{source}' is not a tile archive"),
		}
	}

	/// Builds the TileJSON of an archive from its metadata.
	pub async fn tilejson(&self, source: &SourceDescriptor) -> Result<TileJSON> {
		let handle = self
			.handle(source)
			.await
			.with_context(|| format!("opening archive '{source}'"))?;
		let info = handle.info();

		let (template, format) = match handle.kind() {
			ArchiveKind::MBTiles => {
				let extension = if info.is_vector() { ".pbf" } else { "" };
				(format!("{source}/{{z}}/{{x}}/{{y}}{extension}"), None)
			}
			ArchiveKind::PMTiles => {
				ensure!(
					info.is_vector(),
					"unsupported tile type '{}' in '{source}', only vector tiles are supported",
					info.format
				);
				(format!("{source}/{{z}}/{{x}}/{{y}}.mvt"), Some(String::from("pbf")))
			}
		};

		Ok(TileJSON {
			tilejson: TILEJSON_VERSION.to_string(),
			tiles: vec![template],
			minzoom: info.minzoom,
			maxzoom: info.maxzoom,
			center: info.center,
			bounds: info.bounds,
			format,
		})
	}

	/// Reads a tile. `None` means the archive does not contain it.
	///
	/// Vector tiles from MBTiles are decompressed and must be valid gzip or zlib streams.
	/// PMTiles payloads are gunzipped if possible and returned unchanged otherwise.
	pub async fn tile(&self, source: &SourceDescriptor, address: &TileAddress) -> Result<Option<Blob>> {
		let handle = self
			.handle(source)
			.await
			.with_context(|| format!("opening archive '{source}'"))?;

		let Some(blob) = handle.get_tile_data(address).await? else {
			match handle.kind() {
				ArchiveKind::MBTiles => log::warn!("tile not found: {address} in '{}'", handle.name()),
				ArchiveKind::PMTiles => log::debug!("tile not found: {address} in '{}'", handle.name()),
			}
			return Ok(None);
		};

		Ok(Some(match (handle.kind(), address.kind) {
			(ArchiveKind::MBTiles, TileKind::Vector) => {
				unzip(&blob).with_context(|| format!("decompressing tile {address} of '{source}'"))?
			}
			(ArchiveKind::MBTiles, TileKind::Raster) => blob,
			(ArchiveKind::PMTiles, _) => decompress_gzip_or_raw(blob),
		}))
	}
}
