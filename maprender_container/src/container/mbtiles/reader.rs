//! Reads tiles and summary metadata from an MBTiles (SQLite) archive.
//!
//! The `metadata` table is read once when the archive is opened:
//!
//! - `minzoom`/`maxzoom`, falling back to the zoom levels present in the `tiles` table
//! - `bounds` (`w,s,e,n`), falling back to the full Web-Mercator extent
//! - `center` (`lon,lat,zoom`), falling back to the middle of the bounds
//! - `format`, e.g. `pbf` for gzip compressed vector tiles
//!
//! Tiles are addressed in XYZ order and converted to the TMS rows MBTiles stores.
//! SQLite calls run on tokio's blocking thread pool.

use crate::{ArchiveInfo, ArchiveKind, ArchiveReaderTrait};
use anyhow::{Context, Result, bail, ensure};
use async_trait::async_trait;
use maprender_core::{Blob, TileAddress, WEB_MERCATOR_BOUNDS, center_of_bounds};
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension},
};
use std::{collections::HashMap, path::Path};

pub struct MBTilesReader {
	name: String,
	pool: Pool<SqliteConnectionManager>,
	info: ArchiveInfo,
}

impl MBTilesReader {
	/// Opens the SQLite database read-only and loads its metadata.
	pub async fn open_path(path: &Path) -> Result<MBTilesReader> {
		log::debug!("open {path:?}");

		let Ok(metadata) = tokio::fs::metadata(path).await else {
			bail!("file {path:?} does not exist");
		};
		ensure!(metadata.is_file(), "path {path:?} must be a file");

		let manager = SqliteConnectionManager::file(path).with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY);
		let name = path.to_string_lossy().into_owned();

		let (pool, info) = tokio::task::spawn_blocking(move || -> Result<_> {
			let pool = Pool::builder().max_size(4).build(manager)?;
			let info = load_info(&pool)?;
			Ok((pool, info))
		})
		.await?
		.with_context(|| format!("opening MBTiles '{name}'"))?;

		log::trace!("metadata of {name}: {info:?}");

		Ok(MBTilesReader { name, pool, info })
	}
}

fn load_info(pool: &Pool<SqliteConnectionManager>) -> Result<ArchiveInfo> {
	let conn = pool.get()?;

	let mut stmt = conn.prepare("SELECT name, value FROM metadata")?;
	let metadata = stmt
		.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
		.collect::<Result<HashMap<String, String>, _>>()?;

	let numbers = |key: &str| -> Result<Option<Vec<f64>>> {
		metadata
			.get(key)
			.map(|value| {
				value
					.split(',')
					.map(|s| s.trim().parse::<f64>())
					.collect::<Result<Vec<f64>, _>>()
					.with_context(|| format!("invalid '{key}' in metadata: '{value}'"))
			})
			.transpose()
	};
	let zoom = |key: &str, sql: &str| -> Result<u8> {
		if let Some(value) = metadata.get(key) {
			return value
				.trim()
				.parse::<u8>()
				.with_context(|| format!("invalid '{key}' in metadata: '{value}'"));
		}
		let value: Option<u8> = conn.query_row(sql, [], |row| row.get(0))?;
		Ok(value.unwrap_or(0))
	};

	let minzoom = zoom("minzoom", "SELECT MIN(zoom_level) FROM tiles")?;
	let maxzoom = zoom("maxzoom", "SELECT MAX(zoom_level) FROM tiles")?;

	let bounds = match numbers("bounds")? {
		Some(values) => <[f64; 4]>::try_from(values)
			.map_err(|v| anyhow::anyhow!("'bounds' must have 4 values, found {}", v.len()))?,
		None => WEB_MERCATOR_BOUNDS,
	};

	let center = match numbers("center")? {
		Some(values) if values.len() == 3 => [values[0], values[1], values[2]],
		Some(values) if values.len() == 2 => [values[0], values[1], f64::from(minzoom)],
		Some(values) => bail!("'center' must have 2 or 3 values, found {}", values.len()),
		None => {
			let range = maxzoom.saturating_sub(minzoom);
			let zoom = minzoom + range / 2;
			center_of_bounds(&bounds, zoom)
		}
	};

	Ok(ArchiveInfo {
		minzoom,
		maxzoom,
		center,
		bounds,
		format: metadata.get("format").cloned().unwrap_or_else(|| String::from("unknown")),
	})
}

#[async_trait]
impl ArchiveReaderTrait for MBTilesReader {
	fn kind(&self) -> ArchiveKind {
		ArchiveKind::MBTiles
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn info(&self) -> &ArchiveInfo {
		&self.info
	}

	async fn get_tile_data(&self, address: &TileAddress) -> Result<Option<Blob>> {
		log::trace!("read tile {address:?} from {}", self.name);

		let pool = self.pool.clone();
		let params = [address.x, address.tms_row(), u32::from(address.level)];

		let data = tokio::task::spawn_blocking(move || -> Result<Option<Vec<u8>>> {
			let conn = pool.get()?;
			let mut stmt =
				conn.prepare_cached("SELECT tile_data FROM tiles WHERE tile_column = ? AND tile_row = ? AND zoom_level = ?")?;
			Ok(stmt.query_row(params, |row| row.get::<_, Vec<u8>>(0)).optional()?)
		})
		.await?
		.with_context(|| format!("fetching tile {address} from '{}'", self.name))?;

		Ok(data.map(Blob::from))
	}
}

impl std::fmt::Debug for MBTilesReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MBTilesReader")
			.field("name", &self.name)
			.field("info", &self.info)
			.finish()
	}
}
