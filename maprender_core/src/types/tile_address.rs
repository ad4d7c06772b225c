//! Tile addresses parsed from the trailing `/<z>/<x>/<y>[.ext]` segment of a resource URL.
//!
//! ```rust
//! use maprender_core::{TileAddress, TileKind};
//!
//! let (prefix, address) = TileAddress::split_url("mbtiles://berlin/14/8800/5373.pbf").unwrap();
//! assert_eq!(prefix, "mbtiles://berlin");
//! assert_eq!((address.level, address.x, address.y), (14, 8800, 5373));
//! assert_eq!(address.kind, TileKind::Vector);
//! ```

use anyhow::{Result, anyhow, ensure};
use regex::Regex;
use std::{fmt, sync::LazyLock};

/// Whether a tile carries vector data (and may arrive compressed) or a raster image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
	Vector,
	Raster,
}

impl TileKind {
	/// Derives the kind from a file extension such as `pbf` or `png`.
	/// A missing extension counts as raster.
	#[must_use]
	pub fn from_extension(extension: Option<&str>) -> TileKind {
		match extension.map(str::to_ascii_lowercase).as_deref() {
			Some("pbf" | "mvt") => TileKind::Vector,
			_ => TileKind::Raster,
		}
	}
}

/// A `(zoom, column, row)` triple in XYZ order plus the payload kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
	pub level: u8,
	pub x: u32,
	pub y: u32,
	pub kind: TileKind,
}

static RE_TILE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(.*)/(\d+)/(\d+)/(\d+)(?:\.([A-Za-z0-9]+))?$").expect("tile suffix regex is valid")
});

impl TileAddress {
	pub fn new(level: u8, x: u32, y: u32, kind: TileKind) -> Result<TileAddress> {
		ensure!(level <= 31, "zoom level {level} must not exceed 31");
		let size = 1u64 << level;
		ensure!(
			u64::from(x) < size && u64::from(y) < size,
			"tile {x}/{y} lies outside of the {size}x{size} grid at zoom {level}"
		);
		Ok(TileAddress { level, x, y, kind })
	}

	/// Splits a tile URL into everything before the address and the parsed address.
	pub fn split_url(url: &str) -> Result<(&str, TileAddress)> {
		let caps = RE_TILE_SUFFIX
			.captures(url)
			.ok_or_else(|| anyhow!("URL '{url}' does not end with a /<z>/<x>/<y> tile address"))?;

		let level: u8 = caps[2].parse().map_err(|_| anyhow!("invalid zoom level in '{url}'"))?;
		let x: u32 = caps[3].parse().map_err(|_| anyhow!("invalid column in '{url}'"))?;
		let y: u32 = caps[4].parse().map_err(|_| anyhow!("invalid row in '{url}'"))?;
		let kind = TileKind::from_extension(caps.get(5).map(|m| m.as_str()));

		let prefix_end = caps.get(1).map_or(0, |m| m.end());
		Ok((&url[..prefix_end], TileAddress::new(level, x, y, kind)?))
	}

	pub fn from_url(url: &str) -> Result<TileAddress> {
		Ok(Self::split_url(url)?.1)
	}

	/// Row index in TMS order, as stored in MBTiles.
	#[must_use]
	pub fn tms_row(&self) -> u32 {
		((1u64 << self.level) - 1 - u64::from(self.y)) as u32
	}
}

impl fmt::Debug for TileAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileAddress({}, [{}, {}], {:?})", self.level, self.x, self.y, self.kind)
	}
}

impl fmt::Display for TileAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("mbtiles://osm/0/0/0.pbf", "mbtiles://osm", 0, 0, 0, TileKind::Vector)]
	#[case("pmtiles://osm/3/4/5.mvt", "pmtiles://osm", 3, 4, 5, TileKind::Vector)]
	#[case("mbtiles://satellite/2/1/3.png", "mbtiles://satellite", 2, 1, 3, TileKind::Raster)]
	#[case("mbtiles://satellite/2/1/3", "mbtiles://satellite", 2, 1, 3, TileKind::Raster)]
	#[case(
		"pmtiles://https://example.org/data/world.pmtiles/5/16/10.pbf",
		"pmtiles://https://example.org/data/world.pmtiles",
		5,
		16,
		10,
		TileKind::Vector
	)]
	fn split_url_cases(
		#[case] url: &str,
		#[case] prefix: &str,
		#[case] level: u8,
		#[case] x: u32,
		#[case] y: u32,
		#[case] kind: TileKind,
	) -> Result<()> {
		let (p, address) = TileAddress::split_url(url)?;
		assert_eq!(p, prefix);
		assert_eq!(address, TileAddress::new(level, x, y, kind)?);
		Ok(())
	}

	#[rstest]
	#[case("mbtiles://osm")]
	#[case("mbtiles://osm/1/2")]
	#[case("mbtiles://osm/1/2/3/")]
	#[case("mbtiles://osm/a/2/3.pbf")]
	#[case("mbtiles://osm/1/2/0.pbf")]
	#[case("mbtiles://osm/40/0/0.pbf")]
	fn split_url_rejects(#[case] url: &str) {
		assert!(TileAddress::split_url(url).is_err(), "{url} should be rejected");
	}

	#[test]
	fn tms_row_flips_y() -> Result<()> {
		assert_eq!(TileAddress::new(0, 0, 0, TileKind::Raster)?.tms_row(), 0);
		assert_eq!(TileAddress::new(3, 1, 2, TileKind::Raster)?.tms_row(), 5);
		assert_eq!(TileAddress::new(31, 0, 0, TileKind::Raster)?.tms_row(), (1u32 << 31) - 1);
		Ok(())
	}

	#[test]
	fn formatting() -> Result<()> {
		let address = TileAddress::new(4, 8, 5, TileKind::Vector)?;
		assert_eq!(address.to_string(), "4/8/5");
		assert_eq!(format!("{address:?}"), "TileAddress(4, [8, 5], Vector)");
		Ok(())
	}
}
