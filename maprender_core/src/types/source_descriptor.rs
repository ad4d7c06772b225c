//! Classification of source and tile URLs by their scheme prefix.
//!
//! | URL | scheme | locator |
//! |---|---|---|
//! | `mbtiles://<name>/…` | [`SourceScheme::LocalMBTiles`] | `<name>` |
//! | `pmtiles://<name>/…` | [`SourceScheme::LocalPMTiles`] | `<name>` |
//! | `pmtiles://http(s)://<host>/<path>` | [`SourceScheme::RemotePMTiles`] | `http(s)://<host>/<path>` |
//! | `http(s)://…` | [`SourceScheme::RemoteTileServer`] | the URL itself |

use super::TileAddress;
use anyhow::{Result, bail, ensure};
use std::fmt;

pub const MBTILES_SCHEME: &str = "mbtiles://";
pub const PMTILES_SCHEME: &str = "pmtiles://";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceScheme {
	LocalMBTiles,
	LocalPMTiles,
	RemotePMTiles,
	RemoteTileServer,
}

/// Where a source lives and how it is addressed. Derived purely from the URL prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceDescriptor {
	pub scheme: SourceScheme,
	pub locator: String,
}

/// Returns the archive name of a local archive URL: the first path segment after `://`.
///
/// ```rust
/// use maprender_core::resolve_name_from_url;
/// assert_eq!(resolve_name_from_url("mbtiles://berlin/1/2/3.pbf"), "berlin");
/// ```
#[must_use]
pub fn resolve_name_from_url(url: &str) -> &str {
	let rest = url.split_once("://").map_or("", |(_, rest)| rest);
	rest.split('/').next().unwrap_or("")
}

pub fn is_http_url(url: &str) -> bool {
	url.starts_with("http://") || url.starts_with("https://")
}

impl SourceDescriptor {
	/// Classifies a source (metadata) URL.
	pub fn from_source_url(url: &str) -> Result<SourceDescriptor> {
		if let Some(rest) = url.strip_prefix(MBTILES_SCHEME) {
			Self::local(SourceScheme::LocalMBTiles, url, rest)
		} else if let Some(rest) = url.strip_prefix(PMTILES_SCHEME) {
			if is_http_url(rest) {
				Ok(SourceDescriptor {
					scheme: SourceScheme::RemotePMTiles,
					locator: rest.trim_end_matches('/').to_string(),
				})
			} else {
				Self::local(SourceScheme::LocalPMTiles, url, rest)
			}
		} else if is_http_url(url) {
			Ok(SourceDescriptor {
				scheme: SourceScheme::RemoteTileServer,
				locator: url.to_string(),
			})
		} else {
			bail!("unsupported source URL '{url}'")
		}
	}

	/// Classifies a tile URL and parses its tile address.
	///
	/// Remote tile server URLs are fetched as they are, so their address is not parsed.
	pub fn from_tile_url(url: &str) -> Result<(SourceDescriptor, Option<TileAddress>)> {
		if url.starts_with(MBTILES_SCHEME) || url.starts_with(PMTILES_SCHEME) {
			let (prefix, address) = TileAddress::split_url(url)?;
			Ok((Self::from_source_url(prefix)?, Some(address)))
		} else if is_http_url(url) {
			Ok((Self::from_source_url(url)?, None))
		} else {
			bail!("unsupported tile URL '{url}'")
		}
	}

	fn local(scheme: SourceScheme, url: &str, rest: &str) -> Result<SourceDescriptor> {
		let name = rest.split('/').next().unwrap_or("");
		ensure!(!name.is_empty(), "archive name is missing in '{url}'");
		Ok(SourceDescriptor {
			scheme,
			locator: name.to_string(),
		})
	}

	#[must_use]
	pub fn is_archive(&self) -> bool {
		self.scheme != SourceScheme::RemoteTileServer
	}
}

impl fmt::Display for SourceDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.scheme {
			SourceScheme::LocalMBTiles => write!(f, "{MBTILES_SCHEME}{}", self.locator),
			SourceScheme::LocalPMTiles | SourceScheme::RemotePMTiles => write!(f, "{PMTILES_SCHEME}{}", self.locator),
			SourceScheme::RemoteTileServer => write!(f, "{}", self.locator),
		}
	}
}
