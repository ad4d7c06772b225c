use super::ResourceKind;
use anyhow::{Result, bail, ensure};
use maprender_core::{SourceDescriptor, TileAddress, is_http_url};
use std::path::{Component, Path, PathBuf};

/// Where a resource request is resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
	/// Nothing to fetch; answered with an empty success.
	Noop,
	ArchiveTileJson(SourceDescriptor),
	ArchiveTile(SourceDescriptor, TileAddress),
	/// A tile URL template of a remote tile server.
	TileServerTileJson(String),
	TileServerTile(String),
	RemoteAsset(String),
	LocalAsset(PathBuf),
}

impl Route {
	/// Classifies a request without doing any I/O.
	///
	/// Local glyphs are looked up in `<data_path>/fonts`, local sprites in `<data_path>/sprites`.
	pub fn classify(kind: ResourceKind, url: &str, data_path: &Path) -> Result<Route> {
		Ok(match kind {
			ResourceKind::Style | ResourceKind::ImageSource => Route::Noop,
			ResourceKind::Source => {
				let source = SourceDescriptor::from_source_url(url)?;
				if source.is_archive() {
					Route::ArchiveTileJson(source)
				} else {
					Route::TileServerTileJson(url.to_string())
				}
			}
			ResourceKind::Tile => match SourceDescriptor::from_tile_url(url)? {
				(source, Some(address)) => Route::ArchiveTile(source, address),
				(_, None) => Route::TileServerTile(url.to_string()),
			},
			ResourceKind::Glyph | ResourceKind::SpriteImage | ResourceKind::SpriteJson if is_http_url(url) => {
				Route::RemoteAsset(url.to_string())
			}
			ResourceKind::Glyph => Route::LocalAsset(local_asset_path(data_path, "fonts", &url.replace("%20", " "))?),
			ResourceKind::SpriteImage | ResourceKind::SpriteJson => {
				Route::LocalAsset(local_asset_path(data_path, "sprites", url)?)
			}
		})
	}
}

fn local_asset_path(data_path: &Path, folder: &str, url: &str) -> Result<PathBuf> {
	if url.contains("://") {
		bail!("unsupported asset URL '{url}'");
	}
	let relative = Path::new(url.trim_start_matches('/'));
	ensure!(
		relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)),
		"asset path '{url}' leaves the {folder} directory"
	);
	Ok(data_path.join(folder).join(relative))
}

#[cfg(test)]
mod tests {
	use super::*;
	use maprender_core::{SourceScheme, TileKind};
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn classify(kind: ResourceKind, url: &str) -> Result<Route> {
		Route::classify(kind, url, Path::new("/data"))
	}

	fn descriptor(scheme: SourceScheme, locator: &str) -> SourceDescriptor {
		SourceDescriptor {
			scheme,
			locator: locator.to_string(),
		}
	}

	#[rstest]
	#[case("mbtiles://berlin", SourceScheme::LocalMBTiles, "berlin")]
	#[case("pmtiles://planet", SourceScheme::LocalPMTiles, "planet")]
	#[case("pmtiles://https://host/planet.pmtiles", SourceScheme::RemotePMTiles, "https://host/planet.pmtiles")]
	fn archive_sources(#[case] url: &str, #[case] scheme: SourceScheme, #[case] locator: &str) {
		assert_eq!(
			classify(ResourceKind::Source, url).unwrap(),
			Route::ArchiveTileJson(descriptor(scheme, locator))
		);
	}

	#[test]
	fn tile_server_source() {
		let url = "https://tiles.example/{z}/{x}/{y}.pbf";
		assert_eq!(
			classify(ResourceKind::Source, url).unwrap(),
			Route::TileServerTileJson(url.to_string())
		);
	}

	#[rstest]
	#[case("mbtiles://berlin/3/4/5.pbf", SourceScheme::LocalMBTiles, "berlin", TileKind::Vector)]
	#[case("mbtiles://berlin/3/4/5.png", SourceScheme::LocalMBTiles, "berlin", TileKind::Raster)]
	#[case("pmtiles://planet/3/4/5.mvt", SourceScheme::LocalPMTiles, "planet", TileKind::Vector)]
	#[case(
		"pmtiles://https://host/planet.pmtiles/3/4/5.mvt",
		SourceScheme::RemotePMTiles,
		"https://host/planet.pmtiles",
		TileKind::Vector
	)]
	fn archive_tiles(#[case] url: &str, #[case] scheme: SourceScheme, #[case] locator: &str, #[case] kind: TileKind) {
		assert_eq!(
			classify(ResourceKind::Tile, url).unwrap(),
			Route::ArchiveTile(descriptor(scheme, locator), TileAddress::new(3, 4, 5, kind).unwrap())
		);
	}

	#[test]
	fn tile_server_tile() {
		let url = "https://tiles.example/3/4/5.pbf";
		assert_eq!(
			classify(ResourceKind::Tile, url).unwrap(),
			Route::TileServerTile(url.to_string())
		);
	}

	#[rstest]
	#[case(ResourceKind::Glyph, "Open%20Sans%20Regular/0-255.pbf", "/data/fonts/Open Sans Regular/0-255.pbf")]
	#[case(ResourceKind::SpriteImage, "basic/sprite@2x.png", "/data/sprites/basic/sprite@2x.png")]
	#[case(ResourceKind::SpriteJson, "/basic/sprite.json", "/data/sprites/basic/sprite.json")]
	fn local_assets(#[case] kind: ResourceKind, #[case] url: &str, #[case] path: &str) {
		assert_eq!(classify(kind, url).unwrap(), Route::LocalAsset(PathBuf::from(path)));
	}

	#[rstest]
	#[case(ResourceKind::Glyph, "https://fonts.example/Noto/0-255.pbf")]
	#[case(ResourceKind::SpriteImage, "http://sprites.example/sprite.png")]
	#[case(ResourceKind::SpriteJson, "https://sprites.example/sprite.json")]
	fn remote_assets(#[case] kind: ResourceKind, #[case] url: &str) {
		assert_eq!(classify(kind, url).unwrap(), Route::RemoteAsset(url.to_string()));
	}

	#[rstest]
	#[case(ResourceKind::Style)]
	#[case(ResourceKind::ImageSource)]
	fn noop(#[case] kind: ResourceKind) {
		assert_eq!(classify(kind, "anything").unwrap(), Route::Noop);
	}

	#[rstest]
	#[case(ResourceKind::Source, "ftp://host/tiles", "unsupported source URL")]
	#[case(ResourceKind::Tile, "file:///tiles/1/2/3.pbf", "unsupported tile URL")]
	#[case(ResourceKind::Tile, "mbtiles://berlin/tiles.pbf", "")]
	#[case(ResourceKind::Glyph, "ftp://fonts/0-255.pbf", "unsupported asset URL")]
	#[case(ResourceKind::SpriteJson, "../secret.json", "leaves the sprites directory")]
	fn unsupported(#[case] kind: ResourceKind, #[case] url: &str, #[case] message: &str) {
		let error = classify(kind, url).unwrap_err().to_string();
		assert!(error.contains(message), "{error}");
	}
}
