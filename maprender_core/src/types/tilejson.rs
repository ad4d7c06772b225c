//! The TileJSON document handed to the rendering engine for every source request.
//!
//! Only the fields the engine needs are modelled. The document always carries exactly one
//! tile URL template.

use super::Blob;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const TILEJSON_VERSION: &str = "1.0.0";

/// Full Web-Mercator extent as `[west, south, east, north]`.
pub const WEB_MERCATOR_BOUNDS: [f64; 4] = [-180.0, -85.051129, 180.0, 85.051129];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileJSON {
	pub tilejson: String,
	pub tiles: Vec<String>,
	pub minzoom: u8,
	pub maxzoom: u8,
	/// `[longitude, latitude, zoom]`
	pub center: [f64; 3],
	/// `[west, south, east, north]`
	pub bounds: [f64; 4],
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<String>,
}

impl TileJSON {
	/// Creates a document for `template` covering the whole world.
	#[must_use]
	pub fn new(template: &str, minzoom: u8, maxzoom: u8) -> TileJSON {
		TileJSON {
			tilejson: TILEJSON_VERSION.to_string(),
			tiles: vec![template.to_string()],
			minzoom,
			maxzoom,
			center: center_of_bounds(&WEB_MERCATOR_BOUNDS, minzoom),
			bounds: WEB_MERCATOR_BOUNDS,
			format: None,
		}
	}

	pub fn as_blob(&self) -> Result<Blob> {
		Ok(Blob::from(
			serde_json::to_vec(self).context("serializing TileJSON")?,
		))
	}

	pub fn from_blob(blob: &Blob) -> Result<TileJSON> {
		serde_json::from_slice(blob.as_slice()).context("parsing TileJSON")
	}
}

/// Midpoint of `bounds` at the given zoom, as a TileJSON center.
#[must_use]
pub fn center_of_bounds(bounds: &[f64; 4], zoom: u8) -> [f64; 3] {
	[
		(bounds[0] + bounds[2]) / 2.0,
		(bounds[1] + bounds[3]) / 2.0,
		f64::from(zoom),
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn serializes_without_missing_format() -> Result<()> {
		let tilejson = TileJSON::new("mbtiles://osm/{z}/{x}/{y}.pbf", 0, 14);
		assert_eq!(
			tilejson.as_blob()?.as_str(),
			"{\"tilejson\":\"1.0.0\",\"tiles\":[\"mbtiles://osm/{z}/{x}/{y}.pbf\"],\"minzoom\":0,\"maxzoom\":14,\"center\":[0.0,0.0,0.0],\"bounds\":[-180.0,-85.051129,180.0,85.051129]}"
		);
		Ok(())
	}

	#[test]
	fn format_roundtrips() -> Result<()> {
		let mut tilejson = TileJSON::new("pmtiles://osm/{z}/{x}/{y}.mvt", 2, 9);
		tilejson.format = Some(String::from("pbf"));
		let parsed = TileJSON::from_blob(&tilejson.as_blob()?)?;
		assert_eq!(parsed, tilejson);
		assert!(parsed.as_blob()?.as_str().contains("\"format\":\"pbf\""));
		Ok(())
	}

	#[test]
	fn bounds_center() {
		assert_eq!(center_of_bounds(&[10.0, 50.0, 12.0, 54.0], 7), [11.0, 52.0, 7.0]);
	}
}
