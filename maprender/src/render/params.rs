//! Parameters of a `/<style>/<z>/<x>/<y>` tile request.

use super::RenderRequest;
use crate::config::Config;
use anyhow::{Result, bail};
use maprender_core::utils::mercator::{is_edge_tile, tile_center};
use std::collections::HashMap;

pub const DEFAULT_TILE_SIZE: u32 = 256;
pub const DEFAULT_BUFFER: u32 = 256;

/// A parsed tile request.
#[derive(Clone, Debug, PartialEq)]
pub struct TileRequest {
	pub style: String,
	pub zoom: u8,
	pub x: u32,
	pub y: u32,
	pub tile_size: u32,
	pub ratio: f64,
	/// `[longitude, latitude]` of the tile center
	pub center: [f64; 2],
	pub buffer_width: u32,
	pub buffer_height: u32,
}

impl TileRequest {
	/// Parses the path and query parameters of a tile request.
	///
	/// Invalid path parameters are errors. Invalid `tile_size` or `ratio` query parameters are
	/// logged and replaced by their defaults.
	///
	/// ```rust
	/// use maprender::{config::Config, render::TileRequest};
	/// use std::collections::HashMap;
	///
	/// let config = Config::from_string("styles: {basic: {file: basic.json}}").unwrap();
	/// let request = TileRequest::parse("basic", "0", "0", "0", &HashMap::new(), &config).unwrap();
	/// assert_eq!((request.buffer_width, request.buffer_height), (0, 0));
	/// ```
	pub fn parse(
		style: &str,
		z: &str,
		x: &str,
		y: &str,
		query: &HashMap<String, String>,
		config: &Config,
	) -> Result<TileRequest> {
		if !config.styles.contains_key(style) {
			log::error!("Invalid style name: {style}");
			bail!("Invalid style name: {style}");
		}

		let x = parse_coordinate("x", x)?;
		let y = parse_coordinate("y", y)?;
		let zoom = parse_zoom(z)?;

		let tile_size = query
			.get("tile_size")
			.and_then(|value| match value.trim().parse::<f64>() {
				Ok(size) if size.is_nan() => {
					log::error!("Parameter tile_size cannot be converted to a number: {value}");
					None
				}
				Ok(size) if size < 1.0 || size > f64::from(u32::MAX) => {
					log::error!("Parameter tile_size must be greater than 0: {value}");
					None
				}
				Ok(size) if size.fract() != 0.0 => {
					log::error!("Parameter tile_size must be an integer: {value}");
					None
				}
				Ok(size) => Some(size as u32),
				Err(_) => {
					log::error!("Parameter tile_size cannot be converted to a number: {value}");
					None
				}
			})
			.unwrap_or(DEFAULT_TILE_SIZE);

		let ratio = query
			.get("ratio")
			.and_then(|value| match value.trim().parse::<f64>() {
				Ok(ratio) if ratio > 0.0 && ratio <= 8.0 => Some(ratio),
				Ok(_) => {
					log::error!("Parameter ratio is out of range (0-8]: {value}");
					None
				}
				Err(_) => {
					log::error!("Parameter ratio cannot be converted to a number: {value}");
					None
				}
			})
			.unwrap_or(1.0);

		let (lon, lat) = tile_center(zoom, x, y, tile_size);

		let edge = is_edge_tile(zoom, x, y);
		let buffer_width = if zoom == 0 { 0 } else { DEFAULT_BUFFER };
		let buffer_height = if edge.y { 0 } else { DEFAULT_BUFFER };

		Ok(TileRequest {
			style: style.to_string(),
			zoom,
			x,
			y,
			tile_size,
			ratio,
			center: [lon, lat],
			buffer_width,
			buffer_height,
		})
	}
}

impl From<TileRequest> for RenderRequest {
	fn from(request: TileRequest) -> Self {
		RenderRequest {
			style: request.style,
			center: Some(request.center.to_vec()),
			zoom: Some(i64::from(request.zoom)),
			width: request.tile_size,
			height: request.tile_size,
			buffer_width: request.buffer_width,
			buffer_height: request.buffer_height,
			ratio: request.ratio,
		}
	}
}

fn parse_coordinate(name: &str, value: &str) -> Result<u32> {
	let Ok(number) = value.trim().parse::<i64>() else {
		log::error!("Parameter {name} cannot be converted to a number: {value}");
		bail!("Parameter {name} cannot be converted to a number: {value}");
	};
	if number < 0 {
		log::error!("Parameter {name} must not be less than 0: {value}");
		bail!("Parameter {name} must not be less than 0: {value}");
	}
	match u32::try_from(number) {
		Ok(number) => Ok(number),
		Err(_) => bail!("Parameter {name} cannot be converted to a number: {value}"),
	}
}

fn parse_zoom(value: &str) -> Result<u8> {
	let Ok(zoom) = value.trim().parse::<i64>() else {
		log::error!("Parameter z cannot be converted to a number: {value}");
		bail!("Parameter z cannot be converted to a number: {value}");
	};
	if !(0..=24).contains(&zoom) {
		log::error!("Parameter z is out of range (0-24): {value}");
		bail!("Parameter z is out of range (0-24): {value}");
	}
	Ok(zoom as u8)
}
