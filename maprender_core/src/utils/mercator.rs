//! Web-Mercator math for turning a tile address into the geographic center the renderer
//! is pointed at, plus the grid-edge test that decides whether a render buffer fits.
//!
//! Pixel coordinates are always measured on a 256 pixel grid, whatever the rendered tile size.

use std::f64::consts::PI;

pub const EARTH_RADIUS: f64 = 6_378_137.0;
const PIXEL_GRID_SIZE: f64 = 256.0;

fn origin_shift() -> f64 {
	2.0 * PI * EARTH_RADIUS / 2.0
}

/// Which axes of the tile grid a tile touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeTile {
	pub x: bool,
	pub y: bool,
}

/// Geographic `(longitude, latitude)` of the center of tile `x/y` at `zoom`.
#[must_use]
pub fn tile_center(zoom: u8, x: u32, y: u32, tile_size: u32) -> (f64, f64) {
	let size = f64::from(tile_size);
	let px = f64::from(x) * size + size / 2.0;
	let py = f64::from(y) * size + size / 2.0;
	let (mx, my) = pixels_to_meters(px, py, zoom);
	meters_to_lat_lon(mx, my)
}

/// Converts pixel coordinates at `zoom` into EPSG:3857 meters, with y pointing north.
#[must_use]
pub fn pixels_to_meters(px: f64, py: f64, zoom: u8) -> (f64, f64) {
	let resolution = 2.0 * PI * EARTH_RADIUS / PIXEL_GRID_SIZE / 2f64.powi(i32::from(zoom));
	let mx = px * resolution - origin_shift();
	let my = py * resolution - origin_shift();
	(mx, -my)
}

/// Converts EPSG:3857 meters into `(longitude, latitude)` degrees.
#[must_use]
pub fn meters_to_lat_lon(mx: f64, my: f64) -> (f64, f64) {
	let lon = (mx / origin_shift()) * 180.0;
	let lat = (my / origin_shift()) * 180.0;
	let lat = 180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);
	(lon, lat)
}

/// Reports for each axis whether the tile sits in the first or last column/row of the grid.
#[must_use]
pub fn is_edge_tile(zoom: u8, x: u32, y: u32) -> EdgeTile {
	let last = (1u64 << zoom) - 1;
	let on_edge = |v: u32| v == 0 || u64::from(v) == last;
	EdgeTile {
		x: on_edge(x),
		y: on_edge(y),
	}
}
