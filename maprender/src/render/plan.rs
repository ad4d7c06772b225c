use super::RenderOptions;
use anyhow::{Result, bail, ensure};
use maprender_image::FinishOptions;

/// A request to render one image, as received from a client.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
	pub style: String,
	/// `[longitude, latitude]`
	pub center: Option<Vec<f64>>,
	pub zoom: Option<i64>,
	pub width: u32,
	pub height: u32,
	/// Extra pixels rendered left and right of the image and cropped afterwards.
	pub buffer_width: u32,
	/// Extra pixels rendered above and below the image and cropped afterwards.
	pub buffer_height: u32,
	pub ratio: f64,
}

/// What the engine renders and how its output is finished.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
	pub options: RenderOptions,
	pub finish: FinishOptions,
}

impl RenderPlan {
	/// Validates a request and plans the engine call.
	///
	/// Zoom 0 has no renderable raster of its own: zoom 1 is rendered at twice the size without
	/// buffers and scaled down by half. Every other zoom is rendered one level lower, since a
	/// raster zoom level corresponds to the next lower vector zoom level, with the buffer added on
	/// every side.
	pub fn new(request: &RenderRequest) -> Result<RenderPlan> {
		ensure!(!request.style.is_empty(), "Style is a required parameter");

		let Some(center) = &request.center else {
			bail!("Center is a required parameter");
		};
		let &[lon, lat] = center.as_slice() else {
			bail!("Center must be longitude,latitude. Invalid value found: {center:?}");
		};
		ensure!(
			lon.abs() <= 180.0,
			"Center longitude is outside world bounds (-180 to 180 deg): {lon}"
		);
		ensure!(
			lat.abs() <= 90.0,
			"Center latitude is outside world bounds (-90 to 90 deg): {lat}"
		);

		let Some(zoom) = request.zoom else {
			bail!("Zoom is a required parameter");
		};
		ensure!(
			(0..=24).contains(&zoom),
			"Zoom level is outside supported range (0-24): {zoom}"
		);

		ensure!(
			request.width > 0 && request.height > 0,
			"Width and height must be greater than 0: {}x{}",
			request.width,
			request.height
		);
		ensure!(
			request.ratio > 0.0 && request.ratio <= 8.0,
			"Ratio is outside supported range (0-8]: {}",
			request.ratio
		);

		let (width, height, finish) = if zoom == 0 {
			log::debug!("raster zoom 0 -> rendering a double sized image at zoom 1");
			(
				request.width.checked_mul(2),
				request.height.checked_mul(2),
				FinishOptions {
					buffer_width: 0,
					buffer_height: 0,
					resize_factor: 0.5,
				},
			)
		} else {
			(
				request.buffer_width.checked_mul(2).and_then(|b| b.checked_add(request.width)),
				request.buffer_height.checked_mul(2).and_then(|b| b.checked_add(request.height)),
				FinishOptions {
					buffer_width: request.buffer_width,
					buffer_height: request.buffer_height,
					resize_factor: 1.0,
				},
			)
		};
		let (Some(width), Some(height)) = (width, height) else {
			bail!("Render size of {}x{} is too large", request.width, request.height);
		};

		let options = RenderOptions {
			center: [lon, lat],
			zoom: (zoom - 1).max(0) as u8,
			width,
			height,
			ratio: request.ratio,
			bearing: 0.0,
			pitch: 0.0,
		};

		log::info!("render map with center: {lon},{lat}");
		log::info!("render map with zoom: {}", options.zoom);
		log::info!("render map with buffered width {width}px and height {height}px");
		log::info!("render map with resize factor: {}", finish.resize_factor);
		log::info!("render map with ratio: {}", options.ratio);

		Ok(RenderPlan { options, finish })
	}
}
