use crate::dispatcher::Dispatcher;
use anyhow::Result;
use async_trait::async_trait;
use maprender_image::RawImage;
use serde_json::Value;
use std::sync::Arc;

/// Camera and canvas of one render call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
	/// `[longitude, latitude]`
	pub center: [f64; 2],
	pub zoom: u8,
	/// Logical canvas size, including the render buffer.
	pub width: u32,
	pub height: u32,
	pub ratio: f64,
	pub bearing: f64,
	pub pitch: f64,
}

/// A map rendering engine.
///
/// The engine loads `style`, requests every resource it needs through `resources` and returns
/// the composited raster with premultiplied alpha, sized `options.width × options.height`
/// scaled by `options.ratio`.
#[async_trait]
pub trait RenderEngine: Send + Sync {
	async fn render(&self, resources: Arc<Dispatcher>, style: &Value, options: &RenderOptions) -> Result<RawImage>;
}
