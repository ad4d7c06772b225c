use super::{RenderEngine, RenderPlan, RenderRequest};
use crate::{config::Config, dispatcher::Dispatcher};
use anyhow::{Context, Result, ensure};
use maprender_core::Blob;
use maprender_image::finish_image;
use serde_json::Value;
use std::sync::Arc;

/// Renders styles from the configured registry into PNG images.
pub struct Renderer {
	config: Config,
	dispatcher: Arc<Dispatcher>,
	engine: Arc<dyn RenderEngine>,
}

impl Renderer {
	pub fn new(config: Config, engine: Arc<dyn RenderEngine>) -> Result<Renderer> {
		let dispatcher = Arc::new(Dispatcher::new(&config)?);
		Ok(Renderer {
			config,
			dispatcher,
			engine,
		})
	}

	#[must_use]
	pub fn dispatcher(&self) -> &Arc<Dispatcher> {
		&self.dispatcher
	}

	/// Loads a style document from `<data_path>/styles`.
	pub async fn load_style(&self, id: &str) -> Result<Value> {
		let file = &self.config.style(id)?.file;
		let path = self.config.data_path()?.join("styles").join(file);
		log::debug!("load map with style: {path:?}");

		let data = tokio::fs::read(&path)
			.await
			.with_context(|| format!("reading style {path:?}"))?;
		serde_json::from_slice(&data).with_context(|| format!("parsing style {path:?}"))
	}

	pub async fn render_image(&self, request: &RenderRequest) -> Result<Blob> {
		let plan = RenderPlan::new(request)?;
		let style = self.load_style(&request.style).await?;

		let raw = self
			.engine
			.render(self.dispatcher.clone(), &style, &plan.options)
			.await
			.context("rendering map")?;
		ensure!(
			(raw.width, raw.height) == (plan.options.width, plan.options.height),
			"engine rendered {}x{} instead of {}x{}",
			raw.width,
			raw.height,
			plan.options.width,
			plan.options.height
		);

		log::debug!("convert image buffer to png");
		tokio::task::spawn_blocking(move || finish_image(raw, &plan.finish)).await?
	}
}

impl std::fmt::Debug for Renderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Renderer")
			.field("config", &self.config)
			.field("dispatcher", &self.dispatcher)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		dispatcher::ResourceKind,
		render::{RenderOptions, TileRequest},
	};
	use assert_fs::{TempDir, prelude::*};
	use async_trait::async_trait;
	use image::GenericImageView;
	use maprender_image::{RawImage, format::png::blob2image};
	use pretty_assertions::assert_eq;
	use std::{collections::HashMap, sync::Mutex};

	/// Paints the canvas in one color and records every call.
	#[derive(Default)]
	struct SolidEngine {
		calls: Mutex<Vec<(Value, RenderOptions)>>,
	}

	#[async_trait]
	impl RenderEngine for SolidEngine {
		async fn render(&self, resources: Arc<Dispatcher>, style: &Value, options: &RenderOptions) -> Result<RawImage> {
			assert!(resources.resolve(ResourceKind::Style, "ignored").await.is_miss());
			self.calls.lock().unwrap().push((style.clone(), options.clone()));

			let pixel_width = (f64::from(options.width) * options.ratio).round() as usize;
			let pixel_height = (f64::from(options.height) * options.ratio).round() as usize;
			RawImage::new(
				options.width,
				options.height,
				options.ratio,
				[64, 32, 16, 128].repeat(pixel_width * pixel_height),
			)
		}
	}

	fn renderer() -> Result<(TempDir, Arc<SolidEngine>, Renderer)> {
		let dir = TempDir::new()?;
		dir.child("styles/basic.json").write_str(r#"{"version":8,"layers":[]}"#)?;
		dir.child("styles/broken.json").write_str("{")?;

		let mut config = Config::from_string("styles: {basic: {file: basic.json}, broken: {file: broken.json}}")?;
		config.data_path = Some(dir.path().to_path_buf());

		let engine = Arc::new(SolidEngine::default());
		let renderer = Renderer::new(config, engine.clone())?;
		Ok((dir, engine, renderer))
	}

	fn tile_request(renderer: &Renderer, z: &str, x: &str, y: &str, ratio: &str) -> Result<RenderRequest> {
		let query = HashMap::from([(String::from("ratio"), ratio.to_string())]);
		Ok(TileRequest::parse("basic", z, x, y, &query, &renderer.config)?.into())
	}

	#[tokio::test]
	async fn renders_zoom_zero_at_requested_size() -> Result<()> {
		let (_dir, engine, renderer) = renderer()?;

		let blob = renderer.render_image(&tile_request(&renderer, "0", "0", "0", "1")?).await?;
		let image = blob2image(&blob)?;
		assert_eq!(image.dimensions(), (256, 256));

		let calls = engine.calls.lock().unwrap();
		assert_eq!(calls[0].0, serde_json::json!({"version": 8, "layers": []}));
		assert_eq!((calls[0].1.zoom, calls[0].1.width, calls[0].1.height), (0, 512, 512));
		Ok(())
	}

	#[tokio::test]
	async fn crops_buffer_and_unpremultiplies() -> Result<()> {
		let (_dir, engine, renderer) = renderer()?;

		let blob = renderer.render_image(&tile_request(&renderer, "3", "2", "2", "2")?).await?;
		let image = blob2image(&blob)?;
		assert_eq!(image.dimensions(), (512, 512));
		assert_eq!(image.to_rgba8().get_pixel(10, 10).0, [127, 63, 31, 128]);

		let options = engine.calls.lock().unwrap()[0].1.clone();
		assert_eq!((options.zoom, options.width, options.height, options.ratio), (2, 768, 768, 2.0));
		Ok(())
	}

	#[tokio::test]
	async fn edge_tiles_have_no_vertical_buffer() -> Result<()> {
		let (_dir, engine, renderer) = renderer()?;

		let blob = renderer.render_image(&tile_request(&renderer, "2", "1", "0", "1")?).await?;
		assert_eq!(blob2image(&blob)?.dimensions(), (256, 256));
		let options = engine.calls.lock().unwrap()[0].1.clone();
		assert_eq!((options.width, options.height), (768, 256));
		Ok(())
	}

	#[tokio::test]
	async fn validation_happens_before_rendering() -> Result<()> {
		let (_dir, engine, renderer) = renderer()?;

		let mut request = tile_request(&renderer, "3", "2", "2", "1")?;
		request.center = None;
		let error = renderer.render_image(&request).await.unwrap_err();
		assert_eq!(error.to_string(), "Center is a required parameter");

		let mut request = tile_request(&renderer, "3", "2", "2", "1")?;
		request.style = String::from("unknown");
		let error = renderer.render_image(&request).await.unwrap_err();
		assert_eq!(error.to_string(), "Invalid style name: unknown");

		request.style = String::from("broken");
		assert!(renderer.render_image(&request).await.is_err());

		let mut request = tile_request(&renderer, "3", "2", "2", "1")?;
		request.ratio = 0.0;
		let error = renderer.render_image(&request).await.unwrap_err();
		assert!(error.to_string().starts_with("Ratio is outside supported range"), "{error}");

		request.ratio = 1.0;
		request.width = 0;
		let error = renderer.render_image(&request).await.unwrap_err();
		assert!(error.to_string().starts_with("Width and height must be greater than 0"), "{error}");

		assert!(engine.calls.lock().unwrap().is_empty());
		Ok(())
	}
}
