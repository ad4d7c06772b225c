use anyhow::{Result, ensure};
use image::RgbaImage;

/// A raster as produced by the rendering engine: premultiplied RGBA, 4 bytes per pixel.
///
/// `width` and `height` are logical sizes; the pixel buffer is scaled by `ratio`.
#[derive(Clone, PartialEq)]
pub struct RawImage {
	pub width: u32,
	pub height: u32,
	pub ratio: f64,
	pub data: Vec<u8>,
}

impl RawImage {
	pub fn new(width: u32, height: u32, ratio: f64, data: Vec<u8>) -> Result<RawImage> {
		ensure!(ratio > 0.0, "ratio must be positive, found {ratio}");
		let image = RawImage {
			width,
			height,
			ratio,
			data,
		};
		let expected = u64::from(image.pixel_width()) * u64::from(image.pixel_height()) * 4;
		ensure!(
			image.data.len() as u64 == expected,
			"raw image of {}x{}@{ratio} needs {expected} bytes, found {}",
			width,
			height,
			image.data.len()
		);
		Ok(image)
	}

	#[must_use]
	pub fn pixel_width(&self) -> u32 {
		scaled(self.width, self.ratio)
	}

	#[must_use]
	pub fn pixel_height(&self) -> u32 {
		scaled(self.height, self.ratio)
	}

	pub(crate) fn into_rgba(self) -> Result<RgbaImage> {
		let (width, height) = (self.pixel_width(), self.pixel_height());
		RgbaImage::from_raw(width, height, self.data)
			.ok_or_else(|| anyhow::anyhow!("pixel buffer does not match {width}x{height}"))
	}
}

pub(crate) fn scaled(value: u32, factor: f64) -> u32 {
	(f64::from(value) * factor).round() as u32
}

impl std::fmt::Debug for RawImage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"RawImage({}x{}@{}, {} bytes)",
			self.width,
			self.height,
			self.ratio,
			self.data.len()
		)
	}
}
