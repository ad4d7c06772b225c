use crate::{RawImage, format::png::image2blob, raw_image::scaled};
use anyhow::{Context, Result, ensure};
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::{ColorType, DynamicImage, Rgba, RgbaImage, imageops::crop_imm};
use imageproc::map::map_pixels;
use maprender_core::Blob;

/// How much of the rendered raster is buffer, and how the remainder is scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinishOptions {
	/// Logical pixels removed from the left and the right edge.
	pub buffer_width: u32,
	/// Logical pixels removed from the top and the bottom edge.
	pub buffer_height: u32,
	pub resize_factor: f64,
}

impl Default for FinishOptions {
	fn default() -> Self {
		FinishOptions {
			buffer_width: 0,
			buffer_height: 0,
			resize_factor: 1.0,
		}
	}
}

/// Un-premultiplies, crops, resizes and encodes a rendered raster as PNG.
pub fn finish_image(raw: RawImage, options: &FinishOptions) -> Result<Blob> {
	log::trace!("finish {raw:?} with {options:?}");

	let ratio = raw.ratio;
	let mut image = unpremultiply(&raw.into_rgba()?);

	if options.buffer_width > 0 || options.buffer_height > 0 {
		image = crop_buffer(&image, scaled(options.buffer_width, ratio), scaled(options.buffer_height, ratio))?;
	}

	let mut image = DynamicImage::from(image);
	if options.resize_factor != 1.0 {
		image = resize(&image, options.resize_factor)?;
	}

	image2blob(&image).context("encoding finished tile")
}

/// Converts premultiplied to straight alpha. Fully transparent pixels become transparent black.
#[must_use]
pub fn unpremultiply(image: &RgbaImage) -> RgbaImage {
	map_pixels(image, |p| {
		let alpha = p[3];
		if alpha == 0 {
			return Rgba([0, 0, 0, 0]);
		}
		let straight = |c: u8| (u32::from(c) * 255 / u32::from(alpha)).min(255) as u8;
		Rgba([straight(p[0]), straight(p[1]), straight(p[2]), alpha])
	})
}

fn crop_buffer(image: &RgbaImage, margin_x: u32, margin_y: u32) -> Result<RgbaImage> {
	let (width, height) = image.dimensions();
	ensure!(
		margin_x * 2 < width && margin_y * 2 < height,
		"buffer of {margin_x}x{margin_y} pixels does not fit into an image of {width}x{height}"
	);
	Ok(crop_imm(image, margin_x, margin_y, width - 2 * margin_x, height - 2 * margin_y).to_image())
}

fn resize(image: &DynamicImage, factor: f64) -> Result<DynamicImage> {
	let width = scaled(image.width(), factor);
	let height = scaled(image.height(), factor);
	ensure!(
		width > 0 && height > 0,
		"resizing {}x{} by {factor} leaves no pixels",
		image.width(),
		image.height()
	);

	let mut dst_image = DynamicImage::new(width, height, ColorType::Rgba8);
	Resizer::new().resize(
		image,
		&mut dst_image,
		&ResizeOptions::default().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
	)?;
	Ok(dst_image)
}
