use anyhow::{Result, anyhow, bail};
use image::{
	DynamicImage, ImageEncoder, ImageFormat,
	codecs::png::{CompressionType, FilterType, PngEncoder},
	load_from_memory_with_format,
};
use maprender_core::Blob;

/// Encodes an 8-bit image as PNG.
pub fn image2blob(image: &DynamicImage) -> Result<Blob> {
	let color = image.color();
	if color.bytes_per_pixel() / color.channel_count() != 1 {
		bail!("png only supports 8-bit images");
	}

	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	Ok(Blob::from(buffer))
}

pub fn blob2image(blob: &Blob) -> Result<DynamicImage> {
	load_from_memory_with_format(blob.as_slice(), ImageFormat::Png)
		.map_err(|e| anyhow!("Failed to decode PNG image: {e}"))
}
