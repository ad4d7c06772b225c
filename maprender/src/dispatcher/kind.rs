use anyhow::{Error, bail};
use std::fmt;

/// What the rendering engine asks for. The numeric codes are part of the engine interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResourceKind {
	Style = 1,
	Source = 2,
	Tile = 3,
	Glyph = 4,
	SpriteImage = 5,
	SpriteJson = 6,
	ImageSource = 7,
}

impl TryFrom<u8> for ResourceKind {
	type Error = Error;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			1 => ResourceKind::Style,
			2 => ResourceKind::Source,
			3 => ResourceKind::Tile,
			4 => ResourceKind::Glyph,
			5 => ResourceKind::SpriteImage,
			6 => ResourceKind::SpriteJson,
			7 => ResourceKind::ImageSource,
			_ => bail!("unknown resource kind {value}"),
		})
	}
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ResourceKind::Style => "style",
			ResourceKind::Source => "source",
			ResourceKind::Tile => "tile",
			ResourceKind::Glyph => "glyph",
			ResourceKind::SpriteImage => "sprite image",
			ResourceKind::SpriteJson => "sprite json",
			ResourceKind::ImageSource => "image source",
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn codes() {
		for code in 1..=7u8 {
			assert_eq!(ResourceKind::try_from(code).unwrap() as u8, code);
		}
		assert!(ResourceKind::try_from(0).is_err());
		assert!(ResourceKind::try_from(8).is_err());
		assert_eq!(ResourceKind::SpriteJson.to_string(), "sprite json");
	}
}
