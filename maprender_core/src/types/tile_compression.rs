use std::fmt;

/// Compression applied to archive sections and tile payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileCompression {
	Uncompressed,
	Gzip,
	Brotli,
}

impl fmt::Display for TileCompression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TileCompression::Uncompressed => "none",
			TileCompression::Gzip => "gzip",
			TileCompression::Brotli => "brotli",
		})
	}
}
