use serde::Deserialize;

/// A style that can be rendered, stored as `<data_path>/styles/<file>`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
	pub file: String,
}

impl From<&str> for StyleConfig {
	fn from(file: &str) -> Self {
		StyleConfig { file: file.to_string() }
	}
}
