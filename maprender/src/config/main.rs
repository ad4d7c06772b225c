use super::{ArchiveCacheConfig, StyleConfig};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::{
	collections::BTreeMap,
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};

/// Environment variable overriding [`Config::data_path`].
pub const DATA_PATH_ENV: &str = "DATA_PATH";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Root of the `tiles`, `fonts`, `sprites` and `styles` directories
	#[serde(default)]
	pub data_path: Option<PathBuf>,

	/// Renderable styles by id
	#[serde(default)]
	pub styles: BTreeMap<String, StyleConfig>,

	/// Lifetime of opened MBTiles and PMTiles handles
	#[serde(default)]
	pub archive_cache: ArchiveCacheConfig,

	/// Look for a `<base>.json` TileJSON next to a tile server template before synthesizing one
	#[serde(default = "default_probe_tilejson")]
	pub probe_tilejson: bool,
}

fn default_probe_tilejson() -> bool {
	true
}

impl Default for Config {
	fn default() -> Self {
		Config {
			data_path: None,
			styles: BTreeMap::new(),
			archive_cache: ArchiveCacheConfig::default(),
			probe_tilejson: default_probe_tilejson(),
		}
	}
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a file. A relative `data_path` is resolved against the directory of the file.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let mut config =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;

		if let (Some(data_path), Some(base)) = (&config.data_path, path.parent()) {
			if data_path.is_relative() {
				config.data_path = Some(base.join(data_path));
			}
		}
		Ok(config)
	}

	/// Replaces `data_path` with the value of the `DATA_PATH` environment variable, if set.
	pub fn apply_env(&mut self) {
		self.apply_data_path_override(std::env::var_os(DATA_PATH_ENV).map(PathBuf::from));
	}

	pub fn apply_data_path_override(&mut self, data_path: Option<PathBuf>) {
		if let Some(data_path) = data_path {
			log::debug!("data path overridden: {data_path:?}");
			self.data_path = Some(data_path);
		}
	}

	pub fn data_path(&self) -> Result<&Path> {
		self.data_path.as_deref().ok_or_else(|| anyhow!("No data path defined"))
	}

	#[must_use]
	pub fn tile_path(&self) -> Option<PathBuf> {
		self.data_path.as_ref().map(|p| p.join("tiles"))
	}

	pub fn style(&self, id: &str) -> Result<&StyleConfig> {
		self.styles.get(id).ok_or_else(|| anyhow!("Invalid style name: {id}"))
	}
}
