use anyhow::Result;
use maprender::config::Config;
use std::path::PathBuf;

/// Options shared by the subcommands that need a configuration.
#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
	/// YAML configuration file
	#[arg(long, short, value_name = "FILE", display_order = 10)]
	config: Option<PathBuf>,

	/// data directory with tiles, fonts, sprites and styles; overrides DATA_PATH and the config file
	#[arg(long, value_name = "DIR", display_order = 10)]
	data_path: Option<PathBuf>,
}

impl ConfigArgs {
	/// Loads the configuration file, then applies `DATA_PATH` and `--data-path`.
	///
	/// Without any data path the current directory is used.
	pub fn load(&self) -> Result<Config> {
		let mut config = match &self.config {
			Some(path) => Config::from_path(path)?,
			None => Config::default(),
		};
		config.apply_env();
		config.apply_data_path_override(self.data_path.clone());
		if config.data_path.is_none() {
			config.data_path = Some(PathBuf::from("."));
		}
		log::debug!("config: {config:?}");
		Ok(config)
	}
}
