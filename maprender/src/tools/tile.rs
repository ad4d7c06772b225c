use super::ConfigArgs;
use anyhow::Result;
use maprender::dispatcher::{Dispatcher, ResourceKind, ResourceResult};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// tile URL, e.g. mbtiles://<name>/<z>/<x>/<y>.pbf
	#[arg(required = true)]
	url: String,

	/// write the tile to this file
	#[arg(long, short, value_name = "FILE")]
	output: Option<PathBuf>,

	#[command(flatten)]
	config: ConfigArgs,
}

#[tokio::main(flavor = "current_thread")]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let dispatcher = Dispatcher::new(&arguments.config.load()?)?;

	match dispatcher.resolve(ResourceKind::Tile, &arguments.url).await {
		ResourceResult::Hit(blob) => {
			if let Some(path) = &arguments.output {
				tokio::fs::write(path, blob.as_slice()).await?;
				eprintln!("wrote {} bytes to {path:?}", blob.len());
			} else {
				println!("{blob:?}");
			}
			Ok(())
		}
		ResourceResult::Miss => {
			eprintln!("tile not found: {}", arguments.url);
			Ok(())
		}
		ResourceResult::Error(error) => Err(error),
	}
}
