use super::ConfigArgs;
use anyhow::{Result, bail};
use maprender::dispatcher::{Dispatcher, ResourceKind, ResourceResult};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// source URL: mbtiles://<name>, pmtiles://<name>, pmtiles://https://… or a tile URL template
	#[arg(required = true)]
	url: String,

	#[command(flatten)]
	config: ConfigArgs,
}

#[tokio::main(flavor = "current_thread")]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let dispatcher = Dispatcher::new(&arguments.config.load()?)?;

	match dispatcher.resolve(ResourceKind::Source, &arguments.url).await {
		ResourceResult::Hit(blob) => {
			let json: serde_json::Value = serde_json::from_slice(blob.as_slice())?;
			println!("{}", serde_json::to_string_pretty(&json)?);
			Ok(())
		}
		ResourceResult::Miss => bail!("no TileJSON for '{}'", arguments.url),
		ResourceResult::Error(error) => Err(error),
	}
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;
	use assert_fs::TempDir;
	use maprender_container::testing::write_mbtiles;
	use maprender_core::Blob;

	#[test]
	fn local_mbtiles() {
		let dir = TempDir::new().unwrap();
		std::fs::create_dir(dir.path().join("tiles")).unwrap();
		write_mbtiles(
			&dir.path().join("tiles/berlin.mbtiles"),
			&[("format", "png")],
			&[((0, 0, 0), Blob::from("tile"))],
		)
		.unwrap();

		run_command(vec![
			"maprender",
			"tilejson",
			"--data-path",
			dir.path().to_str().unwrap(),
			"mbtiles://berlin",
		])
		.unwrap();
	}

	#[test]
	fn missing_archive() {
		let dir = TempDir::new().unwrap();
		let result = run_command(vec![
			"maprender",
			"tilejson",
			"--data-path",
			dir.path().to_str().unwrap(),
			"mbtiles://nowhere",
		]);
		assert!(result.is_err());
	}
}
