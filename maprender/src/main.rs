mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Print the TileJSON of a source URL
	Tilejson(tools::tilejson::Subcommand),

	/// Fetch a single tile through the resource dispatcher
	Tile(tools::tile::Subcommand),

	/// Print the geographic center of a tile
	Center(tools::center::Subcommand),

	/// Show the render parameters of a tile request
	Params(tools::params::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Tilejson(arguments) => tools::tilejson::run(arguments),
		Commands::Tile(arguments) => tools::tile::run(arguments),
		Commands::Center(arguments) => tools::center::run(arguments),
		Commands::Params(arguments) => tools::params::run(arguments),
	}
}
