use super::ConfigArgs;
use anyhow::Result;
use maprender::render::{RenderPlan, RenderRequest, TileRequest};
use std::collections::HashMap;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// style id as configured under `styles`
	style: String,

	/// zoom level
	#[arg(allow_hyphen_values = true)]
	z: String,

	/// tile column
	#[arg(allow_hyphen_values = true)]
	x: String,

	/// tile row
	#[arg(allow_hyphen_values = true)]
	y: String,

	/// tile size in pixels
	#[arg(long)]
	tile_size: Option<String>,

	/// pixel ratio
	#[arg(long)]
	ratio: Option<String>,

	#[command(flatten)]
	config: ConfigArgs,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let config = arguments.config.load()?;

	let mut query = HashMap::new();
	if let Some(tile_size) = &arguments.tile_size {
		query.insert(String::from("tile_size"), tile_size.clone());
	}
	if let Some(ratio) = &arguments.ratio {
		query.insert(String::from("ratio"), ratio.clone());
	}

	let request = TileRequest::parse(
		&arguments.style,
		&arguments.z,
		&arguments.x,
		&arguments.y,
		&query,
		&config,
	)?;
	println!("{request:#?}");

	let plan = RenderPlan::new(&RenderRequest::from(request))?;
	println!("{plan:#?}");
	Ok(())
}
