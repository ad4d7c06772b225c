use anyhow::{Result, ensure};
use maprender_core::utils::mercator::{is_edge_tile, tile_center};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// zoom level
	z: u8,

	/// tile column
	x: u32,

	/// tile row
	y: u32,

	/// tile size in pixels
	#[arg(long, default_value_t = 256)]
	tile_size: u32,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let Subcommand { z, x, y, tile_size } = *arguments;
	ensure!(z <= 31, "zoom level {z} is too large");

	let (lon, lat) = tile_center(z, x, y, tile_size);
	let edge = is_edge_tile(z, x, y);
	println!("center: {lon},{lat}");
	println!("edge tile: x={} y={}", edge.x, edge.y);
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;

	#[test]
	fn prints_center() {
		run_command(vec!["maprender", "center", "1", "0", "0", "--tile-size", "512"]).unwrap();
		assert!(run_command(vec!["maprender", "center", "40", "0", "0"]).is_err());
		assert!(run_command(vec!["maprender", "center", "1", "-1", "0"]).is_err());
	}
}
