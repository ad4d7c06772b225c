//! PMTiles tile ids: tiles of all lower zoom levels come first, tiles within a level follow a
//! Hilbert curve.

use anyhow::{Result, ensure};
use maprender_core::TileAddress;

pub fn tile_id(address: &TileAddress) -> Result<u64> {
	coord_to_tile_id(address.level, address.x, address.y)
}

fn coord_to_tile_id(z: u8, x: u32, y: u32) -> Result<u64> {
	ensure!(z < 32, "tile zoom exceeds 64-bit limit");

	let n = 1u64 << z;
	ensure!(
		u64::from(x) < n && u64::from(y) < n,
		"tile x/y outside zoom level bounds"
	);

	let mut acc: u64 = 0;
	for t_z in 0..u64::from(z) {
		acc += 1u64 << (t_z * 2);
	}

	let mut tx = u64::from(x);
	let mut ty = u64::from(y);
	let mut d: u64 = 0;
	let mut s: u64 = n / 2;
	while s > 0 {
		let rx = u64::from(tx & s > 0);
		let ry = u64::from(ty & s > 0);
		d += s * s * ((3 * rx) ^ ry);
		rotate(s, &mut tx, &mut ty, rx, ry);
		s /= 2;
	}

	Ok(acc + d)
}

fn rotate(s: u64, tx: &mut u64, ty: &mut u64, rx: u64, ry: u64) {
	if ry == 0 {
		if rx == 1 {
			*tx = s - 1 - *tx;
			*ty = s - 1 - *ty;
		}
		std::mem::swap(tx, ty);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use maprender_core::TileKind;

	#[test]
	fn known_tile_ids() -> Result<()> {
		assert_eq!(coord_to_tile_id(0, 0, 0)?, 0);
		assert_eq!(coord_to_tile_id(1, 1, 1)?, 3);
		assert_eq!(coord_to_tile_id(2, 2, 2)?, 13);
		assert_eq!(coord_to_tile_id(3, 5, 3)?, 73);
		assert_eq!(coord_to_tile_id(3, 7, 7)?, 63);
		assert_eq!(coord_to_tile_id(31, 0, 0)?, 1537228672809129301);
		assert_eq!(
			coord_to_tile_id(31, (1 << 31) - 1, (1 << 31) - 1)?,
			4611686018427387903
		);
		Ok(())
	}

	#[test]
	fn first_ids_per_level() -> Result<()> {
		assert_eq!(coord_to_tile_id(1, 0, 0)?, 1);
		assert_eq!(coord_to_tile_id(2, 0, 0)?, 5);
		assert_eq!(coord_to_tile_id(3, 0, 0)?, 21);
		Ok(())
	}

	#[test]
	fn from_address() -> Result<()> {
		let address = TileAddress::new(1, 1, 1, TileKind::Vector)?;
		assert_eq!(tile_id(&address)?, 3);
		assert!(coord_to_tile_id(2, 4, 0).is_err());
		Ok(())
	}
}
