//! This module defines the `TileCoord` structure, the address of a single
//! tile in a zoom/x/y tile pyramid, along with the block arithmetic used by
//! the meta-tile store: masking a coordinate down to the origin of its block,
//! computing its slot inside the block, and clipping the block edge at low
//! zoom levels where the whole pyramid is smaller than one block.
//!
//! # Examples
//!
//! ```
//! use metatile_core::TileCoord;
//!
//! let coord = TileCoord::new(5, 13, 10).unwrap();
//! assert_eq!(coord.block_origin(8), TileCoord::new(5, 8, 8).unwrap());
//! assert_eq!(coord.slot_in_block(8), 5 * 8 + 2);
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	pub x: u32,
	pub y: u32,
	pub z: u8,
}

impl TileCoord {
	pub fn new(z: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(z <= 31, "z ({z}) must be <= 31");
		Ok(TileCoord { x, y, z })
	}

	/// Checks that x and y lie inside the tile pyramid of this zoom level.
	pub fn is_valid(&self) -> bool {
		if self.z > 31 {
			return false;
		}
		let max = 2u64.pow(u32::from(self.z));
		u64::from(self.x) < max && u64::from(self.y) < max
	}

	/// Returns the top-left coordinate of the block of `edge * edge` tiles
	/// this tile belongs to.
	pub fn block_origin(&self, edge: u32) -> TileCoord {
		TileCoord {
			x: self.x - self.x % edge,
			y: self.y - self.y % edge,
			z: self.z,
		}
	}

	/// Returns the index of this tile within its block, row-major with x as
	/// the outer coordinate. Stable and injective over the tiles of one
	/// block.
	pub fn slot_in_block(&self, edge: u32) -> usize {
		((self.x % edge) * edge + self.y % edge) as usize
	}

	/// Returns the number of tiles along one side of the block actually
	/// covered by the pyramid: at zoom z the pyramid is only `2^z` tiles
	/// wide, so blocks are clipped to that extent.
	pub fn block_span(&self, edge: u32) -> u32 {
		let grid = 1u64 << self.z;
		grid.min(u64::from(edge)) as u32
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_fmt(format_args!("TileCoord({}, [{}, {}])", &self.z, &self.x, &self.y))
	}
}
