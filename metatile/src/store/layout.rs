//! This module defines the `TileLayout` struct, which maps tile coordinates
//! to paths inside a store root and parses tile addresses back into
//! coordinates.
//!
//! The directory structure follows the usual slippy-map convention:
//!
//! ```text
//! <root>/<z>/<x>/<y>.png    standalone tile
//! <root>/<z>/<bx>/<by>.meta meta-tile container, (bx, by) block-aligned
//! ```
//!
//! Every tile of one block resolves to the same container path together with
//! a slot in `[0, TILES_PER_BLOCK)`; the mapping is deterministic, so the
//! container a tile lives in and the index entry describing it never depend
//! on anything but the coordinate.

use super::BLOCK_EDGE;
use anyhow::{Context, Result, ensure};
use lazy_static::lazy_static;
use metatile_core::TileCoord;
use regex::Regex;
use std::path::{Path, PathBuf};

/// File extension of standalone tiles.
pub const TILE_EXTENSION: &str = "png";

/// File extension of meta-tile containers.
pub const META_EXTENSION: &str = "meta";

lazy_static! {
	static ref ADDRESS: Regex = Regex::new(r"(?:\A|/)(\d+)/(\d+)/(\d+)\.(?:png|meta)\z").unwrap();
}

/// Maps tile coordinates to paths below a store root.
#[derive(Clone, Debug)]
pub struct TileLayout {
	root: PathBuf,
}

impl TileLayout {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Returns the path of the standalone file for a tile.
	pub fn tile_path(&self, coord: &TileCoord) -> PathBuf {
		self
			.root
			.join(format!("{}/{}/{}.{TILE_EXTENSION}", coord.z, coord.x, coord.y))
	}

	/// Returns the container path of the block a tile belongs to, along with
	/// the tile's slot in the container's index table.
	pub fn meta_path(&self, coord: &TileCoord) -> (PathBuf, usize) {
		let block = coord.block_origin(BLOCK_EDGE);
		let path = self
			.root
			.join(format!("{}/{}/{}.{META_EXTENSION}", block.z, block.x, block.y));
		(path, coord.slot_in_block(BLOCK_EDGE))
	}

	/// Parses a standalone- or container-shaped address, e.g.
	/// `12/2048/1024.png` or `tiles/12/2048/1024.meta`, into the coordinate
	/// it names. Callers working on whole blocks normalize the result with
	/// [`TileCoord::block_origin`].
	///
	/// # Errors
	///
	/// Returns an error if the name does not end in `z/x/y.png` or
	/// `z/x/y.meta`, or if the coordinate lies outside the tile pyramid.
	pub fn parse_address(&self, name: &str) -> Result<TileCoord> {
		let captures = ADDRESS
			.captures(name)
			.with_context(|| format!("{name:?} is not a tile address (expected .../z/x/y.{TILE_EXTENSION} or .../z/x/y.{META_EXTENSION})"))?;

		let z: u8 = captures[1].parse().with_context(|| format!("invalid zoom in {name:?}"))?;
		let x: u32 = captures[2].parse().with_context(|| format!("invalid x in {name:?}"))?;
		let y: u32 = captures[3].parse().with_context(|| format!("invalid y in {name:?}"))?;

		let coord = TileCoord::new(z, x, y)?;
		ensure!(coord.is_valid(), "{name:?} lies outside the zoom {z} tile pyramid");
		Ok(coord)
	}
}
