//! Block unpack orchestrator.
//!
//! Unpacking is deliberately more lenient than packing: one missing or
//! corrupt slot does not stop the rest of the block from being
//! re-materialized. The container is removed afterwards either way.

use super::{BLOCK_EDGE, TileLayout, read_from_meta, write_tile};
use anyhow::Result;
use itertools::Itertools;
use log::{info, warn};
use metatile_core::TileCoord;
use std::fs;

/// Staging buffer for one tile at a time; tiles larger than this are
/// truncated by the reader's clamp policy.
pub const TILE_BUFFER_SIZE: usize = 1024 * 1024;

/// Explodes the container of the block `coord` belongs to back into
/// standalone tile files, then removes the container.
///
/// `coord` may name the container itself or any tile inside it; it is
/// normalized to the block origin first.
///
/// # Errors
///
/// Per-tile failures are logged and skipped. The only hard error is an
/// invalid coordinate.
pub fn unpack(layout: &TileLayout, coord: &TileCoord) -> Result<()> {
	let block = coord.block_origin(BLOCK_EDGE);
	let (meta_path, _) = layout.meta_path(&block);
	let span = block.block_span(BLOCK_EDGE);
	let mut buf = vec![0u8; TILE_BUFFER_SIZE];

	for (ox, oy) in (0..span).cartesian_product(0..span) {
		let sub = TileCoord::new(block.z, block.x + ox, block.y + oy)?;
		match read_from_meta(layout, &sub, &mut buf) {
			Ok(0) => warn!("no data for tile {sub:?} in {}", meta_path.display()),
			Ok(len) => {
				if let Err(e) = write_tile(layout, &sub, &buf[..len]) {
					warn!("could not write tile {sub:?}: {e}");
				}
			}
			Err(e) => warn!("could not read tile {sub:?}: {e}"),
		}
	}

	// Cleanup is advisory: the tiles are already on disk, a leftover
	// container only wastes space.
	if let Err(e) = fs::remove_file(&meta_path) {
		warn!("could not remove container {}: {e}", meta_path.display());
	} else {
		info!("removed container {}", meta_path.display());
	}

	Ok(())
}
