//! Block pack orchestrator.
//!
//! Packing is all-or-nothing: if any tile of the block cannot be read, no
//! container is written and the standalone files stay untouched. Partial
//! containers never exist on disk; what can exist, if the process dies or
//! the disk fills mid-write, is a short container, because publication is a
//! plain create/truncate/write without an atomic rename. Single writer per
//! block is a caller contract.

use super::{BLOCK_EDGE, HEADER_SIZE, MetaLayout, TileLayout, read_from_file, write_file};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::{info, warn};
use metatile_core::{ByteRange, TileCoord};
use std::fs;

/// Working buffer for assembling one whole container: header, index and the
/// payload of a full block.
pub const PACK_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Packs the block starting at `block` into a single container file, then
/// removes the standalone tiles that went into it.
///
/// `block` must be the origin tile of its block. At zoom levels where the
/// pyramid is smaller than one block, only the existing `2^z * 2^z` tiles
/// are read; the index table still carries all slots.
///
/// # Errors
///
/// Returns an error if `block` is not block-aligned, if any tile of the
/// block is missing, unreadable or empty (in which case no container is
/// written), or if writing the container fails (which can leave an
/// incomplete container behind).
pub fn pack(layout: &TileLayout, block: &TileCoord) -> Result<()> {
	let (meta_path, slot) = layout.meta_path(block);
	ensure!(slot == 0, "pack needs the origin of a block, but {block:?} has slot {slot}");

	let span = block.block_span(BLOCK_EDGE);
	let mut buf = vec![0u8; PACK_BUFFER_SIZE];
	let mut meta = MetaLayout::new(*block);
	let mut cursor = HEADER_SIZE;

	for (ox, oy) in (0..span).cartesian_product(0..span) {
		let coord = TileCoord::new(block.z, block.x + ox, block.y + oy)?;
		let len = read_from_file(layout, &coord, &mut buf[cursor..])
			.with_context(|| format!("reading sub tile {coord:?} of block {block:?}; not writing a container"))?;
		ensure!(
			len > 0,
			"sub tile {coord:?} of block {block:?} is empty; not writing a container"
		);

		meta.set(coord.slot_in_block(BLOCK_EDGE), ByteRange::new(cursor as u64, len as u64));
		cursor += len;
	}

	buf[..HEADER_SIZE].copy_from_slice(meta.to_blob()?.as_slice());
	write_file(&meta_path, &buf[..cursor]).with_context(|| format!("writing container for block {block:?}"))?;
	info!("produced container {} ({cursor} bytes)", meta_path.display());

	// Cleanup is advisory: the container is already published, a leftover
	// standalone tile only wastes an inode.
	for (ox, oy) in (0..span).cartesian_product(0..span) {
		let coord = TileCoord::new(block.z, block.x + ox, block.y + oy)?;
		let path = layout.tile_path(&coord);
		if let Err(e) = fs::remove_file(&path) {
			warn!("could not remove packed tile {}: {e}", path.display());
		}
	}

	Ok(())
}
