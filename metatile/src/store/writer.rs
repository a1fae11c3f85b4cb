//! Standalone tile writer and the shared create/truncate/write-all helper.

use super::{StoreError, TileLayout};
use log::debug;
use metatile_core::{TileCoord, io::write_accumulating};
use std::fs::{self, File};
use std::path::Path;

/// Writes one tile back out as a standalone file, creating missing parent
/// directories.
///
/// # Errors
///
/// Returns [`StoreError::Write`] if the directory, the file or the transfer
/// fails. Batch callers treat this as a per-tile failure: they log it and
/// keep going.
pub fn write_tile(layout: &TileLayout, coord: &TileCoord, bytes: &[u8]) -> Result<(), StoreError> {
	let path = layout.tile_path(coord);
	write_file(&path, bytes)?;
	debug!("produced tile {}", path.display());
	Ok(())
}

/// Creates (or truncates) `path` and writes all of `bytes` through the
/// accumulating write loop.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
	if let Some(parent) = path.parent() {
		if !parent.exists() {
			fs::create_dir_all(parent).map_err(|e| StoreError::write(path, e))?;
		}
	}

	let mut file = File::create(path).map_err(|e| StoreError::write(path, e))?;
	write_accumulating(&mut file, bytes).map_err(|e| StoreError::write(path, e))
}
