//! Single-tile reads: from a container, from a standalone file, and the
//! container-first fallback composing the two.
//!
//! All three functions fill a caller-supplied buffer and return the number
//! of bytes actually read. A tile larger than the buffer is clamped to the
//! buffer's capacity with a warning; this truncation is a documented lossy
//! tradeoff, callers size their buffers generously instead.

use super::{HEADER_SIZE, MetaLayout, StoreError, TileLayout};
use log::{trace, warn};
use metatile_core::{Blob, TileCoord, io::read_accumulating};
use std::fs::File;
use std::io::{Seek, SeekFrom};

/// Reads one tile out of the meta-tile container it belongs to.
///
/// Returns the number of bytes read, which may be less than the recorded
/// tile size if the container ends early or the buffer is too small.
///
/// # Errors
///
/// [`StoreError::NotFound`] if no container exists (the expected signal for
/// the standalone fallback); [`StoreError::CorruptHeader`],
/// [`StoreError::BadMagic`] or [`StoreError::BadCount`] if the container is
/// unreadable; [`StoreError::Seek`] if the recorded offset lies beyond the
/// end of the file; [`StoreError::Read`] on transfer failures.
pub fn read_from_meta(layout: &TileLayout, coord: &TileCoord, buf: &mut [u8]) -> Result<usize, StoreError> {
	let (path, slot) = layout.meta_path(coord);

	let mut file = File::open(&path).map_err(|e| StoreError::from_open(&path, e))?;

	let mut header = vec![0u8; HEADER_SIZE];
	let got = read_accumulating(&mut file, &mut header).map_err(|e| StoreError::read(&path, e))?;
	if got < HEADER_SIZE {
		return Err(StoreError::CorruptHeader {
			path,
			got,
			expected: HEADER_SIZE,
		});
	}

	let meta = MetaLayout::from_blob(&Blob::from(header), &path)?;
	let range = meta.get(slot);
	let offset = range.offset;
	let mut size = range.length as usize;

	let file_len = file.metadata().map_err(|e| StoreError::read(&path, e))?.len();
	if offset > file_len {
		return Err(StoreError::Seek {
			path,
			offset,
			source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "offset beyond end of container"),
		});
	}
	file.seek(SeekFrom::Start(offset)).map_err(|e| StoreError::Seek {
		path: path.clone(),
		offset,
		source: e,
	})?;

	if size > buf.len() {
		warn!(
			"{}: truncating tile of {size} bytes to fit buffer of {} bytes",
			path.display(),
			buf.len()
		);
		size = buf.len();
	}

	read_accumulating(&mut file, &mut buf[..size]).map_err(|e| StoreError::read(&path, e))
}

/// Reads one tile from its standalone file.
///
/// Returns the number of bytes read.
///
/// # Errors
///
/// [`StoreError::NotFound`] if the file is absent, [`StoreError::Read`] on
/// transfer failures.
pub fn read_from_file(layout: &TileLayout, coord: &TileCoord, buf: &mut [u8]) -> Result<usize, StoreError> {
	let path = layout.tile_path(coord);

	let mut file = File::open(&path).map_err(|e| StoreError::from_open(&path, e))?;
	let got = read_accumulating(&mut file, buf).map_err(|e| StoreError::read(&path, e))?;
	if got == buf.len() {
		warn!("{}: tile filled the whole buffer and may be truncated", path.display());
	}
	Ok(got)
}

/// Reads one tile, trying the meta-tile container first and falling back to
/// the standalone file.
///
/// A missing container falls through silently; a broken container falls
/// through too (so that a foreign or corrupt file never masks a standalone
/// tile), but is surfaced as a warning.
///
/// # Errors
///
/// Returns the standalone read error if both sources fail.
pub fn read_tile(layout: &TileLayout, coord: &TileCoord, buf: &mut [u8]) -> Result<usize, StoreError> {
	match read_from_meta(layout, coord, buf) {
		Ok(got) => Ok(got),
		Err(e) if e.is_not_found() => {
			trace!("no container for {coord:?}, trying standalone tile");
			read_from_file(layout, coord, buf)
		}
		Err(e) => {
			warn!("container unreadable for {coord:?}, trying standalone tile: {e}");
			read_from_file(layout, coord, buf)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::{BLOCK_EDGE, TILES_PER_BLOCK};
	use anyhow::Result;
	use metatile_core::ByteRange;
	use std::fs;
	use tempfile::TempDir;

	/// Builds a container holding one real tile in the slot of `coord`.
	fn write_container(layout: &TileLayout, coord: &TileCoord, tile: &[u8]) -> Result<()> {
		let (path, slot) = layout.meta_path(coord);
		let mut meta = MetaLayout::new(coord.block_origin(BLOCK_EDGE));
		meta.set(slot, ByteRange::new(HEADER_SIZE as u64, tile.len() as u64));

		let mut bytes = meta.to_blob()?.into_vec();
		bytes.extend_from_slice(tile);
		fs::create_dir_all(path.parent().unwrap())?;
		fs::write(&path, bytes)?;
		Ok(())
	}

	#[test]
	fn reads_tile_from_container() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 17, 42).unwrap();
		write_container(&layout, &coord, b"tile bytes")?;

		let mut buf = [0u8; 64];
		let got = read_from_meta(&layout, &coord, &mut buf)?;
		assert_eq!(&buf[..got], b"tile bytes");
		Ok(())
	}

	#[test]
	fn missing_container_is_not_found() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 17, 42).unwrap();

		let mut buf = [0u8; 64];
		let err = read_from_meta(&layout, &coord, &mut buf).unwrap_err();
		assert!(err.is_not_found());
		Ok(())
	}

	#[test]
	fn short_container_is_corrupt() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 16, 40).unwrap();
		let (path, _) = layout.meta_path(&coord);
		fs::create_dir_all(path.parent().unwrap())?;
		fs::write(&path, b"META but far too short")?;

		let mut buf = [0u8; 64];
		let err = read_from_meta(&layout, &coord, &mut buf).unwrap_err();
		assert!(matches!(err, StoreError::CorruptHeader { .. }));
		Ok(())
	}

	#[test]
	fn offset_beyond_end_is_a_seek_error() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 16, 40).unwrap();
		let (path, slot) = layout.meta_path(&coord);

		let mut meta = MetaLayout::new(coord.block_origin(BLOCK_EDGE));
		meta.set(slot, ByteRange::new(1_000_000, 10));
		fs::create_dir_all(path.parent().unwrap())?;
		fs::write(&path, meta.to_blob()?.into_vec())?;

		let mut buf = [0u8; 64];
		let err = read_from_meta(&layout, &coord, &mut buf).unwrap_err();
		assert!(matches!(err, StoreError::Seek { offset: 1_000_000, .. }));
		Ok(())
	}

	#[test]
	fn oversized_tile_is_clamped_to_buffer() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 17, 42).unwrap();
		write_container(&layout, &coord, &[7u8; 100])?;

		let mut buf = [0u8; 10];
		let got = read_from_meta(&layout, &coord, &mut buf)?;
		assert_eq!(got, 10);
		assert_eq!(buf, [7u8; 10]);
		Ok(())
	}

	#[test]
	fn falls_back_to_standalone_tile() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 17, 42).unwrap();
		let tile_path = layout.tile_path(&coord);
		fs::create_dir_all(tile_path.parent().unwrap())?;
		fs::write(&tile_path, b"standalone")?;

		let mut buf = [0u8; 64];
		let got = read_tile(&layout, &coord, &mut buf)?;
		assert_eq!(&buf[..got], b"standalone");
		Ok(())
	}

	#[test]
	fn foreign_magic_falls_through_to_standalone_tile() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 17, 42).unwrap();

		// a file of plausible size that is not a meta-tile container
		let (meta_path, _) = layout.meta_path(&coord);
		fs::create_dir_all(meta_path.parent().unwrap())?;
		fs::write(&meta_path, vec![0x42u8; HEADER_SIZE + 100])?;

		let tile_path = layout.tile_path(&coord);
		fs::create_dir_all(tile_path.parent().unwrap())?;
		fs::write(&tile_path, b"standalone")?;

		let mut buf = [0u8; 64];
		let got = read_tile(&layout, &coord, &mut buf)?;
		assert_eq!(&buf[..got], b"standalone");
		Ok(())
	}

	#[test]
	fn wrong_count_falls_through_to_standalone_tile() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 17, 42).unwrap();
		write_container(&layout, &coord, b"packed")?;

		// flip the count field to a value the format refuses
		let (meta_path, _) = layout.meta_path(&coord);
		let mut bytes = fs::read(&meta_path)?;
		bytes[4..8].copy_from_slice(&(TILES_PER_BLOCK as u32 + 1).to_le_bytes());
		fs::write(&meta_path, bytes)?;

		let tile_path = layout.tile_path(&coord);
		fs::create_dir_all(tile_path.parent().unwrap())?;
		fs::write(&tile_path, b"standalone")?;

		let mut buf = [0u8; 64];
		let got = read_tile(&layout, &coord, &mut buf)?;
		assert_eq!(&buf[..got], b"standalone");
		Ok(())
	}

	#[test]
	fn both_sources_missing_is_not_found() -> Result<()> {
		let dir = TempDir::new()?;
		let layout = TileLayout::new(dir.path());
		let coord = TileCoord::new(10, 17, 42).unwrap();

		let mut buf = [0u8; 64];
		let err = read_tile(&layout, &coord, &mut buf).unwrap_err();
		assert!(err.is_not_found());
		Ok(())
	}
}
