//! Integration tests for packing blocks of tiles into meta-tile containers
//! and unpacking them again.
//!
//! These tests verify the end-to-end properties of the store: lossless
//! round trips, the all-or-nothing pack policy, the lenient unpack policy,
//! and block clipping at low zoom levels.

use anyhow::Result;
use metatile::{BLOCK_EDGE, HEADER_SIZE, TILES_PER_BLOCK, TileLayout, pack, unpack};
use metatile_core::TileCoord;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn tile_body(x: u32, y: u32) -> Vec<u8> {
	format!("tile {x}/{y} payload {}", x * 1000 + y).into_bytes()
}

/// Lays down the standalone tiles of the block starting at (x, y).
fn render_block(root: &Path, z: u8, x: u32, y: u32, span: u32) -> Result<()> {
	for ox in 0..span {
		for oy in 0..span {
			let dir = root.join(format!("{z}/{}", x + ox));
			fs::create_dir_all(&dir)?;
			fs::write(dir.join(format!("{}.png", y + oy)), tile_body(x + ox, y + oy))?;
		}
	}
	Ok(())
}

#[test]
fn pack_then_unpack_round_trip() -> Result<()> {
	let dir = TempDir::new()?;
	let layout = TileLayout::new(dir.path());
	let block = TileCoord::new(5, 8, 16).unwrap();
	render_block(dir.path(), 5, 8, 16, BLOCK_EDGE)?;

	pack(&layout, &block)?;

	let meta_path = dir.path().join("5/8/16.meta");
	assert!(meta_path.exists());
	assert!(!dir.path().join("5/8/16.png").exists(), "packed tiles must be removed");
	assert!(!dir.path().join("5/15/23.png").exists());

	// a member tile, not the origin, addresses the same block
	unpack(&layout, &TileCoord::new(5, 11, 19).unwrap())?;

	assert!(!meta_path.exists(), "unpack must remove the container");
	for x in 8..16 {
		for y in 16..24 {
			let restored = fs::read(dir.path().join(format!("5/{x}/{y}.png")))?;
			assert_eq!(restored, tile_body(x, y), "tile {x}/{y} must round trip unchanged");
		}
	}
	Ok(())
}

#[test]
fn container_carries_the_expected_header() -> Result<()> {
	let dir = TempDir::new()?;
	let layout = TileLayout::new(dir.path());
	let block = TileCoord::new(5, 8, 16).unwrap();
	render_block(dir.path(), 5, 8, 16, BLOCK_EDGE)?;

	pack(&layout, &block)?;

	let bytes = fs::read(dir.path().join("5/8/16.meta"))?;
	assert!(bytes.len() > HEADER_SIZE);
	assert_eq!(&bytes[0..4], b"META");
	assert_eq!(bytes[4..8], (TILES_PER_BLOCK as u32).to_le_bytes());
	assert_eq!(bytes[8..12], 8u32.to_le_bytes());
	assert_eq!(bytes[12..16], 16u32.to_le_bytes());
	assert_eq!(bytes[16..20], 5u32.to_le_bytes());

	// payload of the first slot starts right behind the index table
	let offset = u64::from_le_bytes(bytes[20..28].try_into().unwrap());
	assert_eq!(offset, HEADER_SIZE as u64);
	Ok(())
}

#[test]
fn pack_refuses_unaligned_origins() -> Result<()> {
	let dir = TempDir::new()?;
	let layout = TileLayout::new(dir.path());

	assert!(pack(&layout, &TileCoord::new(5, 9, 16).unwrap()).is_err());
	Ok(())
}

#[test]
fn pack_is_all_or_nothing_on_missing_tiles() -> Result<()> {
	let dir = TempDir::new()?;
	let layout = TileLayout::new(dir.path());
	let block = TileCoord::new(5, 8, 16).unwrap();
	render_block(dir.path(), 5, 8, 16, BLOCK_EDGE)?;

	fs::remove_file(dir.path().join("5/12/20.png"))?;

	assert!(pack(&layout, &block).is_err());
	assert!(!dir.path().join("5/8/16.meta").exists(), "no container may be written");

	// the still-present tiles are untouched
	assert_eq!(fs::read(dir.path().join("5/8/16.png"))?, tile_body(8, 16));
	assert_eq!(fs::read(dir.path().join("5/15/23.png"))?, tile_body(15, 23));
	Ok(())
}

#[test]
fn pack_is_all_or_nothing_on_empty_tiles() -> Result<()> {
	let dir = TempDir::new()?;
	let layout = TileLayout::new(dir.path());
	let block = TileCoord::new(5, 8, 16).unwrap();
	render_block(dir.path(), 5, 8, 16, BLOCK_EDGE)?;

	fs::write(dir.path().join("5/12/20.png"), b"")?;

	assert!(pack(&layout, &block).is_err());
	assert!(!dir.path().join("5/8/16.meta").exists());
	Ok(())
}

#[test]
fn unpack_skips_a_slot_pointing_past_the_end() -> Result<()> {
	let dir = TempDir::new()?;
	let layout = TileLayout::new(dir.path());
	let block = TileCoord::new(5, 8, 16).unwrap();
	render_block(dir.path(), 5, 8, 16, BLOCK_EDGE)?;

	pack(&layout, &block)?;

	// point the entry of tile (9, 17) - slot 9 - far beyond end-of-file
	let meta_path = dir.path().join("5/8/16.meta");
	let mut bytes = fs::read(&meta_path)?;
	let entry = 20 + 9 * 16;
	bytes[entry..entry + 8].copy_from_slice(&10_000_000u64.to_le_bytes());
	bytes[entry + 8..entry + 16].copy_from_slice(&10u64.to_le_bytes());
	fs::write(&meta_path, bytes)?;

	unpack(&layout, &block)?;

	assert!(!meta_path.exists(), "cleanup happens even with a broken slot");
	assert!(!dir.path().join("5/9/17.png").exists(), "the broken slot must not materialize");
	for x in 8..16 {
		for y in 16..24 {
			if (x, y) == (9, 17) {
				continue;
			}
			assert_eq!(fs::read(dir.path().join(format!("5/{x}/{y}.png")))?, tile_body(x, y));
		}
	}
	Ok(())
}

#[test]
fn low_zoom_blocks_are_clipped_to_the_pyramid() -> Result<()> {
	let dir = TempDir::new()?;
	let layout = TileLayout::new(dir.path());
	let block = TileCoord::new(2, 0, 0).unwrap();

	// zoom 2 has a 4x4 pyramid, a block covers it entirely
	render_block(dir.path(), 2, 0, 0, 4)?;

	pack(&layout, &block)?;

	// the index table still reserves all 64 slots
	let bytes = fs::read(dir.path().join("2/0/0.meta"))?;
	assert_eq!(bytes[4..8], (TILES_PER_BLOCK as u32).to_le_bytes());
	assert!(bytes.len() > HEADER_SIZE);

	unpack(&layout, &block)?;

	for x in 0..4 {
		for y in 0..4 {
			assert_eq!(fs::read(dir.path().join(format!("2/{x}/{y}.png")))?, tile_body(x, y));
		}
	}
	assert!(!dir.path().join("2/0/0.meta").exists());
	Ok(())
}

#[test]
fn unpack_survives_a_missing_container() -> Result<()> {
	let dir = TempDir::new()?;
	let layout = TileLayout::new(dir.path());

	// nothing to do, but the batch semantics are lenient throughout
	unpack(&layout, &TileCoord::new(5, 8, 16).unwrap())?;
	Ok(())
}
