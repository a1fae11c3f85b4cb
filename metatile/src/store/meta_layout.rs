//! This module defines the `MetaLayout` struct, which represents the header
//! and index table of a meta-tile container file.
//!
//! On disk a container starts with a fixed-size header followed immediately
//! by the index table and the concatenated tile payloads, all little-endian:
//!
//! ```text
//! magic   4 bytes   ASCII "META"
//! count   u32       always BLOCK_EDGE^2
//! x, y, z u32 each  block origin tile, provenance only
//! index   count entries of (offset u64, size u64), slot order
//! payload raw tile bytes, absolute offsets
//! ```
//!
//! The count field could describe other block sizes, but only
//! [`TILES_PER_BLOCK`] is accepted; the strict equality check is the
//! compatibility gate of this format version.

use super::StoreError;
use anyhow::{Result, bail};
use byteorder::LittleEndian;
use metatile_core::{
	Blob, ByteRange, TileCoord,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob},
};
use std::path::Path;

/// Marker identifying a meta-tile container, compared byte-for-byte.
pub const META_MAGIC: &[u8; 4] = b"META";

/// Number of tiles along one side of a block.
pub const BLOCK_EDGE: u32 = 8;

/// Number of index entries in every container.
pub const TILES_PER_BLOCK: usize = (BLOCK_EDGE * BLOCK_EDGE) as usize;

/// Ceiling of the on-disk count field; blocks never exceed it.
pub const MAX_ENTRY_COUNT: usize = 256;

const INDEX_ENTRY_SIZE: usize = 16;

/// Size in bytes of header plus index table; payload starts here.
pub const HEADER_SIZE: usize = 4 + 4 * 4 + TILES_PER_BLOCK * INDEX_ENTRY_SIZE;

const _: () = assert!(TILES_PER_BLOCK <= MAX_ENTRY_COUNT);

/// Header and index table of one meta-tile container.
#[derive(Debug, PartialEq, Eq)]
pub struct MetaLayout {
	/// Origin tile of the block this container holds.
	pub block: TileCoord,
	index: Vec<ByteRange>,
}

impl MetaLayout {
	/// Creates a layout for the given block origin with all index entries
	/// empty.
	pub fn new(block: TileCoord) -> Self {
		Self {
			block,
			index: vec![ByteRange::empty(); TILES_PER_BLOCK],
		}
	}

	/// Sets the byte range recorded for a slot.
	///
	/// # Panics
	///
	/// Panics if `slot` is not below [`TILES_PER_BLOCK`].
	pub fn set(&mut self, slot: usize, range: ByteRange) {
		self.index[slot] = range;
	}

	/// Returns the byte range recorded for a slot.
	///
	/// # Panics
	///
	/// Panics if `slot` is not below [`TILES_PER_BLOCK`].
	pub fn get(&self, slot: usize) -> &ByteRange {
		&self.index[slot]
	}

	/// Returns the number of index entries, always [`TILES_PER_BLOCK`].
	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Returns an iterator over the index entries in slot order.
	pub fn iter(&self) -> impl Iterator<Item = &ByteRange> {
		self.index.iter()
	}

	/// Serializes magic, count, block coordinates and the index table into a
	/// blob of exactly [`HEADER_SIZE`] bytes.
	///
	/// # Errors
	///
	/// Returns an error if serialization produces an unexpected length.
	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();
		writer.write_slice(META_MAGIC)?;
		writer.write_u32(TILES_PER_BLOCK as u32)?;
		writer.write_u32(self.block.x)?;
		writer.write_u32(self.block.y)?;
		writer.write_u32(u32::from(self.block.z))?;
		for range in &self.index {
			writer.write_range(range)?;
		}

		if writer.position()? != HEADER_SIZE as u64 {
			bail!(
				"header should be {HEADER_SIZE} bytes long, but is {} bytes long",
				writer.position()?
			);
		}

		Ok(writer.into_blob())
	}

	/// Parses and validates a header read from `path`.
	///
	/// The path is used for diagnostics only. Validation is fail-closed:
	/// a short buffer, a foreign magic or a count other than
	/// [`TILES_PER_BLOCK`] each make the container unreadable.
	///
	/// # Errors
	///
	/// Returns [`StoreError::CorruptHeader`], [`StoreError::BadMagic`] or
	/// [`StoreError::BadCount`].
	pub fn from_blob(blob: &Blob, path: &Path) -> Result<Self, StoreError> {
		if blob.len() < HEADER_SIZE {
			return Err(StoreError::CorruptHeader {
				path: path.to_path_buf(),
				got: blob.len(),
				expected: HEADER_SIZE,
			});
		}

		let mut reader = ValueReaderSlice::new_le(blob.as_slice());
		let magic = reader.read_bytes(META_MAGIC.len()).map_err(|_| StoreError::BadMagic {
			path: path.to_path_buf(),
		})?;
		if magic != META_MAGIC {
			return Err(StoreError::BadMagic {
				path: path.to_path_buf(),
			});
		}

		let count = reader.read_u32().map_err(|_| StoreError::BadCount {
			path: path.to_path_buf(),
			count: 0,
			expected: TILES_PER_BLOCK as u32,
		})?;
		if count != TILES_PER_BLOCK as u32 {
			return Err(StoreError::BadCount {
				path: path.to_path_buf(),
				count,
				expected: TILES_PER_BLOCK as u32,
			});
		}

		Self::parse_fields(&mut reader).map_err(|_| StoreError::CorruptHeader {
			path: path.to_path_buf(),
			got: blob.len(),
			expected: HEADER_SIZE,
		})
	}

	fn parse_fields(reader: &mut ValueReaderSlice<LittleEndian>) -> Result<MetaLayout> {
		let x = reader.read_u32()?;
		let y = reader.read_u32()?;
		let z = reader.read_u32()?;
		let block = TileCoord::new(u8::try_from(z)?, x, y)?;

		let mut index = Vec::with_capacity(TILES_PER_BLOCK);
		for _ in 0..TILES_PER_BLOCK {
			index.push(reader.read_range()?);
		}
		Ok(MetaLayout { block, index })
	}
}
