//! This module defines the `ValueReader` trait for reading typed values from
//! binary data.
//!
//! Implementations handle either byte order; the current read position is
//! managed by the implementation so that container headers can be parsed
//! field by field.

use crate::ByteRange;
use anyhow::{Result, bail};
use byteorder::{ByteOrder, ReadBytesExt};
use std::io::{Read, Seek};

/// A simple alias for types implementing both `Seek` and `Read`.
pub trait SeekRead: Seek + Read {}

/// A trait for reading values from binary data with a fixed byte order.
pub trait ValueReader<'a, E: ByteOrder + 'a> {
	/// Returns the underlying reader to access raw bytes.
	fn get_reader(&mut self) -> &mut dyn SeekRead;

	/// Returns the total length of the readable data.
	fn len(&self) -> u64;

	/// Returns the current position within the readable data.
	fn position(&mut self) -> u64;

	/// Sets the current position within the readable data.
	///
	/// # Errors
	///
	/// Returns an error if the position lies outside the data.
	fn set_position(&mut self, position: u64) -> Result<()>;

	/// Checks if there is no data to read.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of bytes remaining to be read.
	fn remaining(&mut self) -> u64 {
		self.len() - self.position()
	}

	/// Reads an unsigned 8-bit integer.
	fn read_u8(&mut self) -> Result<u8> {
		Ok(self.get_reader().read_u8()?)
	}

	/// Reads an unsigned 32-bit integer.
	fn read_u32(&mut self) -> Result<u32> {
		Ok(self.get_reader().read_u32::<E>()?)
	}

	/// Reads an unsigned 64-bit integer.
	fn read_u64(&mut self) -> Result<u64> {
		Ok(self.get_reader().read_u64::<E>()?)
	}

	/// Reads exactly `length` raw bytes.
	fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
		let mut vec = vec![0u8; length];
		match self.get_reader().read_exact(&mut vec) {
			Ok(()) => Ok(vec),
			Err(e) => bail!("failed to read {length} bytes: {e}"),
		}
	}

	/// Reads a [`ByteRange`] (offset followed by length).
	fn read_range(&mut self) -> Result<ByteRange> {
		Ok(ByteRange::new(self.read_u64()?, self.read_u64()?))
	}
}
