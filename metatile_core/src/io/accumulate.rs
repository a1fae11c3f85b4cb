//! Short-transfer accumulation loops.
//!
//! Reads and writes against the filesystem may transfer fewer bytes than
//! requested. Every transfer in this workspace goes through these two loops,
//! which keep going until the requested length is satisfied, end-of-file is
//! reached, or an unrecoverable error occurs. Interrupted transfers are
//! retried; they are a completion of an operation still in progress, not a
//! retry of a failed one.

use std::io::{Error, ErrorKind, Read, Result, Write};

/// Reads into `buf` until it is full or the reader reaches end-of-file.
///
/// Returns the number of bytes actually read, which is less than `buf.len()`
/// only if end-of-file was reached first.
///
/// # Errors
///
/// Returns the first unrecoverable I/O error of the underlying reader.
pub fn read_accumulating<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
	let mut pos = 0;
	while pos < buf.len() {
		match reader.read(&mut buf[pos..]) {
			Ok(0) => break,
			Ok(got) => pos += got,
			Err(e) if e.kind() == ErrorKind::Interrupted => {}
			Err(e) => return Err(e),
		}
	}
	Ok(pos)
}

/// Writes the whole of `buf`, accumulating over short writes.
///
/// # Errors
///
/// Returns the first unrecoverable I/O error of the underlying writer, or a
/// `WriteZero` error if the writer stops accepting bytes.
pub fn write_accumulating<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
	let mut pos = 0;
	while pos < buf.len() {
		match writer.write(&buf[pos..]) {
			Ok(0) => return Err(Error::new(ErrorKind::WriteZero, "writer accepted no bytes")),
			Ok(len) => pos += len,
			Err(e) if e.kind() == ErrorKind::Interrupted => {}
			Err(e) => return Err(e),
		}
	}
	Ok(())
}
