//! Error kinds of the tile store.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by single-tile and container operations.
///
/// `NotFound` is an expected signal: the fallback read path treats it as
/// "try the next source". Everything else marks a broken container or a
/// failed transfer.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("{}: not found", .path.display())]
	NotFound { path: PathBuf },

	#[error("{}: too small to contain a header ({got} of {expected} bytes)", .path.display())]
	CorruptHeader {
		path: PathBuf,
		got: usize,
		expected: usize,
	},

	#[error("{}: header magic mismatch", .path.display())]
	BadMagic { path: PathBuf },

	#[error("{}: header count {count} != {expected}", .path.display())]
	BadCount {
		path: PathBuf,
		count: u32,
		expected: u32,
	},

	#[error("{}: seek to {offset} failed", .path.display())]
	Seek {
		path: PathBuf,
		offset: u64,
		#[source]
		source: io::Error,
	},

	#[error("{}: read failed", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("{}: write failed", .path.display())]
	Write {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

impl StoreError {
	/// True for the absent-file case that drives the standalone fallback.
	pub fn is_not_found(&self) -> bool {
		matches!(self, StoreError::NotFound { .. })
	}

	/// Classifies the error of an `open` call: a missing file is the
	/// expected `NotFound` signal, anything else is a read failure.
	pub(crate) fn from_open(path: &Path, source: io::Error) -> StoreError {
		if source.kind() == io::ErrorKind::NotFound {
			StoreError::NotFound {
				path: path.to_path_buf(),
			}
		} else {
			StoreError::Read {
				path: path.to_path_buf(),
				source,
			}
		}
	}

	pub(crate) fn read(path: &Path, source: io::Error) -> StoreError {
		StoreError::Read {
			path: path.to_path_buf(),
			source,
		}
	}

	pub(crate) fn write(path: &Path, source: io::Error) -> StoreError {
		StoreError::Write {
			path: path.to_path_buf(),
			source,
		}
	}
}
