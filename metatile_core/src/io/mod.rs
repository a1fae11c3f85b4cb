//! Binary readers and writers used by the container format, plus the
//! short-transfer accumulation loops the storage layer relies on.
//!
//! The value readers and writers support both byte orders; the meta-tile
//! format itself is little-endian.

mod accumulate;
mod value_reader;
mod value_reader_slice;
mod value_writer;
mod value_writer_blob;

pub use accumulate::*;
pub use value_reader::*;
pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
