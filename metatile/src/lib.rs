//! A store that bundles square blocks of rendered map tiles into single
//! "meta-tile" container files and unpacks them again on demand.
//!
//! Storing each tile as its own file burns one inode per tile; bundling an
//! 8x8 block into one container cuts that by a factor of 64 and keeps the
//! bytes of neighbouring tiles close together on disk. The container format,
//! the pack/unpack orchestrators and the single-tile read path live in
//! [`store`].

pub mod store;

pub use store::*;
