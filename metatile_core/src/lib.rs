//! Value types (coordinates, byte ranges, blobs) and binary I/O helpers
//! shared by the metatile workspace.

pub mod io;

pub mod types;

pub use types::*;
