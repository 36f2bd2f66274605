//! Checksum computation
//!
//! Streams files through a 256-bit digest (SHA-256 or BLAKE3) so sender
//! and receiver can print values for the operator to compare.

mod integrity;

pub use integrity::*;
