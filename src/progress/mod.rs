//! Progress reporting module
//!
//! Progress sinks for the stream copier plus the size, speed and
//! duration formatting used in transfer summaries.

mod reporter;

pub use reporter::*;
