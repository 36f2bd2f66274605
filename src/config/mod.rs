//! Configuration module for LanCopy
//!
//! Provides CLI arguments, role detection and the per-session
//! transfer configuration.

mod settings;

pub use settings::*;
