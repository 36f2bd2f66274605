//! Core transfer module
//!
//! The chunked stream copier, transfer reports and the session
//! dispatcher that picks sender or receiver.

mod copier;
mod report;
mod session;

pub use copier::*;
pub use report::*;
pub use session::*;
