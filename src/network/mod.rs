//! Network transfer module
//!
//! One file over one plain TCP connection, no framing:
//! - the sender dials, streams the file and shuts down its write half
//! - the receiver accepts a single connection and saves bytes until EOF
//!
//! ```text
//! sender                         receiver
//!   | connect (timeout)             | listen 0.0.0.0:port, accept (timeout)
//!   | ---- raw file bytes ------->  | peer filter check
//!   | shutdown(write)  ---- EOF --> | close file
//! ```
//!
//! Once connected both sides share a deadline of ten connect timeouts.

mod deadline;
mod receiver;
mod sender;

pub use deadline::*;
pub use receiver::*;
pub use sender::*;
