//! # LanCopy - single-file transfer over raw TCP
//!
//! LanCopy moves one file between two hosts over a plain TCP connection.
//! One side sends, the other receives; the file bytes go over the wire
//! unframed and the sender closing its half of the connection marks the end
//! of the file.
//!
//! ## Features
//!
//! - **Role auto-detection**: an existing path is sent, a missing one is received
//! - **Timeouts**: connect/accept timeout plus an overall transfer deadline
//! - **Peer filter**: the receiver can insist on one source IP
//! - **Checksums**: SHA-256 or BLAKE3, printed for manual comparison
//! - **Progress**: percentage when the size is known, byte count otherwise
//!
//! ## Quick Start
//!
//! ```no_run
//! use lancopy::config::TransferConfig;
//! use lancopy::network::{receive_file, send_file};
//!
//! // On the receiving host
//! let outcome = receive_file(&TransferConfig::receiver("incoming.bin", 4444)).unwrap();
//! outcome.print_summary();
//!
//! // On the sending host
//! let report = send_file(&TransferConfig::sender("data.bin", "192.168.1.50", 4444)).unwrap();
//! report.print_summary();
//! ```
//!
//! ## Embedding a receiver
//!
//! ```no_run
//! use lancopy::config::TransferConfig;
//! use lancopy::network::Receiver;
//!
//! let config = TransferConfig::receiver("incoming.bin", 0).with_peer_filter("10.0.0.7");
//! let receiver = Receiver::bind(&config).unwrap();
//! println!("Listening on {}", receiver.local_addr().unwrap());
//! let outcome = receiver.receive().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod hash;
pub mod network;
pub mod progress;

// Re-export commonly used types
pub use config::{HashAlgorithm, Role, TransferConfig};
pub use core::{run_session, SessionOutcome, TransferReport};
pub use error::{LanCopyError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use lancopy::prelude::*;
    //! ```

    pub use crate::config::{HashAlgorithm, Role, TransferConfig};
    pub use crate::core::{copy_with_progress, run_session, SessionOutcome, StreamCopier, TransferReport};
    pub use crate::error::{LanCopyError, Result};
    pub use crate::hash::{hash_file, HashResult};
    pub use crate::network::{receive_file, send_file, Receiver};
    pub use crate::progress::{LineProgress, ProgressSink};
}
