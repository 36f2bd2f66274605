//! Transfer reports and session outcomes

use crate::config::{Role, TransferConfig};
use crate::error::Result;
use crate::hash::HashResult;
use crate::progress::{format_bytes, format_elapsed, throughput};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Statistics of one completed transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    /// Which side produced the report
    pub role: Role,
    /// Base name of the local file
    pub file_name: String,
    /// Local file path
    pub path: PathBuf,
    /// Remote end of the connection
    pub peer: Option<SocketAddr>,
    /// Bytes sent or received
    pub bytes: u64,
    /// Wall time spent copying
    pub elapsed: Duration,
    /// Average speed in bytes/second
    pub throughput: u64,
    /// Checksum of the local file, when requested
    pub checksum: Option<HashResult>,
}

impl TransferReport {
    /// Build a report; throughput is derived from `bytes` and `elapsed`
    pub fn new(role: Role, path: &Path, peer: Option<SocketAddr>, bytes: u64, elapsed: Duration) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            role,
            file_name,
            path: path.to_path_buf(),
            peer,
            bytes,
            elapsed,
            throughput: throughput(bytes, elapsed),
            checksum: None,
        }
    }

    /// Attach a checksum
    pub fn with_checksum(mut self, checksum: Option<HashResult>) -> Self {
        self.checksum = checksum;
        self
    }

    /// One-line success message
    pub fn summary_line(&self) -> String {
        let verb = match self.role {
            Role::Send => "sent",
            Role::Receive => "received",
        };
        format!(
            "✓ File {} successfully: {} ({} in {}, {}/s)",
            verb,
            self.file_name,
            format_bytes(self.bytes),
            format_elapsed(self.elapsed),
            format_bytes(self.throughput)
        )
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("{}", self.summary_line());

        if let Some(checksum) = &self.checksum {
            println!("✓ Checksum ({}): {}", checksum.algorithm.name(), checksum.hash);
            if self.role == Role::Receive {
                println!("Note: Compare with sender's checksum to verify integrity");
            }
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// File streamed to the peer
    Sent(TransferReport),
    /// File saved from the peer
    Received(TransferReport),
    /// The first connection came from an address other than the filter
    Rejected {
        /// Who connected
        peer: SocketAddr,
        /// Who was allowed
        expected: IpAddr,
    },
}

impl SessionOutcome {
    /// The transfer report, unless the connection was rejected
    pub fn report(&self) -> Option<&TransferReport> {
        match self {
            Self::Sent(report) | Self::Received(report) => Some(report),
            Self::Rejected { .. } => None,
        }
    }

    /// Check if a file was actually transferred
    pub fn is_transfer(&self) -> bool {
        self.report().is_some()
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        match self {
            Self::Sent(report) | Self::Received(report) => report.print_summary(),
            Self::Rejected { peer, expected } => {
                println!("✗ Rejected connection from {} (expected {})", peer.ip(), expected);
            }
        }
    }

    /// Summary as a single JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Summary as JSON with the session configuration under `config`
    pub fn to_json_with_config(&self, config: &TransferConfig) -> Result<String> {
        Ok(serde_json::to_string(&SessionSummary { config, outcome: self })?)
    }
}

#[derive(Serialize)]
struct SessionSummary<'a> {
    config: &'a TransferConfig,
    #[serde(flatten)]
    outcome: &'a SessionOutcome,
}
