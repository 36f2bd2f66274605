//! Configuration settings for LanCopy
//!
//! Defines the CLI arguments, the runtime transfer configuration derived
//! from them, and the role auto-detection rules.

use crate::error::{LanCopyError, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default connect/accept timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest accepted timeout in seconds (one day)
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// The whole transfer must finish within this many connect timeouts
pub const DEADLINE_MULTIPLIER: u32 = 10;

/// LanCopy - send or receive one file over a raw TCP connection
#[derive(Parser, Debug, Clone)]
#[command(name = "lancopy")]
#[command(author = "LanCopy Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send or receive a single file over raw TCP")]
#[command(long_about = r#"
LanCopy streams one file between two hosts over a plain TCP connection.
The file bytes are sent as-is; closing the connection marks the end of file.

If --mode is omitted it is auto-detected: an existing FILE is sent,
a missing FILE is received.
"#)]
#[command(after_help = r#"Examples:
  # Send file to 192.168.1.100 on port 4444
  lancopy -r 192.168.1.100 -p 4444 myfile.txt

  # Receive file on port 4444, save as newfile.txt
  lancopy -p 4444 newfile.txt

  # Receive with IP filtering and verification
  lancopy --mode receive -r 192.168.1.50 -p 4444 -v received.txt
"#)]
pub struct CliArgs {
    /// File to send, or path to save the received file to
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Explicit mode (auto-detected from FILE when omitted)
    #[arg(short = 'm', long, value_enum, value_name = "MODE")]
    pub mode: Option<Role>,

    /// Remote IP (target for send, source filter for receive)
    #[arg(short = 'r', long, value_name = "IP")]
    pub remote: Option<String>,

    /// Port to connect to or listen on
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Connection timeout in seconds
    #[arg(
        short = 't',
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS),
        value_name = "SECS"
    )]
    pub timeout: u64,

    /// Print the file checksum for manual comparison with the peer
    #[arg(short = 'v', long)]
    pub verify: bool,

    /// Show transfer progress
    #[arg(long)]
    pub progress: bool,

    /// Listen on all interfaces (receive mode only)
    #[arg(short = 'a', long)]
    pub listen_all: bool,

    /// Digest used by --verify
    #[arg(long, value_enum, default_value = "sha256", value_name = "ALGO")]
    pub hash: HashAlgorithm,

    /// Format of the final summary
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

/// Session role
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Connect out and stream the local file
    #[value(name = "send")]
    Send,
    /// Listen, accept one connection and save what arrives
    #[value(name = "receive")]
    Receive,
}

impl Role {
    /// Pick the role for `path` when no mode was given explicitly
    ///
    /// An existing path is sent, anything else is received.
    pub fn detect(path: &Path) -> Self {
        if path.exists() {
            Self::Send
        } else {
            Self::Receive
        }
    }

    /// Explicit mode wins, otherwise auto-detect
    pub fn resolve(explicit: Option<Role>, path: &Path) -> Self {
        explicit.unwrap_or_else(|| Self::detect(path))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Send => write!(f, "send"),
            Self::Receive => write!(f, "receive"),
        }
    }
}

/// Hash algorithm for checksum reporting
///
/// Both produce 256-bit digests.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    #[value(name = "sha256")]
    Sha256,
    /// BLAKE3
    #[value(name = "blake3")]
    Blake3,
}

impl HashAlgorithm {
    /// Get the output size in bytes
    pub fn output_size(&self) -> usize {
        32
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Blake3 => "BLAKE3",
        }
    }
}

/// Output format for the session summary
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object
    Json,
}

/// Runtime configuration for one transfer session
#[derive(Debug, Clone, Serialize)]
pub struct TransferConfig {
    /// Send or receive
    pub role: Role,
    /// Local file to read from or write to
    pub path: PathBuf,
    /// Target host (send) or allowed source IP (receive)
    pub remote: Option<String>,
    /// Port to connect to or listen on (0 = ephemeral when listening)
    pub port: u16,
    /// Address the receiver binds
    pub bind: IpAddr,
    /// Connect/accept timeout in seconds
    pub timeout_secs: u64,
    /// Compute and print the checksum
    pub verify: bool,
    /// Digest used when verifying
    pub hash: HashAlgorithm,
    /// Show progress while copying
    pub progress: bool,
    /// Listen-on-all-interfaces flag as given by the user
    pub listen_all: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            role: Role::Receive,
            path: PathBuf::new(),
            remote: None,
            port: 0,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify: false,
            hash: HashAlgorithm::Sha256,
            progress: false,
            listen_all: false,
        }
    }
}

impl TransferConfig {
    /// Config for sending `path` to `host:port`
    pub fn sender(path: impl Into<PathBuf>, host: impl Into<String>, port: u16) -> Self {
        Self {
            role: Role::Send,
            path: path.into(),
            remote: Some(host.into()),
            port,
            ..Default::default()
        }
    }

    /// Config for receiving into `path` on `port`
    pub fn receiver(path: impl Into<PathBuf>, port: u16) -> Self {
        Self {
            role: Role::Receive,
            path: path.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the connect/accept timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Enable checksum reporting with the given algorithm
    pub fn with_verify(mut self, hash: HashAlgorithm) -> Self {
        self.verify = true;
        self.hash = hash;
        self
    }

    /// Report progress on stdout while copying
    pub fn with_progress(mut self) -> Self {
        self.progress = true;
        self
    }

    /// Only accept a connection from this source IP (receive mode)
    pub fn with_peer_filter(mut self, ip: impl Into<String>) -> Self {
        self.remote = Some(ip.into());
        self
    }

    /// Bind the receiver to a specific address instead of all interfaces
    pub fn with_bind(mut self, bind: IpAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Connect and accept timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Budget for the whole transfer once connected
    pub fn transfer_deadline(&self) -> Duration {
        self.timeout().saturating_mul(DEADLINE_MULTIPLIER)
    }

    /// Reject timeouts outside `1..=MAX_TIMEOUT_SECS`
    pub fn validate_timeout(&self) -> Result<()> {
        if (1..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            Ok(())
        } else {
            Err(LanCopyError::usage(format!(
                "Timeout must be between 1 and {} seconds",
                MAX_TIMEOUT_SECS
            )))
        }
    }

    /// Source IP filter for the receiver, if one was given
    pub fn peer_filter(&self) -> Result<Option<IpAddr>> {
        match self.remote.as_deref() {
            None | Some("") => Ok(None),
            Some(ip) => ip
                .parse::<IpAddr>()
                .map(Some)
                .map_err(|_| LanCopyError::usage(format!("Invalid source IP filter: {}", ip))),
        }
    }

    /// Create config from CLI arguments
    ///
    /// Resolves the role and checks the arguments each role needs.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let role = Role::resolve(args.mode, &args.file);
        let remote = args.remote.clone().filter(|r| !r.is_empty());
        let port = args.port.unwrap_or(0);

        match role {
            Role::Send => {
                if remote.is_none() || port == 0 {
                    return Err(LanCopyError::usage(
                        "Send mode requires -r <remote_ip> -p <port>",
                    ));
                }
                if !args.file.exists() {
                    return Err(LanCopyError::NotFound(args.file.clone()));
                }
            }
            Role::Receive => {
                if port == 0 {
                    return Err(LanCopyError::usage("Receive mode requires -p <port>"));
                }
            }
        }

        let config = Self {
            role,
            path: args.file.clone(),
            remote,
            port,
            timeout_secs: args.timeout,
            verify: args.verify,
            hash: args.hash,
            progress: args.progress,
            listen_all: args.listen_all,
            ..Default::default()
        };

        config.validate_timeout()?;
        if role == Role::Receive {
            config.peer_filter()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("lancopy").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_role_detection() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("present.bin");
        std::fs::write(&existing, b"data").unwrap();

        assert_eq!(Role::detect(&existing), Role::Send);
        assert_eq!(Role::detect(&dir.path().join("absent.bin")), Role::Receive);
        assert_eq!(Role::resolve(Some(Role::Receive), &existing), Role::Receive);
    }

    #[test]
    fn test_from_cli_send() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out.txt");
        std::fs::write(&file, b"hello").unwrap();
        let file_arg = file.to_string_lossy().to_string();

        let args = parse(&["-r", "10.0.0.5", "-p", "4444", "-v", &file_arg]);
        let config = TransferConfig::from_cli(&args).unwrap();

        assert_eq!(config.role, Role::Send);
        assert_eq!(config.remote.as_deref(), Some("10.0.0.5"));
        assert_eq!(config.port, 4444);
        assert!(config.verify);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.transfer_deadline(), Duration::from_secs(300));
    }

    #[test]
    fn test_from_cli_send_requires_remote_and_port() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out.txt");
        std::fs::write(&file, b"hello").unwrap();
        let file_arg = file.to_string_lossy().to_string();

        let no_remote = parse(&["-p", "4444", "--mode", "send", &file_arg]);
        assert!(TransferConfig::from_cli(&no_remote).unwrap_err().is_usage());

        let no_port = parse(&["-r", "10.0.0.5", &file_arg]);
        assert!(TransferConfig::from_cli(&no_port).unwrap_err().is_usage());

        let zero_port = parse(&["-r", "10.0.0.5", "-p", "0", &file_arg]);
        assert!(TransferConfig::from_cli(&zero_port).unwrap_err().is_usage());
    }

    #[test]
    fn test_from_cli_explicit_send_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.txt").to_string_lossy().to_string();

        let args = parse(&["--mode", "send", "-r", "10.0.0.5", "-p", "4444", &missing]);
        let err = TransferConfig::from_cli(&args).unwrap_err();
        assert!(matches!(err, LanCopyError::NotFound(_)));
    }

    #[test]
    fn test_from_cli_receive() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("incoming.bin").to_string_lossy().to_string();

        let args = parse(&["-p", "4444", "-r", "192.168.1.50", "-t", "5", &target]);
        let config = TransferConfig::from_cli(&args).unwrap();
        assert_eq!(config.role, Role::Receive);
        assert_eq!(config.peer_filter().unwrap(), Some("192.168.1.50".parse().unwrap()));
        assert_eq!(config.transfer_deadline(), Duration::from_secs(50));

        let no_port = parse(&[&target]);
        assert!(TransferConfig::from_cli(&no_port).unwrap_err().is_usage());

        let bad_filter = parse(&["-p", "4444", "-r", "not-an-ip", &target]);
        assert!(TransferConfig::from_cli(&bad_filter).unwrap_err().is_usage());
    }

    fn try_parse(args: &[&str]) -> std::result::Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("lancopy").chain(args.iter().copied()))
    }

    #[test]
    fn test_timeout_out_of_range_rejected_by_cli() {
        let target = "/nonexistent/lancopy/file";

        assert!(try_parse(&["-p", "4444", "-t", "0", target]).is_err());
        assert!(try_parse(&["-p", "4444", "-t", "18446744073709551615", target]).is_err());
        assert!(try_parse(&["-p", "4444", "-t", "86401", target]).is_err());

        let max = MAX_TIMEOUT_SECS.to_string();
        let args = try_parse(&["-p", "4444", "-t", &max, target]).unwrap();
        let config = TransferConfig::from_cli(&args).unwrap();
        assert_eq!(config.transfer_deadline(), Duration::from_secs(MAX_TIMEOUT_SECS * 10));
    }

    #[test]
    fn test_huge_timeout_does_not_overflow() {
        let mut args = parse(&["-p", "4444", "/nonexistent/lancopy/file"]);
        args.timeout = u64::MAX;
        assert!(TransferConfig::from_cli(&args).unwrap_err().is_usage());

        let config = TransferConfig::receiver("unused.bin", 4444).with_timeout(u64::MAX);
        assert_eq!(config.transfer_deadline(), Duration::MAX);
        assert!(config.validate_timeout().unwrap_err().is_usage());
        assert!(TransferConfig::receiver("unused.bin", 4444)
            .with_timeout(0)
            .validate_timeout()
            .is_err());
    }

    #[test]
    fn test_config_serializes() {
        let config = TransferConfig::sender("payload.bin", "10.0.0.5", 4444)
            .with_timeout(7)
            .with_verify(HashAlgorithm::Blake3);
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["role"], "send");
        assert_eq!(value["remote"], "10.0.0.5");
        assert_eq!(value["port"], 4444);
        assert_eq!(value["bind"], "0.0.0.0");
        assert_eq!(value["timeout_secs"], 7);
        assert_eq!(value["hash"], "blake3");
        assert_eq!(value["verify"], true);
    }

    #[test]
    fn test_hash_algorithm() {
        assert_eq!(HashAlgorithm::Sha256.output_size(), 32);
        assert_eq!(HashAlgorithm::Blake3.output_size(), 32);
        assert_eq!(HashAlgorithm::default().name(), "SHA-256");
    }
}
