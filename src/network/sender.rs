//! Sending side: dial the receiver and stream the file

use crate::config::{Role, TransferConfig};
use crate::core::{StreamCopier, TransferReport};
use crate::error::{IoResultExt, LanCopyError, Result};
use crate::hash::hash_file;
use crate::network::{deadline_after, DeadlineStream};
use crate::progress::{format_bytes, stdout_sink, ProgressSink};
use std::fs::File;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::{Duration, Instant};

/// `host:port`, bracketing IPv6 literals
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Open a TCP connection with a connect timeout
///
/// Resolved addresses are tried in resolver order and share one `timeout`
/// budget. The last error is reported if none of them answers.
pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
    let display = join_host_port(host, port);
    let addrs: Vec<SocketAddr> = (host.trim_matches(|c: char| c == '[' || c == ']'), port)
        .to_socket_addrs()
        .map_err(|e| LanCopyError::AddressResolution(format!("{}: {}", display, e)))?
        .collect();

    connect_any(&addrs, deadline_after(timeout)).map_err(|e| LanCopyError::connection(display, e))
}

/// Try each address in turn until one connects or `deadline` passes
fn connect_any(addrs: &[SocketAddr], deadline: Instant) -> io::Result<TcpStream> {
    let mut last_err = io::Error::new(io::ErrorKind::AddrNotAvailable, "no addresses resolved");
    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "connect timeout exceeded"));
        }

        tracing::debug!("Trying {}", addr);
        match TcpStream::connect_timeout(addr, remaining) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = e,
        }
    }

    Err(last_err)
}

/// Send `config.path` to `config.remote:config.port`
pub fn send_file(config: &TransferConfig) -> Result<TransferReport> {
    let host = config
        .remote
        .as_deref()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LanCopyError::usage("Send mode requires -r <remote_ip> -p <port>"))?;
    config.validate_timeout()?;

    tracing::info!(
        "Connecting to {} (timeout: {}s)...",
        join_host_port(host, config.port),
        config.timeout_secs
    );

    let stream = connect(host, config.port, config.timeout())?;
    let peer = stream.peer_addr().ok();
    let mut conn = DeadlineStream::new(stream, config.transfer_deadline());

    send_over(&mut conn, config, peer)
}

/// Stream the file over an established connection
fn send_over(conn: &mut DeadlineStream, config: &TransferConfig, peer: Option<SocketAddr>) -> Result<TransferReport> {
    let path = config.path.as_path();
    let mut file = File::open(path).with_path(path)?;
    let size = file.metadata().with_path(path)?.len();

    tracing::info!("Sending file: {} ({})", display_name(path), format_bytes(size));

    let checksum = if config.verify {
        tracing::info!("Calculating checksum...");
        let checksum = hash_file(path, config.hash)?;
        tracing::info!("File checksum: {}", checksum.hash);
        Some(checksum)
    } else {
        None
    };

    let mut sink = config.progress.then(|| stdout_sink("Sending", Some(size)));
    let progress = sink.as_mut().map(|s| &mut **s as &mut dyn ProgressSink);

    let start = Instant::now();
    let sent = StreamCopier::new()
        .copy(&mut file, conn, Some(size), progress)
        .and_then(|n| conn.shutdown_write().map(|_| n))
        .map_err(|source| LanCopyError::Transfer { source })?;
    let elapsed = start.elapsed();

    let report = TransferReport::new(Role::Send, path, peer, sent, elapsed).with_checksum(checksum);
    tracing::debug!("{}", report.summary_line());

    Ok(report)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
