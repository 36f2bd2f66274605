//! Receiving side: accept one connection and save what arrives

use crate::config::{Role, TransferConfig};
use crate::core::{SessionOutcome, StreamCopier, TransferReport};
use crate::error::{IoResultExt, LanCopyError, Result};
use crate::hash::hash_file;
use crate::network::{deadline_after, DeadlineStream};
use crate::progress::{stdout_sink, ProgressSink};
use std::fs::File;
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval of the accept loop
const ACCEPT_POLL: Duration = Duration::from_millis(10);

/// A bound listener waiting for exactly one sender
#[derive(Debug)]
pub struct Receiver {
    listener: TcpListener,
    config: TransferConfig,
    peer_filter: Option<IpAddr>,
}

impl Receiver {
    /// Bind the listening socket
    pub fn bind(config: &TransferConfig) -> Result<Self> {
        config.validate_timeout()?;
        let peer_filter = config.peer_filter()?;
        let addr = SocketAddr::new(config.bind, config.port);

        let listener = TcpListener::bind(addr).map_err(|source| LanCopyError::Listen {
            addr: addr.to_string(),
            source,
        })?;
        let port = listener.local_addr().map(|a| a.port()).unwrap_or(config.port);

        if config.listen_all {
            tracing::info!("Listening on all interfaces at port {}", port);
        } else if let Some(filter) = peer_filter {
            tracing::info!("Listening on port {}, will accept connections only from {}", port, filter);
        } else {
            tracing::info!("Listening on port {}, will accept connections from any IP", port);
        }

        Ok(Self {
            listener,
            config: config.clone(),
            peer_filter,
        })
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Wait up to the configured timeout for one inbound connection
    pub fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        tracing::info!("Waiting for connection (timeout: {}s)...", self.config.timeout_secs);

        self.listener
            .set_nonblocking(true)
            .map_err(|source| LanCopyError::Accept { source })?;

        let deadline = deadline_after(self.config.timeout());
        loop {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    // Some platforms hand out non-blocking sockets from a non-blocking listener
                    stream
                        .set_nonblocking(false)
                        .map_err(|source| LanCopyError::Accept { source })?;
                    return Ok((stream, addr));
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(LanCopyError::AcceptTimeout(self.config.timeout_secs));
                    }
                    thread::sleep(ACCEPT_POLL.min(deadline - now));
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                Err(source) => return Err(LanCopyError::Accept { source }),
            }
        }
    }

    /// Accept one connection and write everything it sends to the destination
    ///
    /// A peer other than the configured filter is dropped and reported as
    /// [`SessionOutcome::Rejected`]; the listener does not wait for another.
    pub fn receive(self) -> Result<SessionOutcome> {
        let (stream, peer) = self.accept()?;

        if let Some(expected) = self.peer_filter {
            if peer.ip().to_canonical() != expected.to_canonical() {
                tracing::warn!("✗ Rejected connection from {} (expected {})", peer.ip(), expected);
                return Ok(SessionOutcome::Rejected { peer, expected });
            }
        }

        tracing::info!("✓ Connection established from {}", peer.ip());
        drop(self.listener);

        let mut conn = DeadlineStream::new(stream, self.config.transfer_deadline());
        let report = receive_over(&mut conn, &self.config, peer)?;

        Ok(SessionOutcome::Received(report))
    }
}

/// Save the incoming byte stream to `config.path`
fn receive_over(conn: &mut DeadlineStream, config: &TransferConfig, peer: SocketAddr) -> Result<TransferReport> {
    let path = config.path.as_path();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_path(parent)?;
    }
    let mut file = File::create(path).with_path(path)?;

    tracing::info!("Receiving file...");

    let mut sink = config.progress.then(|| stdout_sink("Receiving", None));
    let progress = sink.as_mut().map(|s| &mut **s as &mut dyn ProgressSink);

    let start = Instant::now();
    let received = StreamCopier::new()
        .copy(conn, &mut file, None, progress)
        .map_err(|source| LanCopyError::Transfer { source })?;
    let elapsed = start.elapsed();
    drop(file);

    let report = TransferReport::new(Role::Receive, path, Some(peer), received, elapsed);
    tracing::debug!("{}", report.summary_line());

    let checksum = if config.verify {
        tracing::info!("Calculating checksum for verification...");
        match hash_file(path, config.hash) {
            Ok(checksum) => {
                tracing::info!("✓ File checksum: {}", checksum.hash);
                tracing::info!("Note: Compare with sender's checksum to verify integrity");
                Some(checksum)
            }
            Err(e) => {
                tracing::warn!("⚠ Could not calculate checksum: {}", e);
                None
            }
        }
    } else {
        None
    };

    Ok(report.with_checksum(checksum))
}

/// Bind, accept one connection, and save the file
pub fn receive_file(config: &TransferConfig) -> Result<SessionOutcome> {
    Receiver::bind(config)?.receive()
}
