//! Absolute deadline for a blocking TCP stream
//!
//! std sockets only offer per-call timeouts. [`DeadlineStream`] turns them
//! into one absolute instant: before every read or write the socket timeout
//! is set to whatever time is left, and once the instant has passed every
//! operation fails with `TimedOut`.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::{Duration, Instant};

/// TCP stream whose reads and writes share one deadline
#[derive(Debug)]
pub struct DeadlineStream {
    stream: TcpStream,
    deadline: Instant,
}

impl DeadlineStream {
    /// Wrap `stream`; the deadline is `budget` from now
    pub fn new(stream: TcpStream, budget: Duration) -> Self {
        Self::with_deadline(stream, deadline_after(budget))
    }

    /// Wrap `stream` with an explicit deadline
    pub fn with_deadline(stream: TcpStream, deadline: Instant) -> Self {
        Self { stream, deadline }
    }

    /// The instant after which all I/O fails
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Address of the remote peer
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    /// Signal end of file to the peer
    pub fn shutdown_write(&self) -> io::Result<()> {
        self.stream.shutdown(Shutdown::Write)
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> TcpStream {
        self.stream
    }

    fn remaining(&self) -> io::Result<Duration> {
        let now = Instant::now();
        if now >= self.deadline {
            Err(deadline_exceeded())
        } else {
            Ok(self.deadline - now)
        }
    }
}

/// Upper bound for deadlines too far out to represent
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `budget` from now, clamped instead of overflowing `Instant`
pub fn deadline_after(budget: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(budget.min(FAR_FUTURE)).unwrap_or(now)
}

fn deadline_exceeded() -> io::Error {
    io::Error::new(ErrorKind::TimedOut, "transfer deadline exceeded")
}

/// Socket timeouts surface as `WouldBlock` on unix
fn map_timeout(err: io::Error) -> io::Error {
    if err.kind() == ErrorKind::WouldBlock {
        deadline_exceeded()
    } else {
        err
    }
}

impl Read for DeadlineStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining()?;
        self.stream.set_read_timeout(Some(remaining))?;
        self.stream.read(buf).map_err(map_timeout)
    }
}

impl Write for DeadlineStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = self.remaining()?;
        self.stream.set_write_timeout(Some(remaining))?;
        self.stream.write(buf).map_err(map_timeout)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();
        (client, server)
    }

    #[test]
    fn test_expired_deadline_fails_immediately() {
        let (client, _server) = connected_pair();
        let mut stream = DeadlineStream::new(client, Duration::ZERO);

        let err = stream.write(b"late").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);

        let mut buf = [0u8; 4];
        let err = stream.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
    }

    #[test]
    fn test_silent_peer_times_out() {
        let (client, _server) = connected_pair();
        let mut stream = DeadlineStream::new(client, Duration::from_millis(150));

        let start = Instant::now();
        let mut buf = [0u8; 16];
        let err = stream.read(&mut buf).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TimedOut);
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_unbounded_budget_is_clamped() {
        let (client, _server) = connected_pair();
        let stream = DeadlineStream::new(client, Duration::MAX);

        assert!(stream.deadline() > Instant::now() + Duration::from_secs(3600));
        assert!(deadline_after(Duration::MAX) <= Instant::now() + FAR_FUTURE);
    }

    #[test]
    fn test_data_flows_before_deadline() {
        let (client, mut server) = connected_pair();
        let mut stream = DeadlineStream::new(client, Duration::from_secs(10));

        stream.write_all(b"ping").unwrap();
        stream.shutdown_write().unwrap();

        let mut received = Vec::new();
        server.read_to_end(&mut received).unwrap();
        assert_eq!(received, b"ping");
    }
}
