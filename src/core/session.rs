//! Session dispatch: run the sender or the receiver for a config

use crate::config::{Role, TransferConfig};
use crate::core::SessionOutcome;
use crate::error::Result;
use crate::network::{receive_file, send_file};

/// Run one transfer session to completion
pub fn run_session(config: &TransferConfig) -> Result<SessionOutcome> {
    tracing::debug!(role = %config.role, path = %config.path.display(), "Starting session");

    match config.role {
        Role::Send => send_file(config).map(SessionOutcome::Sent),
        Role::Receive => receive_file(config),
    }
}
