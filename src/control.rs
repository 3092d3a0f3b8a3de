//! Control endpoint: a Unix stream socket accepting one command per connection.
//!
//! Clients connect, write a single command line (see [`crate::command`]) and
//! disconnect. Nothing is written back. Each connection is handled on its own
//! task and its decoded command is pushed onto the shared command queue, so
//! slow or misbehaving clients never hold up the render loop or each other.
//!
//! # Endpoint Lifecycle
//!
//! - **Bind**: an existing socket file with no listener behind it (left over
//!   from a crash) is removed first. A live listener or a non-socket file at
//!   the path is a startup error.
//! - **Permissions**: the socket is made world read/writable so unprivileged
//!   local tools can push text.
//! - **Clients**: a connection that sends no complete line within
//!   [`COMMAND_READ_TIMEOUT`] is closed.
//! - **Shutdown**: dropping the [`ControlServer`] removes the socket file.

use std::fs;
use std::io;
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

use crate::command::{CommandSender, decode};
use crate::config::{COMMAND_READ_TIMEOUT, MAX_COMMAND_BYTES};
use crate::error::ControlError;

/// Socket file mode: anyone on the host may send commands.
const SOCKET_MODE: u32 = 0o777;

/// Listening control socket. Removes its socket file when dropped.
#[derive(Debug)]
pub struct ControlServer {
    listener: UnixListener,
    path: PathBuf,
    read_timeout: Duration,
}

impl ControlServer {
    /// Bind the control socket at `path`.
    ///
    /// Must be called from within a Tokio runtime context.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self, ControlError> {
        let path = path.into();
        clear_stale_socket(&path)?;

        let listener = UnixListener::bind(&path).map_err(|source| ControlError::Bind { path: path.clone(), source })?;
        // Constructed before chmod so the socket file is removed if it fails
        let server = Self { listener, path, read_timeout: COMMAND_READ_TIMEOUT };
        fs::set_permissions(&server.path, fs::Permissions::from_mode(SOCKET_MODE))
            .map_err(|source| ControlError::Permissions { path: server.path.clone(), source })?;

        info!(path = %server.path.display(), "Control socket listening");
        Ok(server)
    }

    /// Close connections that have not sent a full line after `timeout`.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept connections until the command queue's receiver is dropped.
    ///
    /// Accept errors are logged and do not stop the server.
    pub async fn serve(&self, queue: CommandSender) {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _)) => {
                        let queue = queue.clone();
                        tokio::spawn(handle_connection(stream, queue, self.read_timeout));
                    }
                    Err(e) => warn!(error = %e, "Control socket accept error"),
                },
                () = queue.closed() => {
                    debug!("Command queue closed, no longer accepting connections");
                    return;
                }
            }
        }
    }
}

impl Drop for ControlServer {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed control socket"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove control socket"),
        }
    }
}

/// Make `path` free for binding, removing a dead socket if one is there.
fn clear_stale_socket(path: &Path) -> Result<(), ControlError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => return Err(ControlError::Bind { path: path.to_path_buf(), source }),
    };
    if !metadata.file_type().is_socket() {
        return Err(ControlError::NotASocket(path.to_path_buf()));
    }
    if std::os::unix::net::UnixStream::connect(path).is_ok() {
        return Err(ControlError::AddressInUse(path.to_path_buf()));
    }

    warn!(path = %path.display(), "Removing stale control socket");
    fs::remove_file(path).map_err(|source| ControlError::RemoveStale { path: path.to_path_buf(), source })
}

/// Read one command line from a client and queue it.
async fn handle_connection(stream: UnixStream, queue: CommandSender, read_timeout: Duration) {
    let mut reader = BufReader::new(stream.take(MAX_COMMAND_BYTES));
    let mut line = String::new();

    let Ok(read) = tokio::time::timeout(read_timeout, reader.read_line(&mut line)).await else {
        debug!(timeout_ms = read_timeout.as_millis() as u64, "Client sent no command in time, closing");
        return;
    };
    match read {
        Ok(0) => debug!("Client disconnected without a command"),
        Ok(n) if n as u64 >= MAX_COMMAND_BYTES && !line.ends_with('\n') => {
            debug!(limit = MAX_COMMAND_BYTES, "Dropping oversized command line");
        }
        Ok(_) => {
            let Some(command) = decode(&line) else {
                return;
            };
            debug!(?command, "Received command");
            if queue.send(command).is_err() {
                debug!("Render loop stopped, command discarded");
            }
        }
        Err(e) => debug!(error = %e, "Failed to read command"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
