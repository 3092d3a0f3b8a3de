//! Error types for the status panel.
//!
//! Per-tick faults ([`SensorError`], malformed commands) are absorbed by the
//! render loop and the control server. Everything else is structural and
//! bubbles up to `main` through [`ServiceError`], ending the process.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reading a per-device sensor file failed.
#[derive(Debug, Error)]
pub enum SensorError {
    /// The sensor file is missing or unreadable.
    #[error("failed to read sensor {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The sensor file did not contain an integer.
    #[error("unexpected value {value:?} in sensor {}", path.display())]
    Parse { path: PathBuf, value: String },

    /// No `hwmon*` directory exists for a card.
    #[error("no hwmon directory under {}", .0.display())]
    MissingHwmon(PathBuf),
}

/// Loading an image asset failed.
#[derive(Debug, Error)]
#[error("failed to load image {}: {source}", path.display())]
pub struct AssetError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

/// The display panel could not be driven.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("failed to open panel device {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write frame to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The preview window was closed by the user.
    #[error("preview window closed")]
    WindowClosed,
}

/// The control endpoint could not be set up.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Another process is already listening on the socket.
    #[error("control socket {} is already in use", .0.display())]
    AddressInUse(PathBuf),

    /// Something other than a socket occupies the path.
    #[error("refusing to replace non-socket file {}", .0.display())]
    NotASocket(PathBuf),

    #[error("failed to remove stale control socket {}: {source}", path.display())]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind control socket {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to set permissions on control socket {}: {source}", path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fatal errors that terminate the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Panel(#[from] PanelError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),

    #[error("failed to spawn render thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("render thread panicked")]
    RenderPanicked,

    /// The preview window backend was requested but not compiled in.
    #[error("preview window support requires building with the `window` feature")]
    WindowUnavailable,
}
