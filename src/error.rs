//! Error types for the relay.

use thiserror::Error;

/// Result type alias for sketchyrelay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running the relay.
///
/// Delivery failures on the helper socket are not represented here: they are
/// an expected condition and never leave the send primitive.
#[derive(Debug, Error)]
pub enum Error {
    /// No helper socket path could be derived from the environment.
    #[error("cannot resolve helper socket path: {0}")]
    SocketPathUnresolved(String),

    /// Observer is already running.
    #[error("observer is already running")]
    AlreadyRunning,

    /// Observer is not running.
    #[error("observer is not running")]
    NotRunning,

    /// Failed to register notification subscriptions.
    #[error("failed to start observer: {0}")]
    ObserverStartFailed(String),

    /// Text outside the message vocabulary.
    #[error("unknown message: {0:?}")]
    UnknownMessage(String),

    /// Thread-related error.
    #[error("thread error: {0}")]
    ThreadError(String),

    /// The requested feature is not supported on this platform.
    #[error("not supported: {0}")]
    NotSupported(String),
}
