// cone2-rs/cone2/src/error.rs

use thiserror::Error;

use crate::types::Status;

/// Errors raised by the reader layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("initialization failed: {0}")]
    Init(#[from] InitError),

    #[error("hardware session is not initialized")]
    NotInitialized,

    #[error("no vendor SDK handle was provided")]
    SdkUnavailable,

    /// The operation needs an activated protocol that is absent, or a
    /// deactivation names a protocol that is not the active one.
    #[error("protocol state error: {0}")]
    ProtocolState(String),

    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// Non-Ok status from a hardware exchange, or a response shorter than
    /// the minimum valid APDU answer.
    #[error("reader i/o error: {0}")]
    ReaderIo(String),
}

/// Failures while bringing up the hardware session. All of them are fatal
/// to the session and never retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("peripheral power-up did not complete within {timeout_ms} ms")]
    PowerUpTimeout { timeout_ms: u64 },

    #[error("peripheral power-up reported a failure")]
    PowerUpFailed,

    #[error("serial port open failed: {status}")]
    PortOpenFailed { status: Status },

    #[error("session was torn down and cannot be initialized again")]
    SessionDestroyed,
}

impl Error {
    /// Build a `ReaderIo` error for a vendor call that did not report Ok.
    pub(crate) fn status(operation: &str, status: Status) -> Self {
        Error::ReaderIo(format!("{operation} failed: {status}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
