//! Protocol errors

use thiserror::Error;

/// Errors that can occur while talking to the module.
///
/// The engine never retries on its own; every variant is surfaced
/// undecorated so retry policy stays with the caller.
#[derive(Error, Debug)]
pub enum Bc127Error {
    /// No terminal response line arrived within the operation's deadline.
    #[error("no terminal response within the deadline")]
    Timeout,

    /// The pre-command resync could not reach a line boundary; the channel
    /// is desynchronized and the operation was aborted before sending.
    #[error("resync timed out, channel left unsynchronized")]
    ResyncTimeout,

    /// The module rejected the command (syntax or state).
    #[error("module rejected the command")]
    Module,

    /// A caller-side precondition failed; nothing was written to the
    /// transport.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// `OPEN_ERROR`: no device answered at the requested address.
    #[error("open failed: no device at the requested address")]
    ConnectFailed,

    /// `PAIR_ERROR`: the remote device refused the connection.
    #[error("pairing refused by the remote device")]
    RemoteRefused,

    /// The transport itself failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Bc127Error {
    /// True for [`Bc127Error::Timeout`]. Useful for callers that treat a
    /// baud-change timeout as presumptive success.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Bc127Error::Timeout)
    }
}
