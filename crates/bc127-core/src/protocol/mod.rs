//! BC127 "Melody" serial protocol
//!
//! Implements the line-oriented command/response protocol spoken by the
//! BlueCreation BC127 over its UART.
//!
//! The module is not synchronous: commands take variable time to answer,
//! unsolicited discovery rows arrive interleaved with terminal status lines,
//! and a baud-rate change invalidates the very channel that carries its own
//! acknowledgment. Every operation therefore runs as resync + write +
//! classify, polling the transport without blocking until a terminal line
//! or a wall-clock deadline ends the exchange.

pub mod commands;
pub mod serial;

mod classify;
mod deadline;
mod device;
mod discovery;
mod error;
mod line;
mod link;
mod transport;

pub use classify::{Classification, ResponseRules};
pub use commands::{AudioCommand, BaudRate, BleRole, ClassicRole, ConnectionType};
pub use deadline::Deadline;
pub use device::Bc127;
pub use error::Bc127Error;
pub use line::{LineAccumulator, EOL};
pub use serial::{open_port, SerialTransport, DEFAULT_BAUD_RATE};
pub use transport::Transport;

use std::time::Duration;

/// Deadline for fire-and-confirm commands.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(3);

/// Deadline for `SET`/`GET` parameter exchanges.
pub const PARAM_TIMEOUT: Duration = Duration::from_secs(2);

/// Deadline for the `Ready` banner after `RESET`.
pub const RESET_TIMEOUT: Duration = Duration::from_secs(2);

/// Deadline for the `OPEN` connect handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for the best-effort `STATUS` poll.
pub const STATUS_TIMEOUT: Duration = Duration::from_millis(500);

/// Deadline for the `OK` acknowledging the data-mode escape.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_secs(2);

/// Inactivity bound on the pre-command resync.
pub const RESYNC_TIMEOUT: Duration = Duration::from_secs(1);

/// Idle period the module requires before the data-mode escape token
/// (`CMD_TO` at factory settings, plus margin).
pub const DATA_MODE_GUARD: Duration = Duration::from_millis(420);

/// Engine-side scan deadline in milliseconds per unit of the module's
/// timeout parameter. The module's own window is 1.28 s per unit; 1.3 s
/// keeps the engine listening slightly past it.
pub const SCAN_UNIT_MS: u64 = 1300;

/// Capacity of the discovered-address table.
pub const MAX_DISCOVERED: usize = 5;

/// Sleep between empty transport polls.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(1);
