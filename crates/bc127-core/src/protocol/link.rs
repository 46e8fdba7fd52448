//! Connection management
//!
//! The `OPEN` handshake and the best-effort `STATUS` poll. `OPEN` speaks a
//! richer vocabulary than other commands so callers can tell "no such
//! device" from "remote refused" and react differently to each.

use tracing::warn;

use super::classify::ResponseRules;
use super::commands::ConnectionType;
use super::deadline::Deadline;
use super::device::Bc127;
use super::error::Bc127Error;
use super::line::LineAccumulator;
use super::transport::Transport;
use super::{CONNECT_TIMEOUT, STATUS_TIMEOUT};

impl<T: Transport> Bc127<T> {
    /// Open a connection to `address` with the given profile.
    ///
    /// The address must be exactly 12 characters (uppercase hex); anything
    /// else fails before a byte is written. Intermediate `PAIR_OK` lines do
    /// not end the exchange; only `OPEN_OK` does.
    pub fn connect(&mut self, address: &str, link: ConnectionType) -> Result<(), Bc127Error> {
        if address.len() != 12 {
            return Err(Bc127Error::InvalidParam(format!(
                "address {:?} is not 12 hex digits",
                address
            )));
        }
        let command = format!("OPEN {} {}", address, link.token());
        self.exchange(&command, &ResponseRules::open_link(), CONNECT_TIMEOUT)
            .map(drop)
    }

    /// Open a connection to a device stored by the most recent scan.
    ///
    /// The index is validated against the current discovered count before
    /// any transport activity.
    pub fn connect_index(&mut self, index: usize, link: ConnectionType) -> Result<(), Bc127Error> {
        let address = self.discovered_address(index)?.to_string();
        self.connect(&address, link)
    }

    /// Best-effort poll of the module's connection state.
    ///
    /// `Ok(())` means a `STATE ... CONNECTED` line was seen,
    /// `Err(ConnectFailed)` a `STATE` line without it, and `Err(Timeout)`
    /// nothing conclusive. The 500 ms window is deliberately short: with
    /// several active links the module's status burst can overrun the
    /// receive buffer, so whatever lines survive are classified as-is and
    /// any residue is drained before returning on the deadline path. The
    /// verdict reads a fixed offset inside the `STATE` line and is fragile
    /// across firmware revisions; treat it as advisory, not authoritative.
    pub fn connection_state(&mut self) -> Result<(), Bc127Error> {
        self.known_start()?;
        self.send_line("STATUS")?;

        let mut verdict = Err(Bc127Error::Timeout);
        let mut acc = LineAccumulator::new();
        let deadline = Deadline::starting_at(self.transport.now(), STATUS_TIMEOUT);

        while let Some(line) = self.read_line(&mut acc, deadline)? {
            if line.starts_with("ST") {
                // "STATE CONNECTED" carries "ED" at bytes 13..15.
                verdict = if line.get(13..15) == Some("ED") {
                    Ok(())
                } else {
                    Err(Bc127Error::ConnectFailed)
                };
            } else if line.starts_with("OK") {
                // Whole status burst fit the buffer; no purge needed.
                return verdict;
            }
        }

        let drained = self.drain()?;
        if drained > 0 {
            warn!(drained, "status poll dropped unread bytes");
        }
        verdict
    }
}
