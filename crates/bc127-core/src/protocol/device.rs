//! Device engine
//!
//! Owns the transport and implements the command/response exchanges. One
//! engine instance per channel: the protocol has no request identifiers, so
//! responses correlate to the single outstanding command by position alone.
//! Callers that need shared access must serialize around the whole
//! instance.

use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use super::classify::{Classification, ResponseRules};
use super::commands::{AudioCommand, BaudRate, BleRole, ClassicRole};
use super::deadline::Deadline;
use super::error::Bc127Error;
use super::line::LineAccumulator;
use super::transport::Transport;
use super::{
    COMMAND_TIMEOUT, DATA_MODE_GUARD, ESCAPE_TIMEOUT, MAX_DISCOVERED, PARAM_TIMEOUT,
    POLL_INTERVAL, RESET_TIMEOUT, RESYNC_TIMEOUT,
};

/// Protocol engine for one BC127 module.
pub struct Bc127<T: Transport> {
    pub(crate) transport: T,
    pub(crate) addresses: Vec<String>,
}

impl<T: Transport> Bc127<T> {
    /// Bind the engine to a byte channel.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            addresses: Vec::with_capacity(MAX_DISCOVERED),
        }
    }

    /// Mutable access to the underlying transport. Needed to pass payload
    /// through while the module sits in transparent data mode.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the underlying transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Poll the transport until one complete line arrives or the deadline
    /// expires. `Ok(None)` is deadline expiry, not an error; callers decide
    /// what expiry means for their operation.
    pub(crate) fn read_line(
        &mut self,
        acc: &mut LineAccumulator,
        deadline: Deadline,
    ) -> Result<Option<String>, Bc127Error> {
        while !deadline.expired(self.transport.now()) {
            match self.transport.try_read_byte()? {
                Some(byte) => {
                    if let Some(line) = acc.feed(byte) {
                        trace!(line = %line, "rx");
                        return Ok(Some(line));
                    }
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
        Ok(None)
    }

    /// Force the channel to a line boundary before a new exchange.
    ///
    /// Writes a bare terminator and discards everything up to the next
    /// complete line, whatever it classifies as; an error line still means
    /// the channel is at a boundary. The 1 s bound is an inactivity
    /// deadline, re-armed whenever a byte arrives.
    pub(crate) fn known_start(&mut self) -> Result<(), Bc127Error> {
        self.transport.write_all(b"\r")?;
        self.transport.flush()?;

        let mut acc = LineAccumulator::new();
        let mut deadline = Deadline::starting_at(self.transport.now(), RESYNC_TIMEOUT);
        loop {
            if deadline.expired(self.transport.now()) {
                debug!("resync timed out");
                return Err(Bc127Error::ResyncTimeout);
            }
            match self.transport.try_read_byte()? {
                Some(byte) => {
                    deadline = Deadline::starting_at(self.transport.now(), RESYNC_TIMEOUT);
                    if acc.feed(byte).is_some() {
                        return Ok(());
                    }
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }

    /// Write one command line, terminated by `\r`.
    pub(crate) fn send_line(&mut self, command: &str) -> Result<(), Bc127Error> {
        debug!(command, "tx");
        self.transport.write_all(command.as_bytes())?;
        self.transport.write_all(b"\r")?;
        self.transport.flush()?;
        Ok(())
    }

    /// Read and classify lines until a terminal outcome or `timeout`.
    ///
    /// A captured value line does not end the exchange; the terminal line
    /// is authoritative and the last captured value rides along with it.
    fn await_terminal(
        &mut self,
        rules: &ResponseRules,
        timeout: Duration,
    ) -> Result<Option<String>, Bc127Error> {
        let mut acc = LineAccumulator::new();
        let mut value = None;
        let deadline = Deadline::starting_at(self.transport.now(), timeout);

        while let Some(line) = self.read_line(&mut acc, deadline)? {
            match rules.classify(&line) {
                Classification::Success => return Ok(value),
                Classification::ModuleError => return Err(Bc127Error::Module),
                Classification::ConnectError => return Err(Bc127Error::ConnectFailed),
                Classification::RemoteError => return Err(Bc127Error::RemoteRefused),
                Classification::Value(v) => value = Some(v),
                Classification::Continue => {}
            }
        }
        Err(Bc127Error::Timeout)
    }

    /// Resync, send, and classify one full exchange.
    pub(crate) fn exchange(
        &mut self,
        command: &str,
        rules: &ResponseRules,
        timeout: Duration,
    ) -> Result<Option<String>, Bc127Error> {
        self.known_start()?;
        self.send_line(command)?;
        self.await_terminal(rules, timeout)
    }

    /// Discard any bytes sitting unread in the transport, returning how
    /// many were dropped.
    pub(crate) fn drain(&mut self) -> Result<usize, Bc127Error> {
        let mut drained = 0;
        while self.transport.try_read_byte()?.is_some() {
            drained += 1;
        }
        Ok(drained)
    }

    // ---- canonical request shapes --------------------------------------

    /// Fire-and-confirm: send `command` bare, await `OK` or `ERROR` within
    /// 3 s.
    pub fn std_cmd(&mut self, command: &str) -> Result<(), Bc127Error> {
        self.exchange(command, &ResponseRules::command(), COMMAND_TIMEOUT)
            .map(drop)
    }

    /// Set a named parameter: `SET <name>=<value>`, 2 s deadline.
    pub fn std_set_param(&mut self, name: &str, value: &str) -> Result<(), Bc127Error> {
        let command = format!("SET {}={}", name, value);
        self.exchange(&command, &ResponseRules::command(), PARAM_TIMEOUT)
            .map(drop)
    }

    /// Get a named parameter: `GET <name>`, 2 s deadline.
    ///
    /// The module may answer with a value line echoing the name before the
    /// terminal status. `Ok(None)`, a terminal `OK` with no value line, is
    /// a legal empty result.
    pub fn std_get_param(&mut self, name: &str) -> Result<Option<String>, Bc127Error> {
        let command = format!("GET {}", name);
        self.exchange(&command, &ResponseRules::get_param(name), PARAM_TIMEOUT)
    }

    // ---- module management ---------------------------------------------

    /// Reboot the module and wait for the `Ready` boot banner.
    pub fn reset(&mut self) -> Result<(), Bc127Error> {
        self.exchange("RESET", &ResponseRules::boot_banner(), RESET_TIMEOUT)
            .map(drop)
    }

    /// Restore factory default settings.
    pub fn restore(&mut self) -> Result<(), Bc127Error> {
        self.std_cmd("RESTORE")
    }

    /// Persist the current configuration to non-volatile memory.
    pub fn write_config(&mut self) -> Result<(), Bc127Error> {
        self.std_cmd("WRITE")
    }

    /// Query the module's own Bluetooth address.
    pub fn local_address(&mut self) -> Result<Option<String>, Bc127Error> {
        self.std_get_param("LOCAL_ADDR")
    }

    /// Change the module's UART speed.
    ///
    /// The new speed takes effect immediately, so the acknowledgment
    /// usually arrives garbled at the old speed and the exchange reports
    /// [`Bc127Error::Timeout`]. `Ok` here means the requested speed equals
    /// the current one. The engine surfaces the raw outcome; reopening the
    /// channel at the new speed and treating the timeout as presumptive
    /// success is the caller's decision, never this function's.
    pub fn set_baud_rate(&mut self, speed: BaudRate) -> Result<(), Bc127Error> {
        self.std_set_param("BAUD", speed.token())
    }

    // ---- parameter wrappers --------------------------------------------

    /// Select the module's BLE role. Takes effect after [`write_config`]
    /// plus [`reset`].
    ///
    /// [`write_config`]: Bc127::write_config
    /// [`reset`]: Bc127::reset
    pub fn set_ble_role(&mut self, role: BleRole) -> Result<(), Bc127Error> {
        self.std_set_param("BLE_ROLE", role.token())
    }

    /// Turn BLE advertising on or off. The module must be a peripheral for
    /// advertising to work.
    pub fn set_advertising(&mut self, enabled: bool) -> Result<(), Bc127Error> {
        self.std_cmd(if enabled {
            "ADVERTISING ON"
        } else {
            "ADVERTISING OFF"
        })
    }

    /// Select source or sink for classic audio. Takes effect after
    /// [`write_config`] plus [`reset`].
    ///
    /// [`write_config`]: Bc127::write_config
    /// [`reset`]: Bc127::reset
    pub fn set_classic_role(&mut self, role: ClassicRole) -> Result<(), Bc127Error> {
        self.std_set_param("CLASSIC_ROLE", role.token())
    }

    /// Drive the remote playback controls over AVRCP.
    pub fn music_command(&mut self, command: AudioCommand) -> Result<(), Bc127Error> {
        self.std_cmd(command.command())
    }

    // ---- data mode -----------------------------------------------------

    /// Switch the active SPP link into transparent data mode.
    pub fn enter_data_mode(&mut self) -> Result<(), Bc127Error> {
        self.std_cmd("ENTER_DATA")
    }

    /// Leave transparent data mode.
    ///
    /// The module only recognizes the `$$$$` escape after a guard interval
    /// of command-free idle time (`CMD_TO`, 400 ms at factory settings), so
    /// this blocks for `guard` (default [`DATA_MODE_GUARD`]) before writing
    /// the token. No resync and no line terminator: while the link is in
    /// data mode both would be forwarded to the remote device as payload.
    pub fn exit_data_mode(&mut self, guard: Option<Duration>) -> Result<(), Bc127Error> {
        thread::sleep(guard.unwrap_or(DATA_MODE_GUARD));
        debug!("tx escape token");
        self.transport.write_all(b"$$$$")?;
        self.transport.flush()?;
        self.await_terminal(&ResponseRules::escape_ack(), ESCAPE_TIMEOUT)
            .map(drop)
    }
}
