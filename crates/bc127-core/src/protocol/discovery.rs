//! Device discovery
//!
//! Classic inquiry and BLE scan are the same bounded state machine with a
//! different command verb, row prefix, and address offset:
//!
//! ```text
//! INQUIRY 20FABB010272 240404 -37db      address at bytes 8..20
//! SCAN 20FABB010272 <BC127> 0A -37dBm    address at bytes 5..17
//! OK
//! ```
//!
//! Rows arrive unsolicited and interleave with the terminal line. The
//! engine collects up to [`MAX_DISCOVERED`] distinct addresses, stopping
//! the whole operation the moment the table fills.

use std::time::Duration;

use tracing::{debug, trace};

use super::classify::{Classification, ResponseRules};
use super::deadline::Deadline;
use super::device::Bc127;
use super::error::Bc127Error;
use super::line::LineAccumulator;
use super::transport::Transport;
use super::{MAX_DISCOVERED, SCAN_UNIT_MS};

/// Shape of one discovery row: recognition prefix and the fixed byte range
/// holding the 12-digit address.
struct DiscoveryRow {
    prefix: &'static str,
    addr_start: usize,
    addr_end: usize,
}

const INQUIRY_ROW: DiscoveryRow = DiscoveryRow {
    prefix: "IN",
    addr_start: 8,
    addr_end: 20,
};

const SCAN_ROW: DiscoveryRow = DiscoveryRow {
    prefix: "SC",
    addr_start: 5,
    addr_end: 17,
};

impl DiscoveryRow {
    /// Address field of `line`, if the line is a well-formed row.
    /// Rows too short to carry the field are treated as noise.
    fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        if !line.starts_with(self.prefix) {
            return None;
        }
        line.get(self.addr_start..self.addr_end)
    }
}

impl<T: Transport> Bc127<T> {
    /// Scan for classic Bluetooth devices.
    ///
    /// `timeout` is the module-side scan window parameter, 1..=48 units of
    /// 1.28 s each; the engine's own deadline runs 1.3 s per unit so the
    /// module always finishes first. Returns the number of distinct
    /// addresses discovered, capped at [`MAX_DISCOVERED`]; zero is a valid,
    /// non-error outcome.
    pub fn inquiry(&mut self, timeout: u8) -> Result<usize, Bc127Error> {
        self.run_discovery("INQUIRY", timeout, &INQUIRY_ROW)
    }

    /// Scan for BLE devices. Same shape and bounds as
    /// [`inquiry`](Bc127::inquiry); only the verb and row layout differ.
    pub fn ble_scan(&mut self, timeout: u8) -> Result<usize, Bc127Error> {
        self.run_discovery("SCAN", timeout, &SCAN_ROW)
    }

    /// Number of addresses stored by the most recent scan.
    pub fn discovered_count(&self) -> usize {
        self.addresses.len()
    }

    /// Address stored at `index` by the most recent scan.
    pub fn discovered_address(&self, index: usize) -> Result<&str, Bc127Error> {
        self.addresses
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                Bc127Error::InvalidParam(format!("no discovered device at index {}", index))
            })
    }

    fn run_discovery(
        &mut self,
        verb: &str,
        timeout: u8,
        row: &DiscoveryRow,
    ) -> Result<usize, Bc127Error> {
        if !(1..=48).contains(&timeout) {
            return Err(Bc127Error::InvalidParam(format!(
                "scan timeout {} outside 1..=48",
                timeout
            )));
        }

        // Each scan starts from an empty table; results never leak across
        // calls.
        self.addresses.clear();

        self.known_start()?;
        self.send_line(&format!("{} {}", verb, timeout))?;

        let rules = ResponseRules::command();
        let mut acc = LineAccumulator::new();
        let deadline = Deadline::starting_at(
            self.transport.now(),
            Duration::from_millis(u64::from(timeout) * SCAN_UNIT_MS),
        );

        while let Some(line) = self.read_line(&mut acc, deadline)? {
            match rules.classify(&line) {
                Classification::Success => {
                    debug!(found = self.addresses.len(), "scan complete");
                    return Ok(self.addresses.len());
                }
                Classification::ModuleError => return Err(Bc127Error::Module),
                Classification::Continue => {
                    if let Some(address) = row.extract(&line) {
                        if !self.addresses.iter().any(|known| known == address) {
                            trace!(address, "discovered");
                            self.addresses.push(address.to_string());
                            if self.addresses.len() == MAX_DISCOVERED {
                                debug!("address table full, ending scan early");
                                return Ok(self.addresses.len());
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        Err(Bc127Error::Timeout)
    }
}
