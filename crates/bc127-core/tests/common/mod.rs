#![allow(dead_code)]

//! Scripted transport for engine tests: a canned receive stream, a capture
//! of everything written, and a simulated clock that advances whenever the
//! receive side runs dry so deadline paths finish fast.

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use bc127_core::protocol::Transport;

pub struct MockTransport {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    base: Instant,
    elapsed: Duration,
    idle_step: Duration,
    byte_step: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
            base: Instant::now(),
            elapsed: Duration::ZERO,
            idle_step: Duration::from_millis(25),
            byte_step: Duration::ZERO,
        }
    }

    /// Transport primed with the error line the module emits in response to
    /// the bare terminator the pre-command resync sends.
    pub fn synced() -> Self {
        let mut transport = Self::new();
        transport.push(b"ERROR\n\r");
        transport
    }

    /// Queue bytes on the receive side.
    pub fn push(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Simulated time cost of delivering one byte. Zero by default; set it
    /// to model a module that floods faster than a deadline can drain.
    pub fn set_byte_step(&mut self, step: Duration) {
        self.byte_step = step;
    }

    /// Everything the engine wrote, in order.
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    pub fn sent_str(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }

    /// Bytes still queued on the receive side.
    pub fn rx_remaining(&self) -> usize {
        self.rx.len()
    }
}

impl Transport for MockTransport {
    fn try_read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.rx.pop_front() {
            Some(byte) => {
                self.elapsed += self.byte_step;
                Ok(Some(byte))
            }
            None => {
                self.elapsed += self.idle_step;
                Ok(None)
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.tx.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn now(&self) -> Instant {
        self.base + self.elapsed
    }
}
