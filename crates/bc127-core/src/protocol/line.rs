//! Line accumulation
//!
//! Response lines from the module end in `\n\r`, reversed from the
//! conventional `\r\n`. A line is complete only once the buffer's tail
//! matches that exact two-byte sequence.

/// Response line terminator sent by the module.
pub const EOL: &[u8; 2] = b"\n\r";

/// Accumulates received bytes until a complete line is seen.
///
/// Pure, no I/O. Imposes no bound of its own on line length; the caller's
/// deadline bounds growth when the module streams bytes without ever
/// emitting the terminator.
#[derive(Debug, Default)]
pub struct LineAccumulator {
    buf: Vec<u8>,
}

impl LineAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one byte, returning the completed line (terminator stripped)
    /// once the buffer's tail matches [`EOL`].
    ///
    /// Decoding is lossy: bytes received at a mismatched baud rate must
    /// classify as garbage, not abort the exchange.
    pub fn feed(&mut self, byte: u8) -> Option<String> {
        self.buf.push(byte);
        if !self.buf.ends_with(EOL) {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buf[..self.buf.len() - EOL.len()]).into_owned();
        self.buf.clear();
        Some(line)
    }

    /// Discard any partially accumulated bytes.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Number of bytes buffered since the last completed line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
