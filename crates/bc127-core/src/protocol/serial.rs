//! Serial transport adapter
//!
//! Wraps a [`serialport::SerialPort`] behind the [`Transport`] trait.
//! Reads poll `bytes_to_read` first so the engine's exchange loops never
//! block inside the port driver.

use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::Duration;

use super::Transport;

/// Baud rate the module ships with.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Port-level read timeout. Short on purpose; the engine's own deadlines do
/// the real waiting.
const PORT_TIMEOUT: Duration = Duration::from_millis(100);

/// [`Transport`] implementation over a serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Wrap an already opened and configured port.
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Access the underlying port, e.g. to change its speed after a
    /// successful `SET BAUD`.
    pub fn port_mut(&mut self) -> &mut dyn SerialPort {
        self.port.as_mut()
    }
}

impl Transport for SerialTransport {
    fn try_read_byte(&mut self) -> io::Result<Option<u8>> {
        let available = self.port.bytes_to_read().map_err(to_io)?;
        if available == 0 {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(ref e)
                if e.kind() == io::ErrorKind::TimedOut
                    || e.kind() == io::ErrorKind::WouldBlock =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

/// Open a port at `baud_rate`, apply 8N1/no-flow-control, and clear both
/// buffers.
pub fn open_port(name: &str, baud_rate: u32) -> io::Result<SerialTransport> {
    let mut port = serialport::new(name, baud_rate)
        .timeout(PORT_TIMEOUT)
        .open()
        .map_err(to_io)?;
    configure_port(port.as_mut())?;
    clear_buffers(port.as_mut())?;
    Ok(SerialTransport::new(port))
}

/// Standard 8N1 configuration with flow control off.
pub fn configure_port(port: &mut dyn SerialPort) -> io::Result<()> {
    port.set_data_bits(serialport::DataBits::Eight).map_err(to_io)?;
    port.set_parity(serialport::Parity::None).map_err(to_io)?;
    port.set_stop_bits(serialport::StopBits::One).map_err(to_io)?;
    port.set_flow_control(serialport::FlowControl::None)
        .map_err(to_io)?;
    Ok(())
}

/// Clear both serial buffers.
pub fn clear_buffers(port: &mut dyn SerialPort) -> io::Result<()> {
    port.clear(serialport::ClearBuffer::All).map_err(to_io)
}

fn to_io(e: serialport::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
