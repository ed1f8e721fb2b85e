//! Transport abstraction — any byte-oriented channel.
//!
//! Concrete implementations:
//! - UART0 orchestrator link (USB serial bridge)
//! - UART2 cellular module link
//! - In-memory mocks in the integration tests
//!
//! The command task and the modem driver are generic over `Transport`, so
//! swapping the physical link requires zero changes to protocol logic.

use crate::error::LinkError;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Non-blocking read with the link's own error folded into
    /// [`LinkError::ReadFailed`].
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        self.read(buf).map_err(|e| {
            log::debug!("link read: {:?}", e);
            LinkError::ReadFailed
        })
    }

    /// Write all of `data`, retrying short writes. A write that makes no
    /// progress counts as a failure.
    fn write_all(&mut self, mut data: &[u8]) -> Result<(), LinkError> {
        while !data.is_empty() {
            match self.write(data) {
                Ok(0) | Err(_) => return Err(LinkError::WriteFailed),
                Ok(n) => data = &data[n.min(data.len())..],
            }
        }
        self.flush().map_err(|_| LinkError::WriteFailed)
    }
}
