//! UART transport adapter (ESP-IDF only).
//!
//! Wraps a leaked `UartDriver` so the same port can be handed to both the
//! line reader and the JSON sink of the command task, and separately to the
//! modem driver for UART2. Reads never block, so the lock is only ever held
//! for one FIFO copy.

use std::sync::{Mutex, PoisonError};

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::uart::UartDriver;
use esp_idf_svc::sys::EspError;

use crate::protocol::transport::Transport;

/// Copyable handle to a UART that lives for the whole program.
#[derive(Clone, Copy)]
pub struct UartLink {
    uart: &'static Mutex<UartDriver<'static>>,
}

impl UartLink {
    /// Leak `uart` and return a shareable handle to it.
    pub fn leak(uart: UartDriver<'static>) -> Self {
        Self {
            uart: Box::leak(Box::new(Mutex::new(uart))),
        }
    }
}

impl Transport for UartLink {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        let uart = self.uart.lock().unwrap_or_else(PoisonError::into_inner);
        uart.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        let uart = self.uart.lock().unwrap_or_else(PoisonError::into_inner);
        uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        // Transmit FIFO drains on its own.
        Ok(())
    }
}
