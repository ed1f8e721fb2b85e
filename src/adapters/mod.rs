//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to                        |
//! |---------------|-------------|------------------------------------|
//! | `hardware`    | SensorPort  | ESP32 ADC, GPIO, MPU-6050 over I²C |
//! | `serial_sink` | EventSink   | JSON lines on the orchestrator UART|
//! | `time`        | TimePort    | ESP32 system timer                 |
//! | `uart`        | Transport   | UART0 (orchestrator), UART2 (modem)|
//! | `ws2812`      | StripPort   | WS2812B strip via RMT              |

pub mod hardware;
pub mod serial_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
pub mod ws2812;
