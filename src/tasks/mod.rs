//! Task loops — one per pinned firmware thread.
//!
//! | Task       | Core | Prio | Period / idle | Owns                          |
//! |------------|------|------|---------------|-------------------------------|
//! | `sampling` | 0    | 2    | 20 ms grid    | ADC, flame GPIO, I²C bus      |
//! | `command`  | 0    | 3    | 10 ms idle    | UART0 line buffer, JSON sink  |
//! | `actuator` | 1    | 1    | pattern hold  | LED frame, RMT strip driver   |
//! | `modem`    | 1    | 1    | 50 ms idle    | UART2 cellular link           |
//!
//! Each task exposes a single-iteration method (`step` / `poll`) that the
//! integration tests drive directly, plus a `run` loop used by the firmware.

pub mod actuator;
pub mod command;
pub mod modem;
pub mod sampling;
