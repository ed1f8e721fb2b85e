//! Orchestrator line protocol and inter-task plumbing.
//!
//! | Module      | Role                                              |
//! |-------------|---------------------------------------------------|
//! | `codec`     | Newline framing with a fixed 512-byte line buffer |
//! | `transport` | Byte-channel trait shared by UART links and mocks |
//! | `channels`  | Bounded queues and signals between tasks          |

pub mod channels;
pub mod codec;
pub mod transport;
