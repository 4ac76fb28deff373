//! TinyK-IO - Serial protocol library for the stair climbing drive
//!
//! This library frames commands for the TinyK drive controller, decodes its
//! responses and keeps a session alive over an unreliable half-duplex link.
//!
//! ## Layers
//!
//! - [`transport`]: byte movement over a serial port, or an in-memory mock
//! - [`protocol`]: 7-byte frame codec and wire enums
//! - [`TinyK`]: sequence numbers and resend of malformed exchanges

mod error;
pub mod protocol;
mod tinyk;
pub mod transport;

// Re-export commonly used types
pub use error::{Error, Result};
pub use protocol::{
    CommandError, CommandType, ResponsePayload, ResponseType, RobotPosition, TinyKCommand,
    TinyKResponse,
};
pub use tinyk::TinyK;
pub use transport::{MockTransport, SerialConfig, SerialTransport, Transport};
