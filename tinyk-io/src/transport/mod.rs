//! Transport layer for I/O abstraction
//!
//! The TinyK link is half-duplex: a frame is sent, then the peer answers.
//! Implementations only move bytes; framing and resend live in [`crate::TinyK`].

use crate::error::Result;

mod mock;
mod serial;

pub use mock::{completed_exchange, failed_exchange, MockTransport, Responder};
pub use serial::{SerialConfig, SerialTransport};

/// Transport trait for device communication
pub trait Transport: Send {
    /// Send a complete buffer
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `size` bytes.
    ///
    /// May return fewer bytes than requested when the peer stays silent
    /// (read timeout) or the link drops; the caller decides what a short
    /// read means.
    fn read(&mut self, size: usize) -> Result<Vec<u8>>;

    /// Tear the link down and open it again
    fn reconnect(&mut self) -> Result<()>;

    /// Check if data is waiting to be read
    fn has_data(&mut self) -> Result<bool> {
        Ok(false)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn read(&mut self, size: usize) -> Result<Vec<u8>> {
        (**self).read(size)
    }

    fn reconnect(&mut self) -> Result<()> {
        (**self).reconnect()
    }

    fn has_data(&mut self) -> Result<bool> {
        (**self).has_data()
    }
}
