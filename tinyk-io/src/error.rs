//! Error types for the TinyK protocol layer

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// TinyK protocol and transport errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes than a full frame arrived
    #[error("Short frame: expected {expected} bytes, got {actual}")]
    ShortFrame {
        /// Frame size in bytes
        expected: usize,
        /// Bytes actually read
        actual: usize,
    },

    /// Last byte of a frame was not the terminator
    #[error("Missing terminator: last byte was {0:#04x}")]
    MissingTerminator(u8),

    /// A wire code could not be mapped to its enum
    #[error("Unknown {field} code: {value}")]
    UnknownCode {
        /// Name of the decoded field
        field: &'static str,
        /// Raw wire value
        value: u16,
    },

    /// Command argument does not fit into a u16
    #[error("Argument {0} does not fit into a 16-bit frame field")]
    ArgumentOverflow(u32),

    /// Resend budget exhausted or nothing to resend
    #[error("Protocol exhausted: {0}")]
    ProtocolExhausted(String),

    /// A replayed exchange did not start with an ack
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// True for errors caused by a malformed or missing frame.
    ///
    /// These are recovered by resending the last command.
    pub fn is_malformed_frame(&self) -> bool {
        matches!(
            self,
            Error::ShortFrame { .. } | Error::MissingTerminator(_) | Error::UnknownCode { .. }
        )
    }
}
