//! Incoming response frames

use super::{CommandError, CommandType, ResponseType, END_OF_MESSAGE, FRAME_SIZE};
use crate::error::{Error, Result};

/// Decoded payload of a response frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePayload {
    /// Echo of the command an `ack`/`completed` refers to
    Command(CommandType),
    /// Reason of a `failed` response
    Error(CommandError),
}

/// A response frame from the drive controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TinyKResponse {
    pub response_type: ResponseType,
    pub payload: ResponsePayload,
    pub error_value: u16,
}

impl TinyKResponse {
    /// Decode a frame.
    ///
    /// Fails on short frames, a missing terminator or codes that map to no
    /// enum variant, all of which count as malformed.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() < FRAME_SIZE {
            return Err(Error::ShortFrame {
                expected: FRAME_SIZE,
                actual: frame.len(),
            });
        }
        let last = frame[FRAME_SIZE - 1];
        if last != END_OF_MESSAGE {
            return Err(Error::MissingTerminator(last));
        }

        let field = |i: usize| u16::from_be_bytes([frame[i], frame[i + 1]]);
        let response_type = ResponseType::try_from(field(0))?;
        let payload = match response_type {
            ResponseType::Ack | ResponseType::Completed => {
                ResponsePayload::Command(CommandType::try_from(field(2))?)
            }
            ResponseType::Failed => ResponsePayload::Error(CommandError::try_from(field(2))?),
        };

        Ok(Self {
            response_type,
            payload,
            error_value: field(4),
        })
    }

    pub fn is_ack(&self) -> bool {
        self.response_type == ResponseType::Ack
    }

    /// Command type carried by `ack`/`completed`
    pub fn command_type(&self) -> Option<CommandType> {
        match self.payload {
            ResponsePayload::Command(command_type) => Some(command_type),
            ResponsePayload::Error(_) => None,
        }
    }

    /// Error carried by `failed`
    pub fn error(&self) -> Option<CommandError> {
        match self.payload {
            ResponsePayload::Error(error) => Some(error),
            ResponsePayload::Command(_) => None,
        }
    }

    /// Raw payload field as sent on the wire
    pub fn raw_payload(&self) -> u16 {
        match self.payload {
            ResponsePayload::Command(command_type) => command_type.into(),
            ResponsePayload::Error(error) => error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failed_obstacle_right() {
        let response = TinyKResponse::decode(&[0x00, 0x02, 0x00, 0x03, 0x00, 0x05, 0xFF]).unwrap();
        assert_eq!(response.response_type, ResponseType::Failed);
        assert_eq!(response.error(), Some(CommandError::ObstacleDetectedRight));
        assert_eq!(response.error_value, 5);
        assert_eq!(response.raw_payload(), 3);
    }

    #[test]
    fn test_decode_ack_climb() {
        let response = TinyKResponse::decode(&[0x00, 0x01, 0x00, 0x0A, 0x00, 0x00, 0xFF]).unwrap();
        assert!(response.is_ack());
        assert_eq!(response.command_type(), Some(CommandType::Climb));
        assert_eq!(response.error(), None);
    }

    #[test]
    fn test_decode_short_frame() {
        let err = TinyKResponse::decode(&[0x00, 0x01, 0x00, 0x0A, 0x00, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortFrame {
                expected: 7,
                actual: 6
            }
        ));
        assert!(err.is_malformed_frame());
    }

    #[test]
    fn test_decode_missing_terminator() {
        let err = TinyKResponse::decode(&[0x00, 0x01, 0x00, 0x0A, 0x00, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, Error::MissingTerminator(0x00)));
    }

    #[test]
    fn test_decode_unknown_payload() {
        // failed with a command error that does not exist
        let err = TinyKResponse::decode(&[0x00, 0x02, 0x00, 0x09, 0x00, 0x00, 0xFF]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownCode {
                field: "command error",
                value: 9
            }
        ));
        assert!(err.is_malformed_frame());
    }
}
