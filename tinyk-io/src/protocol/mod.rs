//! TinyK wire protocol
//!
//! Every frame is 7 bytes, three big-endian `u16` fields followed by a
//! terminator:
//!
//! ```text
//! Command:  [type:2][argument:2][sequence:2][0xFF]
//! Response: [type:2][payload:2][error_value:2][0xFF]
//! ```
//!
//! A command is answered by two frames: `ack`, then `completed` or `failed`.
//! For `ack`/`completed` the payload is a [`CommandType`], for `failed` it is
//! a [`CommandError`].

mod command;
mod response;

pub use command::TinyKCommand;
pub use response::{ResponsePayload, TinyKResponse};

use crate::error::Error;

/// Size of every frame in bytes
pub const FRAME_SIZE: usize = 7;

/// Terminator byte closing every frame
pub const END_OF_MESSAGE: u8 = 0xFF;

/// Resends allowed per command before the session gives up
pub const DEFAULT_TTL: u8 = 3;

/// Declares a `#[repr(u16)]` wire enum with a checked `TryFrom<u16>`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl TryFrom<u16> for $name {
            type Error = Error;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(Error::UnknownCode {
                        field: $field,
                        value,
                    }),
                }
            }
        }

        impl From<$name> for u16 {
            fn from(value: $name) -> u16 {
                value as u16
            }
        }
    };
}

wire_enum! {
    /// Command codes understood by the drive controller
    CommandType, "command type" {
        Initialize = 1,
        RotateUpwards = 2,
        RotateDownwards = 3,
        RotateClockwise = 4,
        RotateCounterClockwise = 5,
        MoveLeft = 6,
        MoveRight = 7,
        MoveForward = 8,
        MoveBackward = 9,
        Climb = 10,
        Shutdown = 11,
        MoveToPosition = 12,
    }
}

wire_enum! {
    /// Kind of a response frame
    ResponseType, "response type" {
        /// Command accepted
        Ack = 1,
        /// Command aborted; payload is a [`CommandError`]
        Failed = 2,
        /// Command finished
        Completed = 3,
    }
}

wire_enum! {
    /// Reason reported with a `failed` response
    CommandError, "command error" {
        UnknownCommand = 1,
        /// Obstacle on the left; `error_value` is its distance in cm
        ObstacleDetectedLeft = 2,
        /// Obstacle on the right; `error_value` is its distance in cm
        ObstacleDetectedRight = 3,
        /// Obstacle ahead
        ObstacleDetectedFront = 4,
        InvalidCommand = 5,
    }
}

wire_enum! {
    /// Predefined drive postures, the argument of `move_to_position`
    RobotPosition, "robot position" {
        DriveAround = 1,
        StandUp = 2,
        DriveOnStairs = 3,
        HitTargetPictogram = 4,
        GoHome = 5,
        HitStairs = 6,
    }
}

/// Encode three big-endian fields plus terminator into one frame.
pub fn encode_frame(first: u16, second: u16, third: u16) -> [u8; FRAME_SIZE] {
    let [a0, a1] = first.to_be_bytes();
    let [b0, b1] = second.to_be_bytes();
    let [c0, c1] = third.to_be_bytes();
    [a0, a1, b0, b1, c0, c1, END_OF_MESSAGE]
}

/// Build a raw response frame, as sent by the drive controller.
pub fn response_frame(
    response_type: ResponseType,
    payload: u16,
    error_value: u16,
) -> [u8; FRAME_SIZE] {
    encode_frame(response_type.into(), payload, error_value)
}
