//! Outgoing command frames

use super::{encode_frame, CommandType, RobotPosition, DEFAULT_TTL, FRAME_SIZE};
use crate::error::{Error, Result};

/// A command for the drive controller
///
/// `ttl` is the resend budget. It is consumed on every transmission,
/// including the first one, and never replenished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TinyKCommand {
    pub command_type: CommandType,
    pub argument: u16,
    pub ttl: u8,
}

impl TinyKCommand {
    /// Create a command with the default resend budget
    pub fn new(command_type: CommandType, argument: u16) -> Self {
        Self {
            command_type,
            argument,
            ttl: DEFAULT_TTL,
        }
    }

    /// Create a command from a wider argument, failing when it exceeds a frame field
    pub fn checked(command_type: CommandType, argument: u32) -> Result<Self> {
        let argument = u16::try_from(argument).map_err(|_| Error::ArgumentOverflow(argument))?;
        Ok(Self::new(command_type, argument))
    }

    /// Replace the resend budget
    pub fn with_ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn initialize() -> Self {
        Self::new(CommandType::Initialize, 0)
    }

    pub fn shutdown() -> Self {
        Self::new(CommandType::Shutdown, 0)
    }

    /// Tilt the camera up by `degrees`
    pub fn rotate_upwards(degrees: u16) -> Self {
        Self::new(CommandType::RotateUpwards, degrees)
    }

    /// Tilt the camera down by `degrees`
    pub fn rotate_downwards(degrees: u16) -> Self {
        Self::new(CommandType::RotateDownwards, degrees)
    }

    pub fn rotate_clockwise(degrees: u16) -> Self {
        Self::new(CommandType::RotateClockwise, degrees)
    }

    pub fn rotate_counter_clockwise(degrees: u16) -> Self {
        Self::new(CommandType::RotateCounterClockwise, degrees)
    }

    pub fn move_left(distance_cm: u16) -> Self {
        Self::new(CommandType::MoveLeft, distance_cm)
    }

    pub fn move_right(distance_cm: u16) -> Self {
        Self::new(CommandType::MoveRight, distance_cm)
    }

    pub fn move_forward(distance_cm: u16) -> Self {
        Self::new(CommandType::MoveForward, distance_cm)
    }

    pub fn move_backward(distance_cm: u16) -> Self {
        Self::new(CommandType::MoveBackward, distance_cm)
    }

    /// Climb one step at the given speed
    pub fn climb(speed: u16) -> Self {
        Self::new(CommandType::Climb, speed)
    }

    pub fn move_to_position(position: RobotPosition) -> Self {
        Self::new(CommandType::MoveToPosition, position.into())
    }

    // ========================================================================
    // Wire
    // ========================================================================

    /// Take one transmission from the budget.
    ///
    /// Returns false when the budget was already spent.
    pub fn consume_ttl(&mut self) -> bool {
        match self.ttl.checked_sub(1) {
            Some(ttl) => {
                self.ttl = ttl;
                true
            }
            None => false,
        }
    }

    /// Encode the command under the given sequence number
    pub fn encode(&self, sequence_number: u16) -> [u8; FRAME_SIZE] {
        encode_frame(self.command_type.into(), self.argument, sequence_number)
    }
}
