//! Navigation: physical actions on top of the TinyK protocol.
//!
//! Every action is one (or, for rotations, several) two-frame exchanges:
//! the command is acknowledged, then completed or failed. Domain failures
//! come back as a [`NavigationResult`]; only protocol breakdowns and invalid
//! arguments are errors.

mod speaker;

pub use speaker::{LogSpeaker, SilentSpeaker, Speaker};

use crate::error::{ClimbError, Result};
use tinyk_io::{
    CommandError, CommandType, ResponseType, RobotPosition, TinyK, TinyKCommand, TinyKResponse,
    Transport,
};

/// Largest rotation a single frame may carry
const MAX_DEGREES_PER_COMMAND: u32 = 255;

/// Outcome of a navigation action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationResult {
    pub success: bool,
    pub error: Option<CommandError>,
    /// Obstacle distance in cm when the error reports one, otherwise 0
    pub error_value: i32,
}

impl NavigationResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
            error_value: 0,
        }
    }

    pub fn failed(error: Option<CommandError>, error_value: i32) -> Self {
        Self {
            success: false,
            error,
            error_value,
        }
    }

    /// Failure described by an unexpected response
    fn from_response(response: &TinyKResponse) -> Self {
        let error = response
            .error()
            .or_else(|| CommandError::try_from(response.raw_payload()).ok());
        Self::failed(error, i32::from(response.error_value))
    }
}

/// Moves the robot through the drive controller
pub struct Navigation<T: Transport> {
    tinyk: TinyK<T>,
    speaker: Box<dyn Speaker>,
}

impl<T: Transport> Navigation<T> {
    pub fn new(tinyk: TinyK<T>, speaker: Box<dyn Speaker>) -> Self {
        Self { tinyk, speaker }
    }

    /// Open a TinyK session on `transport`
    pub fn with_transport(transport: T, speaker: Box<dyn Speaker>) -> Self {
        Self::new(TinyK::new(transport), speaker)
    }

    pub fn speaker(&self) -> &dyn Speaker {
        self.speaker.as_ref()
    }

    pub fn tinyk(&self) -> &TinyK<T> {
        &self.tinyk
    }

    pub fn tinyk_mut(&mut self) -> &mut TinyK<T> {
        &mut self.tinyk
    }

    // ========================================================================
    // Actions
    // ========================================================================

    pub fn initialize(&mut self) -> Result<NavigationResult> {
        self.speaker.announce_initialize();
        log::debug!("Navigation - initialize");
        self.exchange(TinyKCommand::initialize(), "initialize")
    }

    pub fn move_forward(&mut self, distance_cm: i32) -> Result<NavigationResult> {
        self.speaker.announce_move_forward();
        log::debug!("Navigation - move_forward {}cm", distance_cm);
        let command = checked_command(CommandType::MoveForward, distance_cm, true, "move_forward")?;
        self.exchange(command, "move_forward")
    }

    /// Drive forward and report success once something blocks the way.
    ///
    /// A `failed(obstacle_detected_front)` is the expected outcome here;
    /// completing the full distance or any other failure is not.
    pub fn move_forward_until_obstacle(&mut self, distance_cm: i32) -> Result<NavigationResult> {
        self.speaker.announce_move_forward_until_obstacle();
        log::debug!("Navigation - move_forward_until_obstacle {}cm", distance_cm);
        let command = checked_command(
            CommandType::MoveForward,
            distance_cm,
            true,
            "move_forward_until_obstacle",
        )?;

        self.tinyk.execute(command)?;
        let ack = self.tinyk.wait_for_response()?;
        if !ack.is_ack() {
            log::error!("Navigation - move_forward_until_obstacle - not acknowledged: {:?}", ack);
            return Ok(NavigationResult::from_response(&ack));
        }

        let terminal = self.tinyk.wait_for_response()?;
        if terminal.response_type == ResponseType::Failed
            && terminal.error() == Some(CommandError::ObstacleDetectedFront)
        {
            log::info!("Navigation - obstacle in front reached");
            return Ok(NavigationResult::succeeded());
        }

        log::error!(
            "Navigation - move_forward_until_obstacle {}cm - no obstacle reached ({:?})",
            distance_cm,
            terminal.response_type
        );
        Ok(NavigationResult::failed(
            terminal.error(),
            i32::from(terminal.error_value),
        ))
    }

    pub fn move_backward(&mut self, distance_cm: i32) -> Result<NavigationResult> {
        self.speaker.announce_move_backward();
        log::debug!("Navigation - move_backward {}cm", distance_cm);
        let command = checked_command(CommandType::MoveBackward, distance_cm, false, "move_backward")?;
        self.exchange(command, "move_backward")
    }

    pub fn move_sideways_left(&mut self, distance_cm: i32) -> Result<NavigationResult> {
        self.speaker.announce_sideways_left(distance_cm);
        log::debug!("Navigation - move_sideways_left {}cm", distance_cm);
        let command = checked_command(CommandType::MoveLeft, distance_cm, false, "move_sideways_left")?;
        self.exchange(command, "move_sideways_left")
    }

    pub fn move_sideways_right(&mut self, distance_cm: i32) -> Result<NavigationResult> {
        self.speaker.announce_sideways_right(distance_cm);
        log::debug!("Navigation - move_sideways_right {}cm", distance_cm);
        let command =
            checked_command(CommandType::MoveRight, distance_cm, false, "move_sideways_right")?;
        self.exchange(command, "move_sideways_right")
    }

    /// Climb one step
    pub fn climb(&mut self, speed: u16) -> Result<NavigationResult> {
        self.speaker.announce_climb();
        log::debug!("Navigation - climb at speed {}", speed);
        if speed == 0 {
            return Err(ClimbError::InvalidDistance(0, "climb"));
        }
        self.exchange(TinyKCommand::climb(speed), "climb")
    }

    pub fn move_to_position(&mut self, position: RobotPosition) -> Result<NavigationResult> {
        self.speaker.announce_change_robot_position(position);
        log::debug!("Navigation - move_to_position {:?}", position);
        self.exchange(TinyKCommand::move_to_position(position), "move_to_position")
    }

    /// Rotate the robot; positive degrees turn counter-clockwise.
    pub fn rotate_sideways(&mut self, degrees: i32) -> Result<NavigationResult> {
        log::debug!("Navigation - rotate_sideways {} degrees", degrees);
        if degrees == 0 {
            return Ok(NavigationResult::succeeded());
        }
        let counter_clockwise = degrees > 0;
        if counter_clockwise {
            self.speaker.announce_rotate_counter_clockwise();
        } else {
            self.speaker.announce_rotate_clockwise();
        }
        let command_type = if counter_clockwise {
            CommandType::RotateCounterClockwise
        } else {
            CommandType::RotateClockwise
        };
        self.rotate_in_batches(command_type, degrees.unsigned_abs(), "rotate_sideways")
    }

    /// Tilt the camera; positive degrees tilt upwards.
    pub fn rotate_camera(&mut self, degrees: i32) -> Result<NavigationResult> {
        log::debug!("Navigation - rotate_camera {} degrees", degrees);
        if degrees == 0 {
            return Ok(NavigationResult::succeeded());
        }
        self.speaker.announce_rotate_camera(degrees);
        let command_type = if degrees > 0 {
            CommandType::RotateUpwards
        } else {
            CommandType::RotateDownwards
        };
        self.rotate_in_batches(command_type, degrees.unsigned_abs(), "rotate_camera")
    }

    /// Ask the drive to shut down. Failures are logged, never returned.
    pub fn shutdown(&mut self) {
        self.speaker.announce_shutdown();
        log::warn!("Shutting down TinyK");
        match self.exchange(TinyKCommand::shutdown(), "shutdown") {
            Ok(result) if !result.success => log::error!(
                "Shutdown not completed: {:?} (value {})",
                result.error,
                result.error_value
            ),
            Ok(_) => {}
            Err(e) => log::error!("Error when shutting down: {}", e),
        }
    }

    // ========================================================================
    // Exchange
    // ========================================================================

    fn rotate_in_batches(
        &mut self,
        command_type: CommandType,
        total_degrees: u32,
        action: &str,
    ) -> Result<NavigationResult> {
        let mut pending = total_degrees;
        while pending > 0 {
            let batch = pending.min(MAX_DEGREES_PER_COMMAND);
            pending -= batch;
            let result = self.exchange(TinyKCommand::checked(command_type, batch)?, action)?;
            if !result.success {
                return Ok(result);
            }
        }
        Ok(NavigationResult::succeeded())
    }

    /// Send a command and read its ack and terminal frame
    fn exchange(&mut self, command: TinyKCommand, action: &str) -> Result<NavigationResult> {
        self.tinyk.execute(command)?;

        let ack = self.tinyk.wait_for_response()?;
        if !ack.is_ack() {
            log::error!("Navigation - {} - not acknowledged: {:?}", action, ack);
            return Ok(NavigationResult::from_response(&ack));
        }

        let terminal = self.tinyk.wait_for_response()?;
        if terminal.response_type == ResponseType::Completed {
            return Ok(NavigationResult::succeeded());
        }

        log::error!(
            "Navigation - {} {} - not completed | {:?}, error {:?}, error_value {}",
            action,
            command.argument,
            terminal.response_type,
            terminal.error(),
            terminal.error_value
        );
        Ok(NavigationResult::from_response(&terminal))
    }
}

/// Validate a centimetre argument and build its command
fn checked_command(
    command_type: CommandType,
    distance_cm: i32,
    allow_zero: bool,
    action: &'static str,
) -> Result<TinyKCommand> {
    let minimum = if allow_zero { 0 } else { 1 };
    if distance_cm < minimum {
        return Err(ClimbError::InvalidDistance(distance_cm, action));
    }
    Ok(TinyKCommand::checked(command_type, distance_cm.unsigned_abs())?)
}
