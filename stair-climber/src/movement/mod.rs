//! Movement vocabulary.
//!
//! Raw [`Movement`]s are single-cell actions produced by the planner. A
//! [`Path`] compresses them into [`MovementInCm`] runs for execution.

mod path;

pub use path::Path;

use std::fmt;

/// A single-cell action of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    /// One cell to the left on the same step.
    Left,
    /// One cell to the right on the same step.
    Right,
    /// One step up in the same column.
    Climb,
}

impl Movement {
    /// Movement leading from one grid coordinate to an adjacent one.
    ///
    /// Returns `None` for pairs the planner never connects.
    pub fn between(from: (i32, i32), to: (i32, i32)) -> Option<Self> {
        let (from_step, from_cell) = from;
        let (to_step, to_cell) = to;
        match (to_step - from_step, to_cell - from_cell) {
            (0, -1) => Some(Movement::Left),
            (0, 1) => Some(Movement::Right),
            (1, 0) => Some(Movement::Climb),
            _ => None,
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Movement::Left => write!(f, "left"),
            Movement::Right => write!(f, "right"),
            Movement::Climb => write!(f, "climb"),
        }
    }
}

/// A movement with an aggregate distance.
///
/// Climbs always carry a distance of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementInCm {
    pub movement: Movement,
    pub distance_cm: i32,
}

impl MovementInCm {
    pub fn new(movement: Movement, distance_cm: i32) -> Self {
        Self {
            movement,
            distance_cm,
        }
    }
}

impl fmt::Display for MovementInCm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}cm", self.movement, self.distance_cm)
    }
}
