//! Error types for stair climbing

use crate::movement::Movement;
use tinyk_io::CommandError;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClimbError>;

/// Planning and climbing errors
///
/// "No path" during a search is not an error; it surfaces as `Option`.
/// These variants are the failures no local recovery exists for.
#[derive(Debug, thiserror::Error)]
pub enum ClimbError {
    /// Lookup of a cell outside the grid
    #[error("Cell {cell_number} on step {step_number} does not exist")]
    CellNotFound { cell_number: i32, step_number: i32 },

    /// Normalized position maps outside the row
    #[error("Normalized position {0} is outside the stairs")]
    PositionOutOfRange(f64),

    #[error("Stairs map has no start cell")]
    MissingStart,

    #[error("Stairs map has no goal cell")]
    MissingGoal,

    #[error("Stairs map has no current position")]
    MissingPosition,

    /// Failed movement that no obstacle rule covers
    #[error("Unhandled failure {error:?} (value {error_value}) while moving {movement:?}")]
    UnhandledFailure {
        error: Option<CommandError>,
        error_value: i32,
        movement: Movement,
    },

    /// Replanning found no route to the goal
    #[error("No path to the goal")]
    NoPathFound,

    /// `climb` called before a plan was formulated
    #[error("No climbing plan formulated")]
    NoPlan,

    /// Zero distance or speed for a command that needs one
    #[error("Invalid distance {0} for {1}")]
    InvalidDistance(i32, &'static str),

    /// Drive controller protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] tinyk_io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
