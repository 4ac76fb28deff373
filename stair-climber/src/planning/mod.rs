//! Path search over the stairs grid.
//!
//! All finders share one contract: given a map and two cells, return a
//! [`Path`] of left/right/climb movements through non-obstacle cells, or
//! `None` when the goal cannot be reached. "No path" is an expected outcome
//! of a search and never an error.
//!
//! # Finders
//!
//! - **ObstacleAvoider**: climbs are penalized by how tight the gap on the
//!   destination step is
//! - **CenterBias**: climbs are penalized by their distance from the centre
//!   column
//! - **Plain**: Manhattan cost
//! - **SpaceOptimized**: Manhattan cost with dense per-cell search state
//!
//! Finders are not required to agree on which route they return.

mod astar;
mod dynamic;
mod graph;
mod space_optimized;

pub use astar::{AStarCenterBias, AStarObstacleAvoider, AStarPathFinder};
pub use dynamic::{DynPathFinder, PathFinderType};
pub use space_optimized::AStarSpaceOptimized;

use crate::grid::{Cell, StairsMap};
use crate::movement::Path;

/// Strategy for finding a route from `start` to `goal`.
///
/// Finders mark `start` and `goal` on the map before searching.
pub trait PathFinder {
    fn find_path(&self, map: &mut StairsMap, start: Cell, goal: Cell) -> Option<Path>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
