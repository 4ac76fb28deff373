//! Dynamic path finder selection for runtime algorithm switching.
//!
//! Provides runtime-selectable path finders through the [`DynPathFinder`]
//! enum, so configuration can pick the finder for each climbing plan.

use super::{AStarCenterBias, AStarObstacleAvoider, AStarPathFinder, AStarSpaceOptimized, PathFinder};
use crate::grid::{Cell, StairsMap};
use crate::movement::Path;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Available path finder types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathFinderType {
    /// A* penalizing climbs into tight gaps.
    ///
    /// Default for plans built from a known map.
    ObstacleAvoider,

    /// A* preferring climbs near the centre column.
    ///
    /// Default for the sensor-only plan, which knows no obstacles.
    CenterBias,

    /// Plain A* with Manhattan cost.
    Plain,

    /// Plain A* with dense per-cell search state.
    SpaceOptimized,
}

impl std::fmt::Display for PathFinderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathFinderType::ObstacleAvoider => write!(f, "Obstacle Avoider"),
            PathFinderType::CenterBias => write!(f, "Center Bias"),
            PathFinderType::Plain => write!(f, "Plain"),
            PathFinderType::SpaceOptimized => write!(f, "Space Optimized"),
        }
    }
}

impl PathFinderType {
    /// Get a short description of this finder type.
    pub fn description(&self) -> &'static str {
        match self {
            PathFinderType::ObstacleAvoider => "A* with clearance penalty on climbs",
            PathFinderType::CenterBias => "A* with centre-column penalty on climbs",
            PathFinderType::Plain => "A* with Manhattan cost",
            PathFinderType::SpaceOptimized => "A* with Manhattan cost, dense state",
        }
    }

    /// Returns all available finder types.
    pub fn all() -> &'static [PathFinderType] {
        &[
            PathFinderType::ObstacleAvoider,
            PathFinderType::CenterBias,
            PathFinderType::Plain,
            PathFinderType::SpaceOptimized,
        ]
    }
}

/// Runtime-selectable path finder implementation.
#[derive(Debug, Clone, Copy)]
pub enum DynPathFinder {
    ObstacleAvoider(AStarObstacleAvoider),
    CenterBias(AStarCenterBias),
    Plain(AStarPathFinder),
    SpaceOptimized(AStarSpaceOptimized),
}

impl DynPathFinder {
    pub fn new(finder_type: PathFinderType) -> Self {
        match finder_type {
            PathFinderType::ObstacleAvoider => DynPathFinder::ObstacleAvoider(AStarObstacleAvoider),
            PathFinderType::CenterBias => DynPathFinder::CenterBias(AStarCenterBias),
            PathFinderType::Plain => DynPathFinder::Plain(AStarPathFinder),
            PathFinderType::SpaceOptimized => DynPathFinder::SpaceOptimized(AStarSpaceOptimized),
        }
    }

    /// Get the finder type.
    pub fn finder_type(&self) -> PathFinderType {
        match self {
            DynPathFinder::ObstacleAvoider(_) => PathFinderType::ObstacleAvoider,
            DynPathFinder::CenterBias(_) => PathFinderType::CenterBias,
            DynPathFinder::Plain(_) => PathFinderType::Plain,
            DynPathFinder::SpaceOptimized(_) => PathFinderType::SpaceOptimized,
        }
    }
}

impl PathFinder for DynPathFinder {
    fn find_path(&self, map: &mut StairsMap, start: Cell, goal: Cell) -> Option<Path> {
        match self {
            DynPathFinder::ObstacleAvoider(f) => f.find_path(map, start, goal),
            DynPathFinder::CenterBias(f) => f.find_path(map, start, goal),
            DynPathFinder::Plain(f) => f.find_path(map, start, goal),
            DynPathFinder::SpaceOptimized(f) => f.find_path(map, start, goal),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DynPathFinder::ObstacleAvoider(f) => f.name(),
            DynPathFinder::CenterBias(f) => f.name(),
            DynPathFinder::Plain(f) => f.name(),
            DynPathFinder::SpaceOptimized(f) => f.name(),
        }
    }
}
