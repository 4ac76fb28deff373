//! Configuration for the stair climber
//!
//! Loaded from a TOML file. Every section falls back to its defaults, so a
//! file only needs the values that differ from the competition course.

use crate::error::Result;
use crate::planning::PathFinderType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tinyk_io::SerialConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub serial: SerialConfig,
    pub stairs: StairsConfig,
    pub robot: RobotConfig,
    pub course: CourseConfig,
    pub planning: PlanningConfig,
    pub climb: ClimbConfig,
    pub logging: LoggingConfig,
}

/// Physical dimensions of the staircase
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StairsConfig {
    pub step_width_cm: i32,
    pub step_height_cm: i32,
    /// Number of steps, without floor and top landing
    pub step_count: i32,
}

impl Default for StairsConfig {
    fn default() -> Self {
        Self {
            step_width_cm: 250,
            step_height_cm: 30,
            step_count: 5,
        }
    }
}

/// Robot footprint and grid resolution
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RobotConfig {
    pub width_cm: i32,
    /// Width of one grid cell, also the smallest sideways movement
    pub cell_width_cm: i32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            width_cm: 40,
            cell_width_cm: 5,
        }
    }
}

/// A brick on one step, as a normalized span of the step width
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BrickConfig {
    pub step: i32,
    pub from: f64,
    pub to: f64,
}

/// Start, goal and known obstacles of the course
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CourseConfig {
    /// Normalized x-position of the start on the floor
    pub start_x: f64,
    /// Normalized x-position of the goal; derived from the pictograms if absent
    pub goal_x: Option<f64>,
    /// Number of pictograms along the top landing
    pub pictogram_count: usize,
    /// Index of the target pictogram, counted from the left
    pub target_pictogram: usize,
    pub bricks: Vec<BrickConfig>,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            start_x: 0.5,
            goal_x: None,
            pictogram_count: 5,
            target_pictogram: 2,
            bricks: Vec::new(),
        }
    }
}

impl CourseConfig {
    /// Normalized x-position of the goal.
    ///
    /// Pictograms share the middle 80% of the landing evenly; the goal is
    /// the centre of the target pictogram's share.
    pub fn goal_position(&self) -> f64 {
        if let Some(goal_x) = self.goal_x {
            return goal_x;
        }
        if self.pictogram_count == 0 {
            return 0.5;
        }
        let share = 0.8 / self.pictogram_count as f64;
        0.1 + self.target_pictogram as f64 * share + share / 2.0
    }
}

/// Path finder selection
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Finder for the plan built from a known map
    pub path_finder: PathFinderType,
    /// Finder for the sensor-only backup plan
    pub sensor_path_finder: PathFinderType,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            path_finder: PathFinderType::ObstacleAvoider,
            sensor_path_finder: PathFinderType::CenterBias,
        }
    }
}

/// Positioning sequence around each climb
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClimbConfig {
    pub climb_speed: u16,
    /// Forward after the climb, onto the new step
    pub settle_forward_cm: i32,
    /// Forward after lowering into the hit-stairs posture
    pub hit_stairs_forward_cm: i32,
    pub back_off_cm: i32,
    /// Extra forward once the top landing is reached
    pub top_step_forward_cm: i32,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            climb_speed: 5,
            settle_forward_cm: 3,
            hit_stairs_forward_cm: 2,
            back_off_cm: 1,
            top_step_forward_cm: 13,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
