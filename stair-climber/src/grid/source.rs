//! Where stairs maps come from.
//!
//! Detection of bricks in camera images happens outside this crate. Its
//! result is consumed through [`StairsMapSource`]; [`CourseLayout`] builds the
//! same result from a surveyed course description.

use super::StairsMap;
use crate::config::{BrickConfig, Config, RobotConfig, StairsConfig};

/// Producer of an initialized stairs map with known obstacles.
pub trait StairsMapSource {
    /// Build the map, or `None` if no usable map could be derived.
    ///
    /// The returned map has obstacles but no start, goal or position.
    fn build_stairs_map(&mut self) -> Option<StairsMap>;
}

/// Stairs map from configured brick spans
#[derive(Debug, Clone)]
pub struct CourseLayout {
    stairs: StairsConfig,
    robot: RobotConfig,
    bricks: Vec<BrickConfig>,
}

impl CourseLayout {
    pub fn new(stairs: StairsConfig, robot: RobotConfig, bricks: Vec<BrickConfig>) -> Self {
        Self {
            stairs,
            robot,
            bricks,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.stairs.clone(),
            config.robot.clone(),
            config.course.bricks.clone(),
        )
    }
}

impl StairsMapSource for CourseLayout {
    fn build_stairs_map(&mut self) -> Option<StairsMap> {
        if self.robot.cell_width_cm <= 0 {
            log::warn!("Cell width {} cm is not usable", self.robot.cell_width_cm);
            return None;
        }
        let mut map = StairsMap::for_stairs(
            &self.stairs,
            self.robot.cell_width_cm,
            self.robot.width_cm,
        );
        for brick in &self.bricks {
            if let Err(e) = map.set_obstacle_span(brick.step, brick.from, brick.to) {
                log::warn!("Brick {:?} does not fit the stairs: {}", brick, e);
                return None;
            }
        }
        log::debug!("Stairs map with {} bricks:\n{}", self.bricks.len(), map.render(None));
        Some(map)
    }
}
