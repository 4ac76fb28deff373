//! Movement execution shared by both climbing plans

use crate::config::ClimbConfig;
use crate::error::{ClimbError, Result};
use crate::grid::StairsMap;
use crate::movement::{Movement, MovementInCm, Path};
use crate::navigation::{Navigation, NavigationResult};
use crate::planning::{DynPathFinder, PathFinder};
use tinyk_io::{CommandError, RobotPosition, Transport};

/// Drives a path to the goal, flagging obstacles and replanning on the way
pub(crate) struct PlanExecutor {
    finder: DynPathFinder,
    climb: ClimbConfig,
    /// Set once the top landing was reached and the extra nudge was sent
    target_area_reached: bool,
    /// Treat "no route" as done when the top landing is already reached
    complete_in_target_area: bool,
}

impl PlanExecutor {
    pub(crate) fn new(
        finder: DynPathFinder,
        climb: ClimbConfig,
        complete_in_target_area: bool,
    ) -> Self {
        Self {
            finder,
            climb,
            target_area_reached: false,
            complete_in_target_area,
        }
    }

    pub(crate) fn finder(&self) -> &DynPathFinder {
        &self.finder
    }

    /// Execute `path` until it is exhausted.
    ///
    /// On a handled obstacle failure the path is replaced in place by a route
    /// from the current position.
    pub(crate) fn run<T: Transport>(
        &mut self,
        path: &mut Path,
        map: &mut StairsMap,
        nav: &mut Navigation<T>,
    ) -> Result<()> {
        log::info!("Executing path {}", path);

        while let Some(step) = path.get_next_movement() {
            let result = self.execute_movement(step, map, nav)?;
            if result.success {
                self.update_position(step, map, nav)?;
                log::debug!("After {}:\n{}", step, map.render(None));
                continue;
            }

            let known = obstacle_count(map);
            self.handle_error(&result, step.movement, map, nav)?;
            if obstacle_count(map) == known {
                // same map, same route: the move would fail again
                log::error!(
                    "Obstacle reported while moving {} is already known, giving up",
                    step.movement
                );
                return Err(ClimbError::NoPathFound);
            }
            *path = self.replan(map)?;
            log::info!("Replanned path {}", path);
            log::debug!("{}", map.render(Some(&*path)));
        }

        nav.speaker().announce_climbing_plan_completed();
        log::info!(
            "Climbing plan completed at {:?}",
            map.position().map(|c| c.coordinates())
        );
        Ok(())
    }

    /// Route from the current position to the goal.
    ///
    /// The start flag follows the position so the route begins where the
    /// robot actually is.
    pub(crate) fn replan(&self, map: &mut StairsMap) -> Result<Path> {
        let position = map.position().ok_or(ClimbError::MissingPosition)?;
        let goal = map.goal().ok_or(ClimbError::MissingGoal)?;
        map.set_start_cell(&position)?;

        match self.finder.find_path(map, position, goal) {
            Some(path) => Ok(path),
            None if self.complete_in_target_area && map.is_in_target_area() => {
                log::info!("No route left but top landing reached, finishing");
                Ok(Path::empty(map.cell_width_cm()))
            }
            None => {
                log::error!("{}: no path from {:?}", self.finder.name(), position.coordinates());
                Err(ClimbError::NoPathFound)
            }
        }
    }

    fn execute_movement<T: Transport>(
        &self,
        step: MovementInCm,
        map: &StairsMap,
        nav: &mut Navigation<T>,
    ) -> Result<NavigationResult> {
        log::debug!(
            "Executing {} from {:?}",
            step,
            map.position().map(|c| c.coordinates())
        );
        match step.movement {
            Movement::Left => {
                auxiliary(nav.move_to_position(RobotPosition::GoHome)?, "move_to_position(go_home)");
                nav.move_sideways_left(step.distance_cm)
            }
            Movement::Right => {
                auxiliary(nav.move_to_position(RobotPosition::GoHome)?, "move_to_position(go_home)");
                nav.move_sideways_right(step.distance_cm)
            }
            Movement::Climb => {
                auxiliary(
                    nav.move_to_position(RobotPosition::DriveOnStairs)?,
                    "move_to_position(drive_on_stairs)",
                );
                nav.climb(self.climb.climb_speed)
            }
        }
    }

    fn update_position<T: Transport>(
        &mut self,
        step: MovementInCm,
        map: &mut StairsMap,
        nav: &mut Navigation<T>,
    ) -> Result<()> {
        match step.movement {
            Movement::Left => map.move_position_left_in_distance(step.distance_cm),
            Movement::Right => map.move_position_right_in_distance(step.distance_cm),
            Movement::Climb => {
                map.move_position_up()?;
                self.settle_after_climb(map, nav)
            }
        }
    }

    fn settle_after_climb<T: Transport>(
        &mut self,
        map: &StairsMap,
        nav: &mut Navigation<T>,
    ) -> Result<()> {
        let climb = &self.climb;
        auxiliary(nav.move_forward(climb.settle_forward_cm)?, "move_forward");
        auxiliary(
            nav.move_to_position(RobotPosition::HitStairs)?,
            "move_to_position(hit_stairs)",
        );
        auxiliary(nav.move_forward(climb.hit_stairs_forward_cm)?, "move_forward");
        auxiliary(nav.move_backward(climb.back_off_cm)?, "move_backward");

        if map.is_in_target_area() && !self.target_area_reached {
            self.target_area_reached = true;
            log::info!("Top landing reached");
            auxiliary(nav.move_forward(climb.top_step_forward_cm)?, "move_forward");
        }
        Ok(())
    }

    /// Flag the obstacle a failure reports, or give up
    fn handle_error<T: Transport>(
        &self,
        result: &NavigationResult,
        movement: Movement,
        map: &mut StairsMap,
        nav: &Navigation<T>,
    ) -> Result<()> {
        match (result.error, movement) {
            (Some(CommandError::ObstacleDetectedLeft), Movement::Left) => {
                map.set_obstacle_left_in_distance(result.error_value)?
            }
            (Some(CommandError::ObstacleDetectedRight), Movement::Right) => {
                map.set_obstacle_right_in_distance(result.error_value)?
            }
            (Some(CommandError::ObstacleDetectedFront), Movement::Climb) => map.set_obstacle_front()?,
            (error, movement) => {
                nav.speaker().announce_climbing_plan_error_found();
                log::error!(
                    "Cannot handle {:?} (value {}) while moving {}",
                    error,
                    result.error_value,
                    movement
                );
                return Err(ClimbError::UnhandledFailure {
                    error,
                    error_value: result.error_value,
                    movement,
                });
            }
        }

        nav.speaker().announce_climbing_plan_obstacle_found();
        log::info!(
            "Obstacle flagged after {:?} while moving {}",
            result.error,
            movement
        );
        Ok(())
    }
}

fn obstacle_count(map: &StairsMap) -> usize {
    map.cells().iter().filter(|cell| cell.is_obstacle).count()
}

/// Positioning moves never change the map; their failures are only logged
fn auxiliary(result: NavigationResult, action: &str) {
    if !result.success {
        log::warn!(
            "Ignoring failed {}: {:?} (value {})",
            action,
            result.error,
            result.error_value
        );
    }
}
