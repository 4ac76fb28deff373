//! Climbing plans
//!
//! A plan owns the movement sequence for one ascent and turns it into
//! navigation calls. Two variants exist:
//!
//! - [`PathClimbingPlan`]: starts from a path computed on a surveyed map
//! - [`SensorClimbingPlan`]: forgets every known obstacle and discovers them
//!   through the drive's sensors, planning from scratch
//!
//! Both keep the map position in step with the robot, flag reported
//! obstacles and replan in place from the current position.

mod executor;

use crate::config::ClimbConfig;
use crate::error::Result;
use crate::grid::StairsMap;
use crate::movement::Path;
use crate::navigation::Navigation;
use crate::planning::DynPathFinder;
use executor::PlanExecutor;
use tinyk_io::Transport;

// ============================================================================
// Plans
// ============================================================================

/// Plan that follows a precomputed path
pub struct PathClimbingPlan {
    path: Path,
    executor: PlanExecutor,
}

impl PathClimbingPlan {
    pub fn new(path: Path, finder: DynPathFinder, climb: ClimbConfig) -> Self {
        Self {
            path,
            executor: PlanExecutor::new(finder, climb, false),
        }
    }

    /// Remaining route, replaced whenever the plan replans
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn finder(&self) -> &DynPathFinder {
        self.executor.finder()
    }

    /// Run the path. Fails when no route is left after an obstacle.
    pub fn execute<T: Transport>(&mut self, map: &mut StairsMap, nav: &mut Navigation<T>) -> Result<()> {
        log::info!("PathClimbingPlan: {} movements", self.path.aggregated().len());
        self.executor.run(&mut self.path, map, nav)
    }
}

/// Plan that assumes nothing about the stairs
pub struct SensorClimbingPlan {
    path: Path,
    executor: PlanExecutor,
}

impl SensorClimbingPlan {
    pub fn new(finder: DynPathFinder, climb: ClimbConfig) -> Self {
        Self {
            path: Path::empty(0),
            executor: PlanExecutor::new(finder, climb, true),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn finder(&self) -> &DynPathFinder {
        self.executor.finder()
    }

    /// Clear obstacles, plan from the current position and run.
    ///
    /// Running out of routes on the top landing counts as done.
    pub fn execute<T: Transport>(&mut self, map: &mut StairsMap, nav: &mut Navigation<T>) -> Result<()> {
        map.clear_obstacles();
        self.path = self.executor.replan(map)?;
        log::info!("SensorClimbingPlan: planned {}", self.path);
        self.executor.run(&mut self.path, map, nav)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Either climbing plan
pub enum ClimbingPlan {
    Path(PathClimbingPlan),
    Sensor(SensorClimbingPlan),
}

impl ClimbingPlan {
    pub fn execute<T: Transport>(&mut self, map: &mut StairsMap, nav: &mut Navigation<T>) -> Result<()> {
        match self {
            ClimbingPlan::Path(plan) => plan.execute(map, nav),
            ClimbingPlan::Sensor(plan) => plan.execute(map, nav),
        }
    }

    /// True for the last-resort plan
    pub fn is_sensor(&self) -> bool {
        matches!(self, ClimbingPlan::Sensor(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClimbingPlan::Path(_) => "PathClimbingPlan",
            ClimbingPlan::Sensor(_) => "SensorClimbingPlan",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ClimbingPlan::Path(plan) => plan.path(),
            ClimbingPlan::Sensor(plan) => plan.path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClimbError;
    use crate::movement::Movement;
    use crate::navigation::SilentSpeaker;
    use crate::planning::{PathFinder, PathFinderType};
    use tinyk_io::transport::{completed_exchange, failed_exchange};
    use tinyk_io::{CommandError, CommandType, MockTransport};

    /// 11 cells of 1cm, margin of one cell, floor plus one step plus landing
    fn small_map(start: f64, goal: f64) -> StairsMap {
        let mut map = StairsMap::new(11, 3, 1, 2);
        map.initialize();
        map.set_start(start).unwrap();
        map.set_goal(goal).unwrap();
        map
    }

    fn finder() -> DynPathFinder {
        DynPathFinder::new(PathFinderType::ObstacleAvoider)
    }

    fn path_for(map: &mut StairsMap) -> Path {
        let start = map.start().unwrap();
        let goal = map.goal().unwrap();
        finder().find_path(map, start, goal).unwrap()
    }

    fn navigation(transport: &MockTransport) -> Navigation<MockTransport> {
        Navigation::with_transport(transport.clone(), Box::new(SilentSpeaker))
    }

    /// Fail the first frame of `command` with `error`, complete everything else
    fn fail_first(command: CommandType, error: CommandError, value: u16) -> MockTransport {
        let mut failed = false;
        MockTransport::with_responder(move |frame| {
            if !failed && frame[1] as u16 == u16::from(command) {
                failed = true;
                failed_exchange(frame, error, value)
            } else {
                completed_exchange(frame)
            }
        })
    }

    fn command_types(transport: &MockTransport) -> Vec<u8> {
        transport.get_written().iter().map(|frame| frame[1]).collect()
    }

    #[test]
    fn test_straight_climb_sequence() {
        let mut map = small_map(0.5, 0.5);
        let path = path_for(&mut map);
        let transport = MockTransport::auto_complete();
        let mut nav = navigation(&transport);

        let mut plan = ClimbingPlan::Path(PathClimbingPlan::new(path, finder(), ClimbConfig::default()));
        plan.execute(&mut map, &mut nav).unwrap();

        assert_eq!(map.position(), map.goal());
        // drive_on_stairs, climb, forward, hit_stairs, forward, backward; twice,
        // plus the nudge onto the top landing
        assert_eq!(
            command_types(&transport),
            vec![12, 10, 8, 12, 8, 9, 12, 10, 8, 12, 8, 9, 8]
        );
        let nudge = transport.get_written().last().cloned().unwrap();
        assert_eq!(u16::from_be_bytes([nudge[2], nudge[3]]), 13);
    }

    #[test]
    fn test_sideways_move_is_preceded_by_home_posture() {
        let mut map = small_map(0.3, 0.5);
        let path = path_for(&mut map);
        assert!(path.movements().contains(&Movement::Right));
        let transport = MockTransport::auto_complete();
        let mut nav = navigation(&transport);

        let mut plan = PathClimbingPlan::new(path, finder(), ClimbConfig::default());
        plan.execute(&mut map, &mut nav).unwrap();

        let written = transport.get_written();
        let right = written.iter().position(|f| f[1] == 7).unwrap();
        assert_eq!(&written[right - 1][..4], &[0x00, 0x0C, 0x00, 0x05]);
        assert_eq!(map.position(), map.goal());
    }

    #[test]
    fn test_front_obstacle_is_flagged_and_avoided() {
        let mut map = small_map(0.5, 0.5);
        let path = path_for(&mut map);
        let transport = fail_first(CommandType::Climb, CommandError::ObstacleDetectedFront, 0);
        let mut nav = navigation(&transport);

        let mut plan = PathClimbingPlan::new(path, finder(), ClimbConfig::default());
        plan.execute(&mut map, &mut nav).unwrap();

        assert!(map.cell(5, 1).unwrap().is_obstacle);
        assert_eq!(map.position(), map.goal());
        assert_eq!(map.start().unwrap().coordinates(), (0, 5));
    }

    #[test]
    fn test_repeated_obstacle_report_stops_replanning() {
        let mut map = StairsMap::new(21, 3, 5, 10);
        map.initialize();
        map.set_start(0.5).unwrap();
        map.set_goal(0.25).unwrap();
        let mut movements = vec![Movement::Climb, Movement::Climb];
        movements.extend([Movement::Left; 5]);
        let path = Path::new(movements, 5);

        // obstacle reported beyond the end of the sideways run, every time
        let transport = MockTransport::with_responder(|frame| {
            if frame[1] as u16 == u16::from(CommandType::MoveLeft) {
                failed_exchange(frame, CommandError::ObstacleDetectedLeft, 35)
            } else {
                completed_exchange(frame)
            }
        });
        let mut nav = navigation(&transport);

        let mut plan = PathClimbingPlan::new(path, finder(), ClimbConfig::default());
        let err = plan.execute(&mut map, &mut nav).unwrap_err();

        assert!(matches!(err, ClimbError::NoPathFound));
        assert!(map.cell(3, 2).unwrap().is_obstacle);
        assert_eq!(command_types(&transport).iter().filter(|&&t| t == 6).count(), 2);
        assert_eq!(map.position().unwrap().coordinates(), (2, 10));
    }

    #[test]
    fn test_unhandled_failure_aborts() {
        let mut map = small_map(0.5, 0.5);
        let path = path_for(&mut map);
        let transport = fail_first(CommandType::Climb, CommandError::ObstacleDetectedLeft, 3);
        let mut nav = navigation(&transport);

        let mut plan = PathClimbingPlan::new(path, finder(), ClimbConfig::default());
        let err = plan.execute(&mut map, &mut nav).unwrap_err();
        assert!(matches!(
            err,
            ClimbError::UnhandledFailure {
                error: Some(CommandError::ObstacleDetectedLeft),
                error_value: 3,
                movement: Movement::Climb,
            }
        ));
        assert_eq!(map.position().unwrap().coordinates(), (0, 5));
    }

    #[test]
    fn test_auxiliary_failures_are_ignored() {
        let mut map = small_map(0.5, 0.5);
        let path = path_for(&mut map);
        let transport = MockTransport::with_responder(|frame| {
            if frame[1] == 9 {
                failed_exchange(frame, CommandError::InvalidCommand, 0)
            } else {
                completed_exchange(frame)
            }
        });
        let mut nav = navigation(&transport);

        let mut plan = PathClimbingPlan::new(path, finder(), ClimbConfig::default());
        plan.execute(&mut map, &mut nav).unwrap();
        assert_eq!(map.position(), map.goal());
    }

    #[test]
    fn test_sensor_plan_ignores_known_obstacles() {
        let mut map = small_map(0.5, 0.5);
        map.set_obstacle_span(1, 0.0, 1.0).unwrap();
        let transport = MockTransport::auto_complete();
        let mut nav = navigation(&transport);

        let mut plan = SensorClimbingPlan::new(finder(), ClimbConfig::default());
        plan.execute(&mut map, &mut nav).unwrap();

        assert_eq!(map.position(), map.goal());
        assert!(!map.cell(5, 1).unwrap().is_obstacle);
        assert!(map.cell(0, 1).unwrap().is_obstacle);
    }

    #[test]
    fn test_sensor_plan_finishes_on_landing_without_route() {
        // goal on a margin cell can never be reached
        let mut map = small_map(0.5, 0.0);
        map.move_position_up().unwrap();
        map.move_position_up().unwrap();
        let transport = MockTransport::auto_complete();
        let mut nav = navigation(&transport);

        let mut plan = ClimbingPlan::Sensor(SensorClimbingPlan::new(finder(), ClimbConfig::default()));
        plan.execute(&mut map, &mut nav).unwrap();
        assert!(plan.path().is_empty());
        assert!(transport.get_written().is_empty());
    }

    #[test]
    fn test_sensor_plan_without_route_below_landing_fails() {
        let mut map = small_map(0.5, 0.0);
        let transport = MockTransport::auto_complete();
        let mut nav = navigation(&transport);

        let mut plan = SensorClimbingPlan::new(finder(), ClimbConfig::default());
        let err = plan.execute(&mut map, &mut nav).unwrap_err();
        assert!(matches!(err, ClimbError::NoPathFound));
    }

    #[test]
    fn test_plan_names() {
        let plan = ClimbingPlan::Sensor(SensorClimbingPlan::new(finder(), ClimbConfig::default()));
        assert!(plan.is_sensor());
        assert_eq!(plan.name(), "SensorClimbingPlan");
        let plan = ClimbingPlan::Path(PathClimbingPlan::new(Path::empty(5), finder(), ClimbConfig::default()));
        assert!(!plan.is_sensor());
        assert_eq!(plan.name(), "PathClimbingPlan");
    }
}
