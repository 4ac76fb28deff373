//! Stairs area: plan selection and fallback for one ascent

use crate::climbing::{ClimbingPlan, PathClimbingPlan, SensorClimbingPlan};
use crate::config::{ClimbConfig, Config, PlanningConfig};
use crate::error::{ClimbError, Result};
use crate::grid::{StairsMap, StairsMapSource};
use crate::movement::Path;
use crate::navigation::Navigation;
use crate::planning::{DynPathFinder, PathFinder};
use tinyk_io::Transport;

/// Map with start and goal placed, plus the route found on it
pub struct Survey {
    pub map: StairsMap,
    /// `None` when no map could be built or no route exists on it
    pub path: Option<Path>,
}

/// Build the map from `source` and plan the initial route.
///
/// Without a usable map an obstacle-free map of the configured stairs is
/// returned so the sensor plan has something to work on.
pub fn survey(source: &mut dyn StairsMapSource, config: &Config) -> Result<Survey> {
    let (mut map, surveyed) = match source.build_stairs_map() {
        Some(map) => (map, true),
        None => {
            log::warn!("No stairs map available, continuing on a blank map");
            let map = StairsMap::for_stairs(
                &config.stairs,
                config.robot.cell_width_cm,
                config.robot.width_cm,
            );
            (map, false)
        }
    };

    map.set_start(config.course.start_x)?;
    map.set_goal(config.course.goal_position())?;

    let path = if surveyed {
        let start = map.start().ok_or(ClimbError::MissingStart)?;
        let goal = map.goal().ok_or(ClimbError::MissingGoal)?;
        DynPathFinder::new(config.planning.path_finder).find_path(&mut map, start, goal)
    } else {
        None
    };
    log::info!("Survey:\n{}", map.render(path.as_ref()));

    Ok(Survey { map, path })
}

/// Owns the map and navigation while the stairs are climbed
pub struct StairsArea<T: Transport> {
    map: StairsMap,
    navigation: Navigation<T>,
    plan: Option<ClimbingPlan>,
    planning: PlanningConfig,
    climb: ClimbConfig,
}

impl<T: Transport> StairsArea<T> {
    pub fn new(map: StairsMap, navigation: Navigation<T>, config: &Config) -> Self {
        Self {
            map,
            navigation,
            plan: None,
            planning: config.planning.clone(),
            climb: config.climb.clone(),
        }
    }

    pub fn map(&self) -> &StairsMap {
        &self.map
    }

    pub fn navigation(&self) -> &Navigation<T> {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut Navigation<T> {
        &mut self.navigation
    }

    pub fn plan(&self) -> Option<&ClimbingPlan> {
        self.plan.as_ref()
    }

    /// Follow `path` if one is known, otherwise rely on the sensors
    pub fn formulate_plan(&mut self, path: Option<Path>) {
        let plan = match path {
            Some(path) => {
                self.navigation
                    .speaker()
                    .announce_stairs_area_using_path_climbing_plan();
                ClimbingPlan::Path(PathClimbingPlan::new(
                    path,
                    DynPathFinder::new(self.planning.path_finder),
                    self.climb.clone(),
                ))
            }
            None => {
                self.navigation
                    .speaker()
                    .announce_stairs_area_using_sensor_climbing_plan();
                self.sensor_plan()
            }
        };
        log::info!("StairsArea: formulated {}", plan.name());
        self.plan = Some(plan);
    }

    /// Execute the plan, falling back to the sensor plan once.
    ///
    /// A failing sensor plan is final.
    pub fn climb(&mut self) -> Result<()> {
        let Some(plan) = self.plan.as_mut() else {
            return Err(ClimbError::NoPlan);
        };

        self.navigation
            .speaker()
            .announce_stairs_area_execute_climbing_plan();
        let Err(e) = plan.execute(&mut self.map, &mut self.navigation) else {
            return Ok(());
        };

        if plan.is_sensor() {
            self.navigation
                .speaker()
                .announce_stairs_area_climbing_plan_failed_no_backup_plan();
            log::error!("StairsArea: {} failed, no backup left: {}", plan.name(), e);
            return Err(e);
        }

        self.navigation
            .speaker()
            .announce_stairs_area_climbing_plan_failed_has_backup_plan();
        log::warn!("StairsArea: {} failed ({}), switching to sensor plan", plan.name(), e);

        let mut backup = self.sensor_plan();
        let outcome = backup.execute(&mut self.map, &mut self.navigation);
        self.plan = Some(backup);
        if let Err(e) = &outcome {
            self.navigation
                .speaker()
                .announce_stairs_area_climbing_plan_failed_no_backup_plan();
            log::error!("StairsArea: sensor plan failed: {}", e);
        }
        outcome
    }

    fn sensor_plan(&self) -> ClimbingPlan {
        ClimbingPlan::Sensor(SensorClimbingPlan::new(
            DynPathFinder::new(self.planning.sensor_path_finder),
            self.climb.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CourseLayout;
    use crate::navigation::SilentSpeaker;
    use tinyk_io::transport::{completed_exchange, failed_exchange};
    use tinyk_io::{CommandError, MockTransport};

    struct NoMap;

    impl StairsMapSource for NoMap {
        fn build_stairs_map(&mut self) -> Option<StairsMap> {
            None
        }
    }

    fn area(map: StairsMap, transport: &MockTransport) -> StairsArea<MockTransport> {
        let navigation = Navigation::with_transport(transport.clone(), Box::new(SilentSpeaker));
        StairsArea::new(map, navigation, &Config::default())
    }

    #[test]
    fn test_survey_plans_on_course_layout() {
        let config = Config::default();
        let mut source = CourseLayout::from_config(&config);
        let survey = survey(&mut source, &config).unwrap();

        let path = survey.path.unwrap();
        assert_eq!(path.climb_count(), config.stairs.step_count as usize + 1);
        assert!(survey.map.is_in_start_area());
    }

    #[test]
    fn test_survey_without_map_has_no_path() {
        let config = Config::default();
        let survey = survey(&mut NoMap, &config).unwrap();

        assert!(survey.path.is_none());
        assert_eq!(survey.map.height(), config.stairs.step_count + 2);
        assert!(survey.map.goal().is_some());
    }

    #[test]
    fn test_formulate_plan_selects_variant() {
        let config = Config::default();
        let survey = survey(&mut CourseLayout::from_config(&config), &config).unwrap();
        let transport = MockTransport::auto_complete();

        let mut stairs = area(survey.map.clone(), &transport);
        stairs.formulate_plan(survey.path);
        assert!(!stairs.plan().unwrap().is_sensor());

        stairs.formulate_plan(None);
        assert!(stairs.plan().unwrap().is_sensor());
    }

    #[test]
    fn test_climb_without_plan() {
        let config = Config::default();
        let survey = survey(&mut NoMap, &config).unwrap();
        let mut stairs = area(survey.map, &MockTransport::auto_complete());
        assert!(matches!(stairs.climb(), Err(ClimbError::NoPlan)));
    }

    #[test]
    fn test_failed_path_plan_falls_back_to_sensor_plan() {
        let config = Config::default();
        let survey = survey(&mut CourseLayout::from_config(&config), &config).unwrap();
        // first climb reports something no rule handles
        let mut failed = false;
        let transport = MockTransport::with_responder(move |frame| {
            if !failed && frame[1] == 10 {
                failed = true;
                failed_exchange(frame, CommandError::UnknownCommand, 0)
            } else {
                completed_exchange(frame)
            }
        });

        let mut stairs = area(survey.map, &transport);
        stairs.formulate_plan(survey.path);
        stairs.climb().unwrap();

        assert!(stairs.plan().unwrap().is_sensor());
        assert_eq!(stairs.map().position(), stairs.map().goal());
    }

    #[test]
    fn test_failed_sensor_plan_is_final() {
        let config = Config::default();
        let survey = survey(&mut NoMap, &config).unwrap();
        let transport = MockTransport::with_responder(|frame| {
            failed_exchange(frame, CommandError::InvalidCommand, 0)
        });

        let mut stairs = area(survey.map, &transport);
        stairs.formulate_plan(None);
        let err = stairs.climb().unwrap_err();
        assert!(matches!(err, ClimbError::UnhandledFailure { .. }));
    }
}
