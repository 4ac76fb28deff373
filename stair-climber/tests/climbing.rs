//! End-to-end climbs against a simulated drive

use stair_climber::planning::AStarObstacleAvoider;
use stair_climber::{
    survey, ClimbError, Config, CourseLayout, DynPathFinder, Movement, Navigation,
    PathClimbingPlan, PathFinder, PathFinderType, SilentSpeaker, StairsArea, StairsMap,
};
use tinyk_io::protocol::response_frame;
use tinyk_io::transport::{completed_exchange, failed_exchange};
use tinyk_io::{CommandError, CommandType, MockTransport, ResponseType};

fn narrow_stairs() -> StairsMap {
    let mut map = StairsMap::new(11, 3, 1, 2);
    map.initialize();
    map.set_start(0.8).unwrap();
    map.set_goal(0.3).unwrap();
    map
}

fn navigation(transport: &MockTransport) -> Navigation<MockTransport> {
    Navigation::with_transport(transport.clone(), Box::new(SilentSpeaker))
}

#[test]
fn test_left_obstacle_is_flagged_and_route_replanned() {
    let mut map = narrow_stairs();
    let start = map.start().unwrap();
    let goal = map.goal().unwrap();
    let path = AStarObstacleAvoider.find_path(&mut map, start, goal).unwrap();
    assert_eq!(path.movements()[0], Movement::Left);

    let mut failed = false;
    let transport = MockTransport::with_responder(move |frame| {
        if !failed && frame[1] as u16 == u16::from(CommandType::MoveLeft) {
            failed = true;
            failed_exchange(frame, CommandError::ObstacleDetectedLeft, 4)
        } else {
            completed_exchange(frame)
        }
    });
    let mut nav = navigation(&transport);

    let finder = DynPathFinder::new(PathFinderType::ObstacleAvoider);
    let mut plan = PathClimbingPlan::new(path, finder, Config::default().climb);
    plan.execute(&mut map, &mut nav).unwrap();

    assert!(map.cell(4, 0).unwrap().is_obstacle);
    assert_eq!(map.position(), map.goal());
    assert_eq!(map.position().unwrap().coordinates(), (2, 3));
}

#[test]
fn test_resend_during_climb_is_transparent() {
    let mut map = StairsMap::new(11, 3, 1, 2);
    map.initialize();
    map.set_start(0.5).unwrap();
    map.set_goal(0.5).unwrap();
    let start = map.start().unwrap();
    let goal = map.goal().unwrap();
    let path = AStarObstacleAvoider.find_path(&mut map, start, goal).unwrap();

    let mut garbled = false;
    let transport = MockTransport::with_responder(move |frame| {
        if !garbled && frame[1] as u16 == u16::from(CommandType::Climb) {
            garbled = true;
            let mut completed = response_frame(ResponseType::Completed, 10, 0);
            completed[6] = 0x00;
            vec![
                response_frame(ResponseType::Ack, 10, 0).to_vec(),
                completed.to_vec(),
            ]
        } else {
            completed_exchange(frame)
        }
    });
    let mut nav = navigation(&transport);

    let finder = DynPathFinder::new(PathFinderType::ObstacleAvoider);
    let mut plan = PathClimbingPlan::new(path, finder, Config::default().climb);
    plan.execute(&mut map, &mut nav).unwrap();

    assert_eq!(map.position(), map.goal());
    assert_eq!(transport.reconnect_count(), 1);
    let written = transport.get_written();
    let climbs: Vec<&Vec<u8>> = written.iter().filter(|f| f[1] == 10).collect();
    // first climb sent twice under one sequence number, second climb once
    assert_eq!(climbs.len(), 3);
    assert_eq!(climbs[0], climbs[1]);
}

#[test]
fn test_course_from_config_file_climbs_to_goal() {
    let toml = r#"
[stairs]
step_width_cm = 100
step_count = 3

[robot]
width_cm = 20
cell_width_cm = 5

[course]
start_x = 0.2
goal_x = 0.7
bricks = [
    { step = 1, from = 0.1, to = 0.45 },
    { step = 3, from = 0.5, to = 0.6 },
]

[planning]
path_finder = "space-optimized"
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stair-climber.toml");
    std::fs::write(&path, toml).unwrap();
    let config = Config::load(&path).unwrap();
    assert_eq!(config.planning.path_finder, PathFinderType::SpaceOptimized);

    let survey = survey(&mut CourseLayout::from_config(&config), &config).unwrap();
    let route = survey.path.clone().unwrap();
    assert_eq!(route.climb_count(), 4);
    assert!(survey.map.cell(6, 1).unwrap().is_obstacle);

    let transport = MockTransport::auto_complete();
    let mut area = StairsArea::new(survey.map, navigation(&transport), &config);
    area.formulate_plan(Some(route));
    area.climb().unwrap();

    assert!(!area.plan().unwrap().is_sensor());
    assert_eq!(area.map().position(), area.map().goal());
    assert!(area.map().is_in_target_area());
}

#[test]
fn test_unreachable_course_falls_back_and_reports_failure() {
    let mut config = Config::default();
    // a wall across the first step
    config.course.bricks = vec![stair_climber::config::BrickConfig {
        step: 1,
        from: 0.0,
        to: 1.0,
    }];
    let survey = survey(&mut CourseLayout::from_config(&config), &config).unwrap();
    assert!(survey.path.is_none());

    // the drive refuses to climb at all
    let transport = MockTransport::with_responder(|frame| {
        if frame[1] as u16 == u16::from(CommandType::Climb) {
            failed_exchange(frame, CommandError::ObstacleDetectedFront, 0)
        } else {
            completed_exchange(frame)
        }
    });
    let mut area = StairsArea::new(survey.map, navigation(&transport), &config);
    area.formulate_plan(survey.path);
    assert!(area.plan().unwrap().is_sensor());

    let err = area.climb().unwrap_err();
    assert!(matches!(err, ClimbError::NoPathFound));
    assert!(area.map().is_in_start_area());
}

#[test]
fn test_until_obstacle_stops_at_front_obstacle() {
    let transport = MockTransport::with_responder(|frame| {
        failed_exchange(frame, CommandError::ObstacleDetectedFront, 0)
    });
    let mut nav = navigation(&transport);

    assert!(nav.move_forward_until_obstacle(200).unwrap().success);
    assert!(!nav.move_forward(200).unwrap().success);
}
