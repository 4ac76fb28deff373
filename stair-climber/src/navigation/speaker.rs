//! Announcement sink.
//!
//! Announcements are telemetry: they never block, never fail and never
//! change what the robot does next.

use tinyk_io::RobotPosition;

/// Receives announcements of what the robot is doing.
///
/// Every method defaults to doing nothing, so a sink only overrides what it
/// reports.
pub trait Speaker {
    fn announce_initialize(&self) {}
    fn announce_shutdown(&self) {}
    fn announce_move_forward(&self) {}
    fn announce_move_forward_until_obstacle(&self) {}
    fn announce_move_backward(&self) {}
    fn announce_sideways_left(&self, _distance_cm: i32) {}
    fn announce_sideways_right(&self, _distance_cm: i32) {}
    fn announce_rotate_clockwise(&self) {}
    fn announce_rotate_counter_clockwise(&self) {}
    fn announce_rotate_camera(&self, _degrees: i32) {}
    fn announce_climb(&self) {}
    fn announce_change_robot_position(&self, _position: RobotPosition) {}

    fn announce_stairs_area_execute_climbing_plan(&self) {}
    fn announce_stairs_area_using_path_climbing_plan(&self) {}
    fn announce_stairs_area_using_sensor_climbing_plan(&self) {}
    fn announce_stairs_area_climbing_plan_failed_has_backup_plan(&self) {}
    fn announce_stairs_area_climbing_plan_failed_no_backup_plan(&self) {}

    fn announce_climbing_plan_error_found(&self) {}
    fn announce_climbing_plan_obstacle_found(&self) {}
    fn announce_climbing_plan_completed(&self) {}
}

/// Speaker that stays silent
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {}

/// Speaker that writes announcements to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn announce_initialize(&self) {
        log::info!("Initializing drive");
    }

    fn announce_shutdown(&self) {
        log::info!("Shutting down drive");
    }

    fn announce_move_forward(&self) {
        log::info!("Moving forward");
    }

    fn announce_move_forward_until_obstacle(&self) {
        log::info!("Moving forward until obstacle");
    }

    fn announce_move_backward(&self) {
        log::info!("Moving backward");
    }

    fn announce_sideways_left(&self, distance_cm: i32) {
        log::info!("Moving {} cm left", distance_cm);
    }

    fn announce_sideways_right(&self, distance_cm: i32) {
        log::info!("Moving {} cm right", distance_cm);
    }

    fn announce_rotate_clockwise(&self) {
        log::info!("Rotating clockwise");
    }

    fn announce_rotate_counter_clockwise(&self) {
        log::info!("Rotating counter-clockwise");
    }

    fn announce_rotate_camera(&self, degrees: i32) {
        log::info!("Tilting camera by {} degrees", degrees);
    }

    fn announce_climb(&self) {
        log::info!("Climbing");
    }

    fn announce_change_robot_position(&self, position: RobotPosition) {
        log::info!("Changing posture to {:?}", position);
    }

    fn announce_stairs_area_execute_climbing_plan(&self) {
        log::info!("Executing climbing plan");
    }

    fn announce_stairs_area_using_path_climbing_plan(&self) {
        log::info!("Using path climbing plan");
    }

    fn announce_stairs_area_using_sensor_climbing_plan(&self) {
        log::info!("Using sensor climbing plan");
    }

    fn announce_stairs_area_climbing_plan_failed_has_backup_plan(&self) {
        log::info!("Climbing plan failed, switching to backup plan");
    }

    fn announce_stairs_area_climbing_plan_failed_no_backup_plan(&self) {
        log::info!("Climbing plan failed, no backup plan left");
    }

    fn announce_climbing_plan_error_found(&self) {
        log::info!("Movement failed");
    }

    fn announce_climbing_plan_obstacle_found(&self) {
        log::info!("Obstacle found");
    }

    fn announce_climbing_plan_completed(&self) {
        log::info!("Climbing plan completed");
    }
}
