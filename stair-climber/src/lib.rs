//! StairClimber - Path planning and climbing control for a staircase robot
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   stairs_area                       │  ← Orchestration
//! │          (plan selection, sensor fallback)          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    climbing/                        │  ← Plan execution
//! │        (path plan, sensor plan, replanning)         │
//! └─────────────────────────────────────────────────────┘
//!              │                         │
//! ┌──────────────────────────┐ ┌────────────────────────┐
//! │        planning/         │ │      navigation/       │
//! │     (A* path finders)    │ │  (TinyK actions, speaker)
//! └──────────────────────────┘ └────────────────────────┘
//!              │                         │
//! ┌──────────────────────────┐ ┌────────────────────────┐
//! │   grid/ + movement/      │ │       tinyk-io         │
//! │  (stairs map, paths)     │ │  (frames, transport)   │
//! └──────────────────────────┘ └────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Print the planned route for the configured course
//! stair-climber --config stair-climber.toml plan
//!
//! # Climb without hardware
//! stair-climber climb --dry-run
//! ```

// Layer 1: Foundation
pub mod config;
pub mod error;
pub mod grid;
pub mod movement;

// Layer 2: Path search
pub mod planning;

// Layer 3: Drive control
pub mod navigation;

// Layer 4: Plans and orchestration
pub mod climbing;
pub mod stairs_area;

pub use climbing::{ClimbingPlan, PathClimbingPlan, SensorClimbingPlan};
pub use config::Config;
pub use error::{ClimbError, Result};
pub use grid::{Cell, CourseLayout, StairsMap, StairsMapSource};
pub use movement::{Movement, MovementInCm, Path};
pub use navigation::{LogSpeaker, Navigation, NavigationResult, SilentSpeaker, Speaker};
pub use planning::{DynPathFinder, PathFinder, PathFinderType};
pub use stairs_area::{survey, StairsArea, Survey};
