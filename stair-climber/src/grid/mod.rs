//! Stairs grid model.
//!
//! The staircase is a `width × height` grid: row 0 is the floor in front of
//! the stairs, the last row is the top landing and every row in between is
//! one step. Cells live in a flat arena indexed by `step * width + cell`;
//! start, goal and the current position are indices into that arena.
//!
//! Side margins half a robot wide are obstacles on every row, so a planned
//! route never puts the robot over the edge of the stairs.

mod render;
mod source;

pub use source::{CourseLayout, StairsMapSource};

use crate::config::StairsConfig;
use crate::error::{ClimbError, Result};

/// One discrete position on the stairs.
///
/// Equality only looks at the coordinates and the obstacle flag.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub step_number: i32,
    pub cell_number: i32,
    pub is_obstacle: bool,
    pub is_start: bool,
    pub is_end: bool,
}

impl Cell {
    pub fn new(step_number: i32, cell_number: i32) -> Self {
        Self {
            step_number,
            cell_number,
            is_obstacle: false,
            is_start: false,
            is_end: false,
        }
    }

    /// `(step_number, cell_number)`
    #[inline]
    pub fn coordinates(&self) -> (i32, i32) {
        (self.step_number, self.cell_number)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.step_number == other.step_number
            && self.cell_number == other.cell_number
            && self.is_obstacle == other.is_obstacle
    }
}

impl Eq for Cell {}

/// Mutable grid model of the staircase.
#[derive(Debug, Clone)]
pub struct StairsMap {
    width: i32,
    height: i32,
    cell_width_cm: i32,
    robot_width_cm: i32,
    cells: Vec<Cell>,
    position: Option<usize>,
    start: Option<usize>,
    goal: Option<usize>,
}

impl StairsMap {
    /// Create an empty map; call [`initialize`](Self::initialize) before use.
    pub fn new(width: i32, height: i32, cell_width_cm: i32, robot_width_cm: i32) -> Self {
        Self {
            width,
            height,
            cell_width_cm,
            robot_width_cm,
            cells: Vec::new(),
            position: None,
            start: None,
            goal: None,
        }
    }

    /// Initialized map sized for the given stairs.
    ///
    /// Width is `step_width_cm / cell_width_cm`, height is the step count
    /// plus the floor and the top landing.
    pub fn for_stairs(stairs: &StairsConfig, cell_width_cm: i32, robot_width_cm: i32) -> Self {
        let width = if cell_width_cm > 0 {
            stairs.step_width_cm / cell_width_cm
        } else {
            0
        };
        let mut map = Self::new(width, stairs.step_count + 2, cell_width_cm, robot_width_cm);
        map.initialize();
        map
    }

    // ========================================================================
    // Dimensions
    // ========================================================================

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_width_cm(&self) -> i32 {
        self.cell_width_cm
    }

    pub fn robot_width_cm(&self) -> i32 {
        self.robot_width_cm
    }

    /// Cells blocked on each side of every row
    pub fn margin_cells(&self) -> i32 {
        cm_to_cells_ceil(self.robot_width_cm as f64 * 0.5, self.cell_width_cm)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Populate every cell and block the side margins.
    ///
    /// Rebuilds the arena from scratch, which also drops start, goal and
    /// position.
    pub fn initialize(&mut self) {
        let width = self.width.max(0);
        let height = self.height.max(0);
        self.cells = (0..height)
            .flat_map(|step| (0..width).map(move |cell| Cell::new(step, cell)))
            .collect();
        self.position = None;
        self.start = None;
        self.goal = None;
        self.set_obstacles_on_side();
    }

    /// Forget every obstacle except the side margins
    pub fn clear_obstacles(&mut self) {
        for cell in &mut self.cells {
            cell.is_obstacle = false;
        }
        self.set_obstacles_on_side();
    }

    fn set_obstacles_on_side(&mut self) {
        let margin = self.margin_cells();
        let width = self.width;
        for cell in &mut self.cells {
            if cell.cell_number < margin || cell.cell_number >= width - margin {
                cell.is_obstacle = true;
            }
        }
    }

    // ========================================================================
    // Start / goal / position
    // ========================================================================

    /// Put start and position on the floor at the normalized x-position
    pub fn set_start(&mut self, normalized_x: f64) -> Result<()> {
        let index = self.normalized_index(normalized_x, 0)?;
        log::info!(
            "set_start: normalized x {} -> cell {}",
            normalized_x,
            self.cells[index].cell_number
        );
        self.flag_start(index);
        self.position = Some(index);
        Ok(())
    }

    /// Put the goal on the top landing at the normalized x-position
    pub fn set_goal(&mut self, normalized_x: f64) -> Result<()> {
        let index = self.normalized_index(normalized_x, self.height - 1)?;
        log::info!(
            "set_goal: normalized x {} -> cell {}",
            normalized_x,
            self.cells[index].cell_number
        );
        self.flag_goal(index);
        Ok(())
    }

    /// Move the start flag to an existing cell
    pub fn set_start_cell(&mut self, cell: &Cell) -> Result<()> {
        let index = self.require_index(cell.cell_number, cell.step_number)?;
        self.flag_start(index);
        Ok(())
    }

    /// Move the goal flag to an existing cell
    pub fn set_goal_cell(&mut self, cell: &Cell) -> Result<()> {
        let index = self.require_index(cell.cell_number, cell.step_number)?;
        self.flag_goal(index);
        Ok(())
    }

    fn flag_start(&mut self, index: usize) {
        if let Some(old) = self.start {
            self.cells[old].is_start = false;
        }
        self.cells[index].is_start = true;
        self.start = Some(index);
    }

    fn flag_goal(&mut self, index: usize) {
        if let Some(old) = self.goal {
            self.cells[old].is_end = false;
        }
        self.cells[index].is_end = true;
        self.goal = Some(index);
    }

    pub fn start(&self) -> Option<Cell> {
        self.start.map(|i| self.cells[i])
    }

    pub fn goal(&self) -> Option<Cell> {
        self.goal.map(|i| self.cells[i])
    }

    /// Current logical position of the robot
    pub fn position(&self) -> Option<Cell> {
        self.position.map(|i| self.cells[i])
    }

    pub fn is_in_target_area(&self) -> bool {
        self.position()
            .is_some_and(|cell| cell.step_number == self.height - 1)
    }

    pub fn is_in_start_area(&self) -> bool {
        self.position().is_some_and(|cell| cell.step_number == 0)
    }

    fn normalized_index(&self, normalized_x: f64, step_number: i32) -> Result<usize> {
        let cell_number = (self.width as f64 * normalized_x).floor();
        if !(0.0..self.width as f64).contains(&cell_number) {
            return Err(ClimbError::PositionOutOfRange(normalized_x));
        }
        self.require_index(cell_number as i32, step_number)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub(crate) fn index(&self, cell_number: i32, step_number: i32) -> Option<usize> {
        if cell_number < 0 || cell_number >= self.width {
            return None;
        }
        if step_number < 0 || step_number >= self.height {
            return None;
        }
        let index = (step_number * self.width + cell_number) as usize;
        (index < self.cells.len()).then_some(index)
    }

    fn require_index(&self, cell_number: i32, step_number: i32) -> Result<usize> {
        self.index(cell_number, step_number).ok_or_else(|| {
            log::error!(
                "Cell {} on step {} is not part of the map",
                cell_number,
                step_number
            );
            ClimbError::CellNotFound {
                cell_number,
                step_number,
            }
        })
    }

    /// Exact lookup of a cell
    pub fn get_position(&self, cell_number: i32, step_number: i32) -> Result<Cell> {
        self.require_index(cell_number, step_number)
            .map(|i| self.cells[i])
    }

    /// Non-failing lookup
    pub fn cell(&self, cell_number: i32, step_number: i32) -> Option<&Cell> {
        self.index(cell_number, step_number).map(|i| &self.cells[i])
    }

    fn require_position(&self) -> Result<Cell> {
        self.position().ok_or(ClimbError::MissingPosition)
    }

    // ========================================================================
    // Obstacles
    // ========================================================================

    pub fn set_obstacle(&mut self, cell_number: i32, step_number: i32) -> Result<()> {
        let index = self.require_index(cell_number, step_number)?;
        self.cells[index].is_obstacle = true;
        Ok(())
    }

    pub fn set_obstacle_left(&mut self) -> Result<()> {
        let position = self.require_position()?;
        self.set_obstacle(position.cell_number - 1, position.step_number)
    }

    pub fn set_obstacle_right(&mut self) -> Result<()> {
        let position = self.require_position()?;
        self.set_obstacle(position.cell_number + 1, position.step_number)
    }

    /// Block the cell one step above the position
    pub fn set_obstacle_front(&mut self) -> Result<()> {
        let position = self.require_position()?;
        self.set_obstacle(position.cell_number, position.step_number + 1)
    }

    /// Block the cell `distance_cm` to the left, at least one cell away
    pub fn set_obstacle_left_in_distance(&mut self, distance_cm: i32) -> Result<()> {
        let position = self.require_position()?;
        let offset = cm_to_cells_ceil(distance_cm as f64, self.cell_width_cm).max(1);
        self.set_obstacle(position.cell_number - offset, position.step_number)
    }

    /// Block the cell `distance_cm` to the right, at least one cell away
    pub fn set_obstacle_right_in_distance(&mut self, distance_cm: i32) -> Result<()> {
        let position = self.require_position()?;
        let offset = cm_to_cells_ceil(distance_cm as f64, self.cell_width_cm).max(1);
        self.set_obstacle(position.cell_number + offset, position.step_number)
    }

    /// Block every cell of a row covered by a normalized span
    ///
    /// Cells with `from * width <= cell_number <= to * width` become obstacles.
    pub fn set_obstacle_span(&mut self, step_number: i32, from: f64, to: f64) -> Result<()> {
        if step_number < 0 || step_number >= self.height || self.cells.is_empty() {
            return Err(ClimbError::CellNotFound {
                cell_number: 0,
                step_number,
            });
        }
        let low = from * self.width as f64;
        let high = to * self.width as f64;
        let row_start = (step_number * self.width) as usize;
        for cell in &mut self.cells[row_start..row_start + self.width as usize] {
            let x = cell.cell_number as f64;
            if x >= low && x <= high {
                cell.is_obstacle = true;
            }
        }
        Ok(())
    }

    /// Smaller of the free runs to the left and right of a cell
    ///
    /// Both runs include the cell itself and the first obstacle (or the
    /// last cell before the edge), so an obstacle-free row yields
    /// `min(cell_number + 1, width - cell_number)`.
    pub fn get_minimal_sideways_obstacle_distance(&self, cell_number: i32, step_number: i32) -> i32 {
        let blocked = |c: i32| {
            self.cell(c, step_number)
                .map_or(true, |cell| cell.is_obstacle)
        };

        let mut right = 0;
        for c in cell_number..self.width {
            right += 1;
            if blocked(c) {
                break;
            }
        }

        let mut left = 0;
        for c in (0..=cell_number.min(self.width - 1)).rev() {
            left += 1;
            if blocked(c) {
                break;
            }
        }

        left.min(right)
    }

    // ========================================================================
    // Position updates
    // ========================================================================

    fn move_position(&mut self, cell_offset: i32, step_offset: i32) -> Result<()> {
        let position = self.require_position()?;
        let index = self.require_index(
            position.cell_number + cell_offset,
            position.step_number + step_offset,
        )?;
        self.position = Some(index);
        Ok(())
    }

    pub fn move_position_left(&mut self) -> Result<()> {
        self.move_position(-1, 0)
    }

    pub fn move_position_right(&mut self) -> Result<()> {
        self.move_position(1, 0)
    }

    pub fn move_position_up(&mut self) -> Result<()> {
        self.move_position(0, 1)
    }

    /// Move the position by whole cells covered by `distance_cm`
    pub fn move_position_left_in_distance(&mut self, distance_cm: i32) -> Result<()> {
        self.move_position(-self.cm_to_cells_floor(distance_cm), 0)
    }

    pub fn move_position_right_in_distance(&mut self, distance_cm: i32) -> Result<()> {
        self.move_position(self.cm_to_cells_floor(distance_cm), 0)
    }

    fn cm_to_cells_floor(&self, distance_cm: i32) -> i32 {
        if self.cell_width_cm <= 0 {
            return 0;
        }
        distance_cm / self.cell_width_cm
    }
}

fn cm_to_cells_ceil(distance_cm: f64, cell_width_cm: i32) -> i32 {
    if cell_width_cm <= 0 {
        return 0;
    }
    (distance_cm / cell_width_cm as f64).ceil() as i32
}

impl PartialEq for StairsMap {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}
