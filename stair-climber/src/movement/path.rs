//! Run-length compressed movement sequences.

use super::{Movement, MovementInCm};
use std::fmt;

/// An executable path.
///
/// Built from raw movements, each worth one cell. Consecutive identical
/// sideways movements merge into one run; every climb stays its own run of
/// 0 cm. Runs are consumed one at a time through
/// [`get_next_movement`](Path::get_next_movement) and never restart.
#[derive(Debug, Clone)]
pub struct Path {
    movements: Vec<Movement>,
    cell_width_cm: i32,
    aggregated: Vec<MovementInCm>,
    next: usize,
}

impl Path {
    pub fn new(movements: Vec<Movement>, cell_width_cm: i32) -> Self {
        let aggregated = combine(&movements, cell_width_cm);
        Self {
            movements,
            cell_width_cm,
            aggregated,
            next: 0,
        }
    }

    /// A path with nothing left to do
    pub fn empty(cell_width_cm: i32) -> Self {
        Self::new(Vec::new(), cell_width_cm)
    }

    /// Next run to execute, or `None` once every run was handed out
    pub fn get_next_movement(&mut self) -> Option<MovementInCm> {
        let movement = self.aggregated.get(self.next).copied()?;
        self.next += 1;
        Some(movement)
    }

    /// Raw single-cell movements
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Compressed runs
    pub fn aggregated(&self) -> &[MovementInCm] {
        &self.aggregated
    }

    /// Runs not yet handed out
    pub fn remaining(&self) -> &[MovementInCm] {
        &self.aggregated[self.next..]
    }

    pub fn cell_width_cm(&self) -> i32 {
        self.cell_width_cm
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Number of climbs along the path
    pub fn climb_count(&self) -> usize {
        self.movements
            .iter()
            .filter(|m| **m == Movement::Climb)
            .count()
    }
}

fn combine(movements: &[Movement], cell_width_cm: i32) -> Vec<MovementInCm> {
    let mut combined: Vec<MovementInCm> = Vec::new();
    for &movement in movements {
        match combined.last_mut() {
            Some(last) if last.movement == movement && movement != Movement::Climb => {
                last.distance_cm += cell_width_cm;
            }
            _ => {
                let distance_cm = if movement == Movement::Climb {
                    0
                } else {
                    cell_width_cm
                };
                combined.push(MovementInCm::new(movement, distance_cm));
            }
        }
    }
    combined
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.movements == other.movements
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let runs: Vec<String> = self.aggregated.iter().map(|m| m.to_string()).collect();
        write!(f, "[{}]", runs.join(", "))
    }
}
