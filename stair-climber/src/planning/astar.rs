//! A* search with pluggable edge costs.
//!
//! The open set is a binary heap keyed by `g + h`; ties are broken by the
//! smaller `(step_number, cell_number)` so the expansion order is stable.
//! Scores and predecessors are kept in hash maps keyed by arena index.

use super::graph::{heuristic, neighbours, prepare, reconstruct};
use super::PathFinder;
use crate::grid::{Cell, StairsMap};
use crate::movement::Path;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Edge cost shaping of the hash-map based finders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CostModel {
    /// `|Δcell| + |Δstep|`
    Manhattan,
    /// Manhattan plus the squared lack of clearance on the destination step
    Clearance,
    /// Manhattan plus the squared distance from the centre column
    CenterBias,
}

impl CostModel {
    pub(crate) fn cost(self, map: &StairsMap, a: &Cell, b: &Cell) -> f64 {
        let cell_dist = (a.cell_number - b.cell_number).abs();
        let step_dist = (a.step_number - b.step_number).abs();
        let manhattan = cell_dist + step_dist;

        let cost = match self {
            CostModel::Manhattan => manhattan,
            CostModel::Clearance => {
                if b.is_end {
                    // Reaching the goal only counts progress
                    b.step_number - a.step_number
                } else if step_dist > 0 {
                    let clearance =
                        map.get_minimal_sideways_obstacle_distance(b.cell_number, b.step_number);
                    let tightness = (map.width() / 2 - clearance).max(0);
                    manhattan + step_dist * tightness * tightness
                } else {
                    manhattan
                }
            }
            CostModel::CenterBias => {
                if step_dist > 0 {
                    let offset = b.cell_number - map.width() / 2;
                    manhattan + offset * offset
                } else {
                    manhattan
                }
            }
        };
        cost as f64
    }
}

/// Open set entry
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchNode {
    pub index: usize,
    pub f_score: f64,
    pub coordinates: (i32, i32),
}

impl SearchNode {
    pub(crate) fn new(map: &StairsMap, index: usize, f_score: f64) -> Self {
        Self {
            index,
            f_score,
            coordinates: map.cells()[index].coordinates(),
        }
    }
}

impl Eq for SearchNode {}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower f_score = higher priority)
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.coordinates.cmp(&self.coordinates))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(crate) fn search(
    map: &mut StairsMap,
    start: &Cell,
    goal: &Cell,
    cost_model: CostModel,
    finder: &str,
) -> Option<Path> {
    let (start_index, goal_index) = prepare(map, start, goal, finder)?;
    let map: &StairsMap = map;
    let cells = map.cells();
    let goal_cell = cells[goal_index];

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<usize, usize> = HashMap::new();
    let mut g_score: HashMap<usize, f64> = HashMap::new();

    g_score.insert(start_index, 0.0);
    open_set.push(SearchNode::new(
        map,
        start_index,
        heuristic(&cells[start_index], &goal_cell),
    ));

    while let Some(current) = open_set.pop() {
        if current.index == goal_index {
            break;
        }

        let current_g = g_score
            .get(&current.index)
            .copied()
            .unwrap_or(f64::INFINITY);

        for (neighbour, _) in neighbours(map, current.index) {
            let tentative_g =
                current_g + cost_model.cost(map, &cells[current.index], &cells[neighbour]);

            if tentative_g < g_score.get(&neighbour).copied().unwrap_or(f64::INFINITY) {
                came_from.insert(neighbour, current.index);
                g_score.insert(neighbour, tentative_g);

                let f = tentative_g + heuristic(&cells[neighbour], &goal_cell);
                open_set.push(SearchNode::new(map, neighbour, f));
            }
        }
    }

    reconstruct(map, start_index, goal_index, |index| {
        came_from.get(&index).copied()
    })
}

/// A* with Manhattan edge cost
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPathFinder;

impl PathFinder for AStarPathFinder {
    fn find_path(&self, map: &mut StairsMap, start: Cell, goal: Cell) -> Option<Path> {
        search(map, &start, &goal, CostModel::Manhattan, self.name())
    }

    fn name(&self) -> &'static str {
        "AStarPathFinder"
    }
}

/// A* that keeps climbs away from tight gaps.
///
/// Climbing onto a cell costs `1 + (width/2 - clearance)²` where clearance
/// is the minimal sideways obstacle distance of that cell. Edges into the
/// goal only cost their step progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarObstacleAvoider;

impl PathFinder for AStarObstacleAvoider {
    fn find_path(&self, map: &mut StairsMap, start: Cell, goal: Cell) -> Option<Path> {
        search(map, &start, &goal, CostModel::Clearance, self.name())
    }

    fn name(&self) -> &'static str {
        "AStarObstacleAvoider"
    }
}

/// A* that prefers climbing close to the centre column
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarCenterBias;

impl PathFinder for AStarCenterBias {
    fn find_path(&self, map: &mut StairsMap, start: Cell, goal: Cell) -> Option<Path> {
        search(map, &start, &goal, CostModel::CenterBias, self.name())
    }

    fn name(&self) -> &'static str {
        "AStarCenterBias"
    }
}
