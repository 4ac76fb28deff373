//! A* with dense search state.
//!
//! Same Manhattan cost as [`AStarPathFinder`](super::AStarPathFinder), but
//! scores, predecessors and the closed set live in flat vectors indexed by
//! arena position instead of hash maps.

use super::astar::SearchNode;
use super::graph::{heuristic, neighbours, prepare, reconstruct};
use super::PathFinder;
use crate::grid::{Cell, StairsMap};
use crate::movement::Path;
use std::collections::BinaryHeap;

const NO_PREDECESSOR: usize = usize::MAX;

#[derive(Debug, Clone, Copy, Default)]
pub struct AStarSpaceOptimized;

impl PathFinder for AStarSpaceOptimized {
    fn find_path(&self, map: &mut StairsMap, start: Cell, goal: Cell) -> Option<Path> {
        let (start_index, goal_index) = prepare(map, &start, &goal, self.name())?;
        let map: &StairsMap = map;
        let cells = map.cells();
        let goal_cell = cells[goal_index];

        let mut g_score = vec![f64::INFINITY; cells.len()];
        let mut came_from = vec![NO_PREDECESSOR; cells.len()];
        let mut closed = vec![false; cells.len()];
        let mut open_set = BinaryHeap::new();

        g_score[start_index] = 0.0;
        open_set.push(SearchNode::new(
            map,
            start_index,
            heuristic(&cells[start_index], &goal_cell),
        ));

        while let Some(current) = open_set.pop() {
            if current.index == goal_index {
                break;
            }
            if closed[current.index] {
                continue;
            }
            closed[current.index] = true;

            for (neighbour, _) in neighbours(map, current.index) {
                if closed[neighbour] {
                    continue;
                }
                let a = &cells[current.index];
                let b = &cells[neighbour];
                let step_cost =
                    ((a.cell_number - b.cell_number).abs() + (a.step_number - b.step_number).abs()) as f64;
                let tentative_g = g_score[current.index] + step_cost;

                if tentative_g < g_score[neighbour] {
                    g_score[neighbour] = tentative_g;
                    came_from[neighbour] = current.index;
                    open_set.push(SearchNode::new(
                        map,
                        neighbour,
                        tentative_g + heuristic(b, &goal_cell),
                    ));
                }
            }
        }

        reconstruct(map, start_index, goal_index, |index| {
            let previous = came_from[index];
            (previous != NO_PREDECESSOR).then_some(previous)
        })
    }

    fn name(&self) -> &'static str {
        "AStarSpaceOptimized"
    }
}
