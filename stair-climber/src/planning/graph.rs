//! Graph over the reachable, non-obstacle part of the grid.
//!
//! Edges lead left, right and one step up. Nodes are arena indices of the
//! map; adjacency is computed on demand.

use crate::grid::{Cell, StairsMap};
use crate::movement::{Movement, Path};

/// Non-obstacle neighbours of a cell with the movement leading there
pub(crate) fn neighbours(map: &StairsMap, index: usize) -> Vec<(usize, Movement)> {
    let cell = &map.cells()[index];
    let candidates = [
        (cell.cell_number - 1, cell.step_number, Movement::Left),
        (cell.cell_number + 1, cell.step_number, Movement::Right),
        (cell.cell_number, cell.step_number + 1, Movement::Climb),
    ];

    let mut result = Vec::with_capacity(3);
    for (cell_number, step_number, movement) in candidates {
        if let Some(next) = map.index(cell_number, step_number) {
            if !map.cells()[next].is_obstacle {
                result.push((next, movement));
            }
        }
    }
    result
}

/// Mark every node reachable from `start` (worklist, no recursion)
pub(crate) fn reachable(map: &StairsMap, start: usize) -> Vec<bool> {
    let mut visited = vec![false; map.cells().len()];
    let mut worklist = vec![start];
    visited[start] = true;

    while let Some(current) = worklist.pop() {
        for (next, _) in neighbours(map, current) {
            if !visited[next] {
                visited[next] = true;
                worklist.push(next);
            }
        }
    }
    visited
}

/// Mark the endpoints and check the goal is part of the graph.
///
/// Returns the arena indices of start and goal.
pub(crate) fn prepare(
    map: &mut StairsMap,
    start: &Cell,
    goal: &Cell,
    finder: &str,
) -> Option<(usize, usize)> {
    if let Err(e) = map.set_start_cell(start).and_then(|_| map.set_goal_cell(goal)) {
        log::warn!("{}: invalid endpoints: {}", finder, e);
        return None;
    }
    let start_index = map.index(start.cell_number, start.step_number)?;
    let goal_index = map.index(goal.cell_number, goal.step_number)?;

    if !reachable(map, start_index)[goal_index] {
        log::info!("{}: no path found", finder);
        return None;
    }
    Some((start_index, goal_index))
}

/// Heuristic: steps still to climb
#[inline]
pub(crate) fn heuristic(cell: &Cell, goal: &Cell) -> f64 {
    (goal.step_number - cell.step_number) as f64
}

/// Walk predecessors back from `goal` and turn the chain into a path.
///
/// `None` if the chain does not lead back to `start`.
pub(crate) fn reconstruct<F>(map: &StairsMap, start: usize, goal: usize, predecessor: F) -> Option<Path>
where
    F: Fn(usize) -> Option<usize>,
{
    let mut chain = vec![goal];
    let mut current = goal;
    while current != start {
        current = predecessor(current)?;
        chain.push(current);
        if chain.len() > map.cells().len() {
            return None;
        }
    }
    chain.reverse();

    let cells = map.cells();
    let movements = chain
        .windows(2)
        .map(|pair| Movement::between(cells[pair[0]].coordinates(), cells[pair[1]].coordinates()))
        .collect::<Option<Vec<_>>>()?;

    let path = Path::new(movements, map.cell_width_cm());
    log::debug!("Path found: {}\n{}", path, map.render(Some(&path)));
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_skip_obstacles_and_edges() {
        let mut map = StairsMap::new(4, 3, 5, 0);
        map.initialize();
        map.set_obstacle(2, 0).unwrap();

        let index = map.index(1, 0).unwrap();
        let found: Vec<Movement> = neighbours(&map, index).into_iter().map(|(_, m)| m).collect();
        assert_eq!(found, vec![Movement::Left, Movement::Climb]);

        let top_corner = map.index(3, 2).unwrap();
        let found: Vec<Movement> = neighbours(&map, top_corner)
            .into_iter()
            .map(|(_, m)| m)
            .collect();
        assert_eq!(found, vec![Movement::Left]);
    }

    #[test]
    fn test_reachable_never_descends() {
        let mut map = StairsMap::new(3, 3, 5, 0);
        map.initialize();

        let visited = reachable(&map, map.index(1, 1).unwrap());
        assert!(!visited[map.index(1, 0).unwrap()]);
        assert!(visited[map.index(0, 1).unwrap()]);
        assert!(visited[map.index(2, 2).unwrap()]);
    }
}
