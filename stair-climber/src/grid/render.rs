//! Text rendering of the grid for logs and the CLI.

use super::StairsMap;
use crate::movement::{Movement, Path};
use std::collections::HashSet;

impl StairsMap {
    /// Render the grid, top landing first.
    ///
    /// `R` position, `S` start, `G` goal, `#` obstacle, `*` cell visited by
    /// `path` (walked from the start cell), `.` free.
    pub fn render(&self, path: Option<&Path>) -> String {
        let visited = path
            .map(|path| self.path_cells(path))
            .unwrap_or_default();
        let position = self.position().map(|cell| cell.coordinates());

        let mut out = String::with_capacity(((self.width + 8) * self.height) as usize);
        for step in (0..self.height).rev() {
            out.push_str(&format!("{:>2} ", step));
            for cell_number in 0..self.width {
                let Some(cell) = self.cell(cell_number, step) else {
                    out.push(' ');
                    continue;
                };
                let symbol = if position == Some(cell.coordinates()) {
                    'R'
                } else if cell.is_start {
                    'S'
                } else if cell.is_end {
                    'G'
                } else if cell.is_obstacle {
                    '#'
                } else if visited.contains(&cell.coordinates()) {
                    '*'
                } else {
                    '.'
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }

    fn path_cells(&self, path: &Path) -> HashSet<(i32, i32)> {
        let mut visited = HashSet::new();
        let Some(start) = self.start() else {
            return visited;
        };
        let (mut step, mut cell) = start.coordinates();
        for movement in path.movements() {
            match movement {
                Movement::Left => cell -= 1,
                Movement::Right => cell += 1,
                Movement::Climb => step += 1,
            }
            visited.insert((step, cell));
        }
        visited
    }
}
