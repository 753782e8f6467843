//! Vertical-edge cursors. Mirror image of [`super::hedge`]: a v-edge runs
//! between column `c-1` and column `c`, keyed by the cell to its right, for
//! `0 <= c <= size2`. `first` is the cell to the left, `second` the cell to
//! the right.

use super::ViewCursor;
use crate::coord::Coordinate;
use crate::grid::Grid;

/// Reads the `(first, second)` pair for the v-edge keyed by `coord`.
pub fn v_edge_sides<T: Copy + PartialEq>(
    grid: &Grid<T>,
    coord: Coordinate,
) -> (Option<T>, Option<T>) {
    let first = grid.get(Coordinate::new(coord.row, coord.col - 1));
    let second = grid.get(Coordinate::new(coord.row, coord.col));
    (first, second)
}

/// Visits every v-edge in row-major order keyed by its right-cell
/// coordinate: the leftmost column of a row is a second-only edge, the
/// rightmost is a first-only edge.
pub struct VEdgeCursorRowMajor<'a, T: Copy + PartialEq> {
    grid: &'a Grid<T>,
    coord: Coordinate,
}

impl<'a, T: Copy + PartialEq> VEdgeCursorRowMajor<'a, T> {
    pub fn find_begin(grid: &'a Grid<T>) -> Self {
        VEdgeCursorRowMajor {
            grid,
            coord: Coordinate::new(0, 0),
        }
    }
}

impl<'a, T: Copy + PartialEq> ViewCursor for VEdgeCursorRowMajor<'a, T> {
    type Item = (Option<T>, Option<T>);

    fn find(&mut self, coord: Coordinate) {
        self.coord = coord;
    }

    fn advance(&mut self) {
        self.coord.col += 1;
        if self.coord.col > self.grid.size2() {
            self.coord.col = 0;
            self.coord.row += 1;
        }
    }

    fn coordinates(&self) -> Coordinate {
        self.coord
    }

    fn get(&self) -> (Option<T>, Option<T>) {
        v_edge_sides(self.grid, self.coord)
    }

    fn at_end(&self) -> bool {
        self.coord.row >= self.grid.size1()
    }
}
