//! Square-window sweep engine: O(1)-amortised per cell, using a column
//! buffer of `size2` (pixel) or `size2`/`size2+1`
//! (h/v-edge) indicators. Grounded in `whitebox_tools`' `DiversityFilter`
//! tool, which already implements exactly this trick by hand for a single
//! hard-coded indicator (a category histogram): on each column step it
//! removes the trailing column's contribution from a running histogram and
//! adds the leading column's, rather than rescanning the whole window. This
//! engine generalises that same column-buffer technique to an arbitrary
//! [`crate::indicator::Indicator`].

use crate::coord::Coordinate;
use crate::grid::Grid;
use crate::indicator::Indicator;
use crate::view::hedge::h_edge_sides;
use crate::view::vedge::v_edge_sides;
use std::rc::Rc;

fn clamp_hi(radius: i32, limit_inclusive: i32) -> i32 {
    radius.min(limit_inclusive)
}

/// Incremental square-window sweep over pixel samples: one column buffer,
/// refreshed on row wrap; the live indicator refreshed on every column step.
///
/// `sample_fn` converts a raw grid cell into the indicator's `Sample` type
/// (identity for indicators that consume the cell value directly, or a
/// `(value, weight)` pair for weighted indicators such as [`crate::indicator::Mean`]).
pub struct SquareWindowPixelIter<T, I, F>
where
    T: Copy + PartialEq,
    I: Indicator,
    F: Fn(T) -> I::Sample,
{
    grid: Rc<Grid<T>>,
    radius: i32,
    sample_fn: F,
    template: I,
    column_buffer: Vec<I>,
    live: I,
    row: i32,
    col: i32,
}

impl<T, I, F> SquareWindowPixelIter<T, I, F>
where
    T: Copy + PartialEq,
    I: Indicator,
    F: Fn(T) -> I::Sample,
{
    /// Initialises the sweep state for cell `(0, 0)`.
    pub fn new(grid: Rc<Grid<T>>, radius: i32, template: I, sample_fn: F) -> Self {
        let size1 = grid.size1();
        let size2 = grid.size2();
        let mut column_buffer: Vec<I> = (0..size2.max(0)).map(|_| template.clone()).collect();

        if size1 > 0 && size2 > 0 {
            let row_hi = clamp_hi(radius, size1 - 1);
            for c in 0..size2 {
                for r in 0..=row_hi {
                    let v = grid.get(Coordinate::new(r, c)).expect("in bounds");
                    column_buffer[c as usize].add_sample(sample_fn(v));
                }
            }
        }

        let mut live = template.clone();
        if size1 > 0 && size2 > 0 {
            let col_hi = clamp_hi(radius, size2 - 1);
            for c in 0..=col_hi {
                live.add_subtotal(&column_buffer[c as usize]);
            }
        }

        SquareWindowPixelIter {
            grid,
            radius,
            sample_fn,
            template,
            column_buffer,
            live,
            row: 0,
            col: 0,
        }
    }

    fn advance(&mut self) {
        let size1 = self.grid.size1();
        let size2 = self.grid.size2();
        let r = self.radius;

        if self.col + 1 < size2 {
            if self.col + r + 1 < size2 {
                let entering = self.column_buffer[(self.col + r + 1) as usize].clone();
                self.live.add_subtotal(&entering);
            }
            if self.col - r - 1 >= 0 {
                let leaving = self.column_buffer[(self.col - r - 1) as usize].clone();
                self.live.subtract_subtotal(&leaving);
            }
            self.col += 1;
        } else {
            self.col = 0;
            self.row += 1;
            if self.row >= size1 {
                return;
            }
            for c in 0..size2 {
                if self.row + r < size1 {
                    let v = self
                        .grid
                        .get(Coordinate::new(self.row + r, c))
                        .expect("in bounds");
                    self.column_buffer[c as usize].add_sample((self.sample_fn)(v));
                }
                if self.row - r - 1 >= 0 {
                    let v = self
                        .grid
                        .get(Coordinate::new(self.row - r - 1, c))
                        .expect("in bounds");
                    self.column_buffer[c as usize].subtract_sample((self.sample_fn)(v));
                }
            }
            self.live = self.template.clone();
            let col_hi = clamp_hi(r, size2 - 1);
            for c in 0..=col_hi {
                self.live.add_subtotal(&self.column_buffer[c as usize]);
            }
        }
    }
}

impl<T, I, F> Iterator for SquareWindowPixelIter<T, I, F>
where
    T: Copy + PartialEq,
    I: Indicator,
    F: Fn(T) -> I::Sample,
{
    type Item = I::Output;

    fn next(&mut self) -> Option<I::Output> {
        if self.grid.dims().is_empty() || self.row >= self.grid.size1() {
            return None;
        }
        let output = self.live.extract();
        self.advance();
        Some(output)
    }
}

/// Converts a raw `(first_val, second_val)` edge pair, plus the coordinates
/// of the two cells it joins, into an indicator sample. Implemented
/// differently per edge-valued indicator: category-pair indicators
/// ([`crate::indicator::EdgeDensity`], [`crate::indicator::Interspersion`])
/// ignore the coordinates; [`crate::indicator::EdgeList`] ignores the
/// values and instead builds its sample from the coordinate pair.
pub trait EdgeSampler<T: Copy + PartialEq> {
    type Sample;

    fn sample(
        &self,
        first_coord: Coordinate,
        first_val: Option<T>,
        second_coord: Coordinate,
        second_val: Option<T>,
    ) -> Self::Sample;
}

impl<T, S, Func> EdgeSampler<T> for Func
where
    T: Copy + PartialEq,
    Func: Fn(Coordinate, Option<T>, Coordinate, Option<T>) -> S,
{
    type Sample = S;

    fn sample(
        &self,
        first_coord: Coordinate,
        first_val: Option<T>,
        second_coord: Coordinate,
        second_val: Option<T>,
    ) -> S {
        (self)(first_coord, first_val, second_coord, second_val)
    }
}

/// Incremental square-window sweep over edge samples: two column buffers,
/// `h` over h-edges (row-wide domain `size1+1`,
/// column-normal domain `size2`) and `v` over v-edges (row-normal domain
/// `size1`, column-wide domain `size2+1`), combined into one live indicator.
pub struct SquareWindowEdgeIter<'a, T, I, S>
where
    T: Copy + PartialEq,
    I: Indicator<Sample = S>,
    S: Clone,
{
    grid: Rc<Grid<T>>,
    radius: i32,
    sampler: Box<dyn EdgeSampler<T, Sample = S> + 'a>,
    template: I,
    h_buffer: Vec<I>, // size2 entries, each summarising a wide row-range
    v_buffer: Vec<I>, // size2+1 entries, each summarising a normal row-range
    live: I,
    row: i32,
    col: i32,
}

impl<'a, T, I, S> SquareWindowEdgeIter<'a, T, I, S>
where
    T: Copy + PartialEq,
    I: Indicator<Sample = S>,
    S: Clone,
{
    pub fn new(
        grid: Rc<Grid<T>>,
        radius: i32,
        template: I,
        sampler: impl EdgeSampler<T, Sample = S> + 'a,
    ) -> Self {
        let size1 = grid.size1();
        let size2 = grid.size2();
        let sampler: Box<dyn EdgeSampler<T, Sample = S> + 'a> = Box::new(sampler);

        let mut h_buffer: Vec<I> = (0..size2.max(0)).map(|_| template.clone()).collect();
        let mut v_buffer: Vec<I> = (0..(size2 + 1).max(0)).map(|_| template.clone()).collect();

        if size1 > 0 && size2 > 0 {
            // h_buffer: wide row range [0, min(R+1, size1)]
            let h_row_hi = clamp_hi(radius + 1, size1);
            for c in 0..size2 {
                for r in 0..=h_row_hi {
                    let coord = Coordinate::new(r, c);
                    let (first, second) = h_edge_sides(&grid, coord);
                    let sample = sampler.sample(Coordinate::new(r - 1, c), first, coord, second);
                    h_buffer[c as usize].add_sample(sample);
                }
            }
            // v_buffer: normal row range [0, min(R, size1-1)]
            let v_row_hi = clamp_hi(radius, size1 - 1);
            for c in 0..=size2 {
                for r in 0..=v_row_hi {
                    let coord = Coordinate::new(r, c);
                    let (first, second) = v_edge_sides(&grid, coord);
                    let sample = sampler.sample(Coordinate::new(r, c - 1), first, coord, second);
                    v_buffer[c as usize].add_sample(sample);
                }
            }
        }

        let mut live = template.clone();
        if size1 > 0 && size2 > 0 {
            let h_col_hi = clamp_hi(radius, size2 - 1);
            for c in 0..=h_col_hi {
                live.add_subtotal(&h_buffer[c as usize]);
            }
            let v_col_hi = clamp_hi(radius + 1, size2);
            for c in 0..=v_col_hi {
                live.add_subtotal(&v_buffer[c as usize]);
            }
        }

        SquareWindowEdgeIter {
            grid,
            radius,
            sampler,
            template,
            h_buffer,
            v_buffer,
            live,
            row: 0,
            col: 0,
        }
    }

    fn advance(&mut self) {
        let size1 = self.grid.size1();
        let size2 = self.grid.size2();
        let r = self.radius;

        if self.col + 1 < size2 {
            if self.col + r + 1 < size2 {
                let entering = self.h_buffer[(self.col + r + 1) as usize].clone();
                self.live.add_subtotal(&entering);
            }
            if self.col - r - 1 >= 0 {
                let leaving = self.h_buffer[(self.col - r - 1) as usize].clone();
                self.live.subtract_subtotal(&leaving);
            }
            if self.col + r + 2 <= size2 {
                let entering = self.v_buffer[(self.col + r + 2) as usize].clone();
                self.live.add_subtotal(&entering);
            }
            if self.col - r >= 0 {
                let leaving = self.v_buffer[(self.col - r) as usize].clone();
                self.live.subtract_subtotal(&leaving);
            }
            self.col += 1;
        } else {
            self.col = 0;
            self.row += 1;
            if self.row >= size1 {
                return;
            }

            for c in 0..size2 {
                if self.row + r + 1 <= size1 {
                    let rr = self.row + r + 1;
                    let coord = Coordinate::new(rr, c);
                    let (first, second) = h_edge_sides(&self.grid, coord);
                    let sample =
                        self.sampler
                            .sample(Coordinate::new(rr - 1, c), first, coord, second);
                    self.h_buffer[c as usize].add_sample(sample);
                }
                if self.row - r - 1 >= 0 {
                    let rr = self.row - r - 1;
                    let coord = Coordinate::new(rr, c);
                    let (first, second) = h_edge_sides(&self.grid, coord);
                    let sample =
                        self.sampler
                            .sample(Coordinate::new(rr - 1, c), first, coord, second);
                    self.h_buffer[c as usize].subtract_sample(sample);
                }
            }
            for c in 0..=size2 {
                if self.row + r < size1 {
                    let rr = self.row + r;
                    let coord = Coordinate::new(rr, c);
                    let (first, second) = v_edge_sides(&self.grid, coord);
                    let sample =
                        self.sampler
                            .sample(Coordinate::new(rr, c - 1), first, coord, second);
                    self.v_buffer[c as usize].add_sample(sample);
                }
                if self.row - r - 1 >= 0 {
                    let rr = self.row - r - 1;
                    let coord = Coordinate::new(rr, c);
                    let (first, second) = v_edge_sides(&self.grid, coord);
                    let sample =
                        self.sampler
                            .sample(Coordinate::new(rr, c - 1), first, coord, second);
                    self.v_buffer[c as usize].subtract_sample(sample);
                }
            }

            self.live = self.template.clone();
            let h_col_hi = clamp_hi(r, size2 - 1);
            for c in 0..=h_col_hi {
                self.live.add_subtotal(&self.h_buffer[c as usize]);
            }
            let v_col_hi = clamp_hi(r + 1, size2);
            for c in 0..=v_col_hi {
                self.live.add_subtotal(&self.v_buffer[c as usize]);
            }
        }
    }
}

impl<'a, T, I, S> Iterator for SquareWindowEdgeIter<'a, T, I, S>
where
    T: Copy + PartialEq,
    I: Indicator<Sample = S>,
    S: Clone,
{
    type Item = I::Output;

    fn next(&mut self) -> Option<I::Output> {
        if self.grid.dims().is_empty() || self.row >= self.grid.size1() {
            return None;
        }
        let output = self.live.extract();
        self.advance();
        Some(output)
    }
}
