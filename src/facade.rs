//! Facade: the single entry point that dispatches {pixel, edge, patch} x
//! {square, circle} to the right engine and, for patch-valued indicators,
//! owns the patch pre-pass lifecycle.
//!
//! Grounded in the way a `whitebox_tools` tool's `run()` method is the one
//! place that knows which lower-level routine a user-facing request maps
//! to; here that dispatch collapses to a small match on [`crate::config::Window`]
//! per indicator, since every indicator already knows its own
//! [`crate::indicator::ElementKind`].
//!
//! Every `sweep_*` method returns a boxed, lazily-evaluated
//! `Iterator<Item = _>` rather than a collected `Vec`: a caller that only
//! needs the first few outputs, or that wants to abort a long sweep early,
//! simply stops pulling from the iterator, and the engine underneath never
//! computes the cells it wasn't asked for. The raster itself is handed in
//! as an `Rc<Grid<T>>` so the returned iterator can own a cheap clone of
//! the handle and outlive the call that created it.

use crate::config::SweepConfig;
use crate::config::Window;
use crate::engine::circle::{CircleWindowEdgeIter, CircleWindowPixelIter};
use crate::engine::square::{EdgeSampler, SquareWindowEdgeIter, SquareWindowPixelIter};
use crate::error::Result;
use crate::grid::Grid;
use crate::indicator::{
    AreaWeightedPatchSize, Count, EdgeDensity, EdgeKey, EdgeList, Indicator, Interspersion, Mean,
    MostCommonClass, PatchWeightedShapeIndex, ShannonDiversity,
};
use crate::patch::{label_patches, PatchTable};
use log::{trace, warn};
use std::rc::Rc;

/// Logs once per sweep when the configured window is at least as large as
/// the raster: supported, but degenerate, with no incremental-sweep benefit
/// over a naive pass.
fn warn_if_degenerate<T: Copy + PartialEq>(grid: &Grid<T>, window: Window) {
    let (size1, size2) = (grid.size1(), grid.size2());
    let radius = window.integer_radius();
    if radius >= size1 || radius >= size2 {
        warn!(
            "window radius {} covers the whole {}x{} raster; sweep degenerates to a single window",
            radius, size1, size2
        );
    }
}

fn dispatch_pixel<T, I, F>(
    grid: Rc<Grid<T>>,
    window: Window,
    template: I,
    sample_fn: F,
) -> Box<dyn Iterator<Item = I::Output>>
where
    T: Copy + PartialEq + 'static,
    I: Indicator + 'static,
    F: Fn(T) -> I::Sample + 'static,
{
    warn_if_degenerate(&grid, window);
    match window {
        Window::Square { radius } => {
            trace!("dispatching pixel sweep: square window, radius {}", radius);
            Box::new(SquareWindowPixelIter::new(grid, radius, template, sample_fn))
        }
        Window::Circle { radius } => {
            trace!("dispatching pixel sweep: circular window, radius {}", radius);
            Box::new(CircleWindowPixelIter::new(grid, radius, template, sample_fn))
        }
    }
}

fn dispatch_edge<T, I, S>(
    grid: Rc<Grid<T>>,
    window: Window,
    template: I,
    sampler: impl EdgeSampler<T, Sample = S> + 'static,
) -> Box<dyn Iterator<Item = I::Output>>
where
    T: Copy + PartialEq + 'static,
    I: Indicator<Sample = S> + 'static,
    S: Clone + 'static,
{
    warn_if_degenerate(&grid, window);
    match window {
        Window::Square { radius } => {
            trace!("dispatching edge sweep: square window, radius {}", radius);
            Box::new(SquareWindowEdgeIter::new(grid, radius, template, sampler))
        }
        Window::Circle { radius } => {
            trace!("dispatching edge sweep: circular window, radius {}", radius);
            Box::new(CircleWindowEdgeIter::new(grid, radius, template, sampler))
        }
    }
}

fn category_pair_sampler<T: Copy + PartialEq>() -> impl EdgeSampler<T, Sample = (Option<T>, Option<T>)> + 'static
where
    T: 'static,
{
    |_first_coord, first, _second_coord, second| (first, second)
}

/// The moving-window facade: bundles a [`SweepConfig`] and exposes one
/// sweep method per indicator, over whichever raster element
/// ([`crate::indicator::ElementKind`]) that indicator consumes.
#[derive(Clone, Copy, Debug)]
pub struct MovingWindow {
    config: SweepConfig,
}

impl MovingWindow {
    pub fn new(config: SweepConfig) -> Self {
        MovingWindow { config }
    }

    pub fn config(&self) -> SweepConfig {
        self.config
    }

    /// Per-cell count of non-nodata samples; `T` is typically the category
    /// or value raster.
    pub fn sweep_count<T: Copy + PartialEq + 'static>(
        &self,
        grid: Rc<Grid<T>>,
    ) -> Box<dyn Iterator<Item = i64>> {
        dispatch_pixel(grid, self.config.window, Count::<T>::new(), |v| v)
    }

    /// Mean of an unweighted value raster.
    pub fn sweep_mean(&self, grid: Rc<Grid<f64>>) -> Box<dyn Iterator<Item = f64>> {
        dispatch_pixel(grid, self.config.window, Mean::new(), |v| (v, 1.0))
    }

    /// Mean of a value raster weighted by a second, same-shaped raster.
    pub fn sweep_weighted_mean(
        &self,
        value: Rc<Grid<f64>>,
        weight: Rc<Grid<f64>>,
    ) -> Result<Box<dyn Iterator<Item = f64>>> {
        if value.dims() != weight.dims() {
            return Err(crate::error::WindowError::ShapeMismatch {
                expected: (value.size1() as usize, value.size2() as usize),
                found: (weight.size1() as usize, weight.size2() as usize),
            });
        }
        let paired = Grid::from_vec(
            value.size1(),
            value.size2(),
            value
                .as_slice()
                .iter()
                .zip(weight.as_slice())
                .map(|(&v, &w)| (v, w))
                .collect(),
        )?;
        Ok(dispatch_pixel(
            Rc::new(paired),
            self.config.window,
            Mean::new(),
            |s| s,
        ))
    }

    /// Shannon diversity index over a category raster.
    pub fn sweep_shannon_diversity(&self, categories: Rc<Grid<i32>>) -> Box<dyn Iterator<Item = f64>> {
        dispatch_pixel(categories, self.config.window, ShannonDiversity::new(), |v| v)
    }

    /// Most frequently occurring category in the window.
    pub fn sweep_most_common_class(&self, categories: Rc<Grid<i32>>) -> Box<dyn Iterator<Item = i32>> {
        dispatch_pixel(categories, self.config.window, MostCommonClass::new(), |v| {
            (v, 1.0)
        })
    }

    /// Fraction of full edges in the window whose two sides differ.
    pub fn sweep_edge_density(&self, categories: Rc<Grid<i32>>) -> Box<dyn Iterator<Item = f64>> {
        dispatch_edge(
            categories,
            self.config.window,
            EdgeDensity::new(),
            category_pair_sampler(),
        )
    }

    /// Count of distinct h/v edges (by the coordinates of the two cells
    /// they join) touched by the window.
    pub fn sweep_edge_list(&self, categories: Rc<Grid<i32>>) -> Box<dyn Iterator<Item = usize>> {
        let sampler = |first_coord, _first: Option<i32>, second_coord, _second: Option<i32>| -> EdgeKey {
            (first_coord, second_coord)
        };
        dispatch_edge(categories, self.config.window, EdgeList::new(), sampler)
    }

    /// Interspersion/juxtaposition index over a category raster.
    pub fn sweep_interspersion(&self, categories: Rc<Grid<i32>>) -> Box<dyn Iterator<Item = f64>> {
        dispatch_edge(
            categories,
            self.config.window,
            Interspersion::new(),
            category_pair_sampler(),
        )
    }

    /// Runs the patch pre-pass over `categories` using this facade's
    /// configured connectivity. Exposed so callers needing
    /// multiple patch-valued indicators over the same raster can run the
    /// pre-pass once and reuse the table.
    pub fn label_patches(&self, categories: &Grid<i32>) -> Result<PatchTable> {
        label_patches(categories, self.config.connectivity)
    }

    /// Area-weighted mean patch size, optionally further weighted by a
    /// per-cell weight raster (`None` for the unweighted case).
    pub fn sweep_area_weighted_patch_size(
        &self,
        categories: &Grid<i32>,
        weight: Option<&Grid<f64>>,
    ) -> Result<Box<dyn Iterator<Item = f64>>> {
        let table = self.label_patches(categories)?;
        let records = Rc::new(table.records().to_vec());
        let template = AreaWeightedPatchSize::new(records);

        if let Some(weight) = weight {
            if weight.dims() != table.index_raster.dims() {
                return Err(crate::error::WindowError::ShapeMismatch {
                    expected: (
                        table.index_raster.size1() as usize,
                        table.index_raster.size2() as usize,
                    ),
                    found: (weight.size1() as usize, weight.size2() as usize),
                });
            }
            let paired = Grid::from_vec(
                table.index_raster.size1(),
                table.index_raster.size2(),
                table
                    .index_raster
                    .as_slice()
                    .iter()
                    .zip(weight.as_slice())
                    .map(|(&idx, &w)| (idx, w))
                    .collect(),
            )?;
            Ok(dispatch_pixel(Rc::new(paired), self.config.window, template, |s| s))
        } else {
            Ok(dispatch_pixel(
                Rc::new(table.index_raster),
                self.config.window,
                template,
                |idx| (idx, 1.0),
            ))
        }
    }

    /// Mean shape-complexity factor over the window's patches.
    pub fn sweep_patch_weighted_shape_index(
        &self,
        categories: &Grid<i32>,
    ) -> Result<Box<dyn Iterator<Item = f64>>> {
        let table = self.label_patches(categories)?;
        let records = Rc::new(table.records().to_vec());
        let template = PatchWeightedShapeIndex::new(records);
        Ok(dispatch_pixel(
            Rc::new(table.index_raster),
            self.config.window,
            template,
            |idx| idx,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Connectivity, Window};

    #[test]
    fn count_over_uniform_grid_matches_window_area() {
        let g = Grid::from_vec(5, 5, vec![1i32; 25]).unwrap();
        let mw = MovingWindow::new(SweepConfig::new(Window::Square { radius: 1 }));
        let out: Vec<_> = mw.sweep_count(Rc::new(g)).collect();
        // centre cell (2,2) has a full 3x3 window
        assert_eq!(out[2 * 5 + 2], 9);
    }

    #[test]
    fn checkerboard_edge_density_matches_scenario_three() {
        let g = Grid::from_vec(3, 3, vec![1, 2, 1, 2, 1, 2, 1, 2, 1]).unwrap();
        let mw = MovingWindow::new(SweepConfig::new(Window::Square { radius: 1 }));
        let out: Vec<_> = mw.sweep_edge_density(Rc::new(g)).collect();
        assert_eq!(out[4], 1.0); // centre cell
    }

    #[test]
    fn uniform_patch_shape_index_is_one() {
        let g = Grid::from_vec(4, 4, vec![3; 16]).unwrap();
        let mw = MovingWindow::new(
            SweepConfig::new(Window::Square { radius: 4 }).with_connectivity(Connectivity::Queen),
        );
        let out: Vec<_> = mw.sweep_patch_weighted_shape_index(&g).unwrap().collect();
        assert!(out.iter().all(|&v| (v - 1.0).abs() < 1e-9));
    }

    #[test]
    fn area_weighted_patch_size_matches_scenario_four() {
        // 4x4 single patch, area 16.
        let g = Grid::from_vec(4, 4, vec![3; 16]).unwrap();
        let mw = MovingWindow::new(SweepConfig::new(Window::Square { radius: 4 }));
        let out: Vec<_> = mw.sweep_area_weighted_patch_size(&g, None).unwrap().collect();
        assert!(out.iter().all(|&v| (v - 16.0).abs() < 1e-9));
    }

    #[test]
    fn circular_window_dispatches_without_panicking() {
        let g = Grid::from_vec(5, 5, vec![1i32; 25]).unwrap();
        let mw = MovingWindow::new(SweepConfig::new(Window::Circle { radius: 1.5 }));
        let out: Vec<_> = mw.sweep_count(Rc::new(g)).collect();
        assert_eq!(out.len(), 25);
    }

    #[test]
    fn weighted_mean_rejects_shape_mismatch() {
        let value = Grid::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let weight = Grid::from_vec(2, 3, vec![1.0; 6]).unwrap();
        let mw = MovingWindow::new(SweepConfig::new(Window::Square { radius: 1 }));
        assert!(mw.sweep_weighted_mean(Rc::new(value), Rc::new(weight)).is_err());
    }

    #[test]
    fn sweep_is_lazy_and_abortable() {
        // A caller that only pulls the first output never triggers the
        // engine's work for the remaining cells; `.next()` called once on
        // a 5x5 raster must not panic or force full evaluation.
        let g = Grid::from_vec(5, 5, vec![1i32; 25]).unwrap();
        let mw = MovingWindow::new(SweepConfig::new(Window::Square { radius: 1 }));
        let mut sweep = mw.sweep_count(Rc::new(g));
        assert_eq!(sweep.next(), Some(4));
    }
}
