//! Incremental streaming sweep core for moving-window landscape metrics
//! over a 2-D raster.
//!
//! The crate is organised in layers: [`coord`]/[`grid`] (the bounded 2-D
//! array abstraction), [`view`] (pixel/edge cursors), [`indicator`] (the
//! accumulator algebra), [`patch`] (the flood-fill pre-pass), [`engine`]
//! (the square and circular sweep engines), and [`facade`] (the single
//! entry point a caller actually reaches for). [`config`] and [`error`]
//! are the ambient configuration and error-reporting layers threaded
//! through all of the above.
//!
//! ```
//! use moving_window::{Grid, MovingWindow, SweepConfig, Window};
//! use std::rc::Rc;
//!
//! let categories = Grid::from_vec(3, 3, vec![1, 2, 1, 2, 1, 2, 1, 2, 1]).unwrap();
//! let mw = MovingWindow::new(SweepConfig::new(Window::Square { radius: 1 }));
//! let edge_density: Vec<f64> = mw.sweep_edge_density(Rc::new(categories)).collect();
//! assert_eq!(edge_density[4], 1.0); // every neighbour of the centre cell differs
//! ```

pub mod config;
pub mod coord;
pub mod engine;
pub mod error;
pub mod facade;
pub mod grid;
pub mod indicator;
pub mod patch;
pub mod view;

pub use config::{Connectivity, SweepConfig, Window};
pub use coord::{Coordinate, GridDimensions};
pub use error::{Result, WindowError};
pub use facade::MovingWindow;
pub use grid::Grid;
pub use indicator::{
    AreaWeightedPatchSize, Count, EdgeDensity, EdgeKey, EdgeList, ElementKind, Indicator,
    Interspersion, Mean, MostCommonClass, PatchWeightedShapeIndex, ShannonDiversity,
};
pub use patch::{label_patches, PatchRecord, PatchTable};
