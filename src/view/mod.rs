//! Raster view layer: row-major cursors over pixels, horizontal edges and
//! vertical edges, plus the point-access functions ([`hedge::h_edge_sides`],
//! [`vedge::v_edge_sides`]) the sweep engines actually read through.
//!
//! The column-major and first-only/second-only cursor variants this layer
//! once carried (mirroring the source's full orientation x element x
//! access lookup table) were cut: no engine in this crate ever constructs
//! them, only their own unit tests did, and dead public API is worse than
//! a smaller one. [`pixel::PixelCursorRowMajor`], [`hedge::HEdgeCursorRowMajor`]
//! and [`vedge::VEdgeCursorRowMajor`] remain as the external row-major raster
//! contract spec.md §6 describes; the sweep engines themselves bypass them
//! in favour of direct point access for speed, same as `whitebox_tools`'
//! `image_analysis/diversity_filter.rs` never builds a cursor object for a
//! per-cell read it can do with a plain index.

pub mod hedge;
pub mod pixel;
pub mod vedge;

use crate::coord::Coordinate;

/// Shared contract for a positioned, forward-advancing view cursor:
/// positioned construction, linear advance, equality (derived from
/// `PartialEq` on the concrete cursor), and a coordinate reader.
pub trait ViewCursor {
    type Item;

    /// Positions the cursor at `coord` directly.
    fn find(&mut self, coord: Coordinate);

    /// Advances the cursor by one step in its traversal order.
    fn advance(&mut self);

    /// The coordinate the cursor currently addresses.
    fn coordinates(&self) -> Coordinate;

    /// Reads the value(s) at the cursor's current position.
    fn get(&self) -> Self::Item;

    /// `true` once the cursor has advanced past the last element of its
    /// traversal.
    fn at_end(&self) -> bool;
}
