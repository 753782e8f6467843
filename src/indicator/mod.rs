//! Indicator algebra: accumulators supporting add/subtract of single
//! samples and of whole sub-totals, independent of how the sweep engine
//! that drives them works.
//!
//! Categorical indicators in this crate operate on `i32` class codes (the
//! landscape-ecology convention: land-cover / patch category rasters are
//! integer-coded); continuous indicators (`Mean`) operate on `f64`.

mod area_weighted_patch_size;
mod count;
mod edge_density;
mod edge_list;
mod interspersion;
mod mean;
mod most_common_class;
mod patch_weighted_shape_index;
mod shannon_diversity;

pub use area_weighted_patch_size::AreaWeightedPatchSize;
pub use count::Count;
pub use edge_density::EdgeDensity;
pub use edge_list::{EdgeKey, EdgeList};
pub use interspersion::Interspersion;
pub use mean::Mean;
pub use most_common_class::MostCommonClass;
pub use patch_weighted_shape_index::PatchWeightedShapeIndex;
pub use shannon_diversity::ShannonDiversity;

/// Which raster element an indicator consumes samples from. Drives facade
/// dispatch: `Pixel` and `Patch`-valued indicators run on a pixel sweep
/// (patch-valued ones over the pre-pass's index raster), `Edge` ones run on
/// an edge sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Pixel,
    Edge,
    Patch,
}

/// The accumulator contract every indicator implements.
///
/// Invariants: `add_sample` followed by the matching
/// `subtract_sample` restores state exactly (the additive-inverse property);
/// `add_subtotal(S)` is equivalent to replaying every sample folded into
/// `S`; `extract()` never mutates and never fails, even on an empty
/// accumulator (it returns the indicator's documented neutral value).
pub trait Indicator: Clone {
    type Sample;
    type Output;

    fn add_sample(&mut self, sample: Self::Sample);

    /// # Panics (debug only)
    /// Debug builds assert the sample was previously added; this is an
    /// assertion-class programmer error, not a `Result`-level failure.
    fn subtract_sample(&mut self, sample: Self::Sample);

    fn add_subtotal(&mut self, other: &Self);

    fn subtract_subtotal(&mut self, other: &Self);

    fn extract(&self) -> Self::Output;

    fn element_kind(&self) -> ElementKind;
}
