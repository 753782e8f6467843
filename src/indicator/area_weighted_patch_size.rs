use super::{ElementKind, Indicator};
use crate::patch::PatchRecord;
use std::rc::Rc;

/// Mean of patch area, naturally area-weighted because each cell of a patch
/// contributes one sample (so a 100-cell patch outweighs a 1-cell patch 100
/// to 1) and optionally further weighted by an external per-cell weight.
/// Consumes the patch pre-pass's area table, shared by `Rc`
/// across every column-buffer / live-indicator copy the square and circular
/// engines make.
#[derive(Clone, Debug)]
pub struct AreaWeightedPatchSize {
    records: Rc<Vec<PatchRecord>>,
    sum: f64,
    weight: f64,
}

impl AreaWeightedPatchSize {
    pub fn new(records: Rc<Vec<PatchRecord>>) -> Self {
        AreaWeightedPatchSize {
            records,
            sum: 0.0,
            weight: 0.0,
        }
    }

    /// Convenience for the common unweighted case (external weight 1.0).
    pub fn add(&mut self, patch_index: i32) {
        self.add_sample((patch_index, 1.0));
    }

    pub fn subtract(&mut self, patch_index: i32) {
        self.subtract_sample((patch_index, 1.0));
    }
}

impl Indicator for AreaWeightedPatchSize {
    type Sample = (i32, f64);
    type Output = f64;

    fn add_sample(&mut self, (patch_index, weight): (i32, f64)) {
        let area = self.records[patch_index as usize].area as f64;
        self.sum += area * weight;
        self.weight += weight;
    }

    fn subtract_sample(&mut self, (patch_index, weight): (i32, f64)) {
        let area = self.records[patch_index as usize].area as f64;
        self.sum -= area * weight;
        self.weight -= weight;
    }

    fn add_subtotal(&mut self, other: &Self) {
        self.sum += other.sum;
        self.weight += other.weight;
    }

    fn subtract_subtotal(&mut self, other: &Self) {
        self.sum -= other.sum;
        self.weight -= other.weight;
    }

    fn extract(&self) -> f64 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            0.0
        }
    }

    fn element_kind(&self) -> ElementKind {
        ElementKind::Patch
    }
}
