use super::{ElementKind, Indicator};
use crate::patch::PatchRecord;
use std::rc::Rc;

/// The minimum possible perimeter for a patch of area `area` cells (the
/// perimeter of the most compact rook-connected shape of that area): `4n`
/// when `area = n^2`, `4n+2` when `area < n(n+1)`, else `4n+4`, where
/// `n = floor(sqrt(area))`.
pub fn perimeter_min(area: i64) -> i64 {
    if area <= 0 {
        return 0;
    }
    let n = (area as f64).sqrt().floor() as i64;
    if area == n * n {
        4 * n
    } else if area < n * (n + 1) {
        4 * n + 2
    } else {
        4 * n + 4
    }
}

/// Mean shape-complexity factor (`perimeter / perimeter_min(area)`) over
/// the window's patches, weighted `1/area` so that small, jagged patches do
/// not dominate the average the way an unweighted mean would.
#[derive(Clone, Debug)]
pub struct PatchWeightedShapeIndex {
    records: Rc<Vec<PatchRecord>>,
    sum: f64,
    weight: f64,
}

impl PatchWeightedShapeIndex {
    pub fn new(records: Rc<Vec<PatchRecord>>) -> Self {
        PatchWeightedShapeIndex {
            records,
            sum: 0.0,
            weight: 0.0,
        }
    }

    fn shape_factor_and_weight(&self, patch_index: i32) -> (f64, f64) {
        let rec = self.records[patch_index as usize];
        let min_perimeter = perimeter_min(rec.area);
        let shape_factor = if min_perimeter > 0 {
            rec.perimeter as f64 / min_perimeter as f64
        } else {
            0.0
        };
        let weight = if rec.area > 0 {
            1.0 / rec.area as f64
        } else {
            0.0
        };
        (shape_factor, weight)
    }

    pub fn add(&mut self, patch_index: i32) {
        self.add_sample(patch_index);
    }

    pub fn subtract(&mut self, patch_index: i32) {
        self.subtract_sample(patch_index);
    }
}

impl Indicator for PatchWeightedShapeIndex {
    type Sample = i32;
    type Output = f64;

    fn add_sample(&mut self, patch_index: i32) {
        let (shape_factor, weight) = self.shape_factor_and_weight(patch_index);
        self.sum += shape_factor * weight;
        self.weight += weight;
    }

    fn subtract_sample(&mut self, patch_index: i32) {
        let (shape_factor, weight) = self.shape_factor_and_weight(patch_index);
        self.sum -= shape_factor * weight;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perimeter_min_matches_worked_values() {
        assert_eq!(perimeter_min(16), 16); // n=4, 16=4^2
        assert_eq!(perimeter_min(1), 4); // n=1, 1=1^2
        assert_eq!(perimeter_min(2), 6); // n=1, 2<1*2 -> 4n+2
        assert_eq!(perimeter_min(3), 8); // n=1, 3>=1*2 -> 4n+4
    }

    #[test]
    fn perfectly_square_patch_has_shape_factor_one() {
        let records = Rc::new(vec![PatchRecord {
            category: 1,
            area: 16,
            perimeter: 16,
        }]);
        let mut s = PatchWeightedShapeIndex::new(records);
        s.add(0);
        assert_eq!(s.extract(), 1.0);
    }

    #[test]
    fn add_subtract_is_inverse() {
        let records = Rc::new(vec![
            PatchRecord {
                category: 1,
                area: 16,
                perimeter: 16,
            },
            PatchRecord {
                category: 2,
                area: 9,
                perimeter: 20,
            },
        ]);
        let mut s = PatchWeightedShapeIndex::new(records);
        s.add(0);
        let before = s.extract();
        s.add(1);
        s.subtract(1);
        assert!((s.extract() - before).abs() < 1e-9);
    }

    #[test]
    fn subtotal_matches_direct_fold() {
        let records = Rc::new(vec![
            PatchRecord {
                category: 1,
                area: 16,
                perimeter: 16,
            },
            PatchRecord {
                category: 2,
                area: 9,
                perimeter: 20,
            },
        ]);
        let mut direct = PatchWeightedShapeIndex::new(records.clone());
        direct.add(0);
        direct.add(1);
        direct.add(1);

        let mut a = PatchWeightedShapeIndex::new(records.clone());
        a.add(0);
        let mut b = PatchWeightedShapeIndex::new(records);
        b.add(1);
        b.add(1);

        let via_subtotal_records = Rc::new(vec![
            PatchRecord {
                category: 1,
                area: 16,
                perimeter: 16,
            },
            PatchRecord {
                category: 2,
                area: 9,
                perimeter: 20,
            },
        ]);
        let mut via_subtotal = PatchWeightedShapeIndex::new(via_subtotal_records);
        via_subtotal.add_subtotal(&a);
        via_subtotal.add_subtotal(&b);

        assert!((direct.extract() - via_subtotal.extract()).abs() < 1e-9);
    }
}
