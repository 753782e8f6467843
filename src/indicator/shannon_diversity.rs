use super::{ElementKind, Indicator};
use std::collections::HashMap;

/// Shannon diversity index `-Σ p_i ln p_i` over per-category pixel counts.
/// Zero on an empty window.
#[derive(Clone, Debug, Default)]
pub struct ShannonDiversity {
    counts: HashMap<i32, i64>,
    total: i64,
}

impl ShannonDiversity {
    pub fn new() -> Self {
        ShannonDiversity {
            counts: HashMap::new(),
            total: 0,
        }
    }
}

impl Indicator for ShannonDiversity {
    type Sample = i32;
    type Output = f64;

    fn add_sample(&mut self, category: i32) {
        *self.counts.entry(category).or_insert(0) += 1;
        self.total += 1;
    }

    fn subtract_sample(&mut self, category: i32) {
        debug_assert!(self.total > 0, "subtract_sample on empty ShannonDiversity");
        if let Some(count) = self.counts.get_mut(&category) {
            *count -= 1;
            if *count <= 0 {
                self.counts.remove(&category);
            }
        }
        self.total -= 1;
    }

    fn add_subtotal(&mut self, other: &Self) {
        for (cat, count) in &other.counts {
            *self.counts.entry(*cat).or_insert(0) += count;
        }
        self.total += other.total;
    }

    fn subtract_subtotal(&mut self, other: &Self) {
        for (cat, count) in &other.counts {
            let entry = self.counts.entry(*cat).or_insert(0);
            *entry -= count;
            if *entry <= 0 {
                self.counts.remove(cat);
            }
        }
        self.total -= other.total;
    }

    fn extract(&self) -> f64 {
        if self.total <= 0 {
            return 0.0;
        }
        let total = self.total as f64;
        -self
            .counts
            .values()
            .map(|&c| {
                let p = c as f64 / total;
                p * p.ln()
            })
            .sum::<f64>()
    }

    fn element_kind(&self) -> ElementKind {
        ElementKind::Pixel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_category_has_zero_diversity() {
        let mut s = ShannonDiversity::new();
        for _ in 0..5 {
            s.add_sample(1);
        }
        assert_eq!(s.extract(), 0.0);
    }

    #[test]
    fn two_patch_scenario_matches_worked_example() {
        // counts {0: 9, 1: 4}.
        let mut s = ShannonDiversity::new();
        for _ in 0..9 {
            s.add_sample(0);
        }
        for _ in 0..4 {
            s.add_sample(1);
        }
        assert!((s.extract() - 0.6098).abs() < 1e-3);
    }

    #[test]
    fn add_subtract_is_inverse() {
        let mut s = ShannonDiversity::new();
        s.add_sample(1);
        s.add_sample(2);
        let before = s.extract();
        s.add_sample(3);
        s.subtract_sample(3);
        assert_eq!(s.extract(), before);
    }

    #[test]
    fn subtotal_matches_direct_fold() {
        let samples = [0, 0, 1, 1, 1, 2];
        let mut direct = ShannonDiversity::new();
        for s in samples {
            direct.add_sample(s);
        }

        let mut a = ShannonDiversity::new();
        a.add_sample(0);
        a.add_sample(0);
        let mut b = ShannonDiversity::new();
        b.add_sample(1);
        b.add_sample(1);
        b.add_sample(1);
        b.add_sample(2);

        let mut via_subtotal = ShannonDiversity::new();
        via_subtotal.add_subtotal(&a);
        via_subtotal.add_subtotal(&b);

        assert!((direct.extract() - via_subtotal.extract()).abs() < 1e-9);
    }

    #[test]
    fn extract_on_empty_is_zero() {
        assert_eq!(ShannonDiversity::new().extract(), 0.0);
    }
}
