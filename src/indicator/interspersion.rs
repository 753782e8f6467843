use super::{ElementKind, Indicator};
use std::collections::HashMap;

/// Shannon entropy over between-category edge frequencies, normalised by
/// `log(m(m-1)/2)` where `m` is the number of categories present in the
/// window. Zero when `m <= 1`, or when there are no crossing edges to build
/// a frequency distribution from.
#[derive(Clone, Debug, Default)]
pub struct Interspersion {
    category_presence: HashMap<i32, i64>,
    pair_counts: HashMap<(i32, i32), i64>,
}

fn canonical_pair(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Interspersion {
    pub fn new() -> Self {
        Interspersion {
            category_presence: HashMap::new(),
            pair_counts: HashMap::new(),
        }
    }
}

impl Indicator for Interspersion {
    type Sample = (Option<i32>, Option<i32>);
    type Output = f64;

    fn add_sample(&mut self, (a, b): (Option<i32>, Option<i32>)) {
        if let (Some(a), Some(b)) = (a, b) {
            *self.category_presence.entry(a).or_insert(0) += 1;
            *self.category_presence.entry(b).or_insert(0) += 1;
            if a != b {
                *self.pair_counts.entry(canonical_pair(a, b)).or_insert(0) += 1;
            }
        }
    }

    fn subtract_sample(&mut self, (a, b): (Option<i32>, Option<i32>)) {
        if let (Some(a), Some(b)) = (a, b) {
            for cat in [a, b] {
                if let Some(count) = self.category_presence.get_mut(&cat) {
                    *count -= 1;
                    if *count <= 0 {
                        self.category_presence.remove(&cat);
                    }
                }
            }
            if a != b {
                let key = canonical_pair(a, b);
                if let Some(count) = self.pair_counts.get_mut(&key) {
                    *count -= 1;
                    if *count <= 0 {
                        self.pair_counts.remove(&key);
                    }
                }
            }
        }
    }

    fn add_subtotal(&mut self, other: &Self) {
        for (cat, count) in &other.category_presence {
            *self.category_presence.entry(*cat).or_insert(0) += count;
        }
        for (pair, count) in &other.pair_counts {
            *self.pair_counts.entry(*pair).or_insert(0) += count;
        }
    }

    fn subtract_subtotal(&mut self, other: &Self) {
        for (cat, count) in &other.category_presence {
            let entry = self.category_presence.entry(*cat).or_insert(0);
            *entry -= count;
            if *entry <= 0 {
                self.category_presence.remove(cat);
            }
        }
        for (pair, count) in &other.pair_counts {
            let entry = self.pair_counts.entry(*pair).or_insert(0);
            *entry -= count;
            if *entry <= 0 {
                self.pair_counts.remove(pair);
            }
        }
    }

    fn extract(&self) -> f64 {
        let m = self.category_presence.len();
        if m <= 1 {
            return 0.0;
        }
        let total: i64 = self.pair_counts.values().sum();
        if total <= 0 {
            return 0.0;
        }
        let total = total as f64;
        let entropy: f64 = -self
            .pair_counts
            .values()
            .map(|&c| {
                let p = c as f64 / total;
                p * p.ln()
            })
            .sum::<f64>();
        let denom = (m as f64) * ((m - 1) as f64) / 2.0;
        if denom <= 1.0 {
            0.0
        } else {
            entropy / denom.ln()
        }
    }

    fn element_kind(&self) -> ElementKind {
        ElementKind::Edge
    }
}
