use super::{ElementKind, Indicator};
use std::collections::HashMap;

/// Sentinel output when no category has been observed.
pub const NO_CATEGORY: i32 = -1;

/// Category -> weight histogram with a lazily resorted "current top".
/// Grounded in the same amortised idiom as `whitebox-common`'s
/// `NMinimizer`: most updates only need to compare
/// against the cached top cheaply, and a full rescan only happens when that
/// cached value can no longer be trusted.
#[derive(Clone, Debug, Default)]
pub struct MostCommonClass {
    weights: HashMap<i32, f64>,
    cached_top: Option<(i32, f64)>,
    dirty: bool,
}

impl MostCommonClass {
    pub fn new() -> Self {
        MostCommonClass {
            weights: HashMap::new(),
            cached_top: None,
            dirty: false,
        }
    }

    fn resort_if_dirty(&mut self) {
        if !self.dirty {
            return;
        }
        self.cached_top = self
            .weights
            .iter()
            .filter(|(_, &w)| w > 0.0)
            .fold(None, |best: Option<(i32, f64)>, (&cat, &w)| match best {
                Some((bcat, bw)) if bw > w || (bw == w && bcat < cat) => Some((bcat, bw)),
                _ => Some((cat, w)),
            });
        self.dirty = false;
    }
}

impl Indicator for MostCommonClass {
    type Sample = (i32, f64);
    type Output = i32;

    fn add_sample(&mut self, (category, weight): (i32, f64)) {
        let new_weight = *self.weights.entry(category).or_insert(0.0) + weight;
        self.weights.insert(category, new_weight);
        match self.cached_top {
            Some((top_cat, _)) if top_cat == category => {
                // same category as the cached top: its weight just moved,
                // refresh exactly rather than comparing against itself.
                self.cached_top = Some((category, new_weight));
            }
            Some((_, top_weight)) if new_weight > top_weight => {
                self.cached_top = Some((category, new_weight));
            }
            Some((top_cat, top_weight)) if new_weight == top_weight && category < top_cat => {
                // tie on weight: `resort_if_dirty` prefers the smaller
                // category, so this sample may have just become the top.
                // Defer to the full resort rather than duplicating its
                // tie-break rule here.
                self.dirty = true;
            }
            None => {
                self.cached_top = Some((category, new_weight));
            }
            _ => {}
        }
    }

    fn subtract_sample(&mut self, (category, weight): (i32, f64)) {
        if let Some(w) = self.weights.get_mut(&category) {
            *w -= weight;
            if *w <= 0.0 {
                self.weights.remove(&category);
            }
        }
        if let Some((top_cat, _)) = self.cached_top {
            if top_cat == category {
                self.dirty = true;
            }
        }
    }

    fn add_subtotal(&mut self, other: &Self) {
        for (&cat, &w) in &other.weights {
            *self.weights.entry(cat).or_insert(0.0) += w;
        }
        self.dirty = true;
    }

    fn subtract_subtotal(&mut self, other: &Self) {
        for (&cat, &w) in &other.weights {
            let entry = self.weights.entry(cat).or_insert(0.0);
            *entry -= w;
            if *entry <= 0.0 {
                self.weights.remove(&cat);
            }
        }
        self.dirty = true;
    }

    fn extract(&self) -> i32 {
        let mut this = self.clone();
        this.resort_if_dirty();
        this.cached_top.map(|(cat, _)| cat).unwrap_or(NO_CATEGORY)
    }

    fn element_kind(&self) -> ElementKind {
        ElementKind::Pixel
    }
}
