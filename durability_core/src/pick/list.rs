//! Weighted pool pulled without replacement

use rand::Rng;

/// Pool of weighted candidates
///
/// Each [`PickList::pull`] picks proportionally to the weights that are
/// still in the pool, then zeroes the chosen slot so it cannot come back.
/// Slots keep their position, so references stay tied to the same entry.
#[derive(Debug, Clone)]
pub struct PickList<T> {
    entries: Vec<(T, f64)>,
    weight_sum: f64,
    remaining: usize,
}

impl<T> Default for PickList<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> PickList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PickList {
            entries: Vec::with_capacity(capacity),
            weight_sum: 0.0,
            remaining: 0,
        }
    }

    /// Weight still available for pulling
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// Number of entries not yet pulled
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Add a candidate; only positive weights that keep the pool total
    /// finite are kept
    pub fn push(&mut self, value: T, weight: f64) {
        let total = self.weight_sum + weight;
        if weight > 0.0 && total.is_finite() {
            self.entries.push((value, weight));
            self.weight_sum = total;
            self.remaining += 1;
        }
    }

    /// Draw one candidate, `None` once the pool is exhausted
    pub fn pull(&mut self, rng: &mut impl Rng) -> Option<&mut T> {
        self.pull_with_weight(rng).map(|(value, _)| value)
    }

    /// Draw one candidate together with the weight it had
    pub fn pull_with_weight(&mut self, rng: &mut impl Rng) -> Option<(&mut T, f64)> {
        if self.remaining == 0 || !(self.weight_sum > 0.0) {
            return None;
        }

        let mut draw = rng.gen_range(0.0..self.weight_sum);
        let mut chosen = None;
        let mut last = None;
        for (index, (_, weight)) in self.entries.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            if draw < *weight {
                chosen = Some(index);
                break;
            }
            draw -= *weight;
            last = Some(index);
        }

        // Rounding can push the draw past the final slot
        let index = chosen.or(last)?;
        let (value, weight) = &mut self.entries[index];
        let taken = std::mem::take(weight);

        self.remaining -= 1;
        self.weight_sum = if self.remaining == 0 {
            0.0
        } else {
            (self.weight_sum - taken).max(0.0)
        };

        Some((value, taken))
    }
}
