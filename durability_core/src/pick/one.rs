//! Single-slot weighted reservoir

use rand::Rng;

/// Streaming weighted choice of exactly one candidate
///
/// Each pushed candidate ends up held with probability
/// `weight / total_weight`, without storing the candidates.
#[derive(Debug, Clone)]
pub struct PickOne<T> {
    current: Option<T>,
    weight: f64,
}

impl<T> Default for PickOne<T> {
    fn default() -> Self {
        PickOne {
            current: None,
            weight: 0.0,
        }
    }
}

impl<T> PickOne<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a candidate with positive weight was pushed
    pub fn has(&self) -> bool {
        self.weight > 0.0
    }

    /// Sum of all accepted weights
    pub fn total_weight(&self) -> f64 {
        self.weight
    }

    /// Offer a candidate; non-positive and non-finite weights are ignored,
    /// as is any weight that would overflow the running total
    pub fn push(&mut self, candidate: T, weight: f64, rng: &mut impl Rng) {
        let total = self.weight + weight;
        if !(weight > 0.0 && total.is_finite()) {
            return;
        }
        self.weight = total;
        if rng.gen_range(0.0..self.weight) < weight {
            self.current = Some(candidate);
        }
    }

    /// Currently held candidate
    pub fn get(&self) -> Option<&T> {
        if self.has() {
            self.current.as_ref()
        } else {
            None
        }
    }

    /// Held candidate, or `fallback` if nothing was picked
    pub fn get_or(self, fallback: T) -> T {
        if self.has() {
            self.current.unwrap_or(fallback)
        } else {
            fallback
        }
    }

    pub fn into_inner(self) -> Option<T> {
        if self.has() {
            self.current
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_test_rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    #[test]
    fn test_empty() {
        let pick: PickOne<u32> = PickOne::new();
        assert!(!pick.has());
        assert!(pick.get().is_none());
        assert_eq!(pick.get_or(7), 7);
    }

    #[test]
    fn test_zero_weight_ignored() {
        let mut rng = make_test_rng();
        let mut pick = PickOne::new();
        pick.push("nothing", 0.0, &mut rng);
        pick.push("nan", f64::NAN, &mut rng);
        pick.push("negative", -3.0, &mut rng);
        assert!(!pick.has());
        assert_eq!(pick.get_or("fallback"), "fallback");
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let mut rng = make_test_rng();
        let mut pick = PickOne::new();
        pick.push(1u32, f64::MAX, &mut rng);
        pick.push(2u32, f64::MAX, &mut rng);
        assert_eq!(pick.total_weight(), f64::MAX);
        assert_eq!(pick.get(), Some(&1));

        pick.push(3u32, 1.0, &mut rng);
        assert!(pick.total_weight().is_finite());
    }

    #[test]
    fn test_single_candidate_always_held() {
        let mut rng = make_test_rng();
        let mut pick = PickOne::new();
        pick.push(1u32, 0.001, &mut rng);
        assert!(pick.has());
        assert_eq!(pick.get(), Some(&1));
    }

    #[test]
    fn test_fairness() {
        let mut rng = make_test_rng();
        let weights = [1.0, 2.0, 3.0, 4.0];
        let total: f64 = weights.iter().sum();
        let trials = 100_000;
        let mut hits = [0u32; 4];

        for _ in 0..trials {
            let mut pick = PickOne::new();
            for (i, w) in weights.iter().enumerate() {
                pick.push(i, *w, &mut rng);
            }
            hits[pick.get_or(0)] += 1;
        }

        for (i, w) in weights.iter().enumerate() {
            let expected = w / total;
            let observed = hits[i] as f64 / trials as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "candidate {} observed {} expected {}",
                i,
                observed,
                expected
            );
        }
    }

    proptest! {
        #[test]
        fn prop_held_candidate_had_positive_weight(
            weights in proptest::collection::vec(0.0f64..10.0, 1..20),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pick = PickOne::new();
            for (i, w) in weights.iter().enumerate() {
                pick.push(i, *w, &mut rng);
            }
            let positive = weights.iter().any(|w| *w > 0.0);
            prop_assert_eq!(pick.has(), positive);
            if let Some(i) = pick.into_inner() {
                prop_assert!(weights[i] > 0.0);
            }
        }
    }
}
