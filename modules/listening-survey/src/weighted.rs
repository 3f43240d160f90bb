//! Weighted categorical choice shared by every sampled attribute.

use listening_common::{ListeningError, Result};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

/// A label → relative-frequency table. Weights need not sum to 100.
#[derive(Debug, Clone)]
pub struct WeightedCategory<T> {
    labels: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T> WeightedCategory<T> {
    /// Build a table. Rejects empty tables and any weight that is not a
    /// finite positive number.
    pub fn new(name: &'static str, entries: impl IntoIterator<Item = (T, f64)>) -> Result<Self> {
        let (labels, weights): (Vec<T>, Vec<f64>) = entries.into_iter().unzip();

        if labels.is_empty() {
            return Err(ListeningError::Configuration(format!(
                "weighted category '{name}' has no entries"
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(ListeningError::Configuration(format!(
                "weighted category '{name}' has non-positive weight {bad}"
            )));
        }

        let index = WeightedIndex::new(&weights).map_err(|e| {
            ListeningError::Configuration(format!("weighted category '{name}': {e}"))
        })?;

        Ok(Self { labels, index })
    }

    /// Draw one label with probability proportional to its weight.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.labels[self.index.sample(rng)]
    }

    pub fn labels(&self) -> &[T] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_empty_table() {
        let err = WeightedCategory::<&str>::new("empty", Vec::new()).unwrap_err();
        assert!(matches!(err, ListeningError::Configuration(_)));
    }

    #[test]
    fn test_rejects_zero_and_negative_weights() {
        assert!(WeightedCategory::new("zero", [("a", 1.0), ("b", 0.0)]).is_err());
        assert!(WeightedCategory::new("neg", [("a", -2.0)]).is_err());
        assert!(WeightedCategory::new("nan", [("a", f64::NAN)]).is_err());
    }

    #[test]
    fn test_respects_proportions() {
        let table = WeightedCategory::new("ab", [("A", 90.0), ("B", 10.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 100_000;
        let a = (0..draws).filter(|_| *table.sample(&mut rng) == "A").count();
        let ratio = a as f64 / draws as f64;
        assert!((0.85..=0.95).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn test_single_entry_always_drawn() {
        let table = WeightedCategory::new("one", [("only", 0.5)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..100).all(|_| *table.sample(&mut rng) == "only"));
    }
}
