//! `Categorical<T>` — a normalised probability vector over a fixed list of
//! outcomes, with an O(log n) sampler.

use rand::distributions::WeightedIndex;

use sm_core::SimRng;

use crate::{ModelError, ModelResult};

/// A discrete distribution over `outcomes`, aligned positionally with
/// `probabilities`.  Probabilities always sum to 1 within floating tolerance.
#[derive(Clone, Debug)]
pub struct Categorical<T> {
    outcomes:      Vec<T>,
    probabilities: Vec<f64>,
    sampler:       WeightedIndex<f64>,
}

impl<T: Copy + PartialEq> Categorical<T> {
    /// Normalise non-negative `weights` (raw counts or unnormalised
    /// probabilities) into a distribution over `outcomes`.
    ///
    /// Fails if the lengths differ, the list is empty, any weight is negative
    /// or non-finite, or every weight is zero.
    pub fn from_weights(outcomes: Vec<T>, weights: &[f64]) -> ModelResult<Self> {
        if outcomes.is_empty() {
            return Err(ModelError::InvalidWeights("no outcomes".into()));
        }
        if outcomes.len() != weights.len() {
            return Err(ModelError::InvalidWeights(format!(
                "{} outcomes but {} weights",
                outcomes.len(),
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ModelError::InvalidWeights(format!("weight {w} is not a finite non-negative number")));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(ModelError::InvalidWeights("weights sum to zero".into()));
        }

        let probabilities: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let sampler = WeightedIndex::new(&probabilities)
            .map_err(|e| ModelError::InvalidWeights(e.to_string()))?;

        Ok(Self { outcomes, probabilities, sampler })
    }

    /// Normalise integer counts.
    pub fn from_counts(outcomes: Vec<T>, counts: &[u64]) -> ModelResult<Self> {
        let weights: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Self::from_weights(outcomes, &weights)
    }

    /// Draw one outcome.
    #[inline]
    pub fn sample(&self, rng: &mut SimRng) -> T {
        let i: usize = rng.sample(&self.sampler);
        self.outcomes[i]
    }

    #[inline]
    pub fn outcomes(&self) -> &[T] {
        &self.outcomes
    }

    #[inline]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of `outcome`; 0 if it is not among the outcomes.
    pub fn probability_of(&self, outcome: T) -> f64 {
        self.outcomes
            .iter()
            .position(|&o| o == outcome)
            .map_or(0.0, |i| self.probabilities[i])
    }

    /// Sum of all probabilities.  1 within rounding.
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Total-variation distance `½ Σ |p − q|` over the union of outcomes.
    pub fn total_variation(&self, other: &Categorical<T>) -> f64 {
        let mut sum: f64 = self
            .outcomes
            .iter()
            .zip(&self.probabilities)
            .map(|(&o, &p)| (p - other.probability_of(o)).abs())
            .sum();
        sum += other
            .outcomes
            .iter()
            .zip(&other.probabilities)
            .filter(|(o, _)| !self.outcomes.contains(o))
            .map(|(_, &q)| q)
            .sum::<f64>();
        sum / 2.0
    }
}
