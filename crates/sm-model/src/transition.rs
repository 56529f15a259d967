//! `TransitionModel` — per-location next-location distributions.
//!
//! # Estimation
//!
//! A 5×5 count table is filled from consecutive `(source, destination)`
//! pairs inside each session, then every row is normalised in
//! [`Location::ALL`] order.
//!
//! `checkout` is terminal, so no session contains a pair starting there.
//! Its row instead counts one `(checkout, first_location)` pair per session:
//! the location a customer is first seen at after the previous customer
//! left.  The simulation uses that row to place new entrants.
//!
//! A source row with no observations is an error; no row is ever filled with
//! a uniform or zero default.

use tracing::info;

use sm_core::{Location, SimRng};

use crate::{Categorical, HistoricalCorpus, ModelError, ModelResult};

/// Row-stochastic transition matrix over [`Location::ALL`].
#[derive(Clone, Debug)]
pub struct TransitionModel {
    /// Indexed by `Location::index()` of the source.
    rows:         Vec<Categorical<Location>>,
    /// Raw pair counts per source row; all zero for table-built models.
    observations: [u64; Location::COUNT],
}

impl TransitionModel {
    /// Count consecutive-location pairs per session and normalise each row.
    pub fn estimate(corpus: &HistoricalCorpus) -> ModelResult<Self> {
        if corpus.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let mut counts = [[0u64; Location::COUNT]; Location::COUNT];
        for session in corpus.sessions() {
            let first = session[0].location;
            counts[Location::Checkout.index()][first.index()] += 1;
            for pair in session.windows(2) {
                counts[pair[0].location.index()][pair[1].location.index()] += 1;
            }
        }

        let mut rows = Vec::with_capacity(Location::COUNT);
        let mut observations = [0u64; Location::COUNT];
        for from in Location::ALL {
            let row = &counts[from.index()];
            let total: u64 = row.iter().sum();
            if total == 0 {
                return Err(ModelError::NoTransitions(from));
            }
            observations[from.index()] = total;
            rows.push(Categorical::from_counts(Location::ALL.to_vec(), row)?);
        }

        info!(
            sessions = corpus.session_count(),
            pairs = observations.iter().sum::<u64>(),
            "transition matrix estimated"
        );

        Ok(Self { rows, observations })
    }

    /// Build a model from an explicit table.  `table[from][to]` is indexed in
    /// [`Location::ALL`] order; each row is renormalised.
    pub fn from_rows(table: [[f64; Location::COUNT]; Location::COUNT]) -> ModelResult<Self> {
        let rows = Location::ALL
            .iter()
            .map(|from| {
                Categorical::from_weights(Location::ALL.to_vec(), &table[from.index()]).map_err(|e| {
                    ModelError::InvalidWeights(format!("row {from}: {e}"))
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { rows, observations: [0; Location::COUNT] })
    }

    /// Next-location distribution for a customer currently at `from`.
    ///
    /// `distribution_for(Checkout)` is the first-placement distribution for
    /// new entrants.
    #[inline]
    pub fn distribution_for(&self, from: Location) -> &Categorical<Location> {
        &self.rows[from.index()]
    }

    /// Draw the successor of `from`.
    #[inline]
    pub fn sample(&self, from: Location, rng: &mut SimRng) -> Location {
        self.rows[from.index()].sample(rng)
    }

    /// Draw a new entrant's first location.
    #[inline]
    pub fn sample_entry(&self, rng: &mut SimRng) -> Location {
        self.sample(Location::Checkout, rng)
    }

    #[inline]
    pub fn probability(&self, from: Location, to: Location) -> f64 {
        self.rows[from.index()].probabilities()[to.index()]
    }

    /// Number of pairs row `from` was estimated from.
    #[inline]
    pub fn observations(&self, from: Location) -> u64 {
        self.observations[from.index()]
    }

    /// Largest row-wise total-variation distance between two models.
    pub fn total_variation(&self, other: &TransitionModel) -> f64 {
        Location::ALL
            .iter()
            .map(|&from| self.distribution_for(from).total_variation(other.distribution_for(from)))
            .fold(0.0, f64::max)
    }
}
