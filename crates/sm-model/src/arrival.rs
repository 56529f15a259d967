//! Arrival models — how many customers enter the store in one tick.
//!
//! Two strategies implement [`ArrivalModel`]:
//!
//! | Strategy          | Source                                              |
//! |-------------------|-----------------------------------------------------|
//! | [`BandedArrivals`]| Hand-tuned count sets per named time-of-day band    |
//! | [`HourlyArrivals`]| Per-hour distributions over buckets {0, 1, 2, 3},   |
//! |                   | estimated from historical checkout counts or given  |
//! |                   | as a lookup table                                   |
//!
//! [`ArrivalProcess`] wraps both so the engine can pick one from
//! configuration at runtime.
//!
//! Every model is defined over a contiguous range of hours and refuses to
//! draw outside it.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use tracing::info;

use sm_core::{ArrivalStrategy, Location, SimRng};

use crate::{Categorical, HistoricalCorpus, ModelError, ModelResult};

/// Pluggable arrival process.
pub trait ArrivalModel {
    /// Hours of day (inclusive) the model can be queried for.
    fn hours(&self) -> RangeInclusive<u8>;

    /// Number of customers entering during the tick that ends at `time`.
    ///
    /// Fails with [`ModelError::HourOutOfDomain`] if `time.hour()` is outside
    /// [`hours`](Self::hours).
    fn draw(&self, time: NaiveTime, rng: &mut SimRng) -> ModelResult<u32>;

    /// `true` if `hour` can be queried.
    fn covers(&self, hour: u8) -> bool {
        self.hours().contains(&hour)
    }
}

fn check_domain(hours: &RangeInclusive<u8>, hour: u8) -> ModelResult<()> {
    if hours.contains(&hour) {
        Ok(())
    } else {
        Err(ModelError::HourOutOfDomain {
            hour,
            first: *hours.start(),
            last:  *hours.end(),
        })
    }
}

// ── Banded strategy ───────────────────────────────────────────────────────────

const MINUTES_PER_DAY: u16 = 24 * 60;

/// How a band turns into a count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BandDraw {
    /// Always this many entrants.  Deterministic by construction.
    Fixed(u32),
    /// One of these counts, uniformly.  Holds at least two values; a single
    /// permitted count must be written as `Fixed`.
    Uniform(Vec<u32>),
}

impl BandDraw {
    fn draw(&self, rng: &mut SimRng) -> u32 {
        match self {
            BandDraw::Fixed(n) => *n,
            // Non-empty: enforced by BandedArrivals::new.
            BandDraw::Uniform(values) => rng.choose(values).copied().unwrap_or_default(),
        }
    }
}

/// A named time-of-day interval ending (exclusive) at `until_minute`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Band {
    pub name:         &'static str,
    /// Minutes since midnight at which the band ends.
    pub until_minute: u16,
    pub draw:         BandDraw,
}

impl Band {
    pub fn new(name: &'static str, until_hour: u16, until_min: u16, draw: BandDraw) -> Self {
        Self { name, until_minute: until_hour * 60 + until_min, draw }
    }
}

/// Coarse arrival model: the band containing the current time decides the
/// count.
#[derive(Clone, Debug)]
pub struct BandedArrivals {
    bands: Vec<Band>,
    hours: RangeInclusive<u8>,
}

impl BandedArrivals {
    /// Validate and build.  Bands must be ordered by strictly increasing
    /// `until_minute`, the last band must run to midnight, and every
    /// `Uniform` band needs at least two values.
    pub fn new(bands: Vec<Band>, hours: RangeInclusive<u8>) -> ModelResult<Self> {
        if bands.is_empty() {
            return Err(ModelError::InvalidBands("no bands".into()));
        }
        if hours.is_empty() || *hours.end() > 23 {
            return Err(ModelError::InvalidBands(format!("invalid hour range {hours:?}")));
        }
        if bands.windows(2).any(|w| w[0].until_minute >= w[1].until_minute) {
            return Err(ModelError::InvalidBands("band ends must strictly increase".into()));
        }
        if bands.last().map(|b| b.until_minute) != Some(MINUTES_PER_DAY) {
            return Err(ModelError::InvalidBands("last band must end at 24:00".into()));
        }
        for band in &bands {
            if let BandDraw::Uniform(values) = &band.draw {
                if values.len() < 2 {
                    return Err(ModelError::InvalidBands(format!(
                        "band {} lists {} value(s); use BandDraw::Fixed for a single count",
                        band.name,
                        values.len()
                    )));
                }
            }
        }
        Ok(Self { bands, hours })
    }

    /// The hand-tuned weekday table for a store open 07:00–22:00.
    ///
    /// Every band is a genuine uniform choice over a small count set.
    pub fn standard() -> Self {
        let quiet = || BandDraw::Uniform(vec![0, 1, 2]);
        let steady = || BandDraw::Uniform(vec![1, 2]);
        let busy = || BandDraw::Uniform(vec![1, 2, 3]);
        let bands = vec![
            Band::new("pre-open",        8,  0, quiet()),
            Band::new("early-morning",   8, 30, busy()),
            Band::new("mid-morning",     9,  0, steady()),
            Band::new("midday",         12,  0, quiet()),
            Band::new("early-afternoon", 14,  0, steady()),
            Band::new("mid-afternoon",  15,  0, steady()),
            Band::new("late-afternoon", 17,  0, steady()),
            Band::new("early-evening",  19, 30, busy()),
            Band::new("late-evening",   20, 30, steady()),
            Band::new("closing",        24,  0, quiet()),
        ];
        Self { bands, hours: 7..=22 }
    }

    /// The band in force at `time`.
    pub fn band_at(&self, time: NaiveTime) -> &Band {
        let minute = (time.hour() * 60 + time.minute()) as u16;
        self.bands
            .iter()
            .find(|b| minute < b.until_minute)
            .unwrap_or(&self.bands[self.bands.len() - 1])
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }
}

impl ArrivalModel for BandedArrivals {
    fn hours(&self) -> RangeInclusive<u8> {
        self.hours.clone()
    }

    fn draw(&self, time: NaiveTime, rng: &mut SimRng) -> ModelResult<u32> {
        check_domain(&self.hours, time.hour() as u8)?;
        Ok(self.band_at(time).draw.draw(rng))
    }
}

// ── Empirical strategy ────────────────────────────────────────────────────────

/// Arrival-count buckets of the empirical strategy.
pub const ARRIVAL_BUCKETS: [u32; 4] = [0, 1, 2, 3];

/// Map a raw per-timestamp checkout count to its bucket.  Counts above the
/// largest bucket fold into it.
#[inline]
pub fn arrival_bucket(count: u32) -> u32 {
    count.min(ARRIVAL_BUCKETS[ARRIVAL_BUCKETS.len() - 1])
}

/// Per-hour categorical distributions over [`ARRIVAL_BUCKETS`].
#[derive(Clone, Debug)]
pub struct HourlyArrivals {
    first_hour: u8,
    rows:       Vec<Categorical<u32>>,
    /// Number of timestamps each row was estimated from (0 for tables).
    samples:    Vec<u64>,
}

impl HourlyArrivals {
    /// Estimate from historical data.
    ///
    /// For every distinct timestamp in the corpus the number of `checkout`
    /// records is counted and bucketed; the bucket frequencies per hour of
    /// day are normalised.  The domain runs from the earliest to the latest
    /// observed hour; an hour inside it with no timestamps is an error.
    ///
    /// Only timestamps that carry at least one record are sampled.  A minute
    /// in which nobody was in the store adds nothing to bucket 0, so quiet
    /// hours estimate higher arrival counts than a per-minute census would.
    pub fn estimate(corpus: &HistoricalCorpus) -> ModelResult<Self> {
        if corpus.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let mut per_timestamp: BTreeMap<NaiveDateTime, u32> = BTreeMap::new();
        for record in corpus.records() {
            let slot = per_timestamp.entry(record.timestamp).or_default();
            if record.location == Location::Checkout {
                *slot += 1;
            }
        }

        let mut per_hour: BTreeMap<u8, [u64; ARRIVAL_BUCKETS.len()]> = BTreeMap::new();
        for (timestamp, count) in &per_timestamp {
            let row = per_hour.entry(timestamp.hour() as u8).or_default();
            row[arrival_bucket(*count) as usize] += 1;
        }

        let (Some(&first), Some(&last)) = (per_hour.keys().next(), per_hour.keys().next_back()) else {
            return Err(ModelError::EmptyCorpus);
        };

        let mut rows = Vec::with_capacity(usize::from(last - first) + 1);
        let mut samples = Vec::with_capacity(rows.capacity());
        for hour in first..=last {
            let counts = per_hour.get(&hour).ok_or(ModelError::EmptyHour(hour))?;
            samples.push(counts.iter().sum::<u64>());
            rows.push(Categorical::from_counts(ARRIVAL_BUCKETS.to_vec(), counts)?);
        }

        info!(first_hour = first, last_hour = last, timestamps = per_timestamp.len(), "arrival distribution estimated");

        Ok(Self { first_hour: first, rows, samples })
    }

    /// Build from a fixed lookup table: `table[i]` holds the bucket weights
    /// for hour `first_hour + i`.
    pub fn from_table(first_hour: u8, table: &[[f64; ARRIVAL_BUCKETS.len()]]) -> ModelResult<Self> {
        if table.is_empty() {
            return Err(ModelError::InvalidWeights("empty arrival table".into()));
        }
        if usize::from(first_hour) + table.len() > 24 {
            return Err(ModelError::InvalidWeights(format!(
                "{} rows starting at hour {first_hour} run past midnight",
                table.len()
            )));
        }
        let rows = table
            .iter()
            .enumerate()
            .map(|(i, weights)| {
                Categorical::from_weights(ARRIVAL_BUCKETS.to_vec(), weights)
                    .map_err(|e| ModelError::InvalidWeights(format!("hour {}: {e}", usize::from(first_hour) + i)))
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { first_hour, samples: vec![0; rows.len()], rows })
    }

    fn last_hour(&self) -> u8 {
        self.first_hour + (self.rows.len() - 1) as u8
    }

    /// The count distribution for `hour`.
    pub fn distribution(&self, hour: u8) -> ModelResult<&Categorical<u32>> {
        check_domain(&self.hours(), hour)?;
        Ok(&self.rows[usize::from(hour - self.first_hour)])
    }

    /// Number of timestamps `hour` was estimated from.
    pub fn samples(&self, hour: u8) -> ModelResult<u64> {
        check_domain(&self.hours(), hour)?;
        Ok(self.samples[usize::from(hour - self.first_hour)])
    }
}

impl ArrivalModel for HourlyArrivals {
    fn hours(&self) -> RangeInclusive<u8> {
        self.first_hour..=self.last_hour()
    }

    fn draw(&self, time: NaiveTime, rng: &mut SimRng) -> ModelResult<u32> {
        Ok(self.distribution(time.hour() as u8)?.sample(rng))
    }
}

// ── Runtime selection ─────────────────────────────────────────────────────────

/// Either strategy, chosen from [`ArrivalStrategy`].
#[derive(Clone, Debug)]
pub enum ArrivalProcess {
    Banded(BandedArrivals),
    Empirical(HourlyArrivals),
}

impl ArrivalProcess {
    /// Build the model named by `strategy`.  The banded table ignores the
    /// corpus.
    pub fn for_strategy(strategy: ArrivalStrategy, corpus: &HistoricalCorpus) -> ModelResult<Self> {
        match strategy {
            ArrivalStrategy::Banded    => Ok(ArrivalProcess::Banded(BandedArrivals::standard())),
            ArrivalStrategy::Empirical => HourlyArrivals::estimate(corpus).map(ArrivalProcess::Empirical),
        }
    }
}

impl ArrivalModel for ArrivalProcess {
    fn hours(&self) -> RangeInclusive<u8> {
        match self {
            ArrivalProcess::Banded(m)    => m.hours(),
            ArrivalProcess::Empirical(m) => m.hours(),
        }
    }

    fn draw(&self, time: NaiveTime, rng: &mut SimRng) -> ModelResult<u32> {
        match self {
            ArrivalProcess::Banded(m)    => m.draw(time, rng),
            ArrivalProcess::Empirical(m) => m.draw(time, rng),
        }
    }
}
