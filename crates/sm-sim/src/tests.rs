//! Integration tests for sm-sim.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use sm_core::{ArrivalStrategy, CustomerId, Location, SimConfig, SimRng, Tick, TrajectoryRecord};
use sm_model::{
    ArrivalModel, Band, BandDraw, BandedArrivals, HourlyArrivals, ModelError, ModelResult,
    TransitionModel,
};

use crate::{NoopObserver, SimBuilder, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 5, 4).unwrap().and_hms_opt(h, m, 0).unwrap()
}

fn test_config(opening: NaiveDateTime, closing: NaiveDateTime, initial_customers: usize) -> SimConfig {
    SimConfig {
        opening,
        closing,
        tick_duration_secs: 60,
        initial_customers,
        seed:               42,
        arrival_strategy:   ArrivalStrategy::Empirical,
    }
}

/// Rows in `Location::ALL` order: checkout, dairy, drinks, fruit, spices.
/// Entrants are never placed straight at checkout.
fn generating_matrix() -> TransitionModel {
    TransitionModel::from_rows([
        [0.0,  0.4,  0.1,  0.3,  0.2 ],
        [0.3,  0.3,  0.15, 0.1,  0.15],
        [0.4,  0.05, 0.35, 0.1,  0.1 ],
        [0.25, 0.2,  0.15, 0.3,  0.1 ],
        [0.3,  0.2,  0.2,  0.1,  0.2 ],
    ])
    .unwrap()
}

/// Draws 0 every hour of the day.
fn no_arrivals() -> HourlyArrivals {
    HourlyArrivals::from_table(0, &[[1.0, 0.0, 0.0, 0.0]; 24]).unwrap()
}

/// Admits exactly `n` customers every tick, all day.
fn fixed_arrivals(n: u32) -> BandedArrivals {
    BandedArrivals::new(vec![Band::new("all-day", 24, 0, BandDraw::Fixed(n))], 0..=23).unwrap()
}

fn by_customer(records: &[TrajectoryRecord]) -> BTreeMap<CustomerId, Vec<TrajectoryRecord>> {
    let mut map: BTreeMap<CustomerId, Vec<TrajectoryRecord>> = BTreeMap::new();
    for r in records {
        map.entry(r.customer).or_default().push(*r);
    }
    map
}

#[derive(Default)]
struct Recorder {
    started: Vec<Tick>,
    ended:   Vec<(Tick, NaiveDateTime, usize)>,
    closed:  Option<(Tick, usize)>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, tick: Tick) {
        self.started.push(tick);
    }

    fn on_tick_end(&mut self, tick: Tick, time: NaiveDateTime, active: usize) {
        self.ended.push((tick, time, active));
    }

    fn on_sim_end(&mut self, final_tick: Tick, records: &[TrajectoryRecord]) {
        self.closed = Some((final_tick, records.len()));
    }
}

// ── Customer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod customer_tests {
    use sm_core::CustomerState;

    use super::*;
    use crate::{Customer, SimError};

    #[test]
    fn starts_at_entrance() {
        let c = Customer::new(CustomerId(7));
        assert_eq!(c.state, CustomerState::Entrance);
        assert_eq!(c.location(), None);
        assert!(!c.is_checked_out());
    }

    #[test]
    fn first_move_uses_checkout_row() {
        let model = generating_matrix();
        let mut rng = SimRng::new(1);
        for i in 0..500 {
            let mut c = Customer::new(CustomerId(i));
            let first = c.advance(&model, &mut rng).unwrap();
            assert_ne!(first, Location::Checkout);
            assert_eq!(c.location(), Some(first));
        }
    }

    #[test]
    fn checked_out_customer_cannot_move() {
        let model = generating_matrix();
        let mut rng = SimRng::new(1);
        let mut c = Customer::new(CustomerId(3));
        c.state = CustomerState::At(Location::Checkout);
        assert!(c.is_checked_out());
        assert!(matches!(
            c.advance(&model, &mut rng),
            Err(SimError::CustomerExited(CustomerId(3)))
        ));
    }
}

// ── TrajectoryLog ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod log_tests {
    use super::*;
    use crate::TrajectoryLog;

    #[test]
    fn duplicates_are_skipped() {
        let mut log = TrajectoryLog::new();
        let r = TrajectoryRecord::new(at(7, 1), CustomerId(1), Location::Dairy);
        assert!(log.push(r));
        assert!(!log.push(r));
        assert!(log.push(TrajectoryRecord::new(at(7, 2), CustomerId(1), Location::Dairy)));
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0], r);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_successfully() {
        let sim = SimBuilder::new(test_config(at(7, 0), at(22, 0), 3), generating_matrix(), no_arrivals())
            .build()
            .unwrap();
        assert_eq!(sim.clock.current_tick, Tick::ZERO);
        assert!(!sim.is_closed());
        assert!(sim.active().is_empty());
        assert_eq!(sim.next_id(), CustomerId::FIRST);
    }

    #[test]
    fn zero_tick_duration_rejected() {
        let mut config = test_config(at(7, 0), at(8, 0), 3);
        config.tick_duration_secs = 0;
        let result = SimBuilder::new(config, generating_matrix(), no_arrivals()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn closing_before_opening_rejected() {
        let config = test_config(at(8, 0), at(7, 0), 3);
        let result = SimBuilder::new(config, generating_matrix(), no_arrivals()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn zero_initial_customers_rejected() {
        let config = test_config(at(7, 0), at(8, 0), 0);
        let result = SimBuilder::new(config, generating_matrix(), no_arrivals()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn arrival_domain_must_cover_run() {
        let seven_only = HourlyArrivals::from_table(7, &[[1.0, 0.0, 0.0, 0.0]]).unwrap();

        // Last tick lands on 07:59.
        let ok = test_config(at(7, 0), at(7, 59), 3);
        assert!(SimBuilder::new(ok, generating_matrix(), seven_only.clone()).build().is_ok());

        // Last tick lands on 08:00 and draws at hour 8.
        let late = test_config(at(7, 0), at(8, 0), 3);
        let result = SimBuilder::new(late, generating_matrix(), seven_only.clone()).build();
        assert!(matches!(
            result,
            Err(SimError::ArrivalCoverage { hour: 8, first: 7, last: 7 })
        ));

        // The opening tick (06:59) never draws.
        let early = test_config(at(6, 58), at(7, 30), 3);
        assert!(SimBuilder::new(early, generating_matrix(), seven_only).build().is_ok());
    }

    #[test]
    fn standard_bands_cover_trading_day() {
        let config = test_config(at(7, 0), at(22, 0), 5);
        assert!(SimBuilder::new(config, generating_matrix(), BandedArrivals::standard()).build().is_ok());
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn opening_tick_records_seed_customers() {
        let config = test_config(at(7, 0), at(7, 5), 3);
        let mut sim = SimBuilder::new(config, generating_matrix(), no_arrivals()).build().unwrap();

        sim.open(&mut NoopObserver).unwrap();

        let records = sim.log().records();
        assert_eq!(records.len(), 3);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.timestamp, at(7, 1));
            assert_eq!(r.customer, CustomerId(i as u64 + 1));
            assert_ne!(r.location, Location::Checkout);
        }
        assert_eq!(sim.clock.current_tick, Tick(1));

        // A second open is a no-op.
        sim.open(&mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(1));
    }

    #[test]
    fn five_minute_run_stops_at_closing() {
        let config = test_config(at(7, 0), at(7, 5), 3);
        let mut sim = SimBuilder::new(config, generating_matrix(), no_arrivals()).build().unwrap();
        let mut recorder = Recorder::default();

        sim.run(&mut recorder).unwrap();

        assert!(sim.is_closed());
        assert_eq!(sim.clock.current_tick, Tick(5));
        assert_eq!(sim.clock.now(), at(7, 5));
        assert_eq!(recorder.started, (1..=5).map(Tick).collect::<Vec<_>>());
        assert_eq!(recorder.ended.last().map(|e| e.1), Some(at(7, 5)));

        let records = sim.log().records();
        assert!(records.iter().all(|r| r.timestamp <= at(7, 5)));
        assert!(records.iter().all(|r| r.customer.0 <= 3));
        assert_eq!(recorder.closed, Some((Tick(5), records.len())));
    }

    #[test]
    fn second_run_does_not_flush_again() {
        let config = test_config(at(7, 0), at(7, 5), 3);
        let mut sim = SimBuilder::new(config, generating_matrix(), no_arrivals()).build().unwrap();
        let mut recorder = Recorder::default();

        sim.run(&mut recorder).unwrap();
        assert!(sim.is_flushed());
        let records = sim.log().len();

        let mut again = Recorder::default();
        sim.run(&mut again).unwrap();
        assert_eq!(again.closed, None);
        assert!(again.started.is_empty());
        assert_eq!(sim.log().len(), records);
        assert_eq!(sim.clock.current_tick, Tick(5));
    }

    #[test]
    fn zero_draw_admits_nobody() {
        let config = test_config(at(7, 0), at(9, 0), 4);
        let mut sim = SimBuilder::new(config, generating_matrix(), no_arrivals()).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.next_id(), CustomerId(5));
        assert!(sim.log().records().iter().all(|r| r.customer.0 <= 4));
    }

    #[test]
    fn ids_strictly_increase_within_each_tick() {
        let config = test_config(at(7, 0), at(7, 30), 3);
        let mut sim = SimBuilder::new(config, generating_matrix(), fixed_arrivals(2)).build().unwrap();
        sim.run_ticks(3, &mut NoopObserver).unwrap();

        // 3 seed customers, then 2 per tick.
        assert_eq!(sim.next_id(), CustomerId(8));
        let mut per_tick: BTreeMap<NaiveDateTime, Vec<u64>> = BTreeMap::new();
        for r in sim.log().records() {
            per_tick.entry(r.timestamp).or_default().push(r.customer.0);
        }
        for ids in per_tick.values() {
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn checkout_is_recorded_once_and_last() {
        let config = test_config(at(7, 0), at(22, 0), 5);
        let mut sim = SimBuilder::new(config, generating_matrix(), BandedArrivals::standard()).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let trajectories = by_customer(sim.log().records());
        assert!(trajectories.len() > 100);
        for (id, trajectory) in trajectories {
            let checkouts = trajectory.iter().filter(|r| r.location == Location::Checkout).count();
            assert!(checkouts <= 1, "customer {id} checked out {checkouts} times");
            if checkouts == 1 {
                assert_eq!(trajectory.last().map(|r| r.location), Some(Location::Checkout));
            }
            // One record per tick, no gaps, never placed at checkout first.
            assert!(trajectory.windows(2).all(|w| w[1].timestamp - w[0].timestamp == chrono::TimeDelta::minutes(1)));
            assert_ne!(trajectory[0].location, Location::Checkout);
        }
    }

    #[test]
    fn checked_out_customers_leave_next_tick() {
        let config = test_config(at(7, 0), at(8, 0), 20);
        let mut sim = SimBuilder::new(config, generating_matrix(), no_arrivals()).build().unwrap();
        sim.open(&mut NoopObserver).unwrap();
        for _ in 0..20 {
            let leaving: Vec<CustomerId> =
                sim.active().iter().filter(|c| c.is_checked_out()).map(|c| c.id).collect();
            sim.run_ticks(1, &mut NoopObserver).unwrap();
            assert!(sim.active().iter().all(|c| !leaving.contains(&c.id)));
        }
    }

    #[test]
    fn every_record_is_a_modelled_location() {
        let config = test_config(at(7, 0), at(12, 0), 5);
        let mut sim = SimBuilder::new(config, generating_matrix(), fixed_arrivals(1)).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        for r in sim.log().records() {
            assert!(Location::ALL.contains(&r.location));
            assert!(sim.transitions().distribution_for(r.location).total() > 0.0);
        }
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism_tests {
    use super::*;

    fn run_with_seed(seed: u64) -> Vec<TrajectoryRecord> {
        let mut config = test_config(at(7, 0), at(22, 0), 5);
        config.seed = seed;
        let mut sim = SimBuilder::new(config, generating_matrix(), BandedArrivals::standard()).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        sim.into_records()
    }

    #[test]
    fn same_seed_same_log() {
        assert_eq!(run_with_seed(42), run_with_seed(42));
    }

    #[test]
    fn different_seed_different_log() {
        assert_ne!(run_with_seed(42), run_with_seed(43));
    }

    #[test]
    fn explicit_rng_matches_config_seed() {
        let config = test_config(at(7, 0), at(10, 0), 5);
        let mut a = SimBuilder::new(config.clone(), generating_matrix(), BandedArrivals::standard()).build().unwrap();
        let mut b = SimBuilder::new(config, generating_matrix(), BandedArrivals::standard())
            .rng(SimRng::new(42))
            .build()
            .unwrap();
        a.run(&mut NoopObserver).unwrap();
        b.run(&mut NoopObserver).unwrap();
        assert_eq!(a.log().records(), b.log().records());
    }
}

// ── Failure handling ──────────────────────────────────────────────────────────

#[cfg(test)]
mod failure_tests {
    use super::*;
    use crate::SimError;

    /// Claims the whole day but fails from 07:03 on.
    struct FailsAfterTwoMinutes;

    impl ArrivalModel for FailsAfterTwoMinutes {
        fn hours(&self) -> RangeInclusive<u8> {
            0..=23
        }

        fn draw(&self, time: NaiveTime, _rng: &mut SimRng) -> ModelResult<u32> {
            if time.minute() >= 3 {
                Err(ModelError::EmptyHour(time.hour() as u8))
            } else {
                Ok(1)
            }
        }
    }

    #[test]
    fn failed_run_never_flushes() {
        let config = test_config(at(7, 0), at(7, 10), 2);
        let mut sim = SimBuilder::new(config, generating_matrix(), FailsAfterTwoMinutes).build().unwrap();
        let mut recorder = Recorder::default();

        let result = sim.run(&mut recorder);

        assert!(matches!(result, Err(SimError::Model(ModelError::EmptyHour(7)))));
        assert!(recorder.closed.is_none());
        assert_eq!(recorder.ended.len(), 2);
    }
}

// ── Statistical convergence ───────────────────────────────────────────────────

#[cfg(test)]
mod convergence_tests {
    use sm_model::HistoricalCorpus;

    use super::*;

    #[test]
    fn re_estimated_matrix_converges_to_generator() {
        let generator = generating_matrix();
        // Three entrants every tick, all day.
        let arrivals = HourlyArrivals::from_table(0, &[[0.0, 0.0, 0.0, 1.0]; 24]).unwrap();
        let mut config = test_config(at(0, 0), at(23, 0), 10);
        config.tick_duration_secs = 30;

        let mut sim = SimBuilder::new(config, generator.clone(), arrivals).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let corpus = HistoricalCorpus::from_trajectories(sim.log().records());
        assert!(corpus.session_count() > 8_000);

        let estimated = TransitionModel::estimate(&corpus).unwrap();
        let tv = estimated.total_variation(&generator);
        assert!(tv < 0.05, "total variation {tv}");
    }
}
