//! `supermarket` — estimate a customer-flow model from historical day files
//! and simulate one trading day.
//!
//! Reads `{data_dir}/{day}.csv` for every requested day, estimates the
//! transition matrix and the arrival model, runs the store from opening to
//! closing and writes the trajectory log as `;`-delimited CSV.
//!
//! Run with:
//!   cargo run -p supermarket --release -- --data-dir ./customer_data \
//!       --config demos/supermarket/config.json --output simulated.csv
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Timelike};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sm_core::{ArrivalStrategy, Location, SimConfig, Tick, TrajectoryRecord};
use sm_model::{ArrivalModel, ArrivalProcess, BandDraw, HistoricalCorpus, TransitionModel, load_days};
use sm_output::{CsvWriter, LogOutputObserver, TrajectoryWriter};
use sm_sim::{SimBuilder, SimObserver};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StrategyArg {
    Banded,
    Empirical,
}

impl From<StrategyArg> for ArrivalStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Banded    => ArrivalStrategy::Banded,
            StrategyArg::Empirical => ArrivalStrategy::Empirical,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "supermarket")]
#[command(about = "Simulate supermarket customer flow from historical trajectories")]
struct Args {
    /// Directory holding one `{day}.csv` file per shopping day
    #[arg(short, long, default_value = "customer_data")]
    data_dir: PathBuf,

    /// Day files to load, comma separated
    #[arg(long, value_delimiter = ',', default_value = "monday,tuesday,wednesday,thursday,friday")]
    days: Vec<String>,

    /// JSON run configuration (opening, closing, tick length, seed, ...)
    #[arg(short, long, default_value = "demos/supermarket/config.json")]
    config: PathBuf,

    /// Trajectory log destination
    #[arg(short, long, default_value = "customer_simulation.csv")]
    output: PathBuf,

    /// Override the configured arrival strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Override the configured RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the configured number of customers present at opening
    #[arg(long)]
    initial_customers: Option<usize>,

    /// Also write the log to this SQLite database
    #[cfg(feature = "sqlite")]
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Re-estimate the transition matrix from the simulated log and report
    /// its distance from the historical one
    #[arg(long)]
    verify: bool,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let file = File::open(&args.config)
        .with_context(|| format!("opening config {}", args.config.display()))?;
    let mut config: SimConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", args.config.display()))?;

    if let Some(strategy) = args.strategy {
        config.arrival_strategy = strategy.into();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(n) = args.initial_customers {
        config.initial_customers = n;
    }
    Ok(config)
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs store occupancy once per simulated hour and forwards the final log
/// to the output writer.
struct DriverObserver<W: TrajectoryWriter> {
    output:    LogOutputObserver<W>,
    last_hour: Option<u32>,
    peak:      usize,
}

impl<W: TrajectoryWriter> DriverObserver<W> {
    fn new(writer: W) -> Self {
        Self { output: LogOutputObserver::new(writer), last_hour: None, peak: 0 }
    }
}

impl<W: TrajectoryWriter> SimObserver for DriverObserver<W> {
    fn on_tick_end(&mut self, _tick: Tick, time: NaiveDateTime, active: usize) {
        self.peak = self.peak.max(active);
        if self.last_hour != Some(time.hour()) {
            self.last_hour = Some(time.hour());
            info!(time = %time, active, "store occupancy");
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick, records: &[TrajectoryRecord]) {
        self.output.on_sim_end(final_tick, records);
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

fn print_matrix(model: &TransitionModel) {
    print!("{:>10}", "from \\ to");
    for to in Location::ALL {
        print!("{:>10}", to.as_str());
    }
    println!("{:>8}", "n");
    for from in Location::ALL {
        print!("{:>10}", from.as_str());
        for to in Location::ALL {
            print!("{:>10.3}", model.probability(from, to));
        }
        println!("{:>8}", model.observations(from));
    }
}

fn print_arrivals(model: &ArrivalProcess) -> Result<()> {
    match model {
        ArrivalProcess::Banded(banded) => {
            for band in banded.bands() {
                let counts = match &band.draw {
                    BandDraw::Fixed(n)        => n.to_string(),
                    BandDraw::Uniform(values) => format!("one of {values:?}"),
                };
                println!(
                    "{:>16} until {:02}:{:02}  {counts}",
                    band.name,
                    band.until_minute / 60,
                    band.until_minute % 60,
                );
            }
        }
        ArrivalProcess::Empirical(hourly) => {
            for hour in hourly.hours() {
                let dist = hourly.distribution(hour)?;
                print!("{hour:>6}:00");
                for (count, p) in dist.outcomes().iter().zip(dist.probabilities()) {
                    print!("  {count}: {p:.3}");
                }
                println!("{:>8}", hourly.samples(hour)?);
            }
        }
    }
    Ok(())
}

/// Close the sink and delete whatever it wrote.
fn discard_output<W: TrajectoryWriter>(observer: DriverObserver<W>, path: &Path) {
    drop(observer);
    if let Err(e) = std::fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "could not remove partial output");
    }
}

#[cfg(feature = "sqlite")]
fn write_sqlite(path: &Path, records: &[TrajectoryRecord]) -> Result<()> {
    let mut writer = sm_output::SqliteWriter::new(path)
        .with_context(|| format!("opening {}", path.display()))?;
    writer.append(records)?;
    writer.finish()?;
    println!("SQLite log:                {}", path.display());
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    println!("=== supermarket — customer flow simulation ===");
    println!(
        "Open {} → {}, Δt {}s, {} customers at opening, seed {}, {} arrivals",
        config.opening,
        config.closing,
        config.tick_duration_secs,
        config.initial_customers,
        config.seed,
        config.arrival_strategy,
    );
    println!();

    // ── Estimate ──────────────────────────────────────────────────────────
    let t_estimate = Instant::now();
    let corpus = load_days(&args.data_dir, &args.days)
        .with_context(|| format!("loading day files from {}", args.data_dir.display()))?;
    let transitions = TransitionModel::estimate(&corpus).context("estimating transitions")?;
    let arrivals = ArrivalProcess::for_strategy(config.arrival_strategy, &corpus)
        .context("estimating arrivals")?;
    let hours = arrivals.hours();

    println!(
        "Corpus: {} complete sessions, {} records ({} days) in {:.2}s",
        corpus.session_count(),
        corpus.len(),
        args.days.len(),
        t_estimate.elapsed().as_secs_f64(),
    );
    println!("Arrival model covers hours {}..={}", hours.start(), hours.end());
    print_arrivals(&arrivals)?;
    println!();
    print_matrix(&transitions);
    println!();

    // ── Simulate ──────────────────────────────────────────────────────────
    let mut sim = SimBuilder::new(config, transitions.clone(), arrivals).build()?;
    let writer = CsvWriter::new(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut observer = DriverObserver::new(writer);

    let t_run = Instant::now();
    if let Err(e) = sim.run(&mut observer) {
        discard_output(observer, &args.output);
        return Err(e.into());
    }
    if let Some(e) = observer.output.take_error() {
        discard_output(observer, &args.output);
        return Err(e).with_context(|| format!("writing {}", args.output.display()));
    }

    let customers = sim.next_id().0 - 1;
    println!("Simulation complete in {:.3}s", t_run.elapsed().as_secs_f64());
    println!("Ticks:                     {}", sim.clock.current_tick.0);
    println!("Customers:                 {customers}");
    println!("Peak occupancy:            {}", observer.peak);
    println!("Records:                   {}", observer.output.written());
    println!("Trajectory log:            {}", args.output.display());

    #[cfg(feature = "sqlite")]
    if let Some(path) = &args.sqlite {
        write_sqlite(path, sim.log().records())?;
    }

    // ── Verify ────────────────────────────────────────────────────────────
    if args.verify {
        let simulated = HistoricalCorpus::from_trajectories(sim.log().records());
        let re_estimated = TransitionModel::estimate(&simulated)
            .context("re-estimating transitions from the simulated log")?;
        println!();
        println!("Re-estimated from {} simulated sessions:", simulated.session_count());
        print_matrix(&re_estimated);
        println!(
            "Max row total-variation distance to historical matrix: {:.4}",
            re_estimated.total_variation(&transitions)
        );
    }

    Ok(())
}
