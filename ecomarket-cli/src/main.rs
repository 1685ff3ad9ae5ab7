//! EcoMarket CLI — seed, simulate, and export the virtual stock market.
//!
//! Commands:
//! - `seed` — build a market from the company catalog and list it
//! - `run` — run a full simulated session (jobs + demo trades) and export
//!   price history and snapshot CSVs

use anyhow::{Context, Result};
use chrono::Duration as ChronoDuration;
use clap::{Parser, Subcommand};
use ecomarket_core::clock::{Clock, ManualClock, SystemClock};
use ecomarket_core::config::MarketConfig;
use ecomarket_core::domain::UserId;
use ecomarket_core::engine::MarketEngine;
use ecomarket_core::ledger::valuation::portfolio_breakdown;
use ecomarket_core::ledger::PortfolioLedger;
use ecomarket_core::rng::SeedHierarchy;
use ecomarket_core::seed::seed_companies;
use ecomarket_core::store::{CurrencyLedger, InMemoryLedger, MarketStore};
use ecomarket_jobs::export::export_all;
use ecomarket_jobs::{
    EventInjectionJob, JobsConfig, PriceTickJob, Scheduler, SnapshotJob, WatchdogJob,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "ecomarket",
    about = "EcoMarket CLI — sustainable stock market simulation"
)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a market from the company catalog and list it.
    Seed {
        /// Number of companies to seed from the catalog.
        #[arg(long, default_value_t = 20)]
        companies: usize,

        /// Number of market events to inject at start.
        #[arg(long, default_value_t = 5)]
        events: usize,

        /// Master RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Run a simulated session and export the resulting data.
    Run {
        /// Session length in simulated minutes.
        #[arg(long, default_value_t = 30)]
        minutes: i64,

        /// Number of companies to seed from the catalog.
        #[arg(long, default_value_t = 20)]
        companies: usize,

        /// Number of demo investors, each given an opening balance.
        #[arg(long, default_value_t = 2)]
        users: usize,

        /// Opening balance per demo investor.
        #[arg(long, default_value = "10000.00")]
        balance: Decimal,

        /// Master RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Run against the wall clock instead of simulated time.
        #[arg(long, default_value_t = false)]
        realtime: bool,

        /// Optional TOML file with job intervals.
        #[arg(long)]
        jobs_config: Option<PathBuf>,

        /// Directory for the CSV exports.
        #[arg(long, default_value = "exports")]
        output_dir: PathBuf,
    },
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Seed {
            companies,
            events,
            seed,
        } => run_seed(companies, events, seed),
        Commands::Run {
            minutes,
            companies,
            users,
            balance,
            seed,
            realtime,
            jobs_config,
            output_dir,
        } => run_session(
            minutes,
            companies,
            users,
            balance,
            seed,
            realtime,
            jobs_config,
            output_dir,
        ),
    }
}

fn build_engine(
    store: Arc<MarketStore>,
    currency: Arc<InMemoryLedger>,
    clock: Arc<dyn Clock>,
    seed: u64,
) -> Arc<MarketEngine> {
    Arc::new(MarketEngine::new(
        store,
        currency as Arc<dyn CurrencyLedger>,
        MarketConfig::default(),
        SeedHierarchy::new(seed),
        clock,
    ))
}

fn run_seed(companies: usize, events: usize, seed: u64) -> Result<()> {
    let store = Arc::new(MarketStore::new());
    let currency = Arc::new(InMemoryLedger::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    seed_companies(&store, companies, clock.now());
    let engine = build_engine(Arc::clone(&store), currency, clock, seed);
    engine.inject_events(events)?;

    println!("{:<4} {:<26} {:>8} {:>10}", "id", "name", "rating", "price");
    for company in store.companies() {
        println!(
            "{:<4} {:<26} {:>8} {:>10}",
            company.id.0, company.name, company.sustainability_rating, company.current_price
        );
    }
    println!();
    for event in store.events() {
        println!(
            "[{}] {} (impact {:+}, {} min, {} companies)",
            event.id,
            event.title,
            event.impact_factor,
            event.duration_minutes,
            event.affected_companies.len()
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_session(
    minutes: i64,
    companies: usize,
    users: usize,
    balance: Decimal,
    seed: u64,
    realtime: bool,
    jobs_config: Option<PathBuf>,
    output_dir: PathBuf,
) -> Result<()> {
    let jobs_config = match jobs_config {
        Some(path) => JobsConfig::load(&path)?,
        None => JobsConfig::default(),
    };

    let store = Arc::new(MarketStore::new());
    let currency = Arc::new(InMemoryLedger::new());
    let manual = Arc::new(ManualClock::new(chrono::Utc::now()));
    let clock: Arc<dyn Clock> = if realtime {
        Arc::new(SystemClock)
    } else {
        manual.clone()
    };

    info!(minutes, companies, users, seed, realtime, "starting session");
    let seeded = seed_companies(&store, companies, clock.now());
    let engine = build_engine(
        Arc::clone(&store),
        Arc::clone(&currency),
        Arc::clone(&clock),
        seed,
    );
    let ledger = PortfolioLedger::new(
        Arc::clone(&store),
        currency.clone() as Arc<dyn CurrencyLedger>,
        MarketConfig::default(),
        Arc::clone(&clock),
    );

    // Demo investors each take an opening position.
    let investors: Vec<UserId> = (0..users)
        .map(|i| {
            let user = UserId::new(format!("investor-{}", i + 1));
            currency.register(user.clone(), balance);
            if !seeded.is_empty() {
                let company = seeded[i % seeded.len()];
                ledger
                    .buy(&user, company, 10)
                    .with_context(|| format!("opening buy for {user} failed"))?;
            }
            Ok(user)
        })
        .collect::<Result<_>>()?;

    let mut scheduler = Scheduler::new(Arc::clone(&clock));
    scheduler.register(
        Box::new(EventInjectionJob::new(Arc::clone(&engine))),
        jobs_config.event_injection_interval(),
    );
    scheduler.register(
        Box::new(PriceTickJob::new(Arc::clone(&engine))),
        jobs_config.price_tick_interval(),
    );
    scheduler.register(
        Box::new(WatchdogJob::new(Arc::clone(&engine))),
        jobs_config.watchdog_interval(),
    );
    scheduler.register(
        Box::new(SnapshotJob::new(Arc::clone(&engine))),
        jobs_config.snapshot_interval(),
    );

    let session_end = clock.now() + ChronoDuration::minutes(minutes);
    while clock.now() < session_end {
        scheduler.run_pending();
        if realtime {
            std::thread::sleep(std::time::Duration::from_secs(1));
        } else {
            manual.advance(ChronoDuration::seconds(1));
        }
    }

    println!("session complete after {minutes} simulated minutes");
    for user in &investors {
        let breakdown = portfolio_breakdown(&store, user);
        println!(
            "{}: balance {} portfolio {} green-impact {}",
            user,
            currency.balance(user).unwrap_or(Decimal::ZERO),
            breakdown.total_value,
            breakdown.green_impact_score
        );
    }
    let now = clock.now();
    for event in store.active_events(now) {
        let left = event.minutes_remaining(now).unwrap_or(0);
        println!("active event: {} ({left} min left)", event.title);
    }

    export_all(&store, &output_dir)?;
    println!("exports written to {}", output_dir.display());
    Ok(())
}
