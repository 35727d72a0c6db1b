mod actors;
mod config;
mod engine;
mod generator;
mod models;
mod scoring;
mod storage;
mod types;

use std::fs::File;
use std::io::{stderr, stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{
    GeneratorConfig, ScoringPolicy, DEFAULT_AMOUNT_MEAN_DIVISOR, DEFAULT_AMOUNT_STD_DEV, DEFAULT_SEED,
    DEFAULT_SHORT_GAP_PROBABILITY, DEFAULT_SPEND_MAX, DEFAULT_SPEND_MIN, DEFAULT_TRANSACTIONS, DEFAULT_USERS,
    DEFAULT_WINDOW_DAYS
};
use crate::engine::BehaviourEngine;
use crate::generator::{generate_dataset, write_transactions};
use crate::models::{reference_average, UserBehaviour, MODEL_FEATURES};
use crate::scoring::{score_transaction, simulate, BehaviourRatios, TransactionProbe, WhatIfScenario};
use crate::storage::{BehaviourStorage, UserFeatureTable};
use crate::types::{Category, UserId};

#[derive(Parser, Debug)]
#[command(name = "impulse-engine")]
#[command(about = "Synthetic transactions and impulse-spending risk scoring")]
struct Cli {
    /// Log level written to stderr: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "error", env = "IMPULSE_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic transaction table as CSV
    Generate(GenerateArgs),
    /// Score a single transaction with the impulse rule
    Score(ScoreArgs),
    /// Simulate how changed behaviour moves a user's risk score
    Simulate(SimulateArgs),
    /// Show a user's risk profile from the feature table
    Profile(ProfileArgs),
    /// Aggregate a transaction table into per-user behaviour ratios
    Aggregate(AggregateArgs)
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long, default_value_t = DEFAULT_USERS, env = "IMPULSE_USERS")]
    users: u32,

    #[arg(long, default_value_t = DEFAULT_TRANSACTIONS, env = "IMPULSE_TRANSACTIONS")]
    transactions: usize,

    #[arg(long, default_value_t = DEFAULT_SEED, env = "IMPULSE_SEED")]
    seed: u64,

    /// First day of the simulation window
    #[arg(long, default_value = "2024-01-01", env = "IMPULSE_START_DATE")]
    start_date: NaiveDate,

    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS, env = "IMPULSE_WINDOW_DAYS")]
    window_days: u32,

    /// Comma separated subset of merchant categories, all seven when omitted
    #[arg(long, value_delimiter = ',', env = "IMPULSE_CATEGORIES")]
    categories: Vec<Category>,

    /// Lower bound of the per-user average spend
    #[arg(long, default_value_t = DEFAULT_SPEND_MIN, env = "IMPULSE_SPEND_MIN")]
    spend_min: f64,

    /// Upper bound (exclusive) of the per-user average spend
    #[arg(long, default_value_t = DEFAULT_SPEND_MAX, env = "IMPULSE_SPEND_MAX")]
    spend_max: f64,

    /// Mean transaction amount is the user's average spend divided by this
    #[arg(long, default_value_t = DEFAULT_AMOUNT_MEAN_DIVISOR, env = "IMPULSE_AMOUNT_MEAN_DIVISOR")]
    amount_mean_divisor: f64,

    #[arg(long, default_value_t = DEFAULT_AMOUNT_STD_DEV, env = "IMPULSE_AMOUNT_STD_DEV", allow_negative_numbers = true)]
    amount_std_dev: f64,

    #[arg(long, default_value_t = DEFAULT_SHORT_GAP_PROBABILITY, env = "IMPULSE_SHORT_GAP_PROBABILITY")]
    short_gap_probability: f64,

    /// Output file, stdout when omitted
    #[arg(long, env = "IMPULSE_OUTPUT")]
    output: Option<PathBuf>
}

#[derive(Args, Debug)]
struct ScoreArgs {
    #[arg(long)]
    amount: Decimal,

    #[arg(long)]
    category: Category,

    #[arg(long)]
    hour: u32,

    /// Short time since the previous purchase
    #[arg(long)]
    short_gap: bool,

    /// Purchase falls on or after the 25th
    #[arg(long)]
    end_of_month: bool,

    /// Reference average amount of the user
    #[arg(long, conflicts_with = "features")]
    reference_avg: Option<f64>,

    /// Feature table to take the user's average amount from
    #[arg(long, requires = "user")]
    features: Option<PathBuf>,

    #[arg(long)]
    user: Option<UserId>
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[arg(long, env = "IMPULSE_FEATURES")]
    features: PathBuf,

    #[arg(long)]
    user: UserId,

    /// Simulated night transaction ratio, the user's own when omitted
    #[arg(long)]
    night: Option<f64>,

    /// Simulated spending spike ratio, the user's own when omitted
    #[arg(long)]
    spike: Option<f64>,

    /// Simulated short gap ratio, the user's own when omitted
    #[arg(long)]
    short_gap: Option<f64>
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long, env = "IMPULSE_FEATURES")]
    features: PathBuf,

    #[arg(long)]
    user: UserId,

    /// Number of other High/Medium risk users to suggest
    #[arg(long, default_value_t = 5)]
    personas: usize
}

#[derive(Args, Debug)]
struct AggregateArgs {
    /// Transaction table produced by `generate`
    input: PathBuf,

    /// Output file, stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Records buffered between the reader and the user actors
    #[arg(long, default_value_t = 256)]
    backpressure: usize
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let policy = ScoringPolicy::default();

    match cli.command {
        Command::Generate(args) => run_generate(args, &policy),
        Command::Score(args) => run_score(args, &policy),
        Command::Simulate(args) => run_simulate(args, &policy),
        Command::Profile(args) => run_profile(args),
        Command::Aggregate(args) => run_aggregate(args).await
    }
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Tables go to stdout, so logging has to stay on stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn output_writer(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(stdout().lock()))
    })
}

fn run_generate(args: GenerateArgs, policy: &ScoringPolicy) -> Result<()> {
    let defaults = GeneratorConfig::default();
    let config = GeneratorConfig {
        users: args.users,
        transactions: args.transactions,
        seed: args.seed,
        categories: if args.categories.is_empty() { defaults.categories.clone() } else { args.categories },
        start: args.start_date.and_time(defaults.start.time()),
        window_days: args.window_days,
        average_spend: (args.spend_min, args.spend_max),
        amount_mean_divisor: args.amount_mean_divisor,
        amount_std_dev: args.amount_std_dev,
        short_gap_probability: args.short_gap_probability
    };

    let timer = Instant::now();
    let records = generate_dataset(&config, policy)?;
    info!("Generated {} transactions in: {:?}", records.len(), timer.elapsed());

    write_transactions(&records, output_writer(args.output.as_ref())?)
}

fn run_score(args: ScoreArgs, policy: &ScoringPolicy) -> Result<()> {
    let average = match (args.reference_avg, &args.features, args.user) {
        (Some(average), _, _) => average,
        (None, Some(path), Some(user_id)) => UserFeatureTable::from_path(path)?.get(user_id)?.avg_amount,
        _ => bail!("Either --reference-avg or --features with --user is required")
    };

    let probe = TransactionProbe {
        amount: args.amount,
        category: args.category,
        hour: args.hour,
        short_gap: args.short_gap,
        end_of_month: args.end_of_month
    };

    let assessment = score_transaction(&probe, reference_average(average)?, policy)?;

    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "Impulse probability: {}%", assessment.probability_percent())?;
    writeln!(output, "Classification: {}", assessment.classification)?;

    for (indicator, raised) in assessment.explain() {
        writeln!(output, "- {indicator}: {}", if raised { "Yes" } else { "No" })?;
    }

    output.flush()?;

    Ok(())
}

fn run_simulate(args: SimulateArgs, policy: &ScoringPolicy) -> Result<()> {
    let table = UserFeatureTable::from_path(&args.features)?;
    let user = table.get(args.user)?;
    let baseline = BehaviourRatios::from(user);

    let scenario = WhatIfScenario {
        base_risk: user.risk_score,
        baseline,
        simulated: BehaviourRatios {
            night: args.night.unwrap_or(baseline.night),
            spike: args.spike.unwrap_or(baseline.spike),
            short_gap: args.short_gap.unwrap_or(baseline.short_gap)
        }
    };

    let outcome = simulate(&scenario, policy)?;

    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "Original risk: {:.2}", outcome.original_risk)?;
    writeln!(output, "Simulated risk: {:.2} ({:+.2})", outcome.simulated_risk, outcome.change())?;
    writeln!(output, "{}", outcome.recommendation)?;

    output.flush()?;

    Ok(())
}

fn run_profile(args: ProfileArgs) -> Result<()> {
    let table = UserFeatureTable::from_path(&args.features)?;
    let user = table.get(args.user)?;

    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "User: {}", user.user_id)?;
    writeln!(output, "Risk score: {:.2}", user.risk_score)?;
    writeln!(output, "Risk level: {:?}", user.risk_level)?;
    writeln!(output, "Behaviour profile: {}", user.behaviour_profile)?;
    writeln!(output, "Cluster: {}", user.cluster)?;
    writeln!(output, "Recommendation: {}", user.recommendation)?;

    for (name, value) in MODEL_FEATURES.iter().zip(user.model_vector()) {
        writeln!(output, "  {name}: {value:.4}")?;
    }

    let personas: Vec<String> = table.personas(args.personas + 1).iter()
        .filter(|&&user_id| user_id != user.user_id)
        .take(args.personas)
        .map(UserId::to_string)
        .collect();

    writeln!(output, "Other High/Medium risk users: {}", personas.join(", "))?;

    output.flush()?;

    Ok(())
}

async fn run_aggregate(args: AggregateArgs) -> Result<()> {
    if !args.input.exists() {
        bail!("Transaction table {} does not exist", args.input.display());
    }

    let storage = Arc::new(BehaviourStorage::new());
    let engine = BehaviourEngine::new(storage.clone()).with_backpressure(args.backpressure);

    let timer = Instant::now();
    let report = engine.run(args.input.clone()).await?;
    info!(
        "Aggregated {} transactions for {} users in: {:?} ({} rows skipped)",
        report.accepted, report.users, timer.elapsed(), report.skipped
    );

    write_behaviour(&storage.summaries(), output_writer(args.output.as_ref())?)
}

fn write_behaviour<W: Write>(summaries: &[UserBehaviour], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for summary in summaries {
        writer.serialize(summary)?;
    }

    writer.flush()?;

    Ok(())
}
