use std::io::Write;

use chrono::{Duration, NaiveDateTime};
use rand::distributions::Bernoulli;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::{GeneratorConfig, ScoringPolicy};
use crate::generator::UserSpendTable;
use crate::models::{reference_average, TransactionRecord};
use crate::types::{ImpulseError, UserId};

fn validate(config: &GeneratorConfig, spend: &UserSpendTable) -> Result<Bernoulli, ImpulseError> {
    if config.users == 0 {
        return Err(ImpulseError::no_users());
    }

    if config.categories.is_empty() {
        return Err(ImpulseError::no_categories());
    }

    if config.window_days == 0 {
        return Err(ImpulseError::empty_window());
    }

    if !(config.amount_mean_divisor.is_finite() && config.amount_mean_divisor > 0.0) {
        return Err(ImpulseError::invalid_distribution(format!("mean divisor [{}] must be positive", config.amount_mean_divisor)));
    }

    if !(config.amount_std_dev.is_finite() && config.amount_std_dev >= 0.0) {
        return Err(ImpulseError::invalid_distribution(format!("standard deviation [{}] must be non-negative", config.amount_std_dev)));
    }

    if spend.len() < config.users as usize {
        return Err(ImpulseError::missing_spend(spend.len() as UserId + 1));
    }

    Bernoulli::new(config.short_gap_probability)
        .map_err(|_| ImpulseError::invalid_probability(config.short_gap_probability))
}

fn transaction_time(start: NaiveDateTime, day: u32, hour: u32, minute: u32) -> Result<NaiveDateTime, ImpulseError> {
    let offset = Duration::days(i64::from(day)) + Duration::hours(i64::from(hour)) + Duration::minutes(i64::from(minute));

    start.checked_add_signed(offset)
        .ok_or_else(|| ImpulseError::InvalidArgument(format!("Start [{start}] plus {day} days is out of range")))
}

/// Produces exactly `config.transactions` synthetic records.
///
/// Each record consumes its random draws in a fixed order: user, day offset,
/// hour, minute, category, amount, short-gap flag. The same generator state
/// therefore always yields the same table.
///
/// # Errors
/// Returns `InvalidArgument` for zero users, an empty category set, an empty
/// window, an unusable distribution or a spend table missing a user.
pub fn generate<R: Rng>(
    config: &GeneratorConfig,
    policy: &ScoringPolicy,
    spend: &UserSpendTable,
    rng: &mut R
) -> Result<Vec<TransactionRecord>, ImpulseError> {
    let short_gap = validate(config, spend)?;
    let mut records = Vec::with_capacity(config.transactions);

    for _ in 0..config.transactions {
        let user_id = rng.gen_range(1..=config.users);
        let day = rng.gen_range(0..config.window_days);
        let hour = rng.gen_range(0..24);
        let minute = rng.gen_range(0..60);
        let category = *config.categories.choose(rng).ok_or_else(ImpulseError::no_categories)?;

        let average = spend.get(user_id).ok_or_else(|| ImpulseError::missing_spend(user_id))?;
        let amount_distribution = Normal::new(average / config.amount_mean_divisor, config.amount_std_dev)
            .map_err(|error| ImpulseError::invalid_distribution(error.to_string()))?;
        let raw_amount: f64 = rng.sample(amount_distribution);
        let amount = Decimal::from_f64(raw_amount)
            .ok_or_else(|| ImpulseError::invalid_distribution(format!("drew non-finite amount [{raw_amount}]")))?
            .round_dp(2)
            .abs();

        //NOTE: Independent noise, not the elapsed time since the user's previous transaction
        let short_time_gap = rng.sample(short_gap);

        let record = TransactionRecord::derive(
            user_id,
            transaction_time(config.start, day, hour, minute)?,
            amount,
            category,
            short_time_gap,
            reference_average(average)?,
            policy
        )?;

        records.push(record);
    }

    debug!("Generated {} records for {} users", records.len(), config.users);

    Ok(records)
}

/// Seeds a generator once from `config.seed`, draws the spend table and then
/// the transactions.
pub fn generate_dataset(config: &GeneratorConfig, policy: &ScoringPolicy) -> Result<Vec<TransactionRecord>, ImpulseError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let spend = UserSpendTable::draw(config.users, config.average_spend, &mut rng)?;

    info!("Generating {} transactions for {} users with seed {}", config.transactions, config.users, config.seed);

    generate(config, policy, &spend, &mut rng)
}

/// Writes the records as a CSV table with a header row.
pub fn write_transactions<W: Write>(records: &[TransactionRecord], writer: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;

    Ok(())
}
