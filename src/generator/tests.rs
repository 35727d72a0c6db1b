use super::{generate, generate_dataset, write_transactions, UserSpendTable};

use anyhow::Result;
use chrono::{Datelike, Duration, Timelike};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

use crate::config::{GeneratorConfig, ScoringPolicy};
use crate::types::{Category, ImpulseError};

fn small_config(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        users: 25,
        transactions: 2_000,
        seed,
        ..GeneratorConfig::default()
    }
}

#[test]
fn test_same_seed_produces_identical_tables() -> Result<()> {
    let policy = ScoringPolicy::default();

    let first = generate_dataset(&small_config(42), &policy)?;
    let second = generate_dataset(&small_config(42), &policy)?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_different_seeds_produce_different_tables() -> Result<()> {
    let policy = ScoringPolicy::default();

    let first = generate_dataset(&small_config(1), &policy)?;
    let second = generate_dataset(&small_config(2), &policy)?;

    assert_ne!(first, second);

    Ok(())
}

#[test]
fn test_generator_produces_exactly_the_requested_count() -> Result<()> {
    let policy = ScoringPolicy::default();

    assert_eq!(generate_dataset(&small_config(42), &policy)?.len(), 2_000);

    let empty = GeneratorConfig { transactions: 0, ..small_config(42) };
    assert!(generate_dataset(&empty, &policy)?.is_empty());

    Ok(())
}

#[test]
fn test_every_record_satisfies_the_derivation_rules() -> Result<()> {
    let policy = ScoringPolicy::default();
    let config = small_config(7);
    let window_end = config.start + Duration::days(i64::from(config.window_days));

    for record in generate_dataset(&config, &policy)? {
        let flags = record.flags();

        assert!((1..=config.users).contains(&record.user_id));
        assert!(record.amount >= Decimal::ZERO);
        assert!(record.amount.scale() <= 2);
        assert!(record.transaction_time >= config.start && record.transaction_time < window_end);
        assert_eq!(record.hour_of_day, record.transaction_time.hour());
        assert_eq!(record.weekend_flag, record.transaction_time.weekday().num_days_from_monday() >= 5);
        assert_eq!(record.night_transaction, record.hour_of_day >= 20 || record.hour_of_day <= 2);
        assert_eq!(
            record.discretionary_category,
            matches!(record.merchant_category, Category::Fashion | Category::Entertainment | Category::Electronics)
        );
        assert_eq!(record.end_month_flag, record.transaction_time.day() >= 25);
        assert_eq!(record.impulse_label, flags.score() >= 3);
    }

    Ok(())
}

#[test]
fn test_spike_flag_follows_the_injected_spend_table() -> Result<()> {
    let policy = ScoringPolicy::default();
    let config = GeneratorConfig { users: 2, transactions: 500, ..GeneratorConfig::default() };
    let spend = UserSpendTable::from_averages(vec![3000.0, 9000.0]);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for record in generate(&config, &policy, &spend, &mut rng)? {
        let threshold = if record.user_id == 1 { Decimal::from(200) } else { Decimal::from(600) };

        assert_eq!(record.spending_spike, record.amount > threshold);
    }

    Ok(())
}

#[test]
fn test_short_gap_rate_tracks_its_probability() -> Result<()> {
    let policy = ScoringPolicy::default();
    let config = GeneratorConfig { users: 10, transactions: 10_000, ..GeneratorConfig::default() };

    let records = generate_dataset(&config, &policy)?;
    let rate = records.iter().filter(|record| record.short_time_gap).count() as f64 / records.len() as f64;

    assert!((rate - 0.2).abs() < 0.03, "short gap rate was {rate}");

    Ok(())
}

#[test]
fn test_restricted_category_set_is_respected() -> Result<()> {
    let policy = ScoringPolicy::default();
    let config = GeneratorConfig { categories: vec![Category::Bills], ..small_config(3) };

    let records = generate_dataset(&config, &policy)?;

    assert!(records.iter().all(|record| record.merchant_category == Category::Bills));
    assert!(records.iter().all(|record| !record.discretionary_category));

    Ok(())
}

#[test]
fn test_generator_rejects_invalid_arguments() {
    let policy = ScoringPolicy::default();

    let no_users = GeneratorConfig { users: 0, ..small_config(42) };
    assert!(matches!(generate_dataset(&no_users, &policy), Err(ImpulseError::InvalidArgument(_))));

    let no_categories = GeneratorConfig { categories: vec![], ..small_config(42) };
    assert!(matches!(generate_dataset(&no_categories, &policy), Err(ImpulseError::InvalidArgument(_))));

    let no_window = GeneratorConfig { window_days: 0, ..small_config(42) };
    assert!(matches!(generate_dataset(&no_window, &policy), Err(ImpulseError::InvalidArgument(_))));

    let bad_probability = GeneratorConfig { short_gap_probability: 1.5, ..small_config(42) };
    assert!(matches!(generate_dataset(&bad_probability, &policy), Err(ImpulseError::InvalidArgument(_))));

    let bad_deviation = GeneratorConfig { amount_std_dev: -1.0, ..small_config(42) };
    assert!(matches!(generate_dataset(&bad_deviation, &policy), Err(ImpulseError::InvalidArgument(_))));
}

#[test]
fn test_negative_amount_deviation_is_rejected_even_without_transactions() {
    let policy = ScoringPolicy::default();

    for transactions in [0, 10] {
        let config = GeneratorConfig { amount_std_dev: -500.0, transactions, ..small_config(42) };

        assert!(matches!(generate_dataset(&config, &policy), Err(ImpulseError::InvalidArgument(_))));
    }

    let infinite = GeneratorConfig { amount_std_dev: f64::INFINITY, transactions: 0, ..small_config(42) };
    assert!(matches!(generate_dataset(&infinite, &policy), Err(ImpulseError::InvalidArgument(_))));
}

#[test]
fn test_spend_table_must_cover_every_user() {
    let policy = ScoringPolicy::default();
    let config = GeneratorConfig { users: 3, transactions: 10, ..GeneratorConfig::default() };
    let spend = UserSpendTable::from_averages(vec![3000.0, 4000.0]);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let result = generate(&config, &policy, &spend, &mut rng);

    assert_eq!(result, Err(ImpulseError::missing_spend(3)));
}

#[test]
fn test_spend_table_draws_within_range() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let spend = UserSpendTable::draw(100, (2000.0, 10000.0), &mut rng)?;

    assert_eq!(spend.len(), 100);
    assert!((1..=100).filter_map(|user| spend.get(user)).all(|value| (2000.0..10000.0).contains(&value)));
    assert_eq!(spend.get(0), None);
    assert_eq!(spend.get(101), None);

    assert!(UserSpendTable::draw(10, (5.0, 5.0), &mut rng).is_err());

    Ok(())
}

#[test]
fn test_written_table_has_a_header_and_one_row_per_record() -> Result<()> {
    let policy = ScoringPolicy::default();
    let records = generate_dataset(&GeneratorConfig { users: 5, transactions: 20, ..GeneratorConfig::default() }, &policy)?;

    let mut output = Vec::new();
    write_transactions(&records, &mut output)?;
    let output = String::from_utf8(output)?;

    assert_eq!(output.lines().count(), 21);
    assert!(output.starts_with("user_id,transaction_time,amount,merchant_category,"));

    Ok(())
}
