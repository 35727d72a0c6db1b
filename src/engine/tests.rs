use super::{BehaviourEngine, IngestReport};

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::config::{GeneratorConfig, ScoringPolicy};
use crate::generator::{generate_dataset, write_transactions};
use crate::storage::BehaviourStorage;

const HEADER: &str = "user_id,transaction_time,amount,merchant_category,hour_of_day,weekend_flag,night_transaction,discretionary_category,spending_spike,short_time_gap,end_month_flag,impulse_label";

fn create_temporary_csv(rows: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "{HEADER}")?;

    for row in rows {
        writeln!(file, "{row}")?;
    }

    Ok(file)
}

#[tokio::test]
async fn test_engine_aggregates_valid_csv_stream() -> Result<()> {
    let file = create_temporary_csv(&[
        "1,2024-01-27 22:15:00,600.00,Fashion,22,1,1,1,1,1,1,1",
        "2,2024-01-10 12:00:00,10.00,Grocery,12,0,0,0,0,0,0,0",
        "1,2024-01-10 12:00:00,200.00,Food,12,0,0,0,0,0,0,0",
    ])?;

    let storage = Arc::new(BehaviourStorage::new());
    let engine = BehaviourEngine::new(storage.clone());
    engine.run(file.path()).await?;

    let summaries = storage.summaries();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].user_id, 1);
    assert_eq!(summaries[0].transaction_count, 2);
    assert_eq!(summaries[0].avg_amount, 400.0);
    assert_eq!(summaries[0].impulse_ratio, 0.5);
    assert_eq!(summaries[1].user_id, 2);
    assert_eq!(summaries[1].night_ratio, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_engine_gracefully_skips_malformed_rows() -> Result<()> {
    let file = create_temporary_csv(&[
        "1,2024-01-10 12:00:00,10.00,Grocery,12,0,0,0,0,0,0,0",
        "1,not-a-date,10.00,Grocery,12,0,0,0,0,0,0,0",
        "1,2024-01-11 12:00:00,20.00,Casino,12,0,0,0,0,0,0,0",
        "1,2024-01-12 12:00:00,30.00,Food,12,0,0,0,0,0,0,0",
    ])?;

    let storage = Arc::new(BehaviourStorage::new());
    let engine = BehaviourEngine::new(storage.clone());
    let report = engine.run(file.path()).await?;

    assert_eq!(report, IngestReport { accepted: 2, skipped: 2, users: 1 });

    let summaries = storage.summaries();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].transaction_count, 2);
    assert_eq!(summaries[0].avg_amount, 20.0);

    Ok(())
}

#[tokio::test]
async fn test_engine_handles_missing_csv_file_without_error() -> Result<()> {
    let storage = Arc::new(BehaviourStorage::new());
    let engine = BehaviourEngine::new(storage.clone());

    assert_eq!(engine.run("missing.csv").await?, IngestReport::default());
    assert_eq!(storage.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_engine_totals_match_a_generated_table() -> Result<()> {
    let config = GeneratorConfig { users: 20, transactions: 1_000, ..GeneratorConfig::default() };
    let records = generate_dataset(&config, &ScoringPolicy::default())?;

    let mut file = NamedTempFile::new()?;
    write_transactions(&records, &mut file)?;

    let storage = Arc::new(BehaviourStorage::new());
    let engine = BehaviourEngine::new(storage.clone()).with_backpressure(8);
    engine.run(file.path()).await?;

    let summaries = storage.summaries();
    let total: u64 = summaries.iter().map(|summary| summary.transaction_count).sum();
    let impulses = summaries.iter()
        .map(|summary| summary.impulse_ratio * summary.transaction_count as f64)
        .sum::<f64>()
        .round() as usize;

    assert_eq!(total, 1_000);
    assert_eq!(impulses, records.iter().filter(|record| record.impulse_label).count());

    Ok(())
}
