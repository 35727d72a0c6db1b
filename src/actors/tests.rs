use super::UserActor;
use crate::config::ScoringPolicy;
use crate::models::TransactionRecord;
use crate::storage::{BehaviourStorage, Storage};
use crate::types::{Category, UserId};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

fn create_transaction(user_id: UserId, day: u32, hour: u32, amount: i64, category: Category) -> Result<TransactionRecord> {
    let time = NaiveDate::from_ymd_opt(2024, 3, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| anyhow!("invalid timestamp"))?;

    Ok(TransactionRecord::derive(user_id, time, Decimal::from(amount), category, false, Decimal::from(3000), &ScoringPolicy::default())?)
}

#[tokio::test]
async fn test_actor_isolation_and_storage_persistence() -> Result<()> {
    let storage = Arc::new(BehaviourStorage::new());

    let actor_user_1 = UserActor::new(1, storage.clone());
    let actor_user_2 = UserActor::new(2, storage.clone());

    actor_user_1.accept(&create_transaction(1, 4, 22, 100, Category::Fashion)?);
    actor_user_2.accept(&create_transaction(2, 5, 10, 50, Category::Food)?);
    actor_user_1.accept(&create_transaction(1, 6, 12, 300, Category::Bills)?);

    actor_user_1.despawn().await?;
    actor_user_2.despawn().await?;

    let user_1 = storage.load(1).ok_or_else(|| anyhow!("User 1 missing from storage"))?.summarize(1);
    let user_2 = storage.load(2).ok_or_else(|| anyhow!("User 2 missing from storage"))?.summarize(2);

    assert_eq!(user_1.transaction_count, 2);
    assert_eq!(user_1.avg_amount, 200.0);
    assert_eq!(user_1.night_ratio, 0.5);
    assert_eq!(user_2.transaction_count, 1);
    assert_eq!(user_2.avg_amount, 50.0);

    Ok(())
}

#[tokio::test]
async fn test_actor_resumes_from_a_stored_accumulator() -> Result<()> {
    let storage = Arc::new(BehaviourStorage::new());

    let first = UserActor::new(1, storage.clone());
    first.accept(&create_transaction(1, 4, 9, 100, Category::Food)?);
    first.despawn().await?;

    let second = UserActor::new(1, storage.clone());
    second.accept(&create_transaction(1, 26, 9, 300, Category::Food)?);
    second.despawn().await?;

    let behaviour = storage.load(1).ok_or_else(|| anyhow!("User missing from storage"))?.summarize(1);

    assert_eq!(behaviour.transaction_count, 2);
    assert_eq!(behaviour.avg_amount, 200.0);
    assert_eq!(behaviour.end_month_ratio, 0.5);

    Ok(())
}
