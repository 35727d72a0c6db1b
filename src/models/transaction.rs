use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ScoringPolicy;
use crate::models::{is_spending_spike, ImpulseFlags};
use crate::types::{serde_flag, serde_timestamp, Category, ImpulseError, UserId};

/// One row of the synthetic transaction table.
///
/// Every column after `merchant_category` is derived from the columns before
/// it, except `short_time_gap` which is drawn independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub user_id: UserId,
    #[serde(with = "serde_timestamp")]
    pub transaction_time: NaiveDateTime,
    /// Non-negative, rounded to cents.
    pub amount: Decimal,
    pub merchant_category: Category,
    pub hour_of_day: u32,
    #[serde(with = "serde_flag")]
    pub weekend_flag: bool,
    #[serde(with = "serde_flag")]
    pub night_transaction: bool,
    #[serde(with = "serde_flag")]
    pub discretionary_category: bool,
    #[serde(with = "serde_flag")]
    pub spending_spike: bool,
    #[serde(with = "serde_flag")]
    pub short_time_gap: bool,
    #[serde(with = "serde_flag")]
    pub end_month_flag: bool,
    #[serde(with = "serde_flag")]
    pub impulse_label: bool
}

impl TransactionRecord {
    /// Builds a record from its drawn values and derives the flag columns.
    ///
    /// `user_average` is the user's average spend; the amount is taken as is.
    pub fn derive(
        user_id: UserId,
        transaction_time: NaiveDateTime,
        amount: Decimal,
        merchant_category: Category,
        short_time_gap: bool,
        user_average: Decimal,
        policy: &ScoringPolicy
    ) -> Result<Self, ImpulseError> {
        let hour_of_day = transaction_time.hour();
        let flags = ImpulseFlags {
            spending_spike: is_spending_spike(amount, user_average, policy)?,
            night_transaction: policy.is_night_hour(hour_of_day),
            discretionary_category: merchant_category.is_discretionary(),
            short_time_gap,
            end_month: policy.is_end_of_month(transaction_time.day())
        };

        Ok(Self {
            user_id,
            transaction_time,
            amount,
            merchant_category,
            hour_of_day,
            weekend_flag: transaction_time.weekday().num_days_from_monday() >= 5,
            night_transaction: flags.night_transaction,
            discretionary_category: flags.discretionary_category,
            spending_spike: flags.spending_spike,
            short_time_gap,
            end_month_flag: flags.end_month,
            impulse_label: flags.is_impulse(policy)
        })
    }

    pub fn flags(&self) -> ImpulseFlags {
        ImpulseFlags {
            spending_spike: self.spending_spike,
            night_transaction: self.night_transaction,
            discretionary_category: self.discretionary_category,
            short_time_gap: self.short_time_gap,
            end_month: self.end_month_flag
        }
    }
}
