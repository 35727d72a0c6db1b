use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::TransactionRecord;
use crate::types::UserId;

/// Running totals of one user's transactions.
///
/// Amount variance uses Welford's update so the accumulator never has to keep
/// the individual amounts around.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviourAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
    night: u64,
    weekend: u64,
    discretionary: u64,
    spike: u64,
    short_gap: u64,
    end_month: u64,
    impulse: u64
}

impl BehaviourAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, transaction: &TransactionRecord) {
        let amount = transaction.amount.to_f64().unwrap_or_default();

        self.count += 1;
        let delta = amount - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (amount - self.mean);

        self.night += u64::from(transaction.night_transaction);
        self.weekend += u64::from(transaction.weekend_flag);
        self.discretionary += u64::from(transaction.discretionary_category);
        self.spike += u64::from(transaction.spending_spike);
        self.short_gap += u64::from(transaction.short_time_gap);
        self.end_month += u64::from(transaction.end_month_flag);
        self.impulse += u64::from(transaction.impulse_label);
    }

    /// Sample standard deviation (n - 1); zero below two transactions.
    pub fn amount_std(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }

    fn ratio(&self, hits: u64) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            hits as f64 / self.count as f64
        }
    }

    pub fn summarize(&self, user_id: UserId) -> UserBehaviour {
        UserBehaviour {
            user_id,
            transaction_count: self.count,
            avg_amount: self.mean,
            amount_std: self.amount_std(),
            night_ratio: self.ratio(self.night),
            weekend_ratio: self.ratio(self.weekend),
            discretionary_ratio: self.ratio(self.discretionary),
            spike_ratio: self.ratio(self.spike),
            short_gap_ratio: self.ratio(self.short_gap),
            end_month_ratio: self.ratio(self.end_month),
            impulse_ratio: self.ratio(self.impulse)
        }
    }
}

/// Aggregated behaviour of a single user, one row of the aggregation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserBehaviour {
    pub user_id: UserId,
    pub transaction_count: u64,
    pub avg_amount: f64,
    pub amount_std: f64,
    pub night_ratio: f64,
    pub weekend_ratio: f64,
    pub discretionary_ratio: f64,
    pub spike_ratio: f64,
    pub short_gap_ratio: f64,
    pub end_month_ratio: f64,
    pub impulse_ratio: f64
}
