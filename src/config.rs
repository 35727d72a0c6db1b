use chrono::{NaiveDate, NaiveDateTime};

use crate::types::Category;

pub const DEFAULT_USERS: u32 = 500;
pub const DEFAULT_TRANSACTIONS: usize = 20_000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_WINDOW_DAYS: u32 = 180;
pub const DEFAULT_SPEND_MIN: f64 = 2000.0;
pub const DEFAULT_SPEND_MAX: f64 = 10000.0;
pub const DEFAULT_AMOUNT_MEAN_DIVISOR: f64 = 30.0;
pub const DEFAULT_AMOUNT_STD_DEV: f64 = 500.0;
pub const DEFAULT_SHORT_GAP_PROBABILITY: f64 = 0.2;

/// Hand-tuned thresholds and weights of the impulse rules.
///
/// None of these values are learned; they are policy and kept together so the
/// arithmetic can be exercised against other settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    /// Minimum number of raised flags for a transaction to count as impulsive.
    pub impulse_threshold: u8,
    /// Number of flags the rule inspects; the probability denominator.
    pub flag_count: u8,
    /// A transaction is a spike when it exceeds `average / spike_divisor`.
    pub spike_divisor: u32,
    /// First hour (inclusive) of the night window.
    pub night_start_hour: u32,
    /// Last hour (inclusive) of the night window after midnight.
    pub night_end_hour: u32,
    /// First day of the month counted as end-of-month.
    pub end_month_day: u32,
    pub night_weight: f64,
    pub spike_weight: f64,
    pub short_gap_weight: f64,
    pub min_risk: f64,
    pub max_risk: f64,
    pub urgent_above: f64,
    pub caution_above: f64,
    pub good_above: f64
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            impulse_threshold: 3,
            flag_count: 5,
            spike_divisor: 15,
            night_start_hour: 20,
            night_end_hour: 2,
            end_month_day: 25,
            night_weight: 20.0,
            spike_weight: 30.0,
            short_gap_weight: 15.0,
            min_risk: 0.0,
            max_risk: 100.0,
            urgent_above: 75.0,
            caution_above: 50.0,
            good_above: 25.0
        }
    }
}

impl ScoringPolicy {
    pub fn is_night_hour(&self, hour: u32) -> bool {
        hour >= self.night_start_hour || hour <= self.night_end_hour
    }

    pub fn is_end_of_month(&self, day: u32) -> bool {
        day >= self.end_month_day
    }
}

/// Parameters of a synthetic transaction run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub users: u32,
    pub transactions: usize,
    pub seed: u64,
    pub categories: Vec<Category>,
    pub start: NaiveDateTime,
    pub window_days: u32,
    /// Half-open range the per-user average spend is drawn from.
    pub average_spend: (f64, f64),
    /// Mean of a transaction amount is `average_spend / amount_mean_divisor`.
    pub amount_mean_divisor: f64,
    pub amount_std_dev: f64,
    pub short_gap_probability: f64
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            users: DEFAULT_USERS,
            transactions: DEFAULT_TRANSACTIONS,
            seed: DEFAULT_SEED,
            categories: Category::ALL.to_vec(),
            start: default_start(),
            window_days: DEFAULT_WINDOW_DAYS,
            average_spend: (DEFAULT_SPEND_MIN, DEFAULT_SPEND_MAX),
            amount_mean_divisor: DEFAULT_AMOUNT_MEAN_DIVISOR,
            amount_std_dev: DEFAULT_AMOUNT_STD_DEV,
            short_gap_probability: DEFAULT_SHORT_GAP_PROBABILITY
        }
    }
}

pub fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}
