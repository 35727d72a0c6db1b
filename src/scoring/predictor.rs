use std::fmt;
use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ScoringPolicy;
use crate::models::{is_spending_spike, ImpulseFlags};
use crate::types::{Category, ImpulseError};

/// A single transaction entered for live scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionProbe {
    pub amount: Decimal,
    pub category: Category,
    pub hour: u32,
    /// Whether the purchase follows shortly after the previous one.
    pub short_gap: bool,
    pub end_of_month: bool
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Classification {
    Impulse,
    Planned
}

impl Display for Classification {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Impulse => formatter.write_str("Impulse"),
            Classification::Planned => formatter.write_str("Planned")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseAssessment {
    pub flags: ImpulseFlags,
    /// Raised flags, `0..=5`.
    pub score: u8,
    /// `score / 5 * 100`.
    pub probability: f64,
    pub classification: Classification
}

impl ImpulseAssessment {
    pub fn is_night(&self) -> bool {
        self.flags.night_transaction
    }

    pub fn is_discretionary(&self) -> bool {
        self.flags.discretionary_category
    }

    pub fn is_spike(&self) -> bool {
        self.flags.spending_spike
    }

    pub fn probability_percent(&self) -> u8 {
        self.probability.round().clamp(0.0, 100.0) as u8
    }

    /// Each indicator with whether it was raised, in display order.
    pub fn explain(&self) -> [(&'static str, bool); 5] {
        [
            ("Night Transaction", self.is_night()),
            ("Discretionary Category", self.is_discretionary()),
            ("Spending Spike", self.is_spike()),
            ("Short Time Gap", self.flags.short_time_gap),
            ("End of Month", self.flags.end_month)
        ]
    }
}

/// Scores a transaction against the five-flag impulse rule.
///
/// `reference_avg_amount` is the subject user's average transaction amount.
///
/// # Errors
/// - `InvalidArgument` if the amount is not positive or the hour is outside `[0, 23]`.
/// - `InvalidState` if the reference average is not positive.
pub fn score_transaction(
    probe: &TransactionProbe,
    reference_avg_amount: Decimal,
    policy: &ScoringPolicy
) -> Result<ImpulseAssessment, ImpulseError> {
    if probe.amount <= Decimal::ZERO {
        return Err(ImpulseError::non_positive_amount(probe.amount));
    }

    if probe.hour > 23 {
        return Err(ImpulseError::invalid_hour(probe.hour));
    }

    if policy.flag_count == 0 {
        return Err(ImpulseError::InvalidState("Policy inspects no flags".to_string()));
    }

    let flags = ImpulseFlags {
        spending_spike: is_spending_spike(probe.amount, reference_avg_amount, policy)?,
        night_transaction: policy.is_night_hour(probe.hour),
        discretionary_category: probe.category.is_discretionary(),
        short_time_gap: probe.short_gap,
        end_month: probe.end_of_month
    };

    let score = flags.score();
    let classification = if flags.is_impulse(policy) {
        Classification::Impulse
    } else {
        Classification::Planned
    };

    debug!("Scored {} {} at hour {}: {score}/{}", probe.category, probe.amount, probe.hour, policy.flag_count);

    Ok(ImpulseAssessment {
        flags,
        score,
        probability: f64::from(score) / f64::from(policy.flag_count) * 100.0,
        classification
    })
}
