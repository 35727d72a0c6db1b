use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::config::ScoringPolicy;
use crate::types::ImpulseError;

/// The five behavioural indicators the impulse rule counts.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ImpulseFlags {
    pub spending_spike: bool,
    pub night_transaction: bool,
    pub discretionary_category: bool,
    pub short_time_gap: bool,
    pub end_month: bool
}

impl ImpulseFlags {
    /// Number of raised flags, `0..=5`.
    pub fn score(&self) -> u8 {
        [
            self.spending_spike,
            self.night_transaction,
            self.discretionary_category,
            self.short_time_gap,
            self.end_month
        ].into_iter().map(u8::from).sum()
    }

    pub fn is_impulse(&self, policy: &ScoringPolicy) -> bool {
        self.score() >= policy.impulse_threshold
    }
}

/// Converts a per-user average into a decimal usable as a spike reference.
///
/// # Errors
/// Returns `InvalidState` when the average is zero, negative or not finite,
/// and when it is positive but outside what a decimal can hold (below
/// `1e-28` or above roughly `7.9e28`).
pub fn reference_average(average: f64) -> Result<Decimal, ImpulseError> {
    if !(average.is_finite() && average > 0.0) {
        return Err(ImpulseError::invalid_reference_average(average));
    }

    match Decimal::from_f64(average) {
        Some(value) if value > Decimal::ZERO => Ok(value),
        _ => Err(ImpulseError::reference_average_out_of_range(average))
    }
}

/// `amount > average / spike_divisor`.
pub fn is_spending_spike(amount: Decimal, average: Decimal, policy: &ScoringPolicy) -> Result<bool, ImpulseError> {
    if average <= Decimal::ZERO {
        return Err(ImpulseError::invalid_reference_average(average));
    }

    let threshold = average.checked_div(Decimal::from(policy.spike_divisor))
        .ok_or_else(|| ImpulseError::InvalidState(format!("Spike divisor [{}] is not usable", policy.spike_divisor)))?;

    Ok(amount > threshold)
}
