use thiserror::Error;

use crate::types::UserId;

/// Input-validation failures of the generator, scorer and simulator.
#[derive(Debug, Error, PartialEq)]
pub enum ImpulseError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid state: {0}")]
    InvalidState(String)
}

impl ImpulseError {
    pub fn no_users() -> Self {
        Self::InvalidArgument("User count must be at least 1".to_string())
    }

    pub fn no_categories() -> Self {
        Self::InvalidArgument("Category set must not be empty".to_string())
    }

    pub fn empty_window() -> Self {
        Self::InvalidArgument("Simulation window must span at least one day".to_string())
    }

    pub fn invalid_spend_range(low: f64, high: f64) -> Self {
        Self::InvalidArgument(format!("Average spend range [{low}, {high}) is empty or not finite"))
    }

    pub fn invalid_probability(probability: f64) -> Self {
        Self::InvalidArgument(format!("Probability [{probability}] must be within [0, 1]"))
    }

    pub fn invalid_distribution(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(format!("Amount distribution is invalid: {}", reason.into()))
    }

    pub fn missing_spend(user_id: UserId) -> Self {
        Self::InvalidArgument(format!("No average spend recorded for user [{user_id}]"))
    }

    pub fn unknown_category(name: &str) -> Self {
        Self::InvalidArgument(format!("Unknown merchant category [{name}]"))
    }

    pub fn unknown_user(user_id: UserId) -> Self {
        Self::InvalidArgument(format!("User [{user_id}] is not present in the feature table"))
    }

    pub fn non_positive_amount(amount: impl std::fmt::Display) -> Self {
        Self::InvalidArgument(format!("Transaction amount [{amount}] must be positive"))
    }

    pub fn invalid_hour(hour: u32) -> Self {
        Self::InvalidArgument(format!("Hour of day [{hour}] must be within [0, 23]"))
    }

    pub fn invalid_ratio(name: &str, value: f64) -> Self {
        Self::InvalidArgument(format!("Ratio [{name}] = [{value}] must be within [0, 1]"))
    }

    pub fn non_finite(name: &str) -> Self {
        Self::InvalidArgument(format!("Value [{name}] must be a finite number"))
    }

    pub fn reference_average_out_of_range(average: f64) -> Self {
        Self::InvalidState(format!("Reference average amount [{average:e}] is outside the representable decimal range"))
    }

    pub fn invalid_reference_average(average: impl std::fmt::Display) -> Self {
        Self::InvalidState(format!("Reference average amount [{average}] must be positive"))
    }
}
