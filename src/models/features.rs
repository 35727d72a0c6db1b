use serde::Deserialize;

use crate::types::{serde_flag, RiskLevel, UserId};

/// Column order of the model's input vector.
pub const MODEL_FEATURES: [&str; 9] = [
    "avg_amount",
    "amount_std",
    "night_ratio",
    "weekend_ratio",
    "discretionary_ratio",
    "spike_ratio",
    "short_gap_ratio",
    "end_month_ratio",
    "high_risk"
];

/// A row of the precomputed per-user feature table.
///
/// Risk score, level, profile, recommendation and cluster come from the
/// externally trained model and are only read here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserFeatures {
    pub user_id: UserId,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub behaviour_profile: String,
    pub recommendation: String,
    pub cluster: i32,
    pub avg_amount: f64,
    pub amount_std: f64,
    pub night_ratio: f64,
    pub weekend_ratio: f64,
    pub discretionary_ratio: f64,
    pub spike_ratio: f64,
    pub short_gap_ratio: f64,
    pub end_month_ratio: f64,
    #[serde(with = "serde_flag")]
    pub high_risk: bool
}

impl UserFeatures {
    /// The model's input vector, ordered as [`MODEL_FEATURES`].
    pub fn model_vector(&self) -> [f64; 9] {
        [
            self.avg_amount,
            self.amount_std,
            self.night_ratio,
            self.weekend_ratio,
            self.discretionary_ratio,
            self.spike_ratio,
            self.short_gap_ratio,
            self.end_month_ratio,
            if self.high_risk { 1.0 } else { 0.0 }
        ]
    }
}
