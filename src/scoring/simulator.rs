use std::fmt;
use std::fmt::{Display, Formatter};

use crate::config::ScoringPolicy;
use crate::models::UserFeatures;
use crate::types::ImpulseError;

/// The three behaviour ratios the what-if simulator lets a user adjust.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviourRatios {
    pub night: f64,
    pub spike: f64,
    pub short_gap: f64
}

impl BehaviourRatios {
    fn validate(&self) -> Result<(), ImpulseError> {
        for (name, value) in [("night", self.night), ("spike", self.spike), ("short_gap", self.short_gap)] {
            if !value.is_finite() {
                return Err(ImpulseError::non_finite(name));
            }

            if !(0.0..=1.0).contains(&value) {
                return Err(ImpulseError::invalid_ratio(name, value));
            }
        }

        Ok(())
    }
}

impl From<&UserFeatures> for BehaviourRatios {
    fn from(features: &UserFeatures) -> Self {
        Self {
            night: features.night_ratio,
            spike: features.spike_ratio,
            short_gap: features.short_gap_ratio
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhatIfScenario {
    pub base_risk: f64,
    pub baseline: BehaviourRatios,
    pub simulated: BehaviourRatios
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Recommendation {
    Urgent,
    Caution,
    Good,
    Excellent
}

impl Recommendation {
    pub fn advice(&self) -> &'static str {
        match self {
            Recommendation::Urgent => "High risk of debt. Enable total spending lock for 48 hours for any spike purchase.",
            Recommendation::Caution => "Moderate risk. Set rigorous weekly limits and turn on 'Night Purchase' alerts.",
            Recommendation::Good => "Fair risk control. Monitor weekend leisure expenses and maintain current trends.",
            Recommendation::Excellent => "Low risk. No immediate action required besides periodic tracking."
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::Urgent => "URGENT",
            Recommendation::Caution => "CAUTION",
            Recommendation::Good => "GOOD",
            Recommendation::Excellent => "EXCELLENT"
        };

        write!(formatter, "{label}: {}", self.advice())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhatIfOutcome {
    pub original_risk: f64,
    pub simulated_risk: f64,
    pub recommendation: Recommendation
}

impl WhatIfOutcome {
    /// Change actually applied after clamping.
    pub fn change(&self) -> f64 {
        self.simulated_risk - self.original_risk
    }
}

pub fn recommend(risk: f64, policy: &ScoringPolicy) -> Recommendation {
    if risk > policy.urgent_above {
        Recommendation::Urgent
    } else if risk > policy.caution_above {
        Recommendation::Caution
    } else if risk > policy.good_above {
        Recommendation::Good
    } else {
        Recommendation::Excellent
    }
}

/// Applies the linear what-if sensitivity model to a user's baseline risk.
///
/// The result is clamped to `[policy.min_risk, policy.max_risk]`.
pub fn simulate(scenario: &WhatIfScenario, policy: &ScoringPolicy) -> Result<WhatIfOutcome, ImpulseError> {
    if !scenario.base_risk.is_finite() {
        return Err(ImpulseError::non_finite("base_risk"));
    }

    scenario.baseline.validate()?;
    scenario.simulated.validate()?;

    let delta = (scenario.simulated.night - scenario.baseline.night) * policy.night_weight
        + (scenario.simulated.spike - scenario.baseline.spike) * policy.spike_weight
        + (scenario.simulated.short_gap - scenario.baseline.short_gap) * policy.short_gap_weight;

    let simulated_risk = (scenario.base_risk + delta).max(policy.min_risk).min(policy.max_risk);

    Ok(WhatIfOutcome {
        original_risk: scenario.base_risk,
        simulated_risk,
        recommendation: recommend(simulated_risk, policy)
    })
}
