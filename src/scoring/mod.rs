mod predictor;
mod simulator;

pub use predictor::{score_transaction, Classification, ImpulseAssessment, TransactionProbe};
pub use simulator::{recommend, simulate, BehaviourRatios, Recommendation, WhatIfOutcome, WhatIfScenario};
