mod behaviour_engine;
#[cfg(test)]
mod tests;

pub use behaviour_engine::{BehaviourEngine, IngestReport};
