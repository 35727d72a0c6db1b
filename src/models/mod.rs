mod behaviour;
mod features;
mod flags;
mod transaction;

pub use behaviour::{BehaviourAccumulator, UserBehaviour};
pub use features::{UserFeatures, MODEL_FEATURES};
pub use flags::{is_spending_spike, reference_average, ImpulseFlags};
pub use transaction::TransactionRecord;
