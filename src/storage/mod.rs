mod behaviour_storage;
mod feature_table;

use crate::models::BehaviourAccumulator;
use crate::types::UserId;

pub use behaviour_storage::BehaviourStorage;
pub use feature_table::UserFeatureTable;

pub trait Storage: Send + Sync + 'static {
    fn load(&self, user_id: UserId) -> Option<BehaviourAccumulator>;
    fn save(&self, user_id: UserId, accumulator: BehaviourAccumulator);
}
