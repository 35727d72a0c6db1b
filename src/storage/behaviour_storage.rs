use crate::models::{BehaviourAccumulator, UserBehaviour};
use crate::storage::Storage;
use crate::types::UserId;
use dashmap::DashMap;
use std::sync::Arc;

pub struct BehaviourStorage {
    cache: Arc<DashMap<UserId, BehaviourAccumulator>>
}

impl BehaviourStorage {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(DashMap::new())
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Summaries of every stored user, ordered by user id.
    pub fn summaries(&self) -> Vec<UserBehaviour> {
        let mut summaries: Vec<UserBehaviour> = self.cache.iter()
            .map(|entry| entry.value().summarize(*entry.key()))
            .collect();

        summaries.sort_by_key(|summary| summary.user_id);
        summaries
    }
}

impl Storage for BehaviourStorage {
    fn load(&self, user_id: UserId) -> Option<BehaviourAccumulator> {
        self.cache.remove(&user_id).map(|(_, accumulator)| accumulator)
    }

    fn save(&self, user_id: UserId, accumulator: BehaviourAccumulator) {
        self.cache.insert(user_id, accumulator);
    }
}
