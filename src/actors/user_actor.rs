use std::sync::Arc;

use tokio::spawn;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::trace;

use crate::models::{BehaviourAccumulator, TransactionRecord};
use crate::storage::Storage;
use crate::types::UserId;

/// Owns one user's accumulator and folds that user's transactions in order.
pub struct UserActor {
    sender: mpsc::UnboundedSender<TransactionRecord>,
    handle: JoinHandle<()>
}

impl UserActor {
    /// Spawns the actor, resuming from any accumulator already in storage.
    pub fn new<S: Storage>(user_id: UserId, storage: Arc<S>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<TransactionRecord>();

        let handle = spawn(async move {
            let mut accumulator = storage.load(user_id)
                .unwrap_or_else(BehaviourAccumulator::new);

            while let Some(transaction) = receiver.recv().await {
                accumulator.record(&transaction);
                trace!("Transaction at [{}] recorded for user [{}]", transaction.transaction_time, user_id);
            }

            storage.save(user_id, accumulator);
        });

        Self { sender, handle }
    }

    /// Queues a transaction; false once the actor has stopped.
    pub fn accept(&self, transaction: &TransactionRecord) -> bool {
        self.sender.send(transaction.clone()).is_ok()
    }

    /// Closes the queue and waits for the accumulator to be saved.
    pub async fn despawn(self) -> Result<(), JoinError> {
        drop(self.sender);
        self.handle.await
    }
}
