use crate::actors::UserActor;
use crate::models::TransactionRecord;
use crate::storage::BehaviourStorage;
use crate::types::UserId;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::spawn_blocking;
use tracing::{debug, error, warn};

/// Row counts of one aggregation run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct IngestReport {
    /// Rows routed to a user actor.
    pub accepted: u64,
    /// Rows that did not parse as a transaction record.
    pub skipped: u64,
    /// Distinct users seen.
    pub users: usize
}

/// Aggregates a transaction table into per-user behaviour ratios.
pub struct BehaviourEngine {
    storage: Arc<BehaviourStorage>,
    backpressure: usize
}

impl BehaviourEngine {
    pub fn new(storage: Arc<BehaviourStorage>) -> Self {
        Self {
            storage,
            backpressure: 256
        }
    }

    pub fn with_backpressure(mut self, backpressure: usize) -> Self {
        self.backpressure = backpressure.max(1);
        self
    }

    /// Streams the transaction table at `path` through per-user actors into storage.
    ///
    /// A missing file is logged and yields an empty report.
    pub async fn run(&self, path: impl Into<PathBuf>) -> anyhow::Result<IngestReport> {
        let path = path.into();
        let (sender, receiver) = mpsc::channel::<TransactionRecord>(self.backpressure);

        let reader = spawn_blocking(move || match File::open(&path) {
            Ok(file) => read_transactions(BufReader::new(file), &sender),
            Err(error) => {
                error!("Unable to open transaction table {} | {error}", path.display());
                0
            }
        });

        let (accepted, users) = self.route_to_actors(receiver).await;
        let skipped = reader.await.unwrap_or_else(|error| {
            error!("Transaction table reader stopped unexpectedly: {error}");
            0
        });

        let report = IngestReport { accepted, skipped, users };

        if skipped > 0 {
            warn!("Skipped {skipped} malformed transaction rows");
        }

        debug!("Aggregated {accepted} transactions for {users} users, {skipped} rows skipped");

        Ok(report)
    }

    /// Routes each record to its user's actor, then waits for every actor to save.
    /// Returns the number of routed records and of distinct users.
    async fn route_to_actors(&self, mut receiver: mpsc::Receiver<TransactionRecord>) -> (u64, usize) {
        let mut actors = HashMap::<UserId, UserActor>::new();
        let mut accepted = 0;

        // One actor per user keeps that user's transactions in file order.
        while let Some(transaction) = receiver.recv().await {
            let actor = actors.entry(transaction.user_id).or_insert_with(|| {
                UserActor::new(transaction.user_id, self.storage.clone())
            });

            if actor.accept(&transaction) {
                accepted += 1;
            } else {
                error!("User actor [{}] could not accept transaction at [{}]", transaction.user_id, transaction.transaction_time);
            }
        }

        let users = actors.len();

        for (user_id, actor) in actors {
            if let Err(error) = actor.despawn().await {
                error!("User actor [{user_id}] did not save its behaviour: {error:?}");
            }
        }

        (accepted, users)
    }
}

/// Parses transaction rows and forwards them; returns how many rows were skipped.
fn read_transactions<R: Read>(input: R, sender: &mpsc::Sender<TransactionRecord>) -> u64 {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(input);

    let mut skipped = 0;

    for result in reader.deserialize::<TransactionRecord>() {
        match result {
            Ok(transaction) => {
                if sender.blocking_send(transaction).is_err() {
                    break;
                }
            }
            Err(error) => {
                let line = error.position().map(|position| position.line()).unwrap_or_default();
                debug!("Skipping transaction row on line {line}: {error}");
                skipped += 1;
            }
        }
    }

    skipped
}
