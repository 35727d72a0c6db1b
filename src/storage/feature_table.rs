use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use tracing::{info, warn};

use crate::models::UserFeatures;
use crate::types::{ImpulseError, RiskLevel, UserId};

/// The precomputed per-user feature and risk table.
///
/// Rows keep their file order; lookups go through an index by user id.
pub struct UserFeatureTable {
    rows: Vec<UserFeatures>,
    index: HashMap<UserId, usize>
}

impl UserFeatureTable {
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Unable to open feature table at {}", path.display()))?;

        let table = Self::from_reader(BufReader::new(file))?;

        if table.is_empty() {
            warn!("Feature table at {} has no rows", path.display());
        }

        info!("Loaded {} users from {}", table.len(), path.display());

        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut index = HashMap::new();

        for (line, result) in reader.deserialize::<UserFeatures>().enumerate() {
            let row = result.with_context(|| format!("Malformed feature table row {}", line + 1))?;

            if index.insert(row.user_id, rows.len()).is_some() {
                warn!("User [{}] appears more than once, keeping the last row", row.user_id);
            }

            rows.push(row);
        }

        Ok(Self { rows, index })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, user_id: UserId) -> Result<&UserFeatures, ImpulseError> {
        self.index.get(&user_id)
            .map(|&position| &self.rows[position])
            .ok_or_else(|| ImpulseError::unknown_user(user_id))
    }

    /// The first `limit` users, in file order, whose risk level is not Low.
    pub fn personas(&self, limit: usize) -> Vec<UserId> {
        self.rows.iter()
            .filter(|row| row.risk_level != RiskLevel::Low)
            .map(|row| row.user_id)
            .take(limit)
            .collect()
    }
}
