mod spend;
mod synthetic;
#[cfg(test)]
mod tests;

pub use spend::UserSpendTable;
pub use synthetic::{generate, generate_dataset, write_transactions};
