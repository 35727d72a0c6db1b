mod category;
mod errors;
pub mod serde_flag;
pub mod serde_timestamp;

use serde::Deserialize;

pub use category::Category;
pub use errors::ImpulseError;

pub type UserId = u32;

/// Risk band assigned to a user by the external risk model.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High
}
