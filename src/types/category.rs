use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::ImpulseError;

/// Merchant category of a transaction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Fashion,
    Electronics,
    Travel,
    Grocery,
    Entertainment,
    Bills
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Fashion,
        Category::Electronics,
        Category::Travel,
        Category::Grocery,
        Category::Entertainment,
        Category::Bills
    ];

    /// Non-essential spending categories.
    pub fn is_discretionary(&self) -> bool {
        matches!(self, Category::Fashion | Category::Entertainment | Category::Electronics)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Fashion => "Fashion",
            Category::Electronics => "Electronics",
            Category::Travel => "Travel",
            Category::Grocery => "Grocery",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills"
        }
    }
}

impl Display for Category {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ImpulseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        Category::ALL.iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
            .copied()
            .ok_or_else(|| ImpulseError::unknown_category(value))
    }
}
