use rand::Rng;

use crate::types::{ImpulseError, UserId};

/// Average spend of every user in `[1, N]`, drawn once per run.
///
/// This is the hidden parameter behind the `spending_spike` flag, kept as an
/// explicit value so the generator stays a function of its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSpendTable {
    averages: Vec<f64>
}

impl UserSpendTable {
    /// Draws one average per user from `Uniform(low, high)`, user 1 first.
    pub fn draw<R: Rng>(users: u32, (low, high): (f64, f64), rng: &mut R) -> Result<Self, ImpulseError> {
        if users == 0 {
            return Err(ImpulseError::no_users());
        }

        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(ImpulseError::invalid_spend_range(low, high));
        }

        let averages = (0..users).map(|_| rng.gen_range(low..high)).collect();

        Ok(Self { averages })
    }

    pub fn from_averages(averages: Vec<f64>) -> Self {
        Self { averages }
    }

    pub fn get(&self, user_id: UserId) -> Option<f64> {
        let index = usize::try_from(user_id).ok()?.checked_sub(1)?;
        self.averages.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.averages.len()
    }
}
