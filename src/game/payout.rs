//! Payout Rules
//!
//! How a settled pool is divided between creator and counterparty for
//! each profile. All amounts are integral; winner shares are computed by
//! subtraction so the two sides always reconcile with the pool, except
//! for the documented tie remainder of the halving profiles.

use serde::{Deserialize, Serialize};

use crate::game::engine::Profile;
use crate::game::hand::Outcome;

/// Amounts owed to each side of a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Credit for the match creator.
    pub creator: u64,
    /// Credit for the counterparty.
    pub counterparty: u64,
}

impl Payout {
    /// Everything to the creator.
    pub fn to_creator(amount: u64) -> Self {
        Self { creator: amount, counterparty: 0 }
    }

    /// Everything to the counterparty.
    pub fn to_counterparty(amount: u64) -> Self {
        Self { creator: 0, counterparty: amount }
    }

    /// Sum of both sides.
    pub fn total(&self) -> u64 {
        self.creator + self.counterparty
    }

    /// Units of `stake` that were not distributed.
    pub fn dust(&self, stake: u64) -> u64 {
        stake - self.total()
    }
}

/// Divide `stake` according to `outcome` (creator is side A).
///
/// - Symmetric: the loser keeps a third as consolation; a tie favours the
///   committer with two thirds.
/// - Sealed and open market: winner takes all; a tie halves the pool and
///   an odd unit stays undistributed.
pub fn split(stake: u64, outcome: Outcome, profile: Profile) -> Payout {
    match profile {
        Profile::Symmetric => {
            let third = stake / 3;
            let major = stake - third;
            match outcome {
                Outcome::Tie | Outcome::AWins => Payout { creator: major, counterparty: third },
                Outcome::BWins => Payout { creator: third, counterparty: major },
            }
        }
        Profile::Sealed | Profile::OpenMarket => match outcome {
            Outcome::Tie => {
                let half = stake / 2;
                Payout { creator: half, counterparty: half }
            }
            Outcome::AWins => Payout::to_creator(stake),
            Outcome::BWins => Payout::to_counterparty(stake),
        },
    }
}

/// Round an attached value down to an even stake.
///
/// Returns `(stake, remainder)`; the remainder (0 or 1) is credited back
/// to the sender so the pool divides cleanly.
pub fn even_stake(value: u64) -> (u64, u64) {
    let remainder = value % 2;
    (value - remainder, remainder)
}
