//! Match Engines
//!
//! One interface, three topologies:
//!
//! | Profile      | Key        | Counterparty move       | Creator move          |
//! |--------------|------------|-------------------------|-----------------------|
//! | `Symmetric`  | commitment | clear hand at join      | reveal at settle      |
//! | `Sealed`     | commitment | join, then show clear   | reveal at settle      |
//! | `OpenMarket` | sequence   | sealed hand at accept   | both reveal, anyone settles |
//!
//! Engines are pure: they validate a call against the current record and
//! return a `Transition`. Commitment checks go through the injected
//! `CommitmentScheme`, deadlines through `TimeoutGovernor`, payouts
//! through `game::payout`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::action::{Action, Call, CreateRequest, Opening, Transition};
use crate::game::error::MatchError;
use crate::game::record::MatchRecord;
use crate::proof::commitment::{CommitmentScheme, SecretPolicy};

pub mod open_market;
pub mod sealed;
pub mod symmetric;

pub use open_market::{OpenMarketEngine, OpenMarketMatch, Seat};
pub use sealed::{SealedEngine, SealedMatch};
pub use symmetric::{Challenger, SymmetricEngine, SymmetricMatch};

/// Topology variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// A: sealed creator, clear counterparty at join.
    Symmetric,
    /// B: sealed creator, join, clear show, sealed settle.
    Sealed,
    /// C: both sides sealed, open market of many matches.
    OpenMarket,
}

impl Profile {
    /// How matches of this profile are keyed.
    pub fn keying(self) -> Keying {
        match self {
            Profile::Symmetric | Profile::Sealed => Keying::ByCommitment,
            Profile::OpenMarket => Keying::Sequential,
        }
    }

    /// Secret rule for this profile's commitments.
    ///
    /// The earliest topology never checked for a zero secret and keeps
    /// accepting one.
    pub fn secret_policy(self) -> SecretPolicy {
        match self {
            Profile::Symmetric => SecretPolicy::AllowZero,
            Profile::Sealed | Profile::OpenMarket => SecretPolicy::RequireNonZero,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profile::Symmetric => "symmetric",
            Profile::Sealed => "sealed",
            Profile::OpenMarket => "open-market",
        };
        f.write_str(name)
    }
}

/// Key assignment strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keying {
    /// Key is the creator's commitment; reuse while live is a conflict.
    ByCommitment,
    /// Key is a counter; commitments may repeat across matches.
    Sequential,
}

/// Per-profile state machine.
pub trait MatchEngine: Send + Sync + 'static {
    /// Record kept while a match is active.
    type Record: MatchRecord + Clone + fmt::Debug + Serialize + Send + Sync + 'static;

    /// Which profile this engine implements.
    fn profile(&self) -> Profile;

    /// Validate a create call and build the initial record.
    fn open(
        &self,
        call: &Call,
        request: &CreateRequest,
    ) -> Result<Opening<Self::Record>, MatchError>;

    /// Validate `action` against `record` and compute the transition.
    fn apply(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &Self::Record,
        action: &Action,
    ) -> Result<Transition<Self::Record>, MatchError>;

    /// Error for an action this profile does not offer.
    fn unsupported(&self, action: &Action) -> MatchError {
        MatchError::Unsupported {
            profile: self.profile(),
            operation: action.name(),
        }
    }
}

/// Reject a zero attached value at creation.
pub(crate) fn require_value(call: &Call) -> Result<(), MatchError> {
    if call.value == 0 {
        return Err(MatchError::InvalidInput("stake must be non-zero"));
    }
    Ok(())
}

/// Require the attached value to equal `expected`.
pub(crate) fn require_stake(call: &Call, expected: u64) -> Result<(), MatchError> {
    if call.value != expected {
        return Err(MatchError::StakeMismatch { expected, got: call.value });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::id::{InstanceId, PlayerId};
    use crate::game::action::{Call, Reveal};
    use crate::game::hand::Hand;
    use crate::proof::commitment::{Commitment, CommitmentScheme, Secret};

    use super::Profile;

    pub const CREATOR: PlayerId = PlayerId::new([1; 16]);
    pub const RIVAL: PlayerId = PlayerId::new([2; 16]);
    pub const STRANGER: PlayerId = PlayerId::new([3; 16]);

    pub fn scheme(profile: Profile) -> CommitmentScheme {
        CommitmentScheme::new(InstanceId::new([9; 16]), profile.secret_policy())
    }

    pub fn seal(
        profile: Profile,
        player: PlayerId,
        hand: Hand,
        secret: u64,
    ) -> (Commitment, Reveal) {
        let secret = Secret::from_u64(secret);
        let commitment = scheme(profile).commit(&player, hand, &secret).unwrap();
        (commitment, Reveal::new(hand, secret))
    }

    pub fn call(caller: PlayerId, value: u64, now: u64) -> Call {
        Call::new(caller, value, now)
    }
}
