//! Match Records
//!
//! A key maps to a tagged slot: `Active` while the match is in play,
//! `Finalized` once it has been settled, punished or cancelled. A
//! finalized slot can never be mutated again; every call against it
//! reports `NotFound`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::clock::Timestamp;
use crate::core::id::PlayerId;
use crate::game::hand::Outcome;
use crate::game::payout::Payout;
use crate::proof::commitment::Commitment;

/// Lookup key of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchKey {
    /// Sealed-key profiles: the creator's commitment.
    Commitment(Commitment),
    /// Open market: sequential counter.
    Sequence(u64),
}

impl MatchKey {
    /// The commitment, for commitment-keyed matches.
    pub fn commitment(&self) -> Option<&Commitment> {
        match self {
            Self::Commitment(c) => Some(c),
            Self::Sequence(_) => None,
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commitment(c) => write!(f, "c:{}", c),
            Self::Sequence(n) => write!(f, "#{}", n),
        }
    }
}

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalReason {
    /// Normal settlement (outcome from the creator's side).
    Settled(Outcome),
    /// Deadline punishment.
    Punished,
    /// Cancellation.
    Cancelled,
}

/// Terminal summary kept in place of the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalization {
    /// How the match ended.
    pub reason: FinalReason,
    /// What each side was credited.
    pub payout: Payout,
    /// Pool at the moment of finalization.
    pub stake: u64,
    /// When it ended.
    pub at: Timestamp,
}

/// Slot state for one key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MatchSlot<R> {
    /// Match in play.
    Active(R),
    /// Terminal; no resurrection.
    Finalized(Finalization),
}

impl<R> MatchSlot<R> {
    /// The live record, if any.
    pub fn active(&self) -> Option<&R> {
        match self {
            Self::Active(record) => Some(record),
            Self::Finalized(_) => None,
        }
    }

    /// Is the match still in play?
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Fields every profile's record exposes.
pub trait MatchRecord {
    /// Match creator.
    fn creator(&self) -> PlayerId;
    /// Counterparty, once joined.
    fn counterparty(&self) -> Option<PlayerId>;
    /// Current pool.
    fn stake(&self) -> u64;
    /// Current deadline.
    fn deadline(&self) -> Timestamp;
}
