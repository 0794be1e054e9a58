//! Sealed / clear / seal matches.
//!
//! ```text
//! create(commit, units) ──► join(stake) ──► show(hand) ──► settle(reveal)
//!        │                       │               │
//!        └── cancel ◄────────────┘               └──► punish
//!          (deadline lapsed, nothing shown)        (deadline lapsed)
//! ```
//!
//! Each match carries its own timeout, picked by the creator as a
//! multiple of the configured unit. Join and show both restamp the
//! deadline with that duration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::clock::Timestamp;
use crate::core::id::PlayerId;
use crate::game::action::{Action, Call, CreateRequest, JoinRequest, Opening, Reveal, Transition};
use crate::game::deadline::{require_lapsed, require_open, TimeoutGovernor};
use crate::game::engine::{require_stake, require_value, MatchEngine, Profile};
use crate::game::error::MatchError;
use crate::game::events::MatchEventKind;
use crate::game::hand::{compare, Hand};
use crate::game::payout::{split, Payout};
use crate::game::record::{FinalReason, MatchRecord};
use crate::proof::commitment::{Commitment, CommitmentScheme};

/// Active sealed match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedMatch {
    /// Creator's sealed hand (also the key).
    pub commitment: Commitment,
    /// Creator.
    pub creator: PlayerId,
    /// Pool.
    pub stake: u64,
    /// Current deadline.
    pub deadline: Timestamp,
    /// Phase duration in seconds, fixed at creation.
    pub timeout: u64,
    /// Set once joined.
    pub counterparty: Option<PlayerId>,
    /// Counterparty's hand; `None` until shown.
    pub shown: Hand,
}

impl SealedMatch {
    fn governor(&self) -> TimeoutGovernor {
        TimeoutGovernor::new(self.timeout)
    }
}

impl MatchRecord for SealedMatch {
    fn creator(&self) -> PlayerId {
        self.creator
    }

    fn counterparty(&self) -> Option<PlayerId> {
        self.counterparty
    }

    fn stake(&self) -> u64 {
        self.stake
    }

    fn deadline(&self) -> Timestamp {
        self.deadline
    }
}

/// Engine for the sealed profile.
#[derive(Clone, Copy, Debug)]
pub struct SealedEngine {
    unit: u64,
}

impl SealedEngine {
    /// Create with the length of one timeout unit (seconds).
    pub fn new(unit: u64) -> Self {
        Self { unit }
    }

    fn join(
        &self,
        call: &Call,
        record: &SealedMatch,
    ) -> Result<Transition<SealedMatch>, MatchError> {
        if record.counterparty.is_some() {
            return Err(MatchError::PhaseViolation("match already joined"));
        }
        require_open(call.now, record.deadline)?;
        require_stake(call, record.stake)?;

        let mut next = record.clone();
        next.stake = record.stake.checked_add(call.value).ok_or(MatchError::Overflow)?;
        next.deadline = record.governor().stamp(call.now)?;
        next.counterparty = Some(call.caller);

        let event = MatchEventKind::Joined {
            counterparty: call.caller,
            hand: None,
            stake: next.stake,
            deadline: next.deadline,
        };
        Ok(Transition::advance(next, event))
    }

    fn show(
        &self,
        call: &Call,
        record: &SealedMatch,
        hand: Hand,
    ) -> Result<Transition<SealedMatch>, MatchError> {
        let counterparty = record
            .counterparty
            .ok_or(MatchError::PhaseViolation("nobody has joined"))?;
        if call.caller != counterparty {
            return Err(MatchError::Unauthorized("only the counterparty shows"));
        }
        if record.shown.is_playable() {
            return Err(MatchError::PhaseViolation("hand already shown"));
        }
        if !hand.is_playable() {
            return Err(MatchError::InvalidInput("hand must not be NONE"));
        }
        require_open(call.now, record.deadline)?;

        let mut next = record.clone();
        next.shown = hand;
        next.deadline = record.governor().stamp(call.now)?;

        let event = MatchEventKind::Shown { hand, deadline: next.deadline };
        Ok(Transition::advance(next, event))
    }

    fn settle(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &SealedMatch,
        reveal: &Reveal,
    ) -> Result<Transition<SealedMatch>, MatchError> {
        if call.caller != record.creator {
            return Err(MatchError::Unauthorized("only the creator settles"));
        }
        if !record.shown.is_playable() {
            return Err(MatchError::PhaseViolation("counterparty has not shown"));
        }
        require_open(call.now, record.deadline)?;
        scheme.verify(&record.commitment, &call.caller, reveal.hand, &reveal.secret)?;

        let outcome = compare(reveal.hand, record.shown);
        let payout = split(record.stake, outcome, Profile::Sealed);
        debug!(
            ?outcome,
            creator = payout.creator,
            counterparty = payout.counterparty,
            "sealed settle"
        );

        Ok(Transition::finalize(
            FinalReason::Settled(outcome),
            record.stake,
            payout,
            record.creator,
            record.counterparty,
            call.now,
        ))
    }

    fn punish(
        &self,
        call: &Call,
        record: &SealedMatch,
    ) -> Result<Transition<SealedMatch>, MatchError> {
        let counterparty = record
            .counterparty
            .ok_or(MatchError::PhaseViolation("nobody has joined"))?;
        if call.caller != counterparty {
            return Err(MatchError::Unauthorized("only the counterparty punishes"));
        }
        if !record.shown.is_playable() {
            return Err(MatchError::PhaseViolation("counterparty has not shown"));
        }
        require_lapsed(call.now, record.deadline)?;

        Ok(Transition::finalize(
            FinalReason::Punished,
            record.stake,
            Payout::to_counterparty(record.stake),
            record.creator,
            Some(counterparty),
            call.now,
        ))
    }

    fn cancel(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &SealedMatch,
        reveal: &Reveal,
    ) -> Result<Transition<SealedMatch>, MatchError> {
        if call.caller != record.creator {
            return Err(MatchError::Unauthorized("only the creator cancels"));
        }
        // Covers both "nobody joined" and "joined but never showed".
        if record.shown.is_playable() {
            return Err(MatchError::PhaseViolation("counterparty already showed"));
        }
        require_lapsed(call.now, record.deadline)?;
        scheme.verify(&record.commitment, &call.caller, reveal.hand, &reveal.secret)?;

        Ok(Transition::finalize(
            FinalReason::Cancelled,
            record.stake,
            Payout::to_creator(record.stake),
            record.creator,
            record.counterparty,
            call.now,
        ))
    }
}

impl MatchEngine for SealedEngine {
    type Record = SealedMatch;

    fn profile(&self) -> Profile {
        Profile::Sealed
    }

    fn open(
        &self,
        call: &Call,
        request: &CreateRequest,
    ) -> Result<Opening<SealedMatch>, MatchError> {
        let units = match request.timeout_units {
            Some(units) if units >= 1 => units,
            _ => return Err(MatchError::InvalidInput("timeout must be at least one unit")),
        };
        require_value(call)?;
        let timeout = self
            .unit
            .checked_mul(u64::from(units))
            .ok_or(MatchError::Overflow)?;

        Ok(Opening {
            record: SealedMatch {
                commitment: request.commitment,
                creator: call.caller,
                stake: call.value,
                deadline: TimeoutGovernor::new(timeout).stamp(call.now)?,
                timeout,
                counterparty: None,
                shown: Hand::None,
            },
            credits: Vec::new(),
        })
    }

    fn apply(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &SealedMatch,
        action: &Action,
    ) -> Result<Transition<SealedMatch>, MatchError> {
        match action {
            Action::Join(JoinRequest::Bare) => self.join(call, record),
            Action::Join(_) => Err(MatchError::InvalidInput("sealed join carries no hand")),
            Action::Show(hand) => self.show(call, record, *hand),
            Action::Settle(Some(reveal)) => self.settle(scheme, call, record, reveal),
            Action::Settle(None) => Err(MatchError::InvalidInput(
                "settle requires the creator's reveal",
            )),
            Action::Punish => self.punish(call, record),
            Action::Cancel(Some(reveal)) => self.cancel(scheme, call, record, reveal),
            Action::Cancel(None) => Err(MatchError::InvalidInput(
                "cancel requires the creator's reveal",
            )),
            Action::Reveal(_) => Err(self.unsupported(action)),
        }
    }
}
