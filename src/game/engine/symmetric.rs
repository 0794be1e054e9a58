//! Symmetric clear counterplay.
//!
//! The creator seals a hand and stakes an even amount; the counterparty
//! joins with half that amount and its hand in the clear. The creator
//! then settles by opening the commitment. Pool = 3 × (stake / 2), so
//! thirds are always exact.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::clock::Timestamp;
use crate::core::id::PlayerId;
use crate::game::action::{
    credits, Action, Call, CreateRequest, JoinRequest, Opening, Reveal, Transition,
};
use crate::game::deadline::{require_lapsed, require_open, TimeoutGovernor};
use crate::game::engine::{require_stake, require_value, MatchEngine, Profile};
use crate::game::error::MatchError;
use crate::game::events::MatchEventKind;
use crate::game::hand::{compare, Hand};
use crate::game::payout::{even_stake, split, Payout};
use crate::game::record::{FinalReason, MatchRecord};
use crate::proof::commitment::{Commitment, CommitmentScheme};

/// Counterparty of a symmetric match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenger {
    /// Identity.
    pub id: PlayerId,
    /// Hand played in the clear.
    pub hand: Hand,
}

/// Active symmetric match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetricMatch {
    /// Creator's sealed hand (also the key).
    pub commitment: Commitment,
    /// Creator.
    pub creator: PlayerId,
    /// Pool.
    pub stake: u64,
    /// Current deadline.
    pub deadline: Timestamp,
    /// Set once joined.
    pub challenger: Option<Challenger>,
}

impl MatchRecord for SymmetricMatch {
    fn creator(&self) -> PlayerId {
        self.creator
    }

    fn counterparty(&self) -> Option<PlayerId> {
        self.challenger.map(|c| c.id)
    }

    fn stake(&self) -> u64 {
        self.stake
    }

    fn deadline(&self) -> Timestamp {
        self.deadline
    }
}

/// Engine for the symmetric profile.
#[derive(Clone, Copy, Debug)]
pub struct SymmetricEngine {
    governor: TimeoutGovernor,
}

impl SymmetricEngine {
    /// Create with the fixed phase duration (seconds).
    pub fn new(timeout: u64) -> Self {
        Self { governor: TimeoutGovernor::new(timeout) }
    }

    fn join(
        &self,
        call: &Call,
        record: &SymmetricMatch,
        hand: Hand,
    ) -> Result<Transition<SymmetricMatch>, MatchError> {
        if record.challenger.is_some() {
            return Err(MatchError::PhaseViolation("match already joined"));
        }
        require_open(call.now, record.deadline)?;
        if !hand.is_playable() {
            return Err(MatchError::InvalidInput("hand must not be NONE"));
        }
        let half = record.stake / 2;
        require_stake(call, half)?;

        let mut next = record.clone();
        next.stake = record.stake.checked_add(half).ok_or(MatchError::Overflow)?;
        next.deadline = self.governor.stamp(call.now)?;
        next.challenger = Some(Challenger { id: call.caller, hand });

        let event = MatchEventKind::Joined {
            counterparty: call.caller,
            hand: Some(hand),
            stake: next.stake,
            deadline: next.deadline,
        };
        Ok(Transition::advance(next, event))
    }

    fn settle(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &SymmetricMatch,
        reveal: &Reveal,
    ) -> Result<Transition<SymmetricMatch>, MatchError> {
        if call.caller != record.creator {
            return Err(MatchError::Unauthorized("only the creator settles"));
        }
        let challenger = record
            .challenger
            .ok_or(MatchError::PhaseViolation("nobody has joined"))?;
        require_open(call.now, record.deadline)?;
        scheme.verify(&record.commitment, &call.caller, reveal.hand, &reveal.secret)?;

        let outcome = compare(reveal.hand, challenger.hand);
        let payout = split(record.stake, outcome, Profile::Symmetric);
        debug!(
            ?outcome,
            creator = payout.creator,
            counterparty = payout.counterparty,
            "symmetric settle"
        );

        Ok(Transition::finalize(
            FinalReason::Settled(outcome),
            record.stake,
            payout,
            record.creator,
            Some(challenger.id),
            call.now,
        ))
    }

    fn punish(
        &self,
        call: &Call,
        record: &SymmetricMatch,
    ) -> Result<Transition<SymmetricMatch>, MatchError> {
        let challenger = record
            .challenger
            .ok_or(MatchError::PhaseViolation("nobody has joined"))?;
        if call.caller != challenger.id {
            return Err(MatchError::Unauthorized("only the counterparty punishes"));
        }
        require_lapsed(call.now, record.deadline)?;

        Ok(Transition::finalize(
            FinalReason::Punished,
            record.stake,
            Payout::to_counterparty(record.stake),
            record.creator,
            Some(challenger.id),
            call.now,
        ))
    }

    fn cancel(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &SymmetricMatch,
        reveal: &Reveal,
    ) -> Result<Transition<SymmetricMatch>, MatchError> {
        if call.caller != record.creator {
            return Err(MatchError::Unauthorized("only the creator cancels"));
        }
        // Unjoined matches have no cancel path in this profile.
        let challenger = record
            .challenger
            .ok_or(MatchError::PhaseViolation("only joined matches can be cancelled"))?;
        require_lapsed(call.now, record.deadline)?;
        scheme.verify(&record.commitment, &call.caller, reveal.hand, &reveal.secret)?;

        Ok(Transition::finalize(
            FinalReason::Cancelled,
            record.stake,
            Payout::to_creator(record.stake),
            record.creator,
            Some(challenger.id),
            call.now,
        ))
    }
}

impl MatchEngine for SymmetricEngine {
    type Record = SymmetricMatch;

    fn profile(&self) -> Profile {
        Profile::Symmetric
    }

    fn open(
        &self,
        call: &Call,
        request: &CreateRequest,
    ) -> Result<Opening<SymmetricMatch>, MatchError> {
        if request.timeout_units.is_some() {
            return Err(MatchError::InvalidInput("symmetric matches use the fixed timeout"));
        }
        require_value(call)?;
        let (stake, remainder) = even_stake(call.value);
        if stake == 0 {
            return Err(MatchError::InvalidInput("stake must be at least two units"));
        }

        Ok(Opening {
            record: SymmetricMatch {
                commitment: request.commitment,
                creator: call.caller,
                stake,
                deadline: self.governor.stamp(call.now)?,
                challenger: None,
            },
            credits: credits(&[(call.caller, remainder)]),
        })
    }

    fn apply(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &SymmetricMatch,
        action: &Action,
    ) -> Result<Transition<SymmetricMatch>, MatchError> {
        match action {
            Action::Join(JoinRequest::Clear(hand)) => self.join(call, record, *hand),
            Action::Join(_) => Err(MatchError::InvalidInput("symmetric join carries a clear hand")),
            Action::Settle(Some(reveal)) => self.settle(scheme, call, record, reveal),
            Action::Settle(None) => Err(MatchError::InvalidInput(
                "settle requires the creator's reveal",
            )),
            Action::Punish => self.punish(call, record),
            Action::Cancel(Some(reveal)) => self.cancel(scheme, call, record, reveal),
            Action::Cancel(None) => Err(MatchError::InvalidInput(
                "cancel requires the creator's reveal",
            )),
            Action::Show(_) | Action::Reveal(_) => Err(self.unsupported(action)),
        }
    }
}
