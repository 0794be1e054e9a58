//! Open-market matches.
//!
//! Both sides play sealed. Matches are keyed by a counter, so the same
//! commitment may appear in any number of matches. Once accepted, each
//! seat reveals independently; anybody can then settle. If the deadline
//! passes first, anybody can punish.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

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

/// One side of an open-market match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Identity.
    pub id: PlayerId,
    /// Sealed hand.
    pub commitment: Commitment,
    /// Opened hand; `None` until revealed.
    pub revealed: Hand,
}

impl Seat {
    fn sealed(id: PlayerId, commitment: Commitment) -> Self {
        Self { id, commitment, revealed: Hand::None }
    }

    /// Has this seat opened its commitment?
    pub fn has_revealed(&self) -> bool {
        self.revealed.is_playable()
    }
}

/// Active open-market match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenMarketMatch {
    /// Creator's seat.
    pub creator: Seat,
    /// Acceptor's seat, once accepted.
    pub acceptor: Option<Seat>,
    /// Pool.
    pub stake: u64,
    /// Current deadline.
    pub deadline: Timestamp,
}

impl OpenMarketMatch {
    fn both_revealed(&self) -> Option<(Hand, Hand)> {
        let acceptor = self.acceptor?;
        if self.creator.has_revealed() && acceptor.has_revealed() {
            Some((self.creator.revealed, acceptor.revealed))
        } else {
            None
        }
    }
}

impl MatchRecord for OpenMarketMatch {
    fn creator(&self) -> PlayerId {
        self.creator.id
    }

    fn counterparty(&self) -> Option<PlayerId> {
        self.acceptor.map(|seat| seat.id)
    }

    fn stake(&self) -> u64 {
        self.stake
    }

    fn deadline(&self) -> Timestamp {
        self.deadline
    }
}

/// Deadline settlement when not everyone revealed.
///
/// Each seat is judged on its own: a silent seat hands half the pool to
/// the other side, a revealed seat earns half for itself. Either way each
/// side ends up with half; an honest revealer facing a silent opponent
/// does not collect the whole pool.
pub fn punish_split(stake: u64, creator_revealed: bool, acceptor_revealed: bool) -> Payout {
    let half = stake / 2;
    let mut payout = Payout::default();

    if creator_revealed {
        payout.creator += half;
    } else {
        payout.counterparty += half;
    }
    if acceptor_revealed {
        payout.counterparty += half;
    } else {
        payout.creator += half;
    }
    payout
}

/// Engine for the open-market profile.
#[derive(Clone, Copy, Debug)]
pub struct OpenMarketEngine {
    governor: TimeoutGovernor,
}

impl OpenMarketEngine {
    /// Create with the fixed phase duration (seconds).
    pub fn new(timeout: u64) -> Self {
        Self { governor: TimeoutGovernor::new(timeout) }
    }

    fn accept(
        &self,
        call: &Call,
        record: &OpenMarketMatch,
        commitment: Commitment,
    ) -> Result<Transition<OpenMarketMatch>, MatchError> {
        if record.acceptor.is_some() {
            return Err(MatchError::PhaseViolation("match already accepted"));
        }
        // Both seats would resolve to the creator on reveal.
        if call.caller == record.creator.id {
            return Err(MatchError::Unauthorized("creator cannot accept its own match"));
        }
        require_open(call.now, record.deadline)?;
        require_stake(call, record.stake)?;

        let mut next = record.clone();
        next.stake = record.stake.checked_add(call.value).ok_or(MatchError::Overflow)?;
        next.deadline = self.governor.stamp(call.now)?;
        next.acceptor = Some(Seat::sealed(call.caller, commitment));

        let event = MatchEventKind::Joined {
            counterparty: call.caller,
            hand: None,
            stake: next.stake,
            deadline: next.deadline,
        };
        Ok(Transition::advance(next, event))
    }

    fn reveal(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &OpenMarketMatch,
        reveal: &Reveal,
    ) -> Result<Transition<OpenMarketMatch>, MatchError> {
        let acceptor = record
            .acceptor
            .ok_or(MatchError::PhaseViolation("match not accepted"))?;

        let mut next = record.clone();
        let seat = if call.caller == record.creator.id {
            &mut next.creator
        } else if call.caller == acceptor.id {
            next.acceptor.as_mut().ok_or(MatchError::PhaseViolation("match not accepted"))?
        } else {
            return Err(MatchError::Unauthorized("only a seated player reveals"));
        };
        if seat.has_revealed() {
            return Err(MatchError::PhaseViolation("hand already revealed"));
        }
        require_open(call.now, record.deadline)?;
        scheme.verify(&seat.commitment, &call.caller, reveal.hand, &reveal.secret)?;
        seat.revealed = reveal.hand;

        let event = MatchEventKind::Revealed { player: call.caller, hand: reveal.hand };
        Ok(Transition::advance(next, event))
    }

    fn settle(
        &self,
        call: &Call,
        record: &OpenMarketMatch,
    ) -> Result<Transition<OpenMarketMatch>, MatchError> {
        let (creator_hand, acceptor_hand) = record
            .both_revealed()
            .ok_or(MatchError::PhaseViolation("both hands must be revealed"))?;
        require_open(call.now, record.deadline)?;

        let outcome = compare(creator_hand, acceptor_hand);
        let payout = split(record.stake, outcome, Profile::OpenMarket);
        debug!(
            ?outcome,
            creator = payout.creator,
            counterparty = payout.counterparty,
            "open-market settle"
        );

        Ok(Transition::finalize(
            FinalReason::Settled(outcome),
            record.stake,
            payout,
            record.creator.id,
            record.counterparty(),
            call.now,
        ))
    }

    fn punish(
        &self,
        call: &Call,
        record: &OpenMarketMatch,
    ) -> Result<Transition<OpenMarketMatch>, MatchError> {
        let acceptor = record
            .acceptor
            .ok_or(MatchError::PhaseViolation("match not accepted"))?;
        require_lapsed(call.now, record.deadline)?;

        let creator_revealed = record.creator.has_revealed();
        let acceptor_revealed = acceptor.has_revealed();
        if creator_revealed != acceptor_revealed {
            warn!(
                creator_revealed,
                acceptor_revealed, "punishing a one-sided reveal splits the pool evenly"
            );
        }
        let payout = punish_split(record.stake, creator_revealed, acceptor_revealed);

        Ok(Transition::finalize(
            FinalReason::Punished,
            record.stake,
            payout,
            record.creator.id,
            Some(acceptor.id),
            call.now,
        ))
    }

    fn cancel(
        &self,
        call: &Call,
        record: &OpenMarketMatch,
    ) -> Result<Transition<OpenMarketMatch>, MatchError> {
        if call.caller != record.creator.id {
            return Err(MatchError::Unauthorized("only the creator cancels"));
        }
        if record.acceptor.is_some() {
            return Err(MatchError::PhaseViolation("match already accepted"));
        }
        require_lapsed(call.now, record.deadline)?;

        Ok(Transition::finalize(
            FinalReason::Cancelled,
            record.stake,
            Payout::to_creator(record.stake),
            record.creator.id,
            None,
            call.now,
        ))
    }
}

impl MatchEngine for OpenMarketEngine {
    type Record = OpenMarketMatch;

    fn profile(&self) -> Profile {
        Profile::OpenMarket
    }

    fn open(
        &self,
        call: &Call,
        request: &CreateRequest,
    ) -> Result<Opening<OpenMarketMatch>, MatchError> {
        if request.timeout_units.is_some() {
            return Err(MatchError::InvalidInput("open-market matches use the fixed timeout"));
        }
        require_value(call)?;
        let (stake, remainder) = even_stake(call.value);
        if stake == 0 {
            return Err(MatchError::InvalidInput("stake must be at least two units"));
        }

        Ok(Opening {
            record: OpenMarketMatch {
                creator: Seat::sealed(call.caller, request.commitment),
                acceptor: None,
                stake,
                deadline: self.governor.stamp(call.now)?,
            },
            credits: credits(&[(call.caller, remainder)]),
        })
    }

    fn apply(
        &self,
        scheme: &CommitmentScheme,
        call: &Call,
        record: &OpenMarketMatch,
        action: &Action,
    ) -> Result<Transition<OpenMarketMatch>, MatchError> {
        match action {
            Action::Join(JoinRequest::Sealed(commitment)) => self.accept(call, record, *commitment),
            Action::Join(_) => Err(MatchError::InvalidInput(
                "open-market accept carries a sealed hand",
            )),
            Action::Reveal(reveal) => self.reveal(scheme, call, record, reveal),
            Action::Settle(None) => self.settle(call, record),
            Action::Settle(Some(_)) => Err(MatchError::InvalidInput("hands are already revealed")),
            Action::Punish => self.punish(call, record),
            Action::Cancel(None) => self.cancel(call, record),
            Action::Cancel(Some(_)) => Err(MatchError::InvalidInput("cancel takes no reveal")),
            Action::Show(_) => Err(self.unsupported(action)),
        }
    }
}
