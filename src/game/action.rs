//! Calls and Transitions
//!
//! Engines never mutate anything. They look at the current record and a
//! requested `Action` and answer with a `Transition`: the next slot
//! state, the credits it owes and the event describing it. The service
//! layer applies all three together or not at all.

use serde::{Deserialize, Serialize};

use crate::core::clock::Timestamp;
use crate::core::id::PlayerId;
use crate::game::events::MatchEventKind;
use crate::game::hand::Hand;
use crate::game::payout::Payout;
use crate::game::record::{FinalReason, Finalization, MatchSlot};
use crate::proof::commitment::{Commitment, Secret};

/// Who is calling, with how much value, and when.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Call {
    /// Caller identity.
    pub caller: PlayerId,
    /// Value attached to the call.
    pub value: u64,
    /// Time of the call.
    pub now: Timestamp,
}

impl Call {
    /// Create a call.
    pub fn new(caller: PlayerId, value: u64, now: Timestamp) -> Self {
        Self { caller, value, now }
    }
}

/// Opened commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    /// Committed hand.
    pub hand: Hand,
    /// Blinding secret.
    pub secret: Secret,
}

impl Reveal {
    /// Create a reveal.
    pub fn new(hand: Hand, secret: Secret) -> Self {
        Self { hand, secret }
    }
}

/// Parameters of a create call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Creator's sealed hand.
    pub commitment: Commitment,
    /// Timeout multiplier (sealed profile only).
    pub timeout_units: Option<u32>,
}

/// How a counterparty enters a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinRequest {
    /// Stake only; hand is shown later.
    Bare,
    /// Hand revealed in the clear at join time.
    Clear(Hand),
    /// Own sealed hand.
    Sealed(Commitment),
}

/// A phase-changing request against an existing match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Join / accept.
    Join(JoinRequest),
    /// Counterparty shows its hand.
    Show(Hand),
    /// Either side opens its commitment.
    Reveal(Reveal),
    /// Finish the match normally.
    Settle(Option<Reveal>),
    /// Deadline punishment.
    Punish,
    /// Creator reclaims the pool.
    Cancel(Option<Reveal>),
}

impl Action {
    /// Operation name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Join(_) => "join",
            Action::Show(_) => "show",
            Action::Reveal(_) => "reveal",
            Action::Settle(_) => "settle",
            Action::Punish => "punish",
            Action::Cancel(_) => "cancel",
        }
    }

    /// Does this operation carry value?
    pub fn is_payable(&self) -> bool {
        matches!(self, Action::Join(_))
    }
}

/// A ledger credit owed by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    /// Beneficiary.
    pub player: PlayerId,
    /// Amount.
    pub amount: u64,
}

/// Build the credit list, skipping zero amounts.
pub fn credits(entries: &[(PlayerId, u64)]) -> Vec<Credit> {
    entries
        .iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(player, amount)| Credit { player: *player, amount: *amount })
        .collect()
}

/// Result of creating a match.
#[derive(Clone, Debug)]
pub struct Opening<R> {
    /// Initial record.
    pub record: R,
    /// Credits owed right away (odd remainders).
    pub credits: Vec<Credit>,
}

/// Result of applying an action.
#[derive(Clone, Debug)]
pub struct Transition<R> {
    /// Slot state after the action.
    pub next: MatchSlot<R>,
    /// Credits owed by the action.
    pub credits: Vec<Credit>,
    /// What happened.
    pub event: MatchEventKind,
}

impl<R> Transition<R> {
    /// Non-terminal step.
    pub fn advance(record: R, event: MatchEventKind) -> Self {
        Self {
            next: MatchSlot::Active(record),
            credits: Vec::new(),
            event,
        }
    }

    /// Terminal step paying `payout` out of `stake`.
    pub fn finalize(
        reason: FinalReason,
        stake: u64,
        payout: Payout,
        creator: PlayerId,
        counterparty: Option<PlayerId>,
        now: Timestamp,
    ) -> Self {
        debug_assert!(payout.total() <= stake, "payout exceeds pool");
        debug_assert!(counterparty.is_some() || payout.counterparty == 0);

        let mut owed = vec![(creator, payout.creator)];
        if let Some(counterparty) = counterparty {
            owed.push((counterparty, payout.counterparty));
        }

        Self {
            next: MatchSlot::Finalized(Finalization { reason, payout, stake, at: now }),
            credits: credits(&owed),
            event: MatchEventKind::Finalized { reason, payout },
        }
    }

    /// Is this the terminal step?
    pub fn is_final(&self) -> bool {
        !self.next.is_live()
    }
}
