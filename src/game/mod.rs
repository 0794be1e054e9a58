//! Match Logic Module
//!
//! Everything that decides who owes what. Nothing in here holds a lock
//! or touches a balance.
//!
//! ## Module Structure
//!
//! - `hand`: Hands and the cyclic beats relation
//! - `payout`: Per-profile pool division
//! - `deadline`: Timeout governor
//! - `record`: Match keys, slots and terminal summaries
//! - `action`: Calls, actions and transitions
//! - `engine`: The three profile state machines
//! - `events`: Append-only event history
//! - `error`: Error taxonomy

pub mod action;
pub mod deadline;
pub mod engine;
pub mod error;
pub mod events;
pub mod hand;
pub mod payout;
pub mod record;

// Re-export key types
pub use action::{Action, Call, CreateRequest, Credit, JoinRequest, Reveal, Transition};
pub use deadline::TimeoutGovernor;
pub use engine::{MatchEngine, OpenMarketEngine, Profile, SealedEngine, SymmetricEngine};
pub use error::{ErrorCode, MatchError};
pub use events::{EventLog, MatchEvent, MatchEventKind};
pub use hand::{compare, Hand, Outcome};
pub use payout::Payout;
pub use record::{FinalReason, Finalization, MatchKey, MatchRecord, MatchSlot};
