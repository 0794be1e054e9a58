//! # Hand Escrow
//!
//! Commit-reveal rock/paper/scissors matches with escrowed stakes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       HAND ESCROW                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Primitives                              │
//! │  ├── id.rs         - Player and instance identities          │
//! │  ├── hash.rs       - Domain-separated SHA-256                │
//! │  └── clock.rs      - Time sources                            │
//! │                                                              │
//! │  proof/            - Commitment protocol                     │
//! │  └── commitment.rs - Seal and open hands                     │
//! │                                                              │
//! │  game/             - Match rules (pure)                      │
//! │  ├── hand.rs       - Hands and outcome resolver              │
//! │  ├── payout.rs     - Pool division                           │
//! │  ├── deadline.rs   - Timeout governor                        │
//! │  ├── engine/       - Symmetric, sealed, open-market          │
//! │  └── events.rs     - Event history                           │
//! │                                                              │
//! │  service/          - Orchestration (async)                   │
//! │  ├── table.rs      - Keyed match slots                       │
//! │  ├── ledger.rs     - Withdrawable balances                   │
//! │  ├── gate.rs       - Admission gate                          │
//! │  └── match_service.rs - Entry points                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Money Flow
//!
//! Value only enters through `create` and `join`, and only leaves
//! through `withdraw`. Every payout is a ledger credit; no operation
//! pushes value to a player.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod proof;
pub mod service;

// Re-export commonly used types
pub use crate::core::clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use crate::core::id::{InstanceId, PlayerId};
pub use game::{Hand, MatchError, MatchKey, Outcome, Profile};
pub use proof::{Commitment, Secret};
pub use service::{EngineConfig, MatchService, StakeLedger};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
