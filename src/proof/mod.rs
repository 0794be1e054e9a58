//! Commitment Protocol
//!
//! Provides the sealed-hand scheme that makes the game fair without any
//! randomness: whoever moves first only publishes a digest, and the
//! digest is opened after the opponent has committed to a reply.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    COMMITMENT                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commit  = SHA256(domain ‖ instance ‖ caller ‖ hand ‖ secret)│
//! │  verify  = commit(reveal) == stored                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;

// Re-export key types
pub use commitment::{Commitment, CommitmentScheme, Secret, SecretPolicy};
