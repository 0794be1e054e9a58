//! Core primitives.
//!
//! Identities, hashing and time. Everything above this layer builds on
//! these types.

pub mod clock;
pub mod hash;
pub mod id;

// Re-export core types
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use hash::{Digest32, DomainHasher};
pub use id::{InstanceId, PlayerId};
