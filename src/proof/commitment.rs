//! Hand Commitment Protocol
//!
//! Commit to a hand before the opponent acts; reveal hand and secret
//! later and check them against the stored digest.
//!
//! The digest binds the engine instance and the caller, so a commitment
//! computed for one instance or one caller cannot be replayed as
//! another's.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::hash::{short_hex, Digest32, DomainHasher};
use crate::core::id::{InstanceId, PlayerId};
use crate::game::error::MatchError;
use crate::game::hand::Hand;

/// Domain separator for commitments.
const COMMITMENT_DOMAIN: &[u8] = b"HAND_ESCROW_COMMIT_V1";

/// Opaque sealed-hand digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Commitment(pub Digest32);

impl Commitment {
    /// Get raw bytes.
    pub fn as_bytes(&self) -> &Digest32 {
        &self.0
    }

    /// Full hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", short_hex(&self.0))
    }
}

/// Caller-chosen blinding value.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(pub [u8; 32]);

impl Secret {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Secret holding a small integer (big-endian, like a 256-bit word).
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Fresh random secret.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        bytes[16..].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        Self(bytes)
    }

    /// Is every byte zero?
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Whether a profile accepts the all-zero secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecretPolicy {
    /// Zero secrets are accepted.
    AllowZero,
    /// Zero secrets are rejected with `InvalidInput`.
    RequireNonZero,
}

/// Commitment scheme bound to one engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitmentScheme {
    instance: InstanceId,
    policy: SecretPolicy,
}

impl CommitmentScheme {
    /// Create a scheme for `instance`.
    pub const fn new(instance: InstanceId, policy: SecretPolicy) -> Self {
        Self { instance, policy }
    }

    /// Instance bound into every digest.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Active secret policy.
    pub fn policy(&self) -> SecretPolicy {
        self.policy
    }

    /// Seal `hand` for `caller`.
    pub fn commit(
        &self,
        caller: &PlayerId,
        hand: Hand,
        secret: &Secret,
    ) -> Result<Commitment, MatchError> {
        if !hand.is_playable() {
            return Err(MatchError::InvalidInput("hand must not be NONE"));
        }
        if self.policy == SecretPolicy::RequireNonZero && secret.is_zero() {
            return Err(MatchError::InvalidInput("secret must be non-zero"));
        }

        let mut hasher = DomainHasher::new(COMMITMENT_DOMAIN);
        hasher.update_id(self.instance.as_bytes());
        hasher.update_id(caller.as_bytes());
        hasher.update_u8(hand as u8);
        hasher.update_bytes(&secret.0);

        Ok(Commitment(hasher.finalize()))
    }

    /// Re-derive and compare against a stored digest.
    pub fn verify(
        &self,
        stored: &Commitment,
        caller: &PlayerId,
        hand: Hand,
        secret: &Secret,
    ) -> Result<(), MatchError> {
        if self.commit(caller, hand, secret)? != *stored {
            return Err(MatchError::CommitmentMismatch);
        }
        Ok(())
    }
}
