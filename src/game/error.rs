//! Match errors.
//!
//! Every failure aborts the whole operation with no partial mutation.
//! Nothing is retried internally; `ErrorCode` is the stable reason a
//! caller can branch on.

use serde::{Deserialize, Serialize};

use crate::core::clock::Timestamp;
use crate::game::engine::Profile;
use crate::game::record::MatchKey;

/// Match errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Malformed request: NONE hand, zero secret, zero timeout, zero stake.
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    /// A live match already uses this key.
    #[error("Match key {0} is already live")]
    KeyConflict(MatchKey),

    /// Unknown or already finalized key.
    #[error("Match {0} does not exist")]
    NotFound(MatchKey),

    /// Caller is not the participant this step requires.
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Attached value differs from the required amount.
    #[error("Stake mismatch: expected {expected}, got {got}")]
    StakeMismatch {
        /// Required value.
        expected: u64,
        /// Attached value.
        got: u64,
    },

    /// Operation not valid in the current phase.
    #[error("Phase violation: {0}")]
    PhaseViolation(&'static str),

    /// Deadline has passed.
    #[error("Deadline {deadline} expired (now {now})")]
    DeadlineExpired {
        /// Active deadline.
        deadline: Timestamp,
        /// Time of the call.
        now: Timestamp,
    },

    /// Deadline has not been reached yet.
    #[error("Deadline {deadline} not reached (now {now})")]
    DeadlineNotReached {
        /// Active deadline.
        deadline: Timestamp,
        /// Time of the call.
        now: Timestamp,
    },

    /// Revealed hand and secret do not re-derive the stored digest.
    #[error("Reveal does not match commitment")]
    CommitmentMismatch,

    /// The active profile does not offer this operation.
    #[error("{operation} is not offered by the {profile} profile")]
    Unsupported {
        /// Active profile.
        profile: Profile,
        /// Requested operation.
        operation: &'static str,
    },

    /// The admission gate refused a new match.
    #[error("Admission denied: {0}")]
    AdmissionDenied(&'static str),

    /// Ledger balance is already zero.
    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    /// Checked arithmetic overflowed.
    #[error("Arithmetic overflow")]
    Overflow,
}

/// Stable, serializable error reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Invalid input.
    InvalidInput,
    /// Key already live.
    KeyConflict,
    /// Match not found.
    NotFound,
    /// Wrong caller.
    Unauthorized,
    /// Wrong attached value.
    StakeMismatch,
    /// Wrong phase.
    PhaseViolation,
    /// Too late.
    DeadlineExpired,
    /// Too early.
    DeadlineNotReached,
    /// Bad reveal.
    CommitmentMismatch,
    /// Not offered by profile.
    Unsupported,
    /// Gate closed.
    AdmissionDenied,
    /// Empty balance.
    NothingToWithdraw,
    /// Overflow.
    Overflow,
}

impl MatchError {
    /// Stable reason for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::KeyConflict(_) => ErrorCode::KeyConflict,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::StakeMismatch { .. } => ErrorCode::StakeMismatch,
            Self::PhaseViolation(_) => ErrorCode::PhaseViolation,
            Self::DeadlineExpired { .. } => ErrorCode::DeadlineExpired,
            Self::DeadlineNotReached { .. } => ErrorCode::DeadlineNotReached,
            Self::CommitmentMismatch => ErrorCode::CommitmentMismatch,
            Self::Unsupported { .. } => ErrorCode::Unsupported,
            Self::AdmissionDenied(_) => ErrorCode::AdmissionDenied,
            Self::NothingToWithdraw => ErrorCode::NothingToWithdraw,
            Self::Overflow => ErrorCode::Overflow,
        }
    }

    /// Will the same call succeed later without the caller changing it?
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DeadlineNotReached { .. } | Self::AdmissionDenied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_snake_case() {
        let json = serde_json::to_string(&ErrorCode::DeadlineNotReached).unwrap();
        assert_eq!(json, "\"deadline_not_reached\"");
    }

    #[test]
    fn test_transient_vs_permanent() {
        let early = MatchError::DeadlineNotReached { deadline: 10, now: 5 };
        assert!(early.is_transient());
        assert!(!MatchError::NotFound(MatchKey::Sequence(1)).is_transient());
        assert_eq!(early.code(), ErrorCode::DeadlineNotReached);
    }

    #[test]
    fn test_display() {
        let err = MatchError::StakeMismatch { expected: 100, got: 99 };
        assert_eq!(err.to_string(), "Stake mismatch: expected 100, got 99");
    }
}
