//! Timeout Governor
//!
//! Deadlines are always recomputed from the current time, never by
//! compounding a previous deadline. A call that must happen "before the
//! deadline" fails once `now >= deadline`; a call that needs the deadline
//! to have lapsed fails while `now < deadline`.

use serde::{Deserialize, Serialize};

use crate::core::clock::Timestamp;
use crate::game::error::MatchError;

/// Stamps phase deadlines for one configured duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutGovernor {
    duration: u64,
}

impl TimeoutGovernor {
    /// Create a governor for `duration` seconds.
    pub const fn new(duration: u64) -> Self {
        Self { duration }
    }

    /// Deadline for a phase entered at `now`.
    pub fn stamp(&self, now: Timestamp) -> Result<Timestamp, MatchError> {
        now.checked_add(self.duration).ok_or(MatchError::Overflow)
    }
}

/// Require `now` to be strictly before `deadline`.
pub fn require_open(now: Timestamp, deadline: Timestamp) -> Result<(), MatchError> {
    if now >= deadline {
        return Err(MatchError::DeadlineExpired { deadline, now });
    }
    Ok(())
}

/// Require `deadline` to have been reached.
pub fn require_lapsed(now: Timestamp, deadline: Timestamp) -> Result<(), MatchError> {
    if now < deadline {
        return Err(MatchError::DeadlineNotReached { deadline, now });
    }
    Ok(())
}
