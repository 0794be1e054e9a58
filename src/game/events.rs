//! Match Events
//!
//! Append-only history of every accepted operation. Finalized matches
//! leave no record behind, so this log is the only place their course
//! can be read back from.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

use crate::core::clock::Timestamp;
use crate::core::id::PlayerId;
use crate::game::hand::Hand;
use crate::game::payout::Payout;
use crate::game::record::{FinalReason, MatchKey};

/// Event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEventKind {
    /// Match created
    Created {
        /// Match creator.
        creator: PlayerId,
        /// Pool after the step.
        stake: u64,
        /// Deadline after the step.
        deadline: Timestamp,
    },

    /// Counterparty joined or accepted
    Joined {
        /// Joining side.
        counterparty: PlayerId,
        /// Clear hand, for the symmetric profile.
        hand: Option<Hand>,
        /// Pool after the step.
        stake: u64,
        /// Deadline after the step.
        deadline: Timestamp,
    },

    /// Counterparty showed its hand
    Shown {
        /// Hand shown.
        hand: Hand,
        /// Deadline after the step.
        deadline: Timestamp,
    },

    /// One side opened its commitment
    Revealed {
        /// Identity involved.
        player: PlayerId,
        /// Hand opened.
        hand: Hand,
    },

    /// Terminal transition
    Finalized {
        /// How it ended.
        reason: FinalReason,
        /// Credits per side.
        payout: Payout,
    },

    /// Ledger credit
    Credited {
        /// Identity involved.
        player: PlayerId,
        /// Amount moved.
        amount: u64,
    },

    /// Ledger drained
    Withdrawn {
        /// Identity involved.
        player: PlayerId,
        /// Amount moved.
        amount: u64,
    },
}

/// A recorded event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Position in the log (0-based).
    pub seq: u64,
    /// Time of the call that produced it.
    pub at: Timestamp,
    /// Match involved (ledger events have none).
    pub key: Option<MatchKey>,
    /// Event data
    pub kind: MatchEventKind,
}

impl MatchEvent {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to compact binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from compact binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

/// Append-only event history with live fan-out.
pub struct EventLog {
    entries: RwLock<Vec<MatchEvent>>,
    tx: broadcast::Sender<MatchEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            entries: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Append and broadcast an event.
    pub async fn append(
        &self,
        at: Timestamp,
        key: Option<MatchKey>,
        kind: MatchEventKind,
    ) -> MatchEvent {
        let mut entries = self.entries.write().await;
        let event = MatchEvent {
            seq: entries.len() as u64,
            at,
            key,
            kind,
        };
        entries.push(event.clone());
        // No subscribers is fine.
        let _ = self.tx.send(event.clone());
        event
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.tx.subscribe()
    }

    /// Snapshot of the full history.
    pub async fn snapshot(&self) -> Vec<MatchEvent> {
        self.entries.read().await.clone()
    }

    /// Events for one key.
    pub async fn for_key(&self, key: &MatchKey) -> Vec<MatchEvent> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|e| e.key.as_ref() == Some(key))
            .cloned()
            .collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_assigns_sequence() {
        let log = EventLog::new();
        let player = PlayerId::new([1; 16]);

        let first = log
            .append(10, None, MatchEventKind::Credited { player, amount: 5 })
            .await;
        let second = log
            .append(
                11,
                Some(MatchKey::Sequence(0)),
                MatchEventKind::Withdrawn { player, amount: 5 },
            )
            .await;

        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
        assert_eq!(log.snapshot().await.len(), 2);
        assert_eq!(log.for_key(&MatchKey::Sequence(0)).await, vec![second]);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let log = EventLog::new();
        let mut rx = log.subscribe();
        let player = PlayerId::new([1; 16]);

        log.append(1, None, MatchEventKind::Credited { player, amount: 3 }).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, MatchEventKind::Credited { player, amount: 3 });
    }

    #[test]
    fn test_event_encodings() {
        let event = MatchEvent {
            seq: 0,
            at: 1,
            key: Some(MatchKey::Sequence(3)),
            kind: MatchEventKind::Shown { hand: Hand::Rock, deadline: 99 },
        };
        let json = event.to_json().unwrap();
        assert!(json.contains("\"shown\""));

        let bytes = event.to_bytes().unwrap();
        assert_eq!(MatchEvent::from_bytes(&bytes).unwrap(), event);
    }
}
