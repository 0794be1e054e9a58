//! Match Table
//!
//! ```text
//! RwLock<Slots>                  (held briefly to look up or insert)
//!   └── MatchKey → Arc<Mutex<MatchSlot<R>>>   (held for one whole operation)
//! ```
//!
//! Operations on different keys never wait on each other once the slot
//! handle has been cloned out of the map.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, RwLockWriteGuard};

use crate::game::engine::Keying;
use crate::game::error::MatchError;
use crate::game::record::{MatchKey, MatchSlot};
use crate::proof::commitment::Commitment;

/// Shared handle to one slot.
pub type SlotHandle<R> = Arc<Mutex<MatchSlot<R>>>;

/// Key space of one service.
#[derive(Debug)]
pub struct Slots<R> {
    map: BTreeMap<MatchKey, SlotHandle<R>>,
    next_seq: u64,
}

impl<R> Slots<R> {
    /// Pick the key a new match would occupy.
    ///
    /// Commitment keys may be reused only after the previous match under
    /// them has finalized.
    pub async fn vacancy(
        &self,
        keying: Keying,
        commitment: &Commitment,
    ) -> Result<MatchKey, MatchError> {
        match keying {
            Keying::Sequential => Ok(MatchKey::Sequence(self.next_seq)),
            Keying::ByCommitment => {
                let key = MatchKey::Commitment(*commitment);
                if let Some(slot) = self.map.get(&key) {
                    if slot.lock().await.is_live() {
                        return Err(MatchError::KeyConflict(key));
                    }
                }
                Ok(key)
            }
        }
    }

    /// Install a fresh active record under `key`.
    pub fn occupy(&mut self, key: MatchKey, record: R) {
        if let MatchKey::Sequence(n) = key {
            self.next_seq = self.next_seq.max(n + 1);
        }
        self.map.insert(key, Arc::new(Mutex::new(MatchSlot::Active(record))));
    }
}

/// All matches of one service.
#[derive(Debug)]
pub struct MatchTable<R> {
    slots: RwLock<Slots<R>>,
}

impl<R> MatchTable<R> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Slots {
                map: BTreeMap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Exclusive access for creation.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Slots<R>> {
        self.slots.write().await
    }

    /// Slot handle for a key.
    pub async fn get(&self, key: &MatchKey) -> Option<SlotHandle<R>> {
        self.slots.read().await.map.get(key).cloned()
    }
}

impl<R> Default for MatchTable<R> {
    fn default() -> Self {
        Self::new()
    }
}
