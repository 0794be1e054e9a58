//! Stake Ledger
//!
//! Per-identity balance of credited-but-unwithdrawn value. Payouts are
//! never pushed to a player; they accumulate here until `withdraw`.
//!
//! A batch of credits either lands completely or not at all: every
//! addition is checked before any balance changes.

use std::collections::BTreeMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::core::id::PlayerId;
use crate::game::action::Credit;
use crate::game::error::MatchError;

/// Withdrawable balances.
#[derive(Debug, Default)]
pub struct StakeLedger {
    balances: Mutex<BTreeMap<PlayerId, u64>>,
}

impl StakeLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one identity.
    pub async fn credit(&self, player: PlayerId, amount: u64) -> Result<u64, MatchError> {
        self.credit_all(&[Credit { player, amount }]).await?;
        Ok(self.balance(&player).await)
    }

    /// Apply a batch of credits atomically.
    pub async fn credit_all(&self, credits: &[Credit]) -> Result<(), MatchError> {
        if credits.is_empty() {
            return Ok(());
        }
        let mut balances = self.balances.lock().await;

        // Same player may appear twice in one batch.
        let mut staged: BTreeMap<PlayerId, u64> = BTreeMap::new();
        for credit in credits {
            let current = match staged.get(&credit.player) {
                Some(value) => *value,
                None => balances.get(&credit.player).copied().unwrap_or(0),
            };
            let next = current.checked_add(credit.amount).ok_or(MatchError::Overflow)?;
            staged.insert(credit.player, next);
        }

        for (player, balance) in staged {
            debug!(%player, balance, "balance credited");
            balances.insert(player, balance);
        }
        Ok(())
    }

    /// Drain a balance to zero and return what it held.
    pub async fn withdraw(&self, player: &PlayerId) -> Result<u64, MatchError> {
        let mut balances = self.balances.lock().await;
        match balances.remove(player) {
            Some(amount) if amount > 0 => Ok(amount),
            _ => Err(MatchError::NothingToWithdraw),
        }
    }

    /// Current balance (zero when unknown).
    pub async fn balance(&self, player: &PlayerId) -> u64 {
        self.balances.lock().await.get(player).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: PlayerId = PlayerId::new([1; 16]);
    const BOB: PlayerId = PlayerId::new([2; 16]);

    #[tokio::test]
    async fn test_credit_and_withdraw() {
        let ledger = StakeLedger::new();
        assert_eq!(ledger.credit(ALICE, 40).await.unwrap(), 40);
        assert_eq!(ledger.credit(ALICE, 2).await.unwrap(), 42);

        assert_eq!(ledger.withdraw(&ALICE).await.unwrap(), 42);
        assert_eq!(ledger.balance(&ALICE).await, 0);
        assert_eq!(ledger.withdraw(&ALICE).await, Err(MatchError::NothingToWithdraw));
    }

    #[tokio::test]
    async fn test_unknown_player_has_nothing() {
        let ledger = StakeLedger::new();
        assert_eq!(ledger.withdraw(&BOB).await, Err(MatchError::NothingToWithdraw));
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let ledger = StakeLedger::new();
        ledger.credit(BOB, u64::MAX).await.unwrap();

        let batch = [
            Credit { player: ALICE, amount: 10 },
            Credit { player: BOB, amount: 1 },
        ];
        assert_eq!(ledger.credit_all(&batch).await, Err(MatchError::Overflow));
        assert_eq!(ledger.balance(&ALICE).await, 0);
        assert_eq!(ledger.balance(&BOB).await, u64::MAX);
    }

    #[tokio::test]
    async fn test_duplicate_player_in_batch() {
        let ledger = StakeLedger::new();
        let batch = [
            Credit { player: ALICE, amount: 10 },
            Credit { player: ALICE, amount: 5 },
        ];
        ledger.credit_all(&batch).await.unwrap();
        assert_eq!(ledger.balance(&ALICE).await, 15);
    }
}
