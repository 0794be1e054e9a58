//! Match Service
//!
//! The externally callable surface: one service per profile, each with
//! its own key space and history, optionally sharing a ledger.
//!
//! ```text
//!   caller ──► MatchService<E>
//!                 │  1. reject stray value, consult gate (create only)
//!                 │  2. table.get(key)            (RwLock, released)
//!                 │  3. slot.lock()               (held to the end)
//!                 │  4. engine.apply(...)         (pure)
//!                 │  5. ledger.credit_all(...)    (all or nothing)
//!                 │  6. *slot = transition.next
//!                 └─ 7. events.append(...)
//! ```
//!
//! Lock order is table, then slot, then ledger. `withdraw` only touches
//! the ledger.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::core::clock::Clock;
use crate::core::hash::short_hex;
use crate::core::id::{InstanceId, PlayerId};
use crate::game::action::{Action, Call, CreateRequest, Credit, JoinRequest, Reveal};
use crate::game::engine::{MatchEngine, OpenMarketEngine, Profile, SealedEngine, SymmetricEngine};
use crate::game::error::MatchError;
use crate::game::events::{EventLog, MatchEvent, MatchEventKind};
use crate::game::hand::Hand;
use crate::game::record::{MatchKey, MatchRecord, MatchSlot};
use crate::proof::commitment::{Commitment, CommitmentScheme, Secret};
use crate::service::config::{ConfigError, EngineConfig};
use crate::service::gate::AdmissionGate;
use crate::service::ledger::StakeLedger;
use crate::service::table::MatchTable;

/// What an accepted operation did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Match touched.
    pub key: MatchKey,
    /// Ledger credits applied.
    pub credits: Vec<Credit>,
    /// Did the match end?
    pub finalized: bool,
}

/// Collaborators shared between services.
#[derive(Clone)]
pub struct ServiceContext {
    /// Balances.
    pub ledger: Arc<StakeLedger>,
    /// Creation-time admission.
    pub gate: Arc<dyn AdmissionGate>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

impl ServiceContext {
    /// Bundle collaborators.
    pub fn new(
        ledger: Arc<StakeLedger>,
        gate: Arc<dyn AdmissionGate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { ledger, gate, clock }
    }
}

/// Match service for one profile.
pub struct MatchService<E: MatchEngine> {
    engine: E,
    scheme: CommitmentScheme,
    table: MatchTable<E::Record>,
    events: EventLog,
    context: ServiceContext,
}

impl MatchService<SymmetricEngine> {
    /// Symmetric-profile service.
    pub fn symmetric(config: &EngineConfig, context: ServiceContext) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = SymmetricEngine::new(config.symmetric_timeout.as_secs());
        Ok(Self::new(engine, config.instance_id, context))
    }
}

impl MatchService<SealedEngine> {
    /// Sealed-profile service.
    pub fn sealed(config: &EngineConfig, context: ServiceContext) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = SealedEngine::new(config.timeout_unit.as_secs());
        Ok(Self::new(engine, config.instance_id, context))
    }
}

impl MatchService<OpenMarketEngine> {
    /// Open-market service.
    pub fn open_market(
        config: &EngineConfig,
        context: ServiceContext,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = OpenMarketEngine::new(config.open_market_timeout.as_secs());
        Ok(Self::new(engine, config.instance_id, context))
    }
}

impl<E: MatchEngine> MatchService<E> {
    /// Create a service around `engine`.
    pub fn new(engine: E, instance: InstanceId, context: ServiceContext) -> Self {
        let scheme = CommitmentScheme::new(instance, engine.profile().secret_policy());
        Self {
            engine,
            scheme,
            table: MatchTable::new(),
            events: EventLog::new(),
            context,
        }
    }

    /// Active profile.
    pub fn profile(&self) -> Profile {
        self.engine.profile()
    }

    /// Commitment scheme of this service.
    pub fn scheme(&self) -> &CommitmentScheme {
        &self.scheme
    }

    /// Seal a hand for `caller`.
    pub fn commit(
        &self,
        caller: &PlayerId,
        hand: Hand,
        secret: &Secret,
    ) -> Result<Commitment, MatchError> {
        self.scheme.commit(caller, hand, secret)
    }

    /// Open a match with `value` attached.
    #[instrument(skip(self), fields(profile = %self.engine.profile()))]
    pub async fn create(
        &self,
        caller: PlayerId,
        commitment: Commitment,
        timeout_units: Option<u32>,
        value: u64,
    ) -> Result<Receipt, MatchError> {
        let result = self.open(caller, commitment, timeout_units, value).await;
        if let Err(err) = &result {
            warn!(%caller, code = ?err.code(), "create rejected: {}", err);
        }
        result
    }

    /// Join or accept a match.
    #[instrument(skip(self), fields(profile = %self.engine.profile()))]
    pub async fn join(
        &self,
        caller: PlayerId,
        key: MatchKey,
        request: JoinRequest,
        value: u64,
    ) -> Result<Receipt, MatchError> {
        self.transact(caller, value, key, Action::Join(request)).await
    }

    /// Counterparty shows its hand in the clear.
    #[instrument(skip(self), fields(profile = %self.engine.profile()))]
    pub async fn show(
        &self,
        caller: PlayerId,
        key: MatchKey,
        hand: Hand,
        value: u64,
    ) -> Result<Receipt, MatchError> {
        self.transact(caller, value, key, Action::Show(hand)).await
    }

    /// Open the caller's own commitment.
    #[instrument(skip(self), fields(profile = %self.engine.profile()))]
    pub async fn reveal(
        &self,
        caller: PlayerId,
        key: MatchKey,
        reveal: Reveal,
        value: u64,
    ) -> Result<Receipt, MatchError> {
        self.transact(caller, value, key, Action::Reveal(reveal)).await
    }

    /// Settle a match.
    #[instrument(skip(self), fields(profile = %self.engine.profile()))]
    pub async fn settle(
        &self,
        caller: PlayerId,
        key: MatchKey,
        reveal: Option<Reveal>,
        value: u64,
    ) -> Result<Receipt, MatchError> {
        self.transact(caller, value, key, Action::Settle(reveal)).await
    }

    /// Deadline punishment.
    #[instrument(skip(self), fields(profile = %self.engine.profile()))]
    pub async fn punish(
        &self,
        caller: PlayerId,
        key: MatchKey,
        value: u64,
    ) -> Result<Receipt, MatchError> {
        self.transact(caller, value, key, Action::Punish).await
    }

    /// Creator reclaims the pool.
    #[instrument(skip(self), fields(profile = %self.engine.profile()))]
    pub async fn cancel(
        &self,
        caller: PlayerId,
        key: MatchKey,
        reveal: Option<Reveal>,
        value: u64,
    ) -> Result<Receipt, MatchError> {
        self.transact(caller, value, key, Action::Cancel(reveal)).await
    }

    /// Drain the caller's balance.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, caller: PlayerId, value: u64) -> Result<u64, MatchError> {
        reject_value(value)?;
        let amount = self.context.ledger.withdraw(&caller).await.map_err(|err| {
            warn!(%caller, "withdraw rejected: {}", err);
            err
        })?;

        let now = self.context.clock.now();
        self.events
            .append(now, None, MatchEventKind::Withdrawn { player: caller, amount })
            .await;
        info!(%caller, amount, "withdrawn");
        Ok(amount)
    }

    /// Value sent outside every named operation.
    pub fn receive(&self, caller: PlayerId, value: u64) -> Result<(), MatchError> {
        warn!(%caller, value, "unsolicited value refused");
        Err(MatchError::StakeMismatch { expected: 0, got: value })
    }

    /// Current slot under `key`.
    pub async fn record(&self, key: &MatchKey) -> Option<MatchSlot<E::Record>> {
        let handle = self.table.get(key).await?;
        let slot = handle.lock().await;
        Some(slot.clone())
    }

    /// Ledger balance of `player`.
    pub async fn balance(&self, player: &PlayerId) -> u64 {
        self.context.ledger.balance(player).await
    }

    /// Full event history.
    pub async fn history(&self) -> Vec<MatchEvent> {
        self.events.snapshot().await
    }

    /// Event history of one match.
    pub async fn history_of(&self, key: &MatchKey) -> Vec<MatchEvent> {
        self.events.for_key(key).await
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.events.subscribe()
    }

    async fn open(
        &self,
        caller: PlayerId,
        commitment: Commitment,
        timeout_units: Option<u32>,
        value: u64,
    ) -> Result<Receipt, MatchError> {
        let gate = &self.context.gate;
        if !gate.accepting_matches() {
            return Err(MatchError::AdmissionDenied("not accepting new matches"));
        }
        if !gate.instance_alive() {
            return Err(MatchError::AdmissionDenied("instance is not alive"));
        }

        let call = Call::new(caller, value, self.context.clock.now());
        let request = CreateRequest { commitment, timeout_units };

        let mut slots = self.table.write().await;
        let key = slots.vacancy(self.engine.profile().keying(), &commitment).await?;
        let opening = self.engine.open(&call, &request)?;
        self.context.ledger.credit_all(&opening.credits).await?;

        let created = MatchEventKind::Created {
            creator: caller,
            stake: opening.record.stake(),
            deadline: opening.record.deadline(),
        };
        slots.occupy(key, opening.record);

        self.events.append(call.now, Some(key), created).await;
        self.record_credits(call.now, key, &opening.credits).await;
        drop(slots);

        info!(%key, %caller, commitment = %short_hex(commitment.as_bytes()), "match created");
        Ok(Receipt {
            key,
            credits: opening.credits,
            finalized: false,
        })
    }

    async fn transact(
        &self,
        caller: PlayerId,
        value: u64,
        key: MatchKey,
        action: Action,
    ) -> Result<Receipt, MatchError> {
        let result = self.step(caller, value, key, action).await;
        match &result {
            Ok(receipt) if receipt.finalized => {
                info!(%key, operation = action.name(), "match finalized")
            }
            Ok(_) => info!(%key, operation = action.name(), "match advanced"),
            Err(err) => warn!(
                %key,
                %caller,
                operation = action.name(),
                code = ?err.code(),
                "rejected: {}",
                err
            ),
        }
        result
    }

    async fn step(
        &self,
        caller: PlayerId,
        value: u64,
        key: MatchKey,
        action: Action,
    ) -> Result<Receipt, MatchError> {
        if !action.is_payable() {
            reject_value(value)?;
        }
        let handle = self.table.get(&key).await.ok_or(MatchError::NotFound(key))?;
        let mut slot = handle.lock().await;
        let record = slot.active().ok_or(MatchError::NotFound(key))?;

        let call = Call::new(caller, value, self.context.clock.now());
        let transition = self.engine.apply(&self.scheme, &call, record, &action)?;
        self.context.ledger.credit_all(&transition.credits).await?;

        let finalized = transition.is_final();
        *slot = transition.next;
        self.events.append(call.now, Some(key), transition.event).await;
        self.record_credits(call.now, key, &transition.credits).await;

        Ok(Receipt {
            key,
            credits: transition.credits,
            finalized,
        })
    }

    async fn record_credits(&self, at: u64, key: MatchKey, credits: &[Credit]) {
        for credit in credits {
            self.events
                .append(
                    at,
                    Some(key),
                    MatchEventKind::Credited {
                        player: credit.player,
                        amount: credit.amount,
                    },
                )
                .await;
        }
    }
}

fn reject_value(value: u64) -> Result<(), MatchError> {
    if value != 0 {
        return Err(MatchError::StakeMismatch { expected: 0, got: value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::game::hand::Outcome;
    use crate::game::payout::Payout;
    use crate::game::record::FinalReason;
    use crate::service::gate::{GateSwitch, OpenGate};

    const CREATOR: PlayerId = PlayerId::new([1; 16]);
    const RIVAL: PlayerId = PlayerId::new([2; 16]);
    const STRANGER: PlayerId = PlayerId::new([3; 16]);
    const HOUR: u64 = 3600;

    fn config() -> EngineConfig {
        EngineConfig {
            instance_id: InstanceId::new([5; 16]),
            ..Default::default()
        }
    }

    fn context(clock: &Arc<ManualClock>) -> ServiceContext {
        ServiceContext::new(Arc::new(StakeLedger::new()), Arc::new(OpenGate), clock.clone())
    }

    fn sealed_hand<E: MatchEngine>(
        service: &MatchService<E>,
        player: PlayerId,
        hand: Hand,
        secret: u64,
    ) -> (Commitment, Reveal) {
        let secret = Secret::from_u64(secret);
        let commitment = service.commit(&player, hand, &secret).unwrap();
        (commitment, Reveal::new(hand, secret))
    }

    #[tokio::test]
    async fn test_sealed_creator_wins() {
        let clock = Arc::new(ManualClock::new(1_000));
        let service = MatchService::sealed(&config(), context(&clock)).unwrap();
        let (commitment, reveal) = sealed_hand(&service, CREATOR, Hand::Paper, 77);

        let key = service.create(CREATOR, commitment, Some(1), 100).await.unwrap().key;
        clock.advance(60);
        service.join(RIVAL, key, JoinRequest::Bare, 100).await.unwrap();
        clock.advance(60);
        service.show(RIVAL, key, Hand::Rock, 0).await.unwrap();
        clock.advance(60);
        let receipt = service.settle(CREATOR, key, Some(reveal), 0).await.unwrap();

        assert!(receipt.finalized);
        assert_eq!(service.balance(&CREATOR).await, 200);
        assert_eq!(service.balance(&RIVAL).await, 0);
        match service.record(&key).await {
            Some(MatchSlot::Finalized(f)) => {
                assert_eq!(f.reason, FinalReason::Settled(Outcome::AWins));
                assert_eq!(f.payout, Payout::to_creator(200));
            }
            other => panic!("unexpected slot: {:?}", other),
        }

        let again = service.settle(CREATOR, key, Some(reveal), 0).await;
        assert_eq!(again.unwrap_err(), MatchError::NotFound(key));
    }

    #[tokio::test]
    async fn test_sealed_tie_and_withdraw() {
        let clock = Arc::new(ManualClock::new(1_000));
        let service = MatchService::sealed(&config(), context(&clock)).unwrap();
        let (commitment, reveal) = sealed_hand(&service, CREATOR, Hand::Scissors, 5);

        let key = service.create(CREATOR, commitment, Some(1), 100).await.unwrap().key;
        service.join(RIVAL, key, JoinRequest::Bare, 100).await.unwrap();
        service.show(RIVAL, key, Hand::Scissors, 0).await.unwrap();
        service.settle(CREATOR, key, Some(reveal), 0).await.unwrap();

        assert_eq!(service.withdraw(CREATOR, 0).await.unwrap(), 100);
        assert_eq!(service.withdraw(RIVAL, 0).await.unwrap(), 100);
        assert_eq!(service.withdraw(RIVAL, 0).await, Err(MatchError::NothingToWithdraw));
    }

    #[tokio::test]
    async fn test_live_key_conflicts() {
        let clock = Arc::new(ManualClock::new(1_000));
        let service = MatchService::sealed(&config(), context(&clock)).unwrap();
        let (commitment, reveal) = sealed_hand(&service, CREATOR, Hand::Rock, 9);

        let key = service.create(CREATOR, commitment, Some(1), 100).await.unwrap().key;
        let conflict = service.create(CREATOR, commitment, Some(1), 100).await;
        assert_eq!(conflict.unwrap_err(), MatchError::KeyConflict(key));
        assert_eq!(service.balance(&CREATOR).await, 0);

        clock.advance(HOUR);
        service.cancel(CREATOR, key, Some(reveal), 0).await.unwrap();
        assert_eq!(service.balance(&CREATOR).await, 100);

        let reused = service.create(CREATOR, commitment, Some(2), 50).await.unwrap();
        assert_eq!(reused.key, key);
    }

    #[tokio::test]
    async fn test_symmetric_tie() {
        let clock = Arc::new(ManualClock::new(0));
        let service = MatchService::symmetric(&config(), context(&clock)).unwrap();
        let (commitment, reveal) = sealed_hand(&service, CREATOR, Hand::Rock, 0);

        let key = service.create(CREATOR, commitment, None, 120).await.unwrap().key;
        service.join(RIVAL, key, JoinRequest::Clear(Hand::Rock), 60).await.unwrap();
        service.settle(CREATOR, key, Some(reveal), 0).await.unwrap();

        assert_eq!(service.balance(&CREATOR).await, 120);
        assert_eq!(service.balance(&RIVAL).await, 60);
    }

    #[tokio::test]
    async fn test_open_market_punish_splits() {
        let clock = Arc::new(ManualClock::new(0));
        let service = MatchService::open_market(&config(), context(&clock)).unwrap();
        let (c_commit, c_reveal) = sealed_hand(&service, CREATOR, Hand::Rock, 1);
        let (r_commit, _) = sealed_hand(&service, RIVAL, Hand::Paper, 2);

        let key = service.create(CREATOR, c_commit, None, 100).await.unwrap().key;
        assert_eq!(key, MatchKey::Sequence(0));
        service.join(RIVAL, key, JoinRequest::Sealed(r_commit), 100).await.unwrap();
        service.reveal(CREATOR, key, c_reveal, 0).await.unwrap();

        clock.advance(HOUR);
        let receipt = service.punish(STRANGER, key, 0).await.unwrap();
        assert!(receipt.finalized);
        assert_eq!(service.balance(&CREATOR).await, 100);
        assert_eq!(service.balance(&RIVAL).await, 100);
    }

    #[tokio::test]
    async fn test_open_market_allows_repeated_commitments() {
        let clock = Arc::new(ManualClock::new(0));
        let service = MatchService::open_market(&config(), context(&clock)).unwrap();
        let (commitment, _) = sealed_hand(&service, CREATOR, Hand::Rock, 1);

        let first = service.create(CREATOR, commitment, None, 10).await.unwrap().key;
        let second = service.create(CREATOR, commitment, None, 10).await.unwrap().key;
        assert_eq!(first, MatchKey::Sequence(0));
        assert_eq!(second, MatchKey::Sequence(1));
    }

    #[tokio::test]
    async fn test_stray_value_rejected() {
        let clock = Arc::new(ManualClock::new(0));
        let service = MatchService::sealed(&config(), context(&clock)).unwrap();
        let (commitment, _) = sealed_hand(&service, CREATOR, Hand::Rock, 3);
        let key = service.create(CREATOR, commitment, Some(1), 100).await.unwrap().key;
        service.join(RIVAL, key, JoinRequest::Bare, 100).await.unwrap();

        let shown = service.show(RIVAL, key, Hand::Rock, 5).await;
        assert_eq!(shown.unwrap_err(), MatchError::StakeMismatch { expected: 0, got: 5 });
        assert_eq!(
            service.receive(STRANGER, 1),
            Err(MatchError::StakeMismatch { expected: 0, got: 1 })
        );
        assert!(matches!(service.withdraw(RIVAL, 1).await, Err(MatchError::StakeMismatch { .. })));
    }

    #[tokio::test]
    async fn test_gate_blocks_creation_only() {
        let clock = Arc::new(ManualClock::new(0));
        let gate = Arc::new(GateSwitch::new());
        let ctx = ServiceContext::new(Arc::new(StakeLedger::new()), gate.clone(), clock.clone());
        let service = MatchService::sealed(&config(), ctx).unwrap();
        let (commitment, _) = sealed_hand(&service, CREATOR, Hand::Rock, 3);
        let key = service.create(CREATOR, commitment, Some(1), 100).await.unwrap().key;

        gate.set_accepting(false);
        let (other, _) = sealed_hand(&service, CREATOR, Hand::Paper, 4);
        let denied = service.create(CREATOR, other, Some(1), 100).await;
        assert!(matches!(denied, Err(MatchError::AdmissionDenied(_))));
        assert!(service.record(&MatchKey::Commitment(other)).await.is_none());

        service.join(RIVAL, key, JoinRequest::Bare, 100).await.unwrap();
    }

    #[tokio::test]
    async fn test_dead_instance_denies_creation() {
        let clock = Arc::new(ManualClock::new(0));
        let gate = Arc::new(GateSwitch::new());
        let ctx = ServiceContext::new(Arc::new(StakeLedger::new()), gate.clone(), clock.clone());
        let service = MatchService::sealed(&config(), ctx).unwrap();
        let (commitment, _) = sealed_hand(&service, CREATOR, Hand::Rock, 3);

        gate.set_alive(false);
        let denied = service.create(CREATOR, commitment, Some(1), 100).await;
        assert_eq!(
            denied.unwrap_err(),
            MatchError::AdmissionDenied("instance is not alive")
        );
        assert!(service.record(&MatchKey::Commitment(commitment)).await.is_none());
        assert_eq!(service.balance(&CREATOR).await, 0);

        gate.set_alive(true);
        assert!(service.create(CREATOR, commitment, Some(1), 100).await.is_ok());
    }

    #[test]
    fn test_constructor_rejects_sub_second_timeout() {
        let clock = Arc::new(ManualClock::new(0));
        let short = EngineConfig {
            timeout_unit: std::time::Duration::from_millis(250),
            ..config()
        };
        let result = MatchService::sealed(&short, context(&clock));
        assert!(matches!(result, Err(ConfigError::ZeroDuration("timeout_unit"))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_withdraws_pay_once() {
        let clock = Arc::new(ManualClock::new(0));
        let ctx = context(&clock);
        ctx.ledger.credit(CREATOR, 50).await.unwrap();
        let service = Arc::new(MatchService::sealed(&config(), ctx).unwrap());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.withdraw(CREATOR, 0).await })
            })
            .collect();

        let mut paid = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(amount) => paid.push(amount),
                Err(err) => assert_eq!(err, MatchError::NothingToWithdraw),
            }
        }
        assert_eq!(paid, vec![50]);
        assert_eq!(service.balance(&CREATOR).await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_under_one_key() {
        let clock = Arc::new(ManualClock::new(0));
        let service = Arc::new(MatchService::sealed(&config(), context(&clock)).unwrap());
        let (commitment, _) = sealed_hand(service.as_ref(), CREATOR, Hand::Rock, 3);
        let key = MatchKey::Commitment(commitment);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.create(CREATOR, commitment, Some(1), 100).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(receipt) => {
                    assert_eq!(receipt.key, key);
                    created += 1;
                }
                Err(err) => assert_eq!(err, MatchError::KeyConflict(key)),
            }
        }
        assert_eq!(created, 1);

        let created_events = service
            .history_of(&key)
            .await
            .into_iter()
            .filter(|e| matches!(e.kind, MatchEventKind::Created { .. }))
            .count();
        assert_eq!(created_events, 1);
    }

    #[tokio::test]
    async fn test_shared_ledger_across_profiles() {
        let clock = Arc::new(ManualClock::new(0));
        let ctx = context(&clock);
        let sealed = MatchService::sealed(&config(), ctx.clone()).unwrap();
        let market = MatchService::open_market(&config(), ctx).unwrap();

        let (commitment, _) = sealed_hand(&market, CREATOR, Hand::Rock, 1);
        market.create(CREATOR, commitment, None, 11).await.unwrap();

        assert_eq!(sealed.balance(&CREATOR).await, 1);
        assert_eq!(sealed.withdraw(CREATOR, 0).await.unwrap(), 1);
        assert_eq!(market.balance(&CREATOR).await, 0);
    }

    #[tokio::test]
    async fn test_history_and_subscription() {
        let clock = Arc::new(ManualClock::new(0));
        let service = MatchService::sealed(&config(), context(&clock)).unwrap();
        let mut rx = service.subscribe();
        let (commitment, _) = sealed_hand(&service, CREATOR, Hand::Rock, 3);

        let key = service.create(CREATOR, commitment, Some(1), 100).await.unwrap().key;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, Some(key));
        assert!(matches!(event.kind, MatchEventKind::Created { stake: 100, .. }));

        service.join(RIVAL, key, JoinRequest::Bare, 100).await.unwrap();
        let history = service.history_of(&key).await;
        assert_eq!(history.len(), 2);
        assert_eq!(service.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unsupported_operation() {
        let clock = Arc::new(ManualClock::new(0));
        let service = MatchService::symmetric(&config(), context(&clock)).unwrap();
        let (commitment, reveal) = sealed_hand(&service, CREATOR, Hand::Rock, 3);
        let key = service.create(CREATOR, commitment, None, 10).await.unwrap().key;

        let result = service.reveal(CREATOR, key, reveal, 0).await;
        assert!(matches!(result, Err(MatchError::Unsupported { profile: Profile::Symmetric, .. })));
    }
}
