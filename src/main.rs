//! Hand Escrow Server
//!
//! Runs a scripted demonstration of the escrow engines against a manual
//! clock started at wall time.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hand_escrow::{
    core::{Clock, ManualClock, SystemClock},
    game::{JoinRequest, MatchEngine, Reveal},
    service::{EngineConfig, MatchService, OpenGate, ServiceContext, StakeLedger},
    Hand, PlayerId, Secret, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::from_env().context("loading engine configuration")?;

    info!("Hand Escrow Server v{}", VERSION);
    info!("Instance: {}", config.instance_id);
    info!(
        "Timeouts: symmetric {}s, unit {}s, open market {}s",
        config.symmetric_timeout.as_secs(),
        config.timeout_unit.as_secs(),
        config.open_market_timeout.as_secs()
    );

    let clock = Arc::new(ManualClock::new(SystemClock.now()));
    let context = ServiceContext::new(
        Arc::new(StakeLedger::new()),
        Arc::new(OpenGate),
        clock.clone(),
    );

    let sealed = MatchService::sealed(&config, context.clone())?;
    let market = MatchService::open_market(&config, context)?;

    let creator = PlayerId::random();
    let rival = PlayerId::random();
    info!("Creator: {}  Rival: {}", creator, rival);

    demo_sealed(&sealed, &clock, creator, rival).await?;
    demo_punish(&market, &clock, &config, creator, rival).await?;

    info!("=== Balances ===");
    for (name, player) in [("creator", creator), ("rival", rival)] {
        let amount = sealed.withdraw(player, 0).await?;
        info!("{} withdrew {}", name, amount);
    }

    dump_history("sealed", &sealed).await?;
    dump_history("open-market", &market).await?;
    Ok(())
}

/// Sealed match: creator plays PAPER, rival shows ROCK.
async fn demo_sealed(
    service: &MatchService<hand_escrow::game::SealedEngine>,
    clock: &ManualClock,
    creator: PlayerId,
    rival: PlayerId,
) -> anyhow::Result<()> {
    info!("=== Sealed Match ===");

    let secret = Secret::random();
    let commitment = service.commit(&creator, Hand::Paper, &secret)?;
    info!("Commitment: {}", commitment.to_hex());

    let key = service.create(creator, commitment, Some(1), 100).await?.key;
    clock.advance(30);
    service.join(rival, key, JoinRequest::Bare, 100).await?;
    clock.advance(30);
    service.show(rival, key, Hand::Rock, 0).await?;
    clock.advance(30);
    let receipt = service
        .settle(creator, key, Some(Reveal::new(Hand::Paper, secret)), 0)
        .await?;

    info!("Settled {}: {}", key, serde_json::to_string(&receipt)?);
    Ok(())
}

/// Open-market match where only the creator reveals before the deadline.
async fn demo_punish(
    service: &MatchService<hand_escrow::game::OpenMarketEngine>,
    clock: &ManualClock,
    config: &EngineConfig,
    creator: PlayerId,
    rival: PlayerId,
) -> anyhow::Result<()> {
    info!("=== Open Market Punish ===");

    let creator_secret = Secret::random();
    let creator_commit = service.commit(&creator, Hand::Scissors, &creator_secret)?;
    let rival_commit = service.commit(&rival, Hand::Rock, &Secret::random())?;

    let key = service.create(creator, creator_commit, None, 100).await?.key;
    service.join(rival, key, JoinRequest::Sealed(rival_commit), 100).await?;
    service
        .reveal(creator, key, Reveal::new(Hand::Scissors, creator_secret), 0)
        .await?;

    clock.advance(config.open_market_timeout.as_secs());
    let receipt = service.punish(PlayerId::random(), key, 0).await?;
    info!("Punished {}: {}", key, serde_json::to_string(&receipt)?);
    Ok(())
}

async fn dump_history<E: MatchEngine>(
    label: &str,
    service: &MatchService<E>,
) -> anyhow::Result<()> {
    info!("=== {} history ===", label);
    for event in service.history().await {
        info!("{}", event.to_json()?);
    }
    Ok(())
}
