//! Two accounts play one weighted game against a SQLite-backed registry.
//!
//! Run with `RUST_LOG=debug` for the full trace.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wager_core::{AccountId, Amount, InMemoryLedger, SystemClock};
use wager_rps::{
    commit_choice, generate_secret, Choice, GameEvent, RegistryConfig, RevealOutcome,
    SessionRegistry, Side,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wager_rps=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = tempfile::tempdir()?;
    let ledger = Arc::new(InMemoryLedger::new());
    let registry = SessionRegistry::open(
        &data_dir.path().join("sessions.db"),
        ledger.clone(),
        Arc::new(SystemClock),
        RegistryConfig::default(),
    )
    .await
    .context("opening session registry")?;
    let mut events = registry.subscribe();

    let alice = AccountId::new_random();
    let bob = AccountId::new_random();
    let weights = [1, 2, 3];
    let base = Amount::from_sat(1_000);
    let stake = Amount::from_sat(3_000);

    let alice_secret = generate_secret();
    let bob_secret = generate_secret();

    registry
        .create_session(
            &alice,
            &bob,
            weights,
            base,
            commit_choice(Choice::Scissors, &alice_secret),
            stake,
        )
        .await?;
    registry
        .join_session(
            &bob,
            &alice,
            commit_choice(Choice::Paper, &bob_secret),
            weights,
            stake,
        )
        .await?;

    registry
        .reveal(&alice, Side::Initiator, &bob, Choice::Scissors.code(), alice_secret)
        .await?;
    let outcome = registry
        .reveal(&bob, Side::Opponent, &alice, Choice::Paper.code(), bob_secret)
        .await?;

    if let RevealOutcome::Settled(settlement) = outcome {
        println!(
            "{:?}: prize {} sats",
            settlement.outcome,
            settlement.prize.to_sat()
        );
    }
    println!("alice holds {} sats", ledger.balance(&alice).to_sat());
    println!("bob holds {} sats", ledger.balance(&bob).to_sat());

    while let Ok(event) = events.try_recv() {
        match event {
            GameEvent::TermsAnnounced { weights, .. } => {
                println!("terms: weights {:?}", weights.as_array())
            }
            GameEvent::WinnerAnnounced {
                winner,
                winner_payout,
                loser_payout,
                ..
            } => println!(
                "winner {:?}: {} / {} sats",
                winner,
                winner_payout.to_sat(),
                loser_payout.to_sat()
            ),
        }
    }

    Ok(())
}
