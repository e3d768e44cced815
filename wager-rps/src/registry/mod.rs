//! The session registry: every entry point of the game.
//!
//! Each call takes the store lock, validates and mutates the record, and,
//! for terminal paths, deletes it. The lock is released before any ledger
//! transfer is awaited, so a recipient that calls back in finds no record.

mod forfeit;
mod lifecycle;
mod reveal;


pub use reveal::RevealOutcome;

use crate::config::RegistryConfig;
use crate::error::{GameError, Result};
use crate::events::GameEvent;
use crate::session::{Session, SessionKey};
use crate::settlement::Settlement;
use crate::storage::{MemorySessionStore, SessionStore, SqliteSessionStore};
use crate::weights::Terms;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use wager_core::{AccountId, Amount, Clock, Ledger};

pub struct SessionRegistry<S: SessionStore = MemorySessionStore> {
    store: Mutex<S>,
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
    forfeit_window: chrono::Duration,
    events: broadcast::Sender<GameEvent>,
}

impl<S: SessionStore> SessionRegistry<S> {
    pub fn new(
        store: S,
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> Result<Self> {
        config.validate()?;
        let forfeit_window = config.forfeit_delta()?;
        let (events, _) = broadcast::channel(config.event_capacity);

        Ok(Self {
            store: Mutex::new(store),
            ledger,
            clock,
            config,
            forfeit_window,
            events,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Receive every [`GameEvent`] published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the active session between `initiator` and `opponent`, if any.
    pub async fn session(&self, initiator: &AccountId, opponent: &AccountId) -> Result<Option<Session>> {
        let store = self.store.lock().await;
        store.load(&SessionKey::derive(initiator, opponent))
    }

    pub async fn active_sessions(&self) -> Result<usize> {
        self.store.lock().await.session_count()
    }

    /// Re-announce the terms of an active session.
    pub async fn current_terms(&self, initiator: &AccountId, opponent: &AccountId) -> Result<Terms> {
        let terms = {
            let store = self.store.lock().await;
            store
                .load(&SessionKey::derive(initiator, opponent))?
                .ok_or_else(|| GameError::not_found(initiator, opponent))?
                .terms()
        };

        self.announce(GameEvent::TermsAnnounced {
            initiator: *initiator,
            opponent: *opponent,
            weights: terms.weights,
            base_stake_unit: terms.base_stake_unit,
        });
        Ok(terms)
    }

    /// Value owed to `account` from payouts the ledger refused.
    pub async fn unpaid_balance(&self, account: &AccountId) -> Result<Amount> {
        self.store.lock().await.unpaid_balance(account)
    }

    /// Retry delivery of everything owed to `caller`.
    pub async fn claim_unpaid(&self, caller: &AccountId) -> Result<Amount> {
        let amount = self.store.lock().await.take_unpaid(caller)?;
        if amount == Amount::ZERO {
            return Ok(Amount::ZERO);
        }

        if let Err(e) = self.ledger.transfer(caller, amount).await {
            tracing::warn!(
                "Unpaid balance of {} sats for {} still undeliverable: {}",
                amount.to_sat(),
                caller,
                e
            );
            if let Err(credit_err) = self.store.lock().await.credit_unpaid(caller, amount) {
                tracing::error!(
                    "Unpaid balance of {} sats for {} could not be restored: {}",
                    amount.to_sat(),
                    caller,
                    credit_err
                );
                return Err(GameError::UndeliveredPayouts(vec![(*caller, amount)]));
            }
            return Err(e.into());
        }

        tracing::info!("Delivered {} unpaid sats to {}", amount.to_sat(), caller);
        Ok(amount)
    }

    /// Send `amount` to `recipient`. Must only be called with the store unlocked
    /// and after the record that owned the funds is gone.
    ///
    /// A refused transfer is credited to the recipient's unpaid balance. Errors
    /// only when that credit fails too.
    async fn pay_out(&self, recipient: &AccountId, amount: Amount) -> Result<()> {
        if amount == Amount::ZERO {
            return Ok(());
        }

        let err = match self.ledger.transfer(recipient, amount).await {
            Ok(()) => {
                tracing::info!("Paid {} sats to {}", amount.to_sat(), recipient);
                return Ok(());
            }
            Err(e) => e,
        };

        tracing::warn!(
            "Payout of {} sats to {} failed, crediting unpaid balance: {}",
            amount.to_sat(),
            recipient,
            err
        );
        if let Err(credit_err) = self.store.lock().await.credit_unpaid(recipient, amount) {
            tracing::error!(
                "{} sats owed to {} were neither paid nor credited: {}",
                amount.to_sat(),
                recipient,
                credit_err
            );
            return Err(credit_err);
        }
        Ok(())
    }

    /// Attempt every payout, whatever happens to the others.
    async fn pay_all(&self, payouts: &[(AccountId, Amount)]) -> Result<()> {
        let mut undelivered = Vec::new();
        for (recipient, amount) in payouts {
            if self.pay_out(recipient, *amount).await.is_err() {
                undelivered.push((*recipient, *amount));
            }
        }

        if undelivered.is_empty() {
            Ok(())
        } else {
            Err(GameError::UndeliveredPayouts(undelivered))
        }
    }

    /// Pay out a settlement whose record has already been deleted, then announce it.
    async fn complete(&self, session: &Session, settlement: &Settlement) -> Result<()> {
        let payouts = settlement.payouts().map(|p| (p.recipient, p.amount));
        let paid = self.pay_all(&payouts).await;

        let (winner_payout, loser_payout) = settlement.announced_payouts();
        self.announce(GameEvent::WinnerAnnounced {
            initiator: session.initiator.account,
            opponent: session.opponent.account,
            winner: settlement.outcome.winner(),
            winner_payout,
            loser_payout,
        });
        paid
    }

    fn announce(&self, event: GameEvent) {
        tracing::debug!("Publishing {:?}", event);
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl SessionRegistry<MemorySessionStore> {
    pub fn in_memory(
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> Result<Self> {
        Self::new(MemorySessionStore::new(), ledger, clock, config)
    }
}

impl SessionRegistry<SqliteSessionStore> {
    /// Registry whose sessions persist in a SQLite database at `db_path`.
    pub async fn open(
        db_path: &Path,
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> Result<Self> {
        let store = SqliteSessionStore::open(db_path).await?;
        Self::new(store, ledger, clock, config)
    }
}
