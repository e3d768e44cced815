use super::SessionRegistry;
use crate::commitment::Commitment;
use crate::error::{GameError, Result};
use crate::events::GameEvent;
use crate::session::{Session, SessionKey};
use crate::storage::SessionStore;
use crate::weights::{Terms, Weights};
use chrono::{DateTime, Utc};
use wager_core::{AccountId, Amount};

impl<S: SessionStore> SessionRegistry<S> {
    /// Open a session against `opponent`, escrowing `escrow` as the initiator's stake.
    pub async fn create_session(
        &self,
        caller: &AccountId,
        opponent: &AccountId,
        weights: [u64; 3],
        base_stake_unit: Amount,
        commitment: Commitment,
        escrow: Amount,
    ) -> Result<SessionKey> {
        let weights = Weights::new(weights)?;
        let key = SessionKey::derive(caller, opponent);

        {
            let mut store = self.store.lock().await;
            if store.load(&key)?.is_some() {
                return Err(GameError::SessionAlreadyActive {
                    initiator: *caller,
                    opponent: *opponent,
                });
            }

            let need = weights.min_escrow(base_stake_unit)?;
            if escrow < need {
                return Err(GameError::InsufficientEscrow {
                    need: need.to_sat(),
                    available: escrow.to_sat(),
                });
            }

            let terms = Terms {
                weights,
                base_stake_unit,
            };
            let session = Session::new(
                *caller,
                *opponent,
                terms,
                commitment,
                escrow,
                self.clock.now(),
            );
            store.save(&session)?;
        }

        tracing::info!(
            "Session {} created by {} against {} with {} sats escrowed",
            key,
            caller,
            opponent,
            escrow.to_sat()
        );

        self.announce(GameEvent::TermsAnnounced {
            initiator: *caller,
            opponent: *opponent,
            weights,
            base_stake_unit,
        });
        Ok(key)
    }

    /// Withdraw an unjoined session and refund the initiator.
    pub async fn cancel_session(&self, caller: &AccountId, opponent: &AccountId) -> Result<Amount> {
        let key = SessionKey::derive(caller, opponent);

        let refund = {
            let mut store = self.store.lock().await;
            let session = store
                .load(&key)?
                .ok_or_else(|| GameError::not_found(caller, opponent))?;

            if session.is_locked() {
                return Err(GameError::AlreadyLocked);
            }

            store.delete(&key)?;
            session.initiator.stake
        };

        tracing::info!("Session {} cancelled by {}", key, caller);
        self.pay_all(&[(*caller, refund)]).await?;
        Ok(refund)
    }

    /// Take the opponent seat, escrow the stake and lock the session.
    ///
    /// Returns the lock time, from which the forfeit window is measured.
    pub async fn join_session(
        &self,
        caller: &AccountId,
        initiator: &AccountId,
        commitment: Commitment,
        weights: [u64; 3],
        escrow: Amount,
    ) -> Result<DateTime<Utc>> {
        let key = SessionKey::derive(initiator, caller);

        let mut store = self.store.lock().await;
        let mut session = store
            .load(&key)?
            .ok_or_else(|| GameError::not_found(initiator, caller))?;

        if session.is_locked() {
            return Err(GameError::AlreadyLocked);
        }

        if session.weights.as_array() != weights {
            return Err(GameError::WeightsMismatch);
        }

        let need = session.weights.min_escrow(session.base_stake_unit)?;
        if escrow < need {
            return Err(GameError::InsufficientEscrow {
                need: need.to_sat(),
                available: escrow.to_sat(),
            });
        }

        let locked_at = self.clock.now();
        session.opponent.commitment = Some(commitment);
        session.opponent.stake = escrow;
        session.locked_at = Some(locked_at);
        store.save(&session)?;

        tracing::info!(
            "Session {} joined by {} with {} sats, locked at {}",
            key,
            caller,
            escrow.to_sat(),
            locked_at
        );
        Ok(locked_at)
    }
}
