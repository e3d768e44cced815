use super::SessionRegistry;
use crate::commitment::{ChoiceOpening, CommitmentScheme, Sha256Commitment};
use crate::error::{GameError, Result};
use crate::session::{SessionKey, Side};
use crate::settlement::Settlement;
use crate::storage::SessionStore;
use wager_core::AccountId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Recorded; the counterparty has yet to reveal.
    AwaitingCounterparty,
    /// Both sides are now open, the record is gone and payouts were issued.
    Settled(Settlement),
}

impl<S: SessionStore> SessionRegistry<S> {
    /// Open this side's commitment. Settles immediately if the counterparty already revealed.
    pub async fn reveal(
        &self,
        caller: &AccountId,
        side: Side,
        counterparty: &AccountId,
        choice: u8,
        secret: Vec<u8>,
    ) -> Result<RevealOutcome> {
        let (initiator, opponent) = side.arrange(*caller, *counterparty);
        let key = SessionKey::derive(&initiator, &opponent);

        let (session, settlement) = {
            let mut store = self.store.lock().await;
            let mut session = store
                .load(&key)?
                .ok_or_else(|| GameError::not_found(&initiator, &opponent))?;

            if !session.is_locked() {
                return Err(GameError::NotLocked);
            }

            let slot = session.slot_mut(side);
            if slot.has_revealed() {
                return Err(GameError::AlreadyRevealed(side));
            }

            let commitment = slot.commitment.ok_or(GameError::CommitmentMismatch)?;
            let opening = ChoiceOpening { choice, secret };
            if !Sha256Commitment::verify(&commitment, &opening) {
                return Err(GameError::CommitmentMismatch);
            }
            slot.revealed_choice = Some(choice);

            tracing::info!("{} {} revealed in session {}", side, caller, key);

            if !session.both_revealed() {
                store.save(&session)?;
                return Ok(RevealOutcome::AwaitingCounterparty);
            }

            let settlement = Settlement::from_reveals(&session)?;
            store.delete(&key)?;
            (session, settlement)
        };

        tracing::info!(
            "Session {} settled: {:?}, prize {} sats",
            key,
            settlement.outcome,
            settlement.prize.to_sat()
        );
        self.complete(&session, &settlement).await?;
        Ok(RevealOutcome::Settled(settlement))
    }
}
