use super::SessionRegistry;
use crate::error::{GameError, Result};
use crate::session::{SessionKey, Side};
use crate::settlement::Settlement;
use crate::storage::SessionStore;
use wager_core::AccountId;

impl<S: SessionStore> SessionRegistry<S> {
    /// Take the whole escrow from a counterparty who has not revealed within
    /// the forfeit window. The claimant must have revealed already.
    pub async fn claim_forfeit(
        &self,
        caller: &AccountId,
        side: Side,
        counterparty: &AccountId,
    ) -> Result<Settlement> {
        let (initiator, opponent) = side.arrange(*caller, *counterparty);
        let key = SessionKey::derive(&initiator, &opponent);

        let (session, settlement) = {
            let mut store = self.store.lock().await;
            let session = store
                .load(&key)?
                .ok_or_else(|| GameError::not_found(&initiator, &opponent))?;

            let locked_at = session.locked_at.ok_or(GameError::NotLocked)?;
            let unlocks_at = locked_at
                .checked_add_signed(self.forfeit_window)
                .ok_or_else(|| GameError::internal("forfeit deadline overflows"))?;
            if self.clock.now() <= unlocks_at {
                return Err(GameError::ForfeitWindowNotElapsed { unlocks_at });
            }

            if !session.slot(side).has_revealed() {
                return Err(GameError::forfeit_denied(format!(
                    "{} has not revealed",
                    side
                )));
            }
            if session.slot(side.other()).has_revealed() {
                return Err(GameError::forfeit_denied(format!(
                    "{} has already revealed",
                    side.other()
                )));
            }

            let settlement = Settlement::forfeit(&session, side)?;
            store.delete(&key)?;
            (session, settlement)
        };

        tracing::warn!(
            "Session {} forfeited by silent {}, {} claims {} sats",
            key,
            side.other(),
            caller,
            settlement.payout_for(side).amount.to_sat()
        );
        self.complete(&session, &settlement).await?;
        Ok(settlement)
    }
}
