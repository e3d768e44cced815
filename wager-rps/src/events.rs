use crate::session::Side;
use crate::weights::Weights;
use serde::{Deserialize, Serialize};
use wager_core::{AccountId, Amount};

/// Observable notifications published by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TermsAnnounced {
        initiator: AccountId,
        opponent: AccountId,
        weights: Weights,
        base_stake_unit: Amount,
    },
    /// `winner` is `None` for a draw, in which case the two payouts are the
    /// initiator's and opponent's refunds respectively.
    WinnerAnnounced {
        initiator: AccountId,
        opponent: AccountId,
        winner: Option<Side>,
        winner_payout: Amount,
        loser_payout: Amount,
    },
}
