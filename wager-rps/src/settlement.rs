//! Winner determination and payout arithmetic.
//!
//! Everything here is pure: it reads a finished [`Session`] and says who gets
//! what. Deleting the record and moving funds is the registry's job.

use crate::choice::Choice;
use crate::error::{GameError, Result};
use crate::session::{Session, Side};
use serde::{Deserialize, Serialize};
use wager_core::{AccountId, Amount};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Equal valid choices, or both choices invalid. Everyone gets their stake back.
    Draw,
    /// `loser_choice` is `None` when the loser revealed a code outside 1..=3.
    Decided {
        winner: Side,
        loser_choice: Option<Choice>,
    },
    /// The counterparty never revealed and the claimant took the whole escrow.
    Forfeited { winner: Side },
}

impl Outcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Draw => None,
            Outcome::Decided { winner, .. } | Outcome::Forfeited { winner } => Some(*winner),
        }
    }
}

/// Decide a game from the two revealed codes (initiator first).
///
/// Codes outside 1..=3 are invalid. A valid choice beats an invalid one;
/// two invalid choices draw.
pub fn determine_winner(initiator_code: u8, opponent_code: u8) -> Outcome {
    match (
        Choice::from_code(initiator_code),
        Choice::from_code(opponent_code),
    ) {
        (Some(a), Some(b)) if a == b => Outcome::Draw,
        (Some(a), Some(b)) if a.beats(b) => Outcome::Decided {
            winner: Side::Initiator,
            loser_choice: Some(b),
        },
        (Some(a), Some(_)) => Outcome::Decided {
            winner: Side::Opponent,
            loser_choice: Some(a),
        },
        (Some(_), None) => Outcome::Decided {
            winner: Side::Initiator,
            loser_choice: None,
        },
        (None, Some(_)) => Outcome::Decided {
            winner: Side::Opponent,
            loser_choice: None,
        },
        (None, None) => Outcome::Draw,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub side: Side,
    pub recipient: AccountId,
    pub amount: Amount,
}

/// The decided distribution of a session's escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub outcome: Outcome,
    /// Value moved from the loser's stake to the winner's.
    pub prize: Amount,
    pub initiator_payout: Payout,
    pub opponent_payout: Payout,
}

impl Settlement {
    /// Settle a session in which both sides revealed.
    pub fn from_reveals(session: &Session) -> Result<Self> {
        let (Some(initiator_code), Some(opponent_code)) = (
            session.initiator.revealed_choice,
            session.opponent.revealed_choice,
        ) else {
            return Err(GameError::internal(
                "settlement requires both sides to have revealed",
            ));
        };

        let outcome = determine_winner(initiator_code, opponent_code);
        let mut initiator_amount = session.initiator.stake;
        let mut opponent_amount = session.opponent.stake;

        let prize = match outcome {
            Outcome::Decided {
                winner,
                loser_choice,
            } => {
                let loser_stake = session.slot(winner.other()).stake;
                let prize = match loser_choice {
                    Some(choice) => session
                        .base_stake_unit
                        .checked_mul(session.weights.of(choice))
                        .ok_or_else(|| GameError::internal("prize overflow"))?,
                    // An invalid reveal forfeits the whole stake.
                    None => loser_stake,
                };

                let (winner_amount, loser_amount) = match winner {
                    Side::Initiator => (&mut initiator_amount, &mut opponent_amount),
                    Side::Opponent => (&mut opponent_amount, &mut initiator_amount),
                };
                *winner_amount = winner_amount
                    .checked_add(prize)
                    .ok_or_else(|| GameError::internal("winner payout overflow"))?;
                *loser_amount = loser_amount.checked_sub(prize).ok_or_else(|| {
                    GameError::internal(format!(
                        "prize {} sats exceeds loser stake {} sats",
                        prize.to_sat(),
                        loser_stake.to_sat()
                    ))
                })?;
                prize
            }
            Outcome::Draw => Amount::ZERO,
            Outcome::Forfeited { .. } => {
                return Err(GameError::internal("reveals never produce a forfeit"));
            }
        };

        Ok(Self {
            outcome,
            prize,
            initiator_payout: Payout {
                side: Side::Initiator,
                recipient: session.initiator.account,
                amount: initiator_amount,
            },
            opponent_payout: Payout {
                side: Side::Opponent,
                recipient: session.opponent.account,
                amount: opponent_amount,
            },
        })
    }

    /// Hand the whole escrow to `claimant`.
    pub fn forfeit(session: &Session, claimant: Side) -> Result<Self> {
        let total = session
            .total_escrow()
            .ok_or_else(|| GameError::internal("escrow total overflow"))?;
        let (initiator_amount, opponent_amount) = match claimant {
            Side::Initiator => (total, Amount::ZERO),
            Side::Opponent => (Amount::ZERO, total),
        };

        Ok(Self {
            outcome: Outcome::Forfeited { winner: claimant },
            prize: session.slot(claimant.other()).stake,
            initiator_payout: Payout {
                side: Side::Initiator,
                recipient: session.initiator.account,
                amount: initiator_amount,
            },
            opponent_payout: Payout {
                side: Side::Opponent,
                recipient: session.opponent.account,
                amount: opponent_amount,
            },
        })
    }

    pub fn payouts(&self) -> [&Payout; 2] {
        [&self.initiator_payout, &self.opponent_payout]
    }

    pub fn payout_for(&self, side: Side) -> &Payout {
        match side {
            Side::Initiator => &self.initiator_payout,
            Side::Opponent => &self.opponent_payout,
        }
    }

    /// `(winner_payout, loser_payout)`. On a draw these are the initiator's
    /// and opponent's refunds.
    pub fn announced_payouts(&self) -> (Amount, Amount) {
        match self.outcome.winner() {
            Some(winner) => (
                self.payout_for(winner).amount,
                self.payout_for(winner.other()).amount,
            ),
            None => (self.initiator_payout.amount, self.opponent_payout.amount),
        }
    }

    pub fn total(&self) -> Option<Amount> {
        self.initiator_payout
            .amount
            .checked_add(self.opponent_payout.amount)
    }
}
