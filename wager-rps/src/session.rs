use crate::commitment::Commitment;
use crate::weights::{Terms, Weights};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use wager_core::{AccountId, Amount};

/// Domain separator for session keys.
const SESSION_KEY_DOMAIN: &[u8] = b"WAGER_RPS_SESSION_V1";

/// Which seat a player occupies in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Initiator,
    Opponent,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Initiator => Side::Opponent,
            Side::Opponent => Side::Initiator,
        }
    }

    /// Order `(caller, counterparty)` into `(initiator, opponent)` for this side.
    pub fn arrange(self, caller: AccountId, counterparty: AccountId) -> (AccountId, AccountId) {
        match self {
            Side::Initiator => (caller, counterparty),
            Side::Opponent => (counterparty, caller),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Initiator => f.write_str("initiator"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

/// Storage key for a session, derived from the ordered pair (initiator, opponent).
///
/// Not symmetric: `derive(a, b) != derive(b, a)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey([u8; 32]);

impl SessionKey {
    pub fn derive(initiator: &AccountId, opponent: &AccountId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SESSION_KEY_DOMAIN);
        hasher.update(initiator.as_bytes());
        hasher.update(opponent.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey({})", self)
    }
}

/// One player's seat: who they are, what they locked and what they revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub account: AccountId,
    pub commitment: Option<Commitment>,
    pub stake: Amount,
    /// Raw revealed code. `Some` once revealed, even if the code is not a valid choice.
    pub revealed_choice: Option<u8>,
}

impl PlayerSlot {
    pub fn empty(account: AccountId) -> Self {
        Self {
            account,
            commitment: None,
            stake: Amount::ZERO,
            revealed_choice: None,
        }
    }

    pub fn has_revealed(&self) -> bool {
        self.revealed_choice.is_some()
    }
}

/// The escrow record for one game between an ordered pair of accounts.
///
/// A record exists in the store exactly while the session is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub initiator: PlayerSlot,
    pub opponent: PlayerSlot,
    pub weights: Weights,
    pub base_stake_unit: Amount,
    pub created_at: DateTime<Utc>,
    /// Set once when the opponent joins. While `None` the initiator may cancel.
    pub locked_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        initiator: AccountId,
        opponent: AccountId,
        terms: Terms,
        commitment: Commitment,
        stake: Amount,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            initiator: PlayerSlot {
                account: initiator,
                commitment: Some(commitment),
                stake,
                revealed_choice: None,
            },
            opponent: PlayerSlot::empty(opponent),
            weights: terms.weights,
            base_stake_unit: terms.base_stake_unit,
            created_at,
            locked_at: None,
        }
    }

    pub fn key(&self) -> SessionKey {
        SessionKey::derive(&self.initiator.account, &self.opponent.account)
    }

    pub fn terms(&self) -> Terms {
        Terms {
            weights: self.weights,
            base_stake_unit: self.base_stake_unit,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked_at.is_some()
    }

    pub fn slot(&self, side: Side) -> &PlayerSlot {
        match side {
            Side::Initiator => &self.initiator,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut PlayerSlot {
        match side {
            Side::Initiator => &mut self.initiator,
            Side::Opponent => &mut self.opponent,
        }
    }

    pub fn both_revealed(&self) -> bool {
        self.initiator.has_revealed() && self.opponent.has_revealed()
    }

    /// Combined escrow held for this session.
    pub fn total_escrow(&self) -> Option<Amount> {
        self.initiator.stake.checked_add(self.opponent.stake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_is_ordered() {
        let alice = AccountId::new_random();
        let bob = AccountId::new_random();

        assert_eq!(SessionKey::derive(&alice, &bob), SessionKey::derive(&alice, &bob));
        assert_ne!(SessionKey::derive(&alice, &bob), SessionKey::derive(&bob, &alice));
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Initiator.other(), Side::Opponent);
        assert_eq!(Side::Opponent.other(), Side::Initiator);
    }

    #[test]
    fn test_arrange() {
        let alice = AccountId::new_random();
        let bob = AccountId::new_random();
        assert_eq!(Side::Initiator.arrange(alice, bob), (alice, bob));
        assert_eq!(Side::Opponent.arrange(bob, alice), (alice, bob));
    }
}
