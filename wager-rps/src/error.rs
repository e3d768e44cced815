use crate::session::Side;
use chrono::{DateTime, Utc};
use thiserror::Error;
use wager_core::{AccountId, Amount};

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Session already active for {initiator} -> {opponent}")]
    SessionAlreadyActive {
        initiator: AccountId,
        opponent: AccountId,
    },

    #[error("No active session for {initiator} -> {opponent}")]
    SessionNotFound {
        initiator: AccountId,
        opponent: AccountId,
    },

    #[error("Session is already locked")]
    AlreadyLocked,

    #[error("Session is not locked yet")]
    NotLocked,

    #[error("Insufficient escrow: need {need} sats, have {available} sats")]
    InsufficientEscrow { need: u64, available: u64 },

    #[error("Weights do not match the session terms")]
    WeightsMismatch,

    #[error("{0} has already revealed")]
    AlreadyRevealed(Side),

    #[error("Revealed choice does not match commitment")]
    CommitmentMismatch,

    #[error("Forfeit window has not elapsed, opens after {unlocks_at}")]
    ForfeitWindowNotElapsed { unlocks_at: DateTime<Utc> },

    #[error("Forfeit not allowed: {0}")]
    ForfeitPreconditionFailed(String),

    /// Value that left a deleted record but reached neither the ledger nor
    /// the unpaid book. Every listed amount was logged at error level.
    #[error("{} payout(s) neither delivered nor credited: {:?}", .0.len(), .0)]
    UndeliveredPayouts(Vec<(AccountId, Amount)>),

    #[error("Ledger error: {0}")]
    Ledger(#[from] wager_core::LedgerError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameError {
    pub fn invalid_weights(msg: impl Into<String>) -> Self {
        Self::InvalidWeights(msg.into())
    }

    pub fn not_found(initiator: &AccountId, opponent: &AccountId) -> Self {
        Self::SessionNotFound {
            initiator: *initiator,
            opponent: *opponent,
        }
    }

    pub fn forfeit_denied(msg: impl Into<String>) -> Self {
        Self::ForfeitPreconditionFailed(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
