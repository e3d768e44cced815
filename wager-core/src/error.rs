use crate::types::AccountId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Transfer to {recipient} failed: {reason}")]
    TransferRejected { recipient: AccountId, reason: String },

    #[error("Amount overflow: {0}")]
    Overflow(String),
}

impl LedgerError {
    pub fn rejected(recipient: AccountId, reason: impl Into<String>) -> Self {
        Self::TransferRejected {
            recipient,
            reason: reason.into(),
        }
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }
}
