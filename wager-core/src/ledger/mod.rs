pub mod memory;

pub use memory::InMemoryLedger;

use crate::error::Result;
use crate::types::AccountId;
use async_trait::async_trait;
use bitcoin::Amount;

/// Moves custodied value out to an account.
///
/// A transfer may hand control to code owned by the recipient, so callers must
/// finish all of their own state changes before awaiting it.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn transfer(&self, recipient: &AccountId, amount: Amount) -> Result<()>;
}
