pub mod memory;
pub mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use crate::error::Result;
use crate::session::{Session, SessionKey};
use wager_core::{AccountId, Amount};

/// Keyed store of active sessions plus the unpaid-credit book.
///
/// Callers serialize access; implementations need no internal locking.
pub trait SessionStore: Send {
    fn load(&self, key: &SessionKey) -> Result<Option<Session>>;

    /// Insert or overwrite the record at `session.key()`.
    fn save(&mut self, session: &Session) -> Result<()>;

    /// Remove a record, returning whether one existed.
    fn delete(&mut self, key: &SessionKey) -> Result<bool>;

    fn session_count(&self) -> Result<usize>;

    /// Add to an account's unpaid balance and return the new total.
    fn credit_unpaid(&mut self, account: &AccountId, amount: Amount) -> Result<Amount>;

    /// Zero an account's unpaid balance and return what it held.
    fn take_unpaid(&mut self, account: &AccountId) -> Result<Amount>;

    fn unpaid_balance(&self, account: &AccountId) -> Result<Amount>;
}
