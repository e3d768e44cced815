use crate::error::{GameError, Result};
use crate::session::{Session, SessionKey};
use crate::storage::SessionStore;
use std::collections::HashMap;
use wager_core::{AccountId, Amount};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: HashMap<SessionKey, Session>,
    unpaid: HashMap<AccountId, Amount>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: &SessionKey) -> Result<Option<Session>> {
        Ok(self.sessions.get(key).cloned())
    }

    fn save(&mut self, session: &Session) -> Result<()> {
        self.sessions.insert(session.key(), session.clone());
        Ok(())
    }

    fn delete(&mut self, key: &SessionKey) -> Result<bool> {
        Ok(self.sessions.remove(key).is_some())
    }

    fn session_count(&self) -> Result<usize> {
        Ok(self.sessions.len())
    }

    fn credit_unpaid(&mut self, account: &AccountId, amount: Amount) -> Result<Amount> {
        let balance = self.unpaid.entry(*account).or_insert(Amount::ZERO);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| GameError::internal(format!("unpaid balance of {} overflows", account)))?;
        Ok(*balance)
    }

    fn take_unpaid(&mut self, account: &AccountId) -> Result<Amount> {
        Ok(self.unpaid.remove(account).unwrap_or(Amount::ZERO))
    }

    fn unpaid_balance(&self, account: &AccountId) -> Result<Amount> {
        Ok(self.unpaid.get(account).copied().unwrap_or(Amount::ZERO))
    }
}
