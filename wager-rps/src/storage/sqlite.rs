use crate::error::{GameError, Result};
use crate::session::{Session, SessionKey};
use crate::storage::SessionStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use wager_core::{AccountId, Amount};

/// Session store persisted to SQLite. Records are kept as JSON.
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    pub async fn open(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_schema()?;

        tracing::info!("Opened session store at {}", db_path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                session_key TEXT PRIMARY KEY,
                initiator TEXT NOT NULL,
                opponent TEXT NOT NULL,
                record TEXT NOT NULL,
                locked_at INTEGER,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS unpaid_credits (
                account TEXT PRIMARY KEY,
                amount INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

fn to_column(amount: Amount) -> Result<i64> {
    i64::try_from(amount.to_sat()).map_err(|_| {
        GameError::internal(format!("{} sats does not fit in storage", amount.to_sat()))
    })
}

fn from_column(value: i64) -> Result<Amount> {
    u64::try_from(value)
        .map(Amount::from_sat)
        .map_err(|_| GameError::internal(format!("negative stored amount {}", value)))
}

impl SessionStore for SqliteSessionStore {
    fn load(&self, key: &SessionKey) -> Result<Option<Session>> {
        let record: Option<String> = self
            .conn
            .query_row(
                "SELECT record FROM sessions WHERE session_key = ?1",
                params![key.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match record {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, session: &Session) -> Result<()> {
        let record = serde_json::to_string(session)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO sessions
             (session_key, initiator, opponent, record, locked_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.key().to_string(),
                session.initiator.account.to_string(),
                session.opponent.account.to_string(),
                record,
                session.locked_at.map(|t| t.timestamp()),
                session.created_at.timestamp(),
            ],
        )?;

        Ok(())
    }

    fn delete(&mut self, key: &SessionKey) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM sessions WHERE session_key = ?1",
            params![key.to_string()],
        )?;
        Ok(removed > 0)
    }

    fn session_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| GameError::internal("negative session count"))
    }

    fn credit_unpaid(&mut self, account: &AccountId, amount: Amount) -> Result<Amount> {
        let current = self.unpaid_balance(account)?;
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| GameError::internal(format!("unpaid balance of {} overflows", account)))?;

        self.conn.execute(
            "INSERT OR REPLACE INTO unpaid_credits (account, amount) VALUES (?1, ?2)",
            params![account.to_string(), to_column(updated)?],
        )?;

        Ok(updated)
    }

    fn take_unpaid(&mut self, account: &AccountId) -> Result<Amount> {
        let balance = self.unpaid_balance(account)?;
        self.conn.execute(
            "DELETE FROM unpaid_credits WHERE account = ?1",
            params![account.to_string()],
        )?;
        Ok(balance)
    }

    fn unpaid_balance(&self, account: &AccountId) -> Result<Amount> {
        let stored: Option<i64> = self
            .conn
            .query_row(
                "SELECT amount FROM unpaid_credits WHERE account = ?1",
                params![account.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(value) => from_column(value),
            None => Ok(Amount::ZERO),
        }
    }
}
