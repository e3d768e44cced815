use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ONE_WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// How long after locking a revealed player must wait before claiming
    /// the escrow of a silent counterparty.
    pub forfeit_window: Duration,
    /// Buffered events per subscriber before slow receivers start lagging.
    pub event_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            forfeit_window: ONE_WEEK,
            event_capacity: 64,
        }
    }
}

impl RegistryConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.forfeit_window.is_zero() {
            return Err(GameError::config("Forfeit window must be greater than 0"));
        }

        if chrono::Duration::from_std(self.forfeit_window).is_err() {
            return Err(GameError::config("Forfeit window is out of range"));
        }

        if self.event_capacity == 0 {
            return Err(GameError::config("Event capacity must be greater than 0"));
        }

        Ok(())
    }

    pub(crate) fn forfeit_delta(&self) -> Result<chrono::Duration> {
        chrono::Duration::from_std(self.forfeit_window)
            .map_err(|_| GameError::config("Forfeit window is out of range"))
    }
}
