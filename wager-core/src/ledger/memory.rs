use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::types::{AccountId, TransferRecord};
use async_trait::async_trait;
use bitcoin::Amount;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Ledger that keeps balances in memory and records every payout.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<AccountId, Amount>>,
    history: RwLock<Vec<TransferRecord>>,
    rejecting: RwLock<HashSet<AccountId>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &AccountId) -> Amount {
        self.balances
            .read()
            .get(account)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.history.read().clone()
    }

    pub fn transfers_to(&self, account: &AccountId) -> Vec<TransferRecord> {
        self.history
            .read()
            .iter()
            .filter(|t| &t.recipient == account)
            .cloned()
            .collect()
    }

    /// Sum of every amount paid out so far.
    pub fn total_paid(&self) -> Amount {
        self.history
            .read()
            .iter()
            .fold(Amount::ZERO, |acc, t| acc + t.amount)
    }

    /// Make subsequent transfers to `account` fail, simulating a recipient that refuses funds.
    pub fn reject_transfers_to(&self, account: AccountId) {
        self.rejecting.write().insert(account);
    }

    pub fn accept_transfers_to(&self, account: &AccountId) {
        self.rejecting.write().remove(account);
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn transfer(&self, recipient: &AccountId, amount: Amount) -> Result<()> {
        if self.rejecting.read().contains(recipient) {
            return Err(LedgerError::rejected(*recipient, "recipient refuses transfers"));
        }

        {
            let mut balances = self.balances.write();
            let balance = balances.entry(*recipient).or_insert(Amount::ZERO);
            *balance = balance.checked_add(amount).ok_or_else(|| {
                LedgerError::overflow(format!("balance of {} would overflow", recipient))
            })?;
        }

        self.history.write().push(TransferRecord {
            recipient: *recipient,
            amount,
            timestamp: Utc::now(),
        });

        tracing::debug!("Ledger paid {} sats to {}", amount.to_sat(), recipient);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transfer_credits_recipient() {
        let ledger = InMemoryLedger::new();
        let alice = AccountId::new_random();

        ledger.transfer(&alice, Amount::from_sat(500)).await.unwrap();
        ledger.transfer(&alice, Amount::from_sat(250)).await.unwrap();

        assert_eq!(ledger.balance(&alice), Amount::from_sat(750));
        assert_eq!(ledger.transfers_to(&alice).len(), 2);
        assert_eq!(ledger.total_paid(), Amount::from_sat(750));
    }

    #[tokio::test]
    async fn test_rejecting_recipient() {
        let ledger = InMemoryLedger::new();
        let bob = AccountId::new_random();
        ledger.reject_transfers_to(bob);

        let result = ledger.transfer(&bob, Amount::from_sat(10)).await;
        assert!(matches!(result, Err(LedgerError::TransferRejected { .. })));
        assert_eq!(ledger.balance(&bob), Amount::ZERO);
        assert!(ledger.transfers().is_empty());

        ledger.accept_transfers_to(&bob);
        ledger.transfer(&bob, Amount::from_sat(10)).await.unwrap();
        assert_eq!(ledger.balance(&bob), Amount::from_sat(10));
    }
}
