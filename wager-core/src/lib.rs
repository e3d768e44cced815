//! Wager core - host environment primitives for escrowed games
//!
//! Account identifiers, an injectable clock and the ledger that pays
//! custodied value back out. Game crates build on these without caring
//! which host actually moves the funds.

pub mod clock;
pub mod error;
pub mod ledger;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LedgerError, Result};
pub use ledger::{InMemoryLedger, Ledger};
pub use types::{AccountId, TransferRecord};

pub use ::bitcoin::Amount;
