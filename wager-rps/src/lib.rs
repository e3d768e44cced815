//! Weighted rock-paper-scissors between two accounts
//!
//! Each player escrows a stake and commits to a hidden choice. Once both
//! have joined they reveal, and the loser pays the winner the base stake
//! unit times the weight of the choice the loser played. A player who
//! reveals can take the whole escrow if the other side stays silent past
//! the forfeit window.

pub mod choice;
pub mod commitment;
pub mod config;
pub mod error;
pub mod events;
pub mod registry;
pub mod session;
pub mod settlement;
pub mod storage;
pub mod weights;

pub use choice::Choice;
pub use commitment::{
    commit_choice, commit_code, generate_secret, verify_choice, ChoiceOpening, Commitment,
    CommitmentScheme, Sha256Commitment,
};
pub use config::RegistryConfig;
pub use error::{GameError, Result};
pub use events::GameEvent;
pub use registry::{RevealOutcome, SessionRegistry};
pub use session::{PlayerSlot, Session, SessionKey, Side};
pub use settlement::{determine_winner, Outcome, Payout, Settlement};
pub use storage::{MemorySessionStore, SessionStore, SqliteSessionStore};
pub use weights::{Terms, Weights};

pub use wager_core::{AccountId, Amount, Clock, Ledger};
