pub mod scheme;

pub use scheme::{Commitment, CommitmentScheme};

use crate::choice::Choice;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Domain separator for choice commitments.
const COMMITMENT_DOMAIN: &[u8] = b"WAGER_RPS_COMMIT_V1";

/// What a player opens a commitment with: the raw choice code and their secret.
///
/// The code is kept raw rather than as a [`Choice`] so that a player who
/// committed to an out-of-range code can still open it; settlement decides
/// what an invalid code means.
#[derive(Debug, Clone)]
pub struct ChoiceOpening {
    pub choice: u8,
    pub secret: Vec<u8>,
}

/// SHA-256 over `domain || choice || secret`
pub struct Sha256Commitment;

impl CommitmentScheme for Sha256Commitment {
    type Opening = ChoiceOpening;

    fn commit(opening: &Self::Opening) -> Commitment {
        hash_choice(opening.choice, &opening.secret)
    }

    fn verify(commitment: &Commitment, opening: &Self::Opening) -> bool {
        verify_choice(commitment, opening.choice, &opening.secret)
    }
}

fn hash_choice(choice: u8, secret: &[u8]) -> Commitment {
    let mut hasher = Sha256::new();
    hasher.update(COMMITMENT_DOMAIN);
    hasher.update([choice]);
    hasher.update(secret);
    let digest = hasher.finalize();

    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Commitment::from_bytes(bytes)
}

/// Check that `(choice, secret)` opens `commitment`.
pub fn verify_choice(commitment: &Commitment, choice: u8, secret: &[u8]) -> bool {
    let computed = hash_choice(choice, secret);
    let matches = computed.ct_eq(commitment);
    tracing::debug!(
        "Commitment {} {} opening with choice code {}",
        commitment,
        if matches { "accepted" } else { "rejected" },
        choice
    );
    matches
}

/// Commit to a choice code. Clients call this before creating or joining.
pub fn commit_code(choice: u8, secret: &[u8]) -> Commitment {
    hash_choice(choice, secret)
}

pub fn commit_choice(choice: Choice, secret: &[u8]) -> Commitment {
    commit_code(choice.code(), secret)
}

/// Length of secrets produced by [`generate_secret`]. Reveals accept any length.
pub const SECRET_LEN: usize = 32;

/// Fresh blinding secret to keep until reveal. Losing it means the
/// commitment can never be opened and the escrow is only recoverable by
/// the counterparty through forfeit.
pub fn generate_secret() -> Vec<u8> {
    let mut secret = [0u8; SECRET_LEN];
    rand::thread_rng().fill_bytes(&mut secret);
    secret.to_vec()
}
