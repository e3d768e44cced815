use crate::choice::Choice;
use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use wager_core::Amount;

/// Per-choice cost multipliers, indexed rock, paper, scissors.
///
/// Exactly one entry equals 1 and no entry is below it, so the cheapest
/// choice defines the unit every other weight is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u64; 3]", into = "[u64; 3]")]
pub struct Weights([u64; 3]);

impl Weights {
    pub fn new(raw: [u64; 3]) -> Result<Self> {
        if raw.contains(&0) {
            return Err(GameError::invalid_weights(format!(
                "{:?}: weights must be at least 1",
                raw
            )));
        }

        let ones = raw.iter().filter(|w| **w == 1).count();
        if ones != 1 {
            return Err(GameError::invalid_weights(format!(
                "{:?}: exactly one weight must equal 1, found {}",
                raw, ones
            )));
        }

        Ok(Self(raw))
    }

    pub fn as_array(&self) -> [u64; 3] {
        self.0
    }

    pub fn max(&self) -> u64 {
        self.0.iter().copied().max().unwrap_or(1)
    }

    pub fn of(&self, choice: Choice) -> u64 {
        self.0[choice.index()]
    }

    /// Smallest escrow either side may lock: `base_stake_unit * max(weights)`.
    ///
    /// Sending anything less would let the counterparty infer the committed
    /// choice from the attached amount.
    pub fn min_escrow(&self, base_stake_unit: Amount) -> Result<Amount> {
        base_stake_unit.checked_mul(self.max()).ok_or_else(|| {
            GameError::invalid_weights(format!(
                "max weight {} times base stake {} sats overflows",
                self.max(),
                base_stake_unit.to_sat()
            ))
        })
    }
}

impl TryFrom<[u64; 3]> for Weights {
    type Error = GameError;

    fn try_from(raw: [u64; 3]) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<Weights> for [u64; 3] {
    fn from(weights: Weights) -> Self {
        weights.0
    }
}

/// The payoff table both players agree to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms {
    pub weights: Weights,
    pub base_stake_unit: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_weights() {
        let weights = Weights::new([1, 2, 3]).unwrap();
        assert_eq!(weights.max(), 3);
        assert_eq!(weights.of(Choice::Rock), 1);
        assert_eq!(weights.of(Choice::Scissors), 3);

        assert!(Weights::new([5, 1, 5]).is_ok());
        assert!(Weights::new([2, 9, 1]).is_ok());
    }

    #[test]
    fn test_rejects_missing_or_repeated_unit() {
        assert!(matches!(
            Weights::new([2, 3, 4]),
            Err(GameError::InvalidWeights(_))
        ));
        assert!(matches!(
            Weights::new([1, 1, 2]),
            Err(GameError::InvalidWeights(_))
        ));
        assert!(matches!(
            Weights::new([1, 1, 1]),
            Err(GameError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_rejects_zero_weight() {
        assert!(matches!(
            Weights::new([0, 1, 2]),
            Err(GameError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_min_escrow() {
        let weights = Weights::new([1, 4, 2]).unwrap();
        assert_eq!(
            weights.min_escrow(Amount::from_sat(1_000)).unwrap(),
            Amount::from_sat(4_000)
        );
    }

    #[test]
    fn test_min_escrow_overflow() {
        let weights = Weights::new([1, u64::MAX, 2]).unwrap();
        assert!(matches!(
            weights.min_escrow(Amount::from_sat(2)),
            Err(GameError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Weights = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(ok.as_array(), [1, 2, 3]);
        assert!(serde_json::from_str::<Weights>("[2,2,3]").is_err());
    }
}
