use serde::{Deserialize, Serialize};
use std::fmt;

/// A move in rock-paper-scissors, encoded on the wire as 1, 2 or 3.
///
/// Paper beats rock, scissors beats paper, rock beats scissors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Choice {
    Rock = 1,
    Paper = 2,
    Scissors = 3,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Decode a revealed choice code. Anything outside 1..=3 is not a valid move.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Choice::Rock),
            2 => Some(Choice::Paper),
            3 => Some(Choice::Scissors),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Position of this choice in a weight table.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Paper, Choice::Rock)
                | (Choice::Scissors, Choice::Paper)
                | (Choice::Rock, Choice::Scissors)
        )
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        for choice in Choice::ALL {
            assert_eq!(Choice::from_code(choice.code()), Some(choice));
        }
        assert_eq!(Choice::from_code(0), None);
        assert_eq!(Choice::from_code(4), None);
        assert_eq!(Choice::from_code(u8::MAX), None);
    }

    #[test]
    fn test_each_choice_beats_exactly_one() {
        for a in Choice::ALL {
            let wins = Choice::ALL.iter().filter(|b| a.beats(**b)).count();
            assert_eq!(wins, 1, "{} should beat exactly one choice", a);
            assert!(!a.beats(a));
        }
        assert!(Choice::Paper.beats(Choice::Rock));
        assert!(Choice::Scissors.beats(Choice::Paper));
        assert!(Choice::Rock.beats(Choice::Scissors));
    }
}
