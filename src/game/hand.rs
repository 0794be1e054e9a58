//! Hands and the Cyclic Resolver
//!
//! Three playable hands form a cycle: ROCK beats SCISSORS, SCISSORS
//! beats PAPER, PAPER beats ROCK. `Hand::None` is the "not yet played"
//! sentinel and never takes part in a comparison.

use serde::{Deserialize, Serialize};

/// A hand in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum Hand {
    /// Not committed / not revealed.
    #[default]
    None = 0,
    /// Rock
    Rock = 1,
    /// Paper
    Paper = 2,
    /// Scissors
    Scissors = 3,
}

impl Hand {
    /// All playable hands.
    pub const PLAYABLE: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    /// Is this a legal play?
    #[inline]
    pub fn is_playable(self) -> bool {
        self != Hand::None
    }

    /// The hand this one defeats, `None` for the sentinel.
    pub fn beats(self) -> Option<Hand> {
        match self {
            Hand::Rock => Some(Hand::Scissors),
            Hand::Paper => Some(Hand::Rock),
            Hand::Scissors => Some(Hand::Paper),
            Hand::None => None,
        }
    }
}

/// Result of comparing two hands, from the point of view of `(a, b)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Both hands equal.
    Tie,
    /// First hand wins.
    AWins,
    /// Second hand wins.
    BWins,
}

impl Outcome {
    /// Swap the point of view.
    pub fn flip(self) -> Outcome {
        match self {
            Outcome::Tie => Outcome::Tie,
            Outcome::AWins => Outcome::BWins,
            Outcome::BWins => Outcome::AWins,
        }
    }
}

/// Compare two playable hands.
///
/// Callers validate both hands first; a `Hand::None` operand is a caller
/// bug and resolves as a tie in release builds.
pub fn compare(a: Hand, b: Hand) -> Outcome {
    debug_assert!(a.is_playable() && b.is_playable(), "compare called with Hand::None");

    if a == b {
        Outcome::Tie
    } else if a.beats() == Some(b) {
        Outcome::AWins
    } else if b.beats() == Some(a) {
        Outcome::BWins
    } else {
        Outcome::Tie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cycle() {
        assert_eq!(compare(Hand::Rock, Hand::Scissors), Outcome::AWins);
        assert_eq!(compare(Hand::Scissors, Hand::Paper), Outcome::AWins);
        assert_eq!(compare(Hand::Paper, Hand::Rock), Outcome::AWins);

        assert_eq!(compare(Hand::Scissors, Hand::Rock), Outcome::BWins);
        assert_eq!(compare(Hand::Paper, Hand::Scissors), Outcome::BWins);
        assert_eq!(compare(Hand::Rock, Hand::Paper), Outcome::BWins);
    }

    #[test]
    fn test_ties() {
        for hand in Hand::PLAYABLE {
            assert_eq!(compare(hand, hand), Outcome::Tie);
        }
    }

    #[test]
    fn test_none_sentinel() {
        assert_eq!(Hand::default(), Hand::None);
        assert!(!Hand::None.is_playable());
        assert_eq!(Hand::None.beats(), None);
    }

    fn playable() -> impl Strategy<Value = Hand> {
        prop::sample::select(Hand::PLAYABLE.to_vec())
    }

    proptest! {
        #[test]
        fn prop_compare_antisymmetric(a in playable(), b in playable()) {
            prop_assert_eq!(compare(a, b), compare(b, a).flip());
        }

        #[test]
        fn prop_exactly_one_outcome(a in playable(), b in playable()) {
            let outcome = compare(a, b);
            let a_wins = a.beats() == Some(b);
            let b_wins = b.beats() == Some(a);
            let tie = a == b;
            prop_assert_eq!([tie, a_wins, b_wins].iter().filter(|x| **x).count(), 1);
            match outcome {
                Outcome::Tie => prop_assert!(tie),
                Outcome::AWins => prop_assert!(a_wins),
                Outcome::BWins => prop_assert!(b_wins),
            }
        }
    }
}
