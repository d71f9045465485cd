//! Decision strategies for the Iterated Prisoner's Dilemma
//!
//! Per-round decision logic for two agents driven by an external match
//! runner:
//! - [`AdaptivePlayer`]: stateful, phase-aware, with opponent modelling
//! - [`decide`]: a pure function of the full match history
//!
//! The runner owns the game loop, pairing and scoring; this crate only
//! answers "what do I play this round?" and, for the adaptive player,
//! consumes the realized outcome of each round.

mod adaptive;
mod random;
mod reactive;

pub use adaptive::{AdaptiveConfig, AdaptivePlayer};
pub use random::{RandomSource, SeededRng};
pub use reactive::decide;

use serde::{Deserialize, Serialize};

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// The opposite move
    pub fn other(self) -> Move {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }
}

/// Payoff matrix for the Prisoner's Dilemma
/// Returns (score_a, score_b)
pub fn payoff(a: Move, b: Move) -> (u8, u8) {
    match (a, b) {
        (Move::Cooperate, Move::Cooperate) => (3, 3),
        (Move::Cooperate, Move::Defect) => (0, 5),
        (Move::Defect, Move::Cooperate) => (5, 0),
        (Move::Defect, Move::Defect) => (1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff_matrix() {
        assert_eq!(payoff(Move::Cooperate, Move::Cooperate), (3, 3));
        assert_eq!(payoff(Move::Cooperate, Move::Defect), (0, 5));
        assert_eq!(payoff(Move::Defect, Move::Cooperate), (5, 0));
        assert_eq!(payoff(Move::Defect, Move::Defect), (1, 1));
    }

    #[test]
    fn test_payoff_swap_symmetry() {
        for a in [Move::Cooperate, Move::Defect] {
            for b in [Move::Cooperate, Move::Defect] {
                let (sa, sb) = payoff(a, b);
                assert_eq!(payoff(b, a), (sb, sa));
            }
        }
    }

    #[test]
    fn test_move_other() {
        assert_eq!(Move::Cooperate.other(), Move::Defect);
        assert_eq!(Move::Defect.other(), Move::Cooperate);
    }
}
