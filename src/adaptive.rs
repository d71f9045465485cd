//! Adaptive strategy: stateful opponent modelling with phase-aware play
//!
//! One [`AdaptivePlayer`] instance owns the state of exactly one match.
//! The match runner calls [`AdaptivePlayer::next_move`] once per round and
//! feeds the realized outcome back through [`AdaptivePlayer::record`].

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::random::{RandomSource, SeededRng};
use crate::{payoff, Move};

/// Length of the opponent-move sequences tracked in the pattern table.
const PATTERN_LENGTH: usize = 3;

/// Every PROBE_INTERVAL rounds, play PROBE_ROUNDS random moves to
/// re-sample opponent behaviour.
const PROBE_INTERVAL: usize = 20;
const PROBE_ROUNDS: u8 = 2;

/// Configuration handed over by the match runner.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// Fixed match length agreed by the match runner.
    pub total_rounds: usize,
    /// Capacity of the recent-opponent-moves window.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Cooperation rate at or above which the opponent counts as cooperative.
    #[serde(default = "default_high_thresh")]
    pub high_thresh: f64,
    /// Cooperation rate below which the opponent counts as hostile.
    #[serde(default = "default_low_thresh")]
    pub low_thresh: f64,
    /// Number of final rounds handled by the endgame rule.
    #[serde(default = "default_endgame_length")]
    pub endgame_length: usize,
}

fn default_window() -> usize {
    10
}

fn default_high_thresh() -> f64 {
    0.7
}

fn default_low_thresh() -> f64 {
    0.3
}

fn default_endgame_length() -> usize {
    5
}

impl AdaptiveConfig {
    /// Configuration with default tuning for a match of `total_rounds`.
    pub fn new(total_rounds: usize) -> Self {
        Self {
            total_rounds,
            window: default_window(),
            high_thresh: default_high_thresh(),
            low_thresh: default_low_thresh(),
            endgame_length: default_endgame_length(),
        }
    }

    fn validate(&self) {
        assert!(self.total_rounds > 0, "total_rounds must be positive");
        assert!(self.window > 0, "window must be positive");
        assert!(
            (0.0..=1.0).contains(&self.high_thresh) && (0.0..=1.0).contains(&self.low_thresh),
            "cooperation thresholds must lie in [0, 1]"
        );
        assert!(
            self.high_thresh > self.low_thresh,
            "high_thresh must exceed low_thresh"
        );
        assert!(
            self.endgame_length <= self.total_rounds,
            "endgame_length cannot exceed total_rounds"
        );
    }
}

/// Fixed-capacity FIFO of the opponent's latest moves with a running
/// cooperation count. Push and evict are O(1); the count is maintained
/// incrementally, never recomputed from the contents.
#[derive(Clone, Debug)]
struct RecentWindow {
    moves: VecDeque<Move>,
    capacity: usize,
    coop_count: usize,
}

impl RecentWindow {
    fn new(capacity: usize) -> Self {
        Self {
            moves: VecDeque::with_capacity(capacity),
            capacity,
            coop_count: 0,
        }
    }

    /// Evicts the oldest entry first when already full, then appends.
    fn push(&mut self, mv: Move) {
        if self.moves.len() == self.capacity {
            if self.moves.pop_front() == Some(Move::Cooperate) {
                self.coop_count -= 1;
            }
        }
        self.moves.push_back(mv);
        if mv == Move::Cooperate {
            self.coop_count += 1;
        }
    }

    /// Cooperation rate over the window, 0.5 when nothing is recorded yet.
    fn coop_rate(&self) -> f64 {
        if self.moves.is_empty() {
            0.5
        } else {
            self.coop_count as f64 / self.moves.len() as f64
        }
    }
}

/// What the opponent played immediately after one 3-move sequence.
#[derive(Clone, Copy, Debug, Default)]
struct PatternCounts {
    cooperate: u32,
    defect: u32,
}

/// Stateful adaptive player for one match.
///
/// Generic over the random source so tests can script every probabilistic
/// branch; match runners use [`SeededRng`].
#[derive(Clone, Debug)]
pub struct AdaptivePlayer<R = SeededRng> {
    config: AdaptiveConfig,
    rng: R,
    rng_at_start: R,
    my_history: Vec<Move>,
    opp_history: Vec<Move>,
    recent: RecentWindow,
    my_score: u32,
    opp_score: u32,
    aggressive: bool,
    patterns: HashMap<[Move; PATTERN_LENGTH], PatternCounts>,
    probing_rounds: u8,
    awaiting_record: bool,
}

impl<R: RandomSource + Clone> AdaptivePlayer<R> {
    /// Create a player for a fresh match.
    ///
    /// Panics on invalid configuration (see [`AdaptiveConfig`] field docs).
    pub fn new(config: AdaptiveConfig, rng: R) -> Self {
        config.validate();
        Self {
            rng_at_start: rng.clone(),
            rng,
            my_history: Vec::with_capacity(config.total_rounds),
            opp_history: Vec::with_capacity(config.total_rounds),
            recent: RecentWindow::new(config.window),
            my_score: 0,
            opp_score: 0,
            aggressive: false,
            patterns: HashMap::new(),
            probing_rounds: 0,
            awaiting_record: false,
            config,
        }
    }

    /// Clear all match state, including the random stream, so the next
    /// match replays exactly like a freshly constructed player.
    pub fn reset(&mut self) {
        self.rng = self.rng_at_start.clone();
        self.my_history.clear();
        self.opp_history.clear();
        self.recent = RecentWindow::new(self.config.window);
        self.my_score = 0;
        self.opp_score = 0;
        self.aggressive = false;
        self.patterns.clear();
        self.probing_rounds = 0;
        self.awaiting_record = false;
    }

    /// Cumulative (my, opponent) score over the recorded rounds.
    pub fn scores(&self) -> (u32, u32) {
        (self.my_score, self.opp_score)
    }

    /// Choose this round's move.
    ///
    /// Must be called exactly once per round, in round order, with a
    /// [`AdaptivePlayer::record`] call in between. Violations panic.
    pub fn next_move(&mut self, round_index: usize) -> Move {
        assert!(
            round_index < self.config.total_rounds,
            "round_index {} out of range for a {}-round match",
            round_index,
            self.config.total_rounds
        );
        assert!(
            !self.awaiting_record,
            "next_move called again before record"
        );
        assert_eq!(
            round_index,
            self.my_history.len(),
            "next_move called out of round order"
        );
        self.awaiting_record = true;

        // Opening moves: establish trust.
        if round_index < 2 {
            return Move::Cooperate;
        }

        // Final rounds have their own rule.
        if round_index >= self.config.total_rounds - self.config.endgame_length {
            return self.endgame(round_index);
        }

        // Periodic probing to detect behaviour changes.
        if round_index % PROBE_INTERVAL == 0 {
            self.probing_rounds = PROBE_ROUNDS;
        }
        if self.probing_rounds > 0 {
            self.probing_rounds -= 1;
            return if self.rng.next_percent() < 50 {
                Move::Cooperate
            } else {
                Move::Defect
            };
        }

        let coop_rate = self.recent.coop_rate();

        // Pattern-based prediction.
        if self.opp_history.len() >= PATTERN_LENGTH {
            if let Some(counter) = self.predict_counter() {
                return counter;
            }
        }

        // Score-based mode switch, with hysteresis: the mode holds until a
        // threshold is crossed the other way.
        self.update_mode();

        if self.aggressive {
            return self.aggressive_play(coop_rate);
        }

        if coop_rate >= self.config.high_thresh {
            self.mostly_cooperate()
        } else if coop_rate >= self.config.low_thresh {
            self.forgive_defections(coop_rate)
        } else {
            self.mostly_defect()
        }
    }

    /// Feed back the realized outcome of the round just played.
    pub fn record(&mut self, my_move: Move, opp_move: Move) {
        assert!(
            self.awaiting_record,
            "record called without a matching next_move"
        );
        self.awaiting_record = false;

        self.my_history.push(my_move);
        self.opp_history.push(opp_move);
        self.recent.push(opp_move);

        let (me, opp) = payoff(my_move, opp_move);
        self.my_score += me as u32;
        self.opp_score += opp as u32;

        // Learn what followed the 3-move sequence preceding the new move.
        let n = self.opp_history.len();
        if n > PATTERN_LENGTH {
            let start = n - PATTERN_LENGTH - 1;
            let pattern = [
                self.opp_history[start],
                self.opp_history[start + 1],
                self.opp_history[start + 2],
            ];
            let counts = self.patterns.entry(pattern).or_default();
            match opp_move {
                Move::Cooperate => counts.cooperate += 1,
                Move::Defect => counts.defect += 1,
            }
        }
    }

    fn update_mode(&mut self) {
        let score_diff = self.my_score as i64 - self.opp_score as i64;
        if score_diff < -10 {
            self.aggressive = true;
        } else if score_diff > 5 {
            self.aggressive = false;
        }
    }

    /// Counter-move against the opponent's predicted continuation of their
    /// latest 3-move sequence. None when the evidence is not lopsided.
    fn predict_counter(&self) -> Option<Move> {
        let n = self.opp_history.len();
        let tail = [
            self.opp_history[n - 3],
            self.opp_history[n - 2],
            self.opp_history[n - 1],
        ];
        let counts = self.patterns.get(&tail)?;
        if counts.cooperate > 2 * counts.defect {
            // Opponent likely to cooperate: take the exploit payoff.
            Some(Move::Defect)
        } else if counts.defect > 2 * counts.cooperate {
            // Opponent likely to defect: stay out of the spiral.
            Some(Move::Cooperate)
        } else {
            None
        }
    }

    fn aggressive_play(&self, coop_rate: f64) -> Move {
        let last_two = self.opp_last_two();
        if coop_rate > 0.5 || last_two == Some([Move::Cooperate; 2]) {
            return Move::Defect;
        }
        if last_two == Some([Move::Defect; 2]) {
            return Move::Defect;
        }
        self.opp_last()
    }

    /// Near-pure tit-for-tat with a rare probing defection.
    fn mostly_cooperate(&mut self) -> Move {
        if self.rng.next_percent() < 95 {
            self.opp_last()
        } else {
            Move::Defect
        }
    }

    /// Answer cooperation in kind; forgive a defection with a probability
    /// that grows with the opponent's recent cooperation rate.
    fn forgive_defections(&mut self, coop_rate: f64) -> Move {
        if self.opp_last() == Move::Cooperate {
            return Move::Cooperate;
        }
        let forgiveness = 0.3 + coop_rate * 0.5;
        if self.rng.next_unit() < forgiveness {
            Move::Cooperate
        } else {
            Move::Defect
        }
    }

    fn mostly_defect(&mut self) -> Move {
        // Occasional olive branch to break a defect-defect lock.
        if self.opp_last_two() == Some([Move::Defect; 2]) && self.rng.next_percent() < 10 {
            return Move::Cooperate;
        }
        Move::Defect
    }

    fn endgame(&mut self, round_index: usize) -> Move {
        let rounds_left = self.config.total_rounds - round_index;
        if self.recent.coop_rate() > 0.8 {
            // Highly cooperative opponents keep cooperating here.
            return Move::Defect;
        }
        if rounds_left <= 2 || self.opp_last() == Move::Defect {
            return Move::Defect;
        }
        self.opp_last()
    }

    fn opp_last(&self) -> Move {
        self.opp_history[self.opp_history.len() - 1]
    }

    fn opp_last_two(&self) -> Option<[Move; 2]> {
        let n = self.opp_history.len();
        if n < 2 {
            None
        } else {
            Some([self.opp_history[n - 2], self.opp_history[n - 1]])
        }
    }
}
