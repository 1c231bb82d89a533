use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One delivery's outcome. `Runs` only ever carries 0, 1, 2, 3, 4 or 6;
/// every value is drawn from [`OUTCOME_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallOutcome {
    Runs(u8),
    Wicket,
    Wide,
    NoBall,
}

impl BallOutcome {
    /// Whether the delivery counts toward the 6-ball over.
    pub fn is_legal(self) -> bool {
        !matches!(self, BallOutcome::Wide | BallOutcome::NoBall)
    }

    /// Display tag in the scoreboard register.
    pub fn tag(self) -> String {
        match self {
            BallOutcome::Runs(0) => "Dot".to_string(),
            BallOutcome::Runs(1) => "1 run".to_string(),
            BallOutcome::Runs(4) => "FOUR!".to_string(),
            BallOutcome::Runs(6) => "SIX!".to_string(),
            BallOutcome::Runs(r) => format!("{r} runs"),
            BallOutcome::Wicket => "WICKET!".to_string(),
            BallOutcome::Wide => "Wide".to_string(),
            BallOutcome::NoBall => "No-ball".to_string(),
        }
    }
}

/// Fixed delivery distribution, in parts per [`WEIGHT_TOTAL`].
pub const OUTCOME_TABLE: [(BallOutcome, u32); 9] = [
    (BallOutcome::Runs(0), 280),
    (BallOutcome::Runs(1), 240),
    (BallOutcome::Runs(2), 120),
    (BallOutcome::Runs(3), 50),
    (BallOutcome::Runs(4), 176),
    (BallOutcome::Runs(6), 80),
    (BallOutcome::Wicket, 38),
    (BallOutcome::Wide, 8),
    (BallOutcome::NoBall, 8),
];

pub const WEIGHT_TOTAL: u32 = 1000;

/// Source of delivery outcomes. The simulation engine never touches an
/// ambient RNG; callers inject either the weighted sampler or a scripted
/// sequence for deterministic replay.
pub trait OutcomeSource {
    fn next_outcome(&mut self) -> BallOutcome;
}

/// Samples [`OUTCOME_TABLE`] from any `rand` RNG.
pub struct WeightedOutcomes<R: Rng> {
    rng: R,
}

impl<R: Rng> WeightedOutcomes<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl WeightedOutcomes<rand::rngs::StdRng> {
    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self::new(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> OutcomeSource for WeightedOutcomes<R> {
    fn next_outcome(&mut self) -> BallOutcome {
        let mut roll = self.rng.gen_range(0..WEIGHT_TOTAL);
        for (outcome, weight) in OUTCOME_TABLE {
            if roll < weight {
                return outcome;
            }
            roll -= weight;
        }
        // roll < WEIGHT_TOTAL and the table sums to WEIGHT_TOTAL.
        unreachable!("outcome roll exceeded weight table")
    }
}

/// Replays a fixed sequence, then dot balls once exhausted. Used by tests
/// and benches to drive exact scenarios through the engine.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOutcomes {
    queue: VecDeque<BallOutcome>,
}

impl ScriptedOutcomes {
    pub fn new(outcomes: impl IntoIterator<Item = BallOutcome>) -> Self {
        Self {
            queue: outcomes.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl OutcomeSource for ScriptedOutcomes {
    fn next_outcome(&mut self) -> BallOutcome {
        self.queue.pop_front().unwrap_or(BallOutcome::Runs(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_table_sums_to_total() {
        let sum: u32 = OUTCOME_TABLE.iter().map(|(_, w)| w).sum();
        assert_eq!(sum, WEIGHT_TOTAL);
    }

    #[test]
    fn sampler_only_emits_table_tokens() {
        let mut source = WeightedOutcomes::seeded(7);
        for _ in 0..2_000 {
            let outcome = source.next_outcome();
            assert!(OUTCOME_TABLE.iter().any(|(o, _)| *o == outcome));
        }
    }

    #[test]
    fn sampler_tracks_table_frequencies() {
        let mut source = WeightedOutcomes::seeded(42);
        let draws = 20_000;
        let mut dots = 0u32;
        let mut wickets = 0u32;
        for _ in 0..draws {
            match source.next_outcome() {
                BallOutcome::Runs(0) => dots += 1,
                BallOutcome::Wicket => wickets += 1,
                _ => {}
            }
        }
        let dot_rate = dots as f64 / draws as f64;
        let wicket_rate = wickets as f64 / draws as f64;
        assert!((dot_rate - 0.28).abs() < 0.03, "dot rate {dot_rate}");
        assert!((wicket_rate - 0.038).abs() < 0.015, "wicket rate {wicket_rate}");
    }

    #[test]
    fn scripted_source_replays_then_falls_back_to_dots() {
        let mut source = ScriptedOutcomes::new([BallOutcome::Runs(4), BallOutcome::Wicket]);
        assert_eq!(source.next_outcome(), BallOutcome::Runs(4));
        assert_eq!(source.next_outcome(), BallOutcome::Wicket);
        assert_eq!(source.next_outcome(), BallOutcome::Runs(0));
    }
}
