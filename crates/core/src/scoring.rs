//! Scoring module - per-pass score increments and the session accumulator
//!
//! Each matching pass of a cascade is worth
//! `matched_tiles * tile_ratio * combo_index * combo_ratio`, where the combo
//! index is 1 on the first pass after a swap and grows by one per chained pass.

/// Receives one event per non-empty matching pass
pub trait ScoreSink {
    fn on_match(&mut self, matched_tiles: usize, combo_index: u32);
}

impl<S: ScoreSink + ?Sized> ScoreSink for &mut S {
    fn on_match(&mut self, matched_tiles: usize, combo_index: u32) {
        (**self).on_match(matched_tiles, combo_index)
    }
}

/// Score for one matching pass
pub fn calculate_pass_score(
    matched_tiles: usize,
    combo_index: u32,
    tile_ratio: u32,
    combo_ratio: u32,
) -> u64 {
    (matched_tiles as u64)
        .saturating_mul(tile_ratio as u64)
        .saturating_mul(combo_index as u64)
        .saturating_mul(combo_ratio as u64)
}

/// Running score for one game session, plus the best score seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreAccumulator {
    tile_ratio: u32,
    combo_ratio: u32,
    current: u64,
    high_score: u64,
}

impl ScoreAccumulator {
    pub fn new(tile_ratio: u32, combo_ratio: u32) -> Self {
        Self {
            tile_ratio,
            combo_ratio,
            current: 0,
            high_score: 0,
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn reset_current(&mut self) {
        self.current = 0;
    }

    /// Fold the current score into the high score
    pub fn commit_high_score(&mut self) {
        self.high_score = self.high_score.max(self.current);
    }
}

impl ScoreSink for ScoreAccumulator {
    fn on_match(&mut self, matched_tiles: usize, combo_index: u32) {
        let points =
            calculate_pass_score(matched_tiles, combo_index, self.tile_ratio, self.combo_ratio);
        self.current = self.current.saturating_add(points);
    }
}

impl Default for ScoreAccumulator {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_TILE_RATIO, crate::types::DEFAULT_COMBO_RATIO)
    }
}

/// Sink that only records events (useful for hosts that score elsewhere, and tests)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    pub events: Vec<(usize, u32)>,
}

impl ScoreSink for RecordingSink {
    fn on_match(&mut self, matched_tiles: usize, combo_index: u32) {
        self.events.push((matched_tiles, combo_index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_score() {
        assert_eq!(calculate_pass_score(3, 1, 10, 1), 30);
        assert_eq!(calculate_pass_score(5, 1, 10, 1), 50);
        assert_eq!(calculate_pass_score(3, 2, 10, 1), 60);
        assert_eq!(calculate_pass_score(4, 3, 5, 2), 120);
        assert_eq!(calculate_pass_score(0, 1, 10, 1), 0);
    }

    #[test]
    fn test_accumulates_chained_passes() {
        let mut acc = ScoreAccumulator::new(10, 1);
        acc.on_match(5, 1);
        acc.on_match(3, 2);
        assert_eq!(acc.current(), 110);
    }

    #[test]
    fn test_high_score_keeps_best() {
        let mut acc = ScoreAccumulator::new(10, 1);
        acc.on_match(3, 1);
        acc.commit_high_score();
        assert_eq!(acc.high_score(), 30);

        acc.reset_current();
        acc.on_match(3, 1);
        acc.commit_high_score();
        assert_eq!(acc.high_score(), 30);
        assert_eq!(acc.current(), 30);

        acc.on_match(4, 2);
        acc.commit_high_score();
        assert_eq!(acc.high_score(), 110);
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        assert_eq!(calculate_pass_score(usize::MAX, u32::MAX, u32::MAX, u32::MAX), u64::MAX);
    }
}
