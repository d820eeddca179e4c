//! Score, line and level tracking.
//!
//! The level derives from cleared lines: every ten lines advance it by one
//! on top of the configured starting level. Clears are scored at the
//! post-update multiplier, so the clear that crosses a boundary is already
//! paid at the higher level.
//!
//! | Clear | Base score |
//! |--------|-----------|
//! | Single | 100 |
//! | Double | 300 |
//! | Triple | 500 |
//! | Tetris | 800 |
//!
//! Soft drops score 1 per accepted row; a hard drop scores a flat 2
//! regardless of distance.

use tetrion_types::{ClearType, FALL_INTERVALS, MAX_LEVEL, MIN_LEVEL};

fn wrap_level(level: u32) -> u32 {
    if level < MIN_LEVEL {
        MAX_LEVEL
    } else if level > MAX_LEVEL {
        MIN_LEVEL
    } else {
        level
    }
}

/// Round statistics plus the level-derived gravity speed.
#[derive(Debug, Clone)]
pub struct Stats {
    score: u32,
    lines: u32,
    level: u32,
    init_level: u32,
}

impl Stats {
    /// Start tracking at `init_level`. Out-of-range starting levels wrap:
    /// below 1 becomes 15, above 15 becomes 1.
    pub fn new(init_level: u32) -> Self {
        let init_level = wrap_level(init_level);
        Self {
            score: 0,
            lines: 0,
            level: init_level,
            init_level,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn init_level(&self) -> u32 {
        self.init_level
    }

    /// One accepted soft-drop row.
    pub fn soft_drop(&mut self) {
        self.score += 1;
    }

    /// One accepted hard drop, flat rate.
    pub fn hard_drop(&mut self) {
        self.score += 2;
    }

    /// Account one contiguous clear group: lines first, then the level,
    /// then the score at the fresh multiplier.
    pub fn line_clear(&mut self, clear: ClearType) {
        self.lines += clear.rows();
        self.level = self.lines / 10 + self.init_level;
        self.score += clear.base_score() * self.level;
    }

    /// Milliseconds between gravity rows at the current level. Levels past
    /// the table clamp to its last entry.
    pub fn fall_interval_ms(&self) -> u32 {
        let level = self.level.clamp(MIN_LEVEL, MAX_LEVEL);
        FALL_INTERVALS[(level - 1) as usize]
    }

    /// Cycle the starting level one up, wrapping back to 1 past 15.
    pub fn raise_init_level(&mut self) {
        self.init_level = if self.init_level >= MAX_LEVEL {
            MIN_LEVEL
        } else {
            self.init_level + 1
        };
        self.level = self.lines / 10 + self.init_level;
    }

    /// Zero the round counters; the starting level is kept.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lines = 0;
        self.level = self.init_level;
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats::new(MIN_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_score_flat_rates() {
        let mut stats = Stats::new(1);
        stats.soft_drop();
        stats.soft_drop();
        stats.soft_drop();
        assert_eq!(stats.score(), 3);
        stats.hard_drop();
        assert_eq!(stats.score(), 5);
    }

    #[test]
    fn clears_scale_with_the_level() {
        let mut stats = Stats::new(5);
        stats.line_clear(ClearType::Single);
        assert_eq!(stats.lines(), 1);
        assert_eq!(stats.level(), 5);
        assert_eq!(stats.score(), 500);

        let mut stats = Stats::new(1);
        stats.line_clear(ClearType::Tetris);
        assert_eq!(stats.score(), 800);
    }

    #[test]
    fn boundary_clear_pays_at_the_new_level() {
        let mut stats = Stats::new(1);
        for _ in 0..9 {
            stats.line_clear(ClearType::Single);
        }
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.score(), 900);

        stats.line_clear(ClearType::Single);
        assert_eq!(stats.lines(), 10);
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.score(), 1100);
    }

    #[test]
    fn starting_level_wraps_both_ways() {
        assert_eq!(Stats::new(0).level(), 15);
        assert_eq!(Stats::new(16).level(), 1);

        let mut stats = Stats::new(15);
        stats.raise_init_level();
        assert_eq!(stats.init_level(), 1);
        stats.raise_init_level();
        assert_eq!(stats.init_level(), 2);
    }

    #[test]
    fn fall_interval_clamps_past_the_table() {
        assert_eq!(Stats::new(1).fall_interval_ms(), 1000);
        assert_eq!(Stats::new(15).fall_interval_ms(), 7);

        let mut stats = Stats::new(15);
        for _ in 0..10 {
            stats.line_clear(ClearType::Single);
        }
        assert_eq!(stats.level(), 16);
        assert_eq!(stats.fall_interval_ms(), 7);
    }

    #[test]
    fn reset_keeps_the_starting_level() {
        let mut stats = Stats::new(4);
        stats.line_clear(ClearType::Double);
        stats.soft_drop();
        stats.reset();

        assert_eq!(stats.score(), 0);
        assert_eq!(stats.lines(), 0);
        assert_eq!(stats.level(), 4);
    }
}
