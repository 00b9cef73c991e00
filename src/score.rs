//! Scoring and the lines-per-level ladder

use std::time::Duration;

/// Gravity interval in milliseconds for each level
pub const LEVEL_SPEEDS_MS: [u64; 20] = [
    800, 720, 630, 550, 470, // Levels 0-4
    380, 300, 220, 130, 100, // Levels 5-9
    80, 80, 80, 70, 70, // Levels 10-14
    70, 50, 50, 50, 30, // Levels 15-19
];

/// Lines required to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per soft-drop step
pub const SOFT_DROP_POINTS: u64 = 1;
/// Points per row travelled by a hard drop
pub const HARD_DROP_POINTS: u64 = 1;

/// Outcome of scoring one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineClear {
    /// Rows removed by the lock
    pub lines: u32,
    /// Points awarded for the rows
    pub points: u64,
    /// Set when the lock moved the session to a new level
    pub new_level: Option<u32>,
}

/// Score, lines and level for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, an index into `LEVEL_SPEEDS_MS`
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base award for clearing `lines` rows at once
    pub fn base_points(lines: u32) -> u64 {
        match lines {
            1 => 100,
            2 => 300,
            3 => 500,
            4 => 800,
            _ => 0,
        }
    }

    /// Award points for a lock that removed `lines` rows and update the level
    pub fn add_clear(&mut self, lines: u32) -> LineClear {
        if lines == 0 {
            return LineClear::default();
        }

        self.lines += lines;

        // Multiplier uses the level the rows were cleared at
        let points = Self::base_points(lines) * (self.level as u64 + 1);
        self.points += points;

        // Level only moves up, and stops at the end of the ladder
        let target = (self.lines / LINES_PER_LEVEL).min(Self::max_level());
        let new_level = if target > self.level {
            self.level = target;
            Some(target)
        } else {
            None
        };

        LineClear {
            lines,
            points,
            new_level,
        }
    }

    /// Add score for soft drop steps
    pub fn add_soft_drop(&mut self, cells: u32) {
        self.points += cells as u64 * SOFT_DROP_POINTS;
    }

    /// Add score for hard drop distance
    pub fn add_hard_drop(&mut self, cells: u32) {
        self.points += cells as u64 * HARD_DROP_POINTS;
    }

    /// The highest reachable level
    pub fn max_level() -> u32 {
        LEVEL_SPEEDS_MS.len() as u32 - 1
    }

    /// Time between gravity ticks at the current level
    pub fn gravity_interval(&self) -> Duration {
        let index = (self.level as usize).min(LEVEL_SPEEDS_MS.len() - 1);
        Duration::from_millis(LEVEL_SPEEDS_MS[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_is_non_increasing() {
        assert_eq!(LEVEL_SPEEDS_MS.len(), 20);
        assert_eq!(LEVEL_SPEEDS_MS[0], 800);
        assert_eq!(LEVEL_SPEEDS_MS[19], 30);
        assert!(LEVEL_SPEEDS_MS.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        let clear = score.add_clear(1);
        assert_eq!(clear.points, 100);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
    }

    #[test]
    fn test_tetris_at_level_two() {
        let mut score = Score {
            points: 0,
            level: 2,
            lines: 20,
        };
        score.add_clear(4);
        assert_eq!(score.points, 800 * 3);
    }

    #[test]
    fn test_no_lines_no_change() {
        let mut score = Score::new();
        assert_eq!(score.add_clear(0), LineClear::default());
        assert_eq!(score, Score::new());
    }

    #[test]
    fn test_level_up_at_ten_lines() {
        let mut score = Score::new();
        for _ in 0..9 {
            assert_eq!(score.add_clear(1).new_level, None);
        }
        assert_eq!(score.level, 0);
        assert_eq!(score.gravity_interval(), Duration::from_millis(800));

        let clear = score.add_clear(1);
        assert_eq!(clear.new_level, Some(1));
        assert_eq!(score.level, 1);
        assert_eq!(score.gravity_interval(), Duration::from_millis(720));
    }

    #[test]
    fn test_level_multiplier_uses_level_before_clear() {
        let mut score = Score {
            points: 0,
            level: 0,
            lines: 8,
        };
        // Crosses into level 1, but is paid at level 0
        let clear = score.add_clear(2);
        assert_eq!(clear.points, 300);
        assert_eq!(clear.new_level, Some(1));
    }

    #[test]
    fn test_level_caps_at_end_of_ladder() {
        let mut score = Score::new();
        for _ in 0..100 {
            score.add_clear(4);
        }
        assert_eq!(score.level, 19);
        assert_eq!(score.gravity_interval(), Duration::from_millis(30));
    }

    #[test]
    fn test_drop_points() {
        let mut score = Score::new();
        score.add_soft_drop(3);
        score.add_hard_drop(12);
        assert_eq!(score.points, 15);
    }
}
