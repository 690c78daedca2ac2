//! Scoring module - line clear points and level progression
//!
//! Points for a lock are `LINE_SCORES[min(lines, 4)] * level`, using the
//! level the board had before the lock. Level is `1 + lines / 10`.
//! Dropping a piece never awards points by itself.

use crate::types::{LINES_PER_LEVEL, LINE_SCORES};

/// Points awarded for clearing `lines` rows in one lock at `level`
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    LINE_SCORES[lines.min(4)].saturating_mul(level)
}

/// Level for a cumulative line count
pub fn calculate_level(total_lines: u32) -> u32 {
    1 + total_lines / LINES_PER_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores_at_level_one() {
        assert_eq!(calculate_line_score(0, 1), 0);
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 1), 300);
        assert_eq!(calculate_line_score(3, 1), 500);
        assert_eq!(calculate_line_score(4, 1), 800);
    }

    #[test]
    fn test_line_scores_scale_with_level() {
        assert_eq!(calculate_line_score(1, 3), 300);
        assert_eq!(calculate_line_score(4, 2), 1600);
        assert_eq!(calculate_line_score(0, 7), 0);
    }

    #[test]
    fn test_more_than_four_lines_caps_at_tetris() {
        assert_eq!(calculate_line_score(6, 1), 800);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(25), 3);
    }
}
