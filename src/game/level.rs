use crate::catalog::THEMES;

/// Level reached with `score` points: `floor(score / points_per_level) + 1`
pub fn level_for_score(score: u32, points_per_level: u32) -> u32 {
    score / points_per_level.max(1) + 1
}

/// Catalog index of the theme used at `level` (levels start at 1)
pub fn theme_index(level: u32) -> usize {
    (level.saturating_sub(1) as usize) % THEMES.len()
}
