//! Level progression for the level bar.
//!
//! Level `n` covers the xp range `n²..(n+1)²`.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub xp: u32,
    /// Xp at which the current level started.
    pub level_floor_xp: u32,
    /// Xp needed to reach the next level.
    pub next_level_xp: u32,
}

impl LevelProgress {
    pub fn new(xp: u32, level: u32) -> Self {
        let level_floor_xp = level.saturating_mul(level);
        let next = level.saturating_add(1);
        Self {
            level,
            xp,
            level_floor_xp,
            next_level_xp: next.saturating_mul(next),
        }
    }

    /// Percentage through the current level, clamped to `0..=100`.
    pub fn percent(&self) -> u8 {
        let span = self.next_level_xp.saturating_sub(self.level_floor_xp);
        if span == 0 {
            return 0;
        }
        let earned = self.xp.saturating_sub(self.level_floor_xp).min(span);
        ((u64::from(earned) * 100) / u64::from(span)) as u8
    }

    pub fn xp_to_next(&self) -> u32 {
        self.next_level_xp.saturating_sub(self.xp)
    }
}
