use serde::{Deserialize, Serialize};

/// Leveling progress for one member of one guild.
///
/// `xp` is progress since the last level-up while `total_xp` is every point
/// ever granted, which is also the leaderboard sort key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub guild_id: u64,
    pub user_id: u64,
    pub xp: u64,
    pub total_xp: u64,
    pub level: u64,
    /// Unix milliseconds of the last accrual that was not cooldown-gated.
    pub last_updated: u64,
}

impl UserRecord {
    /// Existence-only record as produced by an explicit create.
    pub fn bare(guild_id: u64, user_id: u64) -> Self {
        Self {
            guild_id,
            user_id,
            xp: 0,
            total_xp: 0,
            level: 1,
            last_updated: 0,
        }
    }

    /// Record produced by the first accrual for a pair.
    pub fn first_grant(guild_id: u64, user_id: u64, amount: u64, now: u64) -> Self {
        Self {
            guild_id,
            user_id,
            xp: amount,
            total_xp: amount,
            level: 1,
            last_updated: now,
        }
    }

    pub fn is_for(&self, guild_id: u64, user_id: u64) -> bool {
        self.guild_id == guild_id && self.user_id == user_id
    }
}

/// A fetched record, optionally annotated with its 1-based guild rank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelStanding {
    pub record: UserRecord,
    pub position: Option<usize>,
}
