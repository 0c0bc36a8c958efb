use std::collections::HashMap;

use crate::model::leveling::UserRecord;

/// 1-based position of `(guild_id, user_id)` in a scan already sorted by
/// `total_xp` descending.
pub fn rank_position(ranked: &[UserRecord], guild_id: u64, user_id: u64) -> Option<usize> {
    ranked
        .iter()
        .position(|record| record.is_for(guild_id, user_id))
        .map(|index| index + 1)
}

/// Positions for every key in `ranked`, first occurrence wins.
pub fn rank_positions(ranked: &[UserRecord]) -> HashMap<(u64, u64), usize> {
    let mut positions = HashMap::with_capacity(ranked.len());
    for (index, record) in ranked.iter().enumerate() {
        positions
            .entry((record.guild_id, record.user_id))
            .or_insert(index + 1);
    }
    positions
}

/// Keep the first `limit` entries of a sorted scan without reordering.
pub fn top_ranked(mut ranked: Vec<UserRecord>, limit: usize) -> Vec<UserRecord> {
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::{rank_position, rank_positions, top_ranked};
    use crate::model::leveling::UserRecord;

    fn ranked() -> Vec<UserRecord> {
        [(1, 300), (2, 200), (3, 200), (4, 100)]
            .into_iter()
            .map(|(user_id, total_xp)| UserRecord {
                total_xp,
                ..UserRecord::bare(9, user_id)
            })
            .collect()
    }

    #[test]
    fn positions_are_one_based() {
        let ranked = ranked();
        assert_eq!(rank_position(&ranked, 9, 1), Some(1));
        assert_eq!(rank_position(&ranked, 9, 3), Some(3));
        assert_eq!(rank_position(&ranked, 9, 5), None);
        assert_eq!(rank_position(&ranked, 8, 1), None);
    }

    #[test]
    fn position_map_matches_linear_lookup() {
        let ranked = ranked();
        let positions = rank_positions(&ranked);
        for record in &ranked {
            assert_eq!(
                positions.get(&(record.guild_id, record.user_id)).copied(),
                rank_position(&ranked, record.guild_id, record.user_id)
            );
        }
    }

    #[test]
    fn truncation_keeps_order() {
        let top = top_ranked(ranked(), 3);
        let users: Vec<u64> = top.iter().map(|record| record.user_id).collect();
        assert_eq!(users, vec![1, 2, 3]);
        assert_eq!(top_ranked(ranked(), 10).len(), 4);
    }
}
