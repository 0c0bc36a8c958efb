use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LevelingError;
use crate::impls::formula::xp_to_next_level;
use crate::model::leveling::UserRecord;

/// Minimum gap between two effective grants for the same member.
pub const ACCRUAL_COOLDOWN_SECS: u64 = 60;

/// How many thresholds one grant may cross.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LevelUpMode {
    /// At most one level per grant. A grant spanning several thresholds
    /// leaves `xp` above the next one until the following grant.
    #[default]
    Single,
    /// Keep levelling while `xp` covers the next threshold.
    Cascade,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccrualPolicy {
    pub cooldown_secs: u64,
    pub level_up_mode: LevelUpMode,
}

impl Default for AccrualPolicy {
    fn default() -> Self {
        Self {
            cooldown_secs: ACCRUAL_COOLDOWN_SECS,
            level_up_mode: LevelUpMode::Single,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccrualOutcome {
    /// First grant for the pair; never reported as a level-up.
    Created,
    /// Grant dropped because the cooldown has not elapsed.
    CoolingDown { retry_after_ms: u64 },
    Accrued { levels_gained: u64 },
}

/// Result of one accrual: the record as computed in memory plus what happened.
///
/// The record may not be durable, since write failures are only logged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accrual {
    pub record: UserRecord,
    pub outcome: AccrualOutcome,
}

impl Accrual {
    pub fn leveled_up(&self) -> bool {
        matches!(self.outcome, AccrualOutcome::Accrued { levels_gained } if levels_gained > 0)
    }
}

impl AccrualPolicy {
    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_secs.saturating_mul(1_000)
    }

    /// Milliseconds until `record` may accrue again, zero when it already can.
    ///
    /// `now` and `record.last_updated` are unix milliseconds.
    pub fn cooldown_remaining(&self, record: &UserRecord, now: u64) -> u64 {
        let elapsed = now.saturating_sub(record.last_updated);
        self.cooldown_ms().saturating_sub(elapsed)
    }

    /// Apply a grant to an existing record.
    ///
    /// On error the record is left untouched.
    pub fn apply(
        &self,
        record: &mut UserRecord,
        amount: u64,
        now: u64,
    ) -> Result<AccrualOutcome, LevelingError> {
        let retry_after_ms = self.cooldown_remaining(record, now);
        if retry_after_ms > 0 {
            return Ok(AccrualOutcome::CoolingDown { retry_after_ms });
        }

        let mut next = record.clone();
        next.xp = next.xp.saturating_add(amount);
        next.total_xp = next.total_xp.saturating_add(amount);

        let mut levels_gained = 0;
        loop {
            let threshold = xp_to_next_level(next.level)?;
            if next.xp < threshold {
                break;
            }

            next.level += 1;
            next.xp -= threshold;
            levels_gained += 1;

            if self.level_up_mode == LevelUpMode::Single {
                break;
            }
        }

        next.last_updated = now;
        *record = next;
        Ok(AccrualOutcome::Accrued { levels_gained })
    }
}

pub fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::{AccrualOutcome, AccrualPolicy, LevelUpMode};
    use crate::impls::formula::xp_for;
    use crate::model::leveling::UserRecord;

    const T0: u64 = 1_700_000_000_000;

    fn seeded(xp: u64, level: u64) -> UserRecord {
        UserRecord {
            xp,
            total_xp: xp + 500,
            level,
            last_updated: T0,
            ..UserRecord::bare(1, 2)
        }
    }

    #[test]
    fn grants_inside_the_window_are_dropped() {
        let policy = AccrualPolicy::default();
        let mut record = seeded(10, 1);
        let before = record.clone();

        let outcome = policy.apply(&mut record, 25, T0 + 59_000).unwrap();
        assert_eq!(outcome, AccrualOutcome::CoolingDown { retry_after_ms: 1_000 });
        assert_eq!(record, before);
    }

    #[test]
    fn grant_at_the_window_edge_counts() {
        let policy = AccrualPolicy::default();
        let mut record = seeded(10, 1);

        let outcome = policy.apply(&mut record, 5, T0 + 60_000).unwrap();
        assert_eq!(outcome, AccrualOutcome::Accrued { levels_gained: 0 });
        assert_eq!(record.xp, 15);
        assert_eq!(record.total_xp, 515);
        assert_eq!(record.last_updated, T0 + 60_000);
    }

    #[test]
    fn sub_second_remainders_still_gate_the_grant() {
        let policy = AccrualPolicy::default();
        let mut record = UserRecord {
            last_updated: 1_000_500,
            ..seeded(10, 1)
        };
        let before = record.clone();

        let outcome = policy.apply(&mut record, 25, 1_060_000).unwrap();
        assert_eq!(outcome, AccrualOutcome::CoolingDown { retry_after_ms: 500 });
        assert_eq!(record, before);

        let outcome = policy.apply(&mut record, 25, 1_060_500).unwrap();
        assert_eq!(outcome, AccrualOutcome::Accrued { levels_gained: 0 });
        assert_eq!(record.last_updated, 1_060_500);
    }

    #[test]
    fn crossing_the_threshold_levels_up_once() {
        let policy = AccrualPolicy::default();
        let mut record = seeded(50, 1);
        let threshold = xp_for(2).unwrap();

        let outcome = policy.apply(&mut record, 20, T0 + 120_000).unwrap();
        assert_eq!(outcome, AccrualOutcome::Accrued { levels_gained: 1 });
        assert_eq!(record.level, 2);
        assert_eq!(record.xp, 50 + 20 - threshold);
        assert_eq!(record.total_xp, 570);
    }

    #[test]
    fn single_mode_leaves_surplus_for_later() {
        let policy = AccrualPolicy::default();
        let mut record = seeded(0, 1);

        policy.apply(&mut record, 1_000, T0 + 60_000).unwrap();
        assert_eq!(record.level, 2);
        assert_eq!(record.xp, 1_000 - xp_for(2).unwrap());
        assert!(record.xp >= xp_for(3).unwrap());
    }

    #[test]
    fn cascade_mode_settles_below_the_next_threshold() {
        let policy = AccrualPolicy {
            level_up_mode: LevelUpMode::Cascade,
            ..AccrualPolicy::default()
        };
        let mut record = seeded(0, 1);

        let outcome = policy.apply(&mut record, 1_000, T0 + 60_000).unwrap();
        // 1000 - 57 - 117 - 181 - 249 - 321 = 75
        assert_eq!(outcome, AccrualOutcome::Accrued { levels_gained: 5 });
        assert_eq!(record.level, 6);
        assert_eq!(record.xp, 75);
        assert!(record.xp < xp_for(7).unwrap());
    }

    #[test]
    fn zero_amount_still_refreshes_the_timestamp() {
        let policy = AccrualPolicy::default();
        let mut record = seeded(10, 1);

        let outcome = policy.apply(&mut record, 0, T0 + 90_000).unwrap();
        assert_eq!(outcome, AccrualOutcome::Accrued { levels_gained: 0 });
        assert_eq!(record.xp, 10);
        assert_eq!(record.last_updated, T0 + 90_000);
    }
}
