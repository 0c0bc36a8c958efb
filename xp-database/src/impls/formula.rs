use std::num::IntErrorKind;

use crate::error::LevelingError;

// Cumulative curve: xp_for(level) = 2 * level^2 + 50 * level - 51
const CURVE_QUADRATIC: i128 = 2;
const CURVE_LINEAR: i128 = 50;
const CURVE_OFFSET: i128 = 51;

/// XP threshold to reach `target_level`.
///
/// The curve is strictly increasing from level 1 onwards, so every level
/// costs more than the one before it. Levels below 1 are a range error.
pub fn xp_for(target_level: i64) -> Result<u64, LevelingError> {
    if target_level < 1 {
        return Err(LevelingError::OutOfRange(
            "target level should be a positive number",
        ));
    }

    let level = i128::from(target_level);
    let xp = level
        .checked_mul(level)
        .and_then(|squared| squared.checked_mul(CURVE_QUADRATIC))
        .and_then(|quadratic| quadratic.checked_add(CURVE_LINEAR * level))
        .map(|sum| sum - CURVE_OFFSET)
        .ok_or(LevelingError::OutOfRange("target level is too large"))?;

    u64::try_from(xp).map_err(|_| LevelingError::OutOfRange("target level is too large"))
}

/// Parse user-typed text as a level and compute its threshold.
pub fn xp_for_input(raw: &str) -> Result<u64, LevelingError> {
    let target_level = raw.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => LevelingError::OutOfRange("target level is too large"),
        IntErrorKind::NegOverflow => {
            LevelingError::OutOfRange("target level should be a positive number")
        }
        _ => LevelingError::InvalidArgument("target level should be a valid number"),
    })?;

    xp_for(target_level)
}

/// XP a member at `level` has to bank before the next level-up.
pub fn xp_to_next_level(level: u64) -> Result<u64, LevelingError> {
    let next = level
        .checked_add(1)
        .and_then(|next| i64::try_from(next).ok())
        .ok_or(LevelingError::OutOfRange("level is too large"))?;

    xp_for(next)
}

#[cfg(test)]
mod tests {
    use super::{xp_for, xp_for_input, xp_to_next_level};
    use crate::error::LevelingError;

    #[test]
    fn known_thresholds() {
        assert_eq!(xp_for(1).unwrap(), 1);
        assert_eq!(xp_for(2).unwrap(), 57);
        assert_eq!(xp_for(3).unwrap(), 117);
        assert_eq!(xp_for(10).unwrap(), 649);
        assert_eq!(xp_to_next_level(1).unwrap(), 57);
    }

    #[test]
    fn curve_is_strictly_increasing() {
        let mut previous = xp_for(1).unwrap();
        for level in 2..=5_000 {
            let current = xp_for(level).unwrap();
            assert!(current > previous, "level {level} did not grow");
            previous = current;
        }
    }

    #[test]
    fn each_level_costs_more_than_the_last() {
        let steps: Vec<u64> = (1..=50)
            .map(|level| xp_for(level + 1).unwrap() - xp_for(level).unwrap())
            .collect();
        assert!(steps.windows(2).all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn levels_below_one_are_out_of_range() {
        assert!(matches!(xp_for(0), Err(LevelingError::OutOfRange(_))));
        assert!(matches!(xp_for(-1), Err(LevelingError::OutOfRange(_))));
        assert!(matches!(xp_for(i64::MIN), Err(LevelingError::OutOfRange(_))));
    }

    #[test]
    fn huge_levels_do_not_overflow() {
        assert!(matches!(xp_for(i64::MAX), Err(LevelingError::OutOfRange(_))));
        assert!(matches!(
            xp_to_next_level(u64::MAX),
            Err(LevelingError::OutOfRange(_))
        ));
    }

    #[test]
    fn parses_text_input() {
        assert_eq!(xp_for_input(" 3 ").unwrap(), 117);
        assert!(matches!(
            xp_for_input("abc"),
            Err(LevelingError::InvalidArgument(_))
        ));
        assert!(matches!(xp_for_input(""), Err(LevelingError::InvalidArgument(_))));
        assert!(matches!(xp_for_input("0"), Err(LevelingError::OutOfRange(_))));
        assert!(matches!(
            xp_for_input("99999999999999999999"),
            Err(LevelingError::OutOfRange(_))
        ));
    }
}
