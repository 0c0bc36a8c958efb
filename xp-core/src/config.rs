use std::env;

use anyhow::Context as _;
use rand::Rng;

use xp_database::impls::accrual::{ACCRUAL_COOLDOWN_SECS, AccrualPolicy, LevelUpMode};

pub use xp_database::cache::DEFAULT_REDIS_KEY_PREFIX;

pub const DEFAULT_MESSAGE_XP_MIN: u64 = 15;
pub const DEFAULT_MESSAGE_XP_MAX: u64 = 25;

/// Process configuration, read once at startup and handed to the parts that need it.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub discord_token: String,
    pub database_url: String,
    pub guild_id: u64,
    pub auto_run_migrations: bool,
    pub redis: Option<RedisConfig>,
    pub redis_key_prefix: String,
    pub accrual: AccrualPolicy,
    pub message_xp: MessageXp,
}

#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: Option<String>,
}

/// XP handed out for a qualifying chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageXp {
    pub min: u64,
    pub max: u64,
    pub announce_level_ups: bool,
}

impl Default for MessageXp {
    fn default() -> Self {
        Self {
            min: DEFAULT_MESSAGE_XP_MIN,
            max: DEFAULT_MESSAGE_XP_MAX,
            announce_level_ups: true,
        }
    }
}

impl MessageXp {
    /// Uniform draw from `[min, max]`; a reversed range is read as its swap.
    pub fn roll(&self) -> u64 {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        rand::thread_rng().gen_range(low..=high)
    }
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let discord_token = env::var("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let guild_id = env::var("DISCORD_GUILD_ID")
            .context("DISCORD_GUILD_ID is not set")?
            .trim()
            .parse::<u64>()
            .context("DISCORD_GUILD_ID is not a valid id")?;

        let redis = env_bool("REDIS_ENABLED", false).then(|| RedisConfig {
            url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
        });

        let level_up_mode = if env_bool("XP_CASCADE_LEVEL_UPS", false) {
            LevelUpMode::Cascade
        } else {
            LevelUpMode::Single
        };

        Ok(Self {
            discord_token,
            database_url,
            guild_id,
            auto_run_migrations: env_bool("AUTO_RUN_MIGRATIONS", true),
            redis,
            redis_key_prefix: env::var("REDIS_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_REDIS_KEY_PREFIX.to_owned()),
            accrual: AccrualPolicy {
                cooldown_secs: env_u64("XP_COOLDOWN_SECONDS", ACCRUAL_COOLDOWN_SECS),
                level_up_mode,
            },
            message_xp: MessageXp {
                min: env_u64("XP_MESSAGE_MIN", DEFAULT_MESSAGE_XP_MIN),
                max: env_u64("XP_MESSAGE_MAX", DEFAULT_MESSAGE_XP_MAX),
                announce_level_ups: env_bool("XP_ANNOUNCE_LEVEL_UPS", true),
            },
        })
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |value| parse_bool(&value))
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).map_or(default, |value| parse_u64_or(&value, default))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_u64_or(value: &str, default: u64) -> u64 {
    value.trim().parse::<u64>().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::{MessageXp, parse_bool, parse_u64_or};

    #[test]
    fn booleans_accept_common_spellings() {
        for value in ["1", "true", "YES", " on "] {
            assert!(parse_bool(value), "{value} should be true");
        }
        for value in ["0", "false", "off", "", "maybe"] {
            assert!(!parse_bool(value), "{value} should be false");
        }
    }

    #[test]
    fn malformed_numbers_use_the_default() {
        assert_eq!(parse_u64_or(" 90 ", 60), 90);
        assert_eq!(parse_u64_or("-5", 60), 60);
        assert_eq!(parse_u64_or("soon", 60), 60);
    }

    #[test]
    fn rolls_stay_in_range() {
        let xp = MessageXp::default();
        for _ in 0..200 {
            let amount = xp.roll();
            assert!((15..=25).contains(&amount));
        }

        let reversed = MessageXp {
            min: 9,
            max: 3,
            announce_level_ups: false,
        };
        assert!((3..=9).contains(&reversed.roll()));

        let fixed = MessageXp {
            min: 7,
            max: 7,
            ..MessageXp::default()
        };
        assert_eq!(fixed.roll(), 7);
    }
}
