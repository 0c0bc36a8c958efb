pub mod config;

use xp_database::{Database, Leveling, PgUserRecordStore};

pub use config::{BotConfig, MessageXp};

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub leveling: Leveling<PgUserRecordStore>,
    pub message_xp: MessageXp,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
