pub mod leveling;
pub mod utility;

use xp_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::usage::META,
    leveling::rank::META,
    leveling::leaderboard::META,
    leveling::xpfor::META,
    leveling::resetxp::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::help::help(),
        utility::usage::usage(),
        leveling::rank::rank(),
        leveling::leaderboard::leaderboard(),
        leveling::xpfor::xpfor(),
        leveling::resetxp::resetxp(),
    ]
}
