/// Confirm/decline button prompts.
pub mod confirmation;
/// Embed colors and builders shared across commands.
pub mod embed;
/// Pure text formatting for leaderboards and rank cards.
pub mod formatting;
/// Leaderboard presentation: ranked records to display entries.
pub mod leaderboard;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Button-driven embed pagination.
pub mod pagination;
