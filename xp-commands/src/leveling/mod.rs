pub mod embeds;
pub mod identity;
pub mod leaderboard;
pub mod rank;
pub mod resetxp;
pub mod xpfor;
