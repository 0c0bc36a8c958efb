pub mod accrual;
pub mod formula;
pub mod leaderboard;
pub mod leveling;
mod locks;
