pub mod leveling;
