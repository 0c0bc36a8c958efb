pub mod cache;
pub mod database;
pub mod error;
pub mod impls;
pub mod model;
pub mod store;

pub use cache::CacheService;
pub use database::{Database, MIGRATOR};
pub use error::LevelingError;
pub use impls::leveling::Leveling;
pub use store::{MemoryUserRecordStore, PgUserRecordStore, UserRecordStore};
