mod memory;
mod postgres;

use std::future::Future;

use crate::model::leveling::UserRecord;

pub use memory::MemoryUserRecordStore;
pub use postgres::PgUserRecordStore;

/// Persistence boundary for leveling records, keyed by `(guild_id, user_id)`.
///
/// Implementations must match the composite key exactly and return guild
/// scans sorted by `total_xp` descending with a stable tiebreak.
pub trait UserRecordStore: Send + Sync {
    fn find_one(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> impl Future<Output = anyhow::Result<Option<UserRecord>>> + Send;

    fn insert(&self, record: &UserRecord) -> impl Future<Output = anyhow::Result<UserRecord>> + Send;

    /// Overwrite the mutable fields of an existing record.
    fn save(&self, record: &UserRecord) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn delete_one(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> impl Future<Output = anyhow::Result<Option<UserRecord>>> + Send;

    fn find_all_sorted_by_total_xp_desc(
        &self,
        guild_id: u64,
    ) -> impl Future<Output = anyhow::Result<Vec<UserRecord>>> + Send;
}
