use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::leveling::UserRecord;
use crate::store::UserRecordStore;

/// Insertion-ordered in-process store. Guild scans use a stable sort, so
/// records with equal `total_xp` keep their insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserRecordStore {
    records: Arc<RwLock<Vec<UserRecord>>>,
}

impl MemoryUserRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl UserRecordStore for MemoryUserRecordStore {
    async fn find_one(&self, guild_id: u64, user_id: u64) -> anyhow::Result<Option<UserRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| record.is_for(guild_id, user_id))
            .cloned())
    }

    async fn insert(&self, record: &UserRecord) -> anyhow::Result<UserRecord> {
        let mut records = self.records.write().await;
        anyhow::ensure!(
            !records
                .iter()
                .any(|existing| existing.is_for(record.guild_id, record.user_id)),
            "duplicate record for guild {} user {}",
            record.guild_id,
            record.user_id
        );

        records.push(record.clone());
        Ok(record.clone())
    }

    async fn save(&self, record: &UserRecord) -> anyhow::Result<()> {
        let mut records = self.records.write().await;
        let Some(slot) = records
            .iter_mut()
            .find(|existing| existing.is_for(record.guild_id, record.user_id))
        else {
            anyhow::bail!(
                "no record for guild {} user {}",
                record.guild_id,
                record.user_id
            );
        };

        *slot = record.clone();
        Ok(())
    }

    async fn delete_one(&self, guild_id: u64, user_id: u64) -> anyhow::Result<Option<UserRecord>> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|record| record.is_for(guild_id, user_id));

        Ok(index.map(|index| records.remove(index)))
    }

    async fn find_all_sorted_by_total_xp_desc(
        &self,
        guild_id: u64,
    ) -> anyhow::Result<Vec<UserRecord>> {
        let mut guild_records: Vec<UserRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.guild_id == guild_id)
            .cloned()
            .collect();

        guild_records.sort_by(|left, right| right.total_xp.cmp(&left.total_xp));
        Ok(guild_records)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryUserRecordStore;
    use crate::model::leveling::UserRecord;
    use crate::store::UserRecordStore;

    fn record(guild_id: u64, user_id: u64, total_xp: u64) -> UserRecord {
        UserRecord {
            total_xp,
            ..UserRecord::bare(guild_id, user_id)
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_keys() {
        let store = MemoryUserRecordStore::new();
        store.insert(&record(1, 10, 0)).await.expect("first insert");
        assert!(store.insert(&record(1, 10, 5)).await.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn guild_scan_is_sorted_and_scoped() {
        let store = MemoryUserRecordStore::new();
        for (user_id, total) in [(10, 5), (11, 50), (12, 5), (13, 20)] {
            store.insert(&record(1, user_id, total)).await.expect("insert");
        }
        store.insert(&record(2, 99, 1_000)).await.expect("insert");

        let scan = store
            .find_all_sorted_by_total_xp_desc(1)
            .await
            .expect("scan");
        let users: Vec<u64> = scan.iter().map(|record| record.user_id).collect();
        assert_eq!(users, vec![11, 13, 10, 12]);
    }

    #[tokio::test]
    async fn save_requires_an_existing_row() {
        let store = MemoryUserRecordStore::new();
        assert!(store.save(&record(1, 10, 3)).await.is_err());

        store.insert(&record(1, 10, 0)).await.expect("insert");
        store.save(&record(1, 10, 3)).await.expect("save");
        let found = store.find_one(1, 10).await.expect("find").expect("present");
        assert_eq!(found.total_xp, 3);
    }
}
