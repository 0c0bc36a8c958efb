use anyhow::Context as _;

use crate::database::Database;
use crate::model::leveling::UserRecord;
use crate::store::UserRecordStore;

#[derive(sqlx::FromRow)]
struct UserLevelRow {
    guild_id: i64,
    user_id: i64,
    xp: i64,
    total_xp: i64,
    level: i64,
    last_updated: i64,
}

/// `user_levels` table access through the shared pool.
#[derive(Clone, Debug)]
pub struct PgUserRecordStore {
    db: Database,
}

impl PgUserRecordStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl UserRecordStore for PgUserRecordStore {
    async fn find_one(&self, guild_id: u64, user_id: u64) -> anyhow::Result<Option<UserRecord>> {
        let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
        let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

        let row: Option<UserLevelRow> = sqlx::query_as(
            "SELECT guild_id, user_id, xp, total_xp, level, last_updated
             FROM user_levels
             WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(guild_id_i64)
        .bind(user_id_i64)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(to_user_record).transpose()
    }

    async fn insert(&self, record: &UserRecord) -> anyhow::Result<UserRecord> {
        let row = RowValues::try_from(record)?;

        let inserted: UserLevelRow = sqlx::query_as(
            "INSERT INTO user_levels (guild_id, user_id, xp, total_xp, level, last_updated)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING guild_id, user_id, xp, total_xp, level, last_updated",
        )
        .bind(row.guild_id)
        .bind(row.user_id)
        .bind(row.xp)
        .bind(row.total_xp)
        .bind(row.level)
        .bind(row.last_updated)
        .fetch_one(self.db.pool())
        .await?;

        to_user_record(inserted)
    }

    async fn save(&self, record: &UserRecord) -> anyhow::Result<()> {
        let row = RowValues::try_from(record)?;

        let updated = sqlx::query(
            "UPDATE user_levels
             SET xp = $3, total_xp = $4, level = $5, last_updated = $6
             WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(row.guild_id)
        .bind(row.user_id)
        .bind(row.xp)
        .bind(row.total_xp)
        .bind(row.level)
        .bind(row.last_updated)
        .execute(self.db.pool())
        .await?
        .rows_affected();

        anyhow::ensure!(
            updated == 1,
            "no user_levels row for guild {} user {}",
            record.guild_id,
            record.user_id
        );

        Ok(())
    }

    async fn delete_one(&self, guild_id: u64, user_id: u64) -> anyhow::Result<Option<UserRecord>> {
        let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
        let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

        let row: Option<UserLevelRow> = sqlx::query_as(
            "DELETE FROM user_levels
             WHERE guild_id = $1 AND user_id = $2
             RETURNING guild_id, user_id, xp, total_xp, level, last_updated",
        )
        .bind(guild_id_i64)
        .bind(user_id_i64)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(to_user_record).transpose()
    }

    async fn find_all_sorted_by_total_xp_desc(
        &self,
        guild_id: u64,
    ) -> anyhow::Result<Vec<UserRecord>> {
        let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

        // id breaks ties in insertion order so equal totals keep a fixed rank.
        let rows: Vec<UserLevelRow> = sqlx::query_as(
            "SELECT guild_id, user_id, xp, total_xp, level, last_updated
             FROM user_levels
             WHERE guild_id = $1
             ORDER BY total_xp DESC, id ASC",
        )
        .bind(guild_id_i64)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(to_user_record).collect()
    }
}

struct RowValues {
    guild_id: i64,
    user_id: i64,
    xp: i64,
    total_xp: i64,
    level: i64,
    last_updated: i64,
}

impl TryFrom<&UserRecord> for RowValues {
    type Error = anyhow::Error;

    fn try_from(record: &UserRecord) -> anyhow::Result<Self> {
        Ok(Self {
            guild_id: i64::try_from(record.guild_id).context("guild_id out of i64 range")?,
            user_id: i64::try_from(record.user_id).context("user_id out of i64 range")?,
            xp: i64::try_from(record.xp).context("xp out of i64 range")?,
            total_xp: i64::try_from(record.total_xp).context("total_xp out of i64 range")?,
            level: i64::try_from(record.level).context("level out of i64 range")?,
            last_updated: i64::try_from(record.last_updated)
                .context("last_updated out of i64 range")?,
        })
    }
}

fn to_user_record(row: UserLevelRow) -> anyhow::Result<UserRecord> {
    Ok(UserRecord {
        guild_id: u64::try_from(row.guild_id).context("guild_id row out of u64 range")?,
        user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
        xp: u64::try_from(row.xp).context("xp row out of u64 range")?,
        total_xp: u64::try_from(row.total_xp).context("total_xp row out of u64 range")?,
        level: u64::try_from(row.level).context("level row out of u64 range")?,
        last_updated: u64::try_from(row.last_updated)
            .context("last_updated row out of u64 range")?,
    })
}
