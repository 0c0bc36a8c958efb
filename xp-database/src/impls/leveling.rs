use tracing::{debug, error};

use crate::error::{LevelingError, require_id};
use crate::impls::accrual::{Accrual, AccrualOutcome, AccrualPolicy, now_unix_millis};
use crate::impls::leaderboard::{rank_position, top_ranked};
use crate::impls::locks::KeyLocks;
use crate::model::leveling::{LevelStanding, UserRecord};
use crate::store::UserRecordStore;

/// Leveling engine over a record store.
///
/// Mutations of one `(guild_id, user_id)` pair run one at a time within this
/// process. Store writes are not retried: a failed write is logged and the
/// in-memory result is still returned, so callers can observe a level-up or
/// a created record that never reached the database.
#[derive(Clone, Debug)]
pub struct Leveling<S> {
    store: S,
    policy: AccrualPolicy,
    locks: KeyLocks,
}

impl<S: UserRecordStore> Leveling<S> {
    pub fn new(store: S, policy: AccrualPolicy) -> Self {
        Self {
            store,
            policy,
            locks: KeyLocks::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> AccrualPolicy {
        self.policy
    }

    /// Create an existence-only record. Returns `None` when the pair already
    /// has one, which is left untouched.
    pub async fn create_user(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<UserRecord>, LevelingError> {
        require_id(guild_id, "a guild id was not provided")?;
        require_id(user_id, "a user id was not provided")?;

        let _guard = self.locks.lock(guild_id, user_id).await;
        if self.store.find_one(guild_id, user_id).await?.is_some() {
            return Ok(None);
        }

        let record = UserRecord::bare(guild_id, user_id);
        if let Err(source) = self.store.insert(&record).await {
            error!(?source, guild_id, user_id, "failed to create leveling record");
        }

        Ok(Some(record))
    }

    /// Delete the pair's record, returning it as it was before deletion.
    pub async fn delete_user(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<UserRecord>, LevelingError> {
        require_id(guild_id, "a guild id was not provided")?;
        require_id(user_id, "a user id was not provided")?;

        let _guard = self.locks.lock(guild_id, user_id).await;
        let Some(record) = self.store.find_one(guild_id, user_id).await? else {
            return Ok(None);
        };

        if let Err(source) = self.store.delete_one(guild_id, user_id).await {
            error!(?source, guild_id, user_id, "failed to delete leveling record");
        }

        Ok(Some(record))
    }

    /// Look up one record, optionally with its rank inside the guild.
    pub async fn fetch(
        &self,
        guild_id: u64,
        user_id: u64,
        include_position: bool,
    ) -> Result<Option<LevelStanding>, LevelingError> {
        require_id(guild_id, "a guild id was not provided")?;
        require_id(user_id, "a user id was not provided")?;

        let Some(record) = self.store.find_one(guild_id, user_id).await? else {
            return Ok(None);
        };

        let position = if include_position {
            let ranked = self.store.find_all_sorted_by_total_xp_desc(guild_id).await?;
            rank_position(&ranked, guild_id, user_id)
        } else {
            None
        };

        Ok(Some(LevelStanding { record, position }))
    }

    /// Top `limit` records of a guild by lifetime XP.
    pub async fn fetch_leaderboard(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<UserRecord>, LevelingError> {
        require_id(guild_id, "a guild id was not provided")?;
        if limit == 0 {
            return Err(LevelingError::InvalidArgument("a limit was not provided"));
        }

        let ranked = self.store.find_all_sorted_by_total_xp_desc(guild_id).await?;
        Ok(top_ranked(ranked, limit))
    }

    /// Grant `amount` XP and report whether the member levelled up.
    pub async fn append_xp(
        &self,
        guild_id: u64,
        user_id: u64,
        amount: u64,
    ) -> Result<bool, LevelingError> {
        Ok(self.accrue(guild_id, user_id, amount).await?.leveled_up())
    }

    pub async fn accrue(
        &self,
        guild_id: u64,
        user_id: u64,
        amount: u64,
    ) -> Result<Accrual, LevelingError> {
        self.accrue_at(guild_id, user_id, amount, now_unix_millis())
            .await
    }

    /// Same as [`Self::accrue`] with an explicit clock reading in unix milliseconds.
    pub async fn accrue_at(
        &self,
        guild_id: u64,
        user_id: u64,
        amount: u64,
        now: u64,
    ) -> Result<Accrual, LevelingError> {
        require_id(guild_id, "a guild id was not provided")?;
        require_id(user_id, "a user id was not provided")?;

        let _guard = self.locks.lock(guild_id, user_id).await;
        let Some(mut record) = self.store.find_one(guild_id, user_id).await? else {
            let record = UserRecord::first_grant(guild_id, user_id, amount, now);
            if let Err(source) = self.store.insert(&record).await {
                error!(?source, guild_id, user_id, "failed to save new leveling record");
            }

            return Ok(Accrual {
                record,
                outcome: AccrualOutcome::Created,
            });
        };

        let outcome = self.policy.apply(&mut record, amount, now)?;
        match outcome {
            AccrualOutcome::CoolingDown { retry_after_ms } => {
                debug!(guild_id, user_id, retry_after_ms, "xp grant dropped by cooldown");
            }
            _ => {
                if let Err(source) = self.store.save(&record).await {
                    error!(?source, guild_id, user_id, "failed to append xp");
                }
            }
        }

        Ok(Accrual { record, outcome })
    }
}
