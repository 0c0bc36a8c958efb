use std::future::Future;

use tokio::task::JoinSet;
use tracing::warn;

use xp_database::impls::leaderboard::rank_positions;
use xp_database::model::leveling::UserRecord;

/// Shown when a member's name cannot be determined.
pub const UNKNOWN_USER_PLACEHOLDER: &str = "?";

/// Live display-name lookup, potentially remote and slow.
pub trait IdentityResolver: Clone + Send + Sync + 'static {
    fn resolve(&self, user_id: u64) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// Synchronous lookup in identity data already held in memory.
pub trait LocalIdentityCache {
    fn cached_name(&self, user_id: u64) -> Option<String>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Resolve every entry through [`IdentityResolver`].
    #[default]
    ResolveAll,
    /// Only use [`LocalIdentityCache`], never leave the process.
    CacheOnly,
}

/// Display-ready leaderboard row. Rendering of `username` is left to
/// [`crate::formatting::format_leaderboard_name`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub guild_id: u64,
    pub user_id: u64,
    pub xp: u64,
    pub total_xp: u64,
    pub level: u64,
    pub position: usize,
    pub username: String,
}

/// Turn a ranked leaderboard into display entries, keeping its order.
///
/// In [`ResolveMode::ResolveAll`] names are resolved concurrently; a failed
/// or panicked lookup falls back to the local cache and then to the placeholder.
pub async fn compute_leaderboard<R>(
    identity: &R,
    leaderboard: &[UserRecord],
    mode: ResolveMode,
) -> Vec<LeaderboardEntry>
where
    R: IdentityResolver + LocalIdentityCache,
{
    if leaderboard.is_empty() {
        return Vec::new();
    }

    let names = match mode {
        ResolveMode::ResolveAll => resolve_all(identity, leaderboard).await,
        ResolveMode::CacheOnly => leaderboard
            .iter()
            .map(|record| identity.cached_name(record.user_id))
            .collect(),
    };

    let positions = rank_positions(leaderboard);
    leaderboard
        .iter()
        .zip(names)
        .enumerate()
        .map(|(index, (record, name))| LeaderboardEntry {
            guild_id: record.guild_id,
            user_id: record.user_id,
            xp: record.xp,
            total_xp: record.total_xp,
            level: record.level,
            position: positions
                .get(&(record.guild_id, record.user_id))
                .copied()
                .unwrap_or(index + 1),
            username: name.unwrap_or_else(|| UNKNOWN_USER_PLACEHOLDER.to_owned()),
        })
        .collect()
}

async fn resolve_all<R>(identity: &R, leaderboard: &[UserRecord]) -> Vec<Option<String>>
where
    R: IdentityResolver + LocalIdentityCache,
{
    let mut lookups = JoinSet::new();
    for (index, record) in leaderboard.iter().enumerate() {
        let identity = identity.clone();
        let user_id = record.user_id;
        lookups.spawn(async move { (index, identity.resolve(user_id).await) });
    }

    // A failed task does not report its index, so every slot starts from the cache.
    let mut names: Vec<Option<String>> = leaderboard
        .iter()
        .map(|record| identity.cached_name(record.user_id))
        .collect();
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((index, Ok(name))) => names[index] = Some(name),
            Ok((index, Err(source))) => {
                let user_id = leaderboard[index].user_id;
                warn!(?source, user_id, "failed to resolve leaderboard name");
            }
            Err(source) => warn!(?source, "leaderboard name lookup task failed"),
        }
    }

    names
}
