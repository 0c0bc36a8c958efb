use std::sync::Arc;

use poise::serenity_prelude as serenity;

use xp_database::CacheService;
use xp_database::cache::{DISPLAY_NAME_CACHE_TTL, display_name_key};
use xp_utils::leaderboard::{IdentityResolver, LocalIdentityCache};

/// Resolves member names through the Discord API, memoised in the optional
/// Redis cache, with the gateway cache as the local fallback.
#[derive(Clone)]
pub struct DiscordIdentity {
    http: Arc<serenity::Http>,
    gateway_cache: Arc<serenity::Cache>,
    names: CacheService,
}

impl DiscordIdentity {
    pub fn new(ctx: &serenity::Context, names: CacheService) -> Self {
        Self {
            http: Arc::clone(&ctx.http),
            gateway_cache: Arc::clone(&ctx.cache),
            names,
        }
    }
}

pub fn display_name(user: &serenity::User) -> String {
    user.global_name.clone().unwrap_or_else(|| user.name.clone())
}

impl IdentityResolver for DiscordIdentity {
    async fn resolve(&self, user_id: u64) -> anyhow::Result<String> {
        anyhow::ensure!(user_id != 0, "user id 0 cannot be resolved");

        let key = display_name_key(&self.names, user_id);
        let http = Arc::clone(&self.http);
        self.names
            .get_or_load_json(&key, DISPLAY_NAME_CACHE_TTL, || async move {
                let user = http.get_user(serenity::UserId::new(user_id)).await?;
                Ok(display_name(&user))
            })
            .await
    }
}

impl LocalIdentityCache for DiscordIdentity {
    fn cached_name(&self, user_id: u64) -> Option<String> {
        if user_id == 0 {
            return None;
        }

        self.gateway_cache
            .user(serenity::UserId::new(user_id))
            .map(|user| display_name(&user))
    }
}
