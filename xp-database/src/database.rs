use sqlx::{PgPool, migrate::Migrator};

use crate::cache::{CacheService, DEFAULT_REDIS_KEY_PREFIX};

/// Embedded migrations for the `user_levels` schema.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Connection handle built once at startup and cloned into every component
/// that talks to PostgreSQL or the optional Redis cache.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: CacheService::disabled(DEFAULT_REDIS_KEY_PREFIX),
        }
    }

    pub fn with_cache(pool: PgPool, cache: CacheService) -> Self {
        Self { pool, cache }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::Database;
    use crate::cache::DEFAULT_REDIS_KEY_PREFIX;

    #[tokio::test]
    async fn plain_handle_uses_the_default_cache_prefix() {
        let pool = PgPool::connect_lazy("postgres://localhost/xp").expect("lazy pool");
        let db = Database::new(pool);

        assert!(!db.cache().is_redis_enabled());
        assert_eq!(
            db.cache().key("display_name:7"),
            format!("{DEFAULT_REDIS_KEY_PREFIX}:display_name:7")
        );
    }
}
