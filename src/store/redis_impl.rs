use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use super::ThoughtStore;
use crate::error::{Result, ThinkingError};
use crate::models::ThoughtTable;

/// Thought table stored as one JSON string under a single Redis key
pub struct RedisThoughtStore {
    pool: Pool,
    key: String,
}

impl RedisThoughtStore {
    /// Create the connection pool and verify the server answers
    pub async fn connect(redis_url: &str, key: String) -> Result<Self> {
        tracing::info!("Connecting to Redis for thought table key '{}'", key);
        let cfg = Config::from_url(redis_url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| ThinkingError::Storage(format!("failed to create Redis pool: {}", e)))?;

        let mut conn = pool.get().await?;
        let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        tracing::info!("Redis connection established");

        Ok(Self { pool, key })
    }
}

#[async_trait]
impl ThoughtStore for RedisThoughtStore {
    async fn load(&self) -> Result<ThoughtTable> {
        let mut conn = self.pool.get().await?;
        let raw: Option<String> = conn.get(&self.key).await?;

        match raw {
            Some(raw) => {
                let table: ThoughtTable = serde_json::from_str(&raw)?;
                tracing::debug!("Loaded {} thoughts from Redis key {}", table.len(), self.key);
                Ok(table)
            }
            None => Ok(ThoughtTable::new()),
        }
    }

    async fn save(&self, table: &ThoughtTable) -> Result<()> {
        let raw = serde_json::to_string(table)?;
        let mut conn = self.pool.get().await?;
        // SET replaces the value in one step, so readers see old or new, never a mix
        let _: () = conn.set(&self.key, raw).await?;
        tracing::debug!("Saved {} thoughts to Redis key {}", table.len(), self.key);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("redis key {}", self.key)
    }
}
