mod traits;
mod file_impl;
mod redis_impl;
mod memory;

// Re-export the trait
pub use traits::ThoughtStore;

#[cfg(test)]
pub use traits::MockThoughtStore;

// Re-export the implementations
pub use file_impl::FileThoughtStore;
pub use redis_impl::RedisThoughtStore;
pub use memory::MemoryThoughtStore;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;

/// Build the store selected in configuration
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ThoughtStore>> {
    let store: Arc<dyn ThoughtStore> = match config.backend {
        StorageBackend::File => Arc::new(FileThoughtStore::new(config.path.clone())),
        StorageBackend::Redis => Arc::new(
            RedisThoughtStore::connect(&config.redis_url, config.redis_key.clone()).await?,
        ),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory thought store; thoughts will not survive a restart");
            Arc::new(MemoryThoughtStore::new())
        }
    };
    tracing::info!("Thought store ready: {}", store.describe());
    Ok(store)
}
