use async_trait::async_trait;

use crate::error::Result;
use crate::models::ThoughtTable;

/// Durable home of the thought table.
///
/// The table is always read and written whole: `save` replaces whatever was
/// stored before, and a later `load` must never observe a partial write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThoughtStore: Send + Sync {
    /// Current table, or an empty one when nothing has been stored yet
    async fn load(&self) -> Result<ThoughtTable>;

    /// Replace the stored table with `table`
    async fn save(&self, table: &ThoughtTable) -> Result<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}
