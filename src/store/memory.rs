use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ThoughtStore;
use crate::error::Result;
use crate::models::ThoughtTable;

/// Process-local store.
///
/// Keeps the serialized snapshot rather than the live table so that loads hand
/// out independent copies and go through the same JSON encoding as the durable
/// backends.
#[derive(Default)]
pub struct MemoryThoughtStore {
    snapshot: RwLock<Option<String>>,
}

impl MemoryThoughtStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored representation, if anything has been saved
    pub async fn snapshot(&self) -> Option<String> {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl ThoughtStore for MemoryThoughtStore {
    async fn load(&self) -> Result<ThoughtTable> {
        match self.snapshot.read().await.as_deref() {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(ThoughtTable::new()),
        }
    }

    async fn save(&self, table: &ThoughtTable) -> Result<()> {
        let raw = serde_json::to_string(table)?;
        *self.snapshot.write().await = Some(raw);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Thought;

    #[tokio::test]
    async fn test_empty_then_round_trip() {
        let store = MemoryThoughtStore::new();
        assert!(store.load().await.unwrap().is_empty());
        assert!(store.snapshot().await.is_none());

        let table: ThoughtTable = vec![Thought::new("idea".into(), true, false, None, None)]
            .into_iter()
            .collect();
        store.save(&table).await.unwrap();
        assert_eq!(store.load().await.unwrap(), table);

        let first = store.snapshot().await.unwrap();
        let reloaded = store.load().await.unwrap();
        store.save(&reloaded).await.unwrap();
        assert_eq!(store.snapshot().await.unwrap(), first);
    }

    #[test]
    fn test_loads_hand_out_independent_copies() {
        let store = MemoryThoughtStore::new();
        let table: ThoughtTable = vec![Thought::new("idea".into(), false, true, None, None)]
            .into_iter()
            .collect();
        tokio_test::block_on(store.save(&table)).unwrap();

        let mut loaded = tokio_test::block_on(store.load()).unwrap();
        assert!(loaded.insert(Thought::new("unsaved".into(), true, true, None, None)));
        assert_eq!(loaded.len(), 2);

        assert_eq!(tokio_test::block_on(store.load()).unwrap(), table);
    }
}
