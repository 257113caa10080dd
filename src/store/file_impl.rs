use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ThoughtStore;
use crate::error::Result;
use crate::models::ThoughtTable;

/// Thought table kept as a single JSON document on disk
pub struct FileThoughtStore {
    path: PathBuf,
}

impl FileThoughtStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the next snapshot is written to before it replaces the real one
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "thoughts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ThoughtStore for FileThoughtStore {
    async fn load(&self) -> Result<ThoughtTable> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No thought table at {}, starting empty", self.path.display());
                return Ok(ThoughtTable::new());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(ThoughtTable::new());
        }

        let table: ThoughtTable = serde_json::from_str(&raw)?;
        tracing::debug!("Loaded {} thoughts from {}", table.len(), self.path.display());
        Ok(table)
    }

    async fn save(&self, table: &ThoughtTable) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let raw = serde_json::to_string_pretty(table)?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, raw).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        tracing::debug!("Saved {} thoughts to {}", table.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind as ThinkingErrorKind;
    use crate::models::Thought;
    use tempfile::TempDir;

    fn sample_table() -> ThoughtTable {
        let root = Thought {
            id: "thought_root".to_string(),
            content: "What if we combined \"queues\" with its exact opposite?".to_string(),
            is_rebellion: false,
            challenges_assumption: true,
            branch_from_thought: None,
            branch_id: None,
            timestamp: 1_700_000_000_000,
        };
        let branch = Thought {
            id: "thought_branch".to_string(),
            content: "Unexpected connection: queues\nbut elsewhere".to_string(),
            is_rebellion: true,
            challenges_assumption: true,
            branch_from_thought: Some("thought_root".to_string()),
            branch_id: Some("branch_1".to_string()),
            timestamp: 1_700_000_000_123,
        };
        vec![root, branch].into_iter().collect()
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileThoughtStore::new(dir.path().join("thoughts.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileThoughtStore::new(dir.path().join("nested/state/thoughts.json"));
        let table = sample_table();

        store.save(&table).await.unwrap();
        assert_eq!(store.load().await.unwrap(), table);
        assert!(!store.staging_path().exists());
    }

    #[tokio::test]
    async fn test_resave_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = FileThoughtStore::new(dir.path().join("thoughts.json"));
        store.save(&sample_table()).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let loaded = store.load().await.unwrap();
        store.save(&loaded).await.unwrap();
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_reads_original_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("thoughts.json");
        std::fs::write(
            &path,
            r#"{"thought_1":{"id":"thought_1","content":"c","isRebellion":true,
                "challengesAssumption":false,"timestamp":1718000000000}}"#,
        )
        .unwrap();

        let table = FileThoughtStore::new(&path).load().await.unwrap();
        let thought = table.get("thought_1").unwrap();
        assert!(thought.is_rebellion);
        assert_eq!(thought.branch_id, None);
        assert_eq!(thought.timestamp, 1_718_000_000_000);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("thoughts.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileThoughtStore::new(&path).load().await.unwrap_err();
        assert_eq!(err.kind(), ThinkingErrorKind::StorageFailure);
    }
}
