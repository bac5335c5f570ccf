use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::{fs, sync::RwLock};
use tracing::{info, warn};

use crate::domain::Update;
use crate::errors::ServiceError;
use crate::store::UpdateStore;

/// File-backed update store.
///
/// The whole collection lives as one JSON array, newest entry first, cached
/// in memory and rewritten in full on every mutation. There is no cross-
/// process locking and no atomic rename: concurrent writers race with
/// last-writer-wins semantics, matching the documented contract.
pub struct JsonUpdateStore {
    inner: Arc<RwLock<Vec<Update>>>,
    file_path: PathBuf,
    backup_path: PathBuf,
}

impl JsonUpdateStore {
    /// Open (or initialize) the store.
    ///
    /// - A missing primary file is seeded from the backup file when one
    ///   exists (one-directional copy), otherwise created empty.
    /// - A malformed primary file fails with [`ServiceError::Corrupt`]
    ///   unless `recover_corrupt` is set, in which case the store is reset
    ///   to empty with a logged warning. Recovery discards all prior data.
    pub async fn new<P: Into<PathBuf>>(
        file_path: P,
        backup_path: P,
        recover_corrupt: bool,
    ) -> Result<Arc<Self>, ServiceError> {
        let file_path = file_path.into();
        let backup_path = backup_path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        if fs::metadata(&file_path).await.is_err() {
            if fs::metadata(&backup_path).await.is_ok() {
                fs::copy(&backup_path, &file_path).await?;
                info!(file = %file_path.display(), backup = %backup_path.display(), "restored updates file from backup");
            }
        }

        let updates: Vec<Update> = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(list) => list,
                Err(e) if recover_corrupt => {
                    warn!(file = %file_path.display(), error = %e, "updates file is corrupt; resetting to empty");
                    let empty: Vec<Update> = Vec::new();
                    fs::write(&file_path, serde_json::to_vec_pretty(&empty).map_err(|e| ServiceError::Io(e.to_string()))?).await?;
                    empty
                }
                Err(e) => {
                    return Err(ServiceError::Corrupt(format!(
                        "{}: {}",
                        file_path.display(),
                        e
                    )));
                }
            },
            Err(_) => {
                let empty: Vec<Update> = Vec::new();
                fs::write(&file_path, serde_json::to_vec_pretty(&empty).map_err(|e| ServiceError::Io(e.to_string()))?).await?;
                empty
            }
        };

        Ok(Arc::new(Self {
            inner: Arc::new(RwLock::new(updates)),
            file_path,
            backup_path,
        }))
    }

    /// Rewrite the whole document from the in-memory list.
    async fn save(&self) -> Result<(), ServiceError> {
        let list = self.inner.read().await;
        let data = serde_json::to_vec_pretty(&*list).map_err(|e| ServiceError::Io(e.to_string()))?;
        fs::write(&self.file_path, data).await?;
        Ok(())
    }

    /// Copy the live document over the backup file.
    pub async fn sync_backup(&self) -> Result<(), ServiceError> {
        let data = fs::read(&self.file_path).await?;
        if let Some(parent) = self.backup_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        fs::write(&self.backup_path, data).await?;
        info!(backup = %self.backup_path.display(), "backup synced");
        Ok(())
    }
}

#[async_trait]
impl UpdateStore for JsonUpdateStore {
    async fn list_all(&self) -> Result<Vec<Update>, ServiceError> {
        let list = self.inner.read().await;
        let mut out = list.clone();
        // Inserts prepend, so this is normally already the on-disk order;
        // sorting keeps the contract even for hand-edited files.
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Option<Update>, ServiceError> {
        let list = self.inner.read().await;
        Ok(list.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, update: Update) -> Result<(), ServiceError> {
        {
            let mut list = self.inner.write().await;
            list.insert(0, update);
        }
        self.save().await
    }

    async fn update_fields(
        &self,
        id: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        {
            let mut list = self.inner.write().await;
            match list.iter_mut().find(|u| u.id == id) {
                Some(found) => {
                    found.message = message.to_string();
                    found.timestamp = timestamp;
                }
                None => return Ok(false),
            }
        }
        self.save().await?;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        {
            let mut list = self.inner.write().await;
            match list.iter().position(|u| u.id == id) {
                Some(idx) => {
                    list.remove(idx);
                }
                None => return Ok(false),
            }
        }
        self.save().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("loopin_{}_{}.json", tag, uuid::Uuid::new_v4()))
    }

    async fn cleanup(paths: &[&PathBuf]) {
        for p in paths {
            let _ = fs::remove_file(p).await;
        }
    }

    #[tokio::test]
    async fn missing_file_initializes_empty() -> anyhow::Result<()> {
        let file = temp_path("primary");
        let backup = temp_path("backup");
        let store = JsonUpdateStore::new(&file, &backup, false).await?;
        assert!(store.list_all().await?.is_empty());
        // file was created so later reads do not fail
        assert!(fs::metadata(&file).await.is_ok());
        cleanup(&[&file, &backup]).await;
        Ok(())
    }

    #[tokio::test]
    async fn crud_round_trip_persists_across_reload() -> anyhow::Result<()> {
        let file = temp_path("primary");
        let backup = temp_path("backup");
        let store = JsonUpdateStore::new(&file, &backup, false).await?;

        let first = Update::new("Kamran Arbaz", "hello");
        let second = Update::new("Drishya CM", "news");
        store.insert(first.clone()).await?;
        store.insert(second.clone()).await?;

        let all = store.list_all().await?;
        assert_eq!(all.len(), 2);
        // newest first
        assert_eq!(all[0].id, second.id);
        assert_eq!(store.get(&first.id).await?.unwrap().message, "hello");

        let edited = store.update_fields(&first.id, "hello again", Utc::now()).await?;
        assert!(edited);

        // a fresh store over the same file sees the mutation
        let reloaded = JsonUpdateStore::new(&file, &backup, false).await?;
        let found = reloaded.get(&first.id).await?.unwrap();
        assert_eq!(found.message, "hello again");
        assert_eq!(found.name, "Kamran Arbaz");

        assert!(reloaded.delete(&first.id).await?);
        // second delete of the same id is a quiet not-found
        assert!(!reloaded.delete(&first.id).await?);
        assert_eq!(reloaded.list_all().await?.len(), 1);

        cleanup(&[&file, &backup]).await;
        Ok(())
    }

    #[tokio::test]
    async fn unknown_id_leaves_store_unchanged() -> anyhow::Result<()> {
        let file = temp_path("primary");
        let backup = temp_path("backup");
        let store = JsonUpdateStore::new(&file, &backup, false).await?;
        store.insert(Update::new("Abigail Das", "only entry")).await?;

        assert!(store.get("missing").await?.is_none());
        assert!(!store.update_fields("missing", "x", Utc::now()).await?);
        assert!(!store.delete("missing").await?);

        let all = store.list_all().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].message, "only entry");
        cleanup(&[&file, &backup]).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_fails_fast_by_default() -> anyhow::Result<()> {
        let file = temp_path("primary");
        let backup = temp_path("backup");
        fs::write(&file, b"{ not json").await?;

        let err = JsonUpdateStore::new(&file, &backup, false).await;
        assert!(matches!(err, Err(ServiceError::Corrupt(_))));
        cleanup(&[&file, &backup]).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_recovers_empty_when_opted_in() -> anyhow::Result<()> {
        let file = temp_path("primary");
        let backup = temp_path("backup");
        fs::write(&file, b"{ not json").await?;

        let store = JsonUpdateStore::new(&file, &backup, true).await?;
        assert!(store.list_all().await?.is_empty());
        // the file itself was reset, so a plain reopen succeeds
        let reopened = JsonUpdateStore::new(&file, &backup, false).await?;
        assert!(reopened.list_all().await?.is_empty());
        cleanup(&[&file, &backup]).await;
        Ok(())
    }

    #[tokio::test]
    async fn absent_primary_is_seeded_from_backup() -> anyhow::Result<()> {
        let file = temp_path("primary");
        let backup = temp_path("backup");
        let seeded = vec![Update::new("Kamran Arbaz", "from backup")];
        fs::write(&backup, serde_json::to_vec_pretty(&seeded)?).await?;

        let store = JsonUpdateStore::new(&file, &backup, false).await?;
        let all = store.list_all().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].message, "from backup");
        cleanup(&[&file, &backup]).await;
        Ok(())
    }

    #[tokio::test]
    async fn sync_backup_copies_live_document() -> anyhow::Result<()> {
        let file = temp_path("primary");
        let backup = temp_path("backup");
        let store = JsonUpdateStore::new(&file, &backup, false).await?;
        store.insert(Update::new("Drishya CM", "snapshot me")).await?;

        store.sync_backup().await?;

        let copied: Vec<Update> = serde_json::from_slice(&fs::read(&backup).await?)?;
        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].message, "snapshot me");
        cleanup(&[&file, &backup]).await;
        Ok(())
    }
}
