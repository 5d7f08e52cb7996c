//! JSON-file registry

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{DeviceRecord, DeviceRegistry, RegistryDocument, RegistryError, RegistryResult};

/// Registry persisted as one pretty-printed JSON document
///
/// The whole document is rewritten after every mutation, via a temporary file
/// renamed over the original.
#[derive(Debug)]
pub struct JsonFileRegistry {
    path: PathBuf,
    document: Mutex<RegistryDocument>,
}

impl JsonFileRegistry {
    /// Open the registry at `path`, starting empty if the file does not exist
    pub async fn open(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref().to_path_buf();

        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| RegistryError::Corrupt {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Registry file not found, starting empty");
                RegistryDocument::default()
            }
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), devices = document.devices.len(), "Opened registry");
        Ok(Self { path, document: Mutex::new(document) })
    }

    /// File backing this registry
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &RegistryDocument) -> RegistryResult<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DeviceRegistry for JsonFileRegistry {
    async fn list_devices(&self, venue: &str, limit: usize) -> RegistryResult<Vec<DeviceRecord>> {
        Ok(self.document.lock().await.list(venue, limit))
    }

    async fn create_device(&self, record: DeviceRecord) -> RegistryResult<DeviceRecord> {
        let mut document = self.document.lock().await;
        let created = document.insert(record).map_err(RegistryError::DuplicateDevice)?;
        self.persist(&document).await?;
        Ok(created)
    }

    async fn latest_sample_time(&self, venue: &str) -> RegistryResult<Option<i64>> {
        Ok(self.document.lock().await.latest_sample_times.get(venue).copied())
    }

    async fn record_sample_time(&self, venue: &str, millis: i64) -> RegistryResult<()> {
        let mut document = self.document.lock().await;
        document.record_time(venue, millis);
        self.persist(&document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceId;

    fn record(id: &str, venue: &str) -> DeviceRecord {
        DeviceRecord {
            id: DeviceId::from_existing(id),
            venue: venue.into(),
            device_type: "iPhone 8".into(),
            name: "Security iPhone 8".into(),
        }
    }

    #[tokio::test]
    async fn test_registry_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let registry = JsonFileRegistry::open(&path).await.unwrap();
        registry.create_device(record("a", "arena")).await.unwrap();
        registry.create_device(record("b", "mall")).await.unwrap();
        registry.record_sample_time("arena", 1_234).await.unwrap();
        drop(registry);

        let reopened = JsonFileRegistry::open(&path).await.unwrap();
        let arena = reopened.list_devices("arena", 10).await.unwrap();
        assert_eq!(arena.len(), 1);
        assert_eq!(arena[0].id.as_str(), "a");
        assert_eq!(reopened.latest_sample_time("arena").await.unwrap(), Some(1_234));
        assert_eq!(reopened.latest_sample_time("mall").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, "not json").unwrap();

        let result = JsonFileRegistry::open(&path).await;
        assert!(matches!(result, Err(RegistryError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_device_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let registry = JsonFileRegistry::open(dir.path().join("r.json")).await.unwrap();
        registry.create_device(record("a", "arena")).await.unwrap();

        let result = registry.create_device(record("a", "arena")).await;
        assert!(matches!(result, Err(RegistryError::DuplicateDevice(_))));
    }
}
