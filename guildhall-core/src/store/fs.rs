use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use super::{DocumentStore, StoreError, StoreResult};

/// Keeps each collection in one pretty-printed JSON file inside a data
/// directory, created on first write.
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }
}

fn io_error(collection: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        collection: collection.to_string(),
        source,
    }
}

#[async_trait]
impl DocumentStore for FsStore {
    async fn read(&self, collection: &str) -> StoreResult<Option<Value>> {
        let raw = match fs::read_to_string(self.path_for(collection)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(collection, e)),
        };

        let document = serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
            collection: collection.to_string(),
            source: e,
        })?;

        Ok(Some(document))
    }

    async fn write(&self, collection: &str, document: Value) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(collection, e))?;

        let payload = serde_json::to_string_pretty(&document).map_err(|e| StoreError::Malformed {
            collection: collection.to_string(),
            source: e,
        })?;

        fs::write(self.path_for(collection), payload)
            .await
            .map_err(|e| io_error(collection, e))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::{models::Member, store::Collections};

    #[tokio::test]
    async fn missing_collection_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = FsStore::new(dir.path());

        let document = store.read("members").await.unwrap();

        assert!(document.is_none());
    }

    #[tokio::test]
    async fn written_document_reads_back() {
        let dir = tempdir().unwrap();
        let store = FsStore::new(dir.path());

        let document = json!([{ "id": "1" }]);
        store.write("raids", document.clone()).await.unwrap();

        let read_back = store.read("raids").await.unwrap();

        assert_eq!(read_back, Some(document));
    }

    #[tokio::test]
    async fn malformed_document_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("loot.json"), "{not json").unwrap();

        let store = FsStore::new(dir.path());
        let result = store.read("loot").await;

        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[tokio::test]
    async fn typed_collection_degrades_to_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("members.json"), "{not json").unwrap();

        let collections = Collections::new(FsStore::new(dir.path()));
        let members = collections.members().read().await;

        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn typed_collection_round_trips() {
        let dir = tempdir().unwrap();
        let collections = Collections::new(FsStore::new(dir.path()));

        let member: Member = serde_json::from_value(json!({
            "id": "1700000000000",
            "name": "Jaina",
            "class": "Mage",
            "race": "Human",
            "faction": "Alliance",
            "role": "DPS"
        }))
        .unwrap();

        collections.members().write(&[member]).await.unwrap();
        let roster = collections.members().read().await;

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Jaina");
    }

    #[tokio::test]
    async fn singleton_document_defaults_until_written() {
        let dir = tempdir().unwrap();
        let collections = Collections::new(FsStore::new(dir.path()));

        let config = collections.config().read().await;
        assert!(!config.setup_complete);

        let mut config = config;
        config.name = "Ashes of Lordaeron".to_string();
        config.setup_complete = true;
        collections.config().write(&config).await.unwrap();

        let read_back = collections.config().read().await;
        assert!(read_back.setup_complete);
        assert_eq!(read_back.name, "Ashes of Lordaeron");
    }
}
