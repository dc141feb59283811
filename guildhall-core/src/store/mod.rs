use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{CalendarEvent, Dungeon, GuildConfig, GuildInfo, LogEntry, Loot, Member, Raid};

mod fs;
pub use fs::*;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written
    #[error("collection {collection} could not be accessed: {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },
    /// The document exists but does not hold valid JSON
    #[error("collection {collection} holds malformed JSON: {source}")]
    Malformed {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Whole-document access to named JSON collections.
///
/// There are no partial updates: callers read the full document, mutate the
/// in-memory snapshot, and write it back. The store provides no locking, so
/// two interleaved writers to the same collection race with last-write-wins
/// semantics. Accepted for a single-process deployment.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Reads a whole document, `None` if it was never written.
    async fn read(&self, collection: &str) -> StoreResult<Option<Value>>;

    /// Overwrites a whole document.
    async fn write(&self, collection: &str, document: Value) -> StoreResult<()>;
}

/// The named collections making up the persisted state.
#[derive(Clone)]
pub struct Collections {
    store: Arc<dyn DocumentStore>,
}

impl Collections {
    pub fn new(store: impl DocumentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn config(&self) -> Document<GuildConfig> {
        Document::new(&self.store, "config")
    }

    pub fn guild(&self) -> Document<GuildInfo> {
        Document::new(&self.store, "guild")
    }

    pub fn members(&self) -> Collection<Member> {
        Collection::new(&self.store, "members")
    }

    pub fn calendar(&self) -> Collection<CalendarEvent> {
        Collection::new(&self.store, "calendar")
    }

    pub fn raids(&self) -> Collection<Raid> {
        Collection::new(&self.store, "raids")
    }

    pub fn dungeons(&self) -> Collection<Dungeon> {
        Collection::new(&self.store, "dungeons")
    }

    pub fn loot(&self) -> Collection<Loot> {
        Collection::new(&self.store, "loot")
    }

    pub fn logs(&self) -> Collection<LogEntry> {
        Collection::new(&self.store, "logs")
    }
}

/// Typed handle to a collection persisted as one JSON array.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
    marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(store: &Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self {
            store: store.clone(),
            name,
            marker: PhantomData,
        }
    }

    /// Reads the full collection, substituting an empty one when the document
    /// is missing or unreadable. Callers cannot tell the two apart, so the
    /// unreadable case is logged here before being degraded.
    pub async fn read(&self) -> Vec<T> {
        match self.store.read(self.name).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(items) => items,
                Err(e) => {
                    warn!("collection {} does not match its schema: {e}", self.name);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("substituting an empty {} collection: {e}", self.name);
                Vec::new()
            }
        }
    }

    /// Overwrites the full collection.
    pub async fn write(&self, items: &[T]) -> StoreResult<()> {
        let document = serde_json::to_value(items).map_err(|e| StoreError::Malformed {
            collection: self.name.to_string(),
            source: e,
        })?;

        self.store.write(self.name, document).await
    }
}

/// Typed handle to a singleton document, read with its default value until
/// first written.
pub struct Document<T> {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
    marker: PhantomData<fn() -> T>,
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn new(store: &Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self {
            store: store.clone(),
            name,
            marker: PhantomData,
        }
    }

    pub async fn read(&self) -> T {
        match self.store.read(self.name).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(document) => document,
                Err(e) => {
                    warn!("document {} does not match its schema: {e}", self.name);
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                warn!("substituting the default {} document: {e}", self.name);
                T::default()
            }
        }
    }

    pub async fn write(&self, document: &T) -> StoreResult<()> {
        let value = serde_json::to_value(document).map_err(|e| StoreError::Malformed {
            collection: self.name.to_string(),
            source: e,
        })?;

        self.store.write(self.name, value).await
    }
}
