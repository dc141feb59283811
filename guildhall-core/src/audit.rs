use chrono::Utc;
use log::warn;
use serde_json::Value;

use crate::{models::LogEntry, store::Collections, util::timestamp_id};

/// Actor recorded when an action happens without a live session.
pub const UNKNOWN_ACTOR: &str = "unknown user";

/// Appends a structured record of every mutating action to the logs
/// collection.
///
/// Recording is a best-effort side effect: a failed write is warned about and
/// never fails the action that triggered it. Entries are append-only by
/// convention; ordering happens at read time.
#[derive(Clone)]
pub struct Audit {
    collections: Collections,
}

impl Audit {
    pub fn new(collections: &Collections) -> Self {
        Self {
            collections: collections.clone(),
        }
    }

    pub async fn record(&self, actor: &str, action: &str, description: String, details: Value) {
        let logs = self.collections.logs();

        let mut entries = logs.read().await;
        entries.push(LogEntry {
            id: timestamp_id(),
            timestamp: Utc::now(),
            username: actor.to_string(),
            action: action.to_string(),
            description,
            details,
        });

        if let Err(e) = logs.write(&entries).await {
            warn!("failed to record {action} in the audit log: {e}");
        }
    }

    /// The full audit trail, newest first.
    pub async fn entries(&self) -> Vec<LogEntry> {
        let mut entries = self.collections.logs().read().await;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::store::FsStore;

    #[tokio::test]
    async fn entries_come_back_newest_first() {
        let dir = tempdir().unwrap();
        let collections = Collections::new(FsStore::new(dir.path()));
        let audit = Audit::new(&collections);

        audit
            .record("admin", "MEMBER_CREATED", "Member added: Jaina".to_string(), json!({}))
            .await;
        audit
            .record("admin", "MEMBER_DELETED", "Member removed: Jaina".to_string(), json!({}))
            .await;

        let entries = audit.entries().await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "MEMBER_DELETED");
        assert!(entries[0].timestamp >= entries[1].timestamp);
    }

    #[tokio::test]
    async fn recording_against_a_broken_store_does_not_panic() {
        let dir = tempdir().unwrap();
        // a directory in place of the file makes every write fail
        std::fs::create_dir(dir.path().join("logs.json")).unwrap();

        let collections = Collections::new(FsStore::new(dir.path()));
        let audit = Audit::new(&collections);

        audit
            .record(UNKNOWN_ACTOR, "LOGOUT", "Logged out".to_string(), json!({}))
            .await;
    }
}
