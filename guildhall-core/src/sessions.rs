use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::util::random_string;

/// The authenticated identity bound to a session.
///
/// Derived fresh on every OAuth login and never persisted beyond the session.
/// The admin flag is computed once at login; role changes on the Discord side
/// require logging in again.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

struct SessionRecord {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

/// In-memory session table keyed by the opaque token carried in the session
/// cookie. A session lives at most [`Sessions::DURATION_IN_DAYS`] days from
/// creation, with no renewal, and nothing survives a restart.
#[derive(Default)]
pub struct Sessions {
    records: DashMap<String, SessionRecord>,
}

impl Sessions {
    pub const DURATION_IN_DAYS: i64 = 7;

    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an identity to a fresh session token, sweeping expired sessions
    /// while at it.
    pub fn start(&self, identity: Identity) -> String {
        self.clear_expired();

        let token = random_string(32);
        let expires_at = Utc::now() + Duration::days(Self::DURATION_IN_DAYS);

        self.records
            .insert(token.clone(), SessionRecord { identity, expires_at });

        token
    }

    /// Returns the identity bound to a token, if that session is still alive.
    pub fn identity(&self, token: &str) -> Option<Identity> {
        let record = self.records.get(token)?;

        if record.expires_at <= Utc::now() {
            return None;
        }

        Some(record.identity.clone())
    }

    /// Invalidates a session. Idempotent: succeeds whether or not the token
    /// was known.
    pub fn end(&self, token: &str) {
        self.records.remove(token);
    }

    fn clear_expired(&self) {
        let now = Utc::now();
        self.records.retain(|_, record| record.expires_at > now);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn identity(name: &str, is_admin: bool) -> Identity {
        Identity {
            id: "42".to_string(),
            username: name.to_string(),
            is_admin,
        }
    }

    fn expired_record(name: &str) -> SessionRecord {
        SessionRecord {
            identity: identity(name, false),
            expires_at: Utc::now() - Duration::minutes(1),
        }
    }

    #[test]
    fn started_session_resolves_to_its_identity() {
        let sessions = Sessions::new();

        let token = sessions.start(identity("sylvanas", true));
        let resolved = sessions.identity(&token).unwrap();

        assert_eq!(resolved.username, "sylvanas");
        assert!(resolved.is_admin);
    }

    #[test]
    fn expired_session_resolves_to_none() {
        let sessions = Sessions::new();
        sessions
            .records
            .insert("stale".to_string(), expired_record("arthas"));

        assert!(sessions.identity("stale").is_none());
    }

    #[test]
    fn ending_a_session_is_idempotent() {
        let sessions = Sessions::new();
        let token = sessions.start(identity("tyrande", false));

        sessions.end(&token);
        sessions.end(&token);
        sessions.end("never-existed");

        assert!(sessions.identity(&token).is_none());
    }

    #[test]
    fn starting_a_session_sweeps_expired_ones() {
        let sessions = Sessions::new();
        sessions
            .records
            .insert("stale".to_string(), expired_record("arthas"));

        sessions.start(identity("jaina", false));

        assert_eq!(sessions.records.len(), 1);
    }
}
