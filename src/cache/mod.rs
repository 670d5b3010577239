//! Property cache collaborator and machine snapshots.
//!
//! Hosts may rehydrate `user`/`count` from a key-value store before the
//! machine starts and persist them again as they change. The store is keyed
//! `"<namespace>:<property>"` with JSON string values; the core has no
//! dependency on the storage medium and consumes this module only through
//! the builder's rehydration step and explicit persist calls.
//!
//! Snapshots capture a whole machine (phase, session, transition log) for
//! diagnostics or resume across process restarts.

mod error;

pub use error::CacheError;

use crate::core::{Phase, Session, TransitionLog, User};
use crate::machine::CounterMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Cache key for the serialized user record.
pub const USER_PROPERTY: &str = "user";
/// Cache key for the serialized count.
pub const COUNT_PROPERTY: &str = "count";

/// Version identifier for the snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Compose a namespaced cache key.
pub fn cache_key(namespace: &str, property: &str) -> String {
    format!("{namespace}:{property}")
}

/// A key-value store of string properties.
///
/// Implementations are expected to behave like web session storage: string
/// keys, string values, last write wins.
pub trait PropertyCache {
    /// Read a value, `None` when absent.
    fn read(&self, key: &str) -> Option<String>;
    /// Write a value, replacing any existing one.
    fn write(&mut self, key: String, value: String);
    /// Remove a value if present.
    fn remove(&mut self, key: &str);
}

/// In-memory cache, mostly for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, String>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PropertyCache for MemoryCache {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Load a cached user record, `None` when the entry is absent.
pub fn load_user(
    cache: &impl PropertyCache,
    namespace: &str,
) -> Result<Option<User>, CacheError> {
    let Some(raw) = cache.read(&cache_key(namespace, USER_PROPERTY)) else {
        return Ok(None);
    };
    let user = serde_json::from_str(&raw).map_err(|source| CacheError::Decode {
        property: USER_PROPERTY.to_string(),
        source,
    })?;
    Ok(Some(user))
}

/// Load a cached count, `None` when the entry is absent.
pub fn load_count(
    cache: &impl PropertyCache,
    namespace: &str,
) -> Result<Option<u32>, CacheError> {
    let Some(raw) = cache.read(&cache_key(namespace, COUNT_PROPERTY)) else {
        return Ok(None);
    };
    let count = serde_json::from_str(&raw).map_err(|source| CacheError::Decode {
        property: COUNT_PROPERTY.to_string(),
        source,
    })?;
    Ok(Some(count))
}

/// Persist a session's user and count under the given namespace.
///
/// An absent user removes the cached entry so a later rehydration does not
/// resurrect a stale record.
pub fn store_session(
    cache: &mut impl PropertyCache,
    namespace: &str,
    session: &Session,
) -> Result<(), CacheError> {
    match &session.user {
        Some(user) => {
            let raw = serde_json::to_string(user).map_err(|source| CacheError::Encode {
                property: USER_PROPERTY.to_string(),
                source,
            })?;
            cache.write(cache_key(namespace, USER_PROPERTY), raw);
        }
        None => cache.remove(&cache_key(namespace, USER_PROPERTY)),
    }

    let raw = serde_json::to_string(&session.count).map_err(|source| CacheError::Encode {
        property: COUNT_PROPERTY.to_string(),
        source,
    })?;
    cache.write(cache_key(namespace, COUNT_PROPERTY), raw);
    Ok(())
}

/// Serializable snapshot of a machine.
///
/// Does NOT include the reset policy or subscribers (not serializable);
/// a resumed machine is rebuilt through the builder with the snapshot's
/// session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version.
    pub version: u32,
    /// Id of the machine the snapshot was taken from.
    pub machine_id: Uuid,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// Phase at capture time.
    pub phase: Phase,
    /// Session at capture time.
    pub session: Session,
    /// Transition log up to capture time.
    pub log: TransitionLog,
}

impl Snapshot {
    /// Capture the machine's current state.
    pub fn capture(machine: &CounterMachine) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            machine_id: machine.id(),
            taken_at: Utc::now(),
            phase: machine.phase(),
            session: machine.session().clone(),
            log: machine.log().clone(),
        }
    }

    /// Encode to JSON.
    pub fn to_json(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(|source| CacheError::Encode {
            property: "snapshot".to_string(),
            source,
        })
    }

    /// Decode from JSON, rejecting unsupported versions.
    pub fn from_json(raw: &str) -> Result<Self, CacheError> {
        let snapshot: Snapshot =
            serde_json::from_str(raw).map_err(|source| CacheError::Decode {
                property: "snapshot".to_string(),
                source,
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CacheError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::core::{Event, ResetPolicy, Role};

    fn admin() -> User {
        User {
            id: "1".to_string(),
            name: "heymp".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn cache_key_is_namespaced() {
        assert_eq!(cache_key("widget", "count"), "widget:count");
    }

    #[test]
    fn memory_cache_reads_what_it_wrote() {
        let mut cache = MemoryCache::new();
        assert!(cache.is_empty());

        cache.write("widget:count".to_string(), "3".to_string());
        assert_eq!(cache.read("widget:count").as_deref(), Some("3"));
        assert_eq!(cache.len(), 1);

        cache.remove("widget:count");
        assert!(cache.read("widget:count").is_none());
    }

    #[test]
    fn session_roundtrips_through_the_cache() {
        let mut cache = MemoryCache::new();
        let session = Session {
            user: Some(admin()),
            count: 4,
            limit: 5,
        };

        store_session(&mut cache, "widget", &session).unwrap();

        assert_eq!(load_user(&cache, "widget").unwrap(), Some(admin()));
        assert_eq!(load_count(&cache, "widget").unwrap(), Some(4));
    }

    #[test]
    fn absent_entries_load_as_none() {
        let cache = MemoryCache::new();
        assert_eq!(load_user(&cache, "widget").unwrap(), None);
        assert_eq!(load_count(&cache, "widget").unwrap(), None);
    }

    #[test]
    fn storing_a_userless_session_clears_the_user_entry() {
        let mut cache = MemoryCache::new();
        store_session(
            &mut cache,
            "widget",
            &Session {
                user: Some(admin()),
                count: 1,
                limit: 5,
            },
        )
        .unwrap();

        store_session(&mut cache, "widget", &Session::new(5)).unwrap();
        assert_eq!(load_user(&cache, "widget").unwrap(), None);
        assert_eq!(load_count(&cache, "widget").unwrap(), Some(0));
    }

    #[test]
    fn malformed_user_entry_is_a_decode_error() {
        let mut cache = MemoryCache::new();
        cache.write("widget:user".to_string(), "{broken".to_string());

        let result = load_user(&cache, "widget");
        assert!(matches!(result, Err(CacheError::Decode { .. })));
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let mut machine = MachineBuilder::new()
            .limit(2)
            .reset_policy(ResetPolicy::always())
            .build()
            .unwrap();
        machine.start();
        machine.send(Event::UserFetchComplete { user: admin() });
        machine.send(Event::Increment);

        let snapshot = Snapshot::capture(&machine);
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();

        assert_eq!(restored.version, SNAPSHOT_VERSION);
        assert_eq!(restored.machine_id, machine.id());
        assert_eq!(restored.phase, machine.phase());
        assert_eq!(restored.session, *machine.session());
        assert_eq!(
            restored.log.transitions().len(),
            machine.log().transitions().len()
        );
    }

    #[test]
    fn snapshot_rejects_unsupported_versions() {
        let machine = MachineBuilder::new()
            .reset_policy(ResetPolicy::always())
            .build()
            .unwrap();

        let mut snapshot = Snapshot::capture(&machine);
        snapshot.version = 99;
        let json = snapshot.to_json().unwrap();

        let result = Snapshot::from_json(&json);
        assert!(matches!(
            result,
            Err(CacheError::UnsupportedVersion { found: 99, .. })
        ));
    }
}
