//! Persistence adapters for the session store.

use std::future::Future;

use tower_sessions::Session;

/// Key-value storage behind a [`SessionStore`](super::SessionStore).
///
/// Implementations absorb their own failures: a write that cannot be
/// persisted is logged and dropped, a read that fails is reported as absent.
pub trait SessionBackend: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &'static str) -> impl Future<Output = Option<String>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &'static str, value: String) -> impl Future<Output = ()> + Send;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &'static str) -> impl Future<Output = ()> + Send;

    /// Drop every value and the stored record itself.
    fn flush(&self) -> impl Future<Output = ()> + Send;

    /// Whether writes survive the current request.
    ///
    /// When `false` the store does not mirror anything into cookies either.
    fn is_persistent(&self) -> bool {
        true
    }
}

// =============================================================================
// tower-sessions
// =============================================================================

impl SessionBackend for Session {
    async fn get(&self, key: &'static str) -> Option<String> {
        match Session::get::<String>(self, key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key, "Failed to read session value");
                None
            }
        }
    }

    async fn set(&self, key: &'static str, value: String) {
        if let Err(e) = self.insert(key, value).await {
            tracing::warn!(error = %e, key, "Failed to write session value");
        }
    }

    async fn remove(&self, key: &'static str) {
        if let Err(e) = self.remove_value(key).await {
            tracing::warn!(error = %e, key, "Failed to remove session value");
        }
    }

    async fn flush(&self) {
        if let Err(e) = Session::flush(self).await {
            tracing::warn!(error = %e, "Failed to flush session");
        }
    }
}

// =============================================================================
// No storage
// =============================================================================

/// `None` stands for an environment without durable storage: every
/// operation is a no-op and nothing is ever read back.
impl<B: SessionBackend> SessionBackend for Option<B> {
    async fn get(&self, key: &'static str) -> Option<String> {
        match self {
            Some(backend) => backend.get(key).await,
            None => None,
        }
    }

    async fn set(&self, key: &'static str, value: String) {
        if let Some(backend) = self {
            backend.set(key, value).await;
        }
    }

    async fn remove(&self, key: &'static str) {
        if let Some(backend) = self {
            backend.remove(key).await;
        }
    }

    async fn flush(&self) {
        if let Some(backend) = self {
            backend.flush().await;
        }
    }

    fn is_persistent(&self) -> bool {
        self.as_ref().is_some_and(SessionBackend::is_persistent)
    }
}

#[cfg(test)]
pub use memory::MemoryBackend;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod memory {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::SessionBackend;

    /// In-memory backend for unit tests. Clones share storage.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryBackend {
        values: Arc<Mutex<HashMap<&'static str, String>>>,
    }

    impl MemoryBackend {
        pub fn len(&self) -> usize {
            self.values.lock().unwrap().len()
        }
    }

    impl SessionBackend for MemoryBackend {
        async fn get(&self, key: &'static str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }

        async fn set(&self, key: &'static str, value: String) {
            self.values.lock().unwrap().insert(key, value);
        }

        async fn remove(&self, key: &'static str) {
            self.values.lock().unwrap().remove(key);
        }

        async fn flush(&self) {
            self.values.lock().unwrap().clear();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, SessionStore as _};

    use super::*;
    use crate::middleware::session::MokaSessionStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flush_deletes_stored_record() {
        let store = Arc::new(MokaSessionStore::new(10));
        let session = Session::new(None, store.clone(), None);
        SessionBackend::set(&session, "auth-token", "abc".to_string()).await;
        session.save().await.unwrap();
        let id = session.id().unwrap();

        SessionBackend::flush(&session).await;

        assert_eq!(SessionBackend::get(&session, "auth-token").await, None);
        assert!(session.id().is_none());
        assert!(store.load(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tower_session_backend_round_trip() {
        let session = session();
        SessionBackend::set(&session, "auth-token", "abc".to_string()).await;
        assert_eq!(SessionBackend::get(&session, "auth-token").await.as_deref(), Some("abc"));

        SessionBackend::remove(&session, "auth-token").await;
        assert_eq!(SessionBackend::get(&session, "auth-token").await, None);
    }

    #[tokio::test]
    async fn test_missing_storage_is_a_no_op() {
        let backend: Option<MemoryBackend> = None;
        backend.set("auth-token", "abc".to_string()).await;
        assert_eq!(backend.get("auth-token").await, None);
        backend.remove("auth-token").await;
        assert!(!backend.is_persistent());
    }

    #[tokio::test]
    async fn test_present_storage_delegates() {
        let inner = MemoryBackend::default();
        let backend = Some(inner.clone());
        backend.set("auth-token", "abc".to_string()).await;
        assert_eq!(inner.len(), 1);
        assert!(backend.is_persistent());
    }
}
