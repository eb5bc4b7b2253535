//! Customer session: bearer credential plus profile.
//!
//! The credential lives in server-side session storage and is mirrored into
//! an `auth-token` cookie so the route gate can tell logged-in visitors apart
//! without touching storage. The storage copy is the source of truth; the
//! cookie only drives navigation.
//!
//! Handlers take a [`RequestSession`] and must return its cookie jar
//! ([`SessionStore::into_jar`]) with the response after `save` or `clear`.

mod backend;

pub use backend::SessionBackend;
#[cfg(test)]
pub use backend::MemoryBackend;

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use crate::api::AuthUser;

/// Storage key and cookie name of the credential.
pub const TOKEN_KEY: &str = "auth-token";

/// Storage key of the JSON-encoded profile.
pub const USER_KEY: &str = "auth-user";

/// Lifetime of the mirrored cookie.
const TOKEN_COOKIE_MAX_AGE: time::Duration = time::Duration::hours(24);

// =============================================================================
// Credential
// =============================================================================

/// Opaque bearer token issued by the backend.
///
/// `Debug` never shows the value.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header only.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Per-request view of the customer session.
pub struct SessionStore<B> {
    backend: B,
    jar: CookieJar,
}

/// Session store as extracted from a request.
///
/// Backed by the `tower-sessions` session when the session layer is
/// installed, and by nothing otherwise.
pub type RequestSession = SessionStore<Option<Session>>;

impl<B: SessionBackend> SessionStore<B> {
    pub const fn new(backend: B, jar: CookieJar) -> Self {
        Self { backend, jar }
    }

    /// Persist a freshly issued credential and its profile.
    ///
    /// Also queues the `auth-token` cookie. Without persistent storage this
    /// does nothing.
    pub async fn save(&mut self, credential: &Credential, user: &AuthUser) {
        if !self.backend.is_persistent() {
            tracing::debug!("No session storage, credential not persisted");
            return;
        }

        self.backend
            .set(TOKEN_KEY, credential.expose_secret().to_string())
            .await;

        match serde_json::to_string(user) {
            Ok(json) => self.backend.set(USER_KEY, json).await,
            Err(e) => tracing::warn!(error = %e, "Failed to encode session profile"),
        }

        self.jar = self.jar.clone().add(token_cookie(credential.expose_secret()));
    }

    /// Current credential, if any.
    pub async fn read(&self) -> Option<Credential> {
        self.backend
            .get(TOKEN_KEY)
            .await
            .filter(|token| !token.is_empty())
            .map(Credential::new)
    }

    /// Stored profile, if any. An undecodable profile counts as absent.
    pub async fn user(&self) -> Option<AuthUser> {
        let json = self.backend.get(USER_KEY).await?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable session profile");
                None
            }
        }
    }

    /// Forget the credential and profile and expire the cookie.
    ///
    /// The whole session record is dropped from storage, not just the two
    /// keys. Safe to call when nothing is stored.
    pub async fn clear(&mut self) {
        if !self.backend.is_persistent() {
            return;
        }

        self.backend.flush().await;
        self.jar = self.jar.clone().add(expired_token_cookie());
    }

    /// Whether the request carries an `auth-token` cookie that no stored
    /// credential backs, e.g. after the session expired or the server
    /// restarted.
    pub async fn has_stale_cookie(&self) -> bool {
        self.backend.is_persistent()
            && self.jar.get(TOKEN_KEY).is_some()
            && self.read().await.is_none()
    }

    /// Cookies to send back with the response.
    #[must_use]
    pub const fn jar(&self) -> &CookieJar {
        &self.jar
    }

    #[must_use]
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

/// Removal cookie for `auth-token`.
#[must_use]
pub fn expired_token_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_KEY, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .same_site(SameSite::Lax)
        .http_only(true)
        .build()
}

fn token_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((TOKEN_KEY, token.to_string()))
        .path("/")
        .max_age(TOKEN_COOKIE_MAX_AGE)
        .same_site(SameSite::Lax)
        .http_only(true)
        .build()
}

impl<S> FromRequestParts<S> for RequestSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned();
        if session.is_none() {
            tracing::debug!("Session layer not installed, using an empty session");
        }
        Ok(Self::new(session, CookieJar::from_headers(&parts.headers)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dulces_momentos_core::{Email, UserId};

    fn user() -> AuthUser {
        AuthUser {
            id: UserId::new(1),
            email: Email::parse("ana@email.com").unwrap(),
            username: "ana@email.com".to_string(),
            first_name: Some("Ana".to_string()),
            last_name: Some("Lopez".to_string()),
            role: Some("customer".to_string()),
        }
    }

    fn store() -> SessionStore<MemoryBackend> {
        SessionStore::new(MemoryBackend::default(), CookieJar::new())
    }

    fn set_cookie(store: &SessionStore<impl SessionBackend>) -> String {
        store.jar().get(TOKEN_KEY).unwrap().to_string()
    }

    #[tokio::test]
    async fn test_read_before_save_is_none() {
        let store = store();
        assert!(store.read().await.is_none());
        assert!(store.user().await.is_none());
    }

    #[tokio::test]
    async fn test_save_then_read() {
        let mut store = store();
        store.save(&Credential::new("abc123"), &user()).await;

        assert_eq!(store.read().await.unwrap().expose_secret(), "abc123");
        assert_eq!(store.user().await.unwrap(), user());
    }

    #[tokio::test]
    async fn test_save_sets_gate_cookie() {
        let mut store = store();
        store.save(&Credential::new("abc123"), &user()).await;

        let cookie = store.jar().get(TOKEN_KEY).unwrap();
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[tokio::test]
    async fn test_clear_then_read_is_none() {
        let mut store = store();
        store.save(&Credential::new("abc123"), &user()).await;
        store.clear().await;

        assert!(store.read().await.is_none());
        assert!(store.user().await.is_none());

        let cookie = set_cookie(&store);
        assert!(cookie.starts_with("auth-token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn test_stale_cookie_detection() {
        let jar = CookieJar::new().add(Cookie::new(TOKEN_KEY, "abc123"));
        let mut store = SessionStore::new(MemoryBackend::default(), jar.clone());
        assert!(store.has_stale_cookie().await);

        store.save(&Credential::new("abc123"), &user()).await;
        assert!(!store.has_stale_cookie().await);

        assert!(!self::store().has_stale_cookie().await);

        let no_storage: SessionStore<Option<MemoryBackend>> = SessionStore::new(None, jar);
        assert!(!no_storage.has_stale_cookie().await);
    }

    #[tokio::test]
    async fn test_clear_drops_every_stored_value() {
        let backend = MemoryBackend::default();
        backend.set("cart", "1".to_string()).await;
        let mut store = SessionStore::new(backend.clone(), CookieJar::new());
        store.save(&Credential::new("abc123"), &user()).await;

        store.clear().await;
        assert_eq!(backend.len(), 0);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let mut store = store();
        store.clear().await;
        store.clear().await;
        assert!(store.read().await.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_credential() {
        let mut store = store();
        store.save(&Credential::new("first"), &user()).await;
        store.save(&Credential::new("second"), &user()).await;
        assert_eq!(store.read().await.unwrap().expose_secret(), "second");
    }

    #[tokio::test]
    async fn test_without_storage_nothing_is_persisted() {
        let mut store: SessionStore<Option<MemoryBackend>> = SessionStore::new(None, CookieJar::new());
        store.save(&Credential::new("abc123"), &user()).await;

        assert!(store.read().await.is_none());
        assert!(store.jar().get(TOKEN_KEY).is_none());

        store.clear().await;
        assert!(store.jar().get(TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn test_undecodable_profile_is_absent() {
        let backend = MemoryBackend::default();
        backend.set(USER_KEY, "{not json".to_string()).await;
        let store = SessionStore::new(backend, CookieJar::new());
        assert!(store.user().await.is_none());
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let debug = format!("{:?}", Credential::new("abc123"));
        assert!(!debug.contains("abc123"));
    }
}
