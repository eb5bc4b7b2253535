//! HTTP client for the bakery backend.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::types::{
    AuthResponse, ContactMessage, ContactMessagePayload, CreateOrderPayload, LoginPayload, Order,
    Product, RegisterPayload,
};
use super::{ApiError, derive_error_message, resolve_api_base};
use crate::config::ApiConfig;
use crate::session::Credential;

// =============================================================================
// RequestOptions
// =============================================================================

/// Per-request options for [`BackendClient::request`].
#[derive(Debug, Default)]
pub struct RequestOptions<'a> {
    /// HTTP method; `GET` when unset.
    pub method: Option<Method>,
    /// Credential sent as `Authorization: Token <value>`.
    pub credential: Option<&'a Credential>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
}

impl<'a> RequestOptions<'a> {
    /// A `POST` carrying `body`.
    #[must_use]
    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Some(Method::POST),
            credential: None,
            body: Some(body),
        }
    }

    /// Attach a credential when one is present.
    #[must_use]
    pub const fn with_credential(mut self, credential: Option<&'a Credential>) -> Self {
        self.credential = credential;
        self
    }
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the bakery backend API.
///
/// Cheap to clone. The base address is resolved once at construction.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base: String,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base", &self.inner.base)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let base = resolve_api_base(config.base_url.as_deref(), config.public_origin.as_ref());
        tracing::info!(base = %base, "Backend API base resolved");

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base,
            }),
        }
    }

    /// Resolved base address, without a trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.inner.base
    }

    /// Perform one request against `base + path`.
    ///
    /// Returns `Ok(None)` for `204 No Content`. Any other success body is
    /// decoded as `T`. Non-success responses become [`ApiError::Remote`] with
    /// a message derived from the body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, the backend answers
    /// with a non-success status, or the body does not decode.
    #[instrument(skip(self, options), fields(method, status))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions<'_>,
    ) -> Result<Option<T>, ApiError> {
        let method = options.method.unwrap_or(Method::GET);
        tracing::Span::current().record("method", tracing::field::display(&method));

        let url = format!("{}{path}", self.inner.base);
        let mut request = self
            .inner
            .client
            .request(method, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(credential) = options.credential.filter(|c| !c.is_empty()) {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", credential.expose_secret()),
            );
        }

        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response.text().await?;

        if !status.is_success() {
            let message = derive_error_message(&text);
            tracing::warn!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Remote { status, message });
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to decode backend response"
                );
                Err(ApiError::Decode(e))
            }
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange email and password for a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the call fails.
    #[instrument(skip(self, payload))]
    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse, ApiError> {
        const PATH: &str = "/auth/login/";
        self.request(PATH, RequestOptions::post(serde_json::to_value(payload)?))
            .await?
            .ok_or(ApiError::EmptyResponse(PATH))
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration or the call fails.
    #[instrument(skip(self, payload))]
    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse, ApiError> {
        const PATH: &str = "/auth/register/";
        self.request(PATH, RequestOptions::post(serde_json::to_value(payload)?))
            .await?
            .ok_or(ApiError::EmptyResponse(PATH))
    }

    /// Whether the backend answers at all. Any HTTP status counts.
    #[instrument(skip(self))]
    pub async fn is_reachable(&self) -> bool {
        match self.inner.client.get(self.base()).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Backend unreachable");
                false
            }
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List the product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Ok(self
            .request("/products/", RequestOptions::default())
            .await?
            .unwrap_or_default())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Create an order for the credential's owner.
    ///
    /// Returns `None` if the backend answered `204 No Content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or the call fails.
    #[instrument(skip(self, credential, payload))]
    pub async fn create_order(
        &self,
        credential: &Credential,
        payload: &CreateOrderPayload,
    ) -> Result<Option<Order>, ApiError> {
        self.request(
            "/orders/",
            RequestOptions::post(serde_json::to_value(payload)?).with_credential(Some(credential)),
        )
        .await
    }

    /// List orders belonging to the credential's owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is rejected or the call fails.
    #[instrument(skip(self, credential))]
    pub async fn list_orders(&self, credential: &Credential) -> Result<Vec<Order>, ApiError> {
        Ok(self
            .request(
                "/orders/",
                RequestOptions::default().with_credential(Some(credential)),
            )
            .await?
            .unwrap_or_default())
    }

    // =========================================================================
    // Contact
    // =========================================================================

    /// Leave a message for the bakery. The credential is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the message or the call fails.
    #[instrument(skip(self, credential, payload))]
    pub async fn send_contact_message(
        &self,
        credential: Option<&Credential>,
        payload: &ContactMessagePayload,
    ) -> Result<Option<ContactMessage>, ApiError> {
        self.request(
            "/contact/",
            RequestOptions::post(serde_json::to_value(payload)?).with_credential(credential),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use serde_json::json;

    fn credential() -> Credential {
        Credential::new("tok-123")
    }

    #[tokio::test]
    async fn test_request_sends_token_header_and_json_content_type() {
        let backend = FakeBackend::start().await;
        let client = backend.client();

        let echoed: Option<serde_json::Value> = client
            .request(
                "/echo/",
                RequestOptions::post(json!({"a": 1})).with_credential(Some(&credential())),
            )
            .await
            .unwrap();

        let echoed = echoed.unwrap();
        assert_eq!(echoed["authorization"], "Token tok-123");
        assert_eq!(echoed["content_type"], "application/json");
        assert_eq!(echoed["method"], "POST");
        assert_eq!(echoed["body"], json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_request_without_credential_omits_authorization() {
        let backend = FakeBackend::start().await;
        let echoed: serde_json::Value = backend
            .client()
            .request("/echo/", RequestOptions::default())
            .await
            .unwrap()
            .unwrap();

        assert!(echoed["authorization"].is_null());
        assert_eq!(echoed["content_type"], "application/json");
        assert_eq!(echoed["method"], "GET");
    }

    #[tokio::test]
    async fn test_no_content_yields_none() {
        let backend = FakeBackend::start().await;
        let result: Option<serde_json::Value> = backend
            .client()
            .request("/empty/", RequestOptions::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_login_failure_carries_detail_message() {
        let backend = FakeBackend::start().await;
        let err = backend
            .client()
            .login(&LoginPayload {
                email: "ana@email.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.user_message(), "Credenciales invalidas.");
    }

    #[tokio::test]
    async fn test_login_success() {
        let backend = FakeBackend::start().await;
        let auth = backend
            .client()
            .login(&LoginPayload {
                email: FakeBackend::EMAIL.to_string(),
                password: FakeBackend::PASSWORD.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(auth.token, FakeBackend::TOKEN);
        assert_eq!(auth.user.email.as_str(), FakeBackend::EMAIL);
    }

    #[tokio::test]
    async fn test_orders_require_valid_token() {
        let backend = FakeBackend::start().await;
        let err = backend
            .client()
            .list_orders(&Credential::new("stale"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.user_message(), "Token invalido.");

        let orders = backend
            .client()
            .list_orders(&Credential::new(FakeBackend::TOKEN))
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_products_are_listed() {
        let backend = FakeBackend::start().await;
        let products = backend.client().list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price.display(), "$450.00");
    }

    #[tokio::test]
    async fn test_transport_failure_uses_generic_message() {
        let config = ApiConfig {
            // Port 9 (discard) on loopback refuses connections in test environments.
            base_url: Some("http://127.0.0.1:9/api".to_string()),
            public_origin: None,
        };
        let err = BackendClient::new(&config).list_products().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.user_message(), crate::api::GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_reachability() {
        let backend = FakeBackend::start().await;
        assert!(backend.client().is_reachable().await);

        let config = ApiConfig {
            base_url: Some("http://127.0.0.1:9/api".to_string()),
            public_origin: None,
        };
        assert!(!BackendClient::new(&config).is_reachable().await);
    }
}
