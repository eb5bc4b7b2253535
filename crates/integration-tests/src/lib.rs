//! Integration tests for the Dulces Momentos storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dulces-momentos-integration-tests
//! ```
//!
//! Each test builds the full storefront router (the same one the binary
//! serves) and points it at an in-process fake backend. Requests go through
//! `tower::ServiceExt::oneshot`; [`TestContext`] plays the browser and
//! carries cookies from one response to the next request.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::Response,
};
use tower::ServiceExt;

use dulces_momentos_storefront::{
    app,
    config::{ApiConfig, StorefrontConfig},
    state::AppState,
    testing::FakeBackend,
};

/// A storefront wired to a fake backend, plus a browser-like cookie jar.
pub struct TestContext {
    pub backend: FakeBackend,
    app: Router,
    cookies: Mutex<BTreeMap<String, String>>,
}

/// What a test needs from a response.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Page {
    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Every `Set-Cookie` header for `name`.
    #[must_use]
    pub fn set_cookies(&self, name: &str) -> Vec<String> {
        let prefix = format!("{name}=");
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter(|v| v.starts_with(&prefix))
            .map(String::from)
            .collect()
    }
}

impl TestContext {
    pub async fn new() -> Self {
        let backend = FakeBackend::start().await;
        let config = test_config(backend.config());

        Self {
            app: app(AppState::new(config)),
            backend,
            cookies: Mutex::new(BTreeMap::new()),
        }
    }

    /// Pretend the browser already holds `name=value`.
    pub fn set_cookie(&self, name: &str, value: &str) {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    /// Whether the browser currently holds `name`.
    #[must_use]
    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.lock().unwrap().contains_key(name)
    }

    pub async fn get(&self, path: &str) -> Page {
        self.send(Method::GET, path, None).await
    }

    /// Submit a URL-encoded form.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Page {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(Method::POST, path, Some(body)).await
    }

    /// Log in as the fake backend's known account.
    pub async fn login(&self) -> Page {
        self.post_form(
            "/login",
            &[
                ("modo", "login"),
                ("email", FakeBackend::EMAIL),
                ("password", FakeBackend::PASSWORD),
            ],
        )
        .await
    }

    async fn send(&self, method: Method, path: &str, form: Option<String>) -> Page {
        let mut request = Request::builder().method(method).uri(path);

        let cookie = self.cookie_header();
        if !cookie.is_empty() {
            request = request.header(header::COOKIE, cookie);
        }

        let body = match form {
            Some(form) => {
                request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form)
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        self.store_cookies(&response);
        into_page(response).await
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .lock()
            .unwrap()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn store_cookies(&self, response: &Response) {
        let mut cookies = self.cookies.lock().unwrap();
        for header in response.headers().get_all(header::SET_COOKIE) {
            let Ok(header) = header.to_str() else {
                continue;
            };
            let pair = header.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let expired = header.contains("Max-Age=0");
            if expired || value.is_empty() {
                cookies.remove(name.trim());
            } else {
                cookies.insert(name.trim().to_string(), value.to_string());
            }
        }
    }
}

async fn into_page(response: Response) -> Page {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    Page {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

fn test_config(api: ApiConfig) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        api,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
