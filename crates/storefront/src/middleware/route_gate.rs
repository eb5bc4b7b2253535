//! Route gate: navigation-level redirects based on the session cookie.
//!
//! The gate only looks at whether an `auth-token` cookie is present. It never
//! checks the value; the backend validates the credential on every call, so
//! this is routing for the customer's convenience and not an access check.
//!
//! | Cookie  | Path       | Result               |
//! |---------|------------|----------------------|
//! | absent  | `/login`   | pass                 |
//! | absent  | other      | `303` to `/login`    |
//! | present | `/login`   | `303` to `/`         |
//! | present | other      | pass                 |
//!
//! API paths, static assets, the favicon and image files are never gated.
//!
//! [`drop_stale_cookie`] runs first and expires a cookie whose server-side
//! session is gone, so the cookie keeps mirroring the stored credential.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::session::{RequestSession, TOKEN_KEY, expired_token_cookie};

/// Page that anonymous visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Page that authenticated visitors are sent to from the login page.
pub const HOME_PATH: &str = "/";

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".svg"];

/// Whether the visitor carries the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Anonymous,
    Authenticated,
}

impl GateState {
    /// Classify a request by its cookies.
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        if jar.get(TOKEN_KEY).is_some() {
            Self::Authenticated
        } else {
            Self::Anonymous
        }
    }
}

/// What the gate does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(&'static str),
}

/// Whether `path` is subject to the gate at all.
#[must_use]
pub fn is_gated(path: &str) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);

    let excluded = rest.starts_with("api")
        || rest == "static"
        || rest.starts_with("static/")
        || rest.starts_with("favicon.ico")
        || IMAGE_EXTENSIONS.iter().any(|ext| rest.contains(ext));

    !excluded
}

/// Decide what to do with a gated path.
#[must_use]
pub fn decide(state: GateState, path: &str) -> GateDecision {
    match state {
        GateState::Anonymous if path != LOGIN_PATH => GateDecision::Redirect(LOGIN_PATH),
        GateState::Authenticated if path == LOGIN_PATH => GateDecision::Redirect(HOME_PATH),
        _ => GateDecision::Pass,
    }
}

/// Middleware applying [`decide`] to every gated request.
pub async fn route_gate(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if !is_gated(path) {
        return next.run(request).await;
    }

    let state = GateState::from_jar(&jar);
    match decide(state, path) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::Redirect(to) => {
            tracing::debug!(path, ?state, to, "Route gate redirect");
            Redirect::to(to).into_response()
        }
    }
}

/// Middleware expiring an `auth-token` cookie that has no stored credential
/// behind it.
///
/// The cookie is also removed from the request, so the gate and the handler
/// see an anonymous visitor. A response that issues a fresh cookie (a login
/// on the same request) is left alone.
pub async fn drop_stale_cookie(session: RequestSession, mut request: Request, next: Next) -> Response {
    if !session.has_stale_cookie().await {
        return next.run(request).await;
    }

    tracing::info!(path = %request.uri().path(), "Expiring gate cookie without a stored credential");
    strip_token_cookie(request.headers_mut());

    let response = next.run(request).await;
    if sets_token_cookie(response.headers()) {
        return response;
    }
    (CookieJar::new().add(expired_token_cookie()), response).into_response()
}

fn strip_token_cookie(headers: &mut HeaderMap) {
    let remaining = CookieJar::from_headers(headers)
        .iter()
        .filter(|cookie| cookie.name() != TOKEN_KEY)
        .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
        .collect::<Vec<_>>()
        .join("; ");

    headers.remove(header::COOKIE);
    if !remaining.is_empty()
        && let Ok(value) = HeaderValue::from_str(&remaining)
    {
        headers.insert(header::COOKIE, value);
    }
}

fn sets_token_cookie(headers: &HeaderMap) -> bool {
    let prefix = format!("{TOKEN_KEY}=");
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, http::header, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_decision_table() {
        use GateDecision::{Pass, Redirect};
        use GateState::{Anonymous, Authenticated};

        assert_eq!(decide(Anonymous, "/pedidos"), Redirect("/login"));
        assert_eq!(decide(Anonymous, "/"), Redirect("/login"));
        assert_eq!(decide(Anonymous, "/login"), Pass);
        assert_eq!(decide(Authenticated, "/login"), Redirect("/"));
        assert_eq!(decide(Authenticated, "/pedidos"), Pass);
        assert_eq!(decide(Authenticated, "/"), Pass);
    }

    #[test]
    fn test_matcher_exclusions() {
        assert!(!is_gated("/api/orders/"));
        assert!(!is_gated("/apiary"));
        assert!(!is_gated("/static/css/main.css"));
        assert!(!is_gated("/favicon.ico"));
        assert!(!is_gated("/chocolate-ganache-cake.png"));
        assert!(!is_gated("/img/concha.jpg"));
        assert!(!is_gated("/fotos/rosca.jpeg"));
        assert!(!is_gated("/logo.svg"));
    }

    #[test]
    fn test_matcher_inclusions() {
        assert!(is_gated("/"));
        assert!(is_gated("/login"));
        assert!(is_gated("/pedidos"));
        assert!(is_gated("/statistics"));
        assert!(is_gated("/catalogo"));
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "inicio" }))
            .route("/login", get(|| async { "login" }))
            .route("/pedidos", get(|| async { "pedidos" }))
            .route("/api/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(route_gate))
    }

    async fn get_path(path: &str, cookie: Option<&str>) -> axum::response::Response {
        let mut request = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_request_is_redirected_to_login() {
        let response = get_path("/pedidos", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_authenticated_login_is_redirected_home() {
        let response = get_path("/login", Some("auth-token=abc")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_any_cookie_value_counts() {
        let response = get_path("/pedidos", Some("auth-token=")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_strip_token_cookie_keeps_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("dm_session=s1; auth-token=abc"),
        );
        strip_token_cookie(&mut headers);
        assert_eq!(headers[header::COOKIE], "dm_session=s1");

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth-token=abc"));
        strip_token_cookie(&mut headers);
        assert!(headers.get(header::COOKIE).is_none());
    }

    #[test]
    fn test_sets_token_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(header::SET_COOKIE, HeaderValue::from_static("dm_session=s1; Path=/"));
        assert!(!sets_token_cookie(&headers));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("auth-token=abc; Path=/"));
        assert!(sets_token_cookie(&headers));
    }

    #[tokio::test]
    async fn test_api_paths_bypass_gate() {
        let response = get_path("/api/ping", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
