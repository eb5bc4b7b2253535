//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /catalogo               - Product catalog
//! GET  /pedido-personalizado   - Custom order form
//! POST /pedido-personalizado   - Place a custom order
//! GET  /pedidos                - Order history and status
//! GET  /contacto               - Contact page
//! POST /contacto               - Send a contact message
//!
//! # Auth
//! GET  /login                  - Login form (`?modo=registro` for sign-up)
//! POST /login                  - Login or register, depending on `modo`
//! POST /logout                 - Logout action
//!
//! # Outside the route gate
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (backend reachable)
//! ```

pub mod auth;
pub mod catalog;
pub mod contact;
pub mod custom_order;
pub mod home;
pub mod orders;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::filters;
use crate::session::{RequestSession, SessionBackend, SessionStore};
use crate::state::AppState;

// =============================================================================
// Navigation
// =============================================================================

/// Session-dependent parts of the navigation bar.
#[derive(Debug, Clone, Default)]
pub struct NavContext {
    /// A credential is stored for this visitor.
    pub authenticated: bool,
    /// Greeting name of the logged-in customer.
    pub customer_name: Option<String>,
}

impl NavContext {
    /// Build from the current session. Re-read on every request.
    pub async fn from_session<B: SessionBackend>(session: &SessionStore<B>) -> Self {
        let authenticated = session.read().await.is_some();
        let customer_name = if authenticated {
            session
                .user()
                .await
                .map(|user| user.display_name().to_string())
        } else {
            None
        };

        Self {
            authenticated,
            customer_name,
        }
    }
}

// =============================================================================
// Router
// =============================================================================

/// Create all page routes. The caller applies the route gate.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/catalogo", get(catalog::index))
        .route(
            "/pedido-personalizado",
            get(custom_order::form).post(custom_order::submit),
        )
        .route("/pedidos", get(orders::index))
        .route("/contacto", get(contact::form).post(contact::submit))
        .route("/login", get(auth::login_page).post(auth::submit))
        .route("/logout", post(auth::logout))
}

// =============================================================================
// Fallback and health
// =============================================================================

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub nav: NavContext,
}

/// Render the 404 page.
pub async fn not_found(session: RequestSession) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            nav: NavContext::from_session(&session).await,
        },
    )
}

/// Liveness health check. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check.
///
/// Returns 503 Service Unavailable when the backend does not answer.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.api().is_reachable().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
