//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID
//! 4. Security headers
//! 5. Session layer (tower-sessions, moka-backed store)
//! 6. Stale gate cookie removal (pages and static assets only)
//! 7. Route gate (pages and static assets only)

pub mod request_id;
pub mod route_gate;
pub mod security_headers;
pub mod session;

pub use request_id::request_id_middleware;
pub use route_gate::{drop_stale_cookie, route_gate};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
