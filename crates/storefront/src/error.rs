//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Failures a customer can act on (bad form input,
//! rejected credentials) are rendered inline by the handlers instead.

use axum::{
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error type for the storefront.
///
/// Handlers take form and query extractors through
/// `WithRejection<_, AppError>` so malformed requests get a short Spanish
/// message instead of the extractor's diagnostic text.
#[derive(Debug, Error)]
pub enum AppError {
    /// A form body could not be read or decoded.
    #[error("Invalid form: {0}")]
    Form(#[from] FormRejection),

    /// A query string could not be decoded.
    #[error("Invalid query: {0}")]
    Query(#[from] QueryRejection),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Form(rejection) => rejection.status(),
            Self::Query(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        // Don't expose extractor details to clients
        let message = if status.is_server_error() {
            "Error interno del servidor"
        } else {
            "Solicitud invalida."
        };

        (status, message).into_response()
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("order", "Order placed", Some(&[("order_id", "42")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Form, Router,
        body::Body,
        extract::{Query, Request},
        http::header,
        routing::{get, post},
    };
    use axum_extra::extract::WithRejection;
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Deserialize)]
    struct Params {
        #[allow(dead_code)]
        page: u32,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/query",
                get(|_: WithRejection<Query<Params>, AppError>| async { "ok" }),
            )
            .route(
                "/form",
                post(|_: WithRejection<Form<Params>, AppError>| async { "ok" }),
            )
    }

    async fn send(request: Request) -> Response {
        app().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_bad_query_is_bad_request() {
        let response = send(
            Request::builder()
                .uri("/query?page=uno")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Solicitud invalida.");
    }

    #[tokio::test]
    async fn test_form_with_wrong_content_type_keeps_status() {
        let response = send(
            Request::builder()
                .method("POST")
                .uri("/form")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"page\": 1}"))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
