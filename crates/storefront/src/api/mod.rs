//! Bakery backend API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - The backend is the source of truth for accounts, products and orders -
//!   NO local copies, every page fetches what it shows
//! - One choke point ([`BackendClient::request`]) attaches the credential,
//!   serializes the payload and normalizes error bodies
//! - No retries, no timeouts: a failed call is reported to the customer, who
//!   can submit the form again
//!
//! # Endpoints
//!
//! ```text
//! POST /auth/login/      - exchange email + password for a token
//! POST /auth/register/   - create a customer account and a token
//! GET  /products/        - product catalog
//! POST /orders/          - create an order (token required)
//! GET  /orders/          - orders of the token's owner (token required)
//! POST /contact/         - leave a message for the bakery
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use dulces_momentos_storefront::api::BackendClient;
//!
//! let client = BackendClient::new(&config.api);
//! let products = client.list_products().await?;
//! ```

mod base_url;
mod client;
pub mod types;

pub use base_url::{DEFAULT_API_BASE, resolve_api_base};
pub use client::{BackendClient, RequestOptions};
pub use types::*;

use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when nothing more specific can be derived from a failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Error al comunicarse con el servidor.";

/// Errors that can occur when talking to the bakery backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset, ...).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Remote {
        /// HTTP status of the response.
        status: StatusCode,
        /// Message derived from the response body.
        message: String,
    },

    /// A success response could not be decoded into the expected type.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A success response had no body where one was required.
    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),
}

impl ApiError {
    /// Message suitable for showing next to the form that triggered the call.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            Self::Transport(_) | Self::Decode(_) | Self::EmptyResponse(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// HTTP status reported by the backend, if it answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Derive a customer-facing message from an error response body.
///
/// Priority: a top-level JSON string, then a non-empty `detail` field, then
/// every value of an object (or element of an array) joined with spaces,
/// flattening one level of nested arrays. Bodies that are not JSON, or that
/// are JSON `null`, numbers or booleans, yield [`GENERIC_ERROR_MESSAGE`].
#[must_use]
pub fn derive_error_message(body: &str) -> String {
    use serde_json::Value;

    let Ok(data) = serde_json::from_str::<Value>(body) else {
        return GENERIC_ERROR_MESSAGE.to_string();
    };

    match data {
        Value::String(message) => message,
        Value::Object(map) => {
            if let Some(detail) = map.get("detail").filter(|d| is_truthy(d)) {
                return value_text(detail);
            }
            join_flat(map.values())
        }
        Value::Array(items) => join_flat(items.iter()),
        Value::Null | Value::Bool(_) | Value::Number(_) => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

fn join_flat<'a>(values: impl Iterator<Item = &'a serde_json::Value>) -> String {
    values
        .flat_map(|value| match value {
            serde_json::Value::Array(inner) => inner.iter().map(value_text).collect::<Vec<_>>(),
            other => vec![value_text(other)],
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of a single value: `null` is blank and arrays join with commas.
fn value_text(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_field_wins() {
        assert_eq!(
            derive_error_message(r#"{"detail": "Invalid credentials"}"#),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_field_errors_are_concatenated() {
        let message = derive_error_message(r#"{"email": ["Required"], "password": ["Required"]}"#);
        assert_eq!(message, "Required Required");
    }

    #[test]
    fn test_non_field_errors() {
        let message = derive_error_message(r#"{"non_field_errors": ["Credenciales invalidas."]}"#);
        assert_eq!(message, "Credenciales invalidas.");
    }

    #[test]
    fn test_string_body() {
        assert_eq!(derive_error_message(r#""Servicio en mantenimiento""#), "Servicio en mantenimiento");
    }

    #[test]
    fn test_empty_detail_falls_through_to_values() {
        let message = derive_error_message(r#"{"detail": "", "items": ["Debe incluir al menos un producto en el pedido."]}"#);
        assert_eq!(message, " Debe incluir al menos un producto en el pedido.");
    }

    #[test]
    fn test_list_detail_is_comma_joined() {
        assert_eq!(derive_error_message(r#"{"detail": ["a", "b"]}"#), "a,b");
    }

    #[test]
    fn test_null_values_are_blank() {
        assert_eq!(derive_error_message(r#"{"a": null, "b": ["x"]}"#), " x");
        assert_eq!(derive_error_message(r#"{"a": ["x", null]}"#), "x ");
    }

    #[test]
    fn test_nested_arrays_below_one_level_are_comma_joined() {
        assert_eq!(derive_error_message(r#"{"items": [["uno", "dos"]]}"#), "uno,dos");
    }

    #[test]
    fn test_array_body_is_flattened_one_level() {
        assert_eq!(derive_error_message(r#"["uno", ["dos", "tres"]]"#), "uno dos tres");
    }

    #[test]
    fn test_unparseable_body_uses_fallback() {
        assert_eq!(derive_error_message("<html>502 Bad Gateway</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(derive_error_message(""), GENERIC_ERROR_MESSAGE);
        assert_eq!(derive_error_message("null"), GENERIC_ERROR_MESSAGE);
        assert_eq!(derive_error_message("42"), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = ApiError::EmptyResponse("/auth/login/");
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = ApiError::Remote {
            status: StatusCode::BAD_REQUEST,
            message: "Las contrasenas no coinciden.".to_string(),
        };
        assert_eq!(err.user_message(), "Las contrasenas no coinciden.");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }
}
