//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] dulces_momentos_core::EmailError),

    /// A required form field was left empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The backend rejected the request or could not be reached.
    #[error("backend error: {0}")]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Message shown next to the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(e) => e.user_message().to_string(),
            Self::MissingField("password") => "Ingresa tu contrasena.".to_string(),
            Self::MissingField("nombre") => "Ingresa tu nombre completo.".to_string(),
            Self::MissingField(_) => "Completa todos los campos.".to_string(),
            Self::Api(e) => e.user_message(),
        }
    }
}
