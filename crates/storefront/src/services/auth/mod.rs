//! Authentication service.
//!
//! The backend owns accounts and passwords. This service checks the form
//! shape, exchanges it for a token and stores the result in the session.

mod error;

pub use error::AuthError;

use tracing::instrument;

use dulces_momentos_core::Email;

use crate::api::{AuthResponse, AuthUser, BackendClient, LoginPayload, RegisterPayload};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::session::{Credential, SessionBackend, SessionStore};

/// Login form data.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    /// Full name as typed; split into first and last name.
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Log in with email and password and persist the session.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` or `AuthError::MissingField` before any
/// backend call when the form is incomplete, and `AuthError::Api` when the
/// backend rejects the credentials or cannot be reached.
#[instrument(skip(api, session, form))]
pub async fn login<B: SessionBackend>(
    api: &BackendClient,
    session: &mut SessionStore<B>,
    form: &LoginForm,
) -> Result<AuthUser, AuthError> {
    let email = Email::parse(&form.email)?;
    if form.password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }

    let auth = api
        .login(&LoginPayload {
            email: email.into_inner(),
            password: form.password.clone(),
        })
        .await?;

    Ok(establish(session, auth).await)
}

/// Create an account and persist the session.
///
/// The email doubles as the username.
///
/// # Errors
///
/// Same as [`login`]; the backend additionally rejects duplicate accounts.
#[instrument(skip(api, session, form))]
pub async fn register<B: SessionBackend>(
    api: &BackendClient,
    session: &mut SessionStore<B>,
    form: &RegisterForm,
) -> Result<AuthUser, AuthError> {
    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        return Err(AuthError::MissingField("nombre"));
    }
    let email = Email::parse(&form.email)?;
    if form.password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }

    let (first_name, last_name) = split_full_name(full_name);
    let auth = api
        .register(&RegisterPayload {
            email: email.as_str().to_string(),
            password: form.password.clone(),
            confirm_password: form.password.clone(),
            username: email.into_inner(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
        .await?;

    Ok(establish(session, auth).await)
}

/// Forget the current customer.
pub async fn logout<B: SessionBackend>(session: &mut SessionStore<B>) {
    session.clear().await;
    clear_sentry_user();
    tracing::info!("Customer logged out");
}

async fn establish<B: SessionBackend>(session: &mut SessionStore<B>, auth: AuthResponse) -> AuthUser {
    let AuthResponse { token, user } = auth;
    session.save(&Credential::new(token), &user).await;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "Customer authenticated");
    user
}

/// Split a full name on the first space: `"Ana Maria Lopez"` becomes
/// `("Ana", "Maria Lopez")`. A single word has an empty last name.
#[must_use]
pub fn split_full_name(full_name: &str) -> (&str, &str) {
    full_name.trim().split_once(' ').unwrap_or((full_name.trim(), ""))
}
