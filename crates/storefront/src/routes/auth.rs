//! Authentication route handlers.
//!
//! One page serves both login and registration; the `modo` field selects
//! the variant. Tokens come from the bakery backend and are stored through
//! the session store.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::instrument;

use super::NavContext;
use crate::error::AppError;
use crate::filters;
use crate::middleware::route_gate::{HOME_PATH, LOGIN_PATH};
use crate::services::auth::{self, LoginForm, RegisterForm};
use crate::session::RequestSession;
use crate::state::AppState;

/// `modo` value selecting registration.
const REGISTER_MODE: &str = "registro";

// =============================================================================
// Form Types
// =============================================================================

/// Query parameters of the login page.
#[derive(Debug, Default, Deserialize)]
pub struct ModeQuery {
    pub modo: Option<String>,
}

/// Login or registration form data.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct AuthFormData {
    pub modo: String,
    pub nombre: String,
    pub email: String,
    pub password: String,
}

fn is_register(mode: Option<&str>) -> bool {
    mode.is_some_and(|mode| mode == REGISTER_MODE)
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavContext,
    pub register: bool,
    pub full_name: String,
    pub email: String,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    session: RequestSession,
    WithRejection(Query(query), _): WithRejection<Query<ModeQuery>, AppError>,
) -> impl IntoResponse {
    LoginTemplate {
        nav: NavContext::from_session(&session).await,
        register: is_register(query.modo.as_deref()),
        full_name: String::new(),
        email: String::new(),
        error: None,
    }
}

/// Handle the login or registration form.
///
/// Success stores the session and redirects home; failures re-render the
/// form with the message next to it.
#[instrument(skip(state, session, form), fields(register))]
pub async fn submit(
    State(state): State<AppState>,
    mut session: RequestSession,
    WithRejection(Form(form), _): WithRejection<Form<AuthFormData>, AppError>,
) -> Response {
    let register = is_register(Some(form.modo.as_str()));
    tracing::Span::current().record("register", register);

    let result = if register {
        auth::register(
            state.api(),
            &mut session,
            &RegisterForm {
                full_name: form.nombre.clone(),
                email: form.email.clone(),
                password: form.password,
            },
        )
        .await
    } else {
        auth::login(
            state.api(),
            &mut session,
            &LoginForm {
                email: form.email.clone(),
                password: form.password,
            },
        )
        .await
    };

    match result {
        Ok(_) => (session.into_jar(), Redirect::to(HOME_PATH)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Authentication failed");
            let page = LoginTemplate {
                nav: NavContext::from_session(&session).await,
                register,
                full_name: form.nombre,
                email: form.email,
                error: Some(e.user_message()),
            };
            (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
        }
    }
}

/// Handle logout.
pub async fn logout(mut session: RequestSession) -> Response {
    auth::logout(&mut session).await;
    (session.into_jar(), Redirect::to(LOGIN_PATH)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert!(is_register(Some("registro")));
        assert!(!is_register(Some("login")));
        assert!(!is_register(Some("")));
        assert!(!is_register(None));
    }
}
