//! Contact form route handlers.
//!
//! Messages go to the backend's `POST /contact/`. The backend stores a
//! single free-text field, so the form's fields are folded into it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::instrument;

use dulces_momentos_core::Email;

use super::NavContext;
use crate::api::ContactMessagePayload;
use crate::content::{self, ContactInfo};
use crate::error::AppError;
use crate::filters;
use crate::session::RequestSession;
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub nombre: String,
    pub correo: String,
    pub telefono: String,
    pub asunto: String,
    pub mensaje: String,
}

impl ContactForm {
    /// Validate and fold the form into the backend's message text.
    ///
    /// # Errors
    ///
    /// Returns the message to show next to the form.
    pub fn to_payload(&self) -> Result<ContactMessagePayload, String> {
        let name = self.nombre.trim();
        if name.is_empty() {
            return Err("Ingresa tu nombre completo.".to_string());
        }
        let email = Email::parse(&self.correo).map_err(|e| e.user_message().to_string())?;
        let subject = self.asunto.trim();
        if subject.is_empty() {
            return Err("Indica el asunto de tu mensaje.".to_string());
        }
        let body = self.mensaje.trim();
        if body.is_empty() {
            return Err("Escribe tu mensaje.".to_string());
        }

        let mut header = vec![format!("Nombre: {name}"), format!("Correo: {email}")];
        let phone = self.telefono.trim();
        if !phone.is_empty() {
            header.push(format!("Telefono: {phone}"));
        }
        header.push(format!("Asunto: {subject}"));

        Ok(ContactMessagePayload {
            message: format!("{}\n\n{body}", header.join(" | ")),
        })
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub nav: NavContext,
    pub info: ContactInfo,
    pub form: ContactForm,
    pub error: Option<String>,
    pub sent: bool,
}

/// Display the contact page.
pub async fn form(session: RequestSession) -> impl IntoResponse {
    ContactTemplate {
        nav: NavContext::from_session(&session).await,
        info: content::CONTACT,
        form: ContactForm::default(),
        error: None,
        sent: false,
    }
}

/// Send a contact message.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: RequestSession,
    WithRejection(Form(form), _): WithRejection<Form<ContactForm>, AppError>,
) -> Response {
    let nav = NavContext::from_session(&session).await;

    let result = match form.to_payload() {
        Ok(payload) => {
            let credential = session.read().await;
            state
                .api()
                .send_contact_message(credential.as_ref(), &payload)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "Contact message rejected");
                    e.user_message()
                })
        }
        Err(message) => Err(message),
    };

    match result {
        Ok(_) => {
            tracing::info!("Contact message sent");
            ContactTemplate {
                nav,
                info: content::CONTACT,
                form: ContactForm::default(),
                error: None,
                sent: true,
            }
            .into_response()
        }
        Err(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ContactTemplate {
                nav,
                info: content::CONTACT,
                form,
                error: Some(message),
                sent: false,
            },
        )
            .into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> ContactForm {
        ContactForm {
            nombre: "Juan Perez".to_string(),
            correo: "juan@email.com".to_string(),
            telefono: String::new(),
            asunto: "Pastel de boda".to_string(),
            mensaje: "Quisiera cotizar un pastel de tres pisos.".to_string(),
        }
    }

    #[test]
    fn test_payload_folds_fields() {
        let payload = complete().to_payload().unwrap();
        assert_eq!(
            payload.message,
            "Nombre: Juan Perez | Correo: juan@email.com | Asunto: Pastel de boda\n\n\
             Quisiera cotizar un pastel de tres pisos."
        );
    }

    #[test]
    fn test_phone_is_included_when_given() {
        let mut form = complete();
        form.telefono = "+52 722 123 4567".to_string();
        let payload = form.to_payload().unwrap();
        assert!(payload.message.contains("Telefono: +52 722 123 4567 | Asunto"));
    }

    #[test]
    fn test_required_fields() {
        let mut form = complete();
        form.mensaje = "  ".to_string();
        assert_eq!(form.to_payload().unwrap_err(), "Escribe tu mensaje.");

        let mut form = complete();
        form.correo = "juan".to_string();
        assert!(form.to_payload().is_err());

        assert_eq!(
            ContactForm::default().to_payload().unwrap_err(),
            "Ingresa tu nombre completo."
        );
    }
}
