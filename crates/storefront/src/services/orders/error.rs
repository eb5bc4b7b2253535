//! Order error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur while placing or loading orders.
///
/// Every variant except `Api` is detected locally, before any backend call.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("no product selected")]
    MissingProduct,

    #[error("no size selected")]
    MissingSize,

    #[error("no delivery date selected")]
    MissingDeliveryDate,

    #[error("delivery date is in the past")]
    DeliveryDateInPast,

    #[error("contact details incomplete")]
    MissingContact,

    /// No credential in the session.
    #[error("session expired")]
    SessionExpired,

    #[error("backend error: {0}")]
    Api(#[from] ApiError),
}

impl OrderError {
    /// Message shown next to the order form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingProduct => "Selecciona un producto para continuar.".to_string(),
            Self::MissingSize => "Selecciona un tamano para tu pedido.".to_string(),
            Self::MissingDeliveryDate => "Selecciona la fecha de entrega.".to_string(),
            Self::DeliveryDateInPast => {
                "La fecha de entrega no puede ser anterior a hoy.".to_string()
            }
            Self::MissingContact => {
                "Completa tu nombre, telefono y correo electronico.".to_string()
            }
            Self::SessionExpired => "Tu sesion expiro. Inicia sesion nuevamente.".to_string(),
            Self::Api(e) => e.user_message(),
        }
    }

    /// Whether the customer must log in again before retrying.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}
