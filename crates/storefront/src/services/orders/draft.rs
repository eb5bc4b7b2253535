//! Custom order form and the draft it becomes.

use chrono::NaiveDate;
use serde::Deserialize;

use dulces_momentos_core::ProductId;

use super::OrderError;
use crate::api::{CreateOrderItem, CreateOrderPayload};

/// Cake sizes offered on the custom order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CakeSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl CakeSize {
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::ExtraLarge];

    /// Form value, also written into the order notes.
    #[must_use]
    pub const fn value(&self) -> &'static str {
        match self {
            Self::Small => "pequeno",
            Self::Medium => "mediano",
            Self::Large => "grande",
            Self::ExtraLarge => "extra-grande",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Small => "Pequeno (8-10 personas)",
            Self::Medium => "Mediano (12-15 personas)",
            Self::Large => "Grande (20-25 personas)",
            Self::ExtraLarge => "Extra grande (30+ personas)",
        }
    }

    /// Look up a size by its form value.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.value() == value)
    }
}

/// Custom order form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderRequest {
    pub producto: String,
    pub tamano: String,
    /// Delivery date, `YYYY-MM-DD`.
    pub fecha: String,
    pub nombre: String,
    pub telefono: String,
    pub correo: String,
    pub decoracion: String,
    pub alergias: String,
    pub comentarios: String,
}

impl OrderRequest {
    /// Validate the form and build the order draft.
    ///
    /// Checks run in a fixed order and the first failure wins: product,
    /// size, delivery date (present, then not before `today`), contact
    /// details.
    ///
    /// # Errors
    ///
    /// Returns the `OrderError` of the first failed check.
    pub fn to_draft(&self, today: NaiveDate) -> Result<CreateOrderPayload, OrderError> {
        let product: ProductId = self
            .producto
            .parse()
            .map_err(|_| OrderError::MissingProduct)?;

        CakeSize::from_value(self.tamano.trim()).ok_or(OrderError::MissingSize)?;

        let delivery_date = NaiveDate::parse_from_str(self.fecha.trim(), "%Y-%m-%d")
            .map_err(|_| OrderError::MissingDeliveryDate)?;
        if delivery_date < today {
            return Err(OrderError::DeliveryDateInPast);
        }

        if [&self.nombre, &self.telefono, &self.correo]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(OrderError::MissingContact);
        }

        let decoration = self.decoracion.trim();
        Ok(CreateOrderPayload {
            notes: Some(self.notes()),
            delivery_date: Some(delivery_date),
            items: vec![CreateOrderItem {
                product,
                quantity: 1,
                personalization: (!decoration.is_empty()).then(|| decoration.to_string()),
            }],
        })
    }

    /// Order notes summarizing the contact details and preferences.
    #[must_use]
    pub fn notes(&self) -> String {
        [
            format!("Nombre: {}", self.nombre.trim()),
            format!("Telefono: {}", self.telefono.trim()),
            format!("Correo: {}", self.correo.trim()),
            format!("Tamano: {}", or_default(&self.tamano, "Sin especificar")),
            format!("Alergias: {}", or_default(&self.alergias, "Ninguna")),
            format!("Comentarios: {}", or_default(&self.comentarios, "Sin comentarios")),
        ]
        .join(" | ")
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() { default } else { value }
}
