//! Request and response shapes of the bakery backend.
//!
//! Responses are trusted to match these shapes; decoding is the only check.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use dulces_momentos_core::{
    ContactMessageId, Email, OrderId, OrderItemId, Price, ProductId, StatusMeta, UserId,
};

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /auth/login/`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Profile of the customer a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Email,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl AuthUser {
    /// Name to greet the customer with: first name when set, else username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Successful login or registration.
///
/// `Debug` is implemented by hand so the token never reaches logs.
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product from `GET /products/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Image URL; may be empty.
    #[serde(default)]
    pub image: String,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of a draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderItem {
    pub product: ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalization: Option<String>,
}

/// Body of `POST /orders/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub items: Vec<CreateOrderItem>,
}

/// One line of an order as stored by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub quantity: u32,
    #[serde(default)]
    pub personalization: Option<String>,
    pub subtotal: Price,
    pub product: ProductId,
    #[serde(default)]
    pub product_detail: Option<Product>,
}

impl OrderItem {
    /// Product name, or a placeholder when the backend did not embed it.
    #[must_use]
    pub fn product_name(&self) -> String {
        self.product_detail
            .as_ref()
            .map_or_else(|| format!("Producto {}", self.product), |p| p.name.clone())
    }
}

/// An order from `GET /orders/` or `POST /orders/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Raw status text; see [`Order::status_meta`].
    pub status: String,
    pub order_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub total: Price,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Display metadata for the order's status, defaulting for unknown values.
    #[must_use]
    pub fn status_meta(&self) -> &'static StatusMeta {
        StatusMeta::for_raw(&self.status)
    }
}

// =============================================================================
// Contact
// =============================================================================

/// Body of `POST /contact/`.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessagePayload {
    pub message: String,
}

/// A stored contact message.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub message: String,
    pub created_at: DateTime<FixedOffset>,
}
