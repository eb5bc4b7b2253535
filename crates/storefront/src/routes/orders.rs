//! Order history route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use super::NavContext;
use crate::api::{Order, OrderItem};
use crate::filters;
use crate::services::orders;
use crate::session::RequestSession;
use crate::state::AppState;

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub status_label: &'static str,
    pub status_icon: &'static str,
    pub status_tone: &'static str,
    pub progress: u8,
    pub created_at: String,
    pub delivery: String,
    pub notes: Option<String>,
    pub total: String,
    pub items: Vec<OrderItemView>,
}

/// Order line display data for templates.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub name: String,
    pub quantity: u32,
    pub personalization: Option<String>,
    pub subtotal: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            name: item.product_name(),
            quantity: item.quantity,
            personalization: item
                .personalization
                .clone()
                .filter(|text| !text.trim().is_empty()),
            subtotal: item.subtotal.display(),
        }
    }
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let meta = order.status_meta();
        Self {
            id: order.id.to_string(),
            status_label: meta.label,
            status_icon: meta.icon.name(),
            status_tone: meta.tone,
            progress: meta.progress,
            created_at: filters::long_datetime(&order.order_date),
            delivery: order
                .delivery_date
                .map_or_else(|| "Por definir".to_string(), filters::long_date),
            notes: order.notes.clone().filter(|notes| !notes.trim().is_empty()),
            total: order.total.display(),
            items: order.items.iter().map(OrderItemView::from).collect(),
        }
    }
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub nav: NavContext,
    pub orders: Vec<OrderView>,
    pub error: Option<String>,
    /// The error can only be fixed by logging in again.
    pub needs_login: bool,
}

/// Display the customer's orders.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, mut session: RequestSession) -> Response {
    let nav = NavContext::from_session(&session).await;
    let credential = session.read().await;

    match orders::load_orders(state.api(), credential.as_ref()).await {
        Ok(orders) => OrdersTemplate {
            nav,
            orders: orders.iter().map(OrderView::from).collect(),
            error: None,
            needs_login: false,
        }
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load orders");
            let needs_login = e.requires_login();
            if needs_login {
                // The login link must not bounce off the gate.
                session.clear().await;
            }
            let page = OrdersTemplate {
                nav,
                orders: Vec::new(),
                error: Some(e.user_message()),
                needs_login,
            };
            (session.into_jar(), page).into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(status: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "status": status,
            "order_date": "2025-03-01T10:30:00-06:00",
            "delivery_date": null,
            "notes": "",
            "total": "450.00",
            "items": [{
                "id": 1,
                "product": 3,
                "quantity": 1,
                "personalization": "Feliz cumpleanos",
                "subtotal": "450.00"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_order_view() {
        let view = OrderView::from(&order("in_process"));

        assert_eq!(view.status_label, "En proceso");
        assert_eq!(view.status_icon, "truck");
        assert_eq!(view.progress, 60);
        assert_eq!(view.created_at, "1 de marzo de 2025, 10:30");
        assert_eq!(view.delivery, "Por definir");
        assert!(view.notes.is_none());
        assert_eq!(view.total, "$450.00");
        assert_eq!(view.items[0].name, "Producto 3");
    }

    #[test]
    fn test_unknown_status_uses_default_entry() {
        let view = OrderView::from(&order("cancelled"));
        assert_eq!(view.status_label, "Nuevo");
        assert_eq!(view.progress, 25);
    }

    #[test]
    fn test_status_icons_and_tones_have_assets() {
        let sprite = std::fs::read_to_string(format!("{}/images/icons.svg", crate::STATIC_DIR)).unwrap();
        let css = std::fs::read_to_string(format!("{}/css/main.css", crate::STATIC_DIR)).unwrap();

        for status in ["new", "in_process", "completed"] {
            let view = OrderView::from(&order(status));
            assert!(sprite.contains(&format!("id=\"{}\"", view.status_icon)), "{status}");
            assert!(css.contains(&format!(".badge-{} ", view.status_tone)), "{status}");
        }
    }
}
