//! Custom order route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::WithRejection;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::instrument;

use super::NavContext;
use crate::api::{BackendClient, Order};
use crate::error::AppError;
use crate::filters;
use crate::middleware::route_gate::LOGIN_PATH;
use crate::services::orders::{self, CakeSize, OrderRequest};
use crate::session::RequestSession;
use crate::state::AppState;

const PRODUCTS_UNAVAILABLE: &str = "No se pudieron cargar los productos. Intenta nuevamente.";

// =============================================================================
// View Types
// =============================================================================

/// A product choice in the order form.
#[derive(Debug, Clone)]
pub struct ProductOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

/// A size choice in the order form.
#[derive(Debug, Clone)]
pub struct SizeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn size_options(selected: &str) -> Vec<SizeOption> {
    CakeSize::ALL
        .iter()
        .map(|size| SizeOption {
            value: size.value(),
            label: size.label(),
            selected: size.value() == selected,
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Custom order form template.
#[derive(Template, WebTemplate)]
#[template(path = "custom_order.html")]
pub struct CustomOrderTemplate {
    pub nav: NavContext,
    pub products: Vec<ProductOption>,
    pub sizes: Vec<SizeOption>,
    pub form: OrderRequest,
    /// Earliest selectable delivery date, `YYYY-MM-DD`.
    pub min_date: String,
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "order_placed.html")]
pub struct OrderPlacedTemplate {
    pub nav: NavContext,
    pub customer: String,
    pub order_id: Option<String>,
    pub delivery: Option<String>,
}

impl OrderPlacedTemplate {
    fn new(nav: NavContext, form: &OrderRequest, order: Option<&Order>) -> Self {
        Self {
            nav,
            customer: form.nombre.trim().to_string(),
            order_id: order.map(|o| o.id.to_string()),
            delivery: order
                .and_then(|o| o.delivery_date)
                .map(filters::long_date),
        }
    }
}

async fn render_form(
    api: &BackendClient,
    nav: NavContext,
    form: OrderRequest,
    today: NaiveDate,
    error: Option<String>,
) -> CustomOrderTemplate {
    let (products, load_error) = match api.list_products().await {
        Ok(products) => (
            products
                .iter()
                .map(|product| ProductOption {
                    id: product.id.to_string(),
                    label: format!("{} - {}", product.name, product.price.display()),
                    selected: product.id.to_string() == form.producto.trim(),
                })
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products for order form");
            (Vec::new(), Some(PRODUCTS_UNAVAILABLE.to_string()))
        }
    };

    CustomOrderTemplate {
        nav,
        products,
        sizes: size_options(form.tamano.trim()),
        form,
        min_date: today.format("%Y-%m-%d").to_string(),
        error: error.or(load_error),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters of the order form; the catalog links here with a
/// product preselected.
#[derive(Debug, Default, Deserialize)]
pub struct PreselectQuery {
    pub producto: Option<String>,
}

/// Display the custom order form.
#[instrument(skip(state, session))]
pub async fn form(
    State(state): State<AppState>,
    session: RequestSession,
    WithRejection(Query(query), _): WithRejection<Query<PreselectQuery>, AppError>,
) -> impl IntoResponse {
    let nav = NavContext::from_session(&session).await;
    let today = Local::now().date_naive();
    let form = OrderRequest {
        producto: query.producto.unwrap_or_default(),
        ..OrderRequest::default()
    };
    render_form(state.api(), nav, form, today, None).await
}

/// Validate the form and place the order.
///
/// Local validation failures never reach the backend. A missing credential
/// clears the stale gate cookie and sends the customer to the login page.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    mut session: RequestSession,
    WithRejection(Form(form), _): WithRejection<Form<OrderRequest>, AppError>,
) -> Response {
    let nav = NavContext::from_session(&session).await;
    let today = Local::now().date_naive();

    let draft = match form.to_draft(today) {
        Ok(draft) => draft,
        Err(e) => {
            let page = render_form(state.api(), nav, form, today, Some(e.user_message())).await;
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    let credential = session.read().await;
    match orders::place_order(state.api(), credential.as_ref(), &draft).await {
        Ok(order) => OrderPlacedTemplate::new(nav, &form, order.as_ref()).into_response(),
        Err(e) if e.requires_login() => {
            tracing::info!("Order attempted without a stored credential");
            session.clear().await;
            (session.into_jar(), Redirect::to(LOGIN_PATH)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Order rejected");
            let page = render_form(state.api(), nav, form, today, Some(e.user_message())).await;
            (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
        }
    }
}
