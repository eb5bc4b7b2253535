//! Product catalog route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::NavContext;
use crate::api::Product;
use crate::filters;
use crate::session::RequestSession;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            image: (!product.image.trim().is_empty()).then(|| product.image.clone()),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub nav: NavContext,
    pub products: Vec<ProductView>,
    pub error: Option<String>,
}

/// Display the product catalog.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: RequestSession) -> impl IntoResponse {
    let nav = NavContext::from_session(&session).await;

    match state.api().list_products().await {
        Ok(products) => CatalogTemplate {
            nav,
            products: products.iter().map(ProductView::from).collect(),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load catalog");
            CatalogTemplate {
                nav,
                products: Vec::new(),
                error: Some(e.user_message()),
            }
        }
    }
}
