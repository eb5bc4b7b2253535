//! Order service.
//!
//! A credential is the only gate for order operations: without one the
//! service fails with [`OrderError::SessionExpired`] and never calls the
//! backend.

mod draft;
mod error;

pub use draft::{CakeSize, OrderRequest};
pub use error::OrderError;

use tracing::instrument;

use crate::api::{BackendClient, CreateOrderPayload, Order};
use crate::error::add_breadcrumb;
use crate::session::Credential;

/// Submit an order draft for the credential's owner.
///
/// Returns the created order, or `None` if the backend accepted it without
/// a body.
///
/// # Errors
///
/// Returns `OrderError::SessionExpired` without any network call when no
/// credential is present, and `OrderError::Api` when the backend rejects the
/// draft or cannot be reached.
#[instrument(skip(api, credential, draft), fields(items = draft.items.len()))]
pub async fn place_order(
    api: &BackendClient,
    credential: Option<&Credential>,
    draft: &CreateOrderPayload,
) -> Result<Option<Order>, OrderError> {
    let credential = require_credential(credential)?;
    let order = api.create_order(credential, draft).await?;

    let order_id = order
        .as_ref()
        .map_or_else(|| "unknown".to_string(), |o| o.id.to_string());
    add_breadcrumb("order", "Order placed", Some(&[("order_id", order_id.as_str())]));
    tracing::info!(order_id = %order_id, "Order placed");

    Ok(order)
}

/// Load the orders of the credential's owner.
///
/// # Errors
///
/// Same as [`place_order`].
#[instrument(skip(api, credential))]
pub async fn load_orders(
    api: &BackendClient,
    credential: Option<&Credential>,
) -> Result<Vec<Order>, OrderError> {
    let credential = require_credential(credential)?;
    Ok(api.list_orders(credential).await?)
}

fn require_credential(credential: Option<&Credential>) -> Result<&Credential, OrderError> {
    credential
        .filter(|c| !c.is_empty())
        .ok_or(OrderError::SessionExpired)
}
