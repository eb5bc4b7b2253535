//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Login, registration and logout against the backend
//! - `orders` - Custom order drafts, order placement and order history
//!
//! Services own the local checks that must run before any backend call.
//! Handlers only translate forms into service calls and results into pages.

pub mod auth;
pub mod orders;
