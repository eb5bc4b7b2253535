//! Dulces Momentos Core - Shared types library.
//!
//! This crate provides common types used across the Dulces Momentos components:
//! - `storefront` - Public-facing bakery site
//! - `integration-tests` - End-to-end tests against a fake backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Products,
//! orders and accounts live in the remote bakery backend; these types
//! describe what the storefront receives from it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
