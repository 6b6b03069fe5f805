//! Client side of the posts manager.
//!
//! - [`gateway`]: the HTTP envelope around every call to the resource server
//! - [`controller`]: list / editor state, navigation and full-refresh reconciliation
//! - [`view`]: display ordering and the list render model
pub mod auth;
pub mod controller;
pub mod gateway;
pub mod model;
pub mod view;
