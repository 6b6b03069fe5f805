//! Posts manager resource server.
//!
//! Exposes the `Post` collection over an explicit REST route table, gated by
//! bearer-token verification, and backed by a pluggable post store.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
