/*
 * Responsibility
 * - the REST resource layer: route table, handlers, DTOs, extractors
 * - the optional static front-end fallback
 */
pub mod dto;
pub mod extractors;
pub mod frontend;
pub mod handlers;
pub mod routes;

pub use routes::routes;
