//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for the customer API and the client shell
//! - **[`models`]**: Request/response data structures for API communication
//! - **[`extractors`]**: Validated JSON bodies and customer id path segments
//!
//! The customer API lives under `/api/v1/customers`. All endpoints are documented with
//! `utoipa`; the rendered documentation is served at `/docs`.

pub mod extractors;
pub mod handlers;
pub mod models;
