//! API request and response data models.
//!
//! API models are kept distinct from the database models in [`crate::db::models`], so the wire
//! representation can differ from what is stored.

pub mod customers;
