//! HTTP request handlers.
//!
//! - [`customers`]: customer search, retrieval, creation, update and soft deletion
//! - [`static_assets`]: client shell serving and SPA routing
//!
//! Every customer handler resolves the calling operator through
//! [`crate::auth::current_user::Actor`] and writes one [`crate::log_book`] entry on success.

pub mod customers;
pub mod static_assets;
