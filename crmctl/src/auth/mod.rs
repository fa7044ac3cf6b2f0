//! Operator authentication.
//!
//! The customer API is usable anonymously by default; operators are identified so that log
//! book entries name who did what. Two methods are supported, tried in this order:
//!
//! 1. **Proxy header**: a trusted upstream proxy (for example oauth2-proxy) sets a header
//!    carrying the username (`auth.proxy_header`, off by default).
//! 2. **Basic auth**: `Authorization: Basic` credentials checked against the `users` table
//!    (`auth.basic`, on by default).
//!
//! Setting `auth.required` rejects requests that resolve to no operator.
//!
//! # Modules
//!
//! - [`current_user`]: The [`current_user::Actor`] extractor
//! - [`password`]: Password hashing and verification using Argon2
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use crmctl::auth::current_user::Actor;
//!
//! async fn handler(actor: Actor) -> String {
//!     format!("Hello, {}!", actor.display_name())
//! }
//! ```

pub mod current_user;
pub mod password;
