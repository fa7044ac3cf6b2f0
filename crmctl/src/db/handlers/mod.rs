//! Repository implementations for database access.
//!
//! Each repository is a trait with a PostgreSQL implementation and an in-memory one. Handlers
//! only ever see the traits (through [`crate::AppState`]), so the storage backend is chosen
//! once at startup and test doubles can be injected freely.
//!
//! # Available Repositories
//!
//! - [`Customers`] / [`InMemoryCustomers`]: Customer records ([`CustomerRepository`])
//! - [`Users`] / [`InMemoryUsers`]: Operator accounts ([`UserRepository`])
//!
//! # Common Pattern
//!
//! ```ignore
//! use crmctl::db::handlers::{CustomerFilter, Customers, Repository};
//!
//! async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = Customers::new(pool);
//!     let customers = repo.list(&CustomerFilter::new("Ann", None)).await?;
//!     Ok(())
//! }
//! ```

pub mod customers;
pub mod in_memory;
pub mod repository;
pub mod users;

pub use customers::{CustomerFilter, CustomerRepository, Customers};
pub use in_memory::{InMemoryCustomers, InMemoryUsers};
pub use repository::Repository;
pub use users::{UserRepository, Users};
