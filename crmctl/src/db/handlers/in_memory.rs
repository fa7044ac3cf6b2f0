//! In-memory repository implementations.
//!
//! These store everything in process memory behind an async lock. They back the `memory`
//! database type (useful for local development and demos) and are the test doubles for the
//! HTTP layer. Data is lost on restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    api::models::customers::CustomerStatus,
    db::{
        errors::{DbError, Result},
        handlers::{
            customers::{CustomerFilter, CustomerRepository},
            repository::Repository,
            users::UserRepository,
        },
        models::{
            customers::{CustomerCreateDBRequest, CustomerDBResponse, CustomerUpdateDBRequest},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::{CustomerId, UserId},
};

fn email_taken() -> DbError {
    DbError::UniqueViolation {
        constraint: Some("customers_email_unique".to_string()),
        table: Some("customers".to_string()),
        message: "duplicate key value violates unique constraint \"customers_email_unique\"".to_string(),
    }
}

#[derive(Debug, Default)]
struct CustomerTable {
    last_id: CustomerId,
    rows: BTreeMap<CustomerId, CustomerDBResponse>,
}

impl CustomerTable {
    /// Mirrors the `customers_email_unique` constraint
    fn email_in_use(&self, email: &str, except: Option<CustomerId>) -> bool {
        self.rows
            .values()
            .any(|row| row.email == email && Some(row.id) != except)
    }
}

/// In-memory implementation of [`CustomerRepository`].
///
/// Ids are assigned sequentially from 1, like a `BIGSERIAL` column.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomers {
    table: Arc<RwLock<CustomerTable>>,
}

impl InMemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers, active or not
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl Repository for InMemoryCustomers {
    type CreateRequest = CustomerCreateDBRequest;
    type UpdateRequest = CustomerUpdateDBRequest;
    type Response = CustomerDBResponse;
    type Id = CustomerId;
    type Filter = CustomerFilter;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut table = self.table.write().await;

        if table.email_in_use(&request.email, None) {
            return Err(email_taken());
        }

        table.last_id += 1;
        let now = Utc::now();
        let customer = CustomerDBResponse {
            id: table.last_id,
            f_name: request.f_name.clone(),
            l_name: request.l_name.clone(),
            email: request.email.clone(),
            contact_num: request.contact_num.clone(),
            address: request.address.clone(),
            status: CustomerStatus::Active,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(customer.id, customer.clone());

        Ok(customer)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|row| filter.matches(row)).cloned().collect())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut table = self.table.write().await;

        if table.email_in_use(&request.email, Some(id)) {
            return Err(email_taken());
        }

        let row = table.rows.get_mut(&id).ok_or(DbError::NotFound)?;
        row.f_name = request.f_name.clone();
        row.l_name = request.l_name.clone();
        row.email = request.email.clone();
        row.contact_num = request.contact_num.clone();
        row.address = request.address.clone();
        if let Some(status) = request.status {
            row.status = status;
        }
        row.updated_at = Utc::now();

        Ok(row.clone())
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomers {
    async fn get_by_email(&self, email: &str) -> Result<Option<CustomerDBResponse>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|row| row.email == email).cloned())
    }

    async fn set_status(&self, id: CustomerId, status: CustomerStatus) -> Result<CustomerDBResponse> {
        let mut table = self.table.write().await;
        let row = table.rows.get_mut(&id).ok_or(DbError::NotFound)?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

#[derive(Debug, Default)]
struct UserTable {
    last_id: UserId,
    rows: BTreeMap<String, UserDBResponse>,
}

/// In-memory implementation of [`UserRepository`], keyed by username.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsers {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUsers {
    async fn upsert(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut table = self.table.write().await;
        let now = Utc::now();

        if let Some(existing) = table.rows.get_mut(&request.username) {
            existing.password_hash = request.password_hash.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        table.last_id += 1;
        let user = UserDBResponse {
            id: table.last_id,
            username: request.username.clone(),
            password_hash: request.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserDBResponse>> {
        Ok(self.table.read().await.rows.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(first: &str, email: &str) -> CustomerCreateDBRequest {
        CustomerCreateDBRequest {
            f_name: first.to_string(),
            l_name: "Lee".to_string(),
            email: email.to_string(),
            contact_num: "123".to_string(),
            address: "A St".to_string(),
        }
    }

    fn update_request(first: &str, email: &str, status: Option<CustomerStatus>) -> CustomerUpdateDBRequest {
        CustomerUpdateDBRequest {
            f_name: first.to_string(),
            l_name: "Lee".to_string(),
            email: email.to_string(),
            contact_num: "123".to_string(),
            address: "A St".to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_status_defaults_active() {
        let repo = InMemoryCustomers::new();

        let ann = repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();
        let bob = repo.create(&create_request("Bob", "bob@x.com")).await.unwrap();

        assert_eq!(ann.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(ann.status, CustomerStatus::Active);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_without_insert() {
        let repo = InMemoryCustomers::new();

        repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();
        let result = repo.create(&create_request("Imposter", "ann@x.com")).await;

        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_other_row() {
        let repo = InMemoryCustomers::new();

        let ann = repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();
        repo.create(&create_request("Bob", "bob@x.com")).await.unwrap();

        // Keeping your own email is fine
        repo.update(ann.id, &update_request("Anne", "ann@x.com", None)).await.unwrap();

        let result = repo.update(ann.id, &update_request("Ann", "bob@x.com", None)).await;
        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_update_and_set_status_on_missing_row() {
        let repo = InMemoryCustomers::new();

        let result = repo.update(42, &update_request("Ann", "ann@x.com", None)).await;
        assert!(matches!(result, Err(DbError::NotFound)));

        let result = repo.set_status(42, CustomerStatus::Inactive).await;
        assert!(matches!(result, Err(DbError::NotFound)));
    }

    #[tokio::test]
    async fn test_set_status_leaves_other_fields_alone() {
        let repo = InMemoryCustomers::new();

        let ann = repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();
        let deleted = repo.set_status(ann.id, CustomerStatus::Inactive).await.unwrap();

        assert_eq!(deleted.status, CustomerStatus::Inactive);
        assert_eq!(deleted.f_name, ann.f_name);
        assert_eq!(deleted.email, ann.email);
        assert_eq!(deleted.created_at, ann.created_at);

        // Inactive customers are still found by email
        assert!(repo.get_by_email("ann@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_user_upsert_keeps_id() {
        let repo = InMemoryUsers::new();

        let first = repo
            .upsert(&UserCreateDBRequest {
                username: "admin".to_string(),
                password_hash: "one".to_string(),
            })
            .await
            .unwrap();
        let second = repo
            .upsert(&UserCreateDBRequest {
                username: "admin".to_string(),
                password_hash: "two".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.get_by_username("admin").await.unwrap().unwrap().password_hash, "two");
    }
}
