//! Database repository for customers.

use crate::{
    api::models::customers::CustomerStatus,
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::customers::{CustomerCreateDBRequest, CustomerDBResponse, CustomerField, CustomerUpdateDBRequest},
    },
    types::CustomerId,
};
use sqlx::PgPool;
use tracing::instrument;

/// Filter for listing customers
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Substring that at least one searchable field must contain; empty matches everything
    pub query: String,
    pub status: Option<CustomerStatus>,
}

impl CustomerFilter {
    pub fn new(query: impl Into<String>, status: Option<CustomerStatus>) -> Self {
        Self {
            query: query.into(),
            status,
        }
    }

    /// Whether a customer passes this filter. Matching is case-sensitive.
    pub fn matches(&self, customer: &CustomerDBResponse) -> bool {
        let text_match = CustomerField::SEARCHABLE
            .iter()
            .filter_map(|field| field.text_value(customer))
            .any(|value| value.contains(self.query.as_str()));

        text_match && self.status.is_none_or(|status| customer.status == status)
    }
}

/// Customer-specific operations on top of the base [`Repository`].
#[async_trait::async_trait]
pub trait CustomerRepository:
    Repository<
        CreateRequest = CustomerCreateDBRequest,
        UpdateRequest = CustomerUpdateDBRequest,
        Response = CustomerDBResponse,
        Id = CustomerId,
        Filter = CustomerFilter,
    >
{
    /// Look up a customer by email, regardless of status
    async fn get_by_email(&self, email: &str) -> Result<Option<CustomerDBResponse>>;

    /// Set only the status of a customer, failing with `NotFound` if it does not exist
    async fn set_status(&self, id: CustomerId, status: CustomerStatus) -> Result<CustomerDBResponse>;
}

/// PostgreSQL-backed customer repository
#[derive(Debug, Clone)]
pub struct Customers {
    db: PgPool,
}

impl Customers {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// `(strpos(f_name, $1) > 0 OR ...)` over every searchable column
fn search_clause() -> String {
    let conditions: Vec<String> = CustomerField::SEARCHABLE
        .iter()
        .map(|field| format!("strpos({}, $1) > 0", field.column()))
        .collect();
    format!("({})", conditions.join(" OR "))
}

#[async_trait::async_trait]
impl Repository for Customers {
    type CreateRequest = CustomerCreateDBRequest;
    type UpdateRequest = CustomerUpdateDBRequest;
    type Response = CustomerDBResponse;
    type Id = CustomerId;
    type Filter = CustomerFilter;

    #[instrument(skip(self, request), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>(
            r#"
            INSERT INTO customers (f_name, l_name, email, contact_num, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.f_name)
        .bind(&request.l_name)
        .bind(&request.email)
        .bind(&request.contact_num)
        .bind(&request.address)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(customer)
    }

    #[instrument(skip(self, filter), fields(status = ?filter.status), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let sql = format!(
            "SELECT * FROM customers WHERE {} AND ($2::customer_status IS NULL OR status = $2) ORDER BY id",
            search_clause()
        );

        let customers = sqlx::query_as::<_, CustomerDBResponse>(&sql)
            .bind(&filter.query)
            .bind(filter.status)
            .fetch_all(&self.db)
            .await?;

        Ok(customers)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>(
            r#"
            UPDATE customers SET
                f_name = $2,
                l_name = $3,
                email = $4,
                contact_num = $5,
                address = $6,
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.f_name)
        .bind(&request.l_name)
        .bind(&request.email)
        .bind(&request.contact_num)
        .bind(&request.address)
        .bind(request.status)
        .fetch_optional(&self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(customer)
    }
}

#[async_trait::async_trait]
impl CustomerRepository for Customers {
    #[instrument(skip(self, email), err)]
    async fn get_by_email(&self, email: &str) -> Result<Option<CustomerDBResponse>> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>("SELECT * FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(customer)
    }

    #[instrument(skip(self), err)]
    async fn set_status(&self, id: CustomerId, status: CustomerStatus) -> Result<CustomerDBResponse> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>(
            "UPDATE customers SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(customer)
    }
}
