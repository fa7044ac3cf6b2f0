use crate::api::extractors::{CustomerIdPath, QueryParams, ValidatedJson};
use crate::api::models::customers::{
    CustomerCreate, CustomerEnvelope, CustomerListEnvelope, CustomerResponse, CustomerStatus, CustomerUpdate, ListCustomersQuery,
    MessageResponse,
};
use crate::auth::current_user::Actor;
use crate::db::errors::DbError;
use crate::db::handlers::CustomerFilter;
use crate::db::models::customers::{CustomerCreateDBRequest, CustomerUpdateDBRequest};
use crate::errors::{Error, ErrorBody, ErrorCode, Result};
use crate::log_book::{self, LogBookAction};
use crate::AppState;
use axum::{extract::State, Json};

fn customer_not_found() -> String {
    "Customer not found!".to_string()
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    summary = "List customers",
    description = "Customers whose first name, last name, email or contact number contains `q` (case-sensitive), optionally restricted to one status.",
    params(ListCustomersQuery),
    responses(
        (status = 200, description = "Matching customers ordered by id", body = CustomerListEnvelope),
        (status = 400, description = "Unknown status value", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    security((), ("BasicAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_customers(
    State(state): State<AppState>,
    actor: Actor,
    QueryParams(query): QueryParams<ListCustomersQuery>,
) -> Result<Json<CustomerListEnvelope>> {
    let filter = CustomerFilter::new(query.search_query(), query.status_filter()?);

    let customers = state.customers.list(&filter).await?;

    log_book::record(&filter.query, LogBookAction::Searched, &actor);

    Ok(Json(CustomerListEnvelope {
        customers: customers.into_iter().map(CustomerResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    summary = "Get customer",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "The customer, active or not", body = CustomerEnvelope),
        (status = 400, description = "ID is not a positive integer", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Customer not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    security((), ("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(customer_id = id))]
pub async fn get_customer(
    State(state): State<AppState>,
    actor: Actor,
    CustomerIdPath(id): CustomerIdPath,
) -> Result<Json<CustomerEnvelope>> {
    let customer = state.customers.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        message: customer_not_found(),
        code: ErrorCode::CustomerNotFound,
    })?;

    log_book::record(id, LogBookAction::Viewed, &actor);

    Ok(Json(CustomerEnvelope {
        customer: customer.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    summary = "Create customer",
    request_body = CustomerCreate,
    responses(
        (status = 200, description = "Customer created as ACTIVE", body = CustomerEnvelope),
        (status = 400, description = "A customer with this email already exists", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Payload failed validation", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    security((), ("BasicAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_customer(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(create): ValidatedJson<CustomerCreate>,
) -> Result<Json<CustomerEnvelope>> {
    // Emails are unique across every customer, inactive ones included
    if state.customers.get_by_email(&create.email).await?.is_some() {
        return Err(Error::BadRequest {
            message: "Customer already exists!".to_string(),
            code: ErrorCode::CustomerAlreadyExists,
        });
    }

    let customer = state.customers.create(&CustomerCreateDBRequest::from(create)).await?;

    log_book::record(&customer.f_name, LogBookAction::Added, &actor);

    Ok(Json(CustomerEnvelope {
        customer: customer.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    summary = "Update customer",
    description = "Replaces every field of the customer. `status` is only changed when supplied.",
    params(("id" = i64, Path, description = "Customer ID")),
    request_body = CustomerUpdate,
    responses(
        (status = 200, description = "Customer updated", body = CustomerEnvelope),
        (status = 400, description = "Bad ID, unknown customer (CUSTOMER_NOT_FOUND) or email taken by another customer", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Payload failed validation", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    security((), ("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(customer_id = id))]
pub async fn update_customer(
    State(state): State<AppState>,
    actor: Actor,
    CustomerIdPath(id): CustomerIdPath,
    ValidatedJson(update): ValidatedJson<CustomerUpdate>,
) -> Result<Json<CustomerEnvelope>> {
    // Existing clients expect a missing customer on update as a bad request
    let existing = state.customers.get_by_id(id).await?.ok_or_else(|| Error::BadRequest {
        message: customer_not_found(),
        code: ErrorCode::CustomerNotFound,
    })?;

    if existing.email != update.email && state.customers.get_by_email(&update.email).await?.is_some() {
        return Err(Error::BadRequest {
            message: "Customer with this email already exists!".to_string(),
            code: ErrorCode::CustomerAlreadyExists,
        });
    }

    let customer = state.customers.update(id, &CustomerUpdateDBRequest::from(update)).await?;

    log_book::record(&customer.f_name, LogBookAction::Updated, &actor);

    Ok(Json(CustomerEnvelope {
        customer: customer.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    summary = "Delete customer",
    description = "Soft delete: the customer is marked INACTIVE and stays readable.",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer marked inactive", body = MessageResponse),
        (status = 400, description = "ID is not a positive integer", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Customer not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    security((), ("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(customer_id = id))]
pub async fn delete_customer(
    State(state): State<AppState>,
    actor: Actor,
    CustomerIdPath(id): CustomerIdPath,
) -> Result<Json<MessageResponse>> {
    let customer = state
        .customers
        .set_status(id, CustomerStatus::Inactive)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::NotFound {
                message: customer_not_found(),
                code: ErrorCode::CustomerNotFound,
            },
            other => Error::Database(other),
        })?;

    log_book::record(&customer.f_name, LogBookAction::Deleted, &actor);

    Ok(Json(MessageResponse {
        message: "Customer deleted successfully!".to_string(),
    }))
}
