//! OpenAPI documentation for the customer API at `/api/v1/*`.
//!
//! The document is served as an interactive viewer at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;
use crate::errors::{ErrorBody, ErrorCode};

/// Optional HTTP Basic authentication for operators.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BasicAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Basic)
                        .description(Some(
                            "Operator credentials. Optional unless the server sets `auth.required`; \
                            identifies the operator in log book entries.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api/v1", description = "Customer API")
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::customers::list_customers,
        api::handlers::customers::get_customer,
        api::handlers::customers::create_customer,
        api::handlers::customers::update_customer,
        api::handlers::customers::delete_customer,
    ),
    components(schemas(
        api::models::customers::CustomerStatus,
        api::models::customers::CustomerCreate,
        api::models::customers::CustomerUpdate,
        api::models::customers::CustomerResponse,
        api::models::customers::CustomerEnvelope,
        api::models::customers::CustomerListEnvelope,
        api::models::customers::MessageResponse,
        ErrorBody,
        ErrorCode,
    )),
    tags(
        (name = "customers", description = "Customer records: search, create, update and soft delete"),
    ),
    info(
        title = "crmctl",
        description = "Customer relationship management API",
    )
)]
pub struct ApiDoc;
