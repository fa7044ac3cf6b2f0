//! API request/response models for customers.
//!
//! Requests use the public names (`firstName`, `lastName`), responses keep the storage names
//! (`fName`, `lName`) that existing clients already read. [`CustomerField`] is the single place
//! where the two vocabularies are related.
//!
//! [`CustomerField`]: crate::db::models::customers::CustomerField

use crate::db::models::customers::CustomerDBResponse;
use crate::errors::{Error, ErrorCode};
use crate::types::CustomerId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Lifecycle state of a customer. Deleting a customer only flips it to `Inactive`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "customer_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "ACTIVE",
            CustomerStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(CustomerStatus::Active),
            "INACTIVE" => Ok(CustomerStatus::Inactive),
            other => Err(Error::BadRequest {
                message: format!("Invalid customer status: {other}"),
                code: ErrorCode::BadRequest,
            }),
        }
    }
}

// Customer request models
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerCreate {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "Contact number must be between 1 and 20 characters"))]
    pub contact_num: String,
    #[validate(length(min = 1, max = 255, message = "Address must be between 1 and 255 characters"))]
    pub address: String,
}

/// Full replacement of a customer's fields. `status` is left untouched when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerUpdate {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "Contact number must be between 1 and 20 characters"))]
    pub contact_num: String,
    #[validate(length(min = 1, max = 255, message = "Address must be between 1 and 255 characters"))]
    pub address: String,
    pub status: Option<CustomerStatus>,
}

// Customer response models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: CustomerId,
    #[serde(rename = "fName")]
    pub f_name: String,
    #[serde(rename = "lName")]
    pub l_name: String,
    pub email: String,
    #[serde(rename = "contactNum")]
    pub contact_num: String,
    pub address: String,
    pub status: CustomerStatus,
}

impl From<CustomerDBResponse> for CustomerResponse {
    fn from(db: CustomerDBResponse) -> Self {
        Self {
            id: db.id,
            f_name: db.f_name,
            l_name: db.l_name,
            email: db.email,
            contact_num: db.contact_num,
            address: db.address,
            status: db.status,
        }
    }
}

/// `{ "customer": ... }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerEnvelope {
    pub customer: CustomerResponse,
}

/// `{ "customers": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerListEnvelope {
    pub customers: Vec<CustomerResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Query parameters for listing customers
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListCustomersQuery {
    /// Substring matched against first name, last name, email and contact number
    pub q: Option<String>,

    /// Only return customers in this status (`ACTIVE` or `INACTIVE`)
    pub status: Option<String>,
}

impl ListCustomersQuery {
    /// The status filter, treating an empty value the same as an absent one.
    pub fn status_filter(&self) -> Result<Option<CustomerStatus>, Error> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }

    pub fn search_query(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }
}
