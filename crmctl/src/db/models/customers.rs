//! Database models for customers.

use crate::api::models::customers::{CustomerCreate, CustomerStatus, CustomerUpdate};
use crate::types::CustomerId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A customer attribute, as known to every layer of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    FirstName,
    LastName,
    Email,
    ContactNum,
    Address,
    Status,
}

/// One row of the field mapping table.
#[derive(Debug)]
struct FieldNames {
    field: CustomerField,
    /// Rust field on the request structs
    payload: &'static str,
    /// JSON key accepted on requests
    api: &'static str,
    /// JSON key emitted on responses
    storage: &'static str,
    /// Column in the `customers` table
    column: &'static str,
}

/// The mapping between request names, response names and columns. Only the first and last
/// names differ between the request and response vocabularies.
static FIELD_TABLE: [FieldNames; 6] = [
    FieldNames {
        field: CustomerField::FirstName,
        payload: "first_name",
        api: "firstName",
        storage: "fName",
        column: "f_name",
    },
    FieldNames {
        field: CustomerField::LastName,
        payload: "last_name",
        api: "lastName",
        storage: "lName",
        column: "l_name",
    },
    FieldNames {
        field: CustomerField::Email,
        payload: "email",
        api: "email",
        storage: "email",
        column: "email",
    },
    FieldNames {
        field: CustomerField::ContactNum,
        payload: "contact_num",
        api: "contactNum",
        storage: "contactNum",
        column: "contact_num",
    },
    FieldNames {
        field: CustomerField::Address,
        payload: "address",
        api: "address",
        storage: "address",
        column: "address",
    },
    FieldNames {
        field: CustomerField::Status,
        payload: "status",
        api: "status",
        storage: "status",
        column: "status",
    },
];

impl CustomerField {
    pub const ALL: [CustomerField; 6] = [
        CustomerField::FirstName,
        CustomerField::LastName,
        CustomerField::Email,
        CustomerField::ContactNum,
        CustomerField::Address,
        CustomerField::Status,
    ];

    /// Text columns matched by the free-text customer search.
    pub const SEARCHABLE: [CustomerField; 4] = [
        CustomerField::FirstName,
        CustomerField::LastName,
        CustomerField::Email,
        CustomerField::ContactNum,
    ];

    fn names(self) -> &'static FieldNames {
        let row = match self {
            CustomerField::FirstName => 0,
            CustomerField::LastName => 1,
            CustomerField::Email => 2,
            CustomerField::ContactNum => 3,
            CustomerField::Address => 4,
            CustomerField::Status => 5,
        };
        &FIELD_TABLE[row]
    }

    pub fn api_name(self) -> &'static str {
        self.names().api
    }

    pub fn storage_name(self) -> &'static str {
        self.names().storage
    }

    pub fn column(self) -> &'static str {
        self.names().column
    }

    pub fn from_api_name(name: &str) -> Option<Self> {
        FIELD_TABLE.iter().find(|entry| entry.api == name).map(|entry| entry.field)
    }

    pub fn from_storage_name(name: &str) -> Option<Self> {
        FIELD_TABLE.iter().find(|entry| entry.storage == name).map(|entry| entry.field)
    }

    /// Resolve a key reported by request validation (Rust field or API name).
    pub fn from_payload_key(key: &str) -> Option<Self> {
        FIELD_TABLE
            .iter()
            .find(|entry| entry.payload == key || entry.api == key)
            .map(|entry| entry.field)
    }

    /// The stored text of a searchable field; `None` for non-text fields.
    pub fn text_value(self, customer: &CustomerDBResponse) -> Option<&str> {
        match self {
            CustomerField::FirstName => Some(&customer.f_name),
            CustomerField::LastName => Some(&customer.l_name),
            CustomerField::Email => Some(&customer.email),
            CustomerField::ContactNum => Some(&customer.contact_num),
            CustomerField::Address => Some(&customer.address),
            CustomerField::Status => None,
        }
    }
}

/// Database request for creating a new customer
#[derive(Debug, Clone)]
pub struct CustomerCreateDBRequest {
    pub f_name: String,
    pub l_name: String,
    pub email: String,
    pub contact_num: String,
    pub address: String,
}

impl From<CustomerCreate> for CustomerCreateDBRequest {
    fn from(api: CustomerCreate) -> Self {
        Self {
            f_name: api.first_name,
            l_name: api.last_name,
            email: api.email,
            contact_num: api.contact_num,
            address: api.address,
        }
    }
}

/// Database request for updating a customer
#[derive(Debug, Clone)]
pub struct CustomerUpdateDBRequest {
    pub f_name: String,
    pub l_name: String,
    pub email: String,
    pub contact_num: String,
    pub address: String,
    /// Left unchanged when `None`
    pub status: Option<CustomerStatus>,
}

impl From<CustomerUpdate> for CustomerUpdateDBRequest {
    fn from(api: CustomerUpdate) -> Self {
        Self {
            f_name: api.first_name,
            l_name: api.last_name,
            email: api.email,
            contact_num: api.contact_num,
            address: api.address,
            status: api.status,
        }
    }
}

/// Database response for a customer
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CustomerDBResponse {
    pub id: CustomerId,
    pub f_name: String,
    pub l_name: String,
    pub email: String,
    pub contact_num: String,
    pub address: String,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table_is_bidirectional() {
        for field in CustomerField::ALL {
            assert_eq!(CustomerField::from_api_name(field.api_name()), Some(field));
            assert_eq!(CustomerField::from_storage_name(field.storage_name()), Some(field));
        }
    }

    #[test]
    fn test_only_names_are_renamed() {
        assert_eq!(CustomerField::FirstName.api_name(), "firstName");
        assert_eq!(CustomerField::FirstName.storage_name(), "fName");
        assert_eq!(CustomerField::LastName.api_name(), "lastName");
        assert_eq!(CustomerField::LastName.storage_name(), "lName");

        let renamed: Vec<_> = CustomerField::ALL
            .into_iter()
            .filter(|f| f.api_name() != f.storage_name())
            .collect();
        assert_eq!(renamed, vec![CustomerField::FirstName, CustomerField::LastName]);
    }

    #[test]
    fn test_payload_keys_resolve() {
        assert_eq!(CustomerField::from_payload_key("first_name"), Some(CustomerField::FirstName));
        assert_eq!(CustomerField::from_payload_key("contactNum"), Some(CustomerField::ContactNum));
        assert_eq!(CustomerField::from_payload_key("nope"), None);
    }

    #[test]
    fn test_create_request_maps_names() {
        let request = CustomerCreateDBRequest::from(CustomerCreate {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@x.com".to_string(),
            contact_num: "123".to_string(),
            address: "A St".to_string(),
        });
        assert_eq!(request.f_name, "Ann");
        assert_eq!(request.l_name, "Lee");
        assert_eq!(request.email, "ann@x.com");
        assert_eq!(request.contact_num, "123");
        assert_eq!(request.address, "A St");
    }
}
