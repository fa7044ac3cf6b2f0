//! Common type definitions.
//!
//! # ID Types
//!
//! Storage generates sequential numeric identifiers for every entity:
//!
//! - [`CustomerId`]: Customer record identifier
//! - [`UserId`]: Operator account identifier

use crate::errors::{Error, ErrorCode, Result};

// Type aliases for IDs
pub type CustomerId = i64;
pub type UserId = i64;

/// Parse a raw path segment into a customer id.
///
/// Only positive integers are accepted; anything else is a bad request and never reaches
/// storage.
pub fn parse_customer_id(raw: &str) -> Result<CustomerId> {
    match raw.trim().parse::<CustomerId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::BadRequest {
            message: "Customer ID is required!".to_string(),
            code: ErrorCode::BadRequest,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_customer_id_accepts_positive_integers() {
        assert_eq!(parse_customer_id("1").unwrap(), 1);
        assert_eq!(parse_customer_id("42").unwrap(), 42);
        assert_eq!(parse_customer_id(" 7 ").unwrap(), 7);
    }

    #[test]
    fn test_parse_customer_id_rejects_everything_else() {
        for raw in ["", "abc", "0", "-3", "1.5", "12abc", "NaN"] {
            let err = parse_customer_id(raw).unwrap_err();
            assert!(
                matches!(err, Error::BadRequest { code: ErrorCode::BadRequest, .. }),
                "expected bad request for {raw:?}"
            );
        }
    }
}
