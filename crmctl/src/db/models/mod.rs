//! Database record models matching table schemas.
//!
//! These structs correspond to table rows and are what repositories accept and return.
//! They are kept apart from the API models so storage and wire representations can
//! evolve independently; conversions live next to the types (`From` impls).
//!
//! - [`customers`]: Customer records and the API/storage field mapping table
//! - [`users`]: Operator accounts used to attribute customer operations

pub mod customers;
pub mod users;
