//! Domain types shared by the forms, the API client and the front end.

pub mod filter;
pub mod lead;
pub mod query;
pub mod types;
pub mod user;
