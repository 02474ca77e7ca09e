//! Request resolution over the in-memory reference data.

pub mod error;
pub mod filters;
pub mod pagination;
pub mod query;
pub mod reference;
pub mod resolver;
