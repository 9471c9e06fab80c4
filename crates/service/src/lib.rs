//! Service layer providing the product CRUD operations on top of models.
//! - Separates business rules (fetch, mutate, persist) from data access.
//! - Storage is reached through the `ProductRepository` trait so callers can
//!   inject the SeaORM implementation or the in-memory mock.

pub mod errors;
pub mod product;
#[cfg(test)]
pub mod test_support;
