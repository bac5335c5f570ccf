//! Service layer for the announcement board.
//! - `store` holds the two interchangeable update-store backends.
//! - `identity` gates who may post and who owns an update.
//! - Reuses validation and entity definitions in the `models` crate.

pub mod domain;
pub mod errors;
pub mod identity;
pub mod store;
